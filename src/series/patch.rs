//! Manual corrections for known-bad source values.
//!
//! Corrections are written into the aggregated, un-aligned series at their
//! literal index. They set rather than add, so applying them twice is a no-op.

use tracing::{debug, warn};

use crate::domain::{Category, Correction, RawTable};

/// Apply every correction for `category` to `raw`. Returns how many were applied.
pub fn apply_corrections<'a, I>(raw: &mut RawTable, category: Category, corrections: I) -> usize
where
    I: IntoIterator<Item = &'a Correction>,
{
    let mut applied = 0;
    for fix in corrections.into_iter().filter(|c| c.category == category) {
        let Some(values) = raw.series.get_mut(&fix.country) else {
            debug!(country = %fix.country, "correction for country not in dataset; skipped");
            continue;
        };
        let Some(slot) = values.get_mut(fix.index) else {
            warn!(
                country = %fix.country,
                index = fix.index,
                len = values.len(),
                "correction index out of range; skipped"
            );
            continue;
        };
        debug!(country = %fix.country, index = fix.index, from = *slot, to = fix.value, "correcting value");
        *slot = fix.value;
        applied += 1;
    }
    applied
}
