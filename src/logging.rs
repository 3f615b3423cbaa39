//! Logging setup.
//!
//! Installs a global `tracing` subscriber writing to stderr. The filter comes
//! from `RUST_LOG` when set, otherwise `info` (or `debug` with `--verbose`).

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub fn init(verbose: bool) -> Result<(), AppError> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
