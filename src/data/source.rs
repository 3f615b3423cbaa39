//! JHU CSSE time-series source.

use std::io::Read;

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::domain::Category;
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "COVID19_SOURCE_URL";

/// Something that can hand out the CSV body for a category.
///
/// The returned reader is owned by the caller and released when dropped.
pub trait SeriesSource: Send + Sync {
    fn fetch(&self, category: Category) -> Result<Box<dyn Read>, AppError>;
}

/// Fetches the CSSE global time-series CSV over HTTP(S).
///
/// One GET per call: no retries, no caching, no timeout.
#[derive(Debug, Clone)]
pub struct CsseSource {
    base_url: String,
}

impl CsseSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build from `COVID19_SOURCE_URL` (also read from `.env`), else the default.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::new(DEFAULT_BASE_URL),
        }
    }

    pub fn url_for(&self, category: Category) -> String {
        format!("{}/time_series_covid19_{}_global.csv", self.base_url, category.slug())
    }
}

impl SeriesSource for CsseSource {
    fn fetch(&self, category: Category) -> Result<Box<dyn Read>, AppError> {
        let url = self.url_for(category);
        let fetch_err = |message: String| AppError::Fetch {
            category,
            url: url.clone(),
            message,
        };

        // The blocking client must be built (and dropped) off the async runtime,
        // so one is created per call on the calling thread.
        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| fetch_err(format!("could not build HTTP client: {e}")))?;

        debug!(%url, "fetching source data");
        let resp = client
            .get(&url)
            .send()
            .map_err(|e| fetch_err(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(fetch_err(format!("request failed with status {}", resp.status())));
        }

        info!(%category, %url, "source data retrieved");
        Ok(Box::new(resp))
    }
}
