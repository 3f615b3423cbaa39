//! Application error type.
//!
//! Every stage of the chart pipeline reports failures through [`AppError`].
//! Nothing is retried and no partial dataset is ever returned: the first error
//! aborts the request and is handed to the caller (CLI or HTTP layer), which
//! decides how to present it.

use std::path::PathBuf;

use crate::domain::Category;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Network or transport failure while retrieving the source CSV.
    #[error("could not retrieve {category} data file from {url}: {message}")]
    Fetch {
        category: Category,
        url: String,
        message: String,
    },
    /// Malformed header or row, wrong column count, non-numeric cell.
    #[error("could not read CSV data (line {line}): {message}")]
    Parse { line: u64, message: String },
    /// A header date column does not match `M/D/YY`.
    #[error("could not parse date {value:?}: {source}")]
    DateFormat {
        value: String,
        source: chrono::ParseError,
    },
    /// The plotting backend failed.
    #[error("could not render chart: {0}")]
    Render(String),
    /// Invalid configuration (file contents, thresholds, CLI values).
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Server(String),
    #[error("could not initialize logging: {0}")]
    Logging(String),
}

impl AppError {
    /// Process exit code used by the `covid19` binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Io { .. } => 2,
            Self::Parse { .. } | Self::DateFormat { .. } => 3,
            Self::Fetch { .. } => 4,
            Self::Render(_) => 5,
            Self::Server(_) | Self::Logging(_) => 6,
        }
    }

    /// Short name of the pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::Parse { .. } | Self::DateFormat { .. } => "parse",
            Self::Render(_) => "render",
            Self::Config(_) => "config",
            Self::Io { .. } => "io",
            Self::Server(_) => "server",
            Self::Logging(_) => "logging",
        }
    }

    pub(crate) fn parse(line: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_stage() {
        let fetch = AppError::Fetch {
            category: Category::Deaths,
            url: "http://localhost/x.csv".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(fetch.exit_code(), 4);
        assert_eq!(fetch.stage(), "fetch");
        assert!(fetch.to_string().contains("deaths"));

        let parse = AppError::parse(7, "bad cell");
        assert_eq!(parse.exit_code(), 3);
        assert_eq!(parse.to_string(), "could not read CSV data (line 7): bad cell");

        assert_eq!(AppError::Config("x".into()).exit_code(), 2);
        assert_eq!(AppError::Render("x".into()).exit_code(), 5);
    }
}
