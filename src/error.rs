// src/error.rs

use thiserror::Error;

/// Errors raised while building or serving a dashboard snapshot.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Upstream page could not be fetched (connection, timeout, or status).
    #[error("Network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The statistics table is missing or a row is malformed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The data parsed but is missing something the dashboard expects.
    #[error("Data error: {0}")]
    Data(String),

    /// A value too large for the magnitude suffixes.
    #[error("Value {0} is out of range for magnitude formatting")]
    OutOfRange(f64),

    /// The dashboard page template failed to register or render.
    #[error("Template error: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// Fatal errors abort startup; the rest degrade the rendered page.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DashboardError::Network { .. }
                | DashboardError::Parse(_)
                | DashboardError::Config(_)
                | DashboardError::Template(_)
                | DashboardError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
