//! Error type shared by the directory, fetcher, reshaper and export paths.
//!
//! Provider plumbing works with `anyhow` internally; everything a caller needs to branch
//! on is surfaced as a [`DashboardError`] variant.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Network or service failure talking to the World Bank API. All causes (timeouts,
    /// HTTP status, API error payloads, malformed JSON) land here.
    #[error("provider unavailable ({context}): {message}")]
    ProviderUnavailable { context: String, message: String },

    /// No chunk could be fetched for the selected country.
    #[error("no data could be fetched from the World Bank API for {country}")]
    EmptyResult { country: String },

    /// `reshape` was handed zero chunks.
    #[error("no chunks to reshape")]
    EmptyInput,

    #[error("country not found in directory: {name}")]
    NotFound { name: String },

    #[error("export to {path} failed: {message}")]
    Export { path: String, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DashboardError {
    /// Wrap a provider-side `anyhow` error, keeping the full cause chain in the message.
    pub fn provider(context: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::ProviderUnavailable {
            context: context.into(),
            message: format!("{err:#}"),
        }
    }

    pub(crate) fn export(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::Export {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
