use gemini_integration::GeminiError;
use thiserror::Error;

/// Why a live point source could not be used for a projection.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid growth feed url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("HTTP {0}")]
    Status(u16),
    #[error("no usable data points")]
    Empty,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Gemini(#[from] GeminiError),
}
