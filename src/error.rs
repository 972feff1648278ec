//! Error taxonomy shared by the three tools.
//!
//! Errors fall into three families: input validation (a URL that names no
//! video), upstream fetches (HTTP failures, extractor failures), and
//! content availability (no results, no captions, requested language
//! absent). Every binary converts the error into either a structured JSON
//! document or a human-readable message on stderr and exits with status 1.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ToolError>;

#[derive(Error, Debug)]
pub enum ToolError {
    /// The supplied URL matched none of the recognized video URL shapes.
    #[error("Invalid YouTube URL")]
    InvalidVideoUrl,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The external extraction tool exited non-zero or produced no usable
    /// output. `reason` carries its stderr (or a short summary).
    #[error("Download error: {reason}")]
    Extractor { reason: String },

    #[error("Could not fetch channel information")]
    NoChannelInfo,

    #[error("No videos found")]
    NoVideos,

    #[error("No subtitles available for this video")]
    NoCaptions,

    #[error("Could not get subtitle URL")]
    NoCaptionUrl,

    /// Requested caption language is absent, both as an exact key and as a
    /// case-insensitive substring of any available code.
    #[error("Language '{requested}' not found")]
    LanguageNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Render the error as the JSON document the tools print under `--json`.
    ///
    /// The shape is `{"error": "..."}`, extended with `available_languages`
    /// when the failure was a language lookup.
    pub fn to_document(&self) -> serde_json::Value {
        match self {
            ToolError::LanguageNotFound { available, .. } => serde_json::json!({
                "error": self.to_string(),
                "available_languages": available,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        }
    }
}
