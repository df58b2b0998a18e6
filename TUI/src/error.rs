//! Error types for the storage, generation and image-loading layers.
//!
//! None of these reach the screens as errors: the stats store swallows
//! `StorageError`, the generator turns `GenerationError` into a fallback
//! line, and `ImageError` only ever lands in the status bar.

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage encoding error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("No API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Could not read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not an image file: {0}")]
    UnsupportedType(String),

    #[error("Image is too large ({size} bytes, max {max})")]
    TooLarge { size: u64, max: u64 },
}
