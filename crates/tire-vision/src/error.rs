//! Error types for tire-vision.

use thiserror::Error;

/// Errors from image handling and AI providers.
#[derive(Debug, Error)]
pub enum VisionError {
    /// Provider selected but its credentials are missing.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success response from a provider.
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// Provider answered but without usable content.
    #[error("{0} returned no result")]
    EmptyResponse(&'static str),

    /// An asynchronous prediction finished unsuccessfully.
    #[error("prediction failed: {0}")]
    PredictionFailed(String),

    /// Polling gave up before the prediction finished.
    #[error("prediction did not finish after {0} polls")]
    PollTimeout(u32),

    /// Not a `data:<mime>;base64,<payload>` string.
    #[error("invalid image data URL")]
    InvalidDataUrl,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("請上傳 JPG、PNG 或 WebP 格式的圖片")]
    UnsupportedImageType(String),

    #[error("圖片大小不能超過 {max_mb}MB")]
    ImageTooLarge { size: u64, max_mb: u64 },
}

/// Result type for tire-vision operations.
pub type Result<T> = std::result::Result<T, VisionError>;
