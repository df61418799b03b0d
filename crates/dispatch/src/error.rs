//! Error types for dispatch.

use std::time::Duration;

use thiserror::Error;

/// Errors from link opening and location lookup.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the geocoding service.
    #[error("geocoding API returned status {0}")]
    Api(u16),

    /// Geocoding answered without a place name.
    #[error("no address found")]
    NoAddress,

    /// The opener command could not be started or failed.
    #[error("failed to open link: {0}")]
    OpenFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No position source on this device.
    #[error("此裝置不支持地理位置功能")]
    GeolocationUnsupported,

    /// The position source refused or failed.
    #[error("無法獲取位置。請確保已允許位置權限。")]
    PositionUnavailable,

    #[error("location lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
