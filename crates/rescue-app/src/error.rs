//! Error types for the app.

use rescue_core::{ValidationError, View};
use thiserror::Error;

/// Errors surfaced by the router and forms.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected; the message is shown to the user as is.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Local session state could not be read or written.
    #[error("session store error: {0}")]
    Store(#[from] session_store::StoreError),

    #[error("dispatch error: {0}")]
    Dispatch(#[from] dispatch::DispatchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("vision error: {0}")]
    Vision(#[from] tire_vision::VisionError),

    /// An action that the current screen does not offer.
    #[error("{action} is not available on {view}")]
    InvalidTransition { view: View, action: &'static str },

    /// An action that needs a registered user before one exists.
    #[error("no registered user")]
    NotRegistered,

    #[error("rim design is not enabled")]
    RimDesignDisabled,
}

/// Result type for app operations.
pub type Result<T> = std::result::Result<T, AppError>;
