//! EB Rescue application core.
//!
//! The [`ViewRouter`] owns the current screen and sequences every submit:
//! local session first, then best-effort remote writes, then the WhatsApp
//! deep link for human dispatch. Forms validate input before anything is
//! submitted, and [`Console`] renders it all as a terminal session.
//!
//! # Architecture
//!
//! ```text
//! Console (stdin/stdout)
//!     ↓ form input
//! forms::* ── validate ──→ request DTO
//!     ↓
//! ViewRouter
//!     ├── SessionStore      (phone, profile, history)
//!     ├── RemoteDatabase    (best effort)
//!     ├── LocationResolver  (emergency location)
//!     └── LinkOpener        (wa.me / mailto links)
//! ```

mod config;
mod console;
mod error;
pub mod forms;
pub mod history;
mod router;
pub mod screens;
mod verify;

pub use config::{
    AppConfig, AppConfigBuilder, DEFAULT_CODE_DELAY, DEFAULT_DATABASE_URL, DEFAULT_MAILTO_DELAY,
    DEFAULT_REVIEW_LINK_DELAY, DEFAULT_VERIFICATION_CODE,
};
pub use console::Console;
pub use error::{AppError, Result};
pub use router::{
    inquiry_acknowledgment, LastResult, ViewRouter, ViewRouterBuilder, RIM_DESIGN_COMING_SOON,
};
pub use verify::{CodeEntry, Verifier, CODE_LENGTH};
