//! Core types for the EB Rescue app.
//!
//! This crate holds everything the other crates agree on and nothing that
//! talks to the outside world:
//!
//! - [`View`] / [`ServiceId`] - The closed set of screens and dashboard entries
//! - [`UserProfile`], [`RepairRecord`] and the request DTOs
//! - [`validation`] - Field validation with Traditional Chinese messages
//! - [`tires`] - The static width → aspect ratio / diameter table
//! - [`Clock`] - Source of "now" so date rules can be tested
//!
//! # Example
//!
//! ```rust
//! use rescue_core::tires::TireSelection;
//!
//! let mut selection = TireSelection::default();
//! selection.select_width("205").unwrap();
//! selection.select_aspect_ratio("55").unwrap();
//! selection.select_diameter("16").unwrap();
//! assert_eq!(selection.size_label().as_deref(), Some("205/55 R16"));
//! ```

mod clock;
mod error;
mod models;
pub mod tires;
pub mod validation;
mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Field, ValidationError};
pub use models::{
    BookingKind, EmergencyRequest, RecordCategory, RecordStatus, RepairRecord, ReviewRequest,
    ServiceRequest, TirePosition, UserProfile,
};
pub use view::{ServiceId, View};
