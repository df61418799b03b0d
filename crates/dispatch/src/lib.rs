//! Human dispatch for EB Rescue.
//!
//! Every request ends as a pre-filled WhatsApp message to the business:
//!
//! - [`templates`] - Message text per flow
//! - [`whatsapp_link`] / [`mailto_link`] - Deep link construction
//! - [`LinkOpener`] - Hands links to the platform (or a test double)
//! - [`LocationResolver`] - Position and reverse geocoding under a timeout
//! - [`SHOP`] - The walk-in repair centre

mod config;
mod error;
pub mod location;
mod opener;
mod shop;
pub mod templates;
mod whatsapp;

pub use config::{DispatchConfig, DispatchConfigBuilder};
pub use error::{DispatchError, Result};
pub use location::{
    AddressFix, Coordinates, FixedGeolocator, Geolocator, LocationFix, LocationResolver,
    NominatimGeocoder, ReverseGeocoder, UnavailableGeolocator,
};
pub use opener::{CommandOpener, LinkOpener, LoggingOpener, NoOpOpener, RecordingOpener};
pub use shop::{ShopInfo, SHOP};
pub use whatsapp::{
    mailto_link, whatsapp_link, BOOKING_EMAIL, BOOKING_EMAIL_SUBJECT, DEFAULT_BUSINESS_NUMBER,
};
