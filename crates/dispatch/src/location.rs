//! Position and reverse geocoding.
//!
//! A terminal has no GPS, so positions come from configuration or are
//! unavailable. Every lookup is bounded by a timeout and degrades to
//! coordinates or to manual instructions rather than failing the flow.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{DispatchError, Result};

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Default bound on a position lookup.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Shown when the address had to fall back to raw coordinates.
pub const COORDINATES_NOTICE: &str = "無法獲取詳細地址，已填入座標。";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Google Maps link pinned at this position.
    pub fn map_link(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}",
            self.latitude, self.longitude
        )
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Source of the device position.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates>;
}

/// A position set in configuration.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinates);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates> {
        Ok(self.0)
    }
}

/// No position source.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableGeolocator;

#[async_trait]
impl Geolocator for UnavailableGeolocator {
    async fn current_position(&self) -> Result<Coordinates> {
        Err(DispatchError::GeolocationUnsupported)
    }
}

/// Turns coordinates into a human-readable place name.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, position: Coordinates) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: Option<String>,
}

/// OpenStreetMap Nominatim reverse geocoding.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        // Nominatim rejects requests without a User-Agent
        let client = Client::builder()
            .user_agent(concat!("eb-rescue/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn reverse_url(&self, position: Coordinates) -> String {
        format!(
            "{}/reverse?format=json&lat={}&lon={}",
            self.base_url, position.latitude, position.longitude
        )
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, position: Coordinates) -> Result<String> {
        let url = self.reverse_url(position);
        debug!("Reverse geocoding: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DispatchError::Api(response.status().as_u16()));
        }

        let place: NominatimPlace = response.json().await?;
        place
            .display_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(DispatchError::NoAddress)
    }
}

/// Outcome of a location lookup for the emergency message.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationFix {
    /// Position with a place name.
    Place { name: String, position: Coordinates },
    /// Position without a place name.
    Coordinates(Coordinates),
    /// No position; the user must share their live location by hand.
    Unavailable,
}

/// An address suggestion for a booking form.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressFix {
    pub address: String,
    /// Set when the address degraded to coordinates.
    pub notice: Option<&'static str>,
}

/// Position source plus optional geocoder, bounded by a timeout.
#[derive(Clone)]
pub struct LocationResolver {
    geolocator: Arc<dyn Geolocator>,
    geocoder: Option<Arc<dyn ReverseGeocoder>>,
    timeout: Duration,
}

impl LocationResolver {
    pub fn new(geolocator: Arc<dyn Geolocator>) -> Self {
        Self {
            geolocator,
            geocoder: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// A resolver that never has a position.
    pub fn unavailable() -> Self {
        Self::new(Arc::new(UnavailableGeolocator))
    }

    /// Current position, or an error after the timeout.
    pub async fn position(&self) -> Result<Coordinates> {
        tokio::time::timeout(self.timeout, self.geolocator.current_position())
            .await
            .map_err(|_| DispatchError::Timeout(self.timeout))?
    }

    async fn place_name(&self, position: Coordinates) -> Option<String> {
        let geocoder = self.geocoder.as_ref()?;
        match tokio::time::timeout(self.timeout, geocoder.reverse(position)).await {
            Ok(Ok(name)) => Some(name),
            Ok(Err(e)) => {
                warn!("Reverse geocoding failed: {}", e);
                None
            }
            Err(_) => {
                warn!("Reverse geocoding timed out after {:?}", self.timeout);
                None
            }
        }
    }

    /// Best available location for an emergency message. Never fails.
    pub async fn resolve(&self) -> LocationFix {
        let position = match self.position().await {
            Ok(position) => position,
            Err(e) => {
                warn!("No position for emergency message: {}", e);
                return LocationFix::Unavailable;
            }
        };

        match self.place_name(position).await {
            Some(name) => LocationFix::Place { name, position },
            None => LocationFix::Coordinates(position),
        }
    }

    /// Address for a booking form: the place name, or coordinates with a
    /// notice. Errors only when there is no position at all.
    pub async fn resolve_address(&self) -> Result<AddressFix> {
        let position = self.position().await.map_err(|e| match e {
            DispatchError::GeolocationUnsupported => e,
            _ => DispatchError::PositionUnavailable,
        })?;

        Ok(match self.place_name(position).await {
            Some(address) => AddressFix {
                address,
                notice: None,
            },
            None => AddressFix {
                address: position.to_string(),
                notice: self.geocoder.as_ref().map(|_| COORDINATES_NOTICE),
            },
        })
    }
}

impl fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationResolver")
            .field("geocoder", &self.geocoder.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}
