//! Dispatch configuration.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::Result;
use crate::location::{
    Coordinates, FixedGeolocator, Geolocator, LocationResolver, NominatimGeocoder,
    UnavailableGeolocator, DEFAULT_TIMEOUT, NOMINATIM_URL,
};
use crate::opener::{CommandOpener, LinkOpener, LoggingOpener};
use crate::whatsapp::DEFAULT_BUSINESS_NUMBER;

/// Where messages go and how the device position is found.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// WhatsApp number that receives requests.
    pub business_number: String,
    /// Nominatim base URL. `None` disables reverse geocoding.
    pub nominatim_url: Option<String>,
    /// Bound on position and geocoding lookups.
    pub location_timeout: Duration,
    /// Device position, when known.
    pub position: Option<Coordinates>,
    /// Program used to open links. `None` logs them instead.
    pub open_command: Option<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            business_number: DEFAULT_BUSINESS_NUMBER.to_string(),
            nominatim_url: Some(NOMINATIM_URL.to_string()),
            location_timeout: DEFAULT_TIMEOUT,
            position: None,
            open_command: None,
        }
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = non_empty(name)?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}", name, value);
            None
        }
    }
}

impl DispatchConfig {
    /// Load configuration from environment variables.
    ///
    /// `NOMINATIM_URL=off` disables reverse geocoding. A position is only
    /// used when both latitude and longitude parse.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let nominatim_url = match non_empty("NOMINATIM_URL") {
            Some(url) if url.eq_ignore_ascii_case("off") => None,
            Some(url) => Some(url),
            None => defaults.nominatim_url,
        };

        let position = match (
            parse_var::<f64>("EB_RESCUE_LATITUDE"),
            parse_var::<f64>("EB_RESCUE_LONGITUDE"),
        ) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        };

        Self {
            business_number: non_empty("EB_RESCUE_WHATSAPP_NUMBER")
                .unwrap_or(defaults.business_number),
            nominatim_url,
            location_timeout: parse_var::<u64>("EB_RESCUE_GEOLOCATION_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.location_timeout),
            position,
            open_command: non_empty("EB_RESCUE_OPEN_COMMAND"),
        }
    }

    /// Create a builder for DispatchConfig.
    pub fn builder() -> DispatchConfigBuilder {
        DispatchConfigBuilder::default()
    }

    /// Opener for deep links.
    pub fn build_opener(&self) -> Arc<dyn LinkOpener> {
        match &self.open_command {
            Some(program) => {
                info!("Opening links with {}", program);
                Arc::new(CommandOpener::new(program.clone()))
            }
            None => Arc::new(LoggingOpener),
        }
    }

    /// Position source plus reverse geocoder.
    pub fn build_resolver(&self) -> Result<LocationResolver> {
        let geolocator: Arc<dyn Geolocator> = match self.position {
            Some(position) => Arc::new(FixedGeolocator(position)),
            None => Arc::new(UnavailableGeolocator),
        };

        let mut resolver = LocationResolver::new(geolocator).with_timeout(self.location_timeout);
        if let Some(url) = &self.nominatim_url {
            resolver = resolver.with_geocoder(Arc::new(NominatimGeocoder::new(url.clone())?));
        }
        Ok(resolver)
    }
}

/// Builder for DispatchConfig.
#[derive(Debug, Default)]
pub struct DispatchConfigBuilder {
    config: DispatchConfig,
}

impl DispatchConfigBuilder {
    pub fn business_number(mut self, number: impl Into<String>) -> Self {
        self.config.business_number = number.into();
        self
    }

    pub fn nominatim_url(mut self, url: Option<String>) -> Self {
        self.config.nominatim_url = url;
        self
    }

    pub fn location_timeout(mut self, timeout: Duration) -> Self {
        self.config.location_timeout = timeout;
        self
    }

    pub fn position(mut self, latitude: f64, longitude: f64) -> Self {
        self.config.position = Some(Coordinates::new(latitude, longitude));
        self
    }

    pub fn open_command(mut self, program: impl Into<String>) -> Self {
        self.config.open_command = Some(program.into());
        self
    }

    pub fn build(self) -> DispatchConfig {
        self.config
    }
}
