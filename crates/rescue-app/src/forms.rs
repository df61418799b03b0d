//! Form state and submit-time validation.
//!
//! Each form holds raw user input and turns it into a request DTO on submit.
//! The first failed rule is returned; nothing is submitted on failure.

use dispatch::{DispatchError, LocationResolver};
use rescue_core::tires::TireSelection;
use rescue_core::validation::{
    validate_address, validate_car_brand, validate_date, validate_license_plate, validate_name,
    validate_rating, validate_time,
};
use rescue_core::{
    BookingKind, Clock, EmergencyRequest, ReviewRequest, ServiceRequest, TirePosition,
    UserProfile, ValidationError,
};
use tire_vision::AnalyzerChain;

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

/// Profile completion after registration.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub car_brand: String,
    pub license_plate: String,
}

impl ProfileForm {
    pub fn submit(&self, phone: &str) -> Result<UserProfile, ValidationError> {
        if blank(&self.name) || blank(&self.car_brand) {
            return Err(ValidationError::MissingProfileFields);
        }
        validate_name(&self.name)?;
        validate_car_brand(&self.car_brand)?;
        validate_license_plate(&self.license_plate)?;

        Ok(UserProfile {
            phone_number: phone.to_string(),
            name: trimmed(&self.name),
            car_brand: trimmed(&self.car_brand),
            license_plate: Some(trimmed(&self.license_plate)).filter(|p| !p.is_empty()),
            is_verified: true,
        })
    }
}

/// Flat tire rescue request.
#[derive(Debug, Clone, Default)]
pub struct EmergencyForm {
    pub name: String,
    pub car_brand: String,
    pub tire_position: Option<TirePosition>,
    photo: Option<String>,
    ai_analysis: Option<String>,
}

impl EmergencyForm {
    /// A form with the contact and vehicle taken from the profile.
    pub fn prefilled(profile: Option<&UserProfile>) -> Self {
        Self {
            name: profile.map(|p| p.name.clone()).unwrap_or_default(),
            car_brand: profile.map(|p| p.car_brand.clone()).unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Attach a photo (data URL) and run the tire analysis on it.
    ///
    /// Analysis never fails; when no provider answers the analysis holds the
    /// unavailable notice.
    pub async fn attach_photo(&mut self, photo: String, analyzer: &AnalyzerChain) -> &str {
        let analysis = analyzer.analyze(&photo).await;
        self.photo = Some(photo);
        self.ai_analysis.insert(analysis)
    }

    pub fn remove_photo(&mut self) {
        self.photo = None;
        self.ai_analysis = None;
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    pub fn ai_analysis(&self) -> Option<&str> {
        self.ai_analysis.as_deref()
    }

    pub fn submit(&self) -> Result<EmergencyRequest, ValidationError> {
        let tire_position = match self.tire_position {
            Some(position) if !blank(&self.name) && !blank(&self.car_brand) => position,
            _ => return Err(ValidationError::MissingRequired),
        };
        validate_name(&self.name)?;
        validate_car_brand(&self.car_brand)?;

        Ok(EmergencyRequest {
            name: trimmed(&self.name),
            car_brand: trimmed(&self.car_brand),
            tire_position,
            photo: self.photo.clone(),
            ai_analysis: self.ai_analysis.clone(),
        })
    }
}

/// Tire change or maintenance booking.
#[derive(Debug, Clone)]
pub struct BookingForm {
    kind: BookingKind,
    pub address: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub car_brand: String,
    /// Tire size; required for tire changes only.
    pub tires: TireSelection,
    pub photo: Option<String>,
    /// Service details; required for maintenance only.
    pub comment: String,
}

impl BookingForm {
    pub fn new(kind: BookingKind) -> Self {
        Self {
            kind,
            address: String::new(),
            date: String::new(),
            time: String::new(),
            car_brand: String::new(),
            tires: TireSelection::default(),
            photo: None,
            comment: String::new(),
        }
    }

    /// A form with the vehicle taken from the profile.
    pub fn prefilled(kind: BookingKind, profile: Option<&UserProfile>) -> Self {
        Self {
            car_brand: profile.map(|p| p.car_brand.clone()).unwrap_or_default(),
            ..Self::new(kind)
        }
    }

    pub fn kind(&self) -> BookingKind {
        self.kind
    }

    /// Fill the address from the current position.
    ///
    /// Returns a notice when only coordinates could be filled in.
    pub async fn autofill_address(
        &mut self,
        resolver: &LocationResolver,
    ) -> Result<Option<&'static str>, DispatchError> {
        let fix = resolver.resolve_address().await?;
        self.address = fix.address;
        Ok(fix.notice)
    }

    fn missing_required(&self) -> bool {
        let common = [&self.address, &self.date, &self.time, &self.car_brand]
            .iter()
            .any(|v| blank(v));
        common
            || match self.kind {
                BookingKind::TireChange => !self.tires.is_complete(),
                BookingKind::Maintenance => blank(&self.comment),
            }
    }

    /// Validate and build the request. Contact details come from the profile.
    pub fn submit(
        &self,
        contact: &UserProfile,
        clock: &dyn Clock,
    ) -> Result<ServiceRequest, ValidationError> {
        if self.missing_required() {
            return Err(ValidationError::MissingRequired);
        }
        validate_date(&self.date, clock.today())?;
        validate_time(&self.time, &self.date, clock.now())?;
        validate_address(&self.address)?;
        validate_car_brand(&self.car_brand)?;

        let tire = |value: Option<&str>| match self.kind {
            BookingKind::TireChange => value.map(str::to_string),
            BookingKind::Maintenance => None,
        };
        let comment = match self.kind {
            BookingKind::Maintenance => Some(trimmed(&self.comment)),
            BookingKind::TireChange => Some(trimmed(&self.comment)).filter(|c| !c.is_empty()),
        };

        Ok(ServiceRequest {
            kind: self.kind,
            address: trimmed(&self.address),
            date: trimmed(&self.date),
            time: trimmed(&self.time),
            car_brand: trimmed(&self.car_brand),
            tire_width: tire(self.tires.width()),
            tire_aspect_ratio: tire(self.tires.aspect_ratio()),
            tire_diameter: tire(self.tires.diameter()),
            contact_name: contact.name.clone(),
            contact_phone: contact.phone_number.clone(),
            photo: self.photo.clone(),
            comment,
        })
    }
}

/// Star rating with an optional comment and photo.
#[derive(Debug, Clone)]
pub struct ReviewForm {
    pub rating: u8,
    pub comment: String,
    pub photo: Option<String>,
}

impl Default for ReviewForm {
    fn default() -> Self {
        Self {
            rating: 5,
            comment: String::new(),
            photo: None,
        }
    }
}

impl ReviewForm {
    pub fn submit(&self, clock: &dyn Clock) -> Result<ReviewRequest, ValidationError> {
        validate_rating(self.rating)?;
        Ok(ReviewRequest {
            rating: self.rating,
            comment: trimmed(&self.comment),
            photo: self.photo.clone(),
            timestamp: Some(clock.timestamp_millis()),
        })
    }
}
