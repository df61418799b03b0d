//! Domain models.
//!
//! Field names serialise in camelCase so persisted blobs keep the shape
//! `{phoneNumber, name, carBrand, licensePlate, isVerified}` and
//! `{id, timestamp, dateStr, serviceType, carBrand, details, status, amount}`.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;

/// Display format for [`RepairRecord::date_str`].
pub const RECORD_DATE_FORMAT: &str = "%Y/%m/%d";

/// A registered member's profile, keyed by phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub phone_number: String,
    pub name: String,
    pub car_brand: String,
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

impl UserProfile {
    /// Name to greet the user with, falling back to a generic label.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Guest"
        } else {
            &self.name
        }
    }
}

/// Which wheel is damaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TirePosition {
    #[serde(rename = "左前輪 (Front Left)")]
    FrontLeft,
    #[serde(rename = "右前輪 (Front Right)")]
    FrontRight,
    #[serde(rename = "左後輪 (Rear Left)")]
    RearLeft,
    #[serde(rename = "右後輪 (Rear Right)")]
    RearRight,
}

impl TirePosition {
    pub const ALL: [TirePosition; 4] = [
        TirePosition::FrontLeft,
        TirePosition::FrontRight,
        TirePosition::RearLeft,
        TirePosition::RearRight,
    ];

    /// Bilingual label, e.g. `左前輪 (Front Left)`.
    pub fn label(&self) -> &'static str {
        match self {
            TirePosition::FrontLeft => "左前輪 (Front Left)",
            TirePosition::FrontRight => "右前輪 (Front Right)",
            TirePosition::RearLeft => "左後輪 (Rear Left)",
            TirePosition::RearRight => "右後輪 (Rear Right)",
        }
    }

    /// Chinese-only label used on buttons.
    pub fn short_label(&self) -> &'static str {
        match self {
            TirePosition::FrontLeft => "左前輪",
            TirePosition::FrontRight => "右前輪",
            TirePosition::RearLeft => "左後輪",
            TirePosition::RearRight => "右後輪",
        }
    }
}

/// An emergency (flat tire) rescue request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyRequest {
    pub name: String,
    pub car_brand: String,
    pub tire_position: TirePosition,
    /// Inline data URL of the damaged tire.
    pub photo: Option<String>,
    pub ai_analysis: Option<String>,
}

/// Scheduled bookings share one request shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingKind {
    #[serde(rename = "24h-change")]
    TireChange,
    #[serde(rename = "oil-change")]
    Maintenance,
}

impl BookingKind {
    /// Dashboard service id.
    pub fn service_id(&self) -> &'static str {
        match self {
            BookingKind::TireChange => "24h-change",
            BookingKind::Maintenance => "oil-change",
        }
    }

    /// Title shown on the confirmation screen.
    pub fn title(&self) -> &'static str {
        match self {
            BookingKind::TireChange => "24小時換呔服務",
            BookingKind::Maintenance => "汽車定期保養",
        }
    }
}

/// A tire change or maintenance booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    #[serde(rename = "serviceId")]
    pub kind: BookingKind,
    pub address: String,
    pub date: String,
    pub time: String,
    pub car_brand: String,
    pub tire_width: Option<String>,
    pub tire_aspect_ratio: Option<String>,
    pub tire_diameter: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub photo: Option<String>,
    pub comment: Option<String>,
}

impl ServiceRequest {
    /// `205/55 R16` style label when all three tire dimensions are present.
    pub fn tire_size(&self) -> Option<String> {
        match (&self.tire_width, &self.tire_aspect_ratio, &self.tire_diameter) {
            (Some(w), Some(r), Some(d)) => Some(format!("{}/{} R{}", w, r, d)),
            _ => None,
        }
    }
}

/// A customer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub rating: u8,
    pub comment: String,
    pub photo: Option<String>,
    pub timestamp: Option<i64>,
}

impl ReviewRequest {
    /// Satisfaction label for the rating.
    pub fn rating_label(&self) -> &'static str {
        rating_label(self.rating)
    }

    /// `⭐` repeated once per star.
    pub fn stars(&self) -> String {
        "⭐".repeat(self.rating.min(5) as usize)
    }
}

/// Satisfaction label for a 1-5 rating (empty outside the range).
pub fn rating_label(rating: u8) -> &'static str {
    match rating {
        1 => "非常不滿意",
        2 => "不滿意",
        3 => "普通",
        4 => "滿意",
        5 => "非常滿意!",
        _ => "",
    }
}

/// Progress of a logged request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl RecordStatus {
    /// Label shown in the history list.
    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "處理中",
            RecordStatus::Processing => "跟進中",
            RecordStatus::Completed => "已完成",
            RecordStatus::Cancelled => "已取消",
        }
    }
}

/// What kind of request a history record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordCategory {
    Emergency,
    TireChange,
    Maintenance,
}

impl RecordCategory {
    /// Prefix of record ids in this category.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            RecordCategory::Emergency => "sos",
            RecordCategory::TireChange => "svc",
            RecordCategory::Maintenance => "mnt",
        }
    }

    /// Service type label stored on the record.
    pub fn service_type(&self) -> &'static str {
        match self {
            RecordCategory::Emergency => "緊急維修 (Emergency SOS)",
            RecordCategory::TireChange => "24小時換呔 (Tire Change)",
            RecordCategory::Maintenance => "汽車定期保養 (Maintenance)",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "sos" => Some(RecordCategory::Emergency),
            "svc" => Some(RecordCategory::TireChange),
            "mnt" => Some(RecordCategory::Maintenance),
            _ => None,
        }
    }
}

impl From<BookingKind> for RecordCategory {
    fn from(kind: BookingKind) -> Self {
        match kind {
            BookingKind::TireChange => RecordCategory::TireChange,
            BookingKind::Maintenance => RecordCategory::Maintenance,
        }
    }
}

/// One completed customer request in the repair history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairRecord {
    pub id: String,
    /// Unix milliseconds, used for ordering.
    pub timestamp: i64,
    pub date_str: String,
    pub service_type: String,
    pub car_brand: String,
    pub details: String,
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

impl RepairRecord {
    fn stamped(
        category: RecordCategory,
        clock: &dyn Clock,
        car_brand: &str,
        details: String,
        status: RecordStatus,
    ) -> Self {
        let timestamp = clock.timestamp_millis();
        Self {
            id: format!("{}-{}", category.id_prefix(), timestamp),
            timestamp,
            date_str: clock.now().format(RECORD_DATE_FORMAT).to_string(),
            service_type: category.service_type().to_string(),
            car_brand: car_brand.to_string(),
            details,
            status,
            amount: None,
        }
    }

    /// Record for a dispatched emergency request.
    pub fn emergency(request: &EmergencyRequest, clock: &dyn Clock) -> Self {
        Self::stamped(
            RecordCategory::Emergency,
            clock,
            &request.car_brand,
            format!("Tire: {}", request.tire_position.label()),
            RecordStatus::Processing,
        )
    }

    /// Record for a tire change or maintenance booking.
    pub fn booking(request: &ServiceRequest, clock: &dyn Clock) -> Self {
        Self::stamped(
            request.kind.into(),
            clock,
            &request.car_brand,
            format!("{} {} @ {}", request.date, request.time, request.address),
            RecordStatus::Pending,
        )
    }

    /// Category derived from the id prefix.
    pub fn category(&self) -> Option<RecordCategory> {
        self.id
            .split_once('-')
            .and_then(|(prefix, _)| RecordCategory::from_prefix(prefix))
    }
}
