//! Row payloads for the remote tables.
//!
//! Column names are snake_case as in the hosted schema. Optional columns are
//! omitted rather than sent as `null` so PostgREST defaults apply.

use rescue_core::{EmergencyRequest, ReviewRequest, ServiceRequest, UserProfile};
use serde::{Deserialize, Serialize};

/// A row in `users`, keyed by phone number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

impl UserRow {
    /// A freshly verified phone number with no profile yet.
    pub fn verified(phone: impl Into<String>) -> Self {
        Self {
            phone_number: phone.into(),
            is_verified: Some(true),
            ..Default::default()
        }
    }
}

impl From<&UserProfile> for UserRow {
    fn from(profile: &UserProfile) -> Self {
        Self {
            phone_number: profile.phone_number.clone(),
            name: Some(profile.name.clone()),
            car_brand: Some(profile.car_brand.clone()),
            license_plate: profile
                .license_plate
                .clone()
                .filter(|plate| !plate.trim().is_empty()),
            is_verified: Some(profile.is_verified),
        }
    }
}

/// A row in `orders`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRow {
    pub phone_number: String,
    pub service_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tire_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tire_aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tire_diameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_base64: Option<String>,
    pub status: String,
}

impl OrderRow {
    /// Order for a booking made by `phone`.
    pub fn from_booking(phone: &str, request: &ServiceRequest) -> Self {
        Self {
            phone_number: phone.to_string(),
            service_type: request.kind.service_id().to_string(),
            contact_name: Some(request.contact_name.clone()),
            contact_phone: Some(request.contact_phone.clone()),
            car_brand: Some(request.car_brand.clone()),
            address: Some(request.address.clone()),
            date: Some(request.date.clone()),
            time: Some(request.time.clone()),
            tire_width: request.tire_width.clone(),
            tire_aspect_ratio: request.tire_aspect_ratio.clone(),
            tire_diameter: request.tire_diameter.clone(),
            comment: request.comment.clone().filter(|c| !c.trim().is_empty()),
            photo_base64: request.photo.clone(),
            status: "pending".to_string(),
        }
    }
}

/// A row in `emergency_requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyRow {
    pub phone_number: String,
    pub contact_name: String,
    pub car_brand: String,
    pub tire_position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
    pub location_sent: bool,
    pub status: String,
}

impl EmergencyRow {
    pub fn from_request(phone: &str, request: &EmergencyRequest) -> Self {
        Self {
            phone_number: phone.to_string(),
            contact_name: request.name.clone(),
            car_brand: request.car_brand.clone(),
            tire_position: request.tire_position.label().to_string(),
            photo_base64: request.photo.clone(),
            ai_analysis: request.ai_analysis.clone(),
            location_sent: false,
            status: "pending".to_string(),
        }
    }
}

/// A row in `reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub rating: u8,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_base64: Option<String>,
}

impl ReviewRow {
    pub fn from_review(profile: Option<&UserProfile>, review: &ReviewRequest) -> Self {
        Self {
            phone_number: profile.map(|p| p.phone_number.clone()),
            name: profile.map(|p| p.name.clone()),
            rating: review.rating,
            comment: review.comment.clone(),
            photo_base64: review.photo.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescue_core::{BookingKind, TirePosition};

    #[test]
    fn test_verified_user_row_omits_profile_columns() {
        let json = serde_json::to_value(UserRow::verified("91234567")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"phone_number": "91234567", "is_verified": true})
        );
    }

    #[test]
    fn test_profile_row_drops_blank_plate() {
        let profile = UserProfile {
            phone_number: "91234567".to_string(),
            name: "陳大文".to_string(),
            car_brand: "Tesla".to_string(),
            license_plate: Some(" ".to_string()),
            is_verified: true,
        };
        let row = UserRow::from(&profile);
        assert!(row.license_plate.is_none());
        assert_eq!(row.car_brand.as_deref(), Some("Tesla"));
    }

    #[test]
    fn test_order_row_from_booking() {
        let request = ServiceRequest {
            kind: BookingKind::Maintenance,
            address: "觀塘偉業街169號".to_string(),
            date: "2026-10-20".to_string(),
            time: "10:00".to_string(),
            car_brand: "BMW".to_string(),
            tire_width: None,
            tire_aspect_ratio: None,
            tire_diameter: None,
            contact_name: "Ann".to_string(),
            contact_phone: "61234567".to_string(),
            photo: None,
            comment: Some("換機油".to_string()),
        };

        let row = OrderRow::from_booking("61234567", &request);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["service_type"], "oil-change");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["comment"], "換機油");
        assert!(json.get("tire_width").is_none());
        assert!(json.get("photo_base64").is_none());
    }

    #[test]
    fn test_emergency_row_uses_position_label() {
        let request = EmergencyRequest {
            name: "Ann".to_string(),
            car_brand: "BMW".to_string(),
            tire_position: TirePosition::FrontRight,
            photo: Some("data:image/jpeg;base64,AAAA".to_string()),
            ai_analysis: None,
        };
        let row = EmergencyRow::from_request("61234567", &request);
        assert_eq!(row.tire_position, "右前輪 (Front Right)");
        assert!(!row.location_sent);
        assert_eq!(row.photo_base64.as_deref(), Some("data:image/jpeg;base64,AAAA"));
    }

    #[test]
    fn test_guest_review_row() {
        let review = ReviewRequest {
            rating: 5,
            comment: "好快".to_string(),
            photo: None,
            timestamp: None,
        };
        let json = serde_json::to_value(ReviewRow::from_review(None, &review)).unwrap();
        assert_eq!(json, serde_json::json!({"rating": 5, "comment": "好快"}));
    }
}
