//! Screen and dashboard identifiers.

use std::fmt;

/// Every screen the app can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Registration,
    UserProfile,
    Dashboard,
    EmergencyForm,
    /// Location capture between emergency submit and confirmation.
    EmergencyLocationStep,
    ServiceForm,
    MaintenanceForm,
    ReviewForm,
    RepairHistory,
    RepairLocation,
    RimDesign,
    Success,
}

impl View {
    /// Stable upper-case name, as used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Registration => "REGISTRATION",
            View::UserProfile => "USER_PROFILE",
            View::Dashboard => "DASHBOARD",
            View::EmergencyForm => "EMERGENCY_FORM",
            View::EmergencyLocationStep => "EMERGENCY_LOCATION_STEP",
            View::ServiceForm => "SERVICE_FORM",
            View::MaintenanceForm => "MAINTENANCE_FORM",
            View::ReviewForm => "REVIEW_FORM",
            View::RepairHistory => "REPAIR_HISTORY",
            View::RepairLocation => "REPAIR_LOCATION",
            View::RimDesign => "RIM_DESIGN",
            View::Success => "SUCCESS",
        }
    }

    /// Whether this screen is an input form that can be cancelled.
    pub fn is_form(&self) -> bool {
        matches!(
            self,
            View::EmergencyForm
                | View::ServiceForm
                | View::MaintenanceForm
                | View::ReviewForm
                | View::RimDesign
        )
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dashboard entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceId {
    EmergencyFlat,
    TireChange,
    Repair,
    Inspection,
    OilChange,
    RimDesign,
    Review,
    History,
}

impl ServiceId {
    /// Entries in dashboard order. Rim design is appended only when enabled.
    pub const DASHBOARD: [ServiceId; 6] = [
        ServiceId::EmergencyFlat,
        ServiceId::TireChange,
        ServiceId::Repair,
        ServiceId::Inspection,
        ServiceId::OilChange,
        ServiceId::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::EmergencyFlat => "emergency-flat",
            ServiceId::TireChange => "24h-change",
            ServiceId::Repair => "repair",
            ServiceId::Inspection => "inspection",
            ServiceId::OilChange => "oil-change",
            ServiceId::RimDesign => "rim-design",
            ServiceId::Review => "review",
            ServiceId::History => "history",
        }
    }

    /// Parse a dashboard id. Unknown ids return `None`.
    pub fn parse(id: &str) -> Option<Self> {
        match id.trim() {
            "emergency-flat" => Some(ServiceId::EmergencyFlat),
            "24h-change" => Some(ServiceId::TireChange),
            "repair" => Some(ServiceId::Repair),
            "inspection" => Some(ServiceId::Inspection),
            "oil-change" => Some(ServiceId::OilChange),
            "rim-design" => Some(ServiceId::RimDesign),
            "review" => Some(ServiceId::Review),
            "history" => Some(ServiceId::History),
            _ => None,
        }
    }

    /// Dashboard title.
    pub fn title(&self) -> &'static str {
        match self {
            ServiceId::EmergencyFlat => "爆呔緊急維修",
            ServiceId::TireChange => "24小時換呔服務",
            ServiceId::Repair => "補呔服務",
            ServiceId::Inspection => "驗車服務",
            ServiceId::OilChange => "預約汽車定期保養",
            ServiceId::RimDesign => "AI 輪圈改色",
            ServiceId::Review => "評價服務",
            ServiceId::History => "維修記錄",
        }
    }

    pub fn is_emergency(&self) -> bool {
        matches!(self, ServiceId::EmergencyFlat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_id_round_trip() {
        for id in ServiceId::DASHBOARD {
            assert_eq!(ServiceId::parse(id.as_str()), Some(id));
        }
        assert_eq!(ServiceId::parse("rim-design"), Some(ServiceId::RimDesign));
        assert_eq!(ServiceId::parse(" history "), Some(ServiceId::History));
        assert_eq!(ServiceId::parse("car-wash"), None);
    }

    #[test]
    fn test_inspection_has_no_dedicated_screen_marker() {
        // Inspection is listed on the dashboard but handled by acknowledgment.
        assert!(ServiceId::DASHBOARD.contains(&ServiceId::Inspection));
        assert!(!ServiceId::Inspection.is_emergency());
        assert!(ServiceId::EmergencyFlat.is_emergency());
    }

    #[test]
    fn test_form_views() {
        assert!(View::EmergencyForm.is_form());
        assert!(View::ReviewForm.is_form());
        assert!(!View::Dashboard.is_form());
        assert!(!View::EmergencyLocationStep.is_form());
        assert_eq!(View::Success.to_string(), "SUCCESS");
    }
}
