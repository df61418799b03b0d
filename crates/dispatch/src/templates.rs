//! Pre-filled WhatsApp messages, one per flow.
//!
//! Free text typed by the user goes through [`sanitize_input`] before it is
//! placed in a message.

use rescue_core::validation::sanitize_input;
use rescue_core::{BookingKind, EmergencyRequest, ReviewRequest, ServiceRequest, UserProfile};

use crate::location::LocationFix;

const RULE: &str = "---------------------------";

/// Fallback text sent when no position could be attached.
pub const LIVE_LOCATION_FALLBACK: &str =
    "你好，這是我的實時位置 (Live Location)，我需要緊急救援。";

/// Instructions appended when the position is unavailable.
pub const MANUAL_LOCATION_INSTRUCTIONS: &str =
    "⚠️ 未能自動獲取位置，請在 WhatsApp 中按「📎 > 位置 > 分享實時位置」傳送您的位置。";

/// Booking confirmation request for the business.
pub fn booking_message(request: &ServiceRequest) -> String {
    let (icon, closing) = match request.kind {
        BookingKind::TireChange => ("🛠️", "請盡快確認訂單。"),
        BookingKind::Maintenance => ("🔧", "請盡快確認預約。"),
    };

    let mut lines = vec![
        format!("{} *新預約: {}*", icon, request.kind.title()),
        RULE.to_string(),
        format!(
            "👤 *客戶:* {} ({})",
            sanitize_input(&request.contact_name),
            sanitize_input(&request.contact_phone)
        ),
        format!("🚗 *車輛:* {}", sanitize_input(&request.car_brand)),
        format!("📍 *地點:* {}", sanitize_input(&request.address)),
        format!("📅 *日期:* {}", request.date.trim()),
        format!("🕒 *時間:* {}", request.time.trim()),
    ];

    match request.kind {
        BookingKind::TireChange => {
            let size = request.tire_size().unwrap_or_else(|| "-".to_string());
            lines.push(format!("🔘 *輪胎:* {}", size));
        }
        BookingKind::Maintenance => {
            let comment = request
                .comment
                .as_deref()
                .map(sanitize_input)
                .unwrap_or_default();
            lines.push(format!("📝 *詳情:* {}", comment));
        }
    }

    lines.push(RULE.to_string());
    lines.push(closing.to_string());
    lines.join("\n")
}

/// New review notification.
pub fn review_message(profile: Option<&UserProfile>, review: &ReviewRequest) -> String {
    let name = profile.map(UserProfile::display_name).unwrap_or("Guest");
    let comment = sanitize_input(&review.comment);
    let comment = if comment.is_empty() {
        "無 (No comment)".to_string()
    } else {
        comment
    };

    let mut lines = vec![
        "🌟 *新評價 (New Review)*".to_string(),
        RULE.to_string(),
        format!("👤 *客戶:* {}", sanitize_input(name)),
        format!("📊 *評分:* {} ({}/5)", review.stars(), review.rating),
        format!("💬 *意見:* {}", comment),
        RULE.to_string(),
    ];
    if review.photo.is_some() {
        lines.push("(圖片已在 App 中上傳)".to_string());
    }
    lines.join("\n")
}

/// Emergency rescue request with whatever location could be found.
pub fn emergency_message(
    request: &EmergencyRequest,
    phone: Option<&str>,
    location: &LocationFix,
) -> String {
    let contact = match phone {
        Some(phone) => format!("{} ({})", sanitize_input(&request.name), phone),
        None => sanitize_input(&request.name),
    };

    let mut lines = vec![
        "🚨 *緊急求助: 爆呔救援*".to_string(),
        RULE.to_string(),
        format!("👤 *客戶:* {}", contact),
        format!("🚗 *車輛:* {}", sanitize_input(&request.car_brand)),
        format!("🔘 *輪胎位置:* {}", request.tire_position.label()),
    ];

    if let Some(analysis) = request
        .ai_analysis
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
    {
        lines.push(format!("🤖 *AI 分析:* {}", analysis));
    }

    lines.push(RULE.to_string());
    match location {
        LocationFix::Place { name, position } => {
            lines.push(format!("📍 *位置:* {}", name));
            lines.push(position.map_link());
        }
        LocationFix::Coordinates(position) => {
            lines.push(format!("📍 *座標:* {}", position));
            lines.push(position.map_link());
        }
        LocationFix::Unavailable => {
            lines.push(LIVE_LOCATION_FALLBACK.to_string());
            lines.push(MANUAL_LOCATION_INSTRUCTIONS.to_string());
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Coordinates;
    use rescue_core::TirePosition;

    fn booking(kind: BookingKind) -> ServiceRequest {
        ServiceRequest {
            kind,
            address: " 觀塘偉業街169號 ".to_string(),
            date: "2026-10-20".to_string(),
            time: "10:30".to_string(),
            car_brand: "Toyota <Prius>".to_string(),
            tire_width: Some("205".to_string()),
            tire_aspect_ratio: Some("55".to_string()),
            tire_diameter: Some("16".to_string()),
            contact_name: "陳大文".to_string(),
            contact_phone: "91234567".to_string(),
            photo: None,
            comment: Some("換機油".to_string()),
        }
    }

    fn emergency() -> EmergencyRequest {
        EmergencyRequest {
            name: "陳大文".to_string(),
            car_brand: "Tesla Model 3".to_string(),
            tire_position: TirePosition::RearLeft,
            photo: None,
            ai_analysis: Some("輪胎明顯漏氣".to_string()),
        }
    }

    #[test]
    fn test_tire_change_message() {
        let message = booking_message(&booking(BookingKind::TireChange));
        assert_eq!(
            message,
            "🛠️ *新預約: 24小時換呔服務*\n\
             ---------------------------\n\
             👤 *客戶:* 陳大文 (91234567)\n\
             🚗 *車輛:* Toyota Prius\n\
             📍 *地點:* 觀塘偉業街169號\n\
             📅 *日期:* 2026-10-20\n\
             🕒 *時間:* 10:30\n\
             🔘 *輪胎:* 205/55 R16\n\
             ---------------------------\n\
             請盡快確認訂單。"
        );
    }

    #[test]
    fn test_maintenance_message_has_details_not_tires() {
        let message = booking_message(&booking(BookingKind::Maintenance));
        assert!(message.starts_with("🔧 *新預約: 汽車定期保養*"));
        assert!(message.contains("📝 *詳情:* 換機油"));
        assert!(!message.contains("輪胎"));
        assert!(message.ends_with("請盡快確認預約。"));
    }

    #[test]
    fn test_review_message() {
        let review = ReviewRequest {
            rating: 4,
            comment: "  ".to_string(),
            photo: Some("data:image/jpeg;base64,AAAA".to_string()),
            timestamp: None,
        };

        let message = review_message(None, &review);
        assert!(message.contains("👤 *客戶:* Guest"));
        assert!(message.contains("📊 *評分:* ⭐⭐⭐⭐ (4/5)"));
        assert!(message.contains("💬 *意見:* 無 (No comment)"));
        assert!(message.ends_with("(圖片已在 App 中上傳)"));
    }

    #[test]
    fn test_emergency_message_with_place() {
        let fix = LocationFix::Place {
            name: "觀塘偉業街".to_string(),
            position: Coordinates::new(22.3118, 114.2199),
        };
        let message = emergency_message(&emergency(), Some("91234567"), &fix);

        assert!(message.contains("👤 *客戶:* 陳大文 (91234567)"));
        assert!(message.contains("🔘 *輪胎位置:* 左後輪 (Rear Left)"));
        assert!(message.contains("🤖 *AI 分析:* 輪胎明顯漏氣"));
        assert!(message.contains("📍 *位置:* 觀塘偉業街"));
        assert!(message.ends_with("https://www.google.com/maps?q=22.3118,114.2199"));
    }

    #[test]
    fn test_emergency_message_with_coordinates_only() {
        let mut request = emergency();
        request.ai_analysis = None;
        let fix = LocationFix::Coordinates(Coordinates::new(22.3, 114.2));

        let message = emergency_message(&request, None, &fix);
        assert!(message.contains("👤 *客戶:* 陳大文\n"));
        assert!(message.contains("📍 *座標:* 22.3, 114.2"));
        assert!(!message.contains("AI 分析"));
    }

    #[test]
    fn test_emergency_message_without_location() {
        let message = emergency_message(&emergency(), None, &LocationFix::Unavailable);
        assert!(message.contains(LIVE_LOCATION_FALLBACK));
        assert!(message.ends_with(MANUAL_LOCATION_INSTRUCTIONS));
        assert!(!message.contains("google.com/maps"));
    }
}
