//! Text content of the result and information screens.

use rescue_core::{BookingKind, RepairRecord};

use crate::router::LastResult;

/// Location step heading and instructions.
pub const LOCATION_STEP_TITLE: &str = "只差一步! 必須發送位置";
pub const LOCATION_STEP_BODY: &str =
    "您的資料已暫存。為了讓師傅準確找到您，請在 WhatsApp 發送「實時位置」以確認請求。";

/// Confirmation screen for the last submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessSummary {
    pub title: &'static str,
    pub message: &'static str,
    /// Labelled values, in display order.
    pub fields: Vec<(&'static str, String)>,
}

impl SuccessSummary {
    /// Build the summary. `reference` is the number shown to the customer.
    pub fn new(result: &LastResult, phone: Option<&str>, reference: u32) -> Self {
        match result {
            LastResult::Emergency(request) => {
                let mut fields = vec![
                    ("請求編號", format!("#{}", reference)),
                    ("聯絡電話", phone.unwrap_or_default().to_string()),
                    ("車輛", request.car_brand.clone()),
                ];
                if let Some(analysis) = &request.ai_analysis {
                    fields.push(("AI 備註", analysis.clone()));
                }
                Self {
                    title: "求助請求已確認",
                    message: "我們已收到您的位置及資料，救援團隊將盡快出發。請保持電話暢通。",
                    fields,
                }
            }
            LastResult::Booking(request) => {
                let mut fields = vec![
                    ("預約編號", format!("#{}", reference)),
                    ("服務項目", request.kind.title().to_string()),
                    ("預約時間", format!("{} {}", request.date, request.time)),
                    ("服務地點", request.address.clone()),
                    ("車輛", request.car_brand.clone()),
                ];
                if request.kind == BookingKind::TireChange {
                    if let Some(size) = request.tire_size() {
                        fields.push(("輪胎尺寸", size));
                    }
                }
                if let Some(comment) = request.comment.as_ref().filter(|c| !c.is_empty()) {
                    fields.push(("備註", comment.clone()));
                }
                Self {
                    title: "預約已確認",
                    message: "我們已收到您的預約，客服將會在 30 分鐘內聯絡您確認細節。",
                    fields,
                }
            }
            LastResult::Review(review) => {
                let mut fields = vec![(
                    "評分",
                    format!(
                        "{} {}.0 {}",
                        review.stars(),
                        review.rating,
                        review.rating_label()
                    ),
                )];
                if !review.comment.is_empty() {
                    fields.push(("您的留言", format!("\"{}\"", review.comment)));
                }
                if review.photo.is_some() {
                    fields.push(("已上傳照片", "✓".to_string()));
                }
                Self {
                    title: "感謝您的評價!",
                    message: "我們已收到您的寶貴意見，如有需要，客服會透過 WhatsApp 跟進。",
                    fields,
                }
            }
        }
    }
}

/// One line of the history list.
pub fn history_line(record: &RepairRecord) -> String {
    let mut line = format!(
        "{} [{}] {} | {} | {}",
        record.date_str,
        record.status.label(),
        record.service_type,
        record.car_brand,
        record.details
    );
    if let Some(amount) = &record.amount {
        line.push_str(&format!(" | {}", amount));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescue_core::{EmergencyRequest, RecordStatus, ReviewRequest, ServiceRequest, TirePosition};

    #[test]
    fn test_emergency_summary() {
        let result = LastResult::Emergency(EmergencyRequest {
            name: "陳大文".to_string(),
            car_brand: "Tesla".to_string(),
            tire_position: TirePosition::FrontLeft,
            photo: None,
            ai_analysis: Some("輪胎漏氣".to_string()),
        });

        let summary = SuccessSummary::new(&result, Some("91234567"), 42);
        assert_eq!(summary.title, "求助請求已確認");
        assert_eq!(summary.fields[0], ("請求編號", "#42".to_string()));
        assert_eq!(summary.fields[1], ("聯絡電話", "91234567".to_string()));
        assert_eq!(summary.fields[3], ("AI 備註", "輪胎漏氣".to_string()));
    }

    #[test]
    fn test_booking_summary() {
        let result = LastResult::Booking(ServiceRequest {
            kind: BookingKind::Maintenance,
            address: "觀塘偉業街169號".to_string(),
            date: "2026-10-20".to_string(),
            time: "10:00".to_string(),
            car_brand: "Honda".to_string(),
            tire_width: None,
            tire_aspect_ratio: None,
            tire_diameter: None,
            contact_name: "陳大文".to_string(),
            contact_phone: "91234567".to_string(),
            photo: None,
            comment: Some("換機油".to_string()),
        });

        let summary = SuccessSummary::new(&result, None, 7);
        assert_eq!(summary.title, "預約已確認");
        assert!(summary.message.contains("30 分鐘"));
        assert!(summary
            .fields
            .contains(&("服務項目", "汽車定期保養".to_string())));
        assert!(summary.fields.contains(&("預約時間", "2026-10-20 10:00".to_string())));
        assert_eq!(summary.fields.last(), Some(&("備註", "換機油".to_string())));
    }

    #[test]
    fn test_review_summary() {
        let result = LastResult::Review(ReviewRequest {
            rating: 3,
            comment: String::new(),
            photo: Some("data:image/jpeg;base64,AAAA".to_string()),
            timestamp: None,
        });

        let summary = SuccessSummary::new(&result, None, 1);
        assert_eq!(summary.title, "感謝您的評價!");
        assert_eq!(summary.fields[0], ("評分", "⭐⭐⭐ 3.0 普通".to_string()));
        assert_eq!(summary.fields[1].0, "已上傳照片");
    }

    #[test]
    fn test_history_line() {
        let record = RepairRecord {
            id: "mnt-1".to_string(),
            timestamp: 1,
            date_str: "2026/10/16".to_string(),
            service_type: "汽車定期保養 (Maintenance)".to_string(),
            car_brand: "Honda".to_string(),
            details: "2026-10-20 10:00 @ 觀塘".to_string(),
            status: RecordStatus::Completed,
            amount: Some("$1,200".to_string()),
        };
        assert_eq!(
            history_line(&record),
            "2026/10/16 [已完成] 汽車定期保養 (Maintenance) | Honda | 2026-10-20 10:00 @ 觀塘 | $1,200"
        );
    }
}
