//! Caption to tire-condition assessment.
//!
//! Captioning models describe the photo in plain words; the assessment is
//! picked by keyword, checked in order flat, damage, blowout, wear.

/// Shown when no provider produced an analysis.
pub const ANALYSIS_UNAVAILABLE: &str = "AI 分析暫時不可用，請稍後再試或直接聯繫客服。";

/// Shown when a provider answered without usable text.
pub const NO_RESULT: &str = "無法分析圖片，請稍後再試。";

/// Used when every caption model fails.
pub const GENERIC_ASSESSMENT: &str =
    "根據圖片分析，輪胎可能需要專業檢查。建議：請勿繼續行駛，立即聯繫專業技師進行檢查，確保行車安全。";

/// Tire condition inferred from a caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TireCondition {
    Flat,
    Damaged,
    BlownOut,
    Worn,
    Unknown,
}

const FLAT: &[&str] = &["flat", "deflated", "low", "empty", "低", "漏氣"];
const DAMAGED: &[&str] = &["damaged", "puncture", "hole", "tear", "損壞", "刺破", "破洞"];
const BLOWN_OUT: &[&str] = &["blown", "burst", "exploded", "ruptured", "爆裂", "爆胎"];
const WORN: &[&str] = &["worn", "bald", "tread", "磨損", "光滑"];

impl TireCondition {
    /// Classify a caption. Matching is case-insensitive substring search.
    pub fn from_caption(caption: &str) -> Self {
        let caption = caption.to_lowercase();
        let has_any = |words: &[&str]| words.iter().any(|w| caption.contains(w));

        if has_any(FLAT) {
            TireCondition::Flat
        } else if has_any(DAMAGED) {
            TireCondition::Damaged
        } else if has_any(BLOWN_OUT) {
            TireCondition::BlownOut
        } else if has_any(WORN) {
            TireCondition::Worn
        } else {
            TireCondition::Unknown
        }
    }

    /// Assessment text with severity and advice.
    pub fn assessment(&self) -> &'static str {
        match self {
            TireCondition::Flat => "檢測結果：輪胎氣壓不足或已漏氣。嚴重程度：中高。建議：請勿繼續行駛，立即更換備胎或呼叫救援服務。",
            TireCondition::Damaged => "檢測結果：輪胎有明顯損壞或刺破。嚴重程度：高。建議：請勿繼續行駛，立即更換輪胎或呼叫緊急救援。",
            TireCondition::BlownOut => "檢測結果：輪胎已爆裂。嚴重程度：極高。建議：請立即停車，切勿繼續行駛，立即呼叫緊急救援服務。",
            TireCondition::Worn => "檢測結果：輪胎有磨損跡象。嚴重程度：中。建議：請盡快安排檢查，必要時更換輪胎以確保安全。",
            TireCondition::Unknown => "檢測結果：輪胎外觀需要進一步檢查。建議：請專業技師進行詳細檢查，確保行車安全。如有疑慮，請勿繼續行駛。",
        }
    }
}

/// Assessment text for a caption.
pub fn assess_caption(caption: &str) -> &'static str {
    TireCondition::from_caption(caption).assessment()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(
            TireCondition::from_caption("a FLAT tire on the road"),
            TireCondition::Flat
        );
        assert_eq!(
            TireCondition::from_caption("a tire with a puncture"),
            TireCondition::Damaged
        );
        assert_eq!(
            TireCondition::from_caption("a burst tyre"),
            TireCondition::BlownOut
        );
        assert_eq!(
            TireCondition::from_caption("close up of a bald tread"),
            TireCondition::Worn
        );
        assert_eq!(
            TireCondition::from_caption("a car parked on the street"),
            TireCondition::Unknown
        );
        assert_eq!(TireCondition::from_caption("輪胎漏氣"), TireCondition::Flat);
    }

    #[test]
    fn test_flat_wins_over_later_categories() {
        // "blown" and "flat" both present: flat is checked first
        assert_eq!(
            TireCondition::from_caption("a blown flat tire"),
            TireCondition::Flat
        );
        // "below" contains "low"
        assert_eq!(
            TireCondition::from_caption("a wheel below a worn fender"),
            TireCondition::Flat
        );
    }

    #[test]
    fn test_assessment_text() {
        assert!(assess_caption("burst").contains("極高"));
        assert!(assess_caption("nothing").starts_with("檢測結果"));
    }
}
