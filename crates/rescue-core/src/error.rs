//! Validation error types.

use thiserror::Error;

/// Form fields that carry their own validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Phone,
    Name,
    CarBrand,
    Address,
    Date,
    Time,
}

impl Field {
    fn empty_message(&self) -> &'static str {
        match self {
            Field::Phone => "請輸入電話號碼",
            Field::Name => "請輸入姓名",
            Field::CarBrand => "請輸入車輛品牌",
            Field::Address => "請輸入地址",
            Field::Date => "請選擇日期",
            Field::Time => "請選擇時間",
        }
    }

    fn too_short_message(&self) -> &'static str {
        match self {
            Field::Name => "姓名至少需要2個字符",
            Field::CarBrand => "車輛品牌至少需要2個字符",
            Field::Address => "請輸入更詳細的地址",
            _ => "輸入內容太短",
        }
    }

    fn too_long_message(&self) -> &'static str {
        match self {
            Field::Name => "姓名不能超過50個字符",
            Field::Address => "地址不能超過200個字符",
            _ => "輸入內容太長",
        }
    }
}

/// A single blocking validation failure.
///
/// Forms stop at the first failure, so there is never more than one of these
/// per submit attempt. The `Display` output is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A form was submitted with required fields left blank.
    #[error("請填寫所有必填欄位 (Please fill in all required fields)")]
    MissingRequired,

    /// The profile form needs both name and car brand.
    #[error("請填寫姓名及車輛品牌")]
    MissingProfileFields,

    #[error("{}", .0.empty_message())]
    Empty(Field),

    #[error("{}", .0.too_short_message())]
    TooShort(Field),

    #[error("{}", .0.too_long_message())]
    TooLong(Field),

    #[error("請輸入有效的香港電話號碼 (8位數字)")]
    InvalidPhone,

    #[error("請輸入有效的車牌號碼")]
    InvalidLicensePlate,

    #[error("無效的日期格式")]
    InvalidDate,

    #[error("日期不能是過去的日子")]
    DateInPast,

    #[error("日期不能超過2年後")]
    DateTooFar,

    #[error("無效的時間格式")]
    InvalidTime,

    #[error("時間不能是過去的時間")]
    TimeInPast,

    #[error("評分必須介乎 1 至 5")]
    InvalidRating(u8),

    /// Rating input that is not a small whole number, kept as typed.
    #[error("評分必須介乎 1 至 5 ({0})")]
    UnreadableRating(String),

    /// A tire dimension that is not offered for the selected width.
    #[error("請選擇有效的輪胎尺寸 ({0})")]
    UnsupportedTireSize(String),

    #[error("驗證碼錯誤 (Invalid Code)")]
    InvalidCode,
}
