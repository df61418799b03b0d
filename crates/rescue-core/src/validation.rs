//! Input validation for form fields.
//!
//! Every function returns the first problem it finds. Date and time rules take
//! "today" / "now" explicitly; callers pass a [`Clock`](crate::Clock) reading.

use std::sync::LazyLock;

use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::error::{Field, ValidationError};

/// Hong Kong numbers: 8 digits starting 2-9, optionally prefixed with 852 / +852.
static HK_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+?852)?[2-9]\d{7}$").expect("valid phone regex"));

/// Minimum name length in characters.
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum name length in characters.
pub const MAX_NAME_LENGTH: usize = 50;

/// Minimum car brand length in characters.
pub const MIN_CAR_BRAND_LENGTH: usize = 2;

/// Minimum address length in characters.
pub const MIN_ADDRESS_LENGTH: usize = 4;

/// Maximum address length in characters.
pub const MAX_ADDRESS_LENGTH: usize = 200;

/// License plates are between 2 and 8 characters.
pub const LICENSE_PLATE_LENGTH: std::ops::RangeInclusive<usize> = 2..=8;

/// Bookings may be made up to this many months ahead.
pub const MAX_BOOKING_MONTHS_AHEAD: u32 = 24;

/// Date format used by the booking forms.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format used by the booking forms.
pub const TIME_FORMAT: &str = "%H:%M";

/// Validate a Hong Kong phone number. Whitespace is ignored.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let cleaned: String = phone.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.is_empty() {
        return Err(ValidationError::Empty(Field::Phone));
    }

    if !HK_PHONE.is_match(&cleaned) {
        return Err(ValidationError::InvalidPhone);
    }

    Ok(())
}

/// Validate a contact name (2 to 50 characters after trimming).
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    check_length(name, Field::Name, MIN_NAME_LENGTH, Some(MAX_NAME_LENGTH))
}

/// Validate a car brand / model (at least 2 characters).
pub fn validate_car_brand(brand: &str) -> Result<(), ValidationError> {
    check_length(brand, Field::CarBrand, MIN_CAR_BRAND_LENGTH, None)
}

/// Validate a service address (4 to 200 characters after trimming).
pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    check_length(
        address,
        Field::Address,
        MIN_ADDRESS_LENGTH,
        Some(MAX_ADDRESS_LENGTH),
    )
}

/// Validate an optional license plate. Blank is accepted.
pub fn validate_license_plate(plate: &str) -> Result<(), ValidationError> {
    let plate = plate.trim();
    if plate.is_empty() {
        return Ok(());
    }

    if !LICENSE_PLATE_LENGTH.contains(&plate.chars().count()) {
        return Err(ValidationError::InvalidLicensePlate);
    }

    Ok(())
}

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(date: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate)
}

/// Parse an `HH:MM` time string.
pub fn parse_time(time: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(time.trim(), TIME_FORMAT).map_err(|_| ValidationError::InvalidTime)
}

/// Validate a booking date: today through two years from today, inclusive.
pub fn validate_date(date: &str, today: NaiveDate) -> Result<(), ValidationError> {
    if date.trim().is_empty() {
        return Err(ValidationError::Empty(Field::Date));
    }

    let date = parse_date(date)?;

    if date < today {
        return Err(ValidationError::DateInPast);
    }

    let max_date = today
        .checked_add_months(Months::new(MAX_BOOKING_MONTHS_AHEAD))
        .unwrap_or(NaiveDate::MAX);
    if date > max_date {
        return Err(ValidationError::DateTooFar);
    }

    Ok(())
}

/// Validate a booking time.
///
/// Only same-day bookings are checked against the clock: the time, taken at
/// the start of its minute, must not be earlier than `now`. An unparseable
/// `date` is treated as "not today"; [`validate_date`] reports it.
pub fn validate_time(time: &str, date: &str, now: NaiveDateTime) -> Result<(), ValidationError> {
    if time.trim().is_empty() {
        return Err(ValidationError::Empty(Field::Time));
    }

    let time = parse_time(time)?;

    if let Ok(date) = parse_date(date) {
        if date == now.date() && date.and_time(time) < now {
            return Err(ValidationError::TimeInPast);
        }
    }

    Ok(())
}

/// Validate a star rating (1 to 5).
pub fn validate_rating(rating: u8) -> Result<(), ValidationError> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::InvalidRating(rating));
    }
    Ok(())
}

/// Parse a typed rating and check its range.
pub fn parse_rating(input: &str) -> Result<u8, ValidationError> {
    let input = input.trim();
    let rating = input
        .parse::<u8>()
        .map_err(|_| ValidationError::UnreadableRating(input.to_string()))?;
    validate_rating(rating)?;
    Ok(rating)
}

/// Trim free text and strip angle brackets before it is echoed into messages.
pub fn sanitize_input(input: &str) -> String {
    input.trim().replace(['<', '>'], "")
}

fn check_length(
    value: &str,
    field: Field,
    min: usize,
    max: Option<usize>,
) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }

    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort(field));
    }

    if let Some(max) = max {
        if len > max {
            return Err(ValidationError::TooLong(field));
        }
    }

    Ok(())
}
