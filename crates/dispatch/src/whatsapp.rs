//! Deep link construction.

/// Business WhatsApp number that receives every request.
pub const DEFAULT_BUSINESS_NUMBER: &str = "85296151351";

/// Mailbox copied on tire change bookings.
pub const BOOKING_EMAIL: &str = "booking@ebtire.com";

pub const BOOKING_EMAIL_SUBJECT: &str = "New Tire Service Booking";

/// `https://wa.me/<number>?text=<message>` with the message percent-encoded.
pub fn whatsapp_link(number: &str, message: &str) -> String {
    let number: String = number.chars().filter(char::is_ascii_digit).collect();
    format!(
        "https://wa.me/{}?text={}",
        number,
        urlencoding::encode(message)
    )
}

/// `mailto:` link carrying the same message.
pub fn mailto_link(address: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        address,
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_link_encodes_message() {
        let link = whatsapp_link(DEFAULT_BUSINESS_NUMBER, "你好 & bye\n");
        assert_eq!(
            link,
            "https://wa.me/85296151351?text=%E4%BD%A0%E5%A5%BD%20%26%20bye%0A"
        );
    }

    #[test]
    fn test_whatsapp_link_strips_number_formatting() {
        let link = whatsapp_link("+852 9615 1351", "x");
        assert!(link.starts_with("https://wa.me/85296151351?text="));
    }

    #[test]
    fn test_mailto_link() {
        let link = mailto_link(BOOKING_EMAIL, BOOKING_EMAIL_SUBJECT, "a b");
        assert_eq!(
            link,
            "mailto:booking@ebtire.com?subject=New%20Tire%20Service%20Booking&body=a%20b"
        );
    }
}
