//! `data:` URL handling for inline photos.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Result, VisionError};

/// Fallback MIME type when a payload carries none.
pub const DEFAULT_MIME: &str = "image/jpeg";

/// A parsed `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    /// Base64 payload, still encoded.
    pub data: String,
}

impl DataUrl {
    /// Parse a data URL. A bare base64 string is accepted as JPEG.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(VisionError::InvalidDataUrl);
        }

        let Some(rest) = input.strip_prefix("data:") else {
            return Ok(Self {
                mime: DEFAULT_MIME.to_string(),
                data: input.to_string(),
            });
        };

        let (meta, data) = rest.split_once(',').ok_or(VisionError::InvalidDataUrl)?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or(VisionError::InvalidDataUrl)?;
        if !mime.starts_with("image/") || data.is_empty() {
            return Err(VisionError::InvalidDataUrl);
        }

        Ok(Self {
            mime: mime.to_string(),
            data: data.to_string(),
        })
    }

    /// Encode raw bytes.
    pub fn encode(mime: &str, bytes: &[u8]) -> Self {
        Self {
            mime: mime.to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Decode the payload.
    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(self.data.as_bytes())?)
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_url() {
        let url = DataUrl::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(url.mime, "image/png");
        assert_eq!(url.data, "iVBORw0KGgo=");
        assert_eq!(url.to_string(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_bare_base64_defaults_to_jpeg() {
        let url = DataUrl::parse("/9j/4AAQ").unwrap();
        assert_eq!(url.mime, "image/jpeg");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(DataUrl::parse("").is_err());
        assert!(DataUrl::parse("data:image/png,abc").is_err());
        assert!(DataUrl::parse("data:text/plain;base64,abc").is_err());
        assert!(DataUrl::parse("data:image/png;base64,").is_err());
    }

    #[test]
    fn test_encode_decode() {
        let url = DataUrl::encode("image/webp", b"RIFF");
        assert_eq!(url.decode().unwrap(), b"RIFF");
        assert!(DataUrl::parse("data:image/jpeg;base64,@@@").unwrap().decode().is_err());
    }
}
