//! Photo validation and compression.
//!
//! Photos are downscaled to fit 1920x1920 and re-encoded as JPEG before they
//! are embedded in requests or persisted.

use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbImage};
use tracing::debug;

use crate::data_url::DataUrl;
use crate::error::{Result, VisionError};

/// Accepted upload MIME types.
pub const ACCEPTED_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Largest accepted upload in megabytes.
pub const MAX_UPLOAD_MB: u64 = 10;

/// Compression settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality, 1-100.
    pub quality: u8,
    /// Lowest quality the size target may push down to.
    pub min_quality: u8,
    /// Size target in kilobytes.
    pub max_size_kb: u64,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1920,
            quality: 80,
            min_quality: 30,
            max_size_kb: 500,
        }
    }
}

/// Check an upload's declared type and size.
pub fn validate_image_file(mime: &str, size: u64) -> Result<()> {
    if !ACCEPTED_TYPES.contains(&mime) {
        return Err(VisionError::UnsupportedImageType(mime.to_string()));
    }

    if size > MAX_UPLOAD_MB * 1024 * 1024 {
        return Err(VisionError::ImageTooLarge {
            size,
            max_mb: MAX_UPLOAD_MB,
        });
    }

    Ok(())
}

/// Compress image bytes into a JPEG data URL.
///
/// When the first encode exceeds the size target, quality is scaled down in
/// proportion (never below `min_quality`) and the image encoded once more.
pub fn compress_image(bytes: &[u8], options: &CompressionOptions) -> Result<String> {
    let img = image::load_from_memory(bytes)?;
    let img = fit_within(img, options.max_width, options.max_height);
    let rgb = img.to_rgb8();

    let mut quality = options.quality;
    let mut encoded = encode_jpeg(&rgb, quality)?;

    let size_kb = encoded.len() as f64 / 1024.0;
    if size_kb > options.max_size_kb as f64 && quality > options.min_quality {
        let scaled = (options.max_size_kb as f64 / size_kb * quality as f64) as u8;
        quality = scaled.max(options.min_quality);
        encoded = encode_jpeg(&rgb, quality)?;
    }

    debug!(
        "Compressed photo to {}x{} at quality {} ({} bytes)",
        rgb.width(),
        rgb.height(),
        quality,
        encoded.len()
    );

    Ok(DataUrl::encode("image/jpeg", &encoded).to_string())
}

/// Read, validate and compress a photo from disk.
pub async fn load_photo(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let size = tokio::fs::metadata(path).await?.len();
    if size > MAX_UPLOAD_MB * 1024 * 1024 {
        return Err(VisionError::ImageTooLarge {
            size,
            max_mb: MAX_UPLOAD_MB,
        });
    }

    let bytes = tokio::fs::read(path).await?;

    let mime = image::guess_format(&bytes)
        .ok()
        .and_then(mime_for)
        .unwrap_or("application/octet-stream");
    validate_image_file(mime, bytes.len() as u64)?;

    compress_image(&bytes, &CompressionOptions::default())
}

fn fit_within(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    if img.width() > max_width || img.height() > max_height {
        img.resize(max_width, max_height, FilterType::Triangle)
    } else {
        img
    }
}

fn encode_jpeg(rgb: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode_image(rgb)?;
    Ok(buf)
}

/// MIME type for a decoded format, if it is one we accept.
pub fn mime_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn decode(data_url: &str) -> DynamicImage {
        let url = DataUrl::parse(data_url).unwrap();
        assert_eq!(url.mime, "image/jpeg");
        image::load_from_memory(&url.decode().unwrap()).unwrap()
    }

    #[test]
    fn test_validate_image_file() {
        assert!(validate_image_file("image/png", 1024).is_ok());
        assert!(validate_image_file("image/jpg", 1024).is_ok());
        assert!(validate_image_file("image/webp", 10 * 1024 * 1024).is_ok());

        let err = validate_image_file("image/gif", 1024).unwrap_err();
        assert_eq!(err.to_string(), "請上傳 JPG、PNG 或 WebP 格式的圖片");

        let err = validate_image_file("image/jpeg", 10 * 1024 * 1024 + 1).unwrap_err();
        assert_eq!(err.to_string(), "圖片大小不能超過 10MB");
    }

    #[test]
    fn test_large_image_is_downscaled_keeping_aspect() {
        let out = compress_image(&png(3000, 1500), &CompressionOptions::default()).unwrap();
        let img = decode(&out);
        assert_eq!(img.width(), 1920);
        assert_eq!(img.height(), 960);
    }

    #[test]
    fn test_small_image_keeps_size() {
        let out = compress_image(&png(64, 48), &CompressionOptions::default()).unwrap();
        let img = decode(&out);
        assert_eq!((img.width(), img.height()), (64, 48));
    }

    #[test]
    fn test_rejects_non_image_bytes() {
        let err = compress_image(b"not an image", &CompressionOptions::default()).unwrap_err();
        assert!(matches!(err, VisionError::Image(_)));
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("tire-vision-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn test_load_photo_rejects_oversized_file_by_size() {
        let path = temp_path("huge.png");
        let file = tokio::fs::File::create(&path).await.unwrap();
        file.set_len(MAX_UPLOAD_MB * 1024 * 1024 + 1).await.unwrap();
        drop(file);

        let err = load_photo(&path).await.unwrap_err();
        tokio::fs::remove_file(&path).await.unwrap();
        assert!(matches!(
            err,
            VisionError::ImageTooLarge { max_mb: 10, .. }
        ));
    }

    #[tokio::test]
    async fn test_load_photo_compresses_small_file() {
        let path = temp_path("small.png");
        tokio::fs::write(&path, png(32, 32)).await.unwrap();

        let out = load_photo(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();
        assert_eq!(decode(&out).width(), 32);
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(ImageFormat::Png), Some("image/png"));
        assert_eq!(mime_for(ImageFormat::Gif), None);
    }
}
