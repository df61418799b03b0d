//! AI tire condition analysis and photo handling for EB Rescue.
//!
//! This crate provides:
//!
//! - [`TireAnalyzer`] - The provider seam (HuggingFace, OpenAI, Gemini, Replicate)
//! - [`AnalyzerChain`] - Primary provider, HuggingFace fallback, static notice last
//! - [`compress_image`] / [`load_photo`] - Downscale and re-encode photos as JPEG data URLs
//! - [`RimDesigner`] - Optional rim restyling
//!
//! # Example
//!
//! ```no_run
//! use tire_vision::VisionConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let chain = VisionConfig::from_env().build_chain();
//!     let photo = tire_vision::load_photo("tire.jpg").await?;
//!     println!("{}", chain.analyze(&photo).await);
//!     Ok(())
//! }
//! ```

mod analyzer;
mod compress;
mod condition;
mod config;
mod data_url;
mod error;
pub mod providers;
mod rim;

pub use analyzer::{AnalyzerChain, TireAnalyzer};
pub use compress::{
    compress_image, load_photo, mime_for, validate_image_file, CompressionOptions, ACCEPTED_TYPES,
    MAX_UPLOAD_MB,
};
pub use condition::{
    assess_caption, TireCondition, ANALYSIS_UNAVAILABLE, GENERIC_ASSESSMENT, NO_RESULT,
};
pub use config::{AiProvider, VisionConfig, VisionConfigBuilder};
pub use data_url::DataUrl;
pub use error::{Result, VisionError};
pub use rim::{RimDesigner, RIM_STYLES};
