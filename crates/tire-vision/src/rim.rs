//! Rim restyling.

use async_trait::async_trait;

use crate::error::Result;

/// Preset styles offered on the rim design screen.
pub const RIM_STYLES: [&str; 4] = [
    "Matte Black",
    "Chrome Silver",
    "Bronze Gold",
    "Gloss Red",
];

/// Generates a restyled photo of the car's wheels.
#[async_trait]
pub trait RimDesigner: Send + Sync {
    fn name(&self) -> &'static str;

    /// Restyle the rims in `image` (a data URL). Returns a data URL or an
    /// image URL, or `None` when the model produced no image.
    async fn generate(&self, image: &str, style: &str) -> Result<Option<String>>;
}
