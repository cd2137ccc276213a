//! Media normalization configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::media::{ImageMediaNormalizer, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_WIDTH};

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Images wider than this are downsized
    #[serde(default = "default_max_width")]
    pub max_width: u32,

    /// JPEG re-encode quality (1-100)
    #[serde(default = "default_quality")]
    pub jpeg_quality: u8,
}

impl MediaConfig {
    pub fn normalizer(&self) -> ImageMediaNormalizer {
        ImageMediaNormalizer::new(self.max_width, self.jpeg_quality)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(64..=4096).contains(&self.max_width) {
            return Err(ValidationError::InvalidMaxWidth);
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ValidationError::InvalidJpegQuality);
        }
        Ok(())
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            jpeg_quality: default_quality(),
        }
    }
}

fn default_max_width() -> u32 {
    DEFAULT_MAX_WIDTH
}

fn default_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}
