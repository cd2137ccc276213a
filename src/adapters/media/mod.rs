//! Media normalizer adapters.

mod image_normalizer;

pub use image_normalizer::{
    ImageMediaNormalizer, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_INPUT_BYTES, DEFAULT_MAX_WIDTH,
};
