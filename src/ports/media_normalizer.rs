//! Media normalizer port.
//!
//! Turns user-supplied image bytes into a bounded, encoded payload the
//! oracle accepts.

use thiserror::Error;

use crate::domain::media::MediaPayload;

pub trait MediaNormalizer: Send + Sync {
    /// Normalizes raw image bytes.
    ///
    /// # Errors
    ///
    /// - `Empty` for zero-length input
    /// - `TooLarge` above the normalizer's input limit
    fn normalize(&self, bytes: &[u8]) -> Result<MediaPayload, MediaError>;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("image is empty")]
    Empty,

    #[error("image too large: {actual} bytes exceeds {max} bytes")]
    TooLarge { max: usize, actual: usize },

    #[error("failed to encode image: {0}")]
    Encode(String),
}
