//! Image normalizer backed by the `image` crate.
//!
//! Decodes JPEG or PNG input, downsizes it so the width is at most
//! `max_width` (keeping the aspect ratio), and re-encodes as JPEG. Input
//! that cannot be decoded is passed through unchanged so the oracle can
//! still try to read it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageOutputFormat};
use std::io::Cursor;

use crate::domain::media::MediaPayload;
use crate::ports::{MediaError, MediaNormalizer};

pub const DEFAULT_MAX_WIDTH: u32 = 800;
pub const DEFAULT_JPEG_QUALITY: u8 = 60;
/// Upper bound on raw input (20MB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ImageMediaNormalizer {
    max_width: u32,
    quality: u8,
    max_input_bytes: usize,
}

impl Default for ImageMediaNormalizer {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_JPEG_QUALITY,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl ImageMediaNormalizer {
    pub fn new(max_width: u32, quality: u8) -> Self {
        Self {
            max_width: max_width.max(1),
            quality: quality.clamp(1, 100),
            ..Self::default()
        }
    }

    pub fn with_max_input_bytes(mut self, max: usize) -> Self {
        self.max_input_bytes = max;
        self
    }

    fn downsize(&self, img: DynamicImage) -> DynamicImage {
        let (width, height) = img.dimensions();
        if width <= self.max_width {
            return img;
        }
        let new_height = ((height as f64 * self.max_width as f64) / width as f64).round() as u32;
        img.resize_exact(self.max_width, new_height.max(1), FilterType::Triangle)
    }

    fn encode_jpeg(&self, img: &DynamicImage) -> Result<Vec<u8>, MediaError> {
        // JPEG has no alpha channel.
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        let mut cursor = Cursor::new(Vec::new());
        rgb.write_to(&mut cursor, ImageOutputFormat::Jpeg(self.quality))
            .map_err(|e| MediaError::Encode(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

impl MediaNormalizer for ImageMediaNormalizer {
    fn normalize(&self, bytes: &[u8]) -> Result<MediaPayload, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }
        if bytes.len() > self.max_input_bytes {
            return Err(MediaError::TooLarge {
                max: self.max_input_bytes,
                actual: bytes.len(),
            });
        }

        match image::load_from_memory(bytes) {
            Ok(img) => {
                let resized = self.downsize(img);
                let jpeg = self.encode_jpeg(&resized)?;
                Ok(MediaPayload::jpeg(STANDARD.encode(jpeg)))
            }
            Err(err) => {
                tracing::warn!(error = %err, bytes = bytes.len(), "image decode failed, passing through");
                Ok(MediaPayload::new(sniff_mime(bytes), STANDARD.encode(bytes)))
            }
        }
    }
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 40]));
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    fn decoded_dimensions(payload: &MediaPayload) -> (u32, u32) {
        let bytes = STANDARD.decode(payload.data()).unwrap();
        image::load_from_memory(&bytes).unwrap().dimensions()
    }

    #[test]
    fn wide_image_is_downsized_proportionally() {
        let payload = ImageMediaNormalizer::default()
            .normalize(&png(1600, 1200))
            .unwrap();
        assert_eq!(payload.mime_type(), "image/jpeg");
        assert_eq!(decoded_dimensions(&payload), (800, 600));
    }

    #[test]
    fn narrow_image_keeps_size() {
        let payload = ImageMediaNormalizer::default()
            .normalize(&png(320, 240))
            .unwrap();
        assert_eq!(decoded_dimensions(&payload), (320, 240));
    }

    #[test]
    fn undecodable_bytes_pass_through() {
        let bytes = b"not an image at all";
        let payload = ImageMediaNormalizer::default().normalize(bytes).unwrap();
        assert_eq!(STANDARD.decode(payload.data()).unwrap(), bytes.to_vec());
        assert_eq!(payload.mime_type(), "image/jpeg");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(
            ImageMediaNormalizer::default().normalize(&[]),
            Err(MediaError::Empty)
        );
    }

    #[test]
    fn oversized_input_is_rejected() {
        let normalizer = ImageMediaNormalizer::default().with_max_input_bytes(4);
        assert!(matches!(
            normalizer.normalize(&[0u8; 8]),
            Err(MediaError::TooLarge { max: 4, actual: 8 })
        ));
    }

    #[test]
    fn same_input_yields_same_reference() {
        let normalizer = ImageMediaNormalizer::default();
        let a = normalizer.normalize(&png(10, 10)).unwrap();
        let b = normalizer.normalize(&png(10, 10)).unwrap();
        assert_eq!(a.reference(), b.reference());
    }
}
