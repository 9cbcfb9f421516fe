//! Deterministic PNG writer for overlay output.
//!
//! Uses fixed compression settings so identical images always encode to
//! identical bytes, which keeps output hashes comparable between runs.

use std::io::Write;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::buffer::OverlayImage;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),
}

/// PNG export configuration for deterministic output.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Use a fixed value for determinism.
    pub compression: Compression,
    /// Filter type. Use a fixed value for determinism.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

fn color_type(image: &OverlayImage) -> ColorType {
    match image {
        OverlayImage::Grey(_) => ColorType::Grayscale,
        OverlayImage::Rgb(_) => ColorType::Rgb,
    }
}

/// Write an overlay image to any writer.
pub fn write_overlay_to_writer<W: Write>(
    image: &OverlayImage,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    let mut encoder = Encoder::new(writer, image.width(), image.height());
    encoder.set_color(color_type(image));
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(image.as_bytes())?;

    Ok(())
}

/// Compute the BLAKE3 hash of PNG data.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Encode to a Vec<u8> and return the bytes with their hash.
pub fn encode_overlay_with_hash(
    image: &OverlayImage,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_overlay_to_writer(image, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}
