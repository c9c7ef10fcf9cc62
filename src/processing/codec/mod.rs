//! Seam to the imaging collaborator.
//!
//! Decoding produces a [`RawImage`] (bytes plus explicit geometry); the
//! conversion engine rebuilds RGB from it and hands it to an encoder.
//!
//! - [`ImageDecoder`]: `decode(path) -> RawImage`
//! - [`ImageEncoder`]: `encode(rgb, quality) -> bytes`

mod jpeg;
mod raw;
mod sniff;

use std::path::Path;
use image::RgbImage;
use crate::utils::ConversionError;

pub use jpeg::JpegEncoder;
pub use raw::{PixelLayout, RawImage, reconstruct_rgb};
pub use sniff::SniffingDecoder;

/// Reads a source file into raw pixels.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<RawImage, ConversionError>;

    /// Whether files named with `extension` (lowercase, no dot) can be decoded.
    fn supports_extension(&self, _extension: &str) -> bool {
        true
    }
}

/// Encodes RGB pixels into the destination format.
pub trait ImageEncoder: Send + Sync {
    fn encode(&self, image: &RgbImage, quality: u8) -> Result<Vec<u8>, ConversionError>;
}
