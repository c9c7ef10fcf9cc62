//! Raw pixel buffers handed over by a decoder, and their reconstruction into RGB.
//!
//! Decoders do not hand back a self-describing container, only bytes plus
//! geometry. [`reconstruct_rgb`] rebuilds the image strictly from the
//! declared width, height, layout and stride.

use image::RgbImage;
use crate::utils::ConversionError;

/// Memory layout of one pixel in a [`RawImage`].
///
/// 16-bit layouts store little-endian samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    L8,
    La8,
    Rgb8,
    Rgba8,
    Bgr8,
    Bgra8,
    Rgb16,
    Rgba16,
}

impl PixelLayout {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::L8 => 1,
            Self::La8 => 2,
            Self::Rgb8 | Self::Bgr8 => 3,
            Self::Rgba8 | Self::Bgra8 => 4,
            Self::Rgb16 => 6,
            Self::Rgba16 => 8,
        }
    }

    /// Converts one pixel to 8-bit RGB. Alpha is dropped, gray is replicated.
    fn to_rgb(self, px: &[u8]) -> [u8; 3] {
        match self {
            Self::L8 | Self::La8 => [px[0], px[0], px[0]],
            Self::Rgb8 | Self::Rgba8 => [px[0], px[1], px[2]],
            Self::Bgr8 | Self::Bgra8 => [px[2], px[1], px[0]],
            // high byte of each little-endian sample
            Self::Rgb16 | Self::Rgba16 => [px[1], px[3], px[5]],
        }
    }
}

/// Decoded pixel data with explicit geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    /// Bytes from the start of one row to the start of the next
    pub stride: usize,
}

impl RawImage {
    /// Builds a tightly packed buffer (stride == width * bytes per pixel).
    pub fn packed(pixels: Vec<u8>, width: u32, height: u32, layout: PixelLayout) -> Self {
        let stride = width as usize * layout.bytes_per_pixel();
        Self { pixels, width, height, layout, stride }
    }
}

/// Rebuilds an 8-bit RGB image from a raw buffer.
///
/// Fails (as an encode error) on zero dimensions, an empty buffer, a stride
/// shorter than one packed row, or a buffer too short for the declared geometry.
pub fn reconstruct_rgb(raw: &RawImage) -> Result<RgbImage, ConversionError> {
    if raw.width == 0 || raw.height == 0 {
        return Err(ConversionError::encode(format!(
            "Invalid image dimensions {}x{}",
            raw.width, raw.height
        )));
    }
    if raw.pixels.is_empty() {
        return Err(ConversionError::encode("Empty pixel buffer"));
    }

    let width = raw.width as usize;
    let height = raw.height as usize;
    let bpp = raw.layout.bytes_per_pixel();
    let row_bytes = width
        .checked_mul(bpp)
        .ok_or_else(|| ConversionError::encode("Row size overflows"))?;

    if raw.stride < row_bytes {
        return Err(ConversionError::encode(format!(
            "Stride {} shorter than row of {} bytes ({:?})",
            raw.stride, row_bytes, raw.layout
        )));
    }

    let needed = raw
        .stride
        .checked_mul(height - 1)
        .and_then(|n| n.checked_add(row_bytes))
        .ok_or_else(|| ConversionError::encode("Buffer size overflows"))?;
    if raw.pixels.len() < needed {
        return Err(ConversionError::encode(format!(
            "Pixel buffer holds {} bytes, {}x{} {:?} with stride {} needs {}",
            raw.pixels.len(),
            raw.width,
            raw.height,
            raw.layout,
            raw.stride,
            needed
        )));
    }

    let mut rgb = Vec::with_capacity(width * height * 3);
    for row in raw.pixels.chunks(raw.stride).take(height) {
        for px in row[..row_bytes].chunks_exact(bpp) {
            rgb.extend_from_slice(&raw.layout.to_rgb(px));
        }
    }

    RgbImage::from_raw(raw.width, raw.height, rgb)
        .ok_or_else(|| ConversionError::encode("Reconstructed buffer does not match dimensions"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_rows_are_trimmed() {
        // 2x2 RGB with 2 bytes of padding per row
        let pixels = vec![
            1, 2, 3, 4, 5, 6, 0xAA, 0xAA,
            7, 8, 9, 10, 11, 12, 0xBB, 0xBB,
        ];
        let raw = RawImage { pixels, width: 2, height: 2, layout: PixelLayout::Rgb8, stride: 8 };

        let img = reconstruct_rgb(&raw).unwrap();

        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.into_raw(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn last_row_may_omit_padding() {
        let pixels = vec![1, 2, 3, 0, 4, 5, 6];
        let raw = RawImage { pixels, width: 1, height: 2, layout: PixelLayout::Rgb8, stride: 4 };
        assert_eq!(reconstruct_rgb(&raw).unwrap().into_raw(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn bgra_is_reordered_and_alpha_dropped() {
        let raw = RawImage::packed(vec![30, 20, 10, 255], 1, 1, PixelLayout::Bgra8);
        assert_eq!(reconstruct_rgb(&raw).unwrap().into_raw(), vec![10, 20, 30]);
    }

    #[test]
    fn gray_is_expanded() {
        let raw = RawImage::packed(vec![7, 200, 9, 0], 2, 1, PixelLayout::La8);
        assert_eq!(reconstruct_rgb(&raw).unwrap().into_raw(), vec![7, 7, 7, 9, 9, 9]);
    }

    #[test]
    fn sixteen_bit_samples_are_narrowed() {
        // R=0x12FF G=0x3400 B=0xFFFF, little-endian
        let raw = RawImage::packed(vec![0xFF, 0x12, 0x00, 0x34, 0xFF, 0xFF], 1, 1, PixelLayout::Rgb16);
        assert_eq!(reconstruct_rgb(&raw).unwrap().into_raw(), vec![0x12, 0x34, 0xFF]);
    }

    #[test]
    fn invalid_geometry_is_an_encode_error() {
        let empty = RawImage::packed(Vec::new(), 1, 1, PixelLayout::Rgb8);
        assert!(matches!(reconstruct_rgb(&empty), Err(ConversionError::Encode(_))));

        let zero = RawImage::packed(vec![1, 2, 3], 0, 1, PixelLayout::Rgb8);
        assert!(matches!(reconstruct_rgb(&zero), Err(ConversionError::Encode(_))));

        let short = RawImage::packed(vec![1, 2, 3], 2, 1, PixelLayout::Rgb8);
        assert!(matches!(reconstruct_rgb(&short), Err(ConversionError::Encode(_))));

        let narrow = RawImage { pixels: vec![0; 12], width: 2, height: 2, layout: PixelLayout::Rgb8, stride: 4 };
        assert!(matches!(reconstruct_rgb(&narrow), Err(ConversionError::Encode(_))));
    }
}
