use std::path::Path;
use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;
use super::{ImageDecoder, PixelLayout, RawImage};
use crate::utils::ConversionError;

/// Decoder backed by the `image` crate, with the format sniffed from file content.
///
/// Cannot read HEIF itself; it is the fallback when the crate is built
/// without libvips, and lets other formats stored under a matching
/// extension go through the same pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct SniffingDecoder;

impl ImageDecoder for SniffingDecoder {
    fn decode(&self, path: &Path) -> Result<RawImage, ConversionError> {
        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| ConversionError::decode(format!("Cannot read '{}': {e}", path.display())))?;

        let format = reader.format();
        let image = reader
            .decode()
            .map_err(|e| ConversionError::decode(format!("Failed to decode '{}': {e}", path.display())))?;

        debug!(
            "Decoded '{}' as {:?}: {}×{}",
            path.display(),
            format,
            image.width(),
            image.height()
        );

        Ok(into_raw(image))
    }

    fn supports_extension(&self, extension: &str) -> bool {
        ImageFormat::from_extension(extension).is_some_and(|f| f.reading_enabled())
    }
}

fn into_raw(image: DynamicImage) -> RawImage {
    let (width, height) = (image.width(), image.height());
    match image {
        DynamicImage::ImageLuma8(buf) => RawImage::packed(buf.into_raw(), width, height, PixelLayout::L8),
        DynamicImage::ImageLumaA8(buf) => RawImage::packed(buf.into_raw(), width, height, PixelLayout::La8),
        DynamicImage::ImageRgb8(buf) => RawImage::packed(buf.into_raw(), width, height, PixelLayout::Rgb8),
        DynamicImage::ImageRgba8(buf) => RawImage::packed(buf.into_raw(), width, height, PixelLayout::Rgba8),
        DynamicImage::ImageRgb16(buf) => {
            RawImage::packed(le_bytes(buf.into_raw()), width, height, PixelLayout::Rgb16)
        }
        DynamicImage::ImageRgba16(buf) => {
            RawImage::packed(le_bytes(buf.into_raw()), width, height, PixelLayout::Rgba16)
        }
        other => RawImage::packed(other.to_rgba8().into_raw(), width, height, PixelLayout::Rgba8),
    }
}

fn le_bytes(samples: Vec<u16>) -> Vec<u8> {
    samples.into_iter().flat_map(u16::to_le_bytes).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn decodes_by_content_not_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.HEIC");
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        img.save_with_format(&path, ImageFormat::Png).unwrap();

        let raw = SniffingDecoder.decode(&path).unwrap();

        assert_eq!((raw.width, raw.height), (3, 2));
        assert_eq!(raw.layout, PixelLayout::Rgba8);
        assert_eq!(raw.stride, 12);
        assert_eq!(&raw.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn heif_extensions_are_not_supported() {
        assert!(!SniffingDecoder.supports_extension("heic"));
        assert!(!SniffingDecoder.supports_extension("heif"));
        assert!(SniffingDecoder.supports_extension("png"));
        assert!(SniffingDecoder.supports_extension("jpg"));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.heic");
        std::fs::write(&path, b"definitely not an image").unwrap();

        assert!(matches!(SniffingDecoder.decode(&path), Err(ConversionError::Decode(_))));
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let err = SniffingDecoder.decode(&dir.path().join("nope.heic")).unwrap_err();
        assert!(matches!(err, ConversionError::Decode(_)));
    }
}
