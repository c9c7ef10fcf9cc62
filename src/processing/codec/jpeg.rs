use image::RgbImage;
use image::codecs::jpeg;
use super::ImageEncoder;
use crate::utils::ConversionError;

/// Baseline JPEG encoder backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegEncoder;

impl ImageEncoder for JpegEncoder {
    fn encode(&self, image: &RgbImage, quality: u8) -> Result<Vec<u8>, ConversionError> {
        let mut buf = Vec::new();
        let mut encoder = jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
        encoder
            .encode_image(image)
            .map_err(|e| ConversionError::encode(format!("JPEG encode failed: {e}")))?;

        if buf.is_empty() {
            return Err(ConversionError::encode("JPEG encoder produced no data"));
        }
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| image::Rgb([(x * 8) as u8, (y * 8) as u8, 128]))
    }

    #[test]
    fn produces_jpeg_magic() {
        let bytes = JpegEncoder.encode(&gradient(16, 16), 90).unwrap();
        assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn lower_quality_gives_smaller_output() {
        let img = gradient(32, 32);
        let high = JpegEncoder.encode(&img, 100).unwrap();
        let low = JpegEncoder.encode(&img, 10).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn output_is_deterministic() {
        let img = gradient(8, 8);
        assert_eq!(JpegEncoder.encode(&img, 75).unwrap(), JpegEncoder.encode(&img, 75).unwrap());
    }
}
