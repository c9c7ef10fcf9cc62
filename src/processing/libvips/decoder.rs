// src/processing/libvips/decoder.rs

use std::path::Path;
use std::sync::Arc;
use libvips::{ops, VipsApp, VipsImage};
use tracing::debug;

use crate::processing::codec::{ImageDecoder, PixelLayout, RawImage};
use crate::utils::{ConversionError, ConverterError, ConverterResult};

/// Thread-safe guard for the libvips `VipsApp` lifecycle.
///
/// `VipsApp` initializes the libvips thread pool and global state on creation
/// and shuts it down on drop. Wrapping in Arc ensures exactly one shutdown
/// call when the last decoder clone is released.
struct VipsAppGuard(VipsApp);

// libvips is designed for concurrent use; individual VipsImage instances are
// never shared between threads here, each decode owns its own.
unsafe impl Send for VipsAppGuard {}
unsafe impl Sync for VipsAppGuard {}

/// Decoder that loads any format libvips understands (HEIF via libheif).
#[derive(Clone)]
pub struct VipsDecoder {
    /// Keeps libvips initialized until the last clone is dropped.
    _vips: Arc<VipsAppGuard>,
}

impl VipsDecoder {
    pub fn new() -> ConverterResult<Self> {
        let vips = VipsApp::default("heic-converter")
            .map_err(|e| ConverterError::config(format!("Failed to initialize libvips: {e}")))?;
        // 0 = let libvips decide based on available CPU cores
        vips.concurrency_set(0);
        debug!("libvips initialized (concurrency: {})", vips.concurency_get());

        Ok(Self {
            _vips: Arc::new(VipsAppGuard(vips)),
        })
    }
}

impl ImageDecoder for VipsDecoder {
    fn decode(&self, path: &Path) -> Result<RawImage, ConversionError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| ConversionError::decode(format!("Path is not valid UTF-8: {}", path.display())))?;

        let image = VipsImage::new_from_file(path_str)
            .map_err(|e| ConversionError::decode(format!("Failed to load '{path_str}': {e}")))?;

        // HEIC sources may be YCbCr-derived, 10-bit or monochrome; bring them
        // to 8-bit sRGB so the band count alone describes the layout.
        let image = ops::colourspace(&image, ops::Interpretation::Srgb)
            .map_err(|e| ConversionError::decode(format!("Colour conversion failed for '{path_str}': {e}")))?;
        let image = ops::cast(&image, ops::BandFormat::Uchar)
            .map_err(|e| ConversionError::decode(format!("Sample conversion failed for '{path_str}': {e}")))?;

        let width = image.get_width();
        let height = image.get_height();
        let bands = image.get_bands();

        let layout = match bands {
            1 => PixelLayout::L8,
            2 => PixelLayout::La8,
            3 => PixelLayout::Rgb8,
            4 => PixelLayout::Rgba8,
            n => {
                return Err(ConversionError::decode(format!(
                    "Unsupported band count {n} in '{path_str}'"
                )));
            }
        };

        if width <= 0 || height <= 0 {
            return Err(ConversionError::decode(format!(
                "'{path_str}' has invalid dimensions {width}×{height}"
            )));
        }

        debug!("Loaded '{}': {}×{} ({} bands)", path_str, width, height, bands);

        let pixels = image.image_write_to_memory();
        let width = width as u32;
        let height = height as u32;

        Ok(RawImage {
            stride: width as usize * layout.bytes_per_pixel(),
            pixels,
            width,
            height,
            layout,
        })
    }
}
