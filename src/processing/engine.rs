//! Single-file conversion: decode, rebuild RGB, encode JPEG, write, optionally delete.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::{ConversionPolicy, ConversionResult, SourceFile};
use crate::processing::codec::{ImageDecoder, ImageEncoder, JpegEncoder, reconstruct_rgb};
use crate::utils::{ConversionError, ConverterResult, OUTPUT_EXTENSION, is_same_file, remove_best_effort, write_atomic};

/// Computes where `source` is written.
///
/// With `keep_original_name` the result is `destination_dir/<base_name>.jpg`.
/// Otherwise it is `destination_dir/converted_{position:04}.jpg`, where
/// `position` is the 1-based index of the file within its batch. Sequential
/// names are therefore only meaningful relative to a batch: the same file
/// gets a different name if discovery order changes.
pub fn destination_path(
    source: &SourceFile,
    destination_dir: &Path,
    position: usize,
    policy: &ConversionPolicy,
) -> PathBuf {
    if policy.keep_original_name() {
        destination_dir.join(format!("{}.{}", source.base_name, OUTPUT_EXTENSION))
    } else {
        destination_dir.join(format!("converted_{:04}.{}", position, OUTPUT_EXTENSION))
    }
}

/// Converts one source file to one JPEG.
///
/// Never touches batch state; every failure is folded into the returned
/// [`ConversionResult`].
#[derive(Clone)]
pub struct ConversionEngine {
    decoder: Arc<dyn ImageDecoder>,
    encoder: Arc<dyn ImageEncoder>,
}

impl ConversionEngine {
    pub fn new(decoder: Arc<dyn ImageDecoder>, encoder: Arc<dyn ImageEncoder>) -> Self {
        Self { decoder, encoder }
    }

    /// Engine with the best decoder this build has: libvips when the `vips`
    /// feature is enabled, the content-sniffing `image` decoder otherwise.
    pub fn with_default_codecs() -> ConverterResult<Self> {
        #[cfg(feature = "vips")]
        let decoder: Arc<dyn ImageDecoder> = Arc::new(crate::processing::libvips::VipsDecoder::new()?);
        #[cfg(not(feature = "vips"))]
        let decoder: Arc<dyn ImageDecoder> = {
            warn!("Built without libvips: HEIF sources cannot be decoded, other formats are sniffed from content");
            Arc::new(crate::processing::codec::SniffingDecoder)
        };

        Ok(Self::new(decoder, Arc::new(JpegEncoder)))
    }

    /// Extensions from `extensions` this engine's decoder cannot read.
    pub fn unsupported_extensions<'a>(&self, extensions: impl IntoIterator<Item = &'a String>) -> Vec<String> {
        extensions
            .into_iter()
            .filter(|ext| !self.decoder.supports_extension(ext))
            .cloned()
            .collect()
    }

    /// Converts `source` into `destination_dir` according to `policy`.
    ///
    /// `position` is the file's 1-based index within the batch; see
    /// [`destination_path`]. On success with `delete_source_on_success`
    /// the source is removed once; a failed removal is only logged.
    pub fn convert(
        &self,
        source: &SourceFile,
        destination_dir: &Path,
        position: usize,
        policy: &ConversionPolicy,
    ) -> ConversionResult {
        let destination = destination_path(source, destination_dir, position, policy);

        match self.convert_to(source, &destination, policy.quality()) {
            Ok(()) => {
                debug!("'{}' → '{}'", source.file_name(), destination.display());

                if policy.delete_source_on_success() {
                    if destination == source.absolute_path || is_same_file(&destination, source.path()) {
                        warn!("Not deleting {}: it was overwritten by its own output", destination.display());
                    } else if remove_best_effort(source.path()) {
                        debug!("Deleted source {}", source.path().display());
                    }
                }

                ConversionResult::Success { destination_path: destination }
            }
            Err(reason) => {
                warn!("Conversion failed for {}: {}", source.path().display(), reason);
                ConversionResult::Failure { reason }
            }
        }
    }

    fn convert_to(&self, source: &SourceFile, destination: &Path, quality: u8) -> Result<(), ConversionError> {
        let raw = self.decoder.decode(source.path())?;
        let rgb = reconstruct_rgb(&raw)?;
        let bytes = self.encoder.encode(&rgb, quality)?;
        if bytes.is_empty() {
            return Err(ConversionError::encode("Encoder returned an empty stream"));
        }

        if destination.exists() {
            warn!("Overwriting existing file {}", destination.display());
        }
        write_atomic(destination, &bytes)
    }
}
