//! Core value types for a conversion batch.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Deserializer, Serialize};
use crate::utils::{clamp_quality, file_stem, ConversionError};

/// Default JPEG quality, matching what the desktop tool always shipped with.
pub const DEFAULT_QUALITY: u8 = 95;

/// Policy applied to every file of a batch.
///
/// Quality is always within `[1, 100]`: out-of-range values are clamped at
/// construction and on deserialisation. The policy is a plain value, so a
/// running batch holds its own copy and never observes later changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversionPolicy {
    #[serde(deserialize_with = "deserialize_quality")]
    quality: u8,
    keep_original_name: bool,
    delete_source_on_success: bool,
}

impl ConversionPolicy {
    pub fn new(quality: i64, keep_original_name: bool, delete_source_on_success: bool) -> Self {
        Self {
            quality: clamp_quality(quality),
            keep_original_name,
            delete_source_on_success,
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn keep_original_name(&self) -> bool {
        self.keep_original_name
    }

    pub fn delete_source_on_success(&self) -> bool {
        self.delete_source_on_success
    }

    pub fn with_quality(mut self, quality: i64) -> Self {
        self.quality = clamp_quality(quality);
        self
    }

    pub fn with_keep_original_name(mut self, keep: bool) -> Self {
        self.keep_original_name = keep;
        self
    }

    pub fn with_delete_source_on_success(mut self, delete: bool) -> Self {
        self.delete_source_on_success = delete;
        self
    }
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            keep_original_name: true,
            delete_source_on_success: false,
        }
    }
}

fn deserialize_quality<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(clamp_quality(raw))
}

/// A discovered input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    /// Absolute path to the file
    pub absolute_path: PathBuf,
    /// File name without its extension
    pub base_name: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let absolute_path = std::path::absolute(&path).unwrap_or(path);
        let base_name = file_stem(&absolute_path);
        Self { absolute_path, base_name }
    }

    pub fn path(&self) -> &Path {
        &self.absolute_path
    }

    /// File name including its extension, used for status messages.
    pub fn file_name(&self) -> String {
        self.absolute_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.base_name.clone())
    }
}

/// Outcome of converting one [`SourceFile`]. Produced exactly once per file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ConversionResult {
    #[serde(rename_all = "camelCase")]
    Success { destination_path: PathBuf },
    Failure { reason: ConversionError },
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_desktop_tool() {
        let policy = ConversionPolicy::default();
        assert_eq!(policy.quality(), 95);
        assert!(policy.keep_original_name());
        assert!(!policy.delete_source_on_success());
    }

    #[test]
    fn quality_clamped_on_construction_and_deserialisation() {
        assert_eq!(ConversionPolicy::new(0, true, false).quality(), 1);
        assert_eq!(ConversionPolicy::default().with_quality(101).quality(), 100);

        let policy: ConversionPolicy =
            serde_json::from_str(r#"{"quality": 400, "keepOriginalName": false}"#).unwrap();
        assert_eq!(policy.quality(), 100);
        assert!(!policy.keep_original_name());
        assert!(!policy.delete_source_on_success());
    }

    #[test]
    fn source_file_base_name_drops_extension() {
        let file = SourceFile::new("/photos/trip/IMG_0001.HEIC");
        assert_eq!(file.base_name, "IMG_0001");
        assert_eq!(file.file_name(), "IMG_0001.HEIC");
        assert!(file.path().is_absolute());
    }

    #[test]
    fn result_serialises_with_status_tag() {
        let ok = ConversionResult::Success { destination_path: PathBuf::from("/out/a.jpg") };
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["destinationPath"], "/out/a.jpg");
    }
}
