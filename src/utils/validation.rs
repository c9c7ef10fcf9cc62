use std::collections::BTreeSet;
use std::path::Path;
use tracing::warn;
use crate::utils::{ConverterError, ConverterResult, DEFAULT_EXTENSIONS, normalize_extension};

pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Clamps a requested JPEG quality into `[1, 100]`.
pub fn clamp_quality(quality: i64) -> u8 {
    let clamped = quality.clamp(MIN_QUALITY as i64, MAX_QUALITY as i64);
    if clamped != quality {
        warn!("Quality {} out of range, using {}", quality, clamped);
    }
    clamped as u8
}

/// Validates that the source root exists and is a readable directory.
pub fn validate_source_root(root: &Path) -> ConverterResult<()> {
    let meta = std::fs::metadata(root).map_err(|_| ConverterError::NotFound(root.to_path_buf()))?;
    if !meta.is_dir() {
        return Err(ConverterError::NotADirectory(root.to_path_buf()));
    }
    std::fs::read_dir(root).map_err(|_| ConverterError::NotFound(root.to_path_buf()))?;
    Ok(())
}

/// Normalises an extension allow-list. An empty input falls back to the defaults.
pub fn normalize_extensions<I, S>(extensions: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let set: BTreeSet<String> = extensions
        .into_iter()
        .filter_map(|e| normalize_extension(e.as_ref()))
        .collect();
    if set.is_empty() {
        DEFAULT_EXTENSIONS.clone()
    } else {
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn quality_is_clamped() {
        assert_eq!(clamp_quality(0), 1);
        assert_eq!(clamp_quality(-20), 1);
        assert_eq!(clamp_quality(90), 90);
        assert_eq!(clamp_quality(250), 100);
    }

    #[test]
    fn source_root_must_be_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.heic");
        std::fs::write(&file, b"x").unwrap();

        assert!(validate_source_root(dir.path()).is_ok());
        assert!(matches!(
            validate_source_root(&dir.path().join("missing")),
            Err(ConverterError::NotFound(_))
        ));
        assert!(matches!(
            validate_source_root(&file),
            Err(ConverterError::NotADirectory(_))
        ));
    }

    #[test]
    fn empty_extension_list_uses_defaults() {
        let exts = normalize_extensions(Vec::<String>::new());
        assert_eq!(exts, *DEFAULT_EXTENSIONS);

        let exts = normalize_extensions([".PNG", "", "Jpg"]);
        assert_eq!(exts.into_iter().collect::<Vec<_>>(), vec!["jpg", "png"]);
    }
}
