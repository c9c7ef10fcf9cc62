use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::warn;
use crate::utils::{ConversionError, ConverterError, ConverterResult, DeleteWarning};

/// Creates `dir` and any missing parents. No error if it already exists.
pub fn create_dir_all(dir: impl AsRef<Path>) -> ConverterResult<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|e| ConverterError::directory_create(dir, e))
}

/// Writes `bytes` to `destination` through a temp file in the same directory.
///
/// The final name only ever holds a complete file: on any failure the temp
/// file is dropped (and removed) and `destination` is left untouched.
/// An existing file at `destination` is replaced.
pub fn write_atomic(destination: &Path, bytes: &[u8]) -> Result<(), ConversionError> {
    let dir = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| ConversionError::encode(format!("Cannot create temp file in {}: {e}", dir.display())))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| ConversionError::encode(format!("Write failed for {}: {e}", destination.display())))?;
    tmp.persist(destination)
        .map_err(|e| ConversionError::encode(format!("Cannot move output into place at {}: {}", destination.display(), e.error)))?;
    Ok(())
}

/// Removes `path`, logging instead of failing. Returns whether the file is gone.
pub fn remove_best_effort(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            warn!("{}", DeleteWarning::new(path, &e));
            false
        }
    }
}

/// Whether `a` and `b` name the same file on disk.
///
/// Catches aliases plain path comparison misses: relative vs. absolute
/// spellings, `..` components, links, and names differing only in case on
/// case-insensitive filesystems. Missing files are never the same.
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        match (std::fs::metadata(a), std::fs::metadata(b)) {
            (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
            _ => false,
        }
    }
    #[cfg(not(unix))]
    {
        match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
            (Ok(ca), Ok(cb)) => ca == cb,
            _ => false,
        }
    }
}

/// Base name of a path without its extension, falling back to the full file name.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.jpg");
        std::fs::write(&dest, b"old").unwrap();

        write_atomic(&dest, b"new contents").unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"new contents");
        // No stray temp files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_atomic_into_missing_dir_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("missing").join("out.jpg");

        let err = write_atomic(&dest, b"data").unwrap_err();

        assert!(matches!(err, ConversionError::Encode(_)));
        assert!(!dest.exists());
    }

    #[test]
    fn remove_best_effort_swallows_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(!remove_best_effort(&dir.path().join("gone.heic")));
    }

    #[test]
    fn create_dir_all_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        create_dir_all(&nested).unwrap();
        create_dir_all(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn same_file_sees_through_path_aliases() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let file = dir.path().join("a.jpg");
        std::fs::write(&file, b"x").unwrap();
        let other = dir.path().join("b.jpg");
        std::fs::write(&other, b"x").unwrap();

        let aliased = dir.path().join("sub").join("..").join("a.jpg");
        assert_ne!(aliased, file);
        assert!(is_same_file(&aliased, &file));
        assert!(!is_same_file(&file, &other));
        assert!(!is_same_file(&file, &dir.path().join("missing.jpg")));
    }

    #[test]
    fn stem_drops_extension() {
        assert_eq!(file_stem(Path::new("/x/IMG_0042.HEIC")), "IMG_0042");
        assert_eq!(file_stem(Path::new("photo.tar.heic")), "photo.tar");
    }
}
