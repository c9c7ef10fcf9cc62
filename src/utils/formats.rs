use std::collections::BTreeSet;
use std::path::Path;
use lazy_static::lazy_static;

lazy_static! {
    /// Source extensions converted when the caller does not supply its own set.
    pub static ref DEFAULT_EXTENSIONS: BTreeSet<String> =
        ["heic", "heif"].iter().map(|e| e.to_string()).collect();
}

/// Extension written for every converted file.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Normalises a user-supplied extension: trims, strips a leading dot, lowercases.
///
/// Returns `None` for entries that are empty after normalisation.
pub fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim().trim_start_matches('.').to_lowercase();
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

/// Returns the lowercase extension of `path`, if it has one.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Case-insensitive allow-list check. `extensions` must already be normalised.
pub fn matches_extension(path: &Path, extensions: &BTreeSet<String>) -> bool {
    extension_of(path).is_some_and(|ext| extensions.contains(&ext))
}
