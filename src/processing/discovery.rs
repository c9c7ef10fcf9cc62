//! Recursive discovery of source files.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::SourceFile;
use crate::utils::{ConverterResult, matches_extension, validate_source_root};

/// Upper bound on recursion depth. Symlinks are not followed, so this only
/// guards against pathologically deep trees.
const MAX_DEPTH: usize = 256;

/// Enumerates files under a root whose extension is in an allow-list.
///
/// Iteration is lazy and can be repeated; nothing is cached between passes.
/// Order follows the directory entry order of the filesystem.
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    root: PathBuf,
    extensions: BTreeSet<String>,
}

impl FileDiscovery {
    /// Fails with `NotFound` / `NotADirectory` if `root` is not a readable directory.
    /// `extensions` are expected lower-case without the leading dot.
    pub fn new(root: impl Into<PathBuf>, extensions: BTreeSet<String>) -> ConverterResult<Self> {
        let root = root.into();
        validate_source_root(&root)?;
        Ok(Self { root, extensions })
    }

    pub fn iter(&self) -> impl Iterator<Item = SourceFile> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .max_depth(MAX_DEPTH)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry during discovery: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| matches_extension(entry.path(), &self.extensions))
            .map(|entry| {
                debug!("Discovered {}", entry.path().display());
                SourceFile::new(entry.into_path())
            })
    }
}

impl<'a> IntoIterator for &'a FileDiscovery {
    type Item = SourceFile;
    type IntoIter = Box<dyn Iterator<Item = SourceFile> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Convenience wrapper: validates `root` and returns its discovery handle.
pub fn discover(root: &Path, extensions: &BTreeSet<String>) -> ConverterResult<FileDiscovery> {
    FileDiscovery::new(root, extensions.clone())
}
