//! Optional TOML configuration file.
//!
//! Every key is optional; anything left out falls back to the
//! [`ConversionPolicy`] defaults or to the command line.
//!
//! ```toml
//! quality = 90
//! keep_original_name = false
//! delete_source_on_success = false
//! extensions = ["heic", "heif", "avif"]
//! output_dir = "/home/me/Pictures/converted"
//! ```

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::core::ConversionPolicy;
use crate::utils::{ConverterError, ConverterResult};

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "heic-converter.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConverterConfig {
    pub quality: Option<i64>,
    pub keep_original_name: Option<bool>,
    pub delete_source_on_success: Option<bool>,
    pub extensions: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
}

impl ConverterConfig {
    /// Applies the file's values on top of `base`.
    pub fn apply_to(&self, base: ConversionPolicy) -> ConversionPolicy {
        let mut policy = base;
        if let Some(q) = self.quality {
            policy = policy.with_quality(q);
        }
        if let Some(keep) = self.keep_original_name {
            policy = policy.with_keep_original_name(keep);
        }
        if let Some(delete) = self.delete_source_on_success {
            policy = policy.with_delete_source_on_success(delete);
        }
        policy
    }
}

/// Loads configuration from a TOML file.
pub fn load_config(path: &Path) -> ConverterResult<ConverterConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConverterError::config(format!("Failed to read {}: {e}", path.display())))?;
    let config: ConverterConfig = toml::from_str(&content)
        .map_err(|e| ConverterError::config(format!("Failed to parse {}: {e}", path.display())))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Loads `custom_path` if given, else `./heic-converter.toml` if present, else defaults.
pub fn load_config_or_default(custom_path: Option<&Path>) -> ConverterResult<ConverterConfig> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.is_file() {
        return load_config(default_path);
    }

    Ok(ConverterConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_values_override_policy_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf.toml");
        std::fs::write(
            &path,
            "quality = 150\nkeep_original_name = false\nextensions = [\"HEIC\"]\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        let policy = config.apply_to(ConversionPolicy::default());

        assert_eq!(policy.quality(), 100);
        assert!(!policy.keep_original_name());
        assert!(!policy.delete_source_on_success());
        assert_eq!(config.extensions, Some(vec!["HEIC".to_string()]));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf.toml");
        std::fs::write(&path, "qualty = 80\n").unwrap();

        assert!(matches!(load_config(&path), Err(ConverterError::Config(_))));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = load_config_or_default(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConverterError::Config(_))));
    }
}
