pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;
pub mod config;

pub use error::{ConversionError, ConverterError, ConverterResult, DeleteWarning};
pub use validation::{clamp_quality, normalize_extensions, validate_source_root};
pub use formats::{DEFAULT_EXTENSIONS, OUTPUT_EXTENSION, normalize_extension, matches_extension};
pub use fs::{create_dir_all, write_atomic, remove_best_effort, file_stem, is_same_file};
pub use config::{ConverterConfig, load_config, load_config_or_default};
