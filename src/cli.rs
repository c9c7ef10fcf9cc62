use clap::Parser;
use std::path::PathBuf;
use heic_converter_lib::ConversionPolicy;
use heic_converter_lib::utils::{ConverterConfig, DEFAULT_EXTENSIONS, normalize_extensions};
use std::collections::BTreeSet;

#[derive(Parser, Debug)]
#[command(name = "heic-converter")]
#[command(author, version, about = "Batch-convert HEIC/HEIF images to JPEG")]
pub struct Cli {
    /// Directory searched recursively for source images
    #[arg(required = true)]
    pub source: PathBuf,

    /// Directory the JPEG files are written to (default: the source directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JPEG quality, 1-100 (default: 95)
    #[arg(short, long, allow_negative_numbers = true)]
    pub quality: Option<i64>,

    /// Name outputs converted_0001.jpg, converted_0002.jpg, ... instead of keeping source names
    #[arg(long)]
    pub sequential_names: bool,

    /// Delete each source file after it converted successfully
    #[arg(long)]
    pub delete_originals: bool,

    /// Source extension to convert (repeatable, default: heic, heif)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Path to a TOML config file (default: ./heic-converter.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the final summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Policy from defaults, then the config file, then command-line flags.
    pub fn policy(&self, config: &ConverterConfig) -> ConversionPolicy {
        let mut policy = config.apply_to(ConversionPolicy::default());
        if let Some(q) = self.quality {
            policy = policy.with_quality(q);
        }
        if self.sequential_names {
            policy = policy.with_keep_original_name(false);
        }
        if self.delete_originals {
            policy = policy.with_delete_source_on_success(true);
        }
        policy
    }

    pub fn extensions(&self, config: &ConverterConfig) -> BTreeSet<String> {
        if !self.extensions.is_empty() {
            normalize_extensions(&self.extensions)
        } else if let Some(exts) = &config.extensions {
            normalize_extensions(exts)
        } else {
            DEFAULT_EXTENSIONS.clone()
        }
    }

    pub fn destination(&self, config: &ConverterConfig) -> PathBuf {
        self.output
            .clone()
            .or_else(|| config.output_dir.clone())
            .unwrap_or_else(|| self.source.clone())
    }
}
