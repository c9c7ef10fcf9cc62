//! Core types shared by the conversion pipeline.
//!
//! - [`ConversionPolicy`]: Per-batch settings (quality, naming, deletion)
//! - [`SourceFile`]: A discovered input file
//! - [`ConversionResult`]: Outcome of converting one file
//! - [`BatchProgress`]: Progress snapshot published by a running batch

mod types;
mod progress;

pub use types::{ConversionPolicy, SourceFile, ConversionResult, DEFAULT_QUALITY};
pub use progress::{BatchProgress, JobState};
