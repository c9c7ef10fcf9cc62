// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod processing;

// Public exports for external consumers
pub use crate::core::{BatchProgress, ConversionPolicy, ConversionResult, JobState, SourceFile};
pub use processing::{BatchJob, BatchRequest, ConversionEngine, FileDiscovery, FileOutcome, JobHandle, discover};
pub use utils::{ConversionError, ConverterError, ConverterResult};
