//! The conversion pipeline.
//!
//! - [`discovery`]: finds source files under a root
//! - [`codec`]: decoder/encoder seam and raw pixel reconstruction
//! - [`engine`]: converts a single file
//! - [`batch`]: runs a cancellable batch over everything discovered

pub mod batch;
pub mod codec;
pub mod discovery;
pub mod engine;
#[cfg(feature = "vips")]
pub mod libvips;

pub use batch::{BatchJob, BatchRequest, FileOutcome, JobHandle};
pub use discovery::{FileDiscovery, discover};
pub use engine::{ConversionEngine, destination_path};
