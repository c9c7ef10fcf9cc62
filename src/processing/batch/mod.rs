mod job;

pub use job::{BatchJob, BatchRequest, FileOutcome, JobHandle};
