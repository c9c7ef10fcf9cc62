//! Batch runs addressed through the working directory.
//!
//! Kept in its own test binary: changing the current directory affects every
//! thread in the process.

use std::path::Path;
use std::sync::Arc;

use heic_converter_lib::processing::codec::{JpegEncoder, SniffingDecoder};
use heic_converter_lib::{BatchJob, BatchRequest, ConversionEngine, ConversionPolicy, JobState};
use image::{ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;

#[tokio::test]
async fn in_place_run_with_relative_paths_keeps_the_new_output() {
    let dir = TempDir::new().unwrap();
    RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]))
        .save_with_format(dir.path().join("same.jpg"), ImageFormat::Png)
        .unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let job = BatchJob::new(ConversionEngine::new(Arc::new(SniffingDecoder), Arc::new(JpegEncoder)));
    let policy = ConversionPolicy::default().with_delete_source_on_success(true);
    let progress = job
        .run(BatchRequest::new(".", ".").with_policy(policy).with_extensions(["jpg"]))
        .await
        .unwrap();

    assert_eq!(progress.state, JobState::Completed);
    assert_eq!(progress.succeeded, 1);
    let bytes = std::fs::read(Path::new("same.jpg")).expect("converted output must survive");
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}
