// src/processing/libvips/mod.rs

//! Native HEIF decoding via libvips-rs.
//!
//! libvips reads HEIC/HEIF through libheif and hands back an image that is
//! normalised to 8-bit sRGB before its pixels are copied out. Only compiled
//! with the `vips` feature.
//!
//! - [`VipsDecoder`]: [`ImageDecoder`](super::codec::ImageDecoder) backed by libvips.

mod decoder;

pub use decoder::VipsDecoder;
