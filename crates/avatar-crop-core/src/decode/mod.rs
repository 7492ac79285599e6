//! Image loading for the cropper.
//!
//! This module provides functionality for:
//! - Resolving image references (raw bytes or `data:` URLs)
//! - Decoding JPEG, PNG and WebP into RGB pixels
//! - Applying EXIF orientation so pixels and dimensions are upright
//!
//! # Architecture
//!
//! Decoding is synchronous. In the browser the asynchronous file read happens
//! in JavaScript and the bytes are handed to the loader in one call.
//!
//! # Examples
//!
//! ```ignore
//! use avatar_crop_core::decode::{ImageLoader, ImageSource};
//!
//! let bytes = std::fs::read("portrait.jpg").unwrap();
//! let image = ImageLoader::default().load(ImageSource::Bytes(bytes)).unwrap();
//! println!("Loaded {}x{} image", image.width, image.height);
//! ```

mod loader;
mod orientation;
mod source;
mod types;

pub use loader::{Decoder, ImageLoader, OrientedDecoder, PlainDecoder, DEFAULT_MAX_SOURCE_BYTES};
pub use orientation::read_orientation;
pub use source::ImageSource;
pub use types::{DecodeError, DecodedImage, Orientation};

#[cfg(test)]
pub(crate) use orientation::fixtures;
