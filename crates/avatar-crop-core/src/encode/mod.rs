//! Encoding and export of the crop frame.
//!
//! This module provides functionality for:
//! - Encoding RGB frames to JPEG with a configurable quality
//! - Enforcing the coverage invariant before export
//!
//! # Examples
//!
//! ```ignore
//! use avatar_crop_core::encode::Exporter;
//!
//! let export = Exporter::default().export(scale, min_scale, |s| render_at(s))?;
//! upload(export.image.to_data_url());
//! ```

mod export;
mod jpeg;

pub use export::{
    check_coverage, CoverageViolation, EncodedImage, Export, Exporter, DEFAULT_CORRECTION_MARGIN,
    DEFAULT_JPEG_QUALITY,
};
pub use jpeg::{encode_frame, EncodeError};
