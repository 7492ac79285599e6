//! Final export of the crop frame.
//!
//! Before encoding, the exporter checks that the scale is large enough for
//! the image to cover the whole frame. A frame that would show background at
//! its edges is never exported: the scale is bumped to
//! `min_scale * correction_margin` and the frame is rendered again.

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

use super::jpeg::{encode_frame, EncodeError};
use crate::decode::DecodedImage;

/// Default export correction above the minimum scale.
pub const DEFAULT_CORRECTION_MARGIN: f64 = 1.05;

/// Default JPEG quality for avatars.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// The scale is too small for the image to fill the frame.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("scale {scale} is below the minimum coverage scale {min_scale}")]
pub struct CoverageViolation {
    pub scale: f64,
    pub min_scale: f64,
}

/// Check the coverage invariant `scale >= min_scale`.
pub fn check_coverage(scale: f64, min_scale: f64) -> Result<(), CoverageViolation> {
    // NaN fails the comparison and is treated as a violation
    if scale >= min_scale {
        Ok(())
    } else {
        Err(CoverageViolation { scale, min_scale })
    }
}

/// A JPEG-encoded avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn mime_type(&self) -> &'static str {
        "image/jpeg"
    }

    /// `data:image/jpeg;base64,...`, the shape a canvas `toDataURL` returns.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type(),
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Result of an export.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub image: EncodedImage,
    /// Scale the frame was rendered at, if it had to be corrected.
    pub corrected_scale: Option<f64>,
}

/// Validates coverage and encodes the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exporter {
    correction_margin: f64,
    quality: u8,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(DEFAULT_CORRECTION_MARGIN, DEFAULT_JPEG_QUALITY)
    }
}

impl Exporter {
    pub fn new(correction_margin: f64, quality: u8) -> Self {
        Self {
            correction_margin,
            quality,
        }
    }

    /// Export the frame produced by `render` at `current_scale`.
    ///
    /// `render` is called exactly once, with either `current_scale` or the
    /// corrected scale.
    pub fn export<F>(
        &self,
        current_scale: f64,
        min_scale: f64,
        render: F,
    ) -> Result<Export, EncodeError>
    where
        F: FnOnce(f64) -> DecodedImage,
    {
        let (scale, corrected_scale) = match check_coverage(current_scale, min_scale) {
            Ok(()) => (current_scale, None),
            Err(violation) => {
                let corrected = min_scale * self.correction_margin;
                log::debug!("{violation}; correcting scale to {corrected}");
                (corrected, Some(corrected))
            }
        };

        let frame = render(scale);
        let bytes = encode_frame(&frame, self.quality)?;
        Ok(Export {
            image: EncodedImage {
                bytes,
                width: frame.width,
                height: frame.height,
            },
            corrected_scale,
        })
    }
}
