//! Cropper configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DEFAULT_MAX_SOURCE_BYTES;
use crate::encode::{DEFAULT_CORRECTION_MARGIN, DEFAULT_JPEG_QUALITY};
use crate::render::{InterpolationFilter, RenderSettings, MAX_BACKING_SIZE};

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must be a finite number of at least {min}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        value: f64,
    },

    #[error("jpeg_quality must be between 1 and 100, got {0}")]
    Quality(u8),

    #[error(
        "output_size {output_size} x pixel_ratio {pixel_ratio} exceeds the {max} px frame limit"
    )]
    FrameTooLarge {
        output_size: u32,
        pixel_ratio: u32,
        max: u32,
    },
}

/// Tuning parameters for the avatar cropper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperConfig {
    /// Side of the square crop frame in logical display units.
    pub output_size: u32,
    /// Backing pixels per logical unit.
    pub pixel_ratio: u32,
    /// Upper bound of the zoom slider.
    pub max_scale: f64,
    /// Initial scale relative to the minimum.
    pub initial_margin: f64,
    /// Scale relative to the minimum used when export corrects coverage.
    pub correction_margin: f64,
    pub jpeg_quality: u8,
    /// Fill color behind the image.
    pub background: [u8; 3],
    pub preview_filter: InterpolationFilter,
    pub export_filter: InterpolationFilter,
    /// Largest encoded input accepted by the loader.
    pub max_source_bytes: usize,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            output_size: 300,
            pixel_ratio: 2,
            max_scale: 3.0,
            initial_margin: 1.1,
            correction_margin: DEFAULT_CORRECTION_MARGIN,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            background: [255, 255, 255],
            preview_filter: InterpolationFilter::Bilinear,
            export_filter: InterpolationFilter::Lanczos3,
            max_source_bytes: DEFAULT_MAX_SOURCE_BYTES,
        }
    }
}

impl CropperConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_size == 0 {
            return Err(ConfigError::Zero {
                field: "output_size",
            });
        }
        if self.pixel_ratio == 0 {
            return Err(ConfigError::Zero {
                field: "pixel_ratio",
            });
        }
        if self.max_source_bytes == 0 {
            return Err(ConfigError::Zero {
                field: "max_source_bytes",
            });
        }
        if self.preview_settings().checked_backing_size().is_none() {
            return Err(ConfigError::FrameTooLarge {
                output_size: self.output_size,
                pixel_ratio: self.pixel_ratio,
                max: MAX_BACKING_SIZE,
            });
        }
        if !(self.max_scale.is_finite() && self.max_scale > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "max_scale",
                min: 0.0,
                value: self.max_scale,
            });
        }
        for (field, value) in [
            ("initial_margin", self.initial_margin),
            ("correction_margin", self.correction_margin),
        ] {
            if !(value.is_finite() && value >= 1.0) {
                return Err(ConfigError::OutOfRange {
                    field,
                    min: 1.0,
                    value,
                });
            }
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Quality(self.jpeg_quality));
        }
        Ok(())
    }

    /// Settings for interactive preview renders.
    pub fn preview_settings(&self) -> RenderSettings {
        RenderSettings {
            logical_size: self.output_size,
            pixel_ratio: self.pixel_ratio,
            background: self.background,
            filter: self.preview_filter,
        }
    }

    /// Settings for the exported frame.
    pub fn export_settings(&self) -> RenderSettings {
        self.preview_settings().with_filter(self.export_filter)
    }
}
