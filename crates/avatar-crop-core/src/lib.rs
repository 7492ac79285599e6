//! Avatar Crop Core - profile photo cropping pipeline
//!
//! This crate frames a user's photo inside a square avatar crop: it decodes
//! and orients the source, tracks the drag/zoom/rotate transform, renders the
//! frame at display resolution, and exports it as JPEG.
//!
//! # Module Structure
//!
//! - `decode` - Image references, decoding and EXIF orientation
//! - `transform` - View transform and the pointer interaction state machine
//! - `render` - Drawing the transformed image into the square frame
//! - `encode` - JPEG encoding and coverage-checked export
//! - `cropper` - The [`AvatarCropper`] component composing the above

pub mod config;
pub mod cropper;
pub mod decode;
pub mod encode;
pub mod render;
pub mod transform;

pub use config::{ConfigError, CropperConfig};
pub use cropper::{AvatarCropper, CropError, CropOutcome};
pub use decode::{DecodeError, DecodedImage, ImageSource};
pub use encode::{EncodedImage, Exporter};
pub use render::{render_frame, InterpolationFilter, RenderSettings};
pub use transform::{Point, Rotation, ViewTransform};
