//! View transform and the drag/zoom/rotate interaction driving it.
//!
//! # Coordinate System
//!
//! - Offsets are in logical display units, relative to the frame center
//! - Scale is displayed pixels per source pixel
//! - Rotation is in quarter turns, clockwise on screen (y points down)

mod interaction;
mod view;

pub use interaction::{Interaction, TransformState};
pub use view::{min_scale, Point, Rotation, ScaleLimits, ViewTransform};
