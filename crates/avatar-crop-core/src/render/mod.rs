//! Rendering the crop frame.
//!
//! The frame is a square RGB buffer at `logical_size * pixel_ratio` pixels,
//! drawn with the image rotated and panned about the frame center. Uncovered
//! pixels are filled with an opaque background so the exported JPEG never
//! shows black or transparent edges.

mod canvas;
mod sample;

pub use canvas::{render_frame, Canvas, RenderSettings, MAX_BACKING_SIZE};
pub use sample::InterpolationFilter;
