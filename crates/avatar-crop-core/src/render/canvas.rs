//! Drawing the transformed source into the square crop frame.
//!
//! # Algorithm
//!
//! The frame is drawn as if on a 2D canvas: fill with the background,
//! translate to the center, rotate, then draw the image centered at the
//! (scaled) offset with size `natural * scale * pixel_ratio`. Rather than
//! rasterizing forward, each backing pixel center `p` is mapped back into the
//! source:
//!
//! ```text
//! q   = R(-θ) · (p - center)
//! src = (q - offset · ratio) / (scale · ratio) + (width, height) / 2
//! ```
//!
//! Pixels whose `src` falls outside the image keep the background color.

use serde::{Deserialize, Serialize};

use super::sample::{sample, InterpolationFilter};
use crate::decode::DecodedImage;
use crate::transform::ViewTransform;

/// Largest backing side, in pixels, a frame may have.
pub const MAX_BACKING_SIZE: u32 = 8192;

/// Frame geometry and fill for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Frame side in logical display units.
    pub logical_size: u32,
    /// Backing pixels per logical unit.
    pub pixel_ratio: u32,
    /// Opaque fill for anything the image does not cover.
    pub background: [u8; 3],
    pub filter: InterpolationFilter,
}

impl RenderSettings {
    /// Side of the backing buffer in pixels, or `None` if it exceeds
    /// [`MAX_BACKING_SIZE`].
    pub fn checked_backing_size(&self) -> Option<u32> {
        self.logical_size
            .checked_mul(self.pixel_ratio)
            .filter(|&side| side <= MAX_BACKING_SIZE)
    }

    /// Side of the backing buffer in pixels, capped at [`MAX_BACKING_SIZE`].
    pub fn backing_size(&self) -> u32 {
        self.checked_backing_size().unwrap_or(MAX_BACKING_SIZE)
    }

    pub fn with_filter(self, filter: InterpolationFilter) -> Self {
        Self { filter, ..self }
    }
}

/// A square backing buffer owned by one cropper session.
///
/// The buffer is allocated once and redrawn in place on every transform
/// change; dropping the canvas releases it.
#[derive(Debug, Clone)]
pub struct Canvas {
    settings: RenderSettings,
    frame: DecodedImage,
}

impl Canvas {
    /// Allocate a canvas filled with the background color.
    pub fn new(settings: RenderSettings) -> Self {
        let side = settings.backing_size();
        Self {
            settings,
            frame: DecodedImage::filled(side, side, settings.background),
        }
    }

    /// The most recently drawn frame.
    pub fn frame(&self) -> &DecodedImage {
        &self.frame
    }

    /// Redraw the frame for `transform`. Drawing nothing leaves the
    /// background in place.
    pub fn draw(&mut self, source: Option<&DecodedImage>, transform: &ViewTransform) {
        let background = self.settings.background;
        for px in self.frame.pixels.chunks_exact_mut(3) {
            px.copy_from_slice(&background);
        }

        let Some(source) = source.filter(|s| !s.is_empty()) else {
            return;
        };
        if !(transform.scale.is_finite() && transform.scale > 0.0) {
            return;
        }

        let side = self.frame.width;
        let ratio = f64::from(self.settings.pixel_ratio);
        let center = f64::from(side) / 2.0;
        let drawn_scale = transform.scale * ratio;
        // Source pixels under one backing pixel
        let footprint = 1.0 / drawn_scale;
        let (cos, sin) = transform.rotation.cos_sin();
        let off_x = transform.offset.x * ratio;
        let off_y = transform.offset.y * ratio;
        let half_w = f64::from(source.width) / 2.0;
        let half_h = f64::from(source.height) / 2.0;
        let (src_w, src_h) = (f64::from(source.width), f64::from(source.height));

        for dst_y in 0..side {
            let py = f64::from(dst_y) + 0.5 - center;
            let row_start = (dst_y as usize) * (side as usize) * 3;

            for dst_x in 0..side {
                let px = f64::from(dst_x) + 0.5 - center;

                // Undo the rotation
                let qx = px * cos + py * sin;
                let qy = -px * sin + py * cos;

                // Undo offset and scale
                let src_x = (qx - off_x) / drawn_scale + half_w;
                let src_y = (qy - off_y) / drawn_scale + half_h;

                if src_x < 0.0 || src_x >= src_w || src_y < 0.0 || src_y >= src_h {
                    continue;
                }

                let pixel = sample(source, src_x, src_y, self.settings.filter, footprint);
                let idx = row_start + (dst_x as usize) * 3;
                self.frame.pixels[idx..idx + 3].copy_from_slice(&pixel);
            }
        }
    }

    /// Take the drawn frame, leaving the canvas empty.
    pub fn into_frame(self) -> DecodedImage {
        self.frame
    }
}

/// Render `source` under `transform` into a freshly allocated frame.
///
/// Pure and deterministic: the same inputs always yield the same pixels.
pub fn render_frame(
    source: &DecodedImage,
    transform: &ViewTransform,
    settings: &RenderSettings,
) -> DecodedImage {
    let mut canvas = Canvas::new(*settings);
    canvas.draw(Some(source), transform);
    canvas.into_frame()
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::transform::{min_scale, Point, Rotation};
    use proptest::prelude::*;

    const FILL: [u8; 3] = [10, 200, 30];

    fn rotation_strategy() -> impl Strategy<Value = Rotation> {
        prop_oneof![
            Just(Rotation::Deg0),
            Just(Rotation::Deg90),
            Just(Rotation::Deg180),
            Just(Rotation::Deg270),
        ]
    }

    proptest! {
        /// Property: At or above the minimum scale, the center of every frame
        /// edge shows image content.
        #[test]
        fn prop_min_scale_covers_edge_centers(
            (width, height) in (4u32..=64, 4u32..=64),
            factor in 1.0f64..=3.0,
            rotation in rotation_strategy(),
            filter in prop_oneof![Just(InterpolationFilter::Bilinear), Just(InterpolationFilter::Lanczos3)],
        ) {
            let settings = RenderSettings {
                logical_size: 16,
                pixel_ratio: 2,
                background: [255, 255, 255],
                filter,
            };
            let src = DecodedImage::filled(width, height, FILL);
            let t = ViewTransform {
                scale: min_scale(width, height, settings.logical_size) * factor,
                offset: Point::ORIGIN,
                rotation,
            };
            let frame = render_frame(&src, &t, &settings);
            let last = frame.width - 1;
            let mid = frame.width / 2;

            prop_assert_eq!(frame.pixel(mid, 0), FILL);
            prop_assert_eq!(frame.pixel(mid, last), FILL);
            prop_assert_eq!(frame.pixel(0, mid), FILL);
            prop_assert_eq!(frame.pixel(last, mid), FILL);
        }

        /// Property: Rendering never changes the frame size.
        #[test]
        fn prop_frame_size_fixed(
            scale in 0.01f64..=5.0,
            offset in (-50.0f64..50.0, -50.0f64..50.0),
            rotation in rotation_strategy(),
        ) {
            let settings = RenderSettings {
                logical_size: 12,
                pixel_ratio: 2,
                background: [0, 0, 0],
                filter: InterpolationFilter::Bilinear,
            };
            let src = DecodedImage::filled(9, 7, FILL);
            let t = ViewTransform { scale, offset: Point::new(offset.0, offset.1), rotation };
            let frame = render_frame(&src, &t, &settings);
            prop_assert_eq!((frame.width, frame.height), (24, 24));
            prop_assert_eq!(frame.pixels.len(), 24 * 24 * 3);
        }
    }
}
