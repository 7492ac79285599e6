//! Pixel sampling with bilinear and Lanczos3 interpolation.
//!
//! Coordinates are continuous source-image coordinates where pixel `(i, j)`
//! covers `[i, i + 1) x [j, j + 1)`, so its center sits at `(i + 0.5, j + 0.5)`.
//! Taps falling outside the image are clamped to the nearest edge pixel,
//! which keeps the border of the drawn image free of background color.

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;

/// Interpolation filter used when drawing the source into the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation - good for interactive preview.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation - good for export.
    Lanczos3,
}

/// Lanczos window half-width at 1:1 scale, in source pixels.
const LANCZOS_A: f64 = 3.0;

/// Largest kernel stretch applied when downscaling.
const MAX_FOOTPRINT: f64 = 8.0;

/// Upper bound on taps per axis: `2 * LANCZOS_A * MAX_FOOTPRINT + 1`.
const MAX_TAPS: usize = 64;

/// Sample `image` at `(x, y)` with the given filter.
///
/// `footprint` is the number of source pixels covered by one output pixel.
/// Lanczos3 stretches its kernel by it when downscaling so fine detail is
/// averaged rather than aliased; bilinear ignores it.
#[inline]
pub(crate) fn sample(
    image: &DecodedImage,
    x: f64,
    y: f64,
    filter: InterpolationFilter,
    footprint: f64,
) -> [u8; 3] {
    match filter {
        InterpolationFilter::Bilinear => sample_bilinear(image, x, y),
        InterpolationFilter::Lanczos3 => sample_lanczos3(image, x, y, footprint),
    }
}

/// Get a pixel as [f64; 3], clamping coordinates to the image.
#[inline]
fn get_pixel_clamped(image: &DecodedImage, px: i64, py: i64) -> [f64; 3] {
    let px = px.clamp(0, image.width as i64 - 1) as usize;
    let py = py.clamp(0, image.height as i64 - 1) as usize;
    let idx = (py * image.width as usize + px) * 3;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
    ]
}

/// Bilinear interpolation over the 4 nearest pixel centers.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let sx = x - 0.5;
    let sy = y - 0.5;
    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = sx - x0;
    let fy = sy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = get_pixel_clamped(image, x0, y0);
    let p10 = get_pixel_clamped(image, x0 + 1, y0);
    let p01 = get_pixel_clamped(image, x0, y0 + 1);
    let p11 = get_pixel_clamped(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    result
}

/// Lanczos3 interpolation, with the kernel widened by `footprint` (clamped
/// to `1..=MAX_FOOTPRINT`).
fn sample_lanczos3(image: &DecodedImage, x: f64, y: f64, footprint: f64) -> [u8; 3] {
    let footprint = if footprint.is_finite() {
        footprint.clamp(1.0, MAX_FOOTPRINT)
    } else {
        1.0
    };
    let sx = x - 0.5;
    let sy = y - 0.5;

    let mut wx = [0.0f64; MAX_TAPS];
    let mut wy = [0.0f64; MAX_TAPS];
    let (x0, nx) = kernel_weights(sx, footprint, &mut wx);
    let (y0, ny) = kernel_weights(sy, footprint, &mut wy);

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;
    for (ky, wy) in wy[..ny].iter().enumerate() {
        for (kx, wx) in wx[..nx].iter().enumerate() {
            let weight = wx * wy;
            let pixel = get_pixel_clamped(image, x0 + kx as i64, y0 + ky as i64);
            sum[0] += pixel[0] * weight;
            sum[1] += pixel[1] * weight;
            sum[2] += pixel[2] * weight;
            weight_sum += weight;
        }
    }

    // Fall back to bilinear if weights degenerate
    if weight_sum.abs() < 1e-10 {
        return sample_bilinear(image, x, y);
    }

    [
        (sum[0] / weight_sum).clamp(0.0, 255.0).round() as u8,
        (sum[1] / weight_sum).clamp(0.0, 255.0).round() as u8,
        (sum[2] / weight_sum).clamp(0.0, 255.0).round() as u8,
    ]
}

/// Fill `weights` for the pixel centers within the stretched window around
/// `center`. Returns the first tap index and the number of taps.
fn kernel_weights(center: f64, footprint: f64, weights: &mut [f64; MAX_TAPS]) -> (i64, usize) {
    let radius = LANCZOS_A * footprint;
    let first = (center - radius).ceil() as i64;
    let mut count = 0;
    while count < MAX_TAPS {
        let distance = center - (first + count as i64) as f64;
        if distance <= -radius {
            break;
        }
        weights[count] = lanczos_weight(distance / footprint, LANCZOS_A);
        count += 1;
    }
    (first, count)
}

/// Lanczos kernel with window size `a`.
#[inline]
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < 1e-10 {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }
    let pi_x = std::f64::consts::PI * x;
    a * pi_x.sin() * (pi_x / a).sin() / (pi_x * pi_x)
}
