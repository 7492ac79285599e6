//! The view transform applied to the source image inside the crop frame.

use serde::{Deserialize, Serialize};

/// Quarter-turn rotation of the image inside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// The next clockwise quarter turn, wrapping at 360°.
    pub fn next(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Exact `(cos, sin)` of the angle, avoiding `to_radians` round-off.
    pub fn cos_sin(self) -> (f64, f64) {
        match self {
            Rotation::Deg0 => (1.0, 0.0),
            Rotation::Deg90 => (0.0, 1.0),
            Rotation::Deg180 => (-1.0, 0.0),
            Rotation::Deg270 => (0.0, -1.0),
        }
    }
}

/// A point or displacement in logical display units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn minus(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Bounds for the zoom slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleLimits {
    pub min: f64,
    pub max: f64,
}

impl ScaleLimits {
    /// Limits for a source of the given size shown in a `frame_size` frame.
    ///
    /// `max` never drops below `min`, so a source smaller than the frame
    /// still gets a usable (single-valued) range.
    pub fn for_source(width: u32, height: u32, frame_size: u32, max_scale: f64) -> Self {
        let min = min_scale(width, height, frame_size);
        Self {
            min,
            max: max_scale.max(min),
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// The smallest scale at which the short side of the source spans the frame.
pub fn min_scale(width: u32, height: u32, frame_size: u32) -> f64 {
    let short_side = width.min(height).max(1);
    f64::from(frame_size) / f64::from(short_side)
}

/// Zoom, pan and rotation of the image within the crop frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Displayed pixels per source pixel (logical units).
    pub scale: f64,
    /// Pan of the image center from the frame center, in logical units.
    pub offset: Point,
    pub rotation: Rotation,
}

impl ViewTransform {
    /// Initial transform: centered, unrotated, `margin` above the minimum.
    pub fn initial(min_scale: f64, margin: f64) -> Self {
        Self {
            scale: min_scale * margin,
            offset: Point::ORIGIN,
            rotation: Rotation::Deg0,
        }
    }

    pub fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_cycle() {
        let mut r = Rotation::Deg0;
        let mut seen = Vec::new();
        for _ in 0..4 {
            r = r.next();
            seen.push(r.degrees());
        }
        assert_eq!(seen, vec![90, 180, 270, 0]);
    }

    #[test]
    fn test_cos_sin_matches_degrees() {
        for r in [Rotation::Deg0, Rotation::Deg90, Rotation::Deg180, Rotation::Deg270] {
            let (c, s) = r.cos_sin();
            let radians = f64::from(r.degrees()).to_radians();
            assert!((c - radians.cos()).abs() < 1e-12);
            assert!((s - radians.sin()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_min_scale_uses_short_side() {
        assert!((min_scale(4000, 2000, 300) - 0.15).abs() < 1e-12);
        assert!((min_scale(2000, 4000, 300) - 0.15).abs() < 1e-12);
        assert!((min_scale(300, 300, 300) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_limits_never_invert() {
        // 50px source in a 300px frame needs 6x, above the 3x cap
        let limits = ScaleLimits::for_source(50, 80, 300, 3.0);
        assert!((limits.min - 6.0).abs() < 1e-12);
        assert_eq!(limits.max, limits.min);
        assert_eq!(limits.clamp(10.0), 6.0);
    }

    #[test]
    fn test_initial_transform() {
        let t = ViewTransform::initial(0.15, 1.1);
        assert!((t.scale - 0.165).abs() < 1e-12);
        assert_eq!(t.offset, Point::ORIGIN);
        assert_eq!(t.rotation, Rotation::Deg0);
    }
}
