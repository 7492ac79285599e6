//! Pointer interaction state machine.
//!
//! ```text
//!            begin_drag                 end_drag
//!   Idle ───────────────▶ Dragging ───────────────▶ Idle
//!                          │    ▲
//!                          └────┘ update_drag
//! ```
//!
//! `set_scale` and `rotate` are accepted in either state. Calls that make no
//! sense in the current state (`update_drag` while idle, `end_drag` twice)
//! are ignored rather than treated as errors.

use super::view::{Point, ScaleLimits, ViewTransform};

/// Whether a drag gesture is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Pointer-down position minus the offset at that moment.
    Dragging { anchor: Point },
}

/// View transform plus the gesture driving it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    transform: ViewTransform,
    interaction: Interaction,
    limits: ScaleLimits,
}

impl TransformState {
    /// Start idle at `limits.min * initial_margin`.
    pub fn new(limits: ScaleLimits, initial_margin: f64) -> Self {
        let mut transform = ViewTransform::initial(limits.min, initial_margin);
        transform.scale = limits.clamp(transform.scale);
        Self {
            transform,
            interaction: Interaction::Idle,
            limits,
        }
    }

    /// Reinitialize for a new source.
    pub fn reset(&mut self, limits: ScaleLimits, initial_margin: f64) {
        *self = Self::new(limits, initial_margin);
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn limits(&self) -> ScaleLimits {
        self.limits
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.interaction, Interaction::Dragging { .. })
    }

    /// Pointer down. A second `begin_drag` restarts the gesture from the
    /// current offset.
    pub fn begin_drag(&mut self, x: f64, y: f64) {
        if self.is_dragging() {
            self.end_drag();
        }
        let anchor = Point::new(x, y).minus(self.transform.offset);
        self.interaction = Interaction::Dragging { anchor };
    }

    /// Pointer move. Returns whether the offset changed.
    pub fn update_drag(&mut self, x: f64, y: f64) -> bool {
        match self.interaction {
            Interaction::Dragging { anchor } => {
                let offset = Point::new(x, y).minus(anchor);
                let changed = offset != self.transform.offset;
                self.transform.offset = offset;
                changed
            }
            Interaction::Idle => false,
        }
    }

    /// Pointer up or cancel.
    pub fn end_drag(&mut self) {
        self.interaction = Interaction::Idle;
    }

    /// Set the zoom, clamped to the current limits. Returns whether the
    /// scale changed; non-finite input is ignored.
    pub fn set_scale(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let scale = self.limits.clamp(value);
        let changed = scale != self.transform.scale;
        self.transform.scale = scale;
        changed
    }

    /// Rotate a quarter turn clockwise.
    pub fn rotate(&mut self) {
        self.transform.rotation = self.transform.rotation.next();
    }

    /// Overwrite the scale without clamping. Used when export corrects a
    /// coverage violation.
    pub(crate) fn force_scale(&mut self, scale: f64) {
        self.transform.scale = scale;
    }
}

#[cfg(test)]
mod tests {
    use super::super::view::Rotation;
    use super::*;

    fn state() -> TransformState {
        TransformState::new(ScaleLimits { min: 0.15, max: 3.0 }, 1.1)
    }

    #[test]
    fn test_starts_idle_at_initial_scale() {
        let s = state();
        assert_eq!(s.interaction(), Interaction::Idle);
        assert!((s.transform().scale - 0.165).abs() < 1e-12);
    }

    #[test]
    fn test_drag_moves_offset() {
        let mut s = state();
        s.begin_drag(100.0, 100.0);
        assert!(s.is_dragging());
        assert!(s.update_drag(130.0, 90.0));
        assert_eq!(s.transform().offset, Point::new(30.0, -10.0));
        s.end_drag();
        assert!(!s.is_dragging());

        // A second gesture continues from where the first left off
        s.begin_drag(0.0, 0.0);
        s.update_drag(5.0, 5.0);
        assert_eq!(s.transform().offset, Point::new(35.0, -5.0));
    }

    #[test]
    fn test_update_while_idle_is_noop() {
        let mut s = state();
        assert!(!s.update_drag(50.0, 50.0));
        assert_eq!(s.transform().offset, Point::ORIGIN);
    }

    #[test]
    fn test_end_drag_is_idempotent() {
        let mut s = state();
        s.end_drag();
        s.begin_drag(1.0, 1.0);
        s.end_drag();
        s.end_drag();
        assert_eq!(s.interaction(), Interaction::Idle);
    }

    #[test]
    fn test_begin_while_dragging_restarts_gesture() {
        let mut s = state();
        s.begin_drag(0.0, 0.0);
        s.update_drag(10.0, 0.0);
        s.begin_drag(50.0, 50.0);
        assert_eq!(
            s.interaction(),
            Interaction::Dragging {
                anchor: Point::new(40.0, 50.0)
            }
        );
        s.update_drag(60.0, 50.0);
        assert_eq!(s.transform().offset, Point::new(20.0, 0.0));
    }

    #[test]
    fn test_set_scale_clamps() {
        let mut s = state();
        s.set_scale(0.05);
        assert_eq!(s.transform().scale, 0.15);
        s.set_scale(10.0);
        assert_eq!(s.transform().scale, 3.0);
        assert!(s.set_scale(1.5));
        assert!(!s.set_scale(1.5));
        assert!(!s.set_scale(f64::NAN));
        assert_eq!(s.transform().scale, 1.5);
    }

    #[test]
    fn test_scale_and_rotate_during_drag() {
        let mut s = state();
        s.begin_drag(0.0, 0.0);
        s.set_scale(2.0);
        s.rotate();
        assert!(s.is_dragging());
        assert_eq!(s.transform().scale, 2.0);
        assert_eq!(s.transform().rotation, Rotation::Deg90);
    }

    #[test]
    fn test_reset_discards_gesture() {
        let mut s = state();
        s.begin_drag(0.0, 0.0);
        s.update_drag(3.0, 4.0);
        s.rotate();
        s.reset(ScaleLimits { min: 1.0, max: 3.0 }, 1.1);
        assert_eq!(s.interaction(), Interaction::Idle);
        assert_eq!(s.transform().offset, Point::ORIGIN);
        assert_eq!(s.transform().rotation, Rotation::Deg0);
        assert!((s.transform().scale - 1.1).abs() < 1e-12);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
