//! Viewport visibility gate.
//!
//! The animation only runs while its surface is at least partially inside
//! the viewport, grown by a fixed margin so it starts just before scrolling
//! into view.

/// Margin added around the viewport, in CSS pixels.
pub const VIEWPORT_MARGIN_PX: f64 = 50.0;

/// Axis-aligned rectangle in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }
}

/// Whether `target` touches `viewport` grown by `margin`.
///
/// Edge contact counts as intersecting, matching a zero threshold observer.
///
/// ```rust
/// use vaporize_text::visibility::{intersects_viewport, Rect, VIEWPORT_MARGIN_PX};
///
/// let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
/// // 30px below the fold is still inside the margin
/// assert!(intersects_viewport(Rect::new(0.0, 630.0, 100.0, 40.0), viewport, VIEWPORT_MARGIN_PX));
/// assert!(!intersects_viewport(Rect::new(0.0, 700.0, 100.0, 40.0), viewport, VIEWPORT_MARGIN_PX));
/// ```
pub fn intersects_viewport(target: Rect, viewport: Rect, margin: f64) -> bool {
    let area = viewport.inflate(margin);
    target.x <= area.right()
        && target.right() >= area.x
        && target.y <= area.bottom()
        && target.bottom() >= area.y
}

/// A change in visibility reported by [`VisibilityGate::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityChange {
    Entered,
    Left,
}

/// Tracks the visibility signal and reports only its transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityGate {
    visible: bool,
}

impl VisibilityGate {
    /// Start out of view until the first observation.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Record a new observation, returning the transition if any.
    pub fn update(&mut self, visible: bool) -> Option<VisibilityChange> {
        if self.visible == visible {
            return None;
        }
        self.visible = visible;
        Some(if visible {
            VisibilityChange::Entered
        } else {
            VisibilityChange::Left
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_reports_transitions_only() {
        let mut gate = VisibilityGate::new();
        assert!(!gate.is_visible());
        assert_eq!(gate.update(false), None);
        assert_eq!(gate.update(true), Some(VisibilityChange::Entered));
        assert_eq!(gate.update(true), None);
        assert!(gate.is_visible());
        assert_eq!(gate.update(false), Some(VisibilityChange::Left));
        assert_eq!(gate.update(false), None);
    }

    #[test]
    fn test_intersection_with_margin() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        let inside = Rect::new(100.0, 100.0, 200.0, 50.0);
        let above = Rect::new(100.0, -140.0, 200.0, 100.0);
        let far_above = Rect::new(100.0, -200.0, 200.0, 100.0);
        let right_edge = Rect::new(850.0, 10.0, 20.0, 20.0);

        assert!(intersects_viewport(inside, viewport, VIEWPORT_MARGIN_PX));
        assert!(intersects_viewport(above, viewport, VIEWPORT_MARGIN_PX));
        assert!(!intersects_viewport(far_above, viewport, VIEWPORT_MARGIN_PX));
        assert!(intersects_viewport(right_edge, viewport, VIEWPORT_MARGIN_PX));
        assert!(!intersects_viewport(right_edge, viewport, 0.0));
    }
}
