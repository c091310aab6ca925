//! Logical page space and the screen → logical conversion.
//!
//! Every stored position lives in a fixed 800×1120 page space. On-screen
//! scale is a view transform applied at the input boundary only and never
//! persisted.

use serde::{Deserialize, Serialize};

/// Logical page width.
pub const PAGE_WIDTH: f32 = 800.0;
/// Logical page height.
pub const PAGE_HEIGHT: f32 = 1120.0;
/// Offset from a node's top-left corner to its nominal anchor (centre of
/// the default widget). Used for drop placement and connection endpoints.
pub const ANCHOR_OFFSET: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The anchor point of a node whose top-left corner is `self`.
    pub fn anchor(self) -> Self {
        Self::new(self.x + ANCHOR_OFFSET, self.y + ANCHOR_OFFSET)
    }
}

/// Screen-pixels-per-logical-unit on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

impl ViewTransform {
    /// Same zoom on both axes. Non-positive zoom falls back to 1.
    pub fn uniform(zoom: f32) -> Self {
        let zoom = if zoom > 0.0 && zoom.is_finite() { zoom } else { 1.0 };
        Self {
            scale_x: zoom,
            scale_y: zoom,
        }
    }

    /// Derive the transform from the canvas's rendered pixel size.
    pub fn from_canvas_size(pixel_width: f32, pixel_height: f32) -> Self {
        let sx = pixel_width / PAGE_WIDTH;
        let sy = pixel_height / PAGE_HEIGHT;
        if sx > 0.0 && sy > 0.0 && sx.is_finite() && sy.is_finite() {
            Self {
                scale_x: sx,
                scale_y: sy,
            }
        } else {
            Self::default()
        }
    }

    /// Screen point (relative to the canvas's top-left) → logical point.
    pub fn to_logical(&self, sx: f32, sy: f32) -> Point {
        Point::new(sx / self.scale_x, sy / self.scale_y)
    }

    /// Screen delta → logical delta.
    pub fn delta_to_logical(&self, dx: f32, dy: f32) -> (f32, f32) {
        (dx / self.scale_x, dy / self.scale_y)
    }

    /// Where a node dropped at screen point `(sx, sy)` lands: the logical
    /// point minus the anchor offset, so the widget's anchor sits under the
    /// pointer.
    pub fn drop_position(&self, sx: f32, sy: f32) -> Point {
        let p = self.to_logical(sx, sy);
        Point::new(p.x - ANCHOR_OFFSET, p.y - ANCHOR_OFFSET)
    }

    /// Fit a page into a container with `margin` pixels of slack on each axis,
    /// keeping the aspect ratio (the editor's auto-zoom).
    pub fn fit(container_width: f32, container_height: f32, margin: f32) -> Self {
        let w = (container_width - margin) / PAGE_WIDTH;
        let h = (container_height - margin) / PAGE_HEIGHT;
        Self::uniform(w.min(h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_at_half_scale() {
        let t = ViewTransform::from_canvas_size(400.0, 560.0);
        let p = t.drop_position(120.0, 120.0);
        assert_eq!(p, Point::new(200.0, 200.0));
    }

    #[test]
    fn delta_scales_inversely() {
        let t = ViewTransform::uniform(0.25);
        assert_eq!(t.delta_to_logical(10.0, -5.0), (40.0, -20.0));
    }

    #[test]
    fn degenerate_sizes_fall_back_to_identity() {
        assert_eq!(ViewTransform::from_canvas_size(0.0, 100.0), ViewTransform::default());
        assert_eq!(ViewTransform::uniform(-2.0), ViewTransform::default());
    }

    #[test]
    fn fit_picks_the_tighter_axis() {
        let t = ViewTransform::fit(840.0, 600.0, 40.0);
        assert!((t.scale_x - 560.0 / 1120.0).abs() < 1e-6);
    }
}
