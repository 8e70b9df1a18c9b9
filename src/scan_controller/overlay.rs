//! Bounding-box overlay surface
//!
//! The overlay and the live feed may differ from the displayed size, so the
//! surface is resized to the feed's native pixel dimensions immediately before
//! every draw. Highlights are transient: cleared before drawing and again after a
//! fixed short delay, never accumulated across frames.

use super::types::Point;
use tracing::debug;

/// Drawing surface for the transient scan highlight
///
/// Implementations use interior mutability; the controller shares the surface
/// with its timer tasks behind an `Arc`.
pub trait OverlaySurface: Send + Sync {
    /// Match the surface to the feed's native pixel dimensions
    fn resize(&self, width: u32, height: u32);

    /// Wipe the surface
    fn clear(&self);

    /// Stroke a closed polygon connecting the points in order
    fn stroke_polygon(&self, points: &[Point]);
}

/// Draw one transient highlight: resize, wipe, stroke
///
/// Fewer than 2 points is not a polygon; nothing is drawn.
pub fn draw_bounding_box(surface: &dyn OverlaySurface, points: &[Point], frame: (u32, u32)) {
    if points.len() < 2 {
        return;
    }

    let (width, height) = frame;
    surface.resize(width, height);
    surface.clear();
    surface.stroke_polygon(points);
}

/// Overlay that reports draws through tracing, for headless runs
pub struct LogOverlay;

impl OverlaySurface for LogOverlay {
    fn resize(&self, width: u32, height: u32) {
        debug!(width, height, "Overlay resized");
    }

    fn clear(&self) {
        debug!("Overlay cleared");
    }

    fn stroke_polygon(&self, points: &[Point]) {
        debug!(corners = points.len(), "Highlight drawn");
    }
}
