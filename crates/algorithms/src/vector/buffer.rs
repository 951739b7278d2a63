//! Buffer operations
//!
//! Expand each point into a circle approximated as a polygon. The
//! segment count is specified per quarter circle, matching the common
//! GIS convention for buffer curve approximation.

use geo::{LineString, Point, Polygon};
use std::f64::consts::PI;

/// Parameters for point buffering
#[derive(Debug, Clone)]
pub struct BufferParams {
    /// Buffer radius in CRS units
    pub distance: f64,
    /// Line segments per 90° arc (default: 5, so 20 per full circle)
    pub segments: usize,
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            distance: 1.0,
            segments: 5,
        }
    }
}

/// Create a circular buffer around a point.
///
/// Generates a closed polygon approximating a circle of radius
/// `params.distance` with `4 * params.segments` edges.
///
/// A zero distance produces a degenerate zero-area ring whose vertices
/// all coincide with the center; callers treat such buffers as empty
/// contributions rather than special-casing them here.
pub fn buffer_point(point: &Point<f64>, params: &BufferParams) -> Polygon<f64> {
    let n = (params.segments * 4).max(4);
    let r = params.distance.abs();
    let cx = point.x();
    let cy = point.y();

    let mut coords = Vec::with_capacity(n + 1);
    for i in 0..n {
        let angle = 2.0 * PI * i as f64 / n as f64;
        coords.push((cx + r * angle.cos(), cy + r * angle.sin()));
    }
    // Close the ring
    coords.push(coords[0]);

    Polygon::new(LineString::from(coords), vec![])
}
