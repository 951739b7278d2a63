//! Region construction: dissolve buffers and split into singleparts
//!
//! The union of all buffer polygons is decomposed into its connected
//! components. Each component becomes one region with a 1-based integer
//! identifier assigned in the order the union yields parts; identifiers
//! are stable for a given input and are never renumbered.

use super::spatial::BoundingBox;
use geo::{unary_union, Area, Polygon};

/// One connected component of the dissolved buffer geometry
#[derive(Debug, Clone)]
pub struct Region {
    /// 1-based identifier; regions are stored in id order
    pub id: u32,
    /// Component polygon, possibly non-convex or holed
    pub polygon: Polygon<f64>,
    /// Cached envelope for index construction and coarse queries
    pub bbox: BoundingBox,
}

/// Dissolve buffer polygons and split the result into regions.
///
/// Zero-area buffers (radius-0 circles, collapsed rings) contribute
/// nothing, mirroring how GEOS-backed hosts treat a zero-distance point
/// buffer as an empty geometry. A fully degenerate input therefore
/// yields an empty region set rather than an error.
pub fn merge_buffers(buffers: &[Polygon<f64>]) -> Vec<Region> {
    let solid: Vec<&Polygon<f64>> = buffers
        .iter()
        .filter(|p| p.unsigned_area() > 0.0)
        .collect();
    if solid.is_empty() {
        return Vec::new();
    }

    let dissolved = unary_union(solid.into_iter());

    let mut regions = Vec::with_capacity(dissolved.0.len());
    for polygon in dissolved.0 {
        let Some(bbox) = BoundingBox::of_polygon(&polygon) else {
            continue;
        };
        regions.push(Region {
            id: regions.len() as u32 + 1,
            polygon,
            bbox,
        });
    }
    regions
}
