//! Vector analysis algorithms
//!
//! Geometric operations on point features:
//! - Buffer: expand points into circle polygons
//! - Spatial: axis-aligned bounding boxes
//! - Regions: dissolve buffers and split into connected components
//! - Index: R-tree candidate lookup over region envelopes
//! - Cluster: distance-based point clustering

pub mod buffer;
pub mod cluster;
pub mod index;
pub mod regions;
pub mod spatial;

pub use buffer::{buffer_point, BufferParams};
pub use cluster::{
    classify_point, cluster_points, cluster_points_with_feedback, ClusterParams,
    CoordinateCluster, COUNT_ID_FIELD, LOCATION_ID_FIELD,
};
pub use index::{RegionIndex, SpatialLookup};
pub use regions::{merge_buffers, Region};
pub use spatial::BoundingBox;
