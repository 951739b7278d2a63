//! # GeoCluster Algorithms
//!
//! Vector analysis algorithms for geocluster.
//!
//! The central operation is distance-based point clustering: every
//! point within a buffer distance of another shares a cluster
//! identifier and a membership count. The `vector` module also exposes
//! the geometric building blocks (buffering, region construction,
//! spatial lookup) the pipeline is assembled from.

pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::vector::{
        buffer_point, classify_point, cluster_points, cluster_points_with_feedback,
        merge_buffers, BoundingBox, BufferParams, ClusterParams, CoordinateCluster, Region,
        RegionIndex, SpatialLookup, COUNT_ID_FIELD, LOCATION_ID_FIELD,
    };
    pub use geocluster_core::prelude::*;
}
