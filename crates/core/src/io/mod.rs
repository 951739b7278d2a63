//! I/O operations for reading and writing point layers

mod geojson;

pub use geojson::{points_from_geojson, points_to_geojson, read_points, write_points};
