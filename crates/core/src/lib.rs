//! # GeoCluster Core
//!
//! Core types, traits and I/O for the geocluster library.
//!
//! This crate provides:
//! - `PointLayer`: in-memory vector point dataset (schema + CRS + features)
//! - `Crs`: Coordinate Reference System handling
//! - `Feedback`: progress reporting and cooperative cancellation
//! - The `Algorithm` trait for a consistent API
//! - GeoJSON I/O for point layers

pub mod crs;
pub mod error;
pub mod feedback;
pub mod io;
pub mod vector;

pub use crs::Crs;
pub use error::{Error, Result};
pub use feedback::{Feedback, SilentFeedback};
pub use vector::{AttributeValue, Field, FieldType, PointFeature, PointLayer, Schema};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::feedback::{Feedback, SilentFeedback};
    pub use crate::vector::{
        AttributeValue, Field, FieldType, PointFeature, PointLayer, Schema,
    };
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in geocluster.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
