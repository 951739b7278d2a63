//! Distance-based point clustering
//!
//! Buffers every input point, dissolves the buffers into disjoint
//! regions, then assigns each point the identifier of the region it
//! falls in along with the region's total membership count. Each output
//! row carries the input row's attributes plus two appended integer
//! fields, `location_id` and `count_id`.

use crate::vector::buffer::{buffer_point, BufferParams};
use crate::vector::index::{RegionIndex, SpatialLookup};
use crate::vector::regions::{merge_buffers, Region};
use crate::vector::spatial::BoundingBox;
use geo::{Intersects, Point};
use geocluster_core::{
    Algorithm, AttributeValue, Error, Feedback, Field, FieldType, PointFeature, PointLayer,
    Result, SilentFeedback,
};
use std::collections::HashMap;

/// Name of the appended cluster identifier field
pub const LOCATION_ID_FIELD: &str = "location_id";
/// Name of the appended membership count field
pub const COUNT_ID_FIELD: &str = "count_id";

/// Parameters for distance-based clustering
#[derive(Debug, Clone)]
pub struct ClusterParams {
    /// Buffer radius in CRS units; two points cluster together when
    /// their buffers overlap, i.e. when they lie within twice this
    /// distance of each other
    pub distance: f64,
    /// Line segments per quarter circle of buffer approximation
    pub segments: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            // ~5.5 m at the equator for degree-based data
            distance: 0.00005,
            segments: 5,
        }
    }
}

impl ClusterParams {
    /// Validate parameters, returning `InvalidParameter` before any
    /// processing starts.
    pub fn validate(&self) -> Result<()> {
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(Error::InvalidParameter {
                name: "distance",
                value: self.distance.to_string(),
                reason: "buffer distance must be finite and >= 0".to_string(),
            });
        }
        if self.segments == 0 {
            return Err(Error::InvalidParameter {
                name: "segments",
                value: "0".to_string(),
                reason: "curve approximation needs at least 1 segment per quarter".to_string(),
            });
        }
        Ok(())
    }
}

/// Determine which region contains a point.
///
/// Candidates come from the coarse lookup; each is refined with an
/// exact intersection test against the stored polygon. If a point on a
/// region boundary reports several exact hits, the minimum identifier
/// wins, independent of candidate order. Regions must be stored in id
/// order (ids are 1-based positions), as `merge_buffers` produces them.
pub fn classify_point(
    point: &Point<f64>,
    lookup: &dyn SpatialLookup,
    regions: &[Region],
) -> Option<u32> {
    let query = BoundingBox::of_point(point.x(), point.y());
    let mut assigned: Option<u32> = None;
    for id in lookup.candidates(&query) {
        let region = &regions[(id - 1) as usize];
        if region.polygon.intersects(point) {
            assigned = Some(match assigned {
                Some(best) => best.min(id),
                None => id,
            });
        }
    }
    assigned
}

/// Count assigned points per region identifier.
///
/// Regions no point maps to are absent from the result and read as 0.
fn tally(
    layer: &PointLayer,
    lookup: &dyn SpatialLookup,
    regions: &[Region],
) -> HashMap<u32, usize> {
    let mut counts = HashMap::new();
    for feature in layer.iter() {
        if let Some(point) = &feature.geometry {
            if let Some(id) = classify_point(point, lookup, regions) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// Cluster a point layer with default (silent) feedback.
pub fn cluster_points(layer: &PointLayer, params: &ClusterParams) -> Result<PointLayer> {
    cluster_points_with_feedback(layer, params, &SilentFeedback)
}

/// Cluster a point layer, reporting coarse progress and honoring
/// cancellation between phases.
///
/// Features without geometry contribute nothing to region construction
/// but still occupy an output row, unassigned (`location_id` null,
/// `count_id` 0): output completeness is preferred over silent drops.
/// An empty layer produces an empty output layer, not an error.
pub fn cluster_points_with_feedback(
    layer: &PointLayer,
    params: &ClusterParams,
    feedback: &dyn Feedback,
) -> Result<PointLayer> {
    params.validate()?;

    let mut schema = layer.schema().clone();
    schema.push(Field::new(LOCATION_ID_FIELD, FieldType::Int));
    schema.push(Field::new(COUNT_ID_FIELD, FieldType::Int));
    let mut output = PointLayer::new(schema, layer.crs().clone());

    feedback.progress(0.0);

    // Buffer every feature that has a geometry
    let buffer_params = BufferParams {
        distance: params.distance,
        segments: params.segments,
    };
    let total = layer.len().max(1);
    let mut buffers = Vec::with_capacity(layer.len());
    for (i, feature) in layer.iter().enumerate() {
        if let Some(point) = &feature.geometry {
            buffers.push(buffer_point(point, &buffer_params));
        }
        feedback.progress(i as f64 / total as f64 * 20.0);
    }
    if feedback.canceled() {
        return Err(Error::Canceled);
    }

    // Dissolve buffers into disjoint regions with ids 1..N
    let regions = merge_buffers(&buffers);
    feedback.progress(50.0);
    if feedback.canceled() {
        return Err(Error::Canceled);
    }

    // Index region envelopes for candidate queries
    let index = RegionIndex::build(&regions);
    feedback.progress(70.0);
    if feedback.canceled() {
        return Err(Error::Canceled);
    }

    // First classification pass: membership counts per region
    let counts = tally(layer, &index, &regions);
    feedback.progress(85.0);
    if feedback.canceled() {
        return Err(Error::Canceled);
    }

    // Second classification pass: emit rows in input order. The inputs
    // are identical to the tally pass, so assignments reproduce
    // exactly; caching the first pass would be output-equivalent.
    for feature in layer.iter() {
        let assigned = feature
            .geometry
            .as_ref()
            .and_then(|p| classify_point(p, &index, &regions));
        let count = assigned.map_or(0, |id| counts.get(&id).copied().unwrap_or(0));

        let mut attributes = feature.attributes.clone();
        attributes.push(match assigned {
            Some(id) => AttributeValue::Int(id as i64),
            None => AttributeValue::Null,
        });
        attributes.push(AttributeValue::Int(count as i64));

        output.push(PointFeature {
            geometry: feature.geometry,
            attributes,
        })?;
    }
    feedback.progress(100.0);

    Ok(output)
}

/// Clustering as a reusable [`Algorithm`]
#[derive(Debug, Default, Clone, Copy)]
pub struct CoordinateCluster;

impl Algorithm for CoordinateCluster {
    type Input = PointLayer;
    type Output = PointLayer;
    type Params = ClusterParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "coordinate_cluster"
    }

    fn description(&self) -> &'static str {
        "Cluster points lying within a buffer distance of one another"
    }

    fn execute(&self, input: PointLayer, params: ClusterParams) -> Result<PointLayer> {
        cluster_points(&input, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Polygon};
    use geocluster_core::{Crs, Schema};
    use std::cell::RefCell;

    fn test_layer(points: &[Option<(f64, f64)>]) -> PointLayer {
        let mut schema = Schema::new();
        schema.push(Field::new("name", FieldType::String));
        let mut layer = PointLayer::new(schema, Crs::wgs84());
        for (i, p) in points.iter().enumerate() {
            let attributes = vec![AttributeValue::String(format!("p{}", i))];
            let feature = match p {
                Some((x, y)) => PointFeature::new(Point::new(*x, *y), attributes),
                None => PointFeature::without_geometry(attributes),
            };
            layer.push(feature).unwrap();
        }
        layer
    }

    fn location_of(feature: &PointFeature) -> &AttributeValue {
        &feature.attributes[feature.attributes.len() - 2]
    }

    fn count_of(feature: &PointFeature) -> &AttributeValue {
        feature.attributes.last().unwrap()
    }

    #[test]
    fn test_output_schema_appends_two_int_fields() {
        let layer = test_layer(&[Some((0.0, 0.0))]);
        let out = cluster_points(&layer, &ClusterParams::default()).unwrap();

        let fields = out.schema().fields();
        assert_eq!(fields.len(), 2 + 1);
        assert_eq!(fields[1].name, LOCATION_ID_FIELD);
        assert_eq!(fields[1].ty, FieldType::Int);
        assert_eq!(fields[2].name, COUNT_ID_FIELD);
        assert_eq!(fields[2].ty, FieldType::Int);
        assert_eq!(out.crs(), layer.crs());
    }

    #[test]
    fn test_single_isolated_point() {
        let layer = test_layer(&[Some((12.0, 34.0))]);
        let out = cluster_points(&layer, &ClusterParams::default()).unwrap();

        assert_eq!(out.len(), 1);
        let row = &out.features()[0];
        assert_eq!(location_of(row), &AttributeValue::Int(1));
        assert_eq!(count_of(row), &AttributeValue::Int(1));
        assert_eq!(row.geometry, Some(Point::new(12.0, 34.0)));
    }

    #[test]
    fn test_two_near_points_share_one_region() {
        // 0.00001 apart with distance 0.00005: buffers overlap
        let layer = test_layer(&[Some((0.0, 0.0)), Some((0.00001, 0.0))]);
        let out = cluster_points(&layer, &ClusterParams::default()).unwrap();

        assert_eq!(out.len(), 2);
        for row in out.features() {
            assert_eq!(location_of(row), &AttributeValue::Int(1));
            assert_eq!(count_of(row), &AttributeValue::Int(2));
        }
    }

    #[test]
    fn test_two_far_points_get_distinct_regions() {
        let layer = test_layer(&[Some((0.0, 0.0)), Some((1.0, 0.0))]);
        let out = cluster_points(&layer, &ClusterParams::default()).unwrap();

        let mut ids: Vec<i64> = out
            .features()
            .iter()
            .map(|row| match location_of(row) {
                AttributeValue::Int(id) => *id,
                other => panic!("expected assigned id, got {:?}", other),
            })
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);

        for row in out.features() {
            assert_eq!(count_of(row), &AttributeValue::Int(1));
        }
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let layer = test_layer(&[]);
        let out = cluster_points(&layer, &ClusterParams::default()).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.schema().len(), 3);
    }

    #[test]
    fn test_negative_distance_rejected() {
        let layer = test_layer(&[Some((0.0, 0.0))]);
        let params = ClusterParams {
            distance: -0.5,
            segments: 5,
        };
        let result = cluster_points(&layer, &params);
        assert!(matches!(
            result,
            Err(Error::InvalidParameter { name: "distance", .. })
        ));
    }

    #[test]
    fn test_zero_segments_rejected() {
        let layer = test_layer(&[Some((0.0, 0.0))]);
        let params = ClusterParams {
            distance: 1.0,
            segments: 0,
        };
        let result = cluster_points(&layer, &params);
        assert!(matches!(
            result,
            Err(Error::InvalidParameter { name: "segments", .. })
        ));
    }

    #[test]
    fn test_zero_distance_leaves_points_unassigned() {
        // Radius-0 buffers are empty geometries, so no regions form
        let layer = test_layer(&[Some((0.0, 0.0)), Some((0.0, 0.0))]);
        let params = ClusterParams {
            distance: 0.0,
            segments: 5,
        };
        let out = cluster_points(&layer, &params).unwrap();

        assert_eq!(out.len(), 2);
        for row in out.features() {
            assert_eq!(location_of(row), &AttributeValue::Null);
            assert_eq!(count_of(row), &AttributeValue::Int(0));
        }
    }

    #[test]
    fn test_missing_geometry_passes_through_unassigned() {
        let layer = test_layer(&[Some((0.0, 0.0)), None, Some((0.00001, 0.0))]);
        let out = cluster_points(&layer, &ClusterParams::default()).unwrap();

        assert_eq!(out.len(), 3);

        let skipped = &out.features()[1];
        assert!(skipped.geometry.is_none());
        assert_eq!(skipped.attributes[0], AttributeValue::String("p1".into()));
        assert_eq!(location_of(skipped), &AttributeValue::Null);
        assert_eq!(count_of(skipped), &AttributeValue::Int(0));

        // The geometry-less row does not disturb its neighbors
        for row in [&out.features()[0], &out.features()[2]] {
            assert_eq!(location_of(row), &AttributeValue::Int(1));
            assert_eq!(count_of(row), &AttributeValue::Int(2));
        }
    }

    #[test]
    fn test_rows_keep_input_order_and_attributes() {
        let layer = test_layer(&[Some((5.0, 5.0)), Some((0.0, 0.0)), Some((9.0, 9.0))]);
        let out = cluster_points(&layer, &ClusterParams::default()).unwrap();

        assert_eq!(out.len(), layer.len());
        for (input, row) in layer.iter().zip(out.features()) {
            assert_eq!(row.geometry, input.geometry);
            assert_eq!(&row.attributes[..1], &input.attributes[..]);
        }
    }

    #[test]
    fn test_counts_match_group_sizes() {
        // A chain that merges into one region plus two singletons
        let layer = test_layer(&[
            Some((0.0, 0.0)),
            Some((0.5, 0.0)),
            Some((1.0, 0.0)),
            Some((50.0, 0.0)),
            Some((-50.0, 0.0)),
        ]);
        let params = ClusterParams {
            distance: 0.3,
            segments: 5,
        };
        let out = cluster_points(&layer, &params).unwrap();

        let mut group_sizes: HashMap<i64, i64> = HashMap::new();
        for row in out.features() {
            if let AttributeValue::Int(id) = location_of(row) {
                *group_sizes.entry(*id).or_insert(0) += 1;
            }
        }
        assert_eq!(group_sizes.len(), 3);

        for row in out.features() {
            let AttributeValue::Int(id) = location_of(row) else {
                panic!("every point should be assigned");
            };
            assert_eq!(count_of(row), &AttributeValue::Int(group_sizes[id]));
        }
    }

    #[test]
    fn test_idempotent_across_runs() {
        let layer = test_layer(&[
            Some((0.0, 0.0)),
            Some((0.00001, 0.00001)),
            Some((2.0, 2.0)),
            None,
        ]);
        let first = cluster_points(&layer, &ClusterParams::default()).unwrap();
        let second = cluster_points(&layer, &ClusterParams::default()).unwrap();
        assert_eq!(first, second);
    }

    struct FixedCandidates(Vec<u32>);

    impl SpatialLookup for FixedCandidates {
        fn candidates(&self, _query: &BoundingBox) -> Vec<u32> {
            self.0.clone()
        }
    }

    fn square_region(id: u32, cx: f64, cy: f64) -> Region {
        let polygon = Polygon::new(
            LineString::from(vec![
                (cx - 1.0, cy - 1.0),
                (cx + 1.0, cy - 1.0),
                (cx + 1.0, cy + 1.0),
                (cx - 1.0, cy + 1.0),
                (cx - 1.0, cy - 1.0),
            ]),
            vec![],
        );
        let bbox = BoundingBox::of_polygon(&polygon).unwrap();
        Region { id, polygon, bbox }
    }

    #[test]
    fn test_tie_break_prefers_minimum_id() {
        // Regions 3 and 7 both pass the exact test; candidate order
        // deliberately lists 7 first
        let regions: Vec<Region> = (1..=7)
            .map(|id| {
                if id == 3 || id == 7 {
                    square_region(id, 0.0, 0.0)
                } else {
                    square_region(id, 1000.0 + id as f64 * 10.0, 0.0)
                }
            })
            .collect();
        let lookup = FixedCandidates(vec![7, 3]);

        let assigned = classify_point(&Point::new(0.0, 0.0), &lookup, &regions);
        assert_eq!(assigned, Some(3));
    }

    #[test]
    fn test_classify_point_with_no_hits() {
        let regions = vec![square_region(1, 100.0, 100.0)];
        let lookup = FixedCandidates(vec![1]);

        // Candidate offered by the coarse filter, rejected by the
        // exact test
        let assigned = classify_point(&Point::new(0.0, 0.0), &lookup, &regions);
        assert_eq!(assigned, None);
    }

    struct AlwaysCanceled;

    impl Feedback for AlwaysCanceled {
        fn canceled(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_cancellation_aborts_between_phases() {
        let layer = test_layer(&[Some((0.0, 0.0))]);
        let result =
            cluster_points_with_feedback(&layer, &ClusterParams::default(), &AlwaysCanceled);
        assert!(matches!(result, Err(Error::Canceled)));
    }

    struct RecordingFeedback(RefCell<Vec<f64>>);

    impl Feedback for RecordingFeedback {
        fn progress(&self, percent: f64) {
            self.0.borrow_mut().push(percent);
        }
    }

    #[test]
    fn test_progress_is_monotonic_and_completes() {
        let layer = test_layer(&[Some((0.0, 0.0)), Some((3.0, 3.0))]);
        let feedback = RecordingFeedback(RefCell::new(Vec::new()));
        cluster_points_with_feedback(&layer, &ClusterParams::default(), &feedback).unwrap();

        let reports = feedback.0.into_inner();
        assert!(!reports.is_empty());
        assert!(reports.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(reports.first(), Some(&0.0));
        assert_eq!(reports.last(), Some(&100.0));
        assert!(reports.iter().all(|p| (0.0..=100.0).contains(p)));
    }

    #[test]
    fn test_algorithm_trait_surface() {
        let algo = CoordinateCluster;
        assert_eq!(algo.name(), "coordinate_cluster");

        let layer = test_layer(&[Some((1.0, 1.0))]);
        let out = algo.execute_default(layer).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(count_of(&out.features()[0]), &AttributeValue::Int(1));
    }
}
