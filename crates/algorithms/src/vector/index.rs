//! Spatial lookup over region envelopes
//!
//! A coarse filter: queries return every region whose bounding box
//! intersects the query box, and possibly regions whose exact polygon
//! does not. Callers refine candidates with an exact geometry test.
//! False negatives are never returned.

use super::regions::Region;
use super::spatial::BoundingBox;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

/// Candidate lookup by bounding box
pub trait SpatialLookup {
    /// Identifiers of all regions whose envelope intersects `query`,
    /// in no particular order.
    fn candidates(&self, query: &BoundingBox) -> Vec<u32>;
}

type Envelope = GeomWithData<Rectangle<[f64; 2]>, u32>;

/// R-tree over region bounding boxes
#[derive(Debug)]
pub struct RegionIndex {
    tree: RTree<Envelope>,
}

impl RegionIndex {
    /// Bulk-load an index from a region set
    pub fn build(regions: &[Region]) -> Self {
        let envelopes: Vec<Envelope> = regions
            .iter()
            .map(|r| {
                GeomWithData::new(
                    Rectangle::from_corners(
                        [r.bbox.min_x, r.bbox.min_y],
                        [r.bbox.max_x, r.bbox.max_y],
                    ),
                    r.id,
                )
            })
            .collect();
        Self {
            tree: RTree::bulk_load(envelopes),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl SpatialLookup for RegionIndex {
    fn candidates(&self, query: &BoundingBox) -> Vec<u32> {
        let envelope = AABB::from_corners(
            [query.min_x, query.min_y],
            [query.max_x, query.max_y],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|e| e.data)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::buffer::{buffer_point, BufferParams};
    use crate::vector::regions::merge_buffers;
    use geo::Point;

    fn grid_regions() -> Vec<Region> {
        // 5x5 grid of well-separated unit buffers
        let params = BufferParams {
            distance: 1.0,
            segments: 5,
        };
        let buffers: Vec<_> = (0..5)
            .flat_map(|i| (0..5).map(move |j| (i as f64 * 10.0, j as f64 * 10.0)))
            .map(|(x, y)| buffer_point(&Point::new(x, y), &params))
            .collect();
        merge_buffers(&buffers)
    }

    #[test]
    fn test_index_size() {
        let regions = grid_regions();
        let index = RegionIndex::build(&regions);
        assert_eq!(index.len(), 25);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_empty_index() {
        let index = RegionIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index
            .candidates(&BoundingBox::of_point(0.0, 0.0))
            .is_empty());
    }

    #[test]
    fn test_point_query_hits_enclosing_region() {
        let regions = grid_regions();
        let index = RegionIndex::build(&regions);

        let hits = index.candidates(&BoundingBox::of_point(10.0, 20.0));
        assert_eq!(hits.len(), 1);

        let region = regions.iter().find(|r| r.id == hits[0]).unwrap();
        assert!(region.bbox.intersects(&BoundingBox::of_point(10.0, 20.0)));
    }

    #[test]
    fn test_candidates_match_brute_force() {
        let regions = grid_regions();
        let index = RegionIndex::build(&regions);

        let queries = [
            BoundingBox::of_point(0.0, 0.0),
            BoundingBox::of_point(5.0, 5.0),
            BoundingBox::new(-1.0, -1.0, 11.0, 11.0),
            BoundingBox::new(9.5, 9.5, 30.5, 30.5),
            BoundingBox::new(100.0, 100.0, 200.0, 200.0),
        ];

        for query in &queries {
            let mut from_index = index.candidates(query);
            let mut brute: Vec<u32> = regions
                .iter()
                .filter(|r| r.bbox.intersects(query))
                .map(|r| r.id)
                .collect();
            from_index.sort_unstable();
            brute.sort_unstable();
            assert_eq!(from_index, brute, "query {:?}", query);
        }
    }

    #[test]
    fn test_query_outside_everything() {
        let regions = grid_regions();
        let index = RegionIndex::build(&regions);
        assert!(index
            .candidates(&BoundingBox::of_point(-500.0, -500.0))
            .is_empty());
    }
}
