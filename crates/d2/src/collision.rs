//! Collision detection against the placed-piece set.

use crate::clip;
use marknest_core::geom::polygon::{bounds, is_simple, ring_distance, rings_intersect, signed_area};
use marknest_core::AABB2D;
use rstar::{RTree, RTreeObject, AABB};

/// Overlap area below this is treated as numeric noise; pieces may legally
/// touch along an edge when spacing is zero.
const AREA_TOLERANCE: f64 = 1e-6;

/// The spatial index is rebuilt every this many placements.
const REBUILD_INTERVAL: usize = 5;

/// R*-tree entry for one placed ring.
#[derive(Debug, Clone)]
struct LayoutEntry {
    index: usize,
    aabb: [f64; 4],
}

impl RTreeObject for LayoutEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.aabb[0], self.aabb[1]], [self.aabb[2], self.aabb[3]])
    }
}

/// The set of already-placed rings of one nesting attempt, with cached
/// bounding boxes and a broad-phase spatial index.
///
/// The layout is exclusively owned by one attempt's run and discarded when
/// the attempt ends.
#[derive(Debug)]
pub struct PlacedLayout {
    spacing: f64,
    polys: Vec<Vec<(f64, f64)>>,
    aabbs: Vec<AABB2D>,
    index: Option<RTree<LayoutEntry>>,
    indexed_len: usize,
}

impl PlacedLayout {
    /// Creates an empty layout with the required piece spacing.
    pub fn new(spacing: f64) -> Self {
        Self {
            spacing,
            polys: Vec::new(),
            aabbs: Vec::new(),
            index: None,
            indexed_len: 0,
        }
    }

    /// Number of placed rings.
    pub fn len(&self) -> usize {
        self.polys.len()
    }

    /// True when nothing is placed yet.
    pub fn is_empty(&self) -> bool {
        self.polys.is_empty()
    }

    /// Placed rings, in placement order.
    pub fn polygons(&self) -> &[Vec<(f64, f64)>] {
        &self.polys
    }

    /// Cached bounding boxes, parallel to [`polygons`](Self::polygons).
    pub fn aabbs(&self) -> &[AABB2D] {
        &self.aabbs
    }

    /// Highest occupied Y coordinate, zero for an empty layout.
    pub fn max_used_y(&self) -> f64 {
        self.aabbs.iter().fold(0.0, |acc, b| acc.max(b.max_y))
    }

    /// Adds a placed ring, rebuilding the spatial index every few
    /// placements.
    pub fn push(&mut self, ring: Vec<(f64, f64)>) {
        let aabb = bounds(&ring);
        self.polys.push(ring);
        self.aabbs.push(aabb);

        if self.polys.len() % REBUILD_INTERVAL == 0 {
            let entries: Vec<LayoutEntry> = self
                .aabbs
                .iter()
                .enumerate()
                .map(|(index, b)| LayoutEntry {
                    index,
                    aabb: [b.min_x, b.min_y, b.max_x, b.max_y],
                })
                .collect();
            self.index = Some(RTree::bulk_load(entries));
            self.indexed_len = self.polys.len();
        }
    }

    /// Returns true when the candidate ring collides with any placed ring.
    ///
    /// Two-phase: bounding boxes inflated by the spacing first, then an
    /// exact test. An invalid candidate is repaired with a zero-distance
    /// clean; if repair fails the candidate is treated as colliding.
    pub fn collides(&self, candidate: &[(f64, f64)]) -> bool {
        let repaired;
        let test: &[(f64, f64)] =
            if is_simple(candidate) && signed_area(candidate).abs() > AREA_TOLERANCE {
                candidate
            } else {
                match clip::clean(candidate) {
                    Some(ring) => {
                        repaired = ring;
                        &repaired
                    }
                    None => return true,
                }
            };

        let test_box = bounds(test).inflated(self.spacing);

        for i in self.broad_phase(&test_box) {
            if !test_box.intersects(&self.aabbs[i]) {
                continue;
            }

            let placed = &self.polys[i];

            if self.spacing <= 0.0 {
                if clip::intersection_area(test, placed) > AREA_TOLERANCE {
                    return true;
                }
            } else {
                if rings_intersect(test, placed) {
                    return true;
                }
                if ring_distance(test, placed) + 1e-9 < self.spacing {
                    return true;
                }
            }
        }

        false
    }

    /// Candidate indices for the exact test: index hits plus the unindexed
    /// tail, or a full scan while the index has not been built yet.
    fn broad_phase(&self, query: &AABB2D) -> Vec<usize> {
        match &self.index {
            Some(tree) => {
                let envelope =
                    AABB::from_corners([query.min_x, query.min_y], [query.max_x, query.max_y]);
                let mut hits: Vec<usize> = tree
                    .locate_in_envelope_intersecting(&envelope)
                    .map(|e| e.index)
                    .collect();
                hits.extend(self.indexed_len..self.polys.len());
                hits.sort_unstable();
                hits
            }
            None => (0..self.polys.len()).collect(),
        }
    }
}
