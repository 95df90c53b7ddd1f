//! No-Fit Polygon (NFP) and Inner-Fit Polygon (IFP) computation.
//!
//! The NFP of a fixed and a moving ring is the locus of reference-point
//! positions for the moving ring that would cause it to touch or overlap the
//! fixed ring. It is obtained as the Minkowski sum of the fixed ring and the
//! moving ring reflected through its own origin.

use crate::boundary::Sheet;
use crate::clip;
use marknest_core::geom::polygon::bounds;
use std::collections::HashMap;

/// Subdivision count for NFP edge sampling (midpoints included).
const NFP_EDGE_SAMPLES: usize = 10;

/// Computes the NFP boundary ring of `moving` orbiting `fixed`.
///
/// Returns `None` when the computation fails; callers degrade to a search
/// without candidate points from this pair.
pub fn compute_nfp(fixed: &[(f64, f64)], moving: &[(f64, f64)]) -> Option<Vec<(f64, f64)>> {
    if fixed.len() < 3 || moving.len() < 3 {
        return None;
    }

    // Reflect the moving ring through its reference origin, then the
    // Minkowski sum of the pair is the NFP.
    let reflected: Vec<(f64, f64)> = moving.iter().map(|&(x, y)| (-x, -y)).collect();

    clip::minkowski_sum(fixed, &reflected)
}

/// Computes the IFP of a piece with the given dimensions against the sheet:
/// the sheet rectangle shrunk by the piece's width and height.
///
/// Returns `None` when the piece cannot fit at all.
pub fn compute_ifp(piece_width: f64, piece_height: f64, sheet: &Sheet) -> Option<[(f64, f64); 4]> {
    let max_x = sheet.width() - piece_width;
    let max_y = sheet.height() - piece_height;

    if max_x < 0.0 || max_y < 0.0 {
        return None;
    }

    Some([(0.0, 0.0), (max_x, 0.0), (max_x, max_y), (0.0, max_y)])
}

/// Per-run NFP cache, keyed by the exact coordinate content of the
/// (fixed, moving) ring pair.
///
/// The cache lives for a single optimizer attempt and is never shared across
/// attempts. Failed computations are cached too so a degenerate pair is not
/// retried for every candidate position.
#[derive(Debug, Default)]
pub struct NfpCache {
    map: HashMap<(RingKey, RingKey), Option<Vec<(f64, f64)>>>,
}

/// Exact-coordinate hash key for one ring.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RingKey(Vec<(u64, u64)>);

impl RingKey {
    fn of(ring: &[(f64, f64)]) -> Self {
        Self(
            ring.iter()
                .map(|&(x, y)| (x.to_bits(), y.to_bits()))
                .collect(),
        )
    }
}

impl NfpCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached pairs.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the cached NFP for the pair, computing it on a miss.
    pub fn get_or_compute(
        &mut self,
        fixed: &[(f64, f64)],
        moving: &[(f64, f64)],
    ) -> Option<Vec<(f64, f64)>> {
        let key = (RingKey::of(fixed), RingKey::of(moving));

        if let Some(cached) = self.map.get(&key) {
            return cached.clone();
        }

        let nfp = compute_nfp(fixed, moving);
        self.map.insert(key, nfp.clone());
        nfp
    }
}

/// Collects NFP/IFP-derived candidate positions for a piece.
///
/// The candidate set is the union of the IFP corner points and, for every
/// placed ring, the NFP vertices plus a 10-way subdivision of each NFP edge,
/// restricted to positions that keep the piece within sheet bounds.
pub fn candidate_positions(
    moving: &[(f64, f64)],
    placed: &[Vec<(f64, f64)>],
    sheet: &Sheet,
    cache: &mut NfpCache,
) -> Vec<(f64, f64)> {
    let b = bounds(moving);
    let (w, h) = (b.width(), b.height());

    let Some(ifp) = compute_ifp(w, h, sheet) else {
        return Vec::new();
    };

    let max_x = sheet.width() - w;
    let max_y = sheet.height() - h;
    let in_range =
        |p: (f64, f64)| p.0 >= 0.0 && p.0 <= max_x && p.1 >= 0.0 && p.1 <= max_y;

    let mut positions: Vec<(f64, f64)> = ifp.to_vec();

    for placed_ring in placed {
        let Some(nfp) = cache.get_or_compute(placed_ring, moving) else {
            continue;
        };

        let n = nfp.len();
        for i in 0..n {
            let p1 = nfp[i];
            let p2 = nfp[(i + 1) % n];

            if in_range(p1) {
                positions.push(p1);
            }

            for k in 1..NFP_EDGE_SAMPLES {
                let t = k as f64 / NFP_EDGE_SAMPLES as f64;
                let p = (p1.0 + (p2.0 - p1.0) * t, p1.1 + (p2.1 - p1.1) * t);
                if in_range(p) {
                    positions.push(p);
                }
            }
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use marknest_core::geom::polygon::area;

    fn rect(w: f64, h: f64) -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)]
    }

    #[test]
    fn test_nfp_two_rectangles() {
        let nfp = compute_nfp(&rect(10.0, 10.0), &rect(5.0, 5.0)).unwrap();

        // The NFP of two axis-aligned rectangles spans (w1+w2) x (h1+h2).
        let b = bounds(&nfp);
        assert_relative_eq!(b.width(), 15.0, epsilon = 0.01);
        assert_relative_eq!(b.height(), 15.0, epsilon = 0.01);
        assert_relative_eq!(area(&nfp), 225.0, epsilon = 1.0);
    }

    #[test]
    fn test_nfp_degenerate_input() {
        assert!(compute_nfp(&[(0.0, 0.0), (1.0, 0.0)], &rect(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_ifp_within_sheet() {
        let sheet = Sheet::rectangle(100.0, 80.0);
        let ifp = compute_ifp(30.0, 20.0, &sheet).unwrap();

        assert_eq!(ifp[0], (0.0, 0.0));
        assert_eq!(ifp[2], (70.0, 60.0));
    }

    #[test]
    fn test_ifp_oversized_piece() {
        let sheet = Sheet::rectangle(100.0, 80.0);
        assert!(compute_ifp(130.0, 20.0, &sheet).is_none());
    }

    #[test]
    fn test_cache_hit_returns_same_ring() {
        let mut cache = NfpCache::new();
        let fixed = rect(10.0, 10.0);
        let moving = rect(5.0, 5.0);

        let first = cache.get_or_compute(&fixed, &moving).unwrap();
        assert_eq!(cache.len(), 1);

        let second = cache.get_or_compute(&fixed, &moving).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_candidate_positions_sampled_from_nfp() {
        let sheet = Sheet::strip(1000.0);
        let mut cache = NfpCache::new();
        let placed = vec![rect(100.0, 100.0)];

        let candidates = candidate_positions(&rect(50.0, 50.0), &placed, &sheet, &mut cache);

        // IFP corners plus sampled NFP boundary points.
        assert!(candidates.len() > 4);
        assert!(candidates
            .iter()
            .all(|&(x, y)| (0.0..=950.0).contains(&x) && y >= 0.0));
    }
}
