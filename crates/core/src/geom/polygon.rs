//! Polygon primitives over plain `(f64, f64)` rings.
//!
//! A ring is an ordered vertex list with implicit closure: the first point is
//! never repeated at the end. All angles are degrees, all lengths millimeters.

use crate::transform::AABB2D;

/// Computes the signed area of a ring via the shoelace formula.
///
/// Positive for counter-clockwise rings, negative for clockwise. The sign is
/// never normalized here; callers take `abs()` for magnitude comparisons.
pub fn signed_area(ring: &[(f64, f64)]) -> f64 {
    let n = ring.len();
    let mut area = 0.0;

    for i in 0..n {
        let j = (i + 1) % n;
        area += ring[i].0 * ring[j].1;
        area -= ring[j].0 * ring[i].1;
    }

    area / 2.0
}

/// Absolute polygon area.
pub fn area(ring: &[(f64, f64)]) -> f64 {
    signed_area(ring).abs()
}

/// Ring perimeter.
pub fn perimeter(ring: &[(f64, f64)]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (x1, y1) = ring[i];
            let (x2, y2) = ring[(i + 1) % n];
            ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
        })
        .sum()
}

/// Vertex mean of a ring, used as the rotation pivot.
pub fn centroid(ring: &[(f64, f64)]) -> (f64, f64) {
    let n = ring.len() as f64;
    let sum_x: f64 = ring.iter().map(|p| p.0).sum();
    let sum_y: f64 = ring.iter().map(|p| p.1).sum();
    (sum_x / n, sum_y / n)
}

/// Bounding box of a ring.
///
/// # Panics
/// Panics if the ring is empty; rings are validated to hold at least 3 points
/// before they reach geometry code.
pub fn bounds(ring: &[(f64, f64)]) -> AABB2D {
    AABB2D::from_points(ring).expect("ring must not be empty")
}

/// Pointwise translation.
pub fn translate(ring: &[(f64, f64)], dx: f64, dy: f64) -> Vec<(f64, f64)> {
    ring.iter().map(|&(x, y)| (x + dx, y + dy)).collect()
}

/// Rotates a ring about its vertex-mean centroid, without re-basing.
///
/// Rotating by `theta` then by `-theta` returns the original coordinates
/// within floating tolerance.
pub fn rotate_about_centroid(ring: &[(f64, f64)], angle_deg: f64) -> Vec<(f64, f64)> {
    if angle_deg == 0.0 {
        return ring.to_vec();
    }

    let (cx, cy) = centroid(ring);
    let rad = angle_deg.to_radians();
    let (sin_a, cos_a) = rad.sin_cos();

    ring.iter()
        .map(|&(x, y)| {
            let dx = x - cx;
            let dy = y - cy;
            (dx * cos_a - dy * sin_a + cx, dx * sin_a + dy * cos_a + cy)
        })
        .collect()
}

/// Rotates a ring about its centroid, then translates the result so its
/// bounding-box minimum corner sits at (0, 0).
///
/// Rotating by 0 is an exact no-op. Because of the re-basing translation,
/// `rotate_deg(rotate_deg(r, a), 360 - a)` does not return the original
/// coordinates; only [`rotate_about_centroid`] is a true inverse pair.
pub fn rotate_deg(ring: &[(f64, f64)], angle_deg: f64) -> Vec<(f64, f64)> {
    if angle_deg == 0.0 {
        return ring.to_vec();
    }

    let rotated = rotate_about_centroid(ring, angle_deg);
    let b = bounds(&rotated);
    translate(&rotated, -b.min_x, -b.min_y)
}

/// Ray-cast point-in-polygon test.
pub fn contains_point(ring: &[(f64, f64)], point: (f64, f64)) -> bool {
    let (px, py) = point;
    let n = ring.len();
    let mut inside = false;

    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];

        if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Checks if a ring is convex.
///
/// A ring is convex when all cross products of consecutive edge pairs share
/// one sign.
pub fn is_convex(ring: &[(f64, f64)]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let n = ring.len();
    let mut sign = 0i32;

    for i in 0..n {
        let p0 = ring[i];
        let p1 = ring[(i + 1) % n];
        let p2 = ring[(i + 2) % n];

        let cross = (p1.0 - p0.0) * (p2.1 - p1.1) - (p1.1 - p0.1) * (p2.0 - p1.0);

        if cross.abs() > 1e-10 {
            let current = if cross > 0.0 { 1 } else { -1 };
            if sign == 0 {
                sign = current;
            } else if sign != current {
                return false;
            }
        }
    }

    true
}

/// Returns the ring in counter-clockwise order.
pub fn ensure_ccw(ring: &[(f64, f64)]) -> Vec<(f64, f64)> {
    if signed_area(ring) < 0.0 {
        ring.iter().rev().cloned().collect()
    } else {
        ring.to_vec()
    }
}

/// Checks that no two non-adjacent edges of the ring intersect.
pub fn is_simple(ring: &[(f64, f64)]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    for i in 0..n {
        let a1 = ring[i];
        let a2 = ring[(i + 1) % n];
        for j in (i + 1)..n {
            // Skip edges sharing a vertex.
            if j == i || (j + 1) % n == i || (i + 1) % n == j {
                continue;
            }
            let b1 = ring[j];
            let b2 = ring[(j + 1) % n];
            if segments_intersect(a1, a2, b1, b2) {
                return false;
            }
        }
    }

    true
}

fn orientation(p: (f64, f64), q: (f64, f64), r: (f64, f64)) -> i32 {
    let val = (q.1 - p.1) * (r.0 - q.0) - (q.0 - p.0) * (r.1 - q.1);
    if val.abs() < 1e-12 {
        0
    } else if val > 0.0 {
        1
    } else {
        -1
    }
}

fn on_segment(p: (f64, f64), q: (f64, f64), r: (f64, f64)) -> bool {
    q.0 <= p.0.max(r.0) && q.0 >= p.0.min(r.0) && q.1 <= p.1.max(r.1) && q.1 >= p.1.min(r.1)
}

/// Segment intersection test, collinear touches included.
pub fn segments_intersect(
    p1: (f64, f64),
    p2: (f64, f64),
    q1: (f64, f64),
    q2: (f64, f64),
) -> bool {
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == 0 && on_segment(p1, q1, p2))
        || (o2 == 0 && on_segment(p1, q2, p2))
        || (o3 == 0 && on_segment(q1, p1, q2))
        || (o4 == 0 && on_segment(q1, p2, q2))
}

fn point_segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (vx, vy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = vx * vx + vy * vy;

    if len_sq < 1e-18 {
        return ((p.0 - a.0).powi(2) + (p.1 - a.1).powi(2)).sqrt();
    }

    let t = (((p.0 - a.0) * vx + (p.1 - a.1) * vy) / len_sq).clamp(0.0, 1.0);
    let (cx, cy) = (a.0 + t * vx, a.1 + t * vy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

fn segment_segment_distance(
    a1: (f64, f64),
    a2: (f64, f64),
    b1: (f64, f64),
    b2: (f64, f64),
) -> f64 {
    if segments_intersect(a1, a2, b1, b2) {
        return 0.0;
    }

    point_segment_distance(a1, b1, b2)
        .min(point_segment_distance(a2, b1, b2))
        .min(point_segment_distance(b1, a1, a2))
        .min(point_segment_distance(b2, a1, a2))
}

/// Checks whether two rings overlap, touch, or contain one another.
pub fn rings_intersect(a: &[(f64, f64)], b: &[(f64, f64)]) -> bool {
    let na = a.len();
    let nb = b.len();

    for i in 0..na {
        let a1 = a[i];
        let a2 = a[(i + 1) % na];
        for j in 0..nb {
            if segments_intersect(a1, a2, b[j], b[(j + 1) % nb]) {
                return true;
            }
        }
    }

    // No edge crossings: one ring may still lie fully inside the other.
    contains_point(a, b[0]) || contains_point(b, a[0])
}

/// Minimum distance between two rings; zero when they intersect or touch.
pub fn ring_distance(a: &[(f64, f64)], b: &[(f64, f64)]) -> f64 {
    if rings_intersect(a, b) {
        return 0.0;
    }

    let na = a.len();
    let nb = b.len();
    let mut min_dist = f64::INFINITY;

    for i in 0..na {
        let a1 = a[i];
        let a2 = a[(i + 1) % na];
        for j in 0..nb {
            let d = segment_segment_distance(a1, a2, b[j], b[(j + 1) % nb]);
            if d < min_dist {
                min_dist = d;
            }
        }
    }

    min_dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(w: f64, h: f64) -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)]
    }

    #[test]
    fn test_signed_area() {
        let ccw = rect(10.0, 10.0);
        assert!(signed_area(&ccw) > 0.0);
        assert_relative_eq!(area(&ccw), 100.0, epsilon = 1e-10);

        let cw: Vec<_> = ccw.into_iter().rev().collect();
        assert!(signed_area(&cw) < 0.0);
        assert_relative_eq!(area(&cw), 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_perimeter() {
        assert_relative_eq!(perimeter(&rect(10.0, 5.0)), 30.0, epsilon = 1e-10);
    }

    #[test]
    fn test_rotate_zero_is_noop() {
        let ring = rect(40.0, 30.0);
        assert_eq!(rotate_deg(&ring, 0.0), ring);
        assert_eq!(rotate_about_centroid(&ring, 0.0), ring);
    }

    #[test]
    fn test_rotate_about_centroid_round_trip() {
        let ring = vec![(0.0, 0.0), (40.0, 5.0), (35.0, 30.0), (3.0, 25.0)];
        let rotated = rotate_about_centroid(&ring, 37.0);
        let back = rotate_about_centroid(&rotated, -37.0);

        for (orig, restored) in ring.iter().zip(back.iter()) {
            assert_relative_eq!(orig.0, restored.0, epsilon = 1e-9);
            assert_relative_eq!(orig.1, restored.1, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rotate_deg_rebases_to_origin() {
        let ring = translate(&rect(40.0, 30.0), 100.0, 200.0);
        let rotated = rotate_deg(&ring, 180.0);
        let b = bounds(&rotated);

        assert_relative_eq!(b.min_x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.min_y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.width(), 40.0, epsilon = 1e-9);
        assert_relative_eq!(b.height(), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotate_deg_90_swaps_dimensions() {
        let rotated = rotate_deg(&rect(40.0, 20.0), 90.0);
        let b = bounds(&rotated);
        assert_relative_eq!(b.width(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(b.height(), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_contains_point() {
        let ring = rect(10.0, 10.0);
        assert!(contains_point(&ring, (5.0, 5.0)));
        assert!(!contains_point(&ring, (15.0, 5.0)));
        assert!(!contains_point(&ring, (-1.0, 5.0)));
    }

    #[test]
    fn test_is_convex() {
        assert!(is_convex(&rect(10.0, 10.0)));

        let l_shape = vec![
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 5.0),
            (5.0, 5.0),
            (5.0, 10.0),
            (0.0, 10.0),
        ];
        assert!(!is_convex(&l_shape));
    }

    #[test]
    fn test_is_simple() {
        assert!(is_simple(&rect(10.0, 10.0)));

        // Bowtie.
        let bowtie = vec![(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)];
        assert!(!is_simple(&bowtie));
    }

    #[test]
    fn test_rings_intersect_and_distance() {
        let a = rect(10.0, 10.0);
        let b = translate(&rect(10.0, 10.0), 5.0, 5.0);
        let c = translate(&rect(10.0, 10.0), 13.0, 0.0);

        assert!(rings_intersect(&a, &b));
        assert_relative_eq!(ring_distance(&a, &b), 0.0);

        assert!(!rings_intersect(&a, &c));
        assert_relative_eq!(ring_distance(&a, &c), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ring_contains_ring_counts_as_intersecting() {
        let outer = rect(20.0, 20.0);
        let inner = translate(&rect(4.0, 4.0), 8.0, 8.0);
        assert!(rings_intersect(&outer, &inner));
    }
}
