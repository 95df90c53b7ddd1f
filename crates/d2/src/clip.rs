//! Robust polygon clipping wrappers.
//!
//! Everything that needs a boolean-operation capability goes through this
//! module: union of partial Minkowski sums, intersection-area measurement for
//! the collision detector, self-intersection repair, and polygon offsetting.
//! Coordinates are quantized to a fixed integer precision before clipping so
//! results are stable across runs.

use geo::{Coord, ConvexHull, LineString};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use marknest_core::geom::polygon::{ensure_ccw, is_convex, signed_area};

/// Quantization scale for clipping input (1/1000 mm grid).
const CLIP_SCALE: f64 = 1000.0;

/// Vertex count of the disc used for round-join positive offsets.
const DISC_SEGMENTS: usize = 16;

/// Snaps a coordinate onto the clipping grid.
fn quantize(v: f64) -> f64 {
    (v * CLIP_SCALE).round() / CLIP_SCALE
}

fn to_clip(ring: &[(f64, f64)]) -> Vec<[f64; 2]> {
    ring.iter()
        .map(|&(x, y)| [quantize(x), quantize(y)])
        .collect()
}

fn from_clip(contour: &[[f64; 2]]) -> Vec<(f64, f64)> {
    contour.iter().map(|&[x, y]| (x, y)).collect()
}

/// Flattens overlay output shapes into contours with at least 3 vertices.
fn collect_contours(shapes: Vec<Vec<Vec<[f64; 2]>>>) -> Vec<Vec<(f64, f64)>> {
    let mut contours = Vec::new();
    for shape in shapes {
        for contour in shape {
            if contour.len() >= 3 {
                contours.push(from_clip(&contour));
            }
        }
    }
    contours
}

/// Picks the ring with the largest absolute area.
pub fn largest_ring(contours: Vec<Vec<(f64, f64)>>) -> Option<Vec<(f64, f64)>> {
    contours.into_iter().max_by(|a, b| {
        signed_area(a)
            .abs()
            .partial_cmp(&signed_area(b).abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Unions a set of rings into boundary contours.
pub fn union_all(rings: &[Vec<(f64, f64)>]) -> Vec<Vec<(f64, f64)>> {
    if rings.is_empty() {
        return Vec::new();
    }

    if rings.len() == 1 {
        return vec![rings[0].clone()];
    }

    let mut result: Vec<Vec<[f64; 2]>> = vec![to_clip(&rings[0])];

    for ring in &rings[1..] {
        let clip = to_clip(ring);
        let shapes = result.overlay(&[clip], OverlayRule::Union, FillRule::NonZero);

        let mut next = Vec::new();
        for shape in shapes {
            for contour in shape {
                if contour.len() >= 3 {
                    next.push(contour);
                }
            }
        }

        if next.is_empty() {
            // Union failed for this ring; keep what we have.
            continue;
        }
        result = next;
    }

    result.iter().map(|c| from_clip(c)).collect()
}

/// Area of the geometric intersection of two rings.
///
/// Holes come back with opposite orientation, so summing signed contour
/// areas yields the net covered area.
pub fn intersection_area(a: &[(f64, f64)], b: &[(f64, f64)]) -> f64 {
    let subj: Vec<Vec<[f64; 2]>> = vec![to_clip(a)];
    let clip = to_clip(b);
    let shapes = subj.overlay(&[clip], OverlayRule::Intersect, FillRule::NonZero);

    let mut total = 0.0;
    for shape in shapes {
        for contour in shape {
            if contour.len() >= 3 {
                total += signed_area(&from_clip(&contour));
            }
        }
    }
    total.abs()
}

/// Zero-distance clean: resolves self-intersections by unioning the ring
/// with itself and keeping the largest resulting boundary.
///
/// Returns `None` when the ring collapses entirely.
pub fn clean(ring: &[(f64, f64)]) -> Option<Vec<(f64, f64)>> {
    if ring.len() < 3 {
        return None;
    }

    let subj: Vec<Vec<[f64; 2]>> = vec![to_clip(ring)];
    let clip = to_clip(ring);
    let shapes = subj.overlay(&[clip], OverlayRule::Union, FillRule::NonZero);

    let repaired = largest_ring(collect_contours(shapes))?;
    if signed_area(&repaired).abs() <= 1e-9 {
        return None;
    }
    Some(repaired)
}

// ============================================================================
// Minkowski sum
// ============================================================================

/// Minkowski sum of two rings, returning the largest-area boundary ring.
///
/// Convex pairs take the O(n+m) sorted edge-vector merge; non-convex input
/// is ear-clipped into triangles whose pairwise sums are unioned through the
/// clipping capability.
pub fn minkowski_sum(a: &[(f64, f64)], b: &[(f64, f64)]) -> Option<Vec<(f64, f64)>> {
    if a.len() < 3 || b.len() < 3 {
        return None;
    }

    let a = to_quantized(a);
    let b = to_quantized(b);

    if is_convex(&a) && is_convex(&b) {
        return minkowski_sum_convex(&a, &b);
    }

    let tris_a = triangulate(&a);
    let tris_b = triangulate(&b);

    if tris_a.is_empty() || tris_b.is_empty() {
        // Degenerate input; fall back to the convex-hull approximation.
        return minkowski_sum_convex(&hull_of(&a), &hull_of(&b));
    }

    let mut partial: Vec<Vec<(f64, f64)>> = Vec::new();
    for ta in &tris_a {
        for tb in &tris_b {
            if let Some(sum) = minkowski_sum_convex(ta, tb) {
                if sum.len() >= 3 {
                    partial.push(sum);
                }
            }
        }
    }

    if partial.is_empty() {
        return minkowski_sum_convex(&hull_of(&a), &hull_of(&b));
    }

    largest_ring(union_all(&partial))
}

fn to_quantized(ring: &[(f64, f64)]) -> Vec<(f64, f64)> {
    ring.iter()
        .map(|&(x, y)| (quantize(x), quantize(y)))
        .collect()
}

/// Minkowski sum of two convex rings via sorted edge-vector merge.
fn minkowski_sum_convex(a: &[(f64, f64)], b: &[(f64, f64)]) -> Option<Vec<(f64, f64)>> {
    if a.len() < 3 || b.len() < 3 {
        return None;
    }

    let a = ensure_ccw(a);
    let b = ensure_ccw(b);

    let edges_a = edge_vectors(&a);
    let edges_b = edge_vectors(&b);

    let start_a = bottom_left_vertex(&a);
    let start_b = bottom_left_vertex(&b);

    let start = (a[start_a].0 + b[start_b].0, a[start_a].1 + b[start_b].1);
    let merged = merge_edge_vectors(&edges_a, start_a, &edges_b, start_b);

    let mut result = Vec::with_capacity(merged.len() + 1);
    let mut current = start;
    result.push(current);

    for (dx, dy) in merged {
        current = (current.0 + dx, current.1 + dy);
        result.push(current);
    }

    // Drop the implicit closing point.
    if result.len() > 1 {
        let first = result[0];
        let last = result[result.len() - 1];
        if (first.0 - last.0).abs() < 1e-9 && (first.1 - last.1).abs() < 1e-9 {
            result.pop();
        }
    }

    Some(result)
}

fn edge_vectors(ring: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            (ring[j].0 - ring[i].0, ring[j].1 - ring[i].1)
        })
        .collect()
}

fn bottom_left_vertex(ring: &[(f64, f64)]) -> usize {
    let mut min_idx = 0;
    for (i, &(x, y)) in ring.iter().enumerate() {
        let (min_x, min_y) = ring[min_idx];
        if y < min_y || (y == min_y && x < min_x) {
            min_idx = i;
        }
    }
    min_idx
}

fn edge_angle(dx: f64, dy: f64) -> f64 {
    let angle = dy.atan2(dx);
    if angle < 0.0 {
        angle + std::f64::consts::TAU
    } else {
        angle
    }
}

fn merge_edge_vectors(
    edges_a: &[(f64, f64)],
    start_a: usize,
    edges_b: &[(f64, f64)],
    start_b: usize,
) -> Vec<(f64, f64)> {
    let n_a = edges_a.len();
    let n_b = edges_b.len();

    let mut result = Vec::with_capacity(n_a + n_b);
    let mut i_a = 0;
    let mut i_b = 0;

    while i_a < n_a || i_b < n_b {
        if i_a >= n_a {
            result.push(edges_b[(start_b + i_b) % n_b]);
            i_b += 1;
        } else if i_b >= n_b {
            result.push(edges_a[(start_a + i_a) % n_a]);
            i_a += 1;
        } else {
            let ea = edges_a[(start_a + i_a) % n_a];
            let eb = edges_b[(start_b + i_b) % n_b];
            let angle_a = edge_angle(ea.0, ea.1);
            let angle_b = edge_angle(eb.0, eb.1);

            if angle_a <= angle_b + 1e-10 {
                result.push(ea);
                i_a += 1;
            }
            if angle_b <= angle_a + 1e-10 {
                result.push(eb);
                i_b += 1;
            }
        }
    }

    result
}

// ============================================================================
// Triangulation (ear clipping)
// ============================================================================

fn triangulate(ring: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    if ring.len() < 3 {
        return Vec::new();
    }

    if is_convex(ring) {
        return vec![ring.to_vec()];
    }

    let mut vertices = ensure_ccw(ring);
    let mut triangles = Vec::new();

    while vertices.len() > 3 {
        let n = vertices.len();
        let mut ear_found = false;

        for i in 0..n {
            let prev = (i + n - 1) % n;
            let next = (i + 1) % n;

            if is_ear(&vertices, prev, i, next) {
                triangles.push(vec![vertices[prev], vertices[i], vertices[next]]);
                vertices.remove(i);
                ear_found = true;
                break;
            }
        }

        if !ear_found {
            // Degenerate ring; approximate with the convex hull.
            return vec![hull_of(ring)];
        }
    }

    if vertices.len() == 3 {
        triangles.push(vertices);
    }

    triangles
}

fn is_ear(vertices: &[(f64, f64)], prev: usize, curr: usize, next: usize) -> bool {
    let (ax, ay) = vertices[prev];
    let (bx, by) = vertices[curr];
    let (cx, cy) = vertices[next];

    let cross = (bx - ax) * (cy - by) - (by - ay) * (cx - bx);
    if cross <= 0.0 {
        return false; // Reflex vertex.
    }

    for (i, &p) in vertices.iter().enumerate() {
        if i == prev || i == curr || i == next {
            continue;
        }
        if point_in_triangle(p, (ax, ay), (bx, by), (cx, cy)) {
            return false;
        }
    }

    true
}

fn point_in_triangle(p: (f64, f64), a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> bool {
    let v0 = (c.0 - a.0, c.1 - a.1);
    let v1 = (b.0 - a.0, b.1 - a.1);
    let v2 = (p.0 - a.0, p.1 - a.1);

    let dot00 = v0.0 * v0.0 + v0.1 * v0.1;
    let dot01 = v0.0 * v1.0 + v0.1 * v1.1;
    let dot02 = v0.0 * v2.0 + v0.1 * v2.1;
    let dot11 = v1.0 * v1.0 + v1.1 * v1.1;
    let dot12 = v1.0 * v2.0 + v1.1 * v2.1;

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < 1e-18 {
        return false;
    }
    let inv = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;

    u > 1e-10 && v > 1e-10 && (u + v) < 1.0 - 1e-10
}

fn hull_of(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let coords: Vec<Coord<f64>> = points.iter().map(|&(x, y)| Coord { x, y }).collect();
    let hull = LineString::from(coords).convex_hull();

    let count = hull.exterior().coords().count();
    hull.exterior()
        .coords()
        .take(count.saturating_sub(1)) // Drop the duplicate closing point.
        .map(|c| (c.x, c.y))
        .collect()
}

// ============================================================================
// Offsetting
// ============================================================================

/// Grows (positive) or shrinks (negative) a ring.
///
/// Positive distances dilate with a disc (round joins); zero repairs the
/// ring in place; negative distances use a centroid-based erosion.
pub fn offset(ring: &[(f64, f64)], distance: f64) -> Option<Vec<(f64, f64)>> {
    if ring.len() < 3 {
        return None;
    }

    if distance == 0.0 {
        return clean(ring);
    }

    if distance > 0.0 {
        let disc = disc_ring(distance);
        return minkowski_sum(ring, &disc);
    }

    shrink_toward_centroid(ring, -distance)
}

/// Grows a ring by per-side buffer amounts via a Minkowski sum with the
/// rectangle `[-left, right] x [-bottom, top]`.
pub fn directional_buffer(
    ring: &[(f64, f64)],
    top: f64,
    bottom: f64,
    left: f64,
    right: f64,
) -> Vec<(f64, f64)> {
    if top <= 0.0 && bottom <= 0.0 && left <= 0.0 && right <= 0.0 {
        return ring.to_vec();
    }

    let (top, bottom, left, right) = (
        top.max(0.0),
        bottom.max(0.0),
        left.max(0.0),
        right.max(0.0),
    );

    // A zero extent on one axis would collapse the kernel into a segment.
    // One quantization cell is geometrically negligible but keeps the
    // kernel a real polygon.
    let eps = 1e-3;
    let (left, right) = if left + right <= 0.0 {
        (eps, eps)
    } else {
        (left, right)
    };
    let (bottom, top) = if bottom + top <= 0.0 {
        (eps, eps)
    } else {
        (bottom, top)
    };

    let kernel = vec![
        (-left, -bottom),
        (right, -bottom),
        (right, top),
        (-left, top),
    ];

    // On clipping failure keep the unbuffered ring.
    minkowski_sum(ring, &kernel).unwrap_or_else(|| ring.to_vec())
}

fn disc_ring(radius: f64) -> Vec<(f64, f64)> {
    let step = std::f64::consts::TAU / DISC_SEGMENTS as f64;
    (0..DISC_SEGMENTS)
        .map(|i| {
            let angle = i as f64 * step;
            (radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn shrink_toward_centroid(ring: &[(f64, f64)], amount: f64) -> Option<Vec<(f64, f64)>> {
    let (cx, cy) = marknest_core::geom::polygon::centroid(ring);

    let shrunk: Vec<(f64, f64)> = ring
        .iter()
        .filter_map(|&(x, y)| {
            let dx = x - cx;
            let dy = y - cy;
            let dist = (dx * dx + dy * dy).sqrt();

            if dist < amount + 1e-10 {
                return None; // Vertex collapses into the centroid.
            }

            let factor = (dist - amount) / dist;
            Some((cx + dx * factor, cy + dy * factor))
        })
        .collect();

    if shrunk.len() < 3 || signed_area(&shrunk).abs() <= 1e-9 {
        return None;
    }

    Some(shrunk)
}
