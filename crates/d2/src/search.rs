//! Bottom-left-fill placement search.
//!
//! Given one piece ring at one trial rotation and the set of already-placed
//! rings, finds the lowest-then-leftmost feasible position: priority
//! candidate points first, an adaptive grid scan as fallback, a fresh row as
//! the last resort.

use crate::boundary::Sheet;
use crate::collision::PlacedLayout;
use marknest_core::geom::polygon::{bounds, translate};
use std::collections::HashSet;

/// Vertical pitch of the left-edge candidate ladder, millimeters.
const LEFT_EDGE_STEP: f64 = 50.0;

/// Grid step when spacing is zero (dense packing wants fine probing).
const FINE_STEP: f64 = 3.0;

/// Step of the gravity slide applied at zero spacing.
const SLIDE_STEP: f64 = 1.0;

/// Finds the bottom-left feasible position for `ring` (origin-normalized,
/// already rotated), or `None` when no valid position exists.
///
/// `nfp_candidates` carries NFP/IFP sample points when NFP-guided search is
/// enabled; they join the priority candidate list.
pub fn find_position(
    ring: &[(f64, f64)],
    layout: &PlacedLayout,
    sheet: &Sheet,
    spacing: f64,
    nfp_candidates: Option<&[(f64, f64)]>,
) -> Option<(f64, f64)> {
    let b = bounds(ring);
    let (w, h) = (b.width(), b.height());

    let fits = |x: f64, y: f64| {
        let test = translate(ring, x, y);
        sheet.contains_ring(&test) && !layout.collides(&test)
    };

    let settle = |x: f64, y: f64| {
        if spacing <= 0.0 {
            slide_down_left(x, y, &fits)
        } else {
            (x, y)
        }
    };

    // Nothing placed yet: take the origin.
    if layout.is_empty() {
        return fits(0.0, 0.0).then(|| settle(0.0, 0.0));
    }

    let max_used_y = layout.max_used_y();

    // Stage 1: priority candidates adjacent to placed pieces.
    let mut candidates: Vec<(f64, f64)> = Vec::new();

    for pb in layout.aabbs() {
        // Right of the placed piece, at several vertical offsets.
        let right_x = pb.max_x + spacing;
        if right_x + w <= sheet.width() + 1e-9 {
            for dy in [0.0, -h / 4.0, -h / 2.0] {
                candidates.push((right_x, (pb.min_y + dy).max(0.0)));
            }
        }

        // Above the placed piece, at several horizontal offsets.
        let top_y = pb.max_y + spacing;
        candidates.push((0.0, top_y));
        for dx in [0.0, w / 4.0, w / 2.0] {
            candidates.push(((pb.min_x + dx).max(0.0), top_y));
        }
    }

    // Ladder along the sheet's left edge up to the used height.
    let mut ladder_y = 0.0;
    while ladder_y <= max_used_y + h {
        candidates.push((0.0, ladder_y));
        ladder_y += LEFT_EDGE_STEP;
    }

    if let Some(points) = nfp_candidates {
        candidates.extend_from_slice(points);
    }

    dedup_bottom_left(&mut candidates);

    for &(x, y) in &candidates {
        if x < 0.0 || y < 0.0 {
            continue;
        }
        if fits(x, y) {
            return Some(settle(x, y));
        }
    }

    // Stage 2: adaptive grid scan over a bounded height window.
    let step = if spacing <= 0.0 {
        FINE_STEP
    } else {
        (w.min(h) / 10.0).clamp(3.0, 25.0)
    };

    let search_height = max_used_y + h + spacing * 2.0;
    let mut y = 0.0;
    while y <= search_height {
        let mut x = 0.0;
        while x <= sheet.width() - w {
            if fits(x, y) {
                return Some(settle(x, y));
            }
            x += step;
        }
        y += step;
    }

    // Stage 3: start a new row above everything placed so far.
    let new_y = max_used_y + spacing;
    let mut x = 0.0;
    while x <= sheet.width() - w {
        if fits(x, new_y) {
            return Some(settle(x, new_y));
        }
        x += step;
    }

    None
}

/// Slides a feasible position downward then leftward in small increments
/// until any further slide would collide or leave the sheet. Removes the
/// residual gaps a coarse grid leaves behind.
fn slide_down_left(mut x: f64, mut y: f64, fits: &impl Fn(f64, f64) -> bool) -> (f64, f64) {
    loop {
        let mut moved = false;

        while y - SLIDE_STEP >= 0.0 && fits(x, y - SLIDE_STEP) {
            y -= SLIDE_STEP;
            moved = true;
        }
        while x - SLIDE_STEP >= 0.0 && fits(x - SLIDE_STEP, y) {
            x -= SLIDE_STEP;
            moved = true;
        }

        if !moved {
            return (x, y);
        }
    }
}

/// Deduplicates candidates on a 0.01 mm grid and orders them bottom-first,
/// then left-first.
fn dedup_bottom_left(candidates: &mut Vec<(f64, f64)>) {
    let mut seen: HashSet<(i64, i64)> = HashSet::new();
    candidates.retain(|&(x, y)| seen.insert(((x * 100.0).round() as i64, (y * 100.0).round() as i64)));

    candidates.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
    });
}
