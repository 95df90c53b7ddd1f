//! Expert marker sequencing: role-based placement order, sleeve rotation
//! alternation, and the four-corner seeding variant.

use crate::boundary::Sheet;
use crate::classify::PieceRole;
use crate::geometry::Piece;
use marknest_core::geom::polygon::{area, bounds, rotate_deg};
use marknest_core::SortKey;
use std::collections::HashSet;

/// Straight edges longer than this count toward the corner score (5 cm).
const LONG_EDGE_MM: f64 = 50.0;

/// Minimum corner score for a piece to be seeded.
const MIN_SEED_SCORE: f64 = 30.0;

/// Axis-parallel tolerance when detecting straight edges.
const STRAIGHT_EPS: f64 = 0.1;

fn role_rank(role: PieceRole) -> u8 {
    match role {
        // Bodies anchor the layout, strips fill residual gaps last.
        PieceRole::Body => 0,
        PieceRole::Sleeve => 1,
        PieceRole::LegPiece | PieceRole::Other => 2,
        PieceRole::Strip => 3,
    }
}

fn sort_value(piece: &Piece, key: SortKey) -> f64 {
    match key {
        SortKey::Area => piece.area,
        SortKey::Height => piece.height(),
        SortKey::Width => piece.width(),
    }
}

/// Produces the expert placement order: bodies, then sleeves, then leg and
/// miscellaneous pieces, then strips; within each role group the attempt's
/// sort key applies, descending.
pub fn expert_order(pieces: &[Piece], key: SortKey) -> Vec<usize> {
    let mut order: Vec<usize> = (0..pieces.len()).collect();

    order.sort_by(|&a, &b| {
        let pa = &pieces[a];
        let pb = &pieces[b];

        role_rank(pa.role)
            .cmp(&role_rank(pb.role))
            .then_with(|| {
                sort_value(pb, key)
                    .partial_cmp(&sort_value(pa, key))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| {
                pb.area
                    .partial_cmp(&pa.area)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then(a.cmp(&b))
    });

    order
}

/// Preferred rotation for the n-th sleeve in sequence: even sleeves 0, odd
/// sleeves 180. Interlocks convex/concave curve pairs.
pub fn sleeve_preferred_rotation(ordinal: usize) -> f64 {
    if ordinal % 2 == 0 {
        0.0
    } else {
        180.0
    }
}

/// Builds the trial rotation order for a piece.
///
/// Sleeves try their alternating preferred rotation first and only fall back
/// to the full set when it fails; the returned flag tells the caller to take
/// the preferred rotation as soon as it succeeds.
pub fn rotation_order(
    role: PieceRole,
    sleeve_ordinal: usize,
    rotations: &[f64],
) -> (Vec<f64>, bool) {
    if role != PieceRole::Sleeve {
        return (rotations.to_vec(), false);
    }

    let preferred = sleeve_preferred_rotation(sleeve_ordinal);
    let mut order = vec![preferred];
    order.extend(
        rotations
            .iter()
            .copied()
            .filter(|&r| (r - preferred).abs() > 1e-9),
    );

    (order, true)
}

/// One of the sheet's corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

impl Corner {
    /// Corners eligible for seeding. An unbounded strip only seeds its
    /// bottom corners: the top corners sit at the working height cap and
    /// would maximize, not minimize, the consumed length.
    pub fn seedable(sheet: &Sheet) -> Vec<Corner> {
        if sheet.is_infinite() {
            vec![Corner::BottomLeft, Corner::BottomRight]
        } else {
            vec![
                Corner::BottomLeft,
                Corner::BottomRight,
                Corner::TopLeft,
                Corner::TopRight,
            ]
        }
    }

    /// Reference position placing a `w` x `h` piece into this corner.
    pub fn position(&self, sheet: &Sheet, w: f64, h: f64) -> (f64, f64) {
        match self {
            Corner::BottomLeft => (0.0, 0.0),
            Corner::BottomRight => (sheet.width() - w, 0.0),
            Corner::TopLeft => (0.0, sheet.height() - h),
            Corner::TopRight => (sheet.width() - w, sheet.height() - h),
        }
    }
}

/// Scores how well a ring suits a corner seat:
/// `min(40, fill_ratio * 40)` for bounding-box coverage, 15 per straight
/// edge over 5 cm aligned with a sheet edge adjacent to the corner, and
/// `min(30, area / 10000)` for sheer size.
pub fn corner_score(ring: &[(f64, f64)], _corner: Corner) -> f64 {
    let b = bounds(ring);
    let ring_area = area(ring);

    let bbox_area = b.width() * b.height();
    let fill_ratio = if bbox_area > 0.0 {
        ring_area / bbox_area
    } else {
        0.0
    };

    let mut score = (fill_ratio * 40.0).min(40.0);

    let n = ring.len();
    for i in 0..n {
        let (x1, y1) = ring[i];
        let (x2, y2) = ring[(i + 1) % n];
        let len = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();

        if len <= LONG_EDGE_MM {
            continue;
        }

        let horizontal = (y1 - y2).abs() < STRAIGHT_EPS;
        let vertical = (x1 - x2).abs() < STRAIGHT_EPS;
        if horizontal || vertical {
            score += 15.0;
        }
    }

    score + (ring_area / 10000.0).min(30.0)
}

/// A corner assignment chosen by [`seed_corners`].
#[derive(Debug, Clone, Copy)]
pub struct CornerSeed {
    pub piece_index: usize,
    pub corner: Corner,
    pub rotation_deg: f64,
    pub score: f64,
}

/// Picks, independently per corner, the highest-scoring unused piece among
/// the top half by area, trying both 0 and 180 degrees. Corners with no
/// piece reaching the acceptance score stay unseeded.
pub fn seed_corners(pieces: &[Piece], sheet: &Sheet) -> Vec<CornerSeed> {
    if pieces.is_empty() {
        return Vec::new();
    }

    let mut by_area: Vec<usize> = (0..pieces.len()).collect();
    by_area.sort_by(|&a, &b| {
        pieces[b]
            .area
            .partial_cmp(&pieces[a].area)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    let top_half = &by_area[..pieces.len().div_ceil(2)];

    let mut used: HashSet<usize> = HashSet::new();
    let mut seeds = Vec::new();

    for corner in Corner::seedable(sheet) {
        let mut best: Option<CornerSeed> = None;

        for &pi in top_half {
            if used.contains(&pi) {
                continue;
            }

            for rotation in [0.0, 180.0] {
                let ring = rotate_deg(&pieces[pi].ring, rotation);
                let score = corner_score(&ring, corner);

                if score >= MIN_SEED_SCORE
                    && best.as_ref().map_or(true, |b| score > b.score + 1e-9)
                {
                    best = Some(CornerSeed {
                        piece_index: pi,
                        corner,
                        rotation_deg: rotation,
                        score,
                    });
                }
            }
        }

        if let Some(seed) = best {
            used.insert(seed.piece_index);
            seeds.push(seed);
        }
    }

    seeds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::KeywordTable;
    use crate::geometry::{expand_pieces, Pattern};

    fn garment_pieces() -> Vec<Piece> {
        let patterns = vec![
            Pattern::rectangle("BINDING", 150.0, 30.0).with_label("NECK BINDING"),
            Pattern::rectangle("SLEEVE", 250.0, 200.0)
                .with_label("SLEEVE")
                .with_quantity(2),
            Pattern::rectangle("FRONT", 400.0, 300.0).with_label("FRONT BODY"),
            Pattern::rectangle("POCKET", 120.0, 100.0).with_label("POCKET"),
        ];
        expand_pieces(&patterns, &KeywordTable::default())
    }

    #[test]
    fn test_expert_order_groups_roles() {
        let pieces = garment_pieces();
        let order = expert_order(&pieces, SortKey::Area);

        let roles: Vec<PieceRole> = order.iter().map(|&i| pieces[i].role).collect();
        assert_eq!(
            roles,
            vec![
                PieceRole::Body,
                PieceRole::Sleeve,
                PieceRole::Sleeve,
                PieceRole::Other,
                PieceRole::Strip,
            ]
        );
    }

    #[test]
    fn test_expert_order_largest_first_within_group() {
        let patterns = vec![
            Pattern::rectangle("SMALL_BODY", 200.0, 150.0).with_label("BACK BODY"),
            Pattern::rectangle("BIG_BODY", 400.0, 300.0).with_label("FRONT BODY"),
        ];
        let pieces = expand_pieces(&patterns, &KeywordTable::default());

        let order = expert_order(&pieces, SortKey::Area);
        assert_eq!(pieces[order[0]].id, "BIG_BODY");
    }

    #[test]
    fn test_sleeve_rotation_alternates() {
        assert_eq!(sleeve_preferred_rotation(0), 0.0);
        assert_eq!(sleeve_preferred_rotation(1), 180.0);
        assert_eq!(sleeve_preferred_rotation(2), 0.0);

        let (order, preferred_first) =
            rotation_order(PieceRole::Sleeve, 1, &[0.0, 180.0]);
        assert_eq!(order, vec![180.0, 0.0]);
        assert!(preferred_first);

        let (order, preferred_first) = rotation_order(PieceRole::Body, 0, &[0.0, 180.0]);
        assert_eq!(order, vec![0.0, 180.0]);
        assert!(!preferred_first);
    }

    #[test]
    fn test_corner_score_rewards_straight_filled_pieces() {
        // A full rectangle: fill 40 + four long straight edges + area bonus.
        let rect = vec![(0.0, 0.0), (200.0, 0.0), (200.0, 100.0), (0.0, 100.0)];
        let score = corner_score(&rect, Corner::BottomLeft);
        assert!(score > 100.0, "score = {}", score);

        // A thin diagonal sliver scores poorly.
        let sliver = vec![(0.0, 0.0), (200.0, 180.0), (200.0, 200.0)];
        assert!(corner_score(&sliver, Corner::BottomLeft) < score / 2.0);
    }

    #[test]
    fn test_seed_corners_strip_uses_bottom_corners_only() {
        let pieces = garment_pieces();
        let sheet = Sheet::strip(1500.0);

        let seeds = seed_corners(&pieces, &sheet);
        assert!(!seeds.is_empty());
        assert!(seeds.len() <= 2);
        assert!(seeds
            .iter()
            .all(|s| matches!(s.corner, Corner::BottomLeft | Corner::BottomRight)));

        // Each seeded piece is distinct.
        let mut indices: Vec<usize> = seeds.iter().map(|s| s.piece_index).collect();
        indices.dedup();
        assert_eq!(indices.len(), seeds.len());
    }

    #[test]
    fn test_corner_positions() {
        let sheet = Sheet::rectangle(1000.0, 800.0);
        assert_eq!(Corner::BottomLeft.position(&sheet, 100.0, 50.0), (0.0, 0.0));
        assert_eq!(
            Corner::BottomRight.position(&sheet, 100.0, 50.0),
            (900.0, 0.0)
        );
        assert_eq!(Corner::TopRight.position(&sheet, 100.0, 50.0), (900.0, 750.0));
        assert_eq!(Corner::seedable(&sheet).len(), 4);
    }
}
