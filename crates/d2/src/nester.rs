//! Multi-strategy marker nesting solver.

use crate::boundary::Sheet;
use crate::classify::{KeywordTable, PieceRole};
use crate::collision::PlacedLayout;
use crate::expert::{self, CornerSeed};
use crate::geometry::{expand_pieces, Pattern, Piece, PieceState};
use crate::nfp::{candidate_positions, NfpCache};
use crate::search::find_position;
use marknest_core::geom::polygon::{bounds, rotate_deg, translate};
use marknest_core::geometry::{Boundary, Geometry, GeometryId};
use marknest_core::solver::{Config, Solver, SortKey};
use marknest_core::{MarkerResult, Placement, Result};

use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Efficiency readings are clamped here to avoid numerically implausible
/// full or over-100% results.
const MAX_EFFICIENCY: f64 = 99.9;

/// One configuration of the strategy sweep.
#[derive(Debug, Clone, Copy)]
struct Attempt {
    sort: SortKey,
    use_nfp: bool,
    corner_seed: bool,
}

impl Attempt {
    fn label(&self) -> String {
        let mut label = format!(
            "{}+{}",
            self.sort.name(),
            if self.use_nfp { "nfp" } else { "grid" }
        );
        if self.corner_seed {
            label.push_str("+corners");
        }
        label
    }
}

/// Everything one finished attempt reports back to the sweep.
#[derive(Debug)]
struct AttemptOutcome {
    placements: Vec<Placement>,
    unplaced: Vec<GeometryId>,
    used_length: f64,
    efficiency: f64,
    label: String,
}

/// Per-attempt mutable state: the placed layout, the NFP cache, and the
/// accumulated placements. Constructed fresh for every attempt and discarded
/// with it; nothing is shared across attempts.
struct Session<'a> {
    sheet: &'a Sheet,
    spacing: f64,
    use_nfp: bool,
    layout: PlacedLayout,
    cache: NfpCache,
    placements: Vec<Placement>,
    unplaced: Vec<GeometryId>,
    placed_area: f64,
}

impl<'a> Session<'a> {
    fn new(sheet: &'a Sheet, spacing: f64, use_nfp: bool) -> Self {
        Self {
            sheet,
            spacing,
            use_nfp,
            layout: PlacedLayout::new(spacing),
            cache: NfpCache::new(),
            placements: Vec::new(),
            unplaced: Vec::new(),
            placed_area: 0.0,
        }
    }

    /// Tries the piece at every rotation in order, keeping the rotation with
    /// the lowest resulting Y (ties favor the earlier angle). With
    /// `preferred_first`, a success on the first listed rotation is taken
    /// immediately.
    fn try_place(&mut self, piece: &mut Piece, rotations: &[f64], preferred_first: bool) -> bool {
        let mut best: Option<(f64, f64, f64, Vec<(f64, f64)>)> = None;

        for (i, &rotation) in rotations.iter().enumerate() {
            let ring = rotate_deg(&piece.ring, rotation);

            let nfp_points = if self.use_nfp {
                Some(candidate_positions(
                    &ring,
                    self.layout.polygons(),
                    self.sheet,
                    &mut self.cache,
                ))
            } else {
                None
            };

            if let Some((x, y)) = find_position(
                &ring,
                &self.layout,
                self.sheet,
                self.spacing,
                nfp_points.as_deref(),
            ) {
                let better = best.as_ref().map_or(true, |b| y < b.1 - 1e-9);
                if better {
                    best = Some((x, y, rotation, ring));
                }
                if preferred_first && i == 0 {
                    break;
                }
            }
        }

        match best {
            Some((x, y, rotation, ring)) => {
                self.commit(piece, x, y, rotation, &ring);
                true
            }
            None => {
                self.unplaced.push(piece.id.clone());
                false
            }
        }
    }

    /// Places a corner-seeded piece directly at its corner seat, if valid.
    fn try_place_seed(&mut self, piece: &mut Piece, seed: &CornerSeed) -> bool {
        let ring = rotate_deg(&piece.ring, seed.rotation_deg);
        let b = bounds(&ring);
        let (x, y) = seed.corner.position(self.sheet, b.width(), b.height());

        if x < 0.0 || y < 0.0 {
            return false;
        }

        let test = translate(&ring, x, y);
        if !self.sheet.contains_ring(&test) || self.layout.collides(&test) {
            return false;
        }

        self.commit(piece, x, y, seed.rotation_deg, &ring);
        true
    }

    fn commit(&mut self, piece: &mut Piece, x: f64, y: f64, rotation: f64, ring: &[(f64, f64)]) {
        let final_ring = translate(ring, x, y);

        piece.state = PieceState::Placed {
            x,
            y,
            rotation_deg: rotation,
        };
        self.placements.push(Placement::new(
            piece.id.clone(),
            piece.instance,
            x,
            y,
            rotation,
            final_ring.clone(),
        ));
        self.layout.push(final_ring);
        self.placed_area += piece.area;
    }

    fn into_outcome(self, label: String) -> AttemptOutcome {
        let used_length = if self.placements.is_empty() {
            0.0
        } else {
            self.layout.max_used_y() + self.spacing
        };

        let efficiency = if used_length > 0.0 {
            (self.placed_area / (self.sheet.width() * used_length) * 100.0).min(MAX_EFFICIENCY)
        } else {
            0.0
        };

        AttemptOutcome {
            placements: self.placements,
            unplaced: self.unplaced,
            used_length,
            efficiency,
            label,
        }
    }
}

/// Runs one complete placement pass under one attempt configuration.
fn run_attempt(
    template: &[Piece],
    sheet: &Sheet,
    spacing: f64,
    rotations: &[f64],
    attempt: Attempt,
) -> AttemptOutcome {
    let mut pieces = template.to_vec();
    let mut session = Session::new(sheet, spacing, attempt.use_nfp);

    if attempt.corner_seed {
        for seed in expert::seed_corners(&pieces, sheet) {
            session.try_place_seed(&mut pieces[seed.piece_index], &seed);
        }
    }

    let order = expert::expert_order(&pieces, attempt.sort);
    let mut sleeve_ordinal = 0usize;

    for pi in order {
        let role = pieces[pi].role;
        let (rotation_order, preferred_first) =
            expert::rotation_order(role, sleeve_ordinal, rotations);
        if role == PieceRole::Sleeve {
            sleeve_ordinal += 1;
        }

        if pieces[pi].is_placed() {
            continue; // Seeded earlier.
        }

        session.try_place(&mut pieces[pi], &rotation_order, preferred_first);
    }

    session.into_outcome(attempt.label())
}

/// 2D marker nesting solver.
///
/// Re-runs the whole placement pipeline over the cross product of piece sort
/// orders and search modes, keeping the attempt with the highest packing
/// efficiency.
pub struct Nester2D {
    config: Config,
    keywords: KeywordTable,
    cancelled: Arc<AtomicBool>,
}

impl Nester2D {
    /// Creates a new nester with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            keywords: KeywordTable::default(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a nester with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Replaces the classification keyword table.
    pub fn with_keyword_table(mut self, table: KeywordTable) -> Self {
        self.keywords = table;
        self
    }

    /// Trial rotations for this run; 180 degrees is always included, the
    /// curve interlocking of the expert strategy depends on it.
    fn effective_rotations(&self) -> Vec<f64> {
        let mut rotations = self.config.rotations_deg.clone();
        if !rotations.iter().any(|&r| (r - 180.0).abs() < 1e-9) {
            rotations.push(180.0);
        }
        rotations
    }

    fn attempts(&self) -> Vec<Attempt> {
        let mut attempts = Vec::new();
        for sort in SortKey::all() {
            for use_nfp in [true, false] {
                attempts.push(Attempt {
                    sort,
                    use_nfp,
                    corner_seed: false,
                });
            }
        }

        if self.config.corner_seeding {
            for use_nfp in [true, false] {
                attempts.push(Attempt {
                    sort: SortKey::Area,
                    use_nfp,
                    corner_seed: true,
                });
            }
        }

        attempts
    }
}

impl Solver for Nester2D {
    type Geometry = Pattern;
    type Boundary = Sheet;

    fn solve(&self, patterns: &[Pattern], sheet: &Sheet) -> Result<MarkerResult> {
        let start = Instant::now();

        sheet.validate()?;
        for pattern in patterns {
            pattern.validate()?;
        }

        let pieces = expand_pieces(patterns, &self.keywords);

        let mut result = MarkerResult::new();
        result.total_count = pieces.len();

        if pieces.is_empty() {
            result.computation_time_ms = start.elapsed().as_millis() as u64;
            return Ok(result);
        }

        let rotations = self.effective_rotations();
        let attempts = self.attempts();
        let spacing = self.config.spacing;

        let run_one = |(index, attempt): (usize, &Attempt)| -> Option<AttemptOutcome> {
            // Cancellation and wall-clock budget take effect between whole
            // attempts, never mid-placement.
            if self.cancelled.load(Ordering::Relaxed) {
                return None;
            }
            if self.config.time_limit_ms > 0
                && start.elapsed().as_millis() as u64 >= self.config.time_limit_ms
            {
                return None;
            }

            let outcome = run_attempt(&pieces, sheet, spacing, &rotations, *attempt);
            debug!(
                attempt = index,
                strategy = %outcome.label,
                placed = outcome.placements.len(),
                efficiency = outcome.efficiency,
                "attempt finished"
            );
            Some(outcome)
        };

        let outcomes: Vec<Option<AttemptOutcome>> = if self.config.threads == 1 {
            attempts.iter().enumerate().map(run_one).collect()
        } else {
            attempts.par_iter().enumerate().map(run_one).collect()
        };

        // Keep the best efficiency; ties favor the earlier attempt. The
        // reduction is commutative, so parallel execution cannot change it.
        let mut best: Option<AttemptOutcome> = None;
        for outcome in outcomes.into_iter().flatten() {
            let better = best
                .as_ref()
                .map_or(true, |b| outcome.efficiency > b.efficiency + 1e-12);
            if better {
                best = Some(outcome);
            }
        }

        if let Some(outcome) = best {
            result.success = !outcome.placements.is_empty();
            result.placements = outcome.placements;
            result.unplaced = outcome.unplaced;
            result.used_length_mm = outcome.used_length;
            result.efficiency = outcome.efficiency;
            result.strategy = Some(outcome.label);
            result.deduplicate_unplaced();
        }

        result.computation_time_ms = start.elapsed().as_millis() as u64;
        Ok(result)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
