//! Integration tests for marknest-d2.

use marknest_core::geom::polygon;
use marknest_d2::{clip, Config, Nester2D, Pattern, Sheet, Solver};

/// A body/sleeve/strip garment set used by several tests.
fn garment_patterns() -> Vec<Pattern> {
    vec![
        Pattern::rectangle("FRONT", 400.0, 300.0).with_label("FRONT BODY"),
        Pattern::rectangle("BACK", 380.0, 300.0).with_label("BACK BODY"),
        Pattern::rectangle("SLEEVE", 250.0, 200.0)
            .with_label("SLEEVE")
            .with_quantity(4),
        Pattern::rectangle("BINDING", 150.0, 30.0)
            .with_label("NECK BINDING")
            .with_quantity(2),
        Pattern::rectangle("POCKET", 120.0, 100.0).with_label("POCKET"),
    ]
}

mod scenarios {
    use super::*;

    #[test]
    fn scenario_a_two_rectangles_side_by_side() {
        let patterns = vec![Pattern::rectangle("R", 400.0, 300.0).with_quantity(2)];
        let sheet = Sheet::strip(1500.0);

        let config = Config::new()
            .with_spacing(0.0)
            .with_rotations_deg(vec![0.0, 180.0]);
        let result = Nester2D::new(config).solve(&patterns, &sheet).unwrap();

        assert!(result.success);
        assert_eq!(result.placed_count(), 2);
        assert!(
            result.used_length_mm <= 600.0 + 1e-6,
            "used_length = {}",
            result.used_length_mm
        );
    }

    #[test]
    fn scenario_b_oversized_piece_stays_unplaced() {
        let patterns = vec![Pattern::rectangle("WIDE", 1600.0, 200.0)];
        let sheet = Sheet::strip(1500.0);

        let result = Nester2D::default_config().solve(&patterns, &sheet).unwrap();

        assert!(!result.success);
        assert_eq!(result.placed_count(), 0);
        assert_eq!(result.total_count, 1);
        assert_eq!(result.unplaced, vec!["WIDE".to_string()]);
    }

    #[test]
    fn scenario_c_length_lower_bound() {
        let patterns = vec![Pattern::rectangle("R", 200.0, 100.0).with_quantity(10)];
        let sheet_width = 1000.0;
        let sheet = Sheet::strip(sheet_width);

        let result = Nester2D::new(Config::new().with_spacing(0.0))
            .solve(&patterns, &sheet)
            .unwrap();

        assert_eq!(result.placed_count(), 10);

        let total_area = 10.0 * 200.0 * 100.0;
        assert!(
            result.used_length_mm >= total_area / sheet_width - 1e-6,
            "used_length = {}",
            result.used_length_mm
        );
        assert!(result.efficiency <= 99.9);
    }

    #[test]
    fn scenario_d_expert_sequencing() {
        let sheet = Sheet::strip(1500.0);
        let result = Nester2D::new(Config::new().with_spacing(5.0))
            .solve(&garment_patterns(), &sheet)
            .unwrap();

        assert!(result.all_placed(), "unplaced: {:?}", result.unplaced);

        // Strips are placed after every body/sleeve/other piece.
        let first_strip = result
            .placements
            .iter()
            .position(|p| p.id == "BINDING")
            .unwrap();
        let last_non_strip = result
            .placements
            .iter()
            .rposition(|p| p.id != "BINDING")
            .unwrap();
        assert!(
            first_strip > last_non_strip,
            "strip placed at {} before non-strip at {}",
            first_strip,
            last_non_strip
        );

        // Sleeves alternate their rotation bias: 0, 180, 0, 180.
        let sleeve_rotations: Vec<f64> = result
            .placements
            .iter()
            .filter(|p| p.id == "SLEEVE")
            .map(|p| p.rotation_deg)
            .collect();
        assert_eq!(sleeve_rotations, vec![0.0, 180.0, 0.0, 180.0]);
    }
}

mod properties {
    use super::*;

    #[test]
    fn no_overlap_at_zero_spacing() {
        let patterns = vec![
            Pattern::rectangle("A", 300.0, 200.0).with_quantity(3),
            Pattern::rectangle("B", 150.0, 150.0).with_quantity(4),
        ];
        let sheet = Sheet::strip(800.0);

        let result = Nester2D::new(Config::new().with_spacing(0.0))
            .solve(&patterns, &sheet)
            .unwrap();
        assert_eq!(result.placed_count(), 7);

        for (i, a) in result.placements.iter().enumerate() {
            for b in &result.placements[i + 1..] {
                let overlap = clip::intersection_area(&a.ring, &b.ring);
                assert!(
                    overlap <= 1e-3,
                    "{}#{} overlaps {}#{} by {}",
                    a.id,
                    a.instance,
                    b.id,
                    b.instance,
                    overlap
                );
            }
        }
    }

    #[test]
    fn spacing_is_respected() {
        let spacing = 5.0;
        let sheet = Sheet::strip(1500.0);
        let result = Nester2D::new(Config::new().with_spacing(spacing))
            .solve(&garment_patterns(), &sheet)
            .unwrap();

        for (i, a) in result.placements.iter().enumerate() {
            for b in &result.placements[i + 1..] {
                let dist = polygon::ring_distance(&a.ring, &b.ring);
                assert!(
                    dist >= spacing - 1e-6,
                    "{}#{} is {} mm from {}#{}",
                    a.id,
                    a.instance,
                    dist,
                    b.id,
                    b.instance
                );
            }
        }
    }

    #[test]
    fn containment_in_bounded_sheet() {
        let sheet = Sheet::rectangle(1000.0, 1200.0);
        let patterns = vec![Pattern::rectangle("R", 300.0, 250.0).with_quantity(6)];

        let result = Nester2D::new(Config::new().with_spacing(0.0))
            .solve(&patterns, &sheet)
            .unwrap();

        for p in &result.placements {
            for &(x, y) in &p.ring {
                assert!((-1e-6..=1000.0 + 1e-6).contains(&x), "x = {}", x);
                assert!((-1e-6..=1200.0 + 1e-6).contains(&y), "y = {}", y);
            }
        }
    }

    #[test]
    fn efficiency_matches_definition() {
        let sheet_width = 1500.0;
        let sheet = Sheet::strip(sheet_width);
        let result = Nester2D::new(Config::new().with_spacing(0.0))
            .solve(&garment_patterns(), &sheet)
            .unwrap();

        let placed_area: f64 = result
            .placements
            .iter()
            .map(|p| polygon::area(&p.ring))
            .sum();
        let expected = (placed_area / (sheet_width * result.used_length_mm) * 100.0).min(99.9);

        assert!(
            (result.efficiency - expected).abs() < 1e-6,
            "efficiency {} != {}",
            result.efficiency,
            expected
        );
        assert!(result.efficiency <= 99.9);
    }

    #[test]
    fn identical_runs_are_deterministic() {
        let sheet = Sheet::strip(1500.0);
        let config = Config::new().with_spacing(5.0);

        let first = Nester2D::new(config.clone())
            .solve(&garment_patterns(), &sheet)
            .unwrap();
        let second = Nester2D::new(config)
            .solve(&garment_patterns(), &sheet)
            .unwrap();

        assert_eq!(first.used_length_mm, second.used_length_mm);
        assert_eq!(first.efficiency, second.efficiency);
        assert_eq!(first.placed_count(), second.placed_count());
        assert_eq!(first.strategy, second.strategy);
    }

    #[test]
    fn sequential_and_parallel_sweeps_agree() {
        let sheet = Sheet::strip(1500.0);

        let sequential = Nester2D::new(Config::new().with_spacing(5.0).with_threads(1))
            .solve(&garment_patterns(), &sheet)
            .unwrap();
        let parallel = Nester2D::new(Config::new().with_spacing(5.0))
            .solve(&garment_patterns(), &sheet)
            .unwrap();

        assert_eq!(sequential.used_length_mm, parallel.used_length_mm);
        assert_eq!(sequential.efficiency, parallel.efficiency);
        assert_eq!(sequential.strategy, parallel.strategy);
    }

    #[test]
    fn rotation_round_trip_without_rebase() {
        let ring = vec![(0.0, 0.0), (120.0, 10.0), (110.0, 90.0), (5.0, 80.0)];
        let there = polygon::rotate_about_centroid(&ring, 63.0);
        let back = polygon::rotate_about_centroid(&there, -63.0);

        for (orig, restored) in ring.iter().zip(back.iter()) {
            assert!((orig.0 - restored.0).abs() < 1e-9);
            assert!((orig.1 - restored.1).abs() < 1e-9);
        }
    }
}

mod engine_features {
    use super::*;
    use marknest_d2::EdgeBuffers;

    #[test]
    fn directional_buffers_consume_more_material() {
        let plain = vec![Pattern::rectangle("A", 100.0, 100.0).with_quantity(2)];
        let buffered = vec![Pattern::rectangle("A", 100.0, 100.0)
            .with_quantity(2)
            .with_buffers(EdgeBuffers::uniform(10.0))];
        let sheet = Sheet::strip(350.0);
        let config = Config::new().with_spacing(0.0);

        let plain_result = Nester2D::new(config.clone()).solve(&plain, &sheet).unwrap();
        let buffered_result = Nester2D::new(config).solve(&buffered, &sheet).unwrap();

        assert_eq!(plain_result.placed_count(), 2);
        assert_eq!(buffered_result.placed_count(), 2);

        // Two 100 mm pieces fit side by side on 350 mm; the 120 mm buffered
        // rings do not, so the buffered marker must be longer.
        assert!(buffered_result.used_length_mm > plain_result.used_length_mm);

        let a = &buffered_result.placements[0];
        let b = &buffered_result.placements[1];
        assert!(clip::intersection_area(&a.ring, &b.ring) <= 1e-3);
    }

    #[test]
    fn corner_seeding_attempts_still_produce_valid_layouts() {
        let sheet = Sheet::strip(1500.0);
        let config = Config::new().with_spacing(0.0).with_corner_seeding(true);

        let result = Nester2D::new(config)
            .solve(&garment_patterns(), &sheet)
            .unwrap();

        assert!(result.all_placed());
        for (i, a) in result.placements.iter().enumerate() {
            for b in &result.placements[i + 1..] {
                assert!(clip::intersection_area(&a.ring, &b.ring) <= 1e-3);
            }
        }
    }

    #[test]
    fn partial_layout_reported_when_sheet_fills_up() {
        // Bounded sheet that only fits two of the three pieces.
        let sheet = Sheet::rectangle(400.0, 450.0);
        let patterns = vec![Pattern::rectangle("R", 400.0, 200.0).with_quantity(3)];

        let result = Nester2D::new(Config::new().with_spacing(0.0))
            .solve(&patterns, &sheet)
            .unwrap();

        assert!(result.success);
        assert_eq!(result.placed_count(), 2);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.unplaced, vec!["R".to_string()]);
    }

    #[test]
    fn used_length_includes_spacing_allowance() {
        let patterns = vec![Pattern::rectangle("R", 400.0, 300.0)];
        let sheet = Sheet::strip(1500.0);

        let result = Nester2D::new(Config::new().with_spacing(5.0))
            .solve(&patterns, &sheet)
            .unwrap();

        assert!((result.used_length_mm - 305.0).abs() < 1e-6);
        assert!((result.used_length_cm() - 30.5).abs() < 1e-9);
    }
}
