//! Tests for cell classification, segment generation and marching squares.

use contour_common::{GridPoint, ScalarField};
use renderer::contour::{
    cell_segments, interpolate, march_squares, normalize_levels, uniform_levels, CellCase,
    CrossingMode, Segment, SADDLE_POLICY,
};
use renderer::stitch::{stitch_segments, StitchStrategy};
use test_utils::{
    assert_approx_eq, create_constant_grid, create_grid_with_nans, create_linear_ramp,
    create_smooth_field, single_peak_4x4,
};

/// Corner sets covering every case, with no value equal to 0.5.
fn all_corner_sets() -> Vec<[f64; 4]> {
    (0u8..16)
        .map(|case| {
            let mut corners = [0.2; 4];
            for (bit, corner) in corners.iter_mut().enumerate() {
                if case & (1 << bit) != 0 {
                    *corner = 0.8 + bit as f64 * 0.03;
                }
            }
            corners
        })
        .collect()
}

fn same_segment_set(a: &[Segment], b: &[Segment]) -> bool {
    a.len() == b.len() && a.iter().all(|s| b.iter().any(|o| s.same_as(o)))
}

// ============================================================================
// classification
// ============================================================================

#[test]
fn test_every_case_reachable() {
    let cases: Vec<u8> = all_corner_sets()
        .into_iter()
        .map(|c| CellCase::classify(c, 0.5).index())
        .collect();
    assert_eq!(cases, (0u8..16).collect::<Vec<_>>());
}

#[test]
fn test_classify_negation_complements_case() {
    for corners in all_corner_sets() {
        let negated = corners.map(|v| -v);
        let case = CellCase::classify(corners, 0.5);
        let flipped = CellCase::classify(negated, -0.5);
        assert_eq!(flipped, case.complement(), "corners {:?}", corners);
    }
}

#[test]
fn test_threshold_equality_counts_as_above() {
    assert_eq!(CellCase::classify([0.5, 0.0, 0.0, 0.0], 0.5).index(), 1);
}

#[test]
fn test_saddle_and_uniform_flags() {
    let saddles: Vec<u8> = (0u8..16)
        .filter(|&i| CellCase::from_index(i).is_saddle())
        .collect();
    assert_eq!(saddles, vec![5, 10]);
    assert!(CellCase::from_index(0).is_uniform());
    assert!(CellCase::from_index(15).is_uniform());
    assert_eq!(CellCase::from_index(0x1f).index(), 15);
}

// ============================================================================
// segment generation
// ============================================================================

#[test]
fn test_mirror_pairs_produce_identical_segments() {
    for (a, b) in [(1u8, 14u8), (2, 13), (3, 12), (4, 11), (6, 9), (7, 8)] {
        let sa = cell_segments(
            CellCase::from_index(a),
            3,
            5,
            [0.0; 4],
            0.5,
            CrossingMode::Midpoint,
        );
        let sb = cell_segments(
            CellCase::from_index(b),
            3,
            5,
            [0.0; 4],
            0.5,
            CrossingMode::Midpoint,
        );
        assert_eq!(sa.len(), 1);
        assert!(same_segment_set(&sa, &sb), "cases {} and {}", a, b);
    }
}

#[test]
fn test_negated_cells_interpolate_identically() {
    for corners in all_corner_sets() {
        let case = CellCase::classify(corners, 0.5);
        if case.is_saddle() {
            continue;
        }
        let negated = corners.map(|v| -v);
        let flipped = CellCase::classify(negated, -0.5);

        let sa = cell_segments(case, 0, 0, corners, 0.5, CrossingMode::Linear);
        let sb = cell_segments(flipped, 0, 0, negated, -0.5, CrossingMode::Linear);
        assert!(same_segment_set(&sa, &sb), "case {}", case.index());
    }
}

#[test]
fn test_uniform_cases_have_no_segments() {
    for case in [0u8, 15] {
        let segs = cell_segments(
            CellCase::from_index(case),
            0,
            0,
            [0.0; 4],
            0.5,
            CrossingMode::Linear,
        );
        assert!(segs.is_empty());
    }
}

#[test]
fn test_saddles_follow_fixed_policy() {
    for &(case, pairs) in SADDLE_POLICY.iter() {
        let segs = cell_segments(
            CellCase::from_index(case),
            0,
            0,
            [0.0; 4],
            0.5,
            CrossingMode::Midpoint,
        );
        assert_eq!(segs.len(), pairs.len());
    }

    // Case 5: left-top and right-bottom
    let segs = cell_segments(
        CellCase::from_index(5),
        0,
        0,
        [0.0; 4],
        0.5,
        CrossingMode::Midpoint,
    );
    let expected = [
        Segment::new(GridPoint::new(0.5, 0.0), GridPoint::new(0.0, 0.5)),
        Segment::new(GridPoint::new(0.5, 1.0), GridPoint::new(1.0, 0.5)),
    ];
    assert!(same_segment_set(&segs, &expected));
}

#[test]
fn test_linear_crossing_position() {
    // TL above, the rest below: crossing a quarter of the way along each edge
    let corners = [1.0, 0.0, 0.0, 0.0];
    let case = CellCase::classify(corners, 0.75);
    let segs = cell_segments(case, 2, 4, corners, 0.75, CrossingMode::Linear);
    let expected = Segment::new(GridPoint::new(2.25, 4.0), GridPoint::new(2.0, 4.25));
    assert!(segs[0].same_as(&expected), "{:?}", segs);
}

#[test]
fn test_interpolate_edge_cases() {
    assert_approx_eq!(interpolate(0.0, 1.0, 0.25), 0.25, 1e-12);
    assert_eq!(interpolate(0.3, 0.3, 0.3), 0.5);
    assert_eq!(interpolate(0.0, 1.0, 2.0), 1.0);
    assert_eq!(interpolate(0.0, 1.0, -1.0), 0.0);
}

// ============================================================================
// marching squares over fields
// ============================================================================

#[test]
fn test_uniform_field_has_no_contours() {
    let field = ScalarField::new(8, 8, create_constant_grid(8, 8, 3.0)).unwrap();
    for threshold in [2.0, 3.0, 4.0] {
        for mode in [CrossingMode::Midpoint, CrossingMode::Linear] {
            assert!(march_squares(&field, threshold, mode).is_empty());
        }
    }
}

#[test]
fn test_single_peak_gives_one_closed_ring() {
    let field = ScalarField::new(4, 4, single_peak_4x4()).unwrap();
    let (min, max) = field.value_range().unwrap();
    let thresholds = normalize_levels(&[0.5], min, max);

    for mode in [CrossingMode::Midpoint, CrossingMode::Linear] {
        let segments = march_squares(&field, thresholds[0], mode);
        assert_eq!(segments.len(), 4);

        let contours = stitch_segments(segments, StitchStrategy::Greedy);
        assert_eq!(contours.len(), 1);
        assert!(contours[0].is_closed());
        assert_eq!(contours[0].len(), 5);

        // Every vertex is within one cell of the peak at [2][2]
        for p in &contours[0].points {
            assert!((p.row - 2.0).abs() < 1.0 && (p.col - 2.0).abs() < 1.0, "{:?}", p);
        }
    }
}

#[test]
fn test_linear_ramp_gives_one_vertical_line() {
    let field = ScalarField::new(4, 4, create_linear_ramp(4, 4)).unwrap();
    let (min, max) = field.value_range().unwrap();
    let threshold = normalize_levels(&[0.5], min, max)[0];
    assert_approx_eq!(threshold, 0.375, 1e-12);

    let contours = stitch_segments(
        march_squares(&field, threshold, CrossingMode::Linear),
        StitchStrategy::Greedy,
    );
    assert_eq!(contours.len(), 1);

    let line = &contours[0];
    assert!(!line.is_closed());
    assert_eq!(line.len(), 4);
    for p in &line.points {
        assert_approx_eq!(p.col, 1.5, 1e-12);
    }
    let rows: Vec<f64> = line.points.iter().map(|p| p.row).collect();
    assert_eq!(rows, vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_nan_cells_are_skipped() {
    let mut data = create_grid_with_nans(3, 3, &[(1, 1)]);
    data[0] = 1.0;
    let field = ScalarField::new(3, 3, data).unwrap();
    // Every cell touches the NaN centre sample
    assert!(march_squares(&field, 0.5, CrossingMode::Linear).is_empty());
}

#[test]
fn test_open_contours_end_on_the_boundary() {
    // Interior crossings are shared by two cells and must join up exactly;
    // only crossings on the outer edge of the grid may end a line.
    let n = 20;
    let field = ScalarField::new(n, n, create_smooth_field(n, n)).unwrap();
    let last = (n - 1) as f64;
    let on_boundary = |p: &GridPoint| {
        p.row.abs() < 1e-9 || p.col.abs() < 1e-9 || (p.row - last).abs() < 1e-9 || (p.col - last).abs() < 1e-9
    };

    for strategy in [StitchStrategy::Greedy, StitchStrategy::SpatialIndex] {
        let contours = stitch_segments(
            march_squares(&field, 55.0, CrossingMode::Linear),
            strategy,
        );
        assert!(!contours.is_empty());
        for c in contours.iter().filter(|c| !c.is_closed()) {
            assert!(on_boundary(&c.points[0]), "{:?}", c.points[0]);
            assert!(on_boundary(&c.points[c.len() - 1]));
        }
    }
}

// ============================================================================
// levels
// ============================================================================

#[test]
fn test_normalize_levels_descending_and_filtered() {
    let thresholds = normalize_levels(&[0.2, 0.8, 1.5, -0.1, 0.5], 10.0, 20.0);
    assert_eq!(thresholds.len(), 3);
    assert_approx_eq!(thresholds[0], 18.0, 1e-12);
    assert_approx_eq!(thresholds[1], 15.0, 1e-12);
    assert_approx_eq!(thresholds[2], 12.0, 1e-12);
}

#[test]
fn test_uniform_levels() {
    assert!(uniform_levels(0).is_empty());
    assert_eq!(uniform_levels(1), vec![0.5]);
    let ten = uniform_levels(10);
    assert_eq!(ten.len(), 10);
    assert_eq!(ten[0], 0.0);
    assert_eq!(ten[9], 1.0);
}
