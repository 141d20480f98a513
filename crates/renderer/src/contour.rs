//! Contour line (isoline) extraction using the marching squares algorithm.
//!
//! Each 2x2 cell of a [`ScalarField`] is classified against a threshold into
//! one of 16 [`CellCase`]s, which a fixed lookup table turns into 0, 1 or 2
//! line segments in grid-local coordinates. The segments are later joined
//! into polylines by [`crate::stitch`].

use contour_common::{points_equal, GridPoint, ScalarField};
use serde::{Deserialize, Serialize};

/// Corner classification of one marching squares cell.
///
/// Bit 0 = top-left, bit 1 = top-right, bit 2 = bottom-right,
/// bit 3 = bottom-left; a bit is set iff that corner is `>= threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCase(u8);

impl CellCase {
    /// Classify four corner samples given in TL, TR, BR, BL order.
    pub fn classify(corners: [f64; 4], threshold: f64) -> Self {
        let mut index = 0u8;
        for (bit, &value) in corners.iter().enumerate() {
            if value >= threshold {
                index |= 1 << bit;
            }
        }
        CellCase(index)
    }

    /// Build a case from its raw index; values above 15 are masked off.
    pub fn from_index(index: u8) -> Self {
        CellCase(index & 0x0f)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// The case with every corner flipped (1 <-> 14, 2 <-> 13, ...).
    pub fn complement(self) -> Self {
        CellCase(15 - self.0)
    }

    /// Cases 5 and 10: diagonal corners agree, adjacent corners disagree.
    pub fn is_saddle(self) -> bool {
        self.0 == 5 || self.0 == 10
    }

    /// Cases 0 and 15 never produce segments.
    pub fn is_uniform(self) -> bool {
        self.0 == 0 || self.0 == 15
    }
}

/// Where a contour crosses a cell edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingMode {
    /// Always the middle of the edge. Cheap, gives blocky output.
    Midpoint,
    /// Linearly interpolated between the two corner values.
    #[default]
    Linear,
}

/// Cell edges that a contour can cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Segment endpoints per case, as pairs of crossed edges.
///
/// Saddles are resolved by a fixed table entry, never by looking at the
/// cell's average value: case 5 separates the TL and BR corners, case 10
/// separates TR and BL.
pub const SADDLE_POLICY: [(u8, [(Edge, Edge); 2]); 2] = [
    (5, [(Edge::Left, Edge::Top), (Edge::Right, Edge::Bottom)]),
    (10, [(Edge::Top, Edge::Right), (Edge::Bottom, Edge::Left)]),
];

/// Edge pairs connected by the single segment of a non-saddle case.
fn single_segment_edges(case: CellCase) -> Option<(Edge, Edge)> {
    match case.index() {
        1 | 14 => Some((Edge::Left, Edge::Top)),
        2 | 13 => Some((Edge::Top, Edge::Right)),
        3 | 12 => Some((Edge::Left, Edge::Right)),
        4 | 11 => Some((Edge::Right, Edge::Bottom)),
        6 | 9 => Some((Edge::Top, Edge::Bottom)),
        7 | 8 => Some((Edge::Left, Edge::Bottom)),
        _ => None,
    }
}

/// A directed line segment in grid-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: GridPoint,
    pub end: GridPoint,
}

impl Segment {
    pub fn new(start: GridPoint, end: GridPoint) -> Self {
        Self { start, end }
    }

    /// True when both segments join the same two points, in either direction.
    pub fn same_as(&self, other: &Segment) -> bool {
        (points_equal(&self.start, &other.start) && points_equal(&self.end, &other.end))
            || (points_equal(&self.start, &other.end) && points_equal(&self.end, &other.start))
    }
}

/// An ordered polyline at a single threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<GridPoint>,
}

impl Contour {
    pub fn new(points: Vec<GridPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closed iff the first and last points coincide.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 1 => points_equal(first, last),
            _ => false,
        }
    }

    /// Append a copy of the first point unless the contour is already closed.
    pub fn close(&mut self) {
        if self.is_closed() {
            return;
        }
        if let Some(&first) = self.points.first() {
            self.points.push(first);
        }
    }

    /// Total polyline length in grid units.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }
}

/// Segments for one classified cell whose top-left sample is `(row, col)`.
///
/// `corners` are in TL, TR, BR, BL order and are only consulted in
/// [`CrossingMode::Linear`].
pub fn cell_segments(
    case: CellCase,
    row: usize,
    col: usize,
    corners: [f64; 4],
    threshold: f64,
    mode: CrossingMode,
) -> Vec<Segment> {
    if case.is_uniform() {
        return vec![];
    }

    let crossing = |edge: Edge| edge_crossing(edge, row, col, corners, threshold, mode);
    let segment = |(a, b): (Edge, Edge)| Segment::new(crossing(a), crossing(b));

    if let Some(edges) = single_segment_edges(case) {
        return vec![segment(edges)];
    }

    SADDLE_POLICY
        .iter()
        .find(|(index, _)| *index == case.index())
        .map(|(_, pairs)| pairs.iter().copied().map(segment).collect())
        .unwrap_or_default()
}

/// Crossing point on one edge of the cell at `(row, col)`.
///
/// Each edge is always interpolated in the same corner order (top: TL->TR,
/// right: TR->BR, bottom: BL->BR, left: TL->BL), so the edge shared by two
/// neighbouring cells yields bit-identical points in both.
fn edge_crossing(
    edge: Edge,
    row: usize,
    col: usize,
    corners: [f64; 4],
    threshold: f64,
    mode: CrossingMode,
) -> GridPoint {
    let [tl, tr, br, bl] = corners;
    let r = row as f64;
    let c = col as f64;

    let t = |v1: f64, v2: f64| match mode {
        CrossingMode::Midpoint => 0.5,
        CrossingMode::Linear => interpolate(v1, v2, threshold),
    };

    match edge {
        Edge::Top => GridPoint::new(r, c + t(tl, tr)),
        Edge::Right => GridPoint::new(r + t(tr, br), c + 1.0),
        Edge::Bottom => GridPoint::new(r + 1.0, c + t(bl, br)),
        Edge::Left => GridPoint::new(r + t(tl, bl), c),
    }
}

/// Fraction along an edge from `v1` to `v2` where `threshold` is crossed.
///
/// Falls back to the midpoint when both corners hold the same value.
pub fn interpolate(v1: f64, v2: f64, threshold: f64) -> f64 {
    let dv = v2 - v1;
    if dv.abs() < f64::EPSILON {
        return 0.5;
    }
    ((threshold - v1) / dv).clamp(0.0, 1.0)
}

/// Run marching squares over every cell of `field`.
///
/// Cells are visited in row-major order; cells touching a NaN sample are
/// skipped.
pub fn march_squares(field: &ScalarField, threshold: f64, mode: CrossingMode) -> Vec<Segment> {
    let mut segments = Vec::new();

    for row in 0..field.rows() - 1 {
        for col in 0..field.cols() - 1 {
            let corners = match field.cell_corners(row, col) {
                Some(c) => c,
                None => continue,
            };

            if corners.iter().any(|v| v.is_nan()) {
                continue;
            }

            let case = CellCase::classify(corners, threshold);
            segments.extend(cell_segments(case, row, col, corners, threshold, mode));
        }
    }

    segments
}

/// Map normalised levels in `[0, 1]` onto `[min, max]`, highest first.
///
/// Levels outside `[0, 1]` (or NaN) are dropped.
pub fn normalize_levels(levels: &[f64], min: f64, max: f64) -> Vec<f64> {
    let mut thresholds: Vec<f64> = levels
        .iter()
        .filter(|l| (0.0..=1.0).contains(*l))
        .map(|l| min + l * (max - min))
        .collect();
    thresholds.sort_by(|a, b| b.total_cmp(a));
    thresholds
}

/// `count` evenly spaced normalised levels from 0 to 1 inclusive.
pub fn uniform_levels(count: usize) -> Vec<f64> {
    match count {
        0 => vec![],
        1 => vec![0.5],
        n => (0..n).map(|i| i as f64 / (n - 1) as f64).collect(),
    }
}
