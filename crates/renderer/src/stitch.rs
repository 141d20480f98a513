//! Joining unordered marching squares segments into polylines.
//!
//! Both strategies produce the same contours: a seed is taken from the end of
//! the remaining pool, the chain is grown from its tail, then from its head,
//! always preferring the matching segment that appears latest in the input.
//! They differ only in how candidates are found.

use std::collections::{HashMap, VecDeque};

use contour_common::{points_equal, GridPoint};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::contour::{Contour, Segment};

/// Bucket edge length for the endpoint index. Must exceed `POINT_EPSILON`
/// so two equal points are never more than one bucket apart.
const BUCKET_SIZE: f64 = 1e-8;

/// How candidate segments are looked up while stitching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StitchStrategy {
    /// Linear scan of the remaining pool for every extension step. O(S^2),
    /// fine for the demo grids (up to ~200x200).
    #[default]
    Greedy,
    /// Hash endpoints into buckets for amortised O(S) stitching on large
    /// grids.
    SpatialIndex,
}

/// Join segments into contours using the given strategy.
pub fn stitch_segments(segments: Vec<Segment>, strategy: StitchStrategy) -> Vec<Contour> {
    let segment_count = segments.len();
    let contours = match strategy {
        StitchStrategy::Greedy => stitch_greedy(segments),
        StitchStrategy::SpatialIndex => stitch_indexed(segments),
    };

    debug!(
        segments = segment_count,
        contours = contours.len(),
        closed = contours.iter().filter(|c| c.is_closed()).count(),
        ?strategy,
        "Stitched segments"
    );

    contours
}

/// Grow a chain from both ends until `take_match` finds nothing.
fn grow_chain<F>(seed: Segment, mut take_match: F) -> Contour
where
    F: FnMut(&GridPoint) -> Option<GridPoint>,
{
    let mut points = VecDeque::from([seed.start, seed.end]);

    while let Some(tail) = points.back().copied() {
        match take_match(&tail) {
            Some(next) => points.push_back(next),
            None => break,
        }
    }

    // A chain seeded mid-way still has an unexplored head.
    while let Some(head) = points.front().copied() {
        match take_match(&head) {
            Some(prev) => points.push_front(prev),
            None => break,
        }
    }

    Contour::new(points.into())
}

fn other_end(segment: &Segment, point: &GridPoint) -> GridPoint {
    if points_equal(&segment.start, point) {
        segment.end
    } else {
        segment.start
    }
}

fn touches(segment: &Segment, point: &GridPoint) -> bool {
    points_equal(&segment.start, point) || points_equal(&segment.end, point)
}

fn stitch_greedy(mut pool: Vec<Segment>) -> Vec<Contour> {
    let mut contours = Vec::new();

    while let Some(seed) = pool.pop() {
        let contour = grow_chain(seed, |point| {
            let idx = pool.iter().rposition(|s| touches(s, point))?;
            let segment = pool.remove(idx);
            Some(other_end(&segment, point))
        });
        contours.push(contour);
    }

    contours
}

/// Segment endpoints bucketed by quantised coordinates.
struct EndpointIndex {
    buckets: HashMap<(i64, i64), Vec<usize>>,
}

impl EndpointIndex {
    fn build(segments: &[Segment]) -> Self {
        let mut buckets: HashMap<(i64, i64), Vec<usize>> =
            HashMap::with_capacity(segments.len() * 2);
        for (idx, segment) in segments.iter().enumerate() {
            buckets.entry(bucket_key(&segment.start)).or_default().push(idx);
            let end_key = bucket_key(&segment.end);
            if end_key != bucket_key(&segment.start) {
                buckets.entry(end_key).or_default().push(idx);
            }
        }
        Self { buckets }
    }

    /// Highest-index unused segment touching `point`.
    fn best_match(&self, segments: &[Segment], used: &[bool], point: &GridPoint) -> Option<usize> {
        let (kr, kc) = bucket_key(point);
        let mut best: Option<usize> = None;

        for dr in -1..=1 {
            for dc in -1..=1 {
                let Some(candidates) = self.buckets.get(&(kr + dr, kc + dc)) else {
                    continue;
                };
                for &idx in candidates {
                    if used[idx] || !touches(&segments[idx], point) {
                        continue;
                    }
                    if best.map_or(true, |b| idx > b) {
                        best = Some(idx);
                    }
                }
            }
        }

        best
    }
}

fn bucket_key(point: &GridPoint) -> (i64, i64) {
    (
        (point.row / BUCKET_SIZE).floor() as i64,
        (point.col / BUCKET_SIZE).floor() as i64,
    )
}

fn stitch_indexed(segments: Vec<Segment>) -> Vec<Contour> {
    let index = EndpointIndex::build(&segments);
    let mut used = vec![false; segments.len()];
    let mut contours = Vec::new();

    for seed_idx in (0..segments.len()).rev() {
        if used[seed_idx] {
            continue;
        }
        used[seed_idx] = true;

        let contour = grow_chain(segments[seed_idx], |point| {
            let idx = index.best_match(&segments, &used, point)?;
            used[idx] = true;
            Some(other_end(&segments[idx], point))
        });
        contours.push(contour);
    }

    contours
}
