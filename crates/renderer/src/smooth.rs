//! Contour smoothing filters.
//!
//! Marching squares output is a chain of straight cell-crossing segments.
//! These filters trade a little positional accuracy for smoother curves.
//! All of them are pure: they allocate a new point list and never touch the
//! input.

use contour_common::{points_equal, GridPoint};
use serde::{Deserialize, Serialize};

/// Sequences this short are returned unchanged by every method.
pub const MAX_PASSTHROUGH_POINTS: usize = 3;

/// Default number of samples emitted per Catmull-Rom span.
pub const DEFAULT_SAMPLES_PER_SPAN: usize = 10;

fn default_samples_per_span() -> usize {
    DEFAULT_SAMPLES_PER_SPAN
}

/// Smoothing filter applied to each contour before projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SmoothingMethod {
    None,
    /// One cyclic relaxation pass: every point moves toward the midpoint of
    /// its neighbours by `tension` (0 = unchanged, 1 = onto the midpoint).
    /// Open and closed contours are treated alike.
    Laplacian { tension: f64 },
    /// Cardinal (Catmull-Rom) spline subdivision. `tension` scales the
    /// tangents; 0.5 is the classic Catmull-Rom curve.
    CatmullRom {
        tension: f64,
        #[serde(default = "default_samples_per_span")]
        samples_per_span: usize,
    },
}

impl Default for SmoothingMethod {
    fn default() -> Self {
        SmoothingMethod::CatmullRom {
            tension: 0.5,
            samples_per_span: DEFAULT_SAMPLES_PER_SPAN,
        }
    }
}

/// Smooth a polyline with the given method.
pub fn smooth_points(points: &[GridPoint], method: SmoothingMethod) -> Vec<GridPoint> {
    if points.len() <= MAX_PASSTHROUGH_POINTS {
        return points.to_vec();
    }

    match method {
        SmoothingMethod::None => points.to_vec(),
        SmoothingMethod::Laplacian { tension } => laplacian(points, tension),
        SmoothingMethod::CatmullRom {
            tension,
            samples_per_span,
        } => catmull_rom(points, tension, samples_per_span),
    }
}

fn laplacian(points: &[GridPoint], tension: f64) -> Vec<GridPoint> {
    let tension = tension.clamp(0.0, 1.0);
    let n = points.len();

    (0..n)
        .map(|i| {
            let prev = points[(i + n - 1) % n];
            let curr = points[i];
            let next = points[(i + 1) % n];

            let mid_row = (prev.row + next.row) / 2.0;
            let mid_col = (prev.col + next.col) / 2.0;

            GridPoint::new(
                curr.row + (mid_row - curr.row) * tension,
                curr.col + (mid_col - curr.col) * tension,
            )
        })
        .collect()
}

fn catmull_rom(points: &[GridPoint], tension: f64, samples_per_span: usize) -> Vec<GridPoint> {
    let samples = samples_per_span.max(1);
    let closed = points
        .first()
        .zip(points.last())
        .map_or(false, |(a, b)| points_equal(a, b));

    if closed {
        // Drop the duplicated closing point and wrap around.
        let ring = &points[..points.len() - 1];
        let n = ring.len();
        let mut out = Vec::with_capacity(n * samples + 1);
        for i in 0..n {
            let p0 = ring[(i + n - 1) % n];
            let p1 = ring[i];
            let p2 = ring[(i + 1) % n];
            let p3 = ring[(i + 2) % n];
            sample_span(&mut out, [p0, p1, p2, p3], tension, samples);
        }
        if let Some(&first) = out.first() {
            out.push(first);
        }
        out
    } else {
        // Clamp the missing neighbours at both ends.
        let n = points.len();
        let mut out = Vec::with_capacity((n - 1) * samples + 1);
        for i in 0..n - 1 {
            let p0 = points[i.saturating_sub(1)];
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = points[(i + 2).min(n - 1)];
            sample_span(&mut out, [p0, p1, p2, p3], tension, samples);
        }
        out.push(points[n - 1]);
        out
    }
}

/// Emit `samples` points on the span from `p1` to `p2` at `t = k / samples`.
fn sample_span(out: &mut Vec<GridPoint>, ctrl: [GridPoint; 4], tension: f64, samples: usize) {
    let [p0, p1, p2, p3] = ctrl;
    for k in 0..samples {
        let t = k as f64 / samples as f64;
        out.push(GridPoint::new(
            hermite(p0.row, p1.row, p2.row, p3.row, t, tension),
            hermite(p0.col, p1.col, p2.col, p3.col, t, tension),
        ));
    }
}

/// One coordinate of the cardinal spline between `p1` and `p2`.
fn hermite(p0: f64, p1: f64, p2: f64, p3: f64, t: f64, tension: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let m1 = (p2 - p0) * tension;
    let m2 = (p3 - p1) * tension;

    (2.0 * p1 - 2.0 * p2 + m1 + m2) * t3 + (-3.0 * p1 + 3.0 * p2 - 2.0 * m1 - m2) * t2 + m1 * t + p1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<GridPoint> {
        vec![
            GridPoint::new(0.0, 0.0),
            GridPoint::new(0.0, 2.0),
            GridPoint::new(2.0, 2.0),
            GridPoint::new(2.0, 0.0),
            GridPoint::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_hermite_endpoints() {
        assert!((hermite(0.0, 1.0, 2.0, 3.0, 0.0, 0.5) - 1.0).abs() < 1e-12);
        // On a straight, evenly spaced line the spline stays on the line
        assert!((hermite(0.0, 1.0, 2.0, 3.0, 0.5, 0.5) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_catmull_rom_closed_output_is_closed() {
        let out = smooth_points(&square(), SmoothingMethod::default());
        assert_eq!(out.len(), 4 * DEFAULT_SAMPLES_PER_SPAN + 1);
        assert!(points_equal(&out[0], out.last().unwrap()));
        // Passes through the control points
        assert_eq!(out[0], GridPoint::new(0.0, 0.0));
        assert_eq!(out[10], GridPoint::new(0.0, 2.0));
    }

    #[test]
    fn test_catmull_rom_open_keeps_endpoints() {
        let pts = vec![
            GridPoint::new(0.0, 0.0),
            GridPoint::new(1.0, 1.0),
            GridPoint::new(2.0, 0.0),
            GridPoint::new(3.0, 1.0),
        ];
        let out = smooth_points(
            &pts,
            SmoothingMethod::CatmullRom {
                tension: 0.5,
                samples_per_span: 4,
            },
        );
        assert_eq!(out.len(), 3 * 4 + 1);
        assert_eq!(out[0], pts[0]);
        assert_eq!(*out.last().unwrap(), pts[3]);
    }

    #[test]
    fn test_laplacian_full_tension_hits_midpoints() {
        let pts = vec![
            GridPoint::new(0.0, 0.0),
            GridPoint::new(0.0, 2.0),
            GridPoint::new(2.0, 2.0),
            GridPoint::new(2.0, 0.0),
        ];
        let out = smooth_points(&pts, SmoothingMethod::Laplacian { tension: 1.0 });
        assert_eq!(out.len(), 4);
        // Neighbours of (0,2) are (0,0) and (2,2)
        assert_eq!(out[1], GridPoint::new(1.0, 1.0));
    }

    #[test]
    fn test_laplacian_zero_tension_is_identity() {
        let pts = square();
        let out = smooth_points(&pts, SmoothingMethod::Laplacian { tension: 0.0 });
        assert_eq!(out, pts);
    }

    #[test]
    fn test_none_is_identity() {
        let pts = square();
        assert_eq!(smooth_points(&pts, SmoothingMethod::None), pts);
    }
}
