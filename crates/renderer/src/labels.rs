//! Label placement along projected contours.

use contour_common::GeoPoint;
use serde::{Deserialize, Serialize};

/// Labels per contour in [`LabelMode::Perimeter`] mode.
pub const LABELS_PER_CONTOUR: usize = 4;

/// Minimum points a contour needs before it gets labels.
const MIN_LABEL_POINTS: usize = 3;

/// Where labels go on a contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// Evenly spaced at every quarter of the contour length.
    #[default]
    Perimeter,
    /// A single label at the vertex centroid.
    Centroid,
}

/// Text shown for a threshold value.
pub fn format_label(value: f64) -> String {
    format!("{:.2}", value)
}

/// Total polyline length in degrees.
pub fn polyline_length(points: &[GeoPoint]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Mean of all vertices, or `None` for an empty contour.
pub fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lon, lat) = points
        .iter()
        .fold((0.0, 0.0), |(lon, lat), p| (lon + p.lon, lat + p.lat));
    Some(GeoPoint::new(lon / n, lat / n))
}

/// Anchors for a contour under the given mode.
pub fn place_labels(points: &[GeoPoint], closed: bool, mode: LabelMode) -> Vec<GeoPoint> {
    if points.len() < MIN_LABEL_POINTS {
        return vec![];
    }

    match mode {
        LabelMode::Perimeter => perimeter_labels(points, closed),
        LabelMode::Centroid => centroid(points).into_iter().collect(),
    }
}

/// Anchors at `k * length / 4`. Open contours skip the far endpoint.
fn perimeter_labels(points: &[GeoPoint], closed: bool) -> Vec<GeoPoint> {
    let total = polyline_length(points);
    if total <= f64::EPSILON {
        return vec![];
    }

    let spacing = total / LABELS_PER_CONTOUR as f64;
    let count = if closed {
        LABELS_PER_CONTOUR
    } else {
        LABELS_PER_CONTOUR - 1
    };
    let targets: Vec<f64> = (1..=count).map(|k| k as f64 * spacing).collect();

    let mut placements = Vec::with_capacity(count);
    let mut next = 0;
    let mut travelled = 0.0;

    for w in points.windows(2) {
        let (p1, p2) = (w[0], w[1]);
        let span = p1.distance(&p2);
        if span <= f64::EPSILON {
            continue;
        }

        while next < targets.len() && targets[next] <= travelled + span {
            let t = ((targets[next] - travelled) / span).clamp(0.0, 1.0);
            placements.push(GeoPoint::new(
                p1.lon + t * (p2.lon - p1.lon),
                p1.lat + t * (p2.lat - p1.lat),
            ));
            next += 1;
        }

        travelled += span;
    }

    // Rounding can leave the final target a hair past the end.
    if next < targets.len() {
        if let Some(&end) = points.last() {
            placements.push(end);
        }
    }

    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_closed_square_gets_four_corner_labels() {
        let labels = place_labels(&unit_square(), true, LabelMode::Perimeter);
        assert_eq!(labels.len(), 4);
        assert_eq!(labels[0], GeoPoint::new(1.0, 0.0));
        assert_eq!(labels[1], GeoPoint::new(1.0, 1.0));
        assert_eq!(labels[3], GeoPoint::new(0.0, 0.0));
    }

    #[test]
    fn test_open_line_skips_endpoint() {
        let line = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(2.0, 0.0),
            GeoPoint::new(4.0, 0.0),
        ];
        let labels = place_labels(&line, false, LabelMode::Perimeter);
        let lons: Vec<f64> = labels.iter().map(|l| l.lon).collect();
        assert_eq!(lons, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_degenerate_inputs() {
        let two = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0)];
        assert!(place_labels(&two, false, LabelMode::Perimeter).is_empty());

        let collapsed = vec![GeoPoint::new(3.0, 3.0); 5];
        assert!(place_labels(&collapsed, true, LabelMode::Perimeter).is_empty());
    }

    #[test]
    fn test_centroid_mode() {
        let labels = place_labels(&unit_square(), true, LabelMode::Centroid);
        assert_eq!(labels.len(), 1);
        assert!((labels[0].lon - 0.4).abs() < 1e-12);
        assert!((labels[0].lat - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(0.5), "0.50");
        assert_eq!(format_label(-3.14159), "-3.14");
    }
}
