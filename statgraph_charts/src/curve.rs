// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path builders for series outlines.

use kurbo::{BezPath, Point};

/// Straight segments through `points`.
pub fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
    }
    path
}

/// A cardinal spline through `points`.
///
/// `tension` 0 gives the Catmull-Rom-like default, 1 gives straight segments. End segments
/// use the end point itself as the missing neighbor; two points produce a line.
pub fn cardinal(points: &[Point], tension: f64) -> BezPath {
    let k = (1.0 - tension) / 6.0;
    match points {
        [] | [_] | [_, _] => polyline(points),
        _ => {
            let n = points.len();
            let mut path = BezPath::new();
            path.move_to(points[0]);
            for i in 0..n - 1 {
                let (p1, p2) = (points[i], points[i + 1]);
                let c1 = if i == 0 {
                    p1
                } else {
                    p1 + (p2 - points[i - 1]) * k
                };
                let c2 = if i + 2 < n {
                    p2 - (points[i + 2] - p1) * k
                } else {
                    p2
                };
                path.curve_to(c1, c2, p2);
            }
            path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    #[test]
    fn two_points_are_a_line() {
        let path = cardinal(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)], 0.0);
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 0.0))
            ],
            "line"
        );
    }

    #[test]
    fn spline_passes_through_every_point() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(6.0, 6.0),
            Point::new(12.0, 0.0),
            Point::new(18.0, 6.0),
        ];
        let path = cardinal(&pts, 0.0);
        let ends: Vec<_> = path
            .elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::MoveTo(p) => Some(*p),
                PathEl::CurveTo(_, _, p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(ends, pts.to_vec(), "interpolating");
    }

    #[test]
    fn interior_tangents_use_neighbors() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(6.0, 6.0),
            Point::new(12.0, 0.0),
        ];
        let path = cardinal(&pts, 0.0);
        let PathEl::CurveTo(c1, c2, _) = path.elements()[1] else {
            panic!("first segment should be a cubic");
        };
        assert_eq!(c1, Point::new(0.0, 0.0), "first control sits on the start");
        // p1 - (p2 - p0) / 6
        assert!((c2 - Point::new(4.0, 6.0)).hypot() < 1e-9, "second control");
    }
}
