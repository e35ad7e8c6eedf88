// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry primitives shared by the sweep, the narrow phase and the queries.
//!
//! Polygons are slices of points in a consistent winding: the interior lies on
//! the non-negative side of every edge as reported by [`side`]. The check-entry
//! builder normalizes every quad and outline it produces to that winding.

use kurbo::{Point, Rect};

/// Signed side of `p` relative to the directed edge `a -> b`.
///
/// Positive on the interior side of an edge of a correctly wound polygon,
/// negative outside, zero on the supporting line.
#[inline]
pub fn side(a: Point, b: Point, p: Point) -> f64 {
    (b - a).cross(p - a)
}

/// Intersection point of the infinite lines through `a0 -> a1` and `b0 -> b1`.
///
/// Returns `None` for parallel (or degenerate) lines.
pub fn line_intersection(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<Point> {
    let r = a1 - a0;
    let s = b1 - b0;
    let denom = r.cross(s);
    if denom == 0.0 {
        return None;
    }
    let t = (b0 - a0).cross(s) / denom;
    Some(a0 + r * t)
}

/// Tests whether segments `p0 -> p1` and `q0 -> q1` intersect.
///
/// On success returns the parameter `t` in `[0, 1]` along `p0 -> p1`.
/// Parallel and collinear segments never report an intersection.
pub fn segment_intersection(p0: Point, p1: Point, q0: Point, q1: Point) -> Option<f64> {
    let r = p1 - p0;
    let s = q1 - q0;
    let denom = r.cross(s);
    if denom == 0.0 {
        return None;
    }
    let qp = q0 - p0;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(t)
    } else {
        None
    }
}

/// Half-open overlap test of two axis-aligned boxes.
///
/// Boxes that only touch along an edge do not overlap.
#[inline]
pub fn aabb_overlap(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// Axis-aligned bounds of a point set, or `None` when it is empty.
pub fn bounds_of(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p)),
    )
}

/// Signed area of a polygon (shoelace formula).
///
/// Positive for the winding used throughout this crate.
pub fn signed_area(poly: &[Point]) -> f64 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        sum += a.to_vec2().cross(b.to_vec2());
    }
    sum * 0.5
}

/// Returns `true` if one edge of `poly` has every point of `other` strictly outside.
///
/// This is one half of the separating-axis test; see [`convex_overlap`].
pub fn has_separating_edge(poly: &[Point], other: &[Point]) -> bool {
    let n = poly.len();
    if n < 2 || other.is_empty() {
        return false;
    }
    (0..n).any(|i| {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        other.iter().all(|p| side(a, b, *p) < 0.0)
    })
}

/// Separating-axis test between two convex polygons.
///
/// Both directions are checked: a separator may only be visible from the
/// edges of one of the two shapes. Touching shapes count as overlapping.
pub fn convex_overlap(a: &[Point], b: &[Point]) -> bool {
    !has_separating_edge(a, b) && !has_separating_edge(b, a)
}

/// Returns `true` if `p` lies on the interior side of every edge of `poly`.
pub fn point_in_convex(poly: &[Point], p: Point) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    (0..n).all(|i| side(poly[i], poly[(i + 1) % n], p) >= 0.0)
}
