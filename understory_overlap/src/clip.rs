// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlap regions: Sutherland-Hodgman clipping of one quad by another.

use alloc::vec::Vec;

use kurbo::Point;

use crate::entry::build_pair;
use crate::geometry::{line_intersection, side};
use crate::scene::SceneDataSource;
use crate::types::ClipPolygon;

/// Clips `subject` by every edge of the convex polygon `clip`.
///
/// Both polygons use this crate's winding. Points on a clip edge are kept.
/// Returns an empty vector when nothing of `subject` lies inside `clip`.
pub fn clip_convex(subject: &[Point], clip: &[Point]) -> Vec<Point> {
    let mut output: Vec<Point> = subject.to_vec();
    let mut input: Vec<Point> = Vec::with_capacity(subject.len() + clip.len());
    let n = clip.len();
    for i in 0..n {
        if output.is_empty() {
            break;
        }
        let (a, b) = (clip[i], clip[(i + 1) % n]);
        core::mem::swap(&mut input, &mut output);
        output.clear();
        let Some(&last) = input.last() else {
            break;
        };
        let mut prev = last;
        let mut prev_inside = side(a, b, prev) >= 0.0;
        for &current in &input {
            let inside = side(a, b, current) >= 0.0;
            if inside != prev_inside
                && let Some(p) = line_intersection(prev, current, a, b)
            {
                output.push(p);
            }
            if inside {
                output.push(current);
            }
            prev = current;
            prev_inside = inside;
        }
    }
    output
}

/// Overlap polygon of `a` and `b` from `camera`'s display list, in `a`'s local space.
pub(crate) fn overlap_region<S>(
    source: &S,
    camera: S::Camera,
    a: S::Object,
    b: S::Object,
) -> ClipPolygon
where
    S: SceneDataSource + ?Sized,
{
    let list = source.display_list(camera);
    let Some((entry_a, entry_b)) = build_pair(source, list, a, b) else {
        return Vec::new();
    };
    let mut region = clip_convex(&entry_a.quad, &entry_b.quad);
    if region.is_empty() {
        return region;
    }
    let to_local = entry_a.entry.transform.inverse();
    for p in &mut region {
        *p = to_local * *p;
    }
    region
}
