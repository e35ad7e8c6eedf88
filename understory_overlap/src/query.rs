// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point hit testing and ray casting against a camera's display list.

use kurbo::{Point, Rect};

use crate::entry::{CheckEntry, HitShape, build_entries};
use crate::geometry::{convex_overlap, point_in_convex, segment_intersection};
use crate::scene::SceneDataSource;
use crate::types::{PointHit, RayHit};

/// Finds the closest object under a world-space point.
///
/// When several objects share the smallest depth, the one drawn last wins.
pub(crate) fn hit_test_point<S>(
    source: &S,
    camera: S::Camera,
    world: Point,
) -> Option<PointHit<S::Object>>
where
    S: SceneDataSource + ?Sized,
{
    let view = source.camera_inverse_world(camera)? * world;
    let list = source.display_list(camera);
    build_entries(source, list)
        .iter()
        .filter_map(|entry| point_hit(entry, view))
        .fold(None, |best: Option<PointHit<S::Object>>, hit| match best {
            Some(b) if b.depth < hit.depth => Some(b),
            _ => Some(hit),
        })
}

/// Tests one entry against a view-space point.
pub(crate) fn point_hit<O>(entry: &CheckEntry<'_, O>, view: Point) -> Option<PointHit<O>>
where
    O: Copy + core::fmt::Debug,
{
    if !contains_inclusive(entry.bounds, view) || !point_in_convex(&entry.quad, view) {
        return None;
    }
    let uv = entry.local_uv(view);
    let inside = match &entry.shape {
        HitShape::Rect => true,
        HitShape::PixelMask(mask) => mask.is_solid(uv),
        HitShape::Polygon(_) => point_in_convex(&entry.outline(), view),
    };
    inside.then(|| PointHit {
        object: entry.object(),
        uv,
        depth: entry.depth(),
    })
}

/// Bounds test that, like [`point_in_convex`], keeps points on every edge.
fn contains_inclusive(bounds: Rect, p: Point) -> bool {
    (bounds.x0..=bounds.x1).contains(&p.x) && (bounds.y0..=bounds.y1).contains(&p.y)
}

/// Finds the object whose quad a world-space segment crosses first.
///
/// Only crossings with `t < t_max` are considered.
pub(crate) fn ray_cast<S>(
    source: &S,
    camera: S::Camera,
    start: Point,
    end: Point,
    t_max: f64,
) -> Option<RayHit<S::Object>>
where
    S: SceneDataSource + ?Sized,
{
    let to_view = source.camera_inverse_world(camera)?;
    let (start, end) = (to_view * start, to_view * end);
    let list = source.display_list(camera);
    let mut best_t = t_max;
    let mut best = None;
    for entry in &build_entries(source, list) {
        if ray_entry(entry, start, end, &mut best_t) {
            best = Some(RayHit {
                object: entry.object(),
                t: best_t,
            });
        }
    }
    best
}

/// Intersects a view-space segment with one entry's quad.
///
/// Lowers `best_t` and returns `true` when a crossing with `0 <= t < best_t` exists.
pub(crate) fn ray_entry<O>(
    entry: &CheckEntry<'_, O>,
    start: Point,
    end: Point,
    best_t: &mut f64,
) -> bool {
    if !convex_overlap(&[start, end], &entry.quad) {
        return false;
    }
    let q = &entry.quad;
    let mut found = false;
    for i in 0..4 {
        if let Some(t) = segment_intersection(start, end, q[i], q[(i + 1) % 4])
            && t >= 0.0
            && t < *best_t
        {
            *best_t = t;
            found = true;
        }
    }
    found
}
