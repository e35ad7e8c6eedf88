// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query results and engine configuration.

use alloc::vec::Vec;

use kurbo::Point;

/// One direction of an overlapping pair found by [`crate::OverlapEngine::sweep`].
///
/// Pairs are reported symmetrically: if `A` overlaps `B`, both `(A, B)` and
/// `(B, A)` appear in the results with the same camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OverlapPair<O, C> {
    /// The object the pair is reported for.
    pub object: O,
    /// The object it overlaps.
    pub other: O,
    /// Camera whose display list produced the pair.
    pub camera: C,
}

/// Closest object crossed by a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit<O> {
    /// The object whose outline the ray crosses first.
    pub object: O,
    /// Parameter along the ray, `0` at the start and `1` at the end.
    pub t: f64,
}

/// Object under a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointHit<O> {
    /// The hit object.
    pub object: O,
    /// Position of the point within the object's local rectangle, in `[0, 1]`.
    pub uv: Point,
    /// View-space depth of the object.
    pub depth: f64,
}

/// Overlap polygon of two objects, in the local space of the first one.
///
/// Empty when the objects do not overlap or could not be resolved.
pub type ClipPolygon = Vec<Point>;

/// Tuning for [`crate::OverlapEngine`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlapConfig {
    /// Raster pixels per view-space unit used by pixel-accurate tests.
    pub pixel_check_resolution: f64,
    /// Upper bound on the pixels of one pixel-accurate test.
    ///
    /// Larger intersections are rasterized at a proportionally lower resolution.
    pub max_raster_pixels: usize,
    /// Skip pairs whose entries share a sorting-group parent.
    pub skip_sorting_siblings: bool,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            pixel_check_resolution: 1.0,
            max_raster_pixels: 1 << 20,
            skip_sorting_siblings: false,
        }
    }
}
