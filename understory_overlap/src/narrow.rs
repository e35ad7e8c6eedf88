// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Narrow phase: exact overlap resolution of one candidate pair.

use crate::entry::{CheckEntry, HitShape};
use crate::geometry::{aabb_overlap, convex_overlap};
use crate::mask::PixelMaskCheckEntry;
use crate::raster::{Coverage, Rasterizer};
use crate::types::OverlapConfig;

/// Decides whether two entries overlap.
///
/// Runs, in order and stopping at the first rejection: bounds, separating
/// axes between the quads, separating axes between the outlines (when either
/// side is a polygon), and the pixel test (when either side has a mask).
/// A side without a mask takes part in the pixel test as fully opaque.
pub(crate) fn entries_overlap<O>(
    raster: &mut Rasterizer,
    config: &OverlapConfig,
    a: &CheckEntry<'_, O>,
    b: &CheckEntry<'_, O>,
) -> bool
where
    O: Copy + core::fmt::Debug,
{
    if !aabb_overlap(a.bounds, b.bounds) {
        return false;
    }
    if !convex_overlap(&a.quad, &b.quad) {
        return false;
    }
    if (is_polygon(a) || is_polygon(b)) && !convex_overlap(&a.outline(), &b.outline()) {
        return false;
    }
    match (mask_of(a), mask_of(b)) {
        (None, None) => true,
        (mask_a, mask_b) => pixels_overlap(raster, config, a, mask_a, b, mask_b),
    }
}

fn is_polygon<O>(e: &CheckEntry<'_, O>) -> bool {
    matches!(e.shape, HitShape::Polygon(_))
}

fn mask_of<'e, 'a, O>(e: &'e CheckEntry<'a, O>) -> Option<&'e PixelMaskCheckEntry<'a>> {
    match &e.shape {
        HitShape::PixelMask(mask) => Some(mask),
        _ => None,
    }
}

/// Rasterizes `a` into a viewport over the shared bounds, then checks `b` against it.
fn pixels_overlap<O>(
    raster: &mut Rasterizer,
    config: &OverlapConfig,
    a: &CheckEntry<'_, O>,
    mask_a: Option<&PixelMaskCheckEntry<'_>>,
    b: &CheckEntry<'_, O>,
    mask_b: Option<&PixelMaskCheckEntry<'_>>,
) -> bool {
    let region = a.bounds.intersect(b.bounds);
    raster.begin(
        region,
        config.pixel_check_resolution,
        config.max_raster_pixels,
    );
    let coverage_a = mask_a.map_or(Coverage::Opaque, Coverage::Mask);
    let coverage_b = mask_b.map_or(Coverage::Opaque, Coverage::Mask);
    raster.fill_quad(&a.quad, &a.uvs, coverage_a);
    let hit = raster.check_quad(&b.quad, &b.uvs, coverage_b).is_break();
    debug_assert!(
        raster.edges_clear(),
        "active-edge table must be empty after a pixel test"
    );
    hit
}
