// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Software scanline rasterizer for pixel-accurate overlap tests.
//!
//! Quads are scan converted into a small local coverage buffer in two phases
//! per row: edges are stepped into a per-row active-edge slot, and once a row
//! has received both of its crossings the span between them is resolved.
//! Pixel centers sit at half-integer coordinates; edges cover rows whose
//! centers lie in `[top, bottom)` and spans cover columns whose centers lie in
//! `[left, right)`, so abutting edges never double-cover a pixel.
//!
//! The buffers are reused across calls and are not reentrant: one
//! [`Rasterizer`] must only ever run one test at a time.

use alloc::vec::Vec;
use core::ops::ControlFlow;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Vec2};

use crate::mask::PixelMaskCheckEntry;

/// Minimum number of pixel centers across each axis of a viewport.
///
/// Intersections thinner than one pixel at the requested resolution are
/// sampled more finely along that axis so at least one row and column of
/// pixel centers falls inside them.
const MIN_SPAN_PIXELS: f64 = 2.0;

/// Per-pixel coverage source for one quad.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Coverage<'a> {
    /// Every covered pixel is solid (the implicit 1x1 opaque mask).
    Opaque,
    /// Covered pixels are solid where the mask reaches its threshold.
    Mask(&'a PixelMaskCheckEntry<'a>),
}

impl Coverage<'_> {
    #[inline]
    fn is_solid(&self, uv: Point) -> bool {
        match self {
            Self::Opaque => true,
            Self::Mask(mask) => mask.is_solid(uv),
        }
    }
}

/// What a span does with the pixels it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanMode {
    /// Write solid samples into the buffer.
    Fill,
    /// Stop at the first pixel that is solid both in the buffer and in the sample.
    Check,
}

/// First crossing of a row, waiting for its partner.
#[derive(Clone, Copy, Debug)]
struct Crossing {
    x: f64,
    uv: Point,
}

/// Reusable rasterizer state: coverage buffer plus active-edge table.
#[derive(Debug, Default)]
pub(crate) struct Rasterizer {
    pixels: Vec<u8>,
    edges: Vec<Option<Crossing>>,
    width: usize,
    height: usize,
    origin: Point,
    /// Pixels per view-space unit along each axis.
    scale: Vec2,
}

impl Rasterizer {
    /// Creates an empty rasterizer. Buffers grow on first use.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Releases the buffers.
    pub(crate) fn clear(&mut self) {
        self.pixels = Vec::new();
        self.edges = Vec::new();
        self.width = 0;
        self.height = 0;
    }

    /// Current viewport size in pixels.
    #[cfg(test)]
    pub(crate) fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Prepares a cleared viewport covering `region` (view space) at `resolution`
    /// pixels per unit, with a one-pixel guard border on every side.
    ///
    /// The resolution is reduced when the viewport would exceed `max_pixels`,
    /// and raised per axis so that each axis of `region` spans at least
    /// [`MIN_SPAN_PIXELS`] pixels.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "viewport sides are small positive pixel counts bounded by the budget"
    )]
    pub(crate) fn begin(&mut self, region: Rect, resolution: f64, max_pixels: usize) {
        let mut scale = if resolution > 0.0 && resolution.is_finite() {
            resolution
        } else {
            1.0
        };
        let (w, h) = (region.width().max(0.0), region.height().max(0.0));
        let area = w * scale * h * scale;
        let budget = max_pixels.max(16) as f64;
        if area > budget {
            scale *= (budget / area).sqrt();
        }
        let axis_scale = |extent: f64| {
            if extent > 0.0 {
                scale.max(MIN_SPAN_PIXELS / extent)
            } else {
                scale
            }
        };
        let scale = Vec2::new(axis_scale(w), axis_scale(h));
        let width = (w * scale.x).ceil() as usize + 2;
        let height = (h * scale.y).ceil() as usize + 2;

        self.width = width;
        self.height = height;
        self.scale = scale;
        self.origin = Point::new(region.x0 - 1.0 / scale.x, region.y0 - 1.0 / scale.y);
        self.pixels.clear();
        self.pixels.resize(width * height, 0);
        self.edges.clear();
        self.edges.resize(height, None);
    }

    /// Maps a view-space point into viewport pixel coordinates.
    #[inline]
    fn to_pixels(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.origin.x) * self.scale.x,
            (p.y - self.origin.y) * self.scale.y,
        )
    }

    /// Writes the solid pixels of a view-space quad into the coverage buffer.
    pub(crate) fn fill_quad(
        &mut self,
        quad: &[Point; 4],
        uvs: &[Point; 4],
        coverage: Coverage<'_>,
    ) {
        let flow = self.scan_quad(quad, uvs, coverage, ScanMode::Fill);
        debug_assert!(flow.is_continue(), "fill passes never stop early");
    }

    /// Scan converts a view-space quad against the coverage buffer.
    ///
    /// Returns [`ControlFlow::Break`] at the first pixel that is solid both in
    /// the buffer and in `coverage`.
    pub(crate) fn check_quad(
        &mut self,
        quad: &[Point; 4],
        uvs: &[Point; 4],
        coverage: Coverage<'_>,
    ) -> ControlFlow<()> {
        self.scan_quad(quad, uvs, coverage, ScanMode::Check)
    }

    /// Scan converts a view-space quad. On return, every active-edge slot is empty.
    fn scan_quad(
        &mut self,
        quad: &[Point; 4],
        uvs: &[Point; 4],
        coverage: Coverage<'_>,
        mode: ScanMode,
    ) -> ControlFlow<()> {
        let pts = quad.map(|p| self.to_pixels(p));
        let mut flow = ControlFlow::Continue(());
        for i in 0..4 {
            let j = (i + 1) % 4;
            flow = self.step_edge(pts[i], uvs[i], pts[j], uvs[j], coverage, mode);
            if flow.is_break() {
                break;
            }
        }
        self.reset_edges();
        flow
    }

    /// Steps one edge row by row, pairing it with the row's pending crossing.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "rows are clamped to [0, height)"
    )]
    fn step_edge(
        &mut self,
        p0: Point,
        uv0: Point,
        p1: Point,
        uv1: Point,
        coverage: Coverage<'_>,
        mode: ScanMode,
    ) -> ControlFlow<()> {
        let (top, top_uv, bottom, bottom_uv) = if p0.y <= p1.y {
            (p0, uv0, p1, uv1)
        } else {
            (p1, uv1, p0, uv0)
        };
        let dy = bottom.y - top.y;
        if dy <= 0.0 {
            return ControlFlow::Continue(());
        }
        let first = row_start(top.y).max(0);
        let last = row_start(bottom.y).min(self.height as i64);
        for row in first..last {
            let t = (row as f64 + 0.5 - top.y) / dy;
            let crossing = Crossing {
                x: top.x + (bottom.x - top.x) * t,
                uv: top_uv.lerp(bottom_uv, t),
            };
            let slot = row as usize;
            match self.edges[slot].take() {
                None => self.edges[slot] = Some(crossing),
                Some(pending) => self.scan_line(slot, pending, crossing, coverage, mode)?,
            }
        }
        ControlFlow::Continue(())
    }

    /// Resolves the span between two crossings of `row`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "columns are clamped to [0, width)"
    )]
    fn scan_line(
        &mut self,
        row: usize,
        a: Crossing,
        b: Crossing,
        coverage: Coverage<'_>,
        mode: ScanMode,
    ) -> ControlFlow<()> {
        let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
        let dx = right.x - left.x;
        if dx <= 0.0 {
            return ControlFlow::Continue(());
        }
        let first = row_start(left.x).max(0);
        let last = row_start(right.x).min(self.width as i64);
        let base = row * self.width;
        for col in first..last {
            let s = (col as f64 + 0.5 - left.x) / dx;
            let solid = coverage.is_solid(left.uv.lerp(right.uv, s));
            let px = &mut self.pixels[base + col as usize];
            match mode {
                ScanMode::Fill => *px = u8::from(solid),
                ScanMode::Check => {
                    if solid && *px != 0 {
                        return ControlFlow::Break(());
                    }
                }
            }
        }
        ControlFlow::Continue(())
    }

    fn reset_edges(&mut self) {
        self.edges.fill(None);
    }

    /// Returns `true` if no active-edge slot is occupied.
    pub(crate) fn edges_clear(&self) -> bool {
        self.edges.iter().all(Option::is_none)
    }

    /// Number of solid pixels in the coverage buffer.
    #[cfg(test)]
    pub(crate) fn solid_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| **p != 0).count()
    }
}

/// First pixel index whose center (`i + 0.5`) is at or past `v`.
#[inline]
#[expect(
    clippy::cast_possible_truncation,
    reason = "saturating float-to-int cast; callers clamp to the viewport"
)]
fn row_start(v: f64) -> i64 {
    (v - 0.5).ceil() as i64
}
