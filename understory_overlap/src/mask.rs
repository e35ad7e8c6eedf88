// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Alpha-mask views used by pixel-accurate tests.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use crate::scene::{AlphaMask, SceneDataSource};

/// One object's alpha mask, ready for sampling in the object's UV space.
///
/// UV `(0, 0)` is the top-left corner of the object's local rectangle and
/// `(1, 1)` the bottom-right one; they map linearly onto [`region`](Self::region)
/// of the mask.
#[derive(Clone, Copy, Debug)]
pub struct PixelMaskCheckEntry<'a> {
    mask: AlphaMask<'a>,
    region: Rect,
    threshold: f64,
    cols: (i64, i64),
    rows: (i64, i64),
}

impl<'a> PixelMaskCheckEntry<'a> {
    /// Builds a mask view from explicit parts.
    ///
    /// Returns `None` for an empty mask or a region that does not intersect it.
    /// A threshold outside `(0, 1)` is logged and used as-is.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "pixel indices are clamped to the mask's u32 dimensions"
    )]
    pub fn new(mask: AlphaMask<'a>, region: Option<Rect>, threshold: f64) -> Option<Self> {
        if mask.is_empty() {
            return None;
        }
        let full = Rect::new(0.0, 0.0, f64::from(mask.width), f64::from(mask.height));
        let region = region.map_or(full, |r| r.abs().intersect(full));
        if region.width() <= 0.0 || region.height() <= 0.0 {
            return None;
        }
        if !(threshold > 0.0 && threshold < 1.0) {
            tracing::warn!(threshold, "alpha mask threshold outside (0, 1)");
        }
        let max_col = i64::from(mask.width) - 1;
        let max_row = i64::from(mask.height) - 1;
        let cols = (
            (region.x0.floor() as i64).clamp(0, max_col),
            (region.x1.ceil() as i64 - 1).clamp(0, max_col),
        );
        let rows = (
            (region.y0.floor() as i64).clamp(0, max_row),
            (region.y1.ceil() as i64 - 1).clamp(0, max_row),
        );
        Some(Self {
            mask,
            region,
            threshold,
            cols,
            rows,
        })
    }

    /// Readies the mask of `object` from the scene.
    ///
    /// Returns `None` when the object's image has no mask or the mask is empty.
    pub fn prepare<S: SceneDataSource + ?Sized>(source: &'a S, object: S::Object) -> Option<Self> {
        let mask = source.alpha_mask(object)?;
        Self::new(
            mask,
            source.alpha_mask_region(object),
            source.alpha_mask_threshold(object),
        )
    }

    /// Region of the mask, in mask pixels, covered by the object's rectangle.
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Binarization threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Alpha in `[0, 1]` of the mask pixel under `uv`. UVs are clamped to `[0, 1]`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "column and row are clamped to the mask region"
    )]
    pub fn alpha_at(&self, uv: Point) -> f64 {
        let u = uv.x.clamp(0.0, 1.0);
        let v = uv.y.clamp(0.0, 1.0);
        let px = self.region.x0 + u * self.region.width();
        let py = self.region.y0 + v * self.region.height();
        let col = (px.floor() as i64).clamp(self.cols.0, self.cols.1);
        let row = (py.floor() as i64).clamp(self.rows.0, self.rows.1);
        let idx = row as usize * self.mask.width as usize + col as usize;
        f64::from(self.mask.data[idx]) / 255.0
    }

    /// Whether the mask is solid under `uv`, i.e. its alpha reaches the threshold.
    pub fn is_solid(&self, uv: Point) -> bool {
        self.alpha_at(uv) >= self.threshold
    }
}
