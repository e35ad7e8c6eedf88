// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-object check entries: the view-space quad, bounds and hit shape of one
//! display-list entry, rebuilt for every query.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::geometry::{bounds_of, signed_area};
use crate::mask::PixelMaskCheckEntry;
use crate::scene::{DisplayListEntry, RenderKind, SceneDataSource};

/// View-space outline of an entry. Outlines of up to eight points stay inline.
pub type Outline = SmallVec<[Point; 8]>;

/// UVs of the quad corners before any winding correction.
const CORNER_UVS: [Point; 4] = [
    Point::new(0.0, 0.0),
    Point::new(1.0, 0.0),
    Point::new(1.0, 1.0),
    Point::new(0.0, 1.0),
];

/// Reason a display-list entry could not be turned into a [`CheckEntry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryError {
    /// The entry has no extent of its own (a sorting group).
    NotDrawable,
    /// The local rectangle or its transformed bounds have no area.
    DegenerateBounds,
    /// The transform collapses the plane and cannot be inverted.
    SingularTransform,
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotDrawable => f.write_str("entry has no drawable extent"),
            Self::DegenerateBounds => f.write_str("entry bounds are degenerate"),
            Self::SingularTransform => f.write_str("entry transform is singular"),
        }
    }
}

impl core::error::Error for EntryError {}

/// How an entry refines its quad during overlap and point tests.
///
/// Exactly one refinement is active per entry.
#[derive(Clone, Copy, Debug)]
pub enum HitShape<'a> {
    /// The quad itself.
    Rect,
    /// A convex local-space outline borrowed from the scene.
    Polygon(&'a [Point]),
    /// The image's alpha mask.
    PixelMask(PixelMaskCheckEntry<'a>),
}

/// One display-list entry resolved into view space.
#[derive(Clone, Debug)]
pub struct CheckEntry<'a, O> {
    /// The display-list entry this was built from.
    pub entry: &'a DisplayListEntry<O>,
    /// Position of the entry in its display list.
    pub index: usize,
    /// Local rectangle before transformation.
    pub local_rect: Rect,
    /// Transformed corners, wound so the interior is on the non-negative side of each edge.
    pub quad: [Point; 4],
    /// UV of each corner of [`quad`](Self::quad).
    pub uvs: [Point; 4],
    /// View-space axis-aligned bounds of the quad. Always has positive area.
    pub bounds: Rect,
    /// Refinement applied on top of the quad.
    pub shape: HitShape<'a>,
}

impl<'a, O: Copy + fmt::Debug> CheckEntry<'a, O> {
    /// Resolves `entry` against `source`.
    ///
    /// A sprite that asks for pixel accuracy but has no usable mask falls back
    /// to its rectangle; this is logged at debug level and is not an error.
    pub fn build<S>(
        source: &'a S,
        index: usize,
        entry: &'a DisplayListEntry<O>,
    ) -> Result<Self, EntryError>
    where
        S: SceneDataSource<Object = O> + ?Sized,
    {
        if entry.kind == RenderKind::Group {
            return Err(EntryError::NotDrawable);
        }
        let object = entry.object;
        let local_rect = source
            .hitbox_rect(object)
            .unwrap_or(entry.local_bounds)
            .abs();
        if local_rect.width() <= 0.0 || local_rect.height() <= 0.0 {
            return Err(EntryError::DegenerateBounds);
        }

        let transform = entry.transform;
        let det = transform.determinant();
        if !det.is_finite() || det.abs() <= f64::EPSILON {
            return Err(EntryError::SingularTransform);
        }

        let mut quad = [
            Point::new(local_rect.x0, local_rect.y0),
            Point::new(local_rect.x1, local_rect.y0),
            Point::new(local_rect.x1, local_rect.y1),
            Point::new(local_rect.x0, local_rect.y1),
        ]
        .map(|p| transform * p);
        let mut uvs = CORNER_UVS;
        if det < 0.0 {
            // Mirrored: swap 0<->3 and 1<->2 to restore the winding.
            quad.reverse();
            uvs.reverse();
        }

        let bounds = bounds_of(&quad).ok_or(EntryError::DegenerateBounds)?;
        if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
            return Err(EntryError::DegenerateBounds);
        }

        let shape = match entry.kind {
            RenderKind::Sprite if source.pixel_mask_enabled(object) => {
                match PixelMaskCheckEntry::prepare(source, object) {
                    Some(mask) => HitShape::PixelMask(mask),
                    None => {
                        tracing::debug!(
                            ?object,
                            "alpha mask missing or empty; using rectangle test"
                        );
                        HitShape::Rect
                    }
                }
            }
            RenderKind::Shape => match source.polygon_vertices(object) {
                Some(vertices) if vertices.len() >= 3 => HitShape::Polygon(vertices),
                _ => HitShape::Rect,
            },
            _ => HitShape::Rect,
        };

        Ok(Self {
            entry,
            index,
            local_rect,
            quad,
            uvs,
            bounds,
            shape,
        })
    }

    /// Handle of the object.
    pub fn object(&self) -> O {
        self.entry.object
    }

    /// View-space depth of the object.
    pub fn depth(&self) -> f64 {
        self.entry.depth
    }

    /// The outline used for shape refinement.
    ///
    /// Polygon entries return their outline in view space, wound like the quad;
    /// other entries return the quad.
    pub fn outline(&self) -> Outline {
        match self.shape {
            HitShape::Polygon(vertices) => {
                let transform = self.entry.transform;
                let mut out: Outline = vertices.iter().map(|p| transform * *p).collect();
                if signed_area(&out) < 0.0 {
                    out.reverse();
                }
                out
            }
            _ => SmallVec::from_slice(&self.quad),
        }
    }

    /// Maps a view-space point into the object's local space.
    pub fn to_local(&self, view: Point) -> Point {
        self.entry.transform.inverse() * view
    }

    /// UV of a view-space point within the local rectangle, clamped to `[0, 1]`.
    pub fn local_uv(&self, view: Point) -> Point {
        let local = self.to_local(view);
        let r = self.local_rect;
        Point::new(
            ((local.x - r.x0) / r.width()).clamp(0.0, 1.0),
            ((local.y - r.y0) / r.height()).clamp(0.0, 1.0),
        )
    }
}

/// Builds entries for a whole display list, skipping (and logging) failures.
pub(crate) fn build_entries<'a, S>(
    source: &'a S,
    list: &'a [DisplayListEntry<S::Object>],
) -> Vec<CheckEntry<'a, S::Object>>
where
    S: SceneDataSource + ?Sized,
{
    list.iter()
        .enumerate()
        .filter_map(|(index, entry)| match CheckEntry::build(source, index, entry) {
            Ok(check) => Some(check),
            Err(err) => {
                tracing::debug!(object = ?entry.object, %err, "excluded from hit testing");
                None
            }
        })
        .collect()
}

/// Finds the first entries of `a` and `b` in one pass, stopping once both are found.
pub(crate) fn find_pair<O: Copy + Eq>(
    list: &[DisplayListEntry<O>],
    a: O,
    b: O,
) -> Option<((usize, &DisplayListEntry<O>), (usize, &DisplayListEntry<O>))> {
    let mut found_a = None;
    let mut found_b = None;
    for (index, entry) in list.iter().enumerate() {
        if found_a.is_none() && entry.object == a {
            found_a = Some((index, entry));
        }
        if found_b.is_none() && entry.object == b {
            found_b = Some((index, entry));
        }
        if found_a.is_some() && found_b.is_some() {
            break;
        }
    }
    Some((found_a?, found_b?))
}

/// Builds the entries of `a` and `b` from the same display list.
pub(crate) fn build_pair<'a, S>(
    source: &'a S,
    list: &'a [DisplayListEntry<S::Object>],
    a: S::Object,
    b: S::Object,
) -> Option<(CheckEntry<'a, S::Object>, CheckEntry<'a, S::Object>)>
where
    S: SceneDataSource + ?Sized,
{
    let ((ia, ea), (ib, eb)) = find_pair(list, a, b)?;
    let build = |index, entry: &'a DisplayListEntry<S::Object>| {
        CheckEntry::build(source, index, entry)
            .inspect_err(|err| {
                tracing::debug!(object = ?entry.object, %err, "excluded from hit testing");
            })
            .ok()
    };
    Some((build(ia, ea)?, build(ib, eb)?))
}
