// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only view of the external scene: display lists, cameras, masks and outlines.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Affine, Point, Rect};

/// How a display-list entry is drawn, which decides how it is hit tested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RenderKind {
    /// Invisible rectangular hitbox.
    #[default]
    RectHitbox,
    /// Image; may opt into pixel-accurate tests through its alpha mask.
    Sprite,
    /// Filled outline; tested against its polygon when one is supplied.
    Shape,
    /// Text run; tested against its rectangle.
    Text,
    /// Sorting group. Groups have no extent of their own and are never tested.
    Group,
}

/// One visible object in a camera's display list.
///
/// Produced by the scene once per camera and frame. Entries are read, never
/// retained, by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayListEntry<O> {
    /// Handle of the drawable object.
    pub object: O,
    /// Final local-to-view transform (the 2D part of the object's world/view matrix).
    pub transform: Affine,
    /// View-space depth. Smaller values are closer to the camera.
    pub depth: f64,
    /// Local (untransformed) display bounds reported by the renderer.
    pub local_bounds: Rect,
    /// Render type of the object.
    pub kind: RenderKind,
    /// Sorting-group parent, if the object is sorted inside a group.
    pub sorting_parent: Option<O>,
}

impl<O> DisplayListEntry<O> {
    /// Creates an entry with zero depth and no sorting parent.
    pub fn new(object: O, kind: RenderKind, local_bounds: Rect, transform: Affine) -> Self {
        Self {
            object,
            transform,
            depth: 0.0,
            local_bounds,
            kind,
            sorting_parent: None,
        }
    }

    /// Sets the view-space depth.
    #[must_use]
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the sorting-group parent.
    #[must_use]
    pub fn with_sorting_parent(mut self, parent: O) -> Self {
        self.sorting_parent = Some(parent);
        self
    }
}

/// Borrowed 8-bit alpha mask of an image, row-major, one byte per pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlphaMask<'a> {
    /// Raw coverage bytes (`0` transparent, `255` opaque).
    pub data: &'a [u8],
    /// Mask width in pixels.
    pub width: u32,
    /// Mask height in pixels.
    pub height: u32,
}

impl<'a> AlphaMask<'a> {
    /// Wraps a byte buffer of `width * height` pixels.
    pub const fn new(data: &'a [u8], width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns `true` if the mask has no pixels or the buffer is too short for its size.
    pub fn is_empty(&self) -> bool {
        let needed = self.width as usize * self.height as usize;
        needed == 0 || self.data.len() < needed
    }
}

/// Read accessors the engine needs from the scene store.
///
/// Implementations must keep every returned borrow valid and unchanged for the
/// duration of one query. The engine never stores them past the call that
/// obtained them.
///
/// Only [`display_list`](Self::display_list) and
/// [`camera_inverse_world`](Self::camera_inverse_world) are required; the
/// remaining accessors default to "absent".
pub trait SceneDataSource {
    /// Handle of a drawable object.
    type Object: Copy + Eq + Hash + Debug;
    /// Handle of a camera.
    type Camera: Copy + Eq + Debug;

    /// The camera's display list for the current frame, back to front.
    ///
    /// Unknown cameras should return an empty slice.
    fn display_list(&self, camera: Self::Camera) -> &[DisplayListEntry<Self::Object>];

    /// Inverse of the camera's world transform, mapping world space into view space.
    fn camera_inverse_world(&self, camera: Self::Camera) -> Option<Affine>;

    /// Renderer-supplied hitbox rectangle in local space.
    ///
    /// When absent, the entry's `local_bounds` are used.
    fn hitbox_rect(&self, _object: Self::Object) -> Option<Rect> {
        None
    }

    /// Whether the object asks for pixel-accurate tests.
    fn pixel_mask_enabled(&self, _object: Self::Object) -> bool {
        false
    }

    /// Alpha threshold used to binarize the object's mask. Expected in `(0, 1)`.
    fn alpha_mask_threshold(&self, _object: Self::Object) -> f64 {
        0.5
    }

    /// The object's alpha mask, if its image has one.
    fn alpha_mask(&self, _object: Self::Object) -> Option<AlphaMask<'_>> {
        None
    }

    /// Region of the mask, in mask pixels, shown by the object's rectangle.
    ///
    /// When absent, the whole mask maps onto the rectangle.
    fn alpha_mask_region(&self, _object: Self::Object) -> Option<Rect> {
        None
    }

    /// Local-space outline of a shape object.
    fn polygon_vertices(&self, _object: Self::Object) -> Option<&[Point]> {
        None
    }
}
