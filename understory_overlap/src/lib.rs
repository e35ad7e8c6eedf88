// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_overlap --heading-base-level=0

//! Understory Overlap: overlap detection and hit testing over 2D display lists.
//!
//! Given a camera's display list (transformed, depth-sorted drawables), this crate:
//! - Finds every pair of objects whose visible extents overlap, optionally down to
//!   convex-outline or per-pixel alpha accuracy.
//! - Answers "which object is under this point" queries.
//! - Casts segments ("rays") against the same scene.
//! - Computes the exact overlap polygon of a reported pair.
//!
//! It does **not** own the scene. Callers implement [`SceneDataSource`] over their
//! own store to expose display lists, camera transforms, alpha masks and shape
//! outlines; the engine only borrows that data for the duration of a call.
//! Results are recomputed from scratch on every call; nothing is carried across
//! frames.
//!
//! ## Pipeline
//!
//! Every drawable entry is first resolved into a [`CheckEntry`]: its local rectangle
//! is transformed into a view-space quad (with mirrored transforms re-wound), and
//! its axis-aligned bounds are computed. Entries with degenerate geometry are
//! excluded from the query.
//!
//! [`OverlapEngine::sweep`] then runs:
//! 1. A broad phase sweeping begin/end events of the entry bounds along the x axis.
//! 2. A narrow phase on each candidate pair: bounds rejection, a separating-axis
//!    test between the quads, a separating-axis test between convex outlines for
//!    [`RenderKind::Shape`] entries, and a software-rasterized alpha-mask test for
//!    sprites that opt into pixel accuracy.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Affine, Point, Rect};
//! use understory_overlap::{DisplayListEntry, OverlapEngine, RenderKind, SceneDataSource};
//!
//! struct Scene(Vec<DisplayListEntry<u32>>);
//!
//! impl SceneDataSource for Scene {
//!     type Object = u32;
//!     type Camera = ();
//!
//!     fn display_list(&self, _camera: ()) -> &[DisplayListEntry<u32>] {
//!         &self.0
//!     }
//!
//!     fn camera_inverse_world(&self, _camera: ()) -> Option<Affine> {
//!         Some(Affine::IDENTITY)
//!     }
//! }
//!
//! let unit = Rect::new(-0.5, -0.5, 0.5, 0.5);
//! let scene = Scene(vec![
//!     DisplayListEntry::new(1, RenderKind::RectHitbox, unit, Affine::IDENTITY),
//!     DisplayListEntry::new(2, RenderKind::RectHitbox, unit, Affine::translate((0.5, 0.0))),
//! ]);
//!
//! let mut engine = OverlapEngine::default();
//! let pairs = engine.sweep(&scene, ());
//! assert_eq!(pairs.len(), 2);
//!
//! // The overlap of object 1 with object 2, in object 1's local space.
//! let region = engine.overlap_region(&scene, &engine.pairs()[0]);
//! assert!(!region.is_empty());
//!
//! let hit = engine.hit_test_point(&scene, (), Point::new(-0.25, 0.0));
//! assert_eq!(hit.map(|h| h.object), Some(1));
//! ```
//!
//! ## Pixel-accurate tests
//!
//! A [`RenderKind::Sprite`] whose source reports
//! [`pixel_mask_enabled`](SceneDataSource::pixel_mask_enabled) is tested against
//! its binarized alpha mask. Both quads are scan converted into a small local
//! buffer over their shared bounds at [`OverlapConfig::pixel_check_resolution`]
//! pixels per unit. A sprite whose mask is missing or empty falls back to its
//! rectangle. When only one side of a pair has a mask, the other side counts as
//! fully opaque, so the test then only clips by the masked side's shape.
//!
//! ## Diagnostics
//!
//! Excluded entries and missing masks are reported through `tracing` at debug
//! level; alpha thresholds outside `(0, 1)` at warn level.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod clip;
mod engine;
mod entry;
pub mod geometry;
mod mask;
mod narrow;
mod query;
mod raster;
mod scene;
mod sweep;
mod types;

pub use clip::clip_convex;
pub use engine::OverlapEngine;
pub use entry::{CheckEntry, EntryError, HitShape, Outline};
pub use mask::PixelMaskCheckEntry;
pub use scene::{AlphaMask, DisplayListEntry, RenderKind, SceneDataSource};
pub use types::{ClipPolygon, OverlapConfig, OverlapPair, PointHit, RayHit};
