// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlap engine: long-lived scratch state and the query entry points.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashSet;
use kurbo::Point;

use crate::entry::{CheckEntry, build_entries, build_pair};
use crate::narrow::entries_overlap;
use crate::raster::Rasterizer;
use crate::scene::SceneDataSource;
use crate::sweep::SweepScratch;
use crate::types::{ClipPolygon, OverlapConfig, OverlapPair, PointHit, RayHit};
use crate::{clip, query};

/// Hit-testing and overlap-detection engine for one scene.
///
/// The engine owns reusable scratch memory (sweep events, the active set and
/// the rasterizer's coverage buffer and active-edge table) and the results of
/// the last [`sweep`](Self::sweep). It reads the scene only through the
/// [`SceneDataSource`] passed to each call.
///
/// ## Threading
///
/// Every entry point runs to completion on the calling thread. The scratch
/// memory makes the engine non-reentrant, which `&mut self` enforces; use one
/// engine per thread if several cameras are tested in parallel.
///
/// ## Results
///
/// [`sweep`](Self::sweep) clears and rebuilds its results on every call.
/// Consume them before sweeping again.
#[derive(Debug)]
pub struct OverlapEngine<O, C> {
    config: OverlapConfig,
    raster: Rasterizer,
    sweep: SweepScratch,
    pairs: Vec<OverlapPair<O, C>>,
    objects: Vec<O>,
    seen: HashSet<O>,
}

impl<O, C> Default for OverlapEngine<O, C>
where
    O: Copy + Eq + Hash + Debug,
    C: Copy + Eq + Debug,
{
    fn default() -> Self {
        Self::new(OverlapConfig::default())
    }
}

impl<O, C> OverlapEngine<O, C>
where
    O: Copy + Eq + Hash + Debug,
    C: Copy + Eq + Debug,
{
    /// Creates an engine with the given configuration.
    pub fn new(config: OverlapConfig) -> Self {
        Self {
            config,
            raster: Rasterizer::new(),
            sweep: SweepScratch::default(),
            pairs: Vec::new(),
            objects: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &OverlapConfig {
        &self.config
    }

    /// Replaces the configuration. Takes effect on the next query.
    pub fn set_config(&mut self, config: OverlapConfig) {
        self.config = config;
    }

    /// Finds every overlapping pair in `camera`'s display list.
    ///
    /// Entries are swept along the x axis by their view-space bounds; each
    /// candidate pair then goes through the narrow phase. Both directions of
    /// each overlapping pair are reported. Entries that cannot be resolved are
    /// skipped.
    pub fn sweep<S>(&mut self, source: &S, camera: C) -> &[OverlapPair<O, C>]
    where
        S: SceneDataSource<Object = O, Camera = C> + ?Sized,
    {
        self.pairs.clear();
        self.objects.clear();
        self.seen.clear();

        let entries = build_entries(source, source.display_list(camera));
        let Self {
            config,
            raster,
            sweep,
            pairs,
            objects,
            seen,
        } = self;
        sweep.for_each_candidate(&entries, |i, j| {
            let (a, b) = (&entries[i], &entries[j]);
            if config.skip_sorting_siblings && sorting_siblings(a, b) {
                return;
            }
            if entries_overlap(raster, config, a, b) {
                let (oa, ob) = (a.object(), b.object());
                pairs.push(OverlapPair {
                    object: oa,
                    other: ob,
                    camera,
                });
                pairs.push(OverlapPair {
                    object: ob,
                    other: oa,
                    camera,
                });
                for o in [oa, ob] {
                    if seen.insert(o) {
                        objects.push(o);
                    }
                }
            }
        });
        &self.pairs
    }

    /// Pairs found by the last [`sweep`](Self::sweep).
    pub fn pairs(&self) -> &[OverlapPair<O, C>] {
        &self.pairs
    }

    /// Objects involved in at least one pair of the last sweep, in discovery order.
    pub fn overlapping_objects(&self) -> &[O] {
        &self.objects
    }

    /// Runs the narrow phase for two specific objects of `camera`'s display list.
    ///
    /// Returns `false` when either object is missing or cannot be resolved.
    pub fn objects_overlap<S>(&mut self, source: &S, camera: C, a: O, b: O) -> bool
    where
        S: SceneDataSource<Object = O, Camera = C> + ?Sized,
    {
        match build_pair(source, source.display_list(camera), a, b) {
            Some((ea, eb)) => entries_overlap(&mut self.raster, &self.config, &ea, &eb),
            None => false,
        }
    }

    /// Finds the closest object under a world-space point.
    ///
    /// The point is mapped into view space with the camera's inverse world
    /// transform. Returns `None` when nothing is hit or the camera is unknown.
    pub fn hit_test_point<S>(&self, source: &S, camera: C, world: Point) -> Option<PointHit<O>>
    where
        S: SceneDataSource<Object = O, Camera = C> + ?Sized,
    {
        query::hit_test_point(source, camera, world)
    }

    /// Finds the object whose outline the world-space segment `start -> end`
    /// crosses first, considering only crossings with `t < t_max`.
    pub fn ray_cast<S>(
        &self,
        source: &S,
        camera: C,
        start: Point,
        end: Point,
        t_max: f64,
    ) -> Option<RayHit<O>>
    where
        S: SceneDataSource<Object = O, Camera = C> + ?Sized,
    {
        query::ray_cast(source, camera, start, end, t_max)
    }

    /// Overlap polygon of a reported pair, in the local space of `pair.object`.
    ///
    /// Empty when the objects no longer overlap or cannot be found in the
    /// pair's camera.
    pub fn overlap_region<S>(&self, source: &S, pair: &OverlapPair<O, C>) -> ClipPolygon
    where
        S: SceneDataSource<Object = O, Camera = C> + ?Sized,
    {
        clip::overlap_region(source, pair.camera, pair.object, pair.other)
    }

    /// Drops the results and releases all scratch memory.
    pub fn clear(&mut self) {
        self.pairs = Vec::new();
        self.objects = Vec::new();
        self.seen = HashSet::new();
        self.sweep.clear();
        self.raster.clear();
    }
}

fn sorting_siblings<O: Eq>(a: &CheckEntry<'_, O>, b: &CheckEntry<'_, O>) -> bool {
    a.entry.sorting_parent.is_some() && a.entry.sorting_parent == b.entry.sorting_parent
}
