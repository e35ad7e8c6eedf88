// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Affine, Point, Rect};
use understory_overlap::{
    AlphaMask, DisplayListEntry, OverlapEngine, RenderKind, SceneDataSource,
};

struct Scene {
    list: Vec<DisplayListEntry<u32>>,
    mask: Vec<u8>,
    pixel_accurate: bool,
}

impl SceneDataSource for Scene {
    type Object = u32;
    type Camera = ();

    fn display_list(&self, _camera: ()) -> &[DisplayListEntry<u32>] {
        &self.list
    }

    fn camera_inverse_world(&self, _camera: ()) -> Option<Affine> {
        Some(Affine::IDENTITY)
    }

    fn pixel_mask_enabled(&self, _object: u32) -> bool {
        self.pixel_accurate
    }

    fn alpha_mask(&self, _object: u32) -> Option<AlphaMask<'_>> {
        Some(AlphaMask::new(&self.mask, 16, 16))
    }
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// A circle of radius 8 on a 16x16 mask.
fn disc_mask() -> Vec<u8> {
    let mut out = Vec::with_capacity(256);
    for y in 0..16 {
        for x in 0..16 {
            let dx = x as f64 + 0.5 - 8.0;
            let dy = y as f64 + 0.5 - 8.0;
            out.push(if dx * dx + dy * dy <= 64.0 { 255 } else { 0 });
        }
    }
    out
}

/// An `n` by `n` grid of rotated sprites, each overlapping its neighbors by `scale - 1` cells.
fn gen_grid_scene(n: usize, cell: f64, scale: f64, pixel_accurate: bool) -> Scene {
    let mut rng = Rng::new(0x5EED_0F0F_1234_ABCD);
    let half = cell * scale * 0.5;
    let local = Rect::new(-half, -half, half, half);
    let mut list = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let center = (x as f64 * cell, y as f64 * cell);
            let angle = rng.next_f64() * core::f64::consts::TAU;
            let transform = Affine::translate(center) * Affine::rotate(angle);
            let id = (y * n + x) as u32;
            list.push(
                DisplayListEntry::new(id, RenderKind::Sprite, local, transform)
                    .with_depth(rng.next_f64()),
            );
        }
    }
    Scene {
        list,
        mask: disc_mask(),
        pixel_accurate,
    }
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlap_sweep");
    for &n in &[16usize, 32, 64] {
        for (name, pixel_accurate) in [("quads", false), ("masks", true)] {
            let scene = gen_grid_scene(n, 10.0, 1.3, pixel_accurate);
            let mut engine = OverlapEngine::default();
            group.throughput(Throughput::Elements(scene.list.len() as u64));
            group.bench_function(BenchmarkId::new(name, n), |b| {
                b.iter(|| black_box(engine.sweep(&scene, ()).len()));
            });
        }
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlap_queries");
    let n = 64usize;
    let scene = gen_grid_scene(n, 10.0, 1.3, true);
    let engine = OverlapEngine::<u32, ()>::default();
    let extent = n as f64 * 10.0;

    let mut rng = Rng::new(0x81FD_BEE7_94F0_AF1A);
    let points: Vec<Point> = (0..256)
        .map(|_| Point::new(rng.next_f64() * extent, rng.next_f64() * extent))
        .collect();
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("hit_test_point", |b| {
        b.iter(|| {
            for &p in &points {
                black_box(engine.hit_test_point(&scene, (), p));
            }
        });
    });

    group.throughput(Throughput::Elements(1));
    group.bench_function("ray_cast_diagonal", |b| {
        b.iter(|| {
            black_box(engine.ray_cast(
                &scene,
                (),
                Point::new(-5.0, -5.0),
                Point::new(extent, extent),
                1.0,
            ))
        });
    });
    group.finish();
}

criterion_group!(benches, bench_sweep, bench_queries);
criterion_main!(benches);
