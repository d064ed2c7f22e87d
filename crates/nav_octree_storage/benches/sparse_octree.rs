use nav_octree_core::{Point3f, PointN};
use nav_octree_storage::prelude::*;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn cube_points(edge_len: i32) -> Vec<Point3f> {
    let mut points = Vec::new();
    for x in 0..edge_len {
        for y in 0..edge_len {
            for z in 0..edge_len {
                points.push(PointN([x as f32 + 0.25, y as f32 + 0.25, z as f32 + 0.25]));
            }
        }
    }
    points
}

fn sparse_octree_fill_cube(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse_octree_fill_cube");
    for edge_len in [8, 16, 32].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(edge_len),
            edge_len,
            |b, &edge_len| {
                b.iter_with_setup(
                    || cube_points(edge_len),
                    |points| {
                        let mut octree =
                            SparseOctree::new(OctreeSettings::default(), SlabAddressSpace::new())
                                .unwrap();
                        for p in points {
                            octree.set(p, 1).unwrap();
                        }
                        octree
                    },
                );
            },
        );
    }
    group.finish();
}

fn sparse_octree_get_checkerboard(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparse_octree_get_checkerboard");
    for edge_len in [8, 16, 32].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(edge_len),
            edge_len,
            |b, &edge_len| {
                let points = cube_points(edge_len);
                let mut octree =
                    SparseOctree::new(OctreeSettings::default(), SlabAddressSpace::new()).unwrap();
                // Alternating values never merge, so this is the worst case for node count.
                for (i, p) in points.iter().enumerate() {
                    octree.set(*p, (i % 2) as i64).unwrap();
                }

                b.iter(|| {
                    for p in points.iter() {
                        black_box(octree.get(*p).unwrap());
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    sparse_octree_fill_cube,
    sparse_octree_get_checkerboard
);
criterion_main!(benches);
