//! Benchmark for the greedy cuboid rebuild.
//!
//! Run with: cargo bench --package hearth_microblock --bench cuboid_rebuild_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hearth_microblock::{rebuild_cuboid_list, ChiselSize, MicroBlock, VoxelGrid};
use hearth_shared::VoxelPos;

fn checkerboard() -> VoxelGrid {
    let mut grid = VoxelGrid::new();
    for x in 0..16 {
        for y in 0..16 {
            for z in 0..16 {
                if (x + y + z) % 2 == 0 {
                    grid.set(x, y, z, true, 0);
                }
            }
        }
    }
    grid
}

fn benchmark_rebuild(c: &mut Criterion) {
    let full = VoxelGrid::filled(0);
    let worst = checkerboard();

    c.bench_function("rebuild_full_block", |b| {
        b.iter(|| black_box(rebuild_cuboid_list(black_box(&full))));
    });

    c.bench_function("rebuild_checkerboard", |b| {
        b.iter(|| black_box(rebuild_cuboid_list(black_box(&worst))));
    });
}

fn benchmark_chisel(c: &mut Criterion) {
    c.bench_function("chisel_single_voxel", |b| {
        let mut block = MicroBlock::from_full_block("rock-granite").unwrap();
        let mut i = 0i32;
        b.iter(|| {
            i = (i + 1) % 4096;
            let pos = VoxelPos::new(i / 256, (i / 16) % 16, i % 16);
            black_box(block.set_voxel(pos, i % 3 != 0, 0, 1))
        });
    });

    c.bench_function("chisel_eight_brush", |b| {
        b.iter(|| {
            let mut block = MicroBlock::from_full_block("rock-granite").unwrap();
            black_box(block.chisel(VoxelPos::new(4, 4, 4), ChiselSize::Eight))
        });
    });
}

criterion_group!(benches, benchmark_rebuild, benchmark_chisel);
criterion_main!(benches);
