//! Greedy cuboid rebuild.
//!
//! Compresses the dense grid into a list of maximal same-material boxes.
//!
//! ## Algorithm
//!
//! 1. Scan cells X-major, then Y, then Z
//! 2. Seed a 1x1x1 cuboid at every filled, unvisited cell
//! 3. Grow it along X, then Y, then Z, repeating while any axis grew
//! 4. A face is absorbed only if every cell in it is filled, unvisited and
//!    of the seed's material
//! 5. Emit the cuboid
//!
//! The result is deterministic but not a minimal decomposition.

use hearth_shared::BlockFacing;
use tracing::debug;

use crate::cuboid::{CuboidWithMaterial, PackedCuboid, GRID_SIZE};
use crate::error::MicroBlockResult;
use crate::grid::{VoxelGrid, GRID_VOLUME};

/// A face counts as solid while fewer centre voxels than this are missing.
const SIDE_SOLID_MAX_MISSING: u32 = 5;

/// Half-width of the centre region used for side solidity, around voxel 8.
const CENTER_RADIUS: usize = 5;

/// Side ambient occlusion is emitted while some horizontal face is missing
/// fewer voxels than this.
const SIDE_AO_MAX_MISSING: u32 = 64;

/// All six side AO bits.
pub const EMIT_SIDE_AO_ALL: u8 = 0x3F;

const LAST: usize = GRID_SIZE - 1;

/// Output of a rebuild: the cuboid list plus derived block metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct CuboidSet {
    /// Disjoint cuboids covering exactly the filled voxels.
    pub cuboids: Vec<PackedCuboid>,
    /// Per-face solidity, indexed by [`BlockFacing::index`].
    pub side_solid: [bool; 6],
    /// Side AO bitmask, either `0` or [`EMIT_SIDE_AO_ALL`].
    pub emit_side_ao: u8,
    /// Filled voxels / 4096.
    pub size_rel: f32,
}

impl CuboidSet {
    /// The set for a block with no voxels.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            cuboids: Vec::new(),
            side_solid: [false; 6],
            emit_side_ao: 0,
            size_rel: 0.0,
        }
    }

    /// Returns true if the host should remove the block.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cuboids.is_empty()
    }
}

impl Default for CuboidSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Missing-voxel tallies for the six outer layers.
#[derive(Default)]
struct EdgeTally {
    missing: [u32; 6],
    center_missing: [u32; 6],
}

impl EdgeTally {
    #[inline]
    fn is_center(a: usize, b: usize) -> bool {
        a.abs_diff(8) < CENTER_RADIUS && b.abs_diff(8) < CENTER_RADIUS
    }

    #[inline]
    fn mark(&mut self, face: BlockFacing, a: usize, b: usize) {
        self.missing[face.index()] += 1;
        if Self::is_center(a, b) {
            self.center_missing[face.index()] += 1;
        }
    }

    fn record_missing(&mut self, x: usize, y: usize, z: usize) {
        if z == 0 {
            self.mark(BlockFacing::North, y, x);
        }
        if x == LAST {
            self.mark(BlockFacing::East, y, z);
        }
        if z == LAST {
            self.mark(BlockFacing::South, y, x);
        }
        if x == 0 {
            self.mark(BlockFacing::West, y, z);
        }
        if y == LAST {
            self.mark(BlockFacing::Up, x, z);
        }
        if y == 0 {
            self.mark(BlockFacing::Down, x, z);
        }
    }
}

/// Visited flags for the rebuild scan.
struct Visited(Box<[bool; GRID_VOLUME]>);

impl Visited {
    fn new() -> Self {
        Self(Box::new([false; GRID_VOLUME]))
    }

    #[inline]
    fn get(&self, x: usize, y: usize, z: usize) -> bool {
        self.0[x * GRID_SIZE * GRID_SIZE + y * GRID_SIZE + z]
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize, z: usize) {
        self.0[x * GRID_SIZE * GRID_SIZE + y * GRID_SIZE + z] = true;
    }
}

#[inline]
fn absorbable(grid: &VoxelGrid, visited: &Visited, x: usize, y: usize, z: usize, material: u8) -> bool {
    grid.is_set(x, y, z) && !visited.get(x, y, z) && grid.material(x, y, z) == material
}

fn try_grow_x(cub: &mut CuboidWithMaterial, grid: &VoxelGrid, visited: &mut Visited) -> bool {
    let x = usize::from(cub.x2);
    if x >= GRID_SIZE {
        return false;
    }
    let ys = usize::from(cub.y1)..usize::from(cub.y2);
    let zs = usize::from(cub.z1)..usize::from(cub.z2);

    for y in ys.clone() {
        for z in zs.clone() {
            if !absorbable(grid, visited, x, y, z, cub.material) {
                return false;
            }
        }
    }
    for y in ys {
        for z in zs.clone() {
            visited.set(x, y, z);
        }
    }
    cub.x2 += 1;
    true
}

fn try_grow_y(cub: &mut CuboidWithMaterial, grid: &VoxelGrid, visited: &mut Visited) -> bool {
    let y = usize::from(cub.y2);
    if y >= GRID_SIZE {
        return false;
    }
    let xs = usize::from(cub.x1)..usize::from(cub.x2);
    let zs = usize::from(cub.z1)..usize::from(cub.z2);

    for x in xs.clone() {
        for z in zs.clone() {
            if !absorbable(grid, visited, x, y, z, cub.material) {
                return false;
            }
        }
    }
    for x in xs {
        for z in zs.clone() {
            visited.set(x, y, z);
        }
    }
    cub.y2 += 1;
    true
}

fn try_grow_z(cub: &mut CuboidWithMaterial, grid: &VoxelGrid, visited: &mut Visited) -> bool {
    let z = usize::from(cub.z2);
    if z >= GRID_SIZE {
        return false;
    }
    let xs = usize::from(cub.x1)..usize::from(cub.x2);
    let ys = usize::from(cub.y1)..usize::from(cub.y2);

    for x in xs.clone() {
        for y in ys.clone() {
            if !absorbable(grid, visited, x, y, z, cub.material) {
                return false;
            }
        }
    }
    for x in xs {
        for y in ys.clone() {
            visited.set(x, y, z);
        }
    }
    cub.z2 += 1;
    true
}

/// Rebuilds the cuboid list and block metrics from the dense grid.
///
/// # Errors
///
/// Returns `InvalidCuboid` if the grid holds a material index that does not
/// fit the packed layout.
pub fn rebuild_cuboid_list(grid: &VoxelGrid) -> MicroBlockResult<CuboidSet> {
    let mut visited = Visited::new();
    let mut tally = EdgeTally::default();
    let mut cuboids = Vec::new();
    let mut filled = 0usize;

    for x in 0..GRID_SIZE {
        for y in 0..GRID_SIZE {
            for z in 0..GRID_SIZE {
                if !grid.is_set(x, y, z) {
                    tally.record_missing(x, y, z);
                    continue;
                }
                filled += 1;

                if visited.get(x, y, z) {
                    continue;
                }
                visited.set(x, y, z);

                let mut cub = CuboidWithMaterial::unit(x as u8, y as u8, z as u8, grid.material(x, y, z));

                let mut grew = true;
                while grew {
                    grew = false;
                    grew |= try_grow_x(&mut cub, grid, &mut visited);
                    grew |= try_grow_y(&mut cub, grid, &mut visited);
                    grew |= try_grow_z(&mut cub, grid, &mut visited);
                }

                cuboids.push(cub.pack()?);
            }
        }
    }

    let emit_ao = BlockFacing::HORIZONTALS
        .iter()
        .any(|face| tally.missing[face.index()] < SIDE_AO_MAX_MISSING);

    let mut side_solid = [false; 6];
    for (solid, missing) in side_solid.iter_mut().zip(tally.center_missing) {
        *solid = missing < SIDE_SOLID_MAX_MISSING;
    }

    debug!(
        cuboids = cuboids.len(),
        filled,
        "rebuilt micro-block cuboid list"
    );

    Ok(CuboidSet {
        cuboids,
        side_solid,
        emit_side_ao: if emit_ao { EMIT_SIDE_AO_ALL } else { 0 },
        size_rel: filled as f32 / GRID_VOLUME as f32,
    })
}

/// Snow cap cuboids, split by whether they rest on the block floor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnowCuboids {
    /// One-high cuboids marking the topmost filled voxel of their columns.
    pub snow: Vec<PackedCuboid>,
    /// One-high cuboids at layer 0, where snow rests on the block below.
    pub ground_snow: Vec<PackedCuboid>,
}

/// Builds snow cuboids from column tops.
///
/// Each column's support layer is the first filled voxel scanning down from
/// the top, or layer 0. Columns sharing a support layer are merged along X
/// and Z into one-high cuboids.
#[must_use]
pub fn build_snow_cuboids(grid: &VoxelGrid) -> SnowCuboids {
    let mut support = [[0u8; GRID_SIZE]; GRID_SIZE];
    for (x, row) in support.iter_mut().enumerate() {
        for (z, top) in row.iter_mut().enumerate() {
            *top = (0..GRID_SIZE).rev().find(|&y| grid.is_set(x, y, z)).unwrap_or(0) as u8;
        }
    }

    let mut visited = [[false; GRID_SIZE]; GRID_SIZE];
    let mut out = SnowCuboids::default();

    for x in 0..GRID_SIZE {
        for z in 0..GRID_SIZE {
            if visited[x][z] {
                continue;
            }
            visited[x][z] = true;

            let y = support[x][z];
            let mut cub = CuboidWithMaterial::unit(x as u8, y, z as u8, 0);

            let mut grew = true;
            while grew {
                grew = false;
                grew |= try_snow_grow_x(&mut cub, &support, &mut visited);
                grew |= try_snow_grow_z(&mut cub, &support, &mut visited);
            }

            // Bounds come from the grid and material is zero, so this packs.
            let Ok(packed) = cub.pack() else { continue };
            if y == 0 {
                out.ground_snow.push(packed);
            } else {
                out.snow.push(packed);
            }
        }
    }

    out
}

fn try_snow_grow_x(
    cub: &mut CuboidWithMaterial,
    support: &[[u8; GRID_SIZE]; GRID_SIZE],
    visited: &mut [[bool; GRID_SIZE]; GRID_SIZE],
) -> bool {
    let x = usize::from(cub.x2);
    if x >= GRID_SIZE {
        return false;
    }
    let zs = usize::from(cub.z1)..usize::from(cub.z2);
    if zs.clone().any(|z| visited[x][z] || support[x][z] != cub.y1) {
        return false;
    }
    for z in zs {
        visited[x][z] = true;
    }
    cub.x2 += 1;
    true
}

fn try_snow_grow_z(
    cub: &mut CuboidWithMaterial,
    support: &[[u8; GRID_SIZE]; GRID_SIZE],
    visited: &mut [[bool; GRID_SIZE]; GRID_SIZE],
) -> bool {
    let z = usize::from(cub.z2);
    if z >= GRID_SIZE {
        return false;
    }
    let xs = usize::from(cub.x1)..usize::from(cub.x2);
    if xs.clone().any(|x| visited[x][z] || support[x][z] != cub.y1) {
        return false;
    }
    for x in xs {
        visited[x][z] = true;
    }
    cub.z2 += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_grid(seed: u64, fill: f64, materials: u8) -> VoxelGrid {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut grid = VoxelGrid::new();
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                for z in 0..GRID_SIZE {
                    if rng.gen_bool(fill) {
                        grid.set(x, y, z, true, rng.gen_range(0..materials));
                    }
                }
            }
        }
        grid
    }

    fn assert_same_voxels(a: &VoxelGrid, b: &VoxelGrid) {
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                for z in 0..GRID_SIZE {
                    assert_eq!(a.is_set(x, y, z), b.is_set(x, y, z), "occupancy at {x},{y},{z}");
                    if a.is_set(x, y, z) {
                        assert_eq!(a.material(x, y, z), b.material(x, y, z), "material at {x},{y},{z}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_empty_grid() {
        let set = rebuild_cuboid_list(&VoxelGrid::new()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.size_rel, 0.0);
        assert_eq!(set.emit_side_ao, 0);
        assert_eq!(set.side_solid, [false; 6]);
    }

    #[test]
    fn test_full_grid_is_one_cuboid() {
        let set = rebuild_cuboid_list(&VoxelGrid::filled(0)).unwrap();
        assert_eq!(set.cuboids.len(), 1);
        assert_eq!(
            set.cuboids[0].unpack(),
            CuboidWithMaterial::new([0, 0, 0], [16, 16, 16], 0).unwrap()
        );
        assert_eq!(set.size_rel, 1.0);
        assert_eq!(set.emit_side_ao, EMIT_SIDE_AO_ALL);
        assert_eq!(set.side_solid, [true; 6]);
    }

    #[test]
    fn test_materials_are_not_merged() {
        let mut grid = VoxelGrid::new();
        for x in 0..16 {
            grid.set(x, 0, 0, true, u8::from(x >= 8));
        }
        let set = rebuild_cuboid_list(&grid).unwrap();
        let cuboids: Vec<_> = set.cuboids.iter().map(|c| c.unpack()).collect();
        assert_eq!(
            cuboids,
            vec![
                CuboidWithMaterial::new([0, 0, 0], [8, 1, 1], 0).unwrap(),
                CuboidWithMaterial::new([8, 0, 0], [16, 1, 1], 1).unwrap(),
            ]
        );
    }

    #[test]
    fn test_growth_order_prefers_x() {
        // An L shape: full row along X at z=0 plus one voxel at (0,0,1).
        let mut grid = VoxelGrid::new();
        for x in 0..4 {
            grid.set(x, 0, 0, true, 0);
        }
        grid.set(0, 0, 1, true, 0);

        let set = rebuild_cuboid_list(&grid).unwrap();
        assert_eq!(set.cuboids.len(), 2);
        assert_eq!(
            set.cuboids[0].unpack(),
            CuboidWithMaterial::new([0, 0, 0], [4, 1, 1], 0).unwrap()
        );
        assert_eq!(set.cuboids[1].unpack(), CuboidWithMaterial::unit(0, 0, 1, 0));
    }

    #[test]
    fn test_random_grids_roundtrip_cover_and_disjoint() {
        for seed in 0..8 {
            let grid = random_grid(seed, 0.6, 3);
            let set = rebuild_cuboid_list(&grid).unwrap();

            let restored = VoxelGrid::from_cuboids(&set.cuboids);
            assert_same_voxels(&grid, &restored);

            let unpacked: Vec<_> = set.cuboids.iter().map(|c| c.unpack()).collect();
            for (i, a) in unpacked.iter().enumerate() {
                for b in &unpacked[i + 1..] {
                    assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
                }
            }
            let covered: u32 = unpacked.iter().map(CuboidWithMaterial::volume).sum();
            assert_eq!(covered as usize, grid.count());
        }
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let grid = random_grid(42, 0.8, 2);
        let first = rebuild_cuboid_list(&grid).unwrap();
        let second = rebuild_cuboid_list(&VoxelGrid::from_cuboids(&first.cuboids)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_side_solid_ignores_corner_holes() {
        let mut grid = VoxelGrid::filled(0);
        // Carve the four corner columns out of the north face (z=0):
        // outside the centre region, so it stays solid.
        for y in 0..16 {
            grid.set(0, y, 0, false, 0);
            grid.set(15, y, 0, false, 0);
        }
        // Punch five holes in the centre of the up face.
        for x in 6..11 {
            grid.set(x, 15, 8, false, 0);
        }

        let set = rebuild_cuboid_list(&grid).unwrap();
        assert!(set.side_solid[BlockFacing::North.index()]);
        assert!(!set.side_solid[BlockFacing::Up.index()]);
        assert!(set.side_solid[BlockFacing::Down.index()]);
    }

    #[test]
    fn test_side_ao_needs_a_mostly_full_side() {
        // Bottom half slab: every horizontal face misses 128 voxels.
        let mut grid = VoxelGrid::new();
        for x in 0..16 {
            for y in 0..8 {
                for z in 0..16 {
                    grid.set(x, y, z, true, 0);
                }
            }
        }
        let slab = rebuild_cuboid_list(&grid).unwrap();
        assert_eq!(slab.emit_side_ao, 0);
        assert_eq!(slab.size_rel, 0.5);

        // Fill the west wall: that face is now complete.
        for y in 8..16 {
            for z in 0..16 {
                grid.set(0, y, z, true, 0);
            }
        }
        let walled = rebuild_cuboid_list(&grid).unwrap();
        assert_eq!(walled.emit_side_ao, EMIT_SIDE_AO_ALL);
    }

    #[test]
    fn test_rejects_unpackable_material() {
        let mut grid = VoxelGrid::new();
        grid.set(0, 0, 0, true, 16);
        assert!(rebuild_cuboid_list(&grid).is_err());
    }

    #[test]
    fn test_snow_on_empty_block_is_one_ground_cuboid() {
        let snow = build_snow_cuboids(&VoxelGrid::new());
        assert!(snow.snow.is_empty());
        assert_eq!(snow.ground_snow.len(), 1);
        assert_eq!(
            snow.ground_snow[0].unpack(),
            CuboidWithMaterial::new([0, 0, 0], [16, 1, 16], 0).unwrap()
        );
    }

    #[test]
    fn test_snow_follows_column_tops() {
        // Left half is a 4-high step, right half is empty.
        let mut grid = VoxelGrid::new();
        for x in 0..8 {
            for y in 0..4 {
                for z in 0..16 {
                    grid.set(x, y, z, true, 0);
                }
            }
        }
        // An overhang above the empty half must not let snow reach under it.
        grid.set(12, 10, 12, true, 0);

        let snow = build_snow_cuboids(&grid);
        let tops: Vec<_> = snow.snow.iter().map(|c| c.unpack()).collect();
        assert!(tops.contains(&CuboidWithMaterial::new([0, 3, 0], [8, 4, 16], 0).unwrap()));
        assert!(tops.contains(&CuboidWithMaterial::unit(12, 10, 12, 0)));
        assert_eq!(tops.len(), 2);

        let ground: u32 = snow.ground_snow.iter().map(|c| c.unpack().volume()).sum();
        assert_eq!(ground, 8 * 16 - 1);
        for c in &snow.ground_snow {
            assert!(!c.unpack().contains(12, 0, 12));
        }
    }
}
