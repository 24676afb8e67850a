//! Dense 16x16x16 working grid.
//!
//! This is scratch space: it is rebuilt from the packed cuboid list before
//! an edit and thrown away once the list has been regenerated.

use crate::cuboid::{PackedCuboid, GRID_SIZE};

/// Total voxels per block.
pub const GRID_VOLUME: usize = GRID_SIZE * GRID_SIZE * GRID_SIZE;

/// Occupancy plus material index for every voxel of one block.
///
/// Layout: `cells[x * 256 + y * 16 + z]`, matching the X-major scan order
/// of the cuboid rebuild.
#[derive(Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    occupied: Box<[bool; GRID_VOLUME]>,
    materials: Box<[u8; GRID_VOLUME]>,
}

impl VoxelGrid {
    /// Creates an all-empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            occupied: Box::new([false; GRID_VOLUME]),
            materials: Box::new([0; GRID_VOLUME]),
        }
    }

    /// Creates a grid with every voxel filled with one material.
    #[must_use]
    pub fn filled(material: u8) -> Self {
        Self {
            occupied: Box::new([true; GRID_VOLUME]),
            materials: Box::new([material; GRID_VOLUME]),
        }
    }

    /// Expands a cuboid list into the dense form.
    ///
    /// Later cuboids win where lists overlap; a list produced by the greedy
    /// rebuild never overlaps.
    #[must_use]
    pub fn from_cuboids(cuboids: &[PackedCuboid]) -> Self {
        let mut grid = Self::new();
        for packed in cuboids {
            let cuboid = packed.unpack();
            for (x, y, z) in cuboid.voxels() {
                grid.set(x, y, z, true, cuboid.material);
            }
        }
        grid
    }

    #[inline]
    const fn index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < GRID_SIZE);
        debug_assert!(y < GRID_SIZE);
        debug_assert!(z < GRID_SIZE);
        x * GRID_SIZE * GRID_SIZE + y * GRID_SIZE + z
    }

    /// Returns true if the voxel is filled.
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds.
    #[inline]
    #[must_use]
    pub fn is_set(&self, x: usize, y: usize, z: usize) -> bool {
        self.occupied[Self::index(x, y, z)]
    }

    /// Material index of the voxel. Meaningless for empty voxels.
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds.
    #[inline]
    #[must_use]
    pub fn material(&self, x: usize, y: usize, z: usize) -> u8 {
        self.materials[Self::index(x, y, z)]
    }

    /// Sets a voxel, returning true if occupancy or material changed.
    ///
    /// Clearing a voxel leaves its material slot untouched.
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, state: bool, material: u8) -> bool {
        let idx = Self::index(x, y, z);
        let was = self.occupied[idx];
        self.occupied[idx] = state;

        if state {
            let changed = !was || self.materials[idx] != material;
            self.materials[idx] = material;
            changed
        } else {
            was
        }
    }

    /// Number of filled voxels.
    #[must_use]
    pub fn count(&self) -> usize {
        self.occupied.iter().filter(|&&v| v).count()
    }

    /// Returns true if no voxel is filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.occupied.iter().any(|&v| v)
    }
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VoxelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelGrid").field("filled", &self.count()).finish()
    }
}
