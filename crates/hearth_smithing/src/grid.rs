//! # Anvil Work Item Grid
//!
//! The piece being forged is a 16×6×16 grid of cells sitting on the anvil
//! surface. Each cell holds one of four states and is persisted in 2 bits.
//!
//! ## Packed layout
//!
//! ```text
//! index = x * 96 + y * 16 + z      (X-major, then Y, then Z)
//! byte  = index / 4
//! shift = (index % 4) * 2          (low bits first)
//! ```
//!
//! 1536 cells → 384 bytes.

use hearth_shared::{Cuboidf, VoxelPos};
use tracing::warn;

/// Cells along X.
pub const WIDTH: usize = 16;
/// Cells along Y.
pub const HEIGHT: usize = 6;
/// Cells along Z.
pub const DEPTH: usize = 16;
/// Total cells.
pub const VOLUME: usize = WIDTH * HEIGHT * DEPTH;
/// Size of the packed form in bytes.
pub const PACKED_LEN: usize = VOLUME / 4;

/// Height of the anvil work surface in sixteenths of a block.
pub const WORK_SURFACE_HEIGHT: f32 = 10.0;

/// State of one work item cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum VoxelMaterial {
    /// Nothing here.
    #[default]
    Empty = 0,
    /// Workable metal.
    Metal = 1,
    /// Impurity, removed by splitting.
    Slag = 2,
    /// Reserved state. Stored and restored, otherwise inert.
    Placeholder1 = 3,
}

impl VoxelMaterial {
    /// Decodes the low two bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Empty,
            1 => Self::Metal,
            2 => Self::Slag,
            _ => Self::Placeholder1,
        }
    }

    /// Two-bit code.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Dense work item grid.
#[derive(Clone, PartialEq, Eq)]
pub struct AnvilGrid {
    cells: Box<[VoxelMaterial; VOLUME]>,
}

#[inline]
const fn index(x: usize, y: usize, z: usize) -> usize {
    x * HEIGHT * DEPTH + y * DEPTH + z
}

impl AnvilGrid {
    /// Creates an all-empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: Box::new([VoxelMaterial::Empty; VOLUME]),
        }
    }

    /// A fresh ingot: a 7×2×3 metal bar in the middle of the surface.
    #[must_use]
    pub fn from_ingot() -> Self {
        let mut grid = Self::new();
        for x in 4..11 {
            for y in 0..2 {
                for z in 6..9 {
                    grid.cells[index(x, y, z)] = VoxelMaterial::Metal;
                }
            }
        }
        grid
    }

    /// Stacks another ingot onto the work item.
    ///
    /// Each column of the ingot footprint receives two metal cells in its
    /// lowest free layers. Returns the number of cells placed, which is less
    /// than 42 when the footprint is nearly full.
    pub fn add_ingot(&mut self) -> usize {
        let mut placed = 0;
        for x in 4..11 {
            for z in 6..9 {
                for _ in 0..2 {
                    if let Some(y) = (0..HEIGHT).find(|&y| self.cells[index(x, y, z)] == VoxelMaterial::Empty) {
                        self.cells[index(x, y, z)] = VoxelMaterial::Metal;
                        placed += 1;
                    }
                }
            }
        }
        placed
    }

    /// Returns true if `pos` addresses a cell.
    #[inline]
    #[must_use]
    pub const fn contains(pos: VoxelPos) -> bool {
        pos.in_bounds(WIDTH as i32, HEIGHT as i32, DEPTH as i32)
    }

    /// Cell at `pos`, or `None` when out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, pos: VoxelPos) -> Option<VoxelMaterial> {
        Self::contains(pos).then(|| self.cells[index(pos.x as usize, pos.y as usize, pos.z as usize)])
    }

    /// Writes a cell. Out-of-range positions are ignored.
    #[inline]
    pub fn set(&mut self, pos: VoxelPos, material: VoxelMaterial) {
        if Self::contains(pos) {
            self.cells[index(pos.x as usize, pos.y as usize, pos.z as usize)] = material;
        }
    }

    /// Cell by raw coordinates. Panics when out of range.
    #[inline]
    #[must_use]
    pub fn at(&self, x: usize, y: usize, z: usize) -> VoxelMaterial {
        self.cells[index(x, y, z)]
    }

    /// Number of cells in a given state.
    #[must_use]
    pub fn count(&self, material: VoxelMaterial) -> usize {
        self.cells.iter().filter(|&&c| c == material).count()
    }

    /// Returns true if every cell is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == VoxelMaterial::Empty)
    }

    /// Packs the grid into its 384-byte form.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut data = vec![0u8; PACKED_LEN];
        for (i, cell) in self.cells.iter().enumerate() {
            data[i / 4] |= cell.bits() << ((i % 4) * 2);
        }
        data
    }

    /// Unpacks a grid.
    ///
    /// A buffer shorter than 384 bytes yields an empty grid. Extra trailing
    /// bytes are ignored.
    #[must_use]
    pub fn deserialize(data: &[u8]) -> Self {
        let mut grid = Self::new();
        if data.len() < PACKED_LEN {
            warn!(len = data.len(), expected = PACKED_LEN, "short anvil voxel buffer, resetting work item");
            return grid;
        }
        for (i, cell) in grid.cells.iter_mut().enumerate() {
            *cell = VoxelMaterial::from_bits(data[i / 4] >> ((i % 4) * 2));
        }
        grid
    }

    /// Rotates the grid a quarter turn about Y.
    ///
    /// Clockwise takes `new[x][y][z]` from `old[15 - z][y][x]`; counter-clockwise
    /// from `old[z][y][15 - x]`.
    #[must_use]
    pub fn rotated(&self, counter_clockwise: bool) -> Self {
        let mut out = Self::new();
        for x in 0..WIDTH {
            for y in 0..HEIGHT {
                for z in 0..DEPTH {
                    out.cells[index(z, y, x)] = if counter_clockwise {
                        self.cells[index(x, y, DEPTH - 1 - z)]
                    } else {
                        self.cells[index(WIDTH - 1 - x, y, z)]
                    };
                }
            }
        }
        out
    }

    /// One selection box per non-empty cell, in block units, raised onto
    /// the work surface.
    #[must_use]
    pub fn selection_boxes(&self) -> Vec<(VoxelPos, Cuboidf)> {
        let mut boxes = Vec::new();
        for x in 0..WIDTH {
            for y in 0..HEIGHT {
                for z in 0..DEPTH {
                    if self.at(x, y, z) == VoxelMaterial::Empty {
                        continue;
                    }
                    let (fx, fy, fz) = (x as f32, y as f32 + WORK_SURFACE_HEIGHT, z as f32);
                    boxes.push((
                        VoxelPos::new(x as i32, y as i32, z as i32),
                        Cuboidf::new(fx / 16.0, fy / 16.0, fz / 16.0, (fx + 1.0) / 16.0, (fy + 1.0) / 16.0, (fz + 1.0) / 16.0),
                    ));
                }
            }
        }
        boxes
    }
}

impl Default for AnvilGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnvilGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnvilGrid")
            .field("metal", &self.count(VoxelMaterial::Metal))
            .field("slag", &self.count(VoxelMaterial::Slag))
            .finish()
    }
}
