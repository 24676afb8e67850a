//! The chiseled block aggregate.
//!
//! Holds the packed cuboid list (source of truth), the material palette and
//! everything derived from the last rebuild. Every edit expands the list
//! into a [`VoxelGrid`], mutates it, and rebuilds the list from scratch.

use hearth_shared::{Axis, BlockFacing, Cuboidf, VoxelPos};
use tracing::debug;

use crate::cuboid::{CuboidWithMaterial, PackedCuboid, GRID_SIZE};
use crate::error::{MicroBlockError, MicroBlockResult};
use crate::grid::VoxelGrid;
use crate::palette::MaterialPalette;
use crate::rebuild::{build_snow_cuboids, rebuild_cuboid_list, CuboidSet, SnowCuboids};
use crate::transform::rotate_cuboids;

/// Chisel brush edge lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ChiselSize {
    /// Single voxel.
    One,
    /// 2x2x2 voxels.
    Two,
    /// 4x4x4 voxels.
    Four,
    /// 8x8x8 voxels.
    Eight,
}

impl ChiselSize {
    /// All sizes, smallest first.
    pub const ALL: [Self; 4] = [Self::One, Self::Two, Self::Four, Self::Eight];

    /// Edge length in voxels.
    #[must_use]
    pub const fn voxels(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    /// Parses an edge length.
    #[must_use]
    pub const fn from_voxels(size: u8) -> Option<Self> {
        match size {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            _ => None,
        }
    }

    /// Snaps a voxel position down onto this brush's grid.
    #[must_use]
    pub fn snap(self, pos: VoxelPos) -> VoxelPos {
        let size = i32::from(self.voxels());
        VoxelPos::new(
            pos.x - pos.x.rem_euclid(size),
            pos.y - pos.y.rem_euclid(size),
            pos.z - pos.z.rem_euclid(size),
        )
    }
}

/// Cells of `start..start + size` that fall inside the grid.
fn clip_span(start: i32, size: u8) -> Option<std::ops::Range<usize>> {
    let edge = GRID_SIZE as i64;
    let lo = i64::from(start).clamp(0, edge);
    let hi = (i64::from(start) + i64::from(size)).clamp(0, edge);
    (lo < hi).then(|| lo as usize..hi as usize)
}

/// A chiseled block.
#[derive(Debug, Clone, PartialEq)]
pub struct MicroBlock {
    cuboids: Vec<PackedCuboid>,
    palette: MaterialPalette,
    side_solid: [bool; 6],
    emit_side_ao: u8,
    size_rel: f32,
    snow_level: f32,
    snow: SnowCuboids,
}

impl MicroBlock {
    /// Creates a block with no voxels and no materials.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cuboids: Vec::new(),
            palette: MaterialPalette::new(),
            side_solid: [false; 6],
            emit_side_ao: 0,
            size_rel: 0.0,
            snow_level: 0.0,
            snow: SnowCuboids::default(),
        }
    }

    /// Converts a regular full block into a chiseled one.
    ///
    /// # Errors
    ///
    /// Never fails for a fresh palette; kept fallible for palette rules.
    pub fn from_full_block(material_code: &str) -> MicroBlockResult<Self> {
        let mut block = Self::new();
        let material = block.palette.add_material(material_code)?;
        let grid = VoxelGrid::filled(material);
        block.apply(rebuild_cuboid_list(&grid)?, &grid);
        Ok(block)
    }

    /// Restores a block from persisted parts, recomputing derived metrics.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMaterial` if a cuboid points past the palette.
    pub fn from_parts(
        cuboids: Vec<PackedCuboid>,
        palette: MaterialPalette,
        snow_level: f32,
    ) -> MicroBlockResult<Self> {
        for packed in &cuboids {
            palette.check(packed.unpack().material)?;
        }
        let grid = VoxelGrid::from_cuboids(&cuboids);
        let mut block = Self {
            palette,
            snow_level,
            ..Self::new()
        };
        block.apply(rebuild_cuboid_list(&grid)?, &grid);
        Ok(block)
    }

    fn apply(&mut self, set: CuboidSet, grid: &VoxelGrid) {
        self.cuboids = set.cuboids;
        self.side_solid = set.side_solid;
        self.emit_side_ao = set.emit_side_ao;
        self.size_rel = set.size_rel;
        self.refresh_snow(grid);
    }

    fn refresh_snow(&mut self, grid: &VoxelGrid) {
        self.snow = if self.snow_level > 0.0 {
            build_snow_cuboids(grid)
        } else {
            SnowCuboids::default()
        };
    }

    /// The persisted cuboid list.
    #[must_use]
    pub fn cuboids(&self) -> &[PackedCuboid] {
        &self.cuboids
    }

    /// The material palette.
    #[must_use]
    pub fn palette(&self) -> &MaterialPalette {
        &self.palette
    }

    /// Adds a block code to the palette, returning its index.
    ///
    /// # Errors
    ///
    /// Returns `PaletteFull` if all sixteen slots are used.
    pub fn add_material(&mut self, code: &str) -> MicroBlockResult<u8> {
        self.palette.add_material(code)
    }

    /// Expands the cuboid list into a fresh dense grid.
    #[must_use]
    pub fn voxel_grid(&self) -> VoxelGrid {
        VoxelGrid::from_cuboids(&self.cuboids)
    }

    /// Sets or clears a `size`-edged cube of voxels starting at `origin`.
    ///
    /// Cells outside the grid are skipped. Returns `Ok(false)` without
    /// rebuilding if no cell changed.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMaterial` when filling with a material the palette
    /// does not have.
    pub fn set_voxel(
        &mut self,
        origin: VoxelPos,
        state: bool,
        material: u8,
        size: u8,
    ) -> MicroBlockResult<bool> {
        if state {
            self.palette.check(material)?;
        }

        let (Some(xs), Some(ys), Some(zs)) = (
            clip_span(origin.x, size),
            clip_span(origin.y, size),
            clip_span(origin.z, size),
        ) else {
            return Ok(false);
        };

        let mut grid = self.voxel_grid();
        let mut changed = false;
        for x in xs {
            for y in ys.clone() {
                for z in zs.clone() {
                    changed |= grid.set(x, y, z, state, material);
                }
            }
        }

        if !changed {
            return Ok(false);
        }

        self.apply(rebuild_cuboid_list(&grid)?, &grid);
        Ok(true)
    }

    /// Removes a brush-sized cube at the snapped position.
    ///
    /// # Errors
    ///
    /// Propagates rebuild errors.
    pub fn chisel(&mut self, pos: VoxelPos, size: ChiselSize) -> MicroBlockResult<bool> {
        self.set_voxel(size.snap(pos), false, 0, size.voxels())
    }

    /// Fills a brush-sized cube at the snapped position with a block code.
    ///
    /// # Errors
    ///
    /// Returns `PaletteFull` if the code is new and the palette is full.
    pub fn add_voxels(
        &mut self,
        pos: VoxelPos,
        material_code: &str,
        size: ChiselSize,
    ) -> MicroBlockResult<bool> {
        let material = self.palette.add_material(material_code)?;
        self.set_voxel(size.snap(pos), true, material, size.voxels())
    }

    /// Rotates the block about the vertical axis, optionally mirroring one
    /// axis first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRotation` unless `degrees` is a multiple of 90.
    pub fn rotate(&mut self, degrees: i32, flip_axis: Option<Axis>) -> MicroBlockResult<()> {
        let rotated = rotate_cuboids(&self.cuboids, degrees, flip_axis)?;
        // Face metrics are not symmetric under the transform; recompute them.
        let grid = VoxelGrid::from_cuboids(&rotated);
        self.apply(rebuild_cuboid_list(&grid)?, &grid);
        Ok(())
    }

    /// Selection and collision boxes in block units, one per cuboid.
    #[must_use]
    pub fn selection_boxes(&self) -> Vec<Cuboidf> {
        self.cuboids.iter().map(|c| c.unpack().to_cuboidf()).collect()
    }

    /// Filled voxels per palette index.
    #[must_use]
    pub fn material_voxel_counts(&self) -> Vec<u32> {
        let mut counts = vec![0u32; self.palette.len()];
        for packed in &self.cuboids {
            let cub: CuboidWithMaterial = packed.unpack();
            if let Some(slot) = counts.get_mut(usize::from(cub.material)) {
                *slot += cub.volume();
            }
        }
        counts
    }

    /// Returns true if another block may attach to the given face.
    #[must_use]
    pub fn can_attach_at(&self, face: BlockFacing) -> bool {
        self.side_solid[face.index()]
    }

    /// Per-face solidity.
    #[must_use]
    pub fn side_solid(&self) -> [bool; 6] {
        self.side_solid
    }

    /// Side AO bitmask.
    #[must_use]
    pub fn emit_side_ao(&self) -> u8 {
        self.emit_side_ao
    }

    /// Filled fraction of the block.
    #[must_use]
    pub fn size_rel(&self) -> f32 {
        self.size_rel
    }

    /// Returns true if the host should remove the block.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cuboids.is_empty()
    }

    /// Current snow cover, `0.0` for none.
    #[must_use]
    pub fn snow_level(&self) -> f32 {
        self.snow_level
    }

    /// Updates snow cover, rebuilding snow cuboids when it appears or goes.
    pub fn set_snow_level(&mut self, level: f32) {
        let had_snow = self.snow_level > 0.0;
        self.snow_level = level.max(0.0);
        if had_snow != (self.snow_level > 0.0) {
            let grid = self.voxel_grid();
            self.refresh_snow(&grid);
            debug!(level = self.snow_level, "micro-block snow cover changed");
        }
    }

    /// Snow cuboids for the current cover.
    #[must_use]
    pub fn snow_cuboids(&self) -> &SnowCuboids {
        &self.snow
    }

    /// Replaces the whole palette. Cuboids keep their indices.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMaterial` if the new palette is too short for the
    /// existing cuboids.
    pub fn set_palette(&mut self, palette: MaterialPalette) -> MicroBlockResult<()> {
        if let Some(bad) = self
            .cuboids
            .iter()
            .map(|c| c.unpack().material)
            .find(|&m| palette.check(m).is_err())
        {
            return Err(MicroBlockError::UnknownMaterial {
                index: bad,
                len: palette.len(),
            });
        }
        self.palette = palette;
        Ok(())
    }
}

impl Default for MicroBlock {
    fn default() -> Self {
        Self::new()
    }
}
