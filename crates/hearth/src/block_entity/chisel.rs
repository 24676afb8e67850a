//! Chiseled block entity.

use hearth_microblock::{MeshSnapshot, MicroBlock, MicroBlockState, SharedMicroBlock};
use hearth_shared::{Axis, BlockFacing, Cuboidf, VoxelPos};
use tracing::debug;

use crate::attributes::AttributeTree;
use crate::config::ChiselConfig;
use crate::error::HearthResult;

const KEY_CUBOIDS: &str = "cuboids";
const KEY_MATERIALS: &str = "materials";
const KEY_SNOW_CUBOIDS: &str = "snowcuboids";
const KEY_GROUND_SNOW_CUBOIDS: &str = "groundSnowCuboids";
const KEY_SNOW_LEVEL: &str = "snowLevel";

/// What an edit did to the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChiselOutcome {
    /// Nothing changed; no remesh needed.
    Unchanged,
    /// Cuboids changed; remesh.
    Changed,
    /// Last voxel gone; the host should remove the block.
    Removed,
}

/// A chiseled block placed in the world.
#[derive(Debug)]
pub struct ChiselBlockEntity {
    block: SharedMicroBlock,
    config: ChiselConfig,
}

impl ChiselBlockEntity {
    /// Wraps a block.
    #[must_use]
    pub fn new(mut block: MicroBlock, config: ChiselConfig) -> Self {
        if !config.snow {
            block.set_snow_level(0.0);
        }
        Self {
            block: SharedMicroBlock::new(block),
            config,
        }
    }

    /// Converts a full block into a chiselable one.
    ///
    /// # Errors
    ///
    /// Propagates palette errors.
    pub fn from_full_block(material_code: &str, config: ChiselConfig) -> HearthResult<Self> {
        Ok(Self::new(MicroBlock::from_full_block(material_code)?, config))
    }

    /// Removes voxels with a brush of `size` voxels.
    ///
    /// # Errors
    ///
    /// Returns `ChiselSizeNotAllowed` for disabled sizes.
    pub fn chisel(&self, pos: VoxelPos, size: u8) -> HearthResult<ChiselOutcome> {
        let size = self.config.size(size)?;
        self.block.edit(|b| -> HearthResult<ChiselOutcome> {
            let changed = b.chisel(pos, size)?;
            Ok(outcome(b, changed))
        })
    }

    /// Adds voxels of a block code with a brush of `size` voxels.
    ///
    /// # Errors
    ///
    /// Returns `ChiselSizeNotAllowed` for disabled sizes and
    /// `MicroBlock(PaletteFull)` once sixteen materials are in use.
    pub fn add_voxels(&self, pos: VoxelPos, material_code: &str, size: u8) -> HearthResult<ChiselOutcome> {
        let size = self.config.size(size)?;
        self.block.edit(|b| -> HearthResult<ChiselOutcome> {
            let changed = b.add_voxels(pos, material_code, size)?;
            Ok(outcome(b, changed))
        })
    }

    /// Rotates the placed block, e.g. when the host places a schematic.
    ///
    /// # Errors
    ///
    /// Returns `MicroBlock(InvalidRotation)` for non-quarter turns.
    pub fn rotate(&self, degrees: i32, flip_axis: Option<Axis>) -> HearthResult<()> {
        self.block.edit(|b| b.rotate(degrees, flip_axis))?;
        Ok(())
    }

    /// Updates snow cover. Ignored when snow is disabled.
    pub fn set_snow_level(&self, level: f32) {
        if !self.config.snow {
            debug!(level, "snow disabled, ignoring snow level");
            return;
        }
        self.block.edit(|b| b.set_snow_level(level));
    }

    /// Copy of the mesh inputs.
    #[must_use]
    pub fn mesh_snapshot(&self) -> MeshSnapshot {
        self.block.snapshot()
    }

    /// Selection boxes in block units.
    #[must_use]
    pub fn selection_boxes(&self) -> Vec<Cuboidf> {
        self.block.read(MicroBlock::selection_boxes)
    }

    /// Whether a neighbour may attach to `face`.
    #[must_use]
    pub fn can_attach_at(&self, face: BlockFacing) -> bool {
        self.block.read(|b| b.can_attach_at(face))
    }

    /// Fraction of the block still filled.
    #[must_use]
    pub fn size_rel(&self) -> f32 {
        self.block.read(MicroBlock::size_rel)
    }

    /// Writes the block into `tree`.
    pub fn to_tree_attributes(&self, tree: &mut AttributeTree) {
        let state = self.block.read(MicroBlockState::from_block);
        tree.set(KEY_CUBOIDS, to_ints(&state.cuboids));
        tree.set(KEY_MATERIALS, state.materials);
        // Snow cuboids are written for hosts that render without loading the block.
        tree.set(KEY_SNOW_CUBOIDS, to_ints(&state.snow_cuboids));
        tree.set(KEY_GROUND_SNOW_CUBOIDS, to_ints(&state.ground_snow_cuboids));
        tree.set(KEY_SNOW_LEVEL, state.snow_level);
    }

    /// Restores a block from `tree`.
    ///
    /// Snow cuboids are rebuilt from the voxels, so only `snowLevel` is read.
    ///
    /// # Errors
    ///
    /// Returns `Attribute` if cuboids or materials are missing, and
    /// `MicroBlock` errors if they disagree.
    pub fn from_tree_attributes(tree: &AttributeTree, config: ChiselConfig) -> HearthResult<Self> {
        let state = MicroBlockState {
            cuboids: from_ints(tree.require_int_array(KEY_CUBOIDS)?),
            materials: tree.require_string_array(KEY_MATERIALS)?.to_vec(),
            snow_level: tree.get_float(KEY_SNOW_LEVEL).unwrap_or_default(),
            ..MicroBlockState::default()
        };
        Ok(Self::new(state.into_block()?, config))
    }

    /// Unwraps the block.
    #[must_use]
    pub fn into_block(self) -> MicroBlock {
        self.block.into_inner()
    }
}

fn outcome(block: &MicroBlock, changed: bool) -> ChiselOutcome {
    match (changed, block.is_empty()) {
        (false, _) => ChiselOutcome::Unchanged,
        (true, true) => ChiselOutcome::Removed,
        (true, false) => ChiselOutcome::Changed,
    }
}

fn to_ints(packed: &[u32]) -> Vec<i32> {
    packed.iter().map(|&c| c as i32).collect()
}

fn from_ints(stored: &[i32]) -> Vec<u32> {
    stored.iter().map(|&c| c as u32).collect()
}
