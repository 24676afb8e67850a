//! Persisted micro-block state.
//!
//! Only the packed cuboid list and the palette are authoritative. Snow
//! cuboids are stored for hosts that render without loading the block, but
//! are recomputed on restore.

use serde::{Deserialize, Serialize};

use crate::cuboid::PackedCuboid;
use crate::error::MicroBlockResult;
use crate::microblock::MicroBlock;
use crate::palette::MaterialPalette;

/// Serializable form of a [`MicroBlock`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MicroBlockState {
    /// Packed solid cuboids.
    pub cuboids: Vec<u32>,
    /// Block codes by material index.
    pub materials: Vec<String>,
    /// Packed snow cuboids.
    #[serde(default)]
    pub snow_cuboids: Vec<u32>,
    /// Packed ground snow cuboids.
    #[serde(default)]
    pub ground_snow_cuboids: Vec<u32>,
    /// Snow cover.
    #[serde(default)]
    pub snow_level: f32,
}

impl MicroBlockState {
    /// Captures a block.
    #[must_use]
    pub fn from_block(block: &MicroBlock) -> Self {
        let snow = block.snow_cuboids();
        Self {
            cuboids: bytemuck::cast_slice(block.cuboids()).to_vec(),
            materials: block.palette().codes().to_vec(),
            snow_cuboids: bytemuck::cast_slice(&snow.snow).to_vec(),
            ground_snow_cuboids: bytemuck::cast_slice(&snow.ground_snow).to_vec(),
            snow_level: block.snow_level(),
        }
    }

    /// Restores the block.
    ///
    /// # Errors
    ///
    /// Returns `PaletteFull` or `UnknownMaterial` if the stored palette and
    /// cuboids disagree.
    pub fn into_block(self) -> MicroBlockResult<MicroBlock> {
        let palette = MaterialPalette::from_codes(self.materials)?;
        let cuboids: Vec<PackedCuboid> = bytemuck::cast_slice(&self.cuboids).to_vec();
        MicroBlock::from_parts(cuboids, palette, self.snow_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::microblock::ChiselSize;
    use hearth_shared::VoxelPos;

    #[test]
    fn test_state_restores_block() {
        let mut block = MicroBlock::from_full_block("rock-granite").unwrap();
        block
            .add_voxels(VoxelPos::new(8, 8, 8), "planks-oak", ChiselSize::Four)
            .unwrap();
        block.chisel(VoxelPos::new(0, 12, 0), ChiselSize::Four).unwrap();
        block.set_snow_level(1.0);

        let state = MicroBlockState::from_block(&block);
        assert_eq!(state.materials, vec!["rock-granite", "planks-oak"]);
        assert!(!state.snow_cuboids.is_empty());

        let restored = state.into_block().unwrap();
        assert_eq!(restored, block);
    }

    #[test]
    fn test_old_state_without_snow_fields() {
        let state = MicroBlockState {
            cuboids: vec![0x00FF_F000],
            materials: vec!["rock-granite".into()],
            ..MicroBlockState::default()
        };
        let block = state.into_block().unwrap();
        assert_eq!(block.size_rel(), 1.0);
    }
}
