//! # HEARTH Micro-block Core
//!
//! Chiseled blocks: a 16x16x16 voxel volume stored as a sparse list of
//! packed, axis-aligned, single-material cuboids.
//!
//! ## Design Principles
//!
//! 1. **Packed list is the truth** - the dense grid only exists during edits
//! 2. **Rebuild, never patch** - every edit regenerates the list greedily
//! 3. **Bit-exact persistence** - one `u32` per cuboid, 4/4/4/4/4/4/8 bits
//!
//! ## Example
//!
//! ```rust,ignore
//! use hearth_microblock::{ChiselSize, MicroBlock};
//! use hearth_shared::VoxelPos;
//!
//! let mut block = MicroBlock::from_full_block("rock-granite")?;
//! block.chisel(VoxelPos::new(0, 12, 0), ChiselSize::Four)?;
//! let boxes = block.selection_boxes();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cuboid;
pub mod error;
pub mod grid;
pub mod microblock;
pub mod palette;
pub mod rebuild;
pub mod shared;
pub mod state;
pub mod transform;

pub use cuboid::{from_uint, to_cuboid, CuboidWithMaterial, PackedCuboid, GRID_SIZE, MAX_MATERIALS};
pub use error::{MicroBlockError, MicroBlockResult};
pub use grid::{VoxelGrid, GRID_VOLUME};
pub use microblock::{ChiselSize, MicroBlock};
pub use palette::MaterialPalette;
pub use rebuild::{build_snow_cuboids, rebuild_cuboid_list, CuboidSet, SnowCuboids, EMIT_SIDE_AO_ALL};
pub use shared::{MeshSnapshot, SharedMicroBlock};
pub use state::MicroBlockState;
pub use transform::rotate_cuboids;
