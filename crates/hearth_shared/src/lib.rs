//! # HEARTH Shared
//!
//! Common types used by the micro-block and smithing cores.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on a host engine, renderer or tesselator.
//! Both voxel cores are pure data transforms over these types.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod facing;
pub mod math;

pub use facing::{Axis, BlockFacing, VoxelPos};
pub use math::{Cuboidf, Vec3};
