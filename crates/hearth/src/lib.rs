//! # HEARTH
//!
//! Chiseled blocks and anvil smithing for a voxel game host.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           hearth                             │
//! │   HearthConfig (TOML)      AttributeTree      Block entities │
//! ├──────────────────────────────┬───────────────────────────────┤
//! │      hearth_microblock       │        hearth_smithing        │
//! │  • packed cuboids            │  • 16x6x16 work item          │
//! │  • greedy rebuild, snow      │  • hit / upset / split        │
//! │  • rotate, palette           │  • recipes, matching          │
//! ├──────────────────────────────┴───────────────────────────────┤
//! │                        hearth_shared                         │
//! │            VoxelPos, BlockFacing, Vec3, Cuboidf              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hearth::{AnvilBlockEntity, HearthConfig};
//!
//! let config = HearthConfig::from_toml_file("hearth.toml")?;
//! let book = Arc::new(config.smithing.recipe_book()?);
//! let anvil = AnvilBlockEntity::new(book, &config.smithing);
//! anvil.place_ingot("ingot-iron")?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod attributes;
pub mod block_entity;
pub mod config;
pub mod error;

// Re-export the cores
pub use hearth_microblock as microblock;
pub use hearth_shared as shared;
pub use hearth_smithing as smithing;

pub use attributes::{AttributeTree, AttributeValue};
pub use block_entity::{AnvilBlockEntity, ChiselBlockEntity, ChiselOutcome};
pub use config::{ChiselConfig, HearthConfig, SmithingConfig};
pub use error::{HearthError, HearthResult};
