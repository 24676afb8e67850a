//! # HEARTH Smithing
//!
//! Anvil work items: a 16x6x16 grid of metal and slag cells shaped by
//! hammer strokes until it matches a recipe.
//!
//! ## Design Principles
//!
//! 1. **Metal is conserved** - hits and upsets only move cells
//! 2. **Ignore, don't fail** - strokes outside the grid are no-ops
//! 3. **Data-driven** - recipes live in TOML, not code
//!
//! ## Example
//!
//! ```rust,ignore
//! use hearth_smithing::{Anvil, RecipeBook, SmithingAction};
//! use hearth_shared::VoxelPos;
//!
//! let book = RecipeBook::from_toml_str(&std::fs::read_to_string("smithing.toml")?)?;
//! let mut anvil = Anvil::new();
//! anvil.place_ingot("ingot-iron")?;
//! anvil.select_recipe(book.require("plate")?.clone())?;
//! if let Some(output) = anvil.apply(SmithingAction::Hit(VoxelPos::new(7, 1, 7)))? {
//!     println!("made {} x{}", output.item, output.quantity);
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod anvil;
pub mod error;
pub mod forging;
pub mod grid;
pub mod recipe;
pub mod shared;
pub mod state;

pub use anvil::{Anvil, SmithingAction, SmithingOutput, WorkItem};
pub use error::{SmithingError, SmithingResult};
pub use forging::DEFAULT_CONE_DEGREES;
pub use grid::{AnvilGrid, VoxelMaterial, DEPTH, HEIGHT, PACKED_LEN, VOLUME, WIDTH};
pub use recipe::{RecipeBook, RecipeDef, SmithingRecipe};
pub use shared::SharedAnvil;
pub use state::AnvilState;
