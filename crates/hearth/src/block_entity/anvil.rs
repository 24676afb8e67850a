//! Anvil block entity.
//!
//! Holds the work item and resolves recipe codes against a shared
//! [`RecipeBook`]. Persisted keys:
//!
//! | key              | type   |
//! |------------------|--------|
//! | `workItem`       | string |
//! | `voxels`         | bytes  |
//! | `rotation`       | int    |
//! | `selectedRecipe` | string |

use std::sync::Arc;

use hearth_shared::{Cuboidf, VoxelPos};
use hearth_smithing::{
    Anvil, AnvilGrid, AnvilState, RecipeBook, SharedAnvil, SmithingAction, SmithingOutput,
    SmithingRecipe, WorkItem,
};
use tracing::info;

use crate::attributes::AttributeTree;
use crate::config::SmithingConfig;
use crate::error::HearthResult;

const KEY_WORK_ITEM: &str = "workItem";
const KEY_VOXELS: &str = "voxels";
const KEY_ROTATION: &str = "rotation";
const KEY_SELECTED_RECIPE: &str = "selectedRecipe";

/// An anvil placed in the world.
#[derive(Debug)]
pub struct AnvilBlockEntity {
    anvil: SharedAnvil,
    book: Arc<RecipeBook>,
}

impl AnvilBlockEntity {
    /// Creates an empty anvil.
    #[must_use]
    pub fn new(book: Arc<RecipeBook>, config: &SmithingConfig) -> Self {
        Self::with_anvil(Anvil::new(), book, config)
    }

    fn with_anvil(anvil: Anvil, book: Arc<RecipeBook>, config: &SmithingConfig) -> Self {
        Self {
            anvil: SharedAnvil::new(anvil.with_cone_degrees(config.upset_cone_degrees)),
            book,
        }
    }

    /// Puts an ingot on the anvil. Returns the number of metal cells added.
    ///
    /// # Errors
    ///
    /// Returns `Smithing(IngredientMismatch)` for a different material.
    pub fn place_ingot(&self, material: &str) -> HearthResult<usize> {
        Ok(self.anvil.edit(|a| a.place_ingot(material))?)
    }

    /// Recipes that fit the current work item, sorted by code.
    #[must_use]
    pub fn available_recipes(&self) -> Vec<String> {
        let Some(material) = self.anvil.read(|a| a.work_item().map(|w| w.material.clone())) else {
            return Vec::new();
        };
        let mut codes: Vec<String> = self
            .book
            .for_ingredient(&material)
            .into_iter()
            .map(|r| r.code().to_string())
            .collect();
        codes.sort();
        codes
    }

    /// Selects a recipe by code.
    ///
    /// # Errors
    ///
    /// Returns `Smithing(RecipeNotFound)` for unknown codes and the anvil's
    /// own errors otherwise.
    pub fn select_recipe(&self, code: &str) -> HearthResult<()> {
        let recipe = self.book.require(code)?.clone();
        self.anvil.edit(|a| a.select_recipe(recipe))?;
        Ok(())
    }

    /// Currently selected recipe.
    #[must_use]
    pub fn selected_recipe(&self) -> Option<SmithingRecipe> {
        self.anvil.read(|a| a.selected_recipe().cloned())
    }

    /// Applies a hammer stroke. Returns the finished piece if the stroke
    /// completed the recipe.
    ///
    /// # Errors
    ///
    /// Returns `Smithing(NoWorkItem)` on an empty anvil.
    pub fn strike(&self, action: SmithingAction) -> HearthResult<Option<SmithingOutput>> {
        let output = self.anvil.edit(|a| a.apply(action))?;
        if let Some(done) = &output {
            info!(item = %done.item, quantity = done.quantity, "anvil produced item");
        }
        Ok(output)
    }

    /// Turns the work item a quarter turn.
    pub fn rotate_work_item(&self, counter_clockwise: bool) {
        self.anvil.edit(|a| a.rotate_work_item(counter_clockwise));
    }

    /// Whether the work item already has the recipe's shape.
    #[must_use]
    pub fn matches_recipe(&self) -> bool {
        self.anvil.read(Anvil::matches_recipe)
    }

    /// Lifts the work item off the anvil.
    pub fn take_work_item(&self) -> Option<WorkItem> {
        self.anvil.edit(Anvil::take_work_item)
    }

    /// Copy of the work item grid for meshing.
    #[must_use]
    pub fn grid_snapshot(&self) -> Option<AnvilGrid> {
        self.anvil.grid_snapshot()
    }

    /// One selection box per filled cell, tagged with its cell position.
    #[must_use]
    pub fn selection_boxes(&self) -> Vec<(VoxelPos, Cuboidf)> {
        self.grid_snapshot()
            .map(|g| g.selection_boxes())
            .unwrap_or_default()
    }

    /// Writes the anvil into `tree`. Keys of an empty anvil are removed.
    pub fn to_tree_attributes(&self, tree: &mut AttributeTree) {
        let state = self.anvil.read(AnvilState::from_anvil);
        match state.work_item_material {
            Some(material) => {
                tree.set(KEY_WORK_ITEM, material);
                tree.set(KEY_VOXELS, state.voxels);
            }
            None => {
                tree.remove(KEY_WORK_ITEM);
                tree.remove(KEY_VOXELS);
            }
        }
        tree.set(KEY_ROTATION, state.rotation);
        match state.selected_recipe {
            Some(code) => tree.set(KEY_SELECTED_RECIPE, code),
            None => {
                tree.remove(KEY_SELECTED_RECIPE);
            }
        }
    }

    /// Restores an anvil from `tree`. Missing keys mean an empty anvil;
    /// corrupt voxels and unknown recipes are dropped.
    #[must_use]
    pub fn from_tree_attributes(tree: &AttributeTree, book: Arc<RecipeBook>, config: &SmithingConfig) -> Self {
        let state = AnvilState {
            work_item_material: tree.get_string(KEY_WORK_ITEM).map(str::to_string),
            voxels: tree.get_bytes(KEY_VOXELS).unwrap_or_default().to_vec(),
            rotation: tree.get_int(KEY_ROTATION).unwrap_or_default(),
            selected_recipe: tree.get_string(KEY_SELECTED_RECIPE).map(str::to_string),
        };
        let anvil = state.into_anvil(&book);
        Self::with_anvil(anvil, book, config)
    }
}
