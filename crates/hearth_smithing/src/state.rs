//! Persisted anvil state.
//!
//! The grid is stored in its packed 384-byte form. The recipe is stored by
//! code and looked up again on load; a recipe that no longer exists is
//! dropped with a warning and the work item kept.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::anvil::{Anvil, WorkItem};
use crate::grid::AnvilGrid;
use crate::recipe::RecipeBook;

/// Serializable form of an [`Anvil`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnvilState {
    /// Material of the work item, `None` for an empty anvil.
    #[serde(default)]
    pub work_item_material: Option<String>,
    /// Packed cells.
    #[serde(default)]
    pub voxels: Vec<u8>,
    /// Work item rotation in degrees.
    #[serde(default)]
    pub rotation: i32,
    /// Selected recipe code.
    #[serde(default)]
    pub selected_recipe: Option<String>,
}

impl AnvilState {
    /// Captures an anvil.
    #[must_use]
    pub fn from_anvil(anvil: &Anvil) -> Self {
        Self {
            work_item_material: anvil.work_item().map(|w| w.material.clone()),
            voxels: anvil.grid().map(AnvilGrid::serialize).unwrap_or_default(),
            rotation: anvil.rotation(),
            selected_recipe: anvil.selected_recipe().map(|r| r.code().to_string()),
        }
    }

    /// Restores the anvil, resolving the recipe against `book`.
    ///
    /// Never fails: a short voxel buffer becomes an empty grid and an
    /// unknown recipe is cleared.
    #[must_use]
    pub fn into_anvil(self, book: &RecipeBook) -> Anvil {
        let work_item = self.work_item_material.map(|material| WorkItem {
            material,
            grid: AnvilGrid::deserialize(&self.voxels),
        });

        let recipe = match self.selected_recipe {
            Some(code) if work_item.is_some() => {
                let found = book.get(&code).cloned();
                if found.is_none() {
                    warn!(recipe = %code, "stored smithing recipe no longer exists");
                }
                found
            }
            _ => None,
        };

        Anvil::from_parts(work_item, recipe, self.rotation)
    }
}
