//! # Anvil
//!
//! Ties a work item, the selected recipe and the work item's rotation
//! together. Every action is followed by a completion check; a finished
//! piece leaves the anvil as a [`SmithingOutput`].
//!
//! ## Flow
//!
//! ```text
//! place_ingot ─▶ select_recipe ─▶ apply(Hit | Upset | Split)* ─▶ SmithingOutput
//!                                   ▲           │
//!                                   └─ rotate ──┘
//! ```

use hearth_shared::{BlockFacing, VoxelPos};
use tracing::{debug, info};

use crate::error::{SmithingError, SmithingResult};
use crate::forging::DEFAULT_CONE_DEGREES;
use crate::grid::{AnvilGrid, VoxelMaterial, DEPTH, HEIGHT, WIDTH};
use crate::recipe::SmithingRecipe;

/// One hammer stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmithingAction {
    /// Strike from above.
    Hit(VoxelPos),
    /// Strike from the side, pushing metal towards a face.
    Upset {
        /// Struck cell.
        pos: VoxelPos,
        /// Push direction.
        towards: BlockFacing,
    },
    /// Chisel a cell away.
    Split(VoxelPos),
}

/// A finished piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmithingOutput {
    /// Recipe that was completed.
    pub recipe: String,
    /// Item produced.
    pub item: String,
    /// Stack size.
    pub quantity: u32,
}

/// The piece currently on the anvil.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Material code of the ingots it was made from.
    pub material: String,
    /// Cell grid.
    pub grid: AnvilGrid,
}

/// Anvil state.
#[derive(Debug, Clone, PartialEq)]
pub struct Anvil {
    work_item: Option<WorkItem>,
    recipe: Option<SmithingRecipe>,
    /// Degrees in `0..360`, multiple of 90.
    rotation: i32,
    cone_degrees: f32,
}

impl Default for Anvil {
    fn default() -> Self {
        Self {
            work_item: None,
            recipe: None,
            rotation: 0,
            cone_degrees: DEFAULT_CONE_DEGREES,
        }
    }
}

impl Anvil {
    /// Creates an empty anvil.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the upset cone half-angle.
    #[must_use]
    pub const fn with_cone_degrees(mut self, degrees: f32) -> Self {
        self.cone_degrees = degrees;
        self
    }

    /// Reassembles an anvil from stored parts.
    #[must_use]
    pub fn from_parts(work_item: Option<WorkItem>, recipe: Option<SmithingRecipe>, rotation: i32) -> Self {
        Self {
            work_item,
            recipe,
            rotation: rotation.rem_euclid(360) / 90 * 90,
            ..Self::default()
        }
    }

    /// Puts an ingot on the anvil, or stacks it onto the current work item.
    ///
    /// Returns the number of metal cells added.
    ///
    /// # Errors
    ///
    /// Returns `IngredientMismatch` if the work item is another material.
    pub fn place_ingot(&mut self, material: &str) -> SmithingResult<usize> {
        match &mut self.work_item {
            None => {
                let grid = AnvilGrid::from_ingot();
                let added = grid.count(VoxelMaterial::Metal);
                self.work_item = Some(WorkItem {
                    material: material.to_string(),
                    grid,
                });
                self.rotation = 0;
                Ok(added)
            }
            Some(item) if item.material == material => Ok(item.grid.add_ingot()),
            Some(item) => Err(SmithingError::IngredientMismatch {
                work_item: item.material.clone(),
                given: material.to_string(),
            }),
        }
    }

    /// Selects the recipe to work towards.
    ///
    /// # Errors
    ///
    /// Returns `NoWorkItem` on an empty anvil and `IngredientMismatch` if
    /// the recipe wants another material.
    pub fn select_recipe(&mut self, recipe: SmithingRecipe) -> SmithingResult<()> {
        let item = self.work_item.as_ref().ok_or(SmithingError::NoWorkItem)?;
        if item.material != recipe.ingredient() {
            return Err(SmithingError::IngredientMismatch {
                work_item: item.material.clone(),
                given: recipe.ingredient().to_string(),
            });
        }
        debug!(recipe = recipe.code(), "selected smithing recipe");
        self.recipe = Some(recipe);
        Ok(())
    }

    /// Current work item.
    #[must_use]
    pub const fn work_item(&self) -> Option<&WorkItem> {
        self.work_item.as_ref()
    }

    /// Current work item grid.
    #[must_use]
    pub fn grid(&self) -> Option<&AnvilGrid> {
        self.work_item.as_ref().map(|w| &w.grid)
    }

    /// Selected recipe.
    #[must_use]
    pub const fn selected_recipe(&self) -> Option<&SmithingRecipe> {
        self.recipe.as_ref()
    }

    /// Work item rotation in degrees.
    #[must_use]
    pub const fn rotation(&self) -> i32 {
        self.rotation
    }

    /// Upset cone half-angle in degrees.
    #[must_use]
    pub const fn cone_degrees(&self) -> f32 {
        self.cone_degrees
    }

    /// Lifts the work item off the anvil.
    pub fn take_work_item(&mut self) -> Option<WorkItem> {
        self.recipe = None;
        self.rotation = 0;
        self.work_item.take()
    }

    /// Turns the work item a quarter turn.
    ///
    /// The grid is permuted and the rotation advanced together, so the
    /// recipe pattern is compared in the same frame afterwards.
    pub fn rotate_work_item(&mut self, counter_clockwise: bool) {
        let Some(item) = &mut self.work_item else {
            return;
        };
        item.grid = item.grid.rotated(counter_clockwise);
        let step = if counter_clockwise { -90 } else { 90 };
        self.rotation = (self.rotation + step).rem_euclid(360);
    }

    /// Returns true if the work item is exactly the selected recipe's shape.
    ///
    /// Slag anywhere, missing metal or surplus metal all fail.
    #[must_use]
    pub fn matches_recipe(&self) -> bool {
        let (Some(item), Some(recipe)) = (&self.work_item, &self.recipe) else {
            return false;
        };
        let pattern = recipe.pattern_at(self.rotation);
        let layers = recipe.quantity_layers().min(HEIGHT);

        for x in 0..WIDTH {
            for y in 0..HEIGHT {
                for z in 0..DEPTH {
                    let expected = if y < layers && pattern.at(x, y, z) == VoxelMaterial::Metal {
                        VoxelMaterial::Metal
                    } else {
                        VoxelMaterial::Empty
                    };
                    if item.grid.at(x, y, z) != expected {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Applies a stroke, then checks for completion.
    ///
    /// # Errors
    ///
    /// Returns `NoWorkItem` on an empty anvil.
    pub fn apply(&mut self, action: SmithingAction) -> SmithingResult<Option<SmithingOutput>> {
        let cone = self.cone_degrees;
        let item = self.work_item.as_mut().ok_or(SmithingError::NoWorkItem)?;

        match action {
            SmithingAction::Hit(pos) => item.grid.on_hit(pos),
            SmithingAction::Upset { pos, towards } => item.grid.on_upset_within(pos, towards, cone),
            SmithingAction::Split(pos) => item.grid.on_split(pos),
        }

        Ok(self.try_complete())
    }

    fn try_complete(&mut self) -> Option<SmithingOutput> {
        if !self.matches_recipe() {
            return None;
        }
        let recipe = self.recipe.take()?;
        self.work_item = None;
        self.rotation = 0;

        info!(
            recipe = recipe.code(),
            output = recipe.output(),
            quantity = recipe.output_quantity(),
            "smithing complete"
        );
        Some(SmithingOutput {
            recipe: recipe.code().to_string(),
            item: recipe.output().to_string(),
            quantity: recipe.output_quantity(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plate() -> SmithingRecipe {
        SmithingRecipe::new("plate", "ingot-iron", "metalplate-iron", &[&["#######"; 3]])
            .unwrap()
            .with_output_quantity(2)
    }

    fn bar() -> SmithingRecipe {
        SmithingRecipe::new("bar", "ingot-iron", "bar-iron", &[&["#######"; 3], &["#######"; 3]]).unwrap()
    }

    fn anvil_with_ingot() -> Anvil {
        let mut anvil = Anvil::new();
        assert_eq!(anvil.place_ingot("ingot-iron").unwrap(), 42);
        anvil
    }

    #[test]
    fn test_no_recipe_never_matches() {
        let anvil = anvil_with_ingot();
        assert!(!anvil.matches_recipe());
        assert!(!Anvil::new().matches_recipe());
    }

    #[test]
    fn test_fresh_ingot_matches_bar() {
        let mut anvil = anvil_with_ingot();
        anvil.select_recipe(bar()).unwrap();
        assert!(anvil.matches_recipe());
    }

    #[test]
    fn test_splitting_down_to_plate_completes() {
        let mut anvil = anvil_with_ingot();
        anvil.select_recipe(plate()).unwrap();
        assert!(!anvil.matches_recipe());

        let top: Vec<_> = (4..11)
            .flat_map(|x| (6..9).map(move |z| VoxelPos::new(x, 1, z)))
            .collect();
        let (last, rest) = top.split_last().unwrap();
        for pos in rest {
            assert_eq!(anvil.apply(SmithingAction::Split(*pos)).unwrap(), None);
        }
        let output = anvil.apply(SmithingAction::Split(*last)).unwrap().unwrap();

        assert_eq!(
            output,
            SmithingOutput {
                recipe: "plate".into(),
                item: "metalplate-iron".into(),
                quantity: 2,
            }
        );
        assert!(anvil.work_item().is_none());
        assert!(anvil.selected_recipe().is_none());
        assert_eq!(anvil.apply(SmithingAction::Hit(*last)), Err(SmithingError::NoWorkItem));
    }

    #[test]
    fn test_slag_blocks_completion() {
        let mut anvil = anvil_with_ingot();
        anvil.select_recipe(bar()).unwrap();
        anvil.work_item.as_mut().unwrap().grid.set(VoxelPos::new(0, 0, 0), VoxelMaterial::Slag);
        assert!(!anvil.matches_recipe());
    }

    #[test]
    fn test_match_survives_rotation() {
        let mut anvil = anvil_with_ingot();
        anvil.select_recipe(bar()).unwrap();

        anvil.rotate_work_item(false);
        assert_eq!(anvil.rotation(), 90);
        assert!(anvil.matches_recipe());

        anvil.rotate_work_item(true);
        anvil.rotate_work_item(true);
        assert_eq!(anvil.rotation(), 270);
        assert!(anvil.matches_recipe());
    }

    #[test]
    fn test_rotated_shape_without_rotation_fails() {
        let mut anvil = anvil_with_ingot();
        anvil.select_recipe(bar()).unwrap();
        let item = anvil.work_item.as_mut().unwrap();
        item.grid = item.grid.rotated(false);
        assert!(!anvil.matches_recipe());
    }

    #[test]
    fn test_ingredient_checks() {
        let mut anvil = Anvil::new();
        assert_eq!(anvil.select_recipe(plate()), Err(SmithingError::NoWorkItem));

        anvil.place_ingot("ingot-copper").unwrap();
        assert!(matches!(
            anvil.select_recipe(plate()),
            Err(SmithingError::IngredientMismatch { .. })
        ));
        assert!(matches!(
            anvil.place_ingot("ingot-iron"),
            Err(SmithingError::IngredientMismatch { .. })
        ));
        assert_eq!(anvil.place_ingot("ingot-copper").unwrap(), 42);
    }

    #[test]
    fn test_hit_keeps_metal() {
        let mut anvil = anvil_with_ingot();
        anvil.select_recipe(plate()).unwrap();
        for _ in 0..3 {
            anvil.apply(SmithingAction::Hit(VoxelPos::new(7, 1, 7))).unwrap();
            anvil
                .apply(SmithingAction::Upset {
                    pos: VoxelPos::new(10, 1, 7),
                    towards: BlockFacing::East,
                })
                .unwrap();
        }
        assert_eq!(anvil.grid().unwrap().count(VoxelMaterial::Metal), 42);
    }

    #[test]
    fn test_take_work_item() {
        let mut anvil = anvil_with_ingot();
        anvil.rotate_work_item(false);
        let item = anvil.take_work_item().unwrap();
        assert_eq!(item.material, "ingot-iron");
        assert_eq!(anvil.rotation(), 0);
        assert!(anvil.grid().is_none());
    }
}
