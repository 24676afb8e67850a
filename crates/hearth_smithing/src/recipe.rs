//! # Smithing Recipes
//!
//! A recipe is a target shape for the work item plus what it turns into.
//! Shapes are authored top-down, one block of text per layer:
//!
//! ```toml
//! [[recipes]]
//! code = "nails"
//! ingredient = "ingot-iron"
//! output = "metalnailsandstrips-iron"
//! output_quantity = 4
//! pattern = [
//!     ["#_#", "#_#", "#_#"],
//! ]
//! ```
//!
//! Rows run along Z, characters along X. `#` is metal, `_` or a space is
//! empty. Smaller patterns are centred on the 16×16 surface.
//!
//! The [`RecipeBook`] is the lookup service: by code, and by ingredient for
//! the recipe picker.

use std::collections::HashMap;

use hearth_shared::VoxelPos;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{SmithingError, SmithingResult};
use crate::grid::{AnvilGrid, VoxelMaterial, DEPTH, HEIGHT, WIDTH};

/// Recipe as written in a recipe file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDef {
    /// Unique recipe code.
    pub code: String,
    /// Work item material this recipe accepts.
    pub ingredient: String,
    /// Item produced on completion.
    pub output: String,
    /// Stack size produced.
    #[serde(default = "default_output_quantity")]
    pub output_quantity: u32,
    /// Layers from the bottom up.
    pub pattern: Vec<Vec<String>>,
}

const fn default_output_quantity() -> u32 {
    1
}

/// A validated smithing recipe.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RecipeDef")]
pub struct SmithingRecipe {
    code: String,
    ingredient: String,
    output: String,
    output_quantity: u32,
    quantity_layers: usize,
    pattern: AnvilGrid,
}

impl SmithingRecipe {
    /// Builds a recipe from in-code layers.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if the layers do not fit the work surface.
    pub fn new(
        code: impl Into<String>,
        ingredient: impl Into<String>,
        output: impl Into<String>,
        layers: &[&[&str]],
    ) -> SmithingResult<Self> {
        Self::from_def(RecipeDef {
            code: code.into(),
            ingredient: ingredient.into(),
            output: output.into(),
            output_quantity: 1,
            pattern: layers
                .iter()
                .map(|layer| layer.iter().map(|row| (*row).to_string()).collect())
                .collect(),
        })
    }

    /// Validates a parsed recipe.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` for an empty or ragged pattern, more than six
    /// layers, rows wider or longer than sixteen, or unknown characters.
    pub fn from_def(def: RecipeDef) -> SmithingResult<Self> {
        let pattern = parse_pattern(&def.code, &def.pattern)?;
        Ok(Self {
            quantity_layers: def.pattern.len(),
            code: def.code,
            ingredient: def.ingredient,
            output: def.output,
            output_quantity: def.output_quantity,
            pattern,
        })
    }

    /// Sets the stack size produced.
    #[must_use]
    pub const fn with_output_quantity(mut self, quantity: u32) -> Self {
        self.output_quantity = quantity;
        self
    }

    /// Recipe code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Accepted work item material.
    #[must_use]
    pub fn ingredient(&self) -> &str {
        &self.ingredient
    }

    /// Item produced.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Stack size produced.
    #[must_use]
    pub const fn output_quantity(&self) -> u32 {
        self.output_quantity
    }

    /// Number of authored layers.
    #[must_use]
    pub const fn quantity_layers(&self) -> usize {
        self.quantity_layers
    }

    /// Number of metal cells the finished piece has.
    #[must_use]
    pub fn metal_count(&self) -> usize {
        self.pattern.count(VoxelMaterial::Metal)
    }

    /// The target shape seen from a work item rotated by `rotation` degrees.
    ///
    /// Each 90° applies one clockwise quarter turn.
    #[must_use]
    pub fn pattern_at(&self, rotation: i32) -> AnvilGrid {
        let turns = rotation.rem_euclid(360) / 90;
        (0..turns).fold(self.pattern.clone(), |p, _| p.rotated(false))
    }
}

impl TryFrom<RecipeDef> for SmithingRecipe {
    type Error = SmithingError;

    fn try_from(def: RecipeDef) -> SmithingResult<Self> {
        Self::from_def(def)
    }
}

fn parse_pattern(code: &str, layers: &[Vec<String>]) -> SmithingResult<AnvilGrid> {
    let invalid = |reason: String| SmithingError::InvalidPattern {
        code: code.to_string(),
        reason,
    };

    if layers.is_empty() || layers.len() > HEIGHT {
        return Err(invalid(format!("expected 1 to {HEIGHT} layers, got {}", layers.len())));
    }
    let depth = layers[0].len();
    let width = layers[0].first().map_or(0, |row| row.chars().count());
    if depth == 0 || depth > DEPTH || width == 0 || width > WIDTH {
        return Err(invalid(format!("layer size {width}x{depth} does not fit 16x16")));
    }

    let start_x = (WIDTH - width) / 2;
    let start_z = (DEPTH - depth) / 2;
    let mut grid = AnvilGrid::new();

    for (y, layer) in layers.iter().enumerate() {
        if layer.len() != depth {
            return Err(invalid(format!("layer {y} has {} rows, expected {depth}", layer.len())));
        }
        for (z, row) in layer.iter().enumerate() {
            if row.chars().count() != width {
                return Err(invalid(format!("row {z} of layer {y} is not {width} wide")));
            }
            for (x, c) in row.chars().enumerate() {
                let state = match c {
                    '#' => VoxelMaterial::Metal,
                    '_' | ' ' => continue,
                    other => return Err(invalid(format!("unexpected character {other:?}"))),
                };
                let pos = VoxelPos::new((start_x + x) as i32, y as i32, (start_z + z) as i32);
                grid.set(pos, state);
            }
        }
    }
    Ok(grid)
}

#[derive(Deserialize)]
struct RecipeFile {
    #[serde(default)]
    recipes: Vec<SmithingRecipe>,
}

/// All known smithing recipes.
#[derive(Debug, Default, Clone)]
pub struct RecipeBook {
    /// Recipes by code.
    recipes: HashMap<String, SmithingRecipe>,
    /// Recipe codes by ingredient, in insertion order.
    by_ingredient: HashMap<String, Vec<String>>,
}

impl RecipeBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from recipes.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRecipe` if two recipes share a code.
    pub fn from_recipes(recipes: impl IntoIterator<Item = SmithingRecipe>) -> SmithingResult<Self> {
        let mut book = Self::new();
        for recipe in recipes {
            book.add_recipe(recipe)?;
        }
        Ok(book)
    }

    /// Parses a recipe file with a top-level `[[recipes]]` array.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file does not parse or a pattern is
    /// invalid, and `DuplicateRecipe` for repeated codes.
    pub fn from_toml_str(source: &str) -> SmithingResult<Self> {
        let file: RecipeFile =
            toml::from_str(source).map_err(|e| SmithingError::InvalidConfig(e.to_string()))?;
        let book = Self::from_recipes(file.recipes)?;
        info!(recipes = book.len(), "loaded smithing recipes");
        Ok(book)
    }

    /// Adds a recipe.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRecipe` if the code is taken.
    pub fn add_recipe(&mut self, recipe: SmithingRecipe) -> SmithingResult<()> {
        if self.recipes.contains_key(recipe.code()) {
            return Err(SmithingError::DuplicateRecipe(recipe.code().to_string()));
        }
        self.by_ingredient
            .entry(recipe.ingredient().to_string())
            .or_default()
            .push(recipe.code().to_string());
        self.recipes.insert(recipe.code().to_string(), recipe);
        Ok(())
    }

    /// Gets a recipe by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&SmithingRecipe> {
        self.recipes.get(code)
    }

    /// Gets a recipe by code or fails.
    ///
    /// # Errors
    ///
    /// Returns `RecipeNotFound` for unknown codes.
    pub fn require(&self, code: &str) -> SmithingResult<&SmithingRecipe> {
        self.get(code)
            .ok_or_else(|| SmithingError::RecipeNotFound(code.to_string()))
    }

    /// Recipes that accept a work item of the given material.
    #[must_use]
    pub fn for_ingredient(&self, ingredient: &str) -> Vec<&SmithingRecipe> {
        self.by_ingredient
            .get(ingredient)
            .map(|codes| codes.iter().filter_map(|c| self.recipes.get(c)).collect())
            .unwrap_or_default()
    }

    /// All recipes.
    pub fn iter(&self) -> impl Iterator<Item = &SmithingRecipe> {
        self.recipes.values()
    }

    /// Number of recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Returns true if the book has no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
