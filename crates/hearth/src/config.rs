//! # Hearth Configuration
//!
//! One TOML file drives both block entities:
//!
//! ```toml
//! [chisel]
//! allowed_sizes = [1, 2, 4, 8]
//! snow = true
//!
//! [smithing]
//! upset_cone_degrees = 25.0
//!
//! [[smithing.recipes]]
//! code = "plate"
//! ingredient = "ingot-iron"
//! output = "metalplate-iron"
//! pattern = [["#######", "#######", "#######"]]
//! ```
//!
//! Every section and key is optional.

use std::path::Path;

use hearth_microblock::ChiselSize;
use hearth_smithing::{RecipeBook, SmithingRecipe, DEFAULT_CONE_DEGREES};
use serde::Deserialize;
use tracing::info;

use crate::error::{HearthError, HearthResult};

/// Chiseling rules.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChiselConfig {
    /// Brush edge lengths players may use.
    pub allowed_sizes: Vec<u8>,
    /// Whether chiseled blocks collect snow.
    pub snow: bool,
}

impl Default for ChiselConfig {
    fn default() -> Self {
        Self {
            allowed_sizes: ChiselSize::ALL.iter().map(|s| s.voxels()).collect(),
            snow: true,
        }
    }
}

impl ChiselConfig {
    /// Resolves a brush size, rejecting disabled ones.
    ///
    /// # Errors
    ///
    /// Returns `ChiselSizeNotAllowed` for sizes not in `allowed_sizes`.
    pub fn size(&self, voxels: u8) -> HearthResult<ChiselSize> {
        if !self.allowed_sizes.contains(&voxels) {
            return Err(HearthError::ChiselSizeNotAllowed(voxels));
        }
        ChiselSize::from_voxels(voxels).ok_or(HearthError::ChiselSizeNotAllowed(voxels))
    }
}

/// Smithing rules and recipes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SmithingConfig {
    /// Inline recipe list.
    pub recipes: Vec<SmithingRecipe>,
    /// Half-angle of the cone an upset may push metal into.
    pub upset_cone_degrees: f32,
}

impl Default for SmithingConfig {
    fn default() -> Self {
        Self {
            recipes: Vec::new(),
            upset_cone_degrees: DEFAULT_CONE_DEGREES,
        }
    }
}

impl SmithingConfig {
    /// Indexes the recipes.
    ///
    /// # Errors
    ///
    /// Returns `Smithing(DuplicateRecipe)` if two recipes share a code.
    pub fn recipe_book(&self) -> HearthResult<RecipeBook> {
        Ok(RecipeBook::from_recipes(self.recipes.iter().cloned())?)
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HearthConfig {
    /// `[chisel]` section.
    pub chisel: ChiselConfig,
    /// `[smithing]` section.
    pub smithing: SmithingConfig,
}

impl HearthConfig {
    /// Parses and validates a config.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed TOML or recipe patterns, and
    /// `InvalidConfig` for out-of-range values.
    pub fn from_toml_str(source: &str) -> HearthResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        info!(
            recipes = config.smithing.recipes.len(),
            chisel_sizes = ?config.chisel.allowed_sizes,
            "loaded hearth config"
        );
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as
    /// [`HearthConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> HearthResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| HearthError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first bad value.
    pub fn validate(&self) -> HearthResult<()> {
        if let Some(bad) = self
            .chisel
            .allowed_sizes
            .iter()
            .find(|&&s| ChiselSize::from_voxels(s).is_none())
        {
            return Err(HearthError::InvalidConfig(format!(
                "chisel size {bad} is not one of 1, 2, 4, 8"
            )));
        }
        let cone = self.smithing.upset_cone_degrees;
        if !(cone > 0.0 && cone <= 90.0) {
            return Err(HearthError::InvalidConfig(format!(
                "upset_cone_degrees must be in (0, 90], got {cone}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_smithing::SmithingError;

    #[test]
    fn test_defaults() {
        let config = HearthConfig::from_toml_str("").unwrap();
        assert_eq!(config.chisel.allowed_sizes, vec![1, 2, 4, 8]);
        assert!(config.chisel.snow);
        assert!((config.smithing.upset_cone_degrees - 25.0).abs() < f32::EPSILON);
        assert!(config.smithing.recipe_book().unwrap().is_empty());
    }

    #[test]
    fn test_full_file() {
        let config = HearthConfig::from_toml_str(
            r########"
[chisel]
allowed_sizes = [1, 4]
snow = false

[smithing]
upset_cone_degrees = 30.0

[[smithing.recipes]]
code = "plate"
ingredient = "ingot-iron"
output = "metalplate-iron"
pattern = [["#######", "#######", "#######"]]
"########,
        )
        .unwrap();

        assert!(!config.chisel.snow);
        assert_eq!(config.chisel.size(4).unwrap(), ChiselSize::Four);
        assert!(matches!(
            config.chisel.size(2),
            Err(HearthError::ChiselSizeNotAllowed(2))
        ));
        let book = config.smithing.recipe_book().unwrap();
        assert_eq!(book.require("plate").unwrap().metal_count(), 21);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            HearthConfig::from_toml_str("[chisel]\nallowed_sizes = [3]"),
            Err(HearthError::InvalidConfig(_))
        ));
        assert!(matches!(
            HearthConfig::from_toml_str("[smithing]\nupset_cone_degrees = 0.0"),
            Err(HearthError::InvalidConfig(_))
        ));
        assert!(matches!(
            HearthConfig::from_toml_str("[chisel]\nsnow = \"yes\""),
            Err(HearthError::Parse(_))
        ));
    }

    #[test]
    fn test_duplicate_recipes() {
        let recipe = "[[smithing.recipes]]\ncode = \"a\"\ningredient = \"i\"\noutput = \"o\"\npattern = [[\"#\"]]\n";
        let config = HearthConfig::from_toml_str(&recipe.repeat(2)).unwrap();
        assert!(matches!(
            config.smithing.recipe_book(),
            Err(HearthError::Smithing(SmithingError::DuplicateRecipe(_)))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            HearthConfig::from_toml_file("/nonexistent/hearth.toml"),
            Err(HearthError::Io { .. })
        ));
    }
}
