//! # Smithing Error Types
//!
//! All errors that can occur while loading recipes or working an anvil.

use thiserror::Error;

/// Errors that can occur in the smithing system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmithingError {
    /// Recipe pattern does not fit the work surface.
    #[error("invalid pattern for recipe {code}: {reason}")]
    InvalidPattern {
        /// Recipe code.
        code: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Recipe not found in the recipe book.
    #[error("recipe not found: {0}")]
    RecipeNotFound(String),

    /// Two recipes share a code.
    #[error("duplicate recipe code: {0}")]
    DuplicateRecipe(String),

    /// The anvil has nothing to work on.
    #[error("no work item on the anvil")]
    NoWorkItem,

    /// Recipe or ingot does not match the work item's material.
    #[error("ingredient mismatch: work item is {work_item}, got {given}")]
    IngredientMismatch {
        /// Material of the current work item.
        work_item: String,
        /// Material offered.
        given: String,
    },

    /// Invalid recipe file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for smithing operations.
pub type SmithingResult<T> = Result<T, SmithingError>;
