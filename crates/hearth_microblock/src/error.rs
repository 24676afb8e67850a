//! # Micro-block Error Types
//!
//! All errors that can occur while editing or decoding a chiseled block.

use thiserror::Error;

/// Errors that can occur in the micro-block core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MicroBlockError {
    /// Cuboid bounds or material do not fit the packed layout.
    #[error(
        "invalid cuboid ({x1},{y1},{z1})-({x2},{y2},{z2}) material {material}"
    )]
    InvalidCuboid {
        /// Min X.
        x1: u8,
        /// Min Y.
        y1: u8,
        /// Min Z.
        z1: u8,
        /// Max X (exclusive).
        x2: u8,
        /// Max Y (exclusive).
        y2: u8,
        /// Max Z (exclusive).
        z2: u8,
        /// Material index.
        material: u8,
    },

    /// Rotation is not a multiple of 90 degrees.
    #[error("rotation must be a multiple of 90 degrees, got {0}")]
    InvalidRotation(i32),

    /// All material slots of the palette are taken.
    #[error("material palette full: {capacity} materials")]
    PaletteFull {
        /// Palette capacity.
        capacity: usize,
    },

    /// A cuboid references a material index the palette does not have.
    #[error("unknown material index {index}, palette has {len}")]
    UnknownMaterial {
        /// Offending index.
        index: u8,
        /// Palette length.
        len: usize,
    },
}

/// Result type for micro-block operations.
pub type MicroBlockResult<T> = Result<T, MicroBlockError>;
