//! Per-block material palette.
//!
//! Cuboids carry a 4-bit index; the palette maps it to the block code the
//! host registry understands (e.g. `"game:rock-granite"`).

use serde::{Deserialize, Serialize};

use crate::cuboid::MAX_MATERIALS;
use crate::error::{MicroBlockError, MicroBlockResult};

/// Ordered list of block codes referenced by a chiseled block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialPalette {
    codes: Vec<String>,
}

impl MaterialPalette {
    /// Creates an empty palette.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a palette from stored codes.
    ///
    /// # Errors
    ///
    /// Returns `PaletteFull` if more than sixteen codes are given.
    pub fn from_codes(codes: Vec<String>) -> MicroBlockResult<Self> {
        if codes.len() > MAX_MATERIALS {
            return Err(MicroBlockError::PaletteFull {
                capacity: MAX_MATERIALS,
            });
        }
        Ok(Self { codes })
    }

    /// Returns the index of a code, adding it if needed.
    ///
    /// # Errors
    ///
    /// Returns `PaletteFull` if the code is new and all slots are used.
    pub fn add_material(&mut self, code: &str) -> MicroBlockResult<u8> {
        if let Some(index) = self.index_of(code) {
            return Ok(index);
        }
        if self.codes.len() >= MAX_MATERIALS {
            return Err(MicroBlockError::PaletteFull {
                capacity: MAX_MATERIALS,
            });
        }
        self.codes.push(code.to_string());
        Ok((self.codes.len() - 1) as u8)
    }

    /// Looks up the index of a code.
    #[must_use]
    pub fn index_of(&self, code: &str) -> Option<u8> {
        self.codes.iter().position(|c| c == code).map(|i| i as u8)
    }

    /// Returns the code at an index.
    #[must_use]
    pub fn get(&self, index: u8) -> Option<&str> {
        self.codes.get(usize::from(index)).map(String::as_str)
    }

    /// Checks that an index is addressable.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMaterial` if the palette has no such slot.
    pub fn check(&self, index: u8) -> MicroBlockResult<()> {
        if usize::from(index) < self.codes.len() {
            Ok(())
        } else {
            Err(MicroBlockError::UnknownMaterial {
                index,
                len: self.codes.len(),
            })
        }
    }

    /// Number of materials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns true if no material was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// All codes in index order.
    #[must_use]
    pub fn codes(&self) -> &[String] {
        &self.codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_dedupes() {
        let mut palette = MaterialPalette::new();
        assert_eq!(palette.add_material("rock-granite").unwrap(), 0);
        assert_eq!(palette.add_material("planks-oak").unwrap(), 1);
        assert_eq!(palette.add_material("rock-granite").unwrap(), 0);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(1), Some("planks-oak"));
        assert_eq!(palette.get(2), None);
    }

    #[test]
    fn test_capacity() {
        let mut palette = MaterialPalette::new();
        for i in 0..MAX_MATERIALS {
            palette.add_material(&format!("mat-{i}")).unwrap();
        }
        assert_eq!(
            palette.add_material("one-too-many"),
            Err(MicroBlockError::PaletteFull { capacity: 16 })
        );
        // Existing codes still resolve when full.
        assert_eq!(palette.add_material("mat-3").unwrap(), 3);
    }

    #[test]
    fn test_check() {
        let palette = MaterialPalette::from_codes(vec!["a".into()]).unwrap();
        assert!(palette.check(0).is_ok());
        assert_eq!(
            palette.check(1),
            Err(MicroBlockError::UnknownMaterial { index: 1, len: 1 })
        );
    }
}
