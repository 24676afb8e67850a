//! Lock-guarded anvil.
//!
//! Strokes arrive on the logic thread; the mesher and the selection box
//! provider read from others. Readers copy the grid out under the lock and
//! never hold it while meshing.

use parking_lot::RwLock;

use crate::anvil::Anvil;
use crate::grid::AnvilGrid;

/// An anvil shared between threads.
#[derive(Debug, Default)]
pub struct SharedAnvil {
    inner: RwLock<Anvil>,
}

impl SharedAnvil {
    /// Wraps an anvil.
    #[must_use]
    pub fn new(anvil: Anvil) -> Self {
        Self {
            inner: RwLock::new(anvil),
        }
    }

    /// Runs an edit with exclusive access.
    pub fn edit<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Anvil) -> R,
    {
        f(&mut self.inner.write())
    }

    /// Runs a read with shared access.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Anvil) -> R,
    {
        f(&self.inner.read())
    }

    /// Copy of the work item grid, if any.
    #[must_use]
    pub fn grid_snapshot(&self) -> Option<AnvilGrid> {
        self.inner.read().grid().cloned()
    }

    /// Unwraps the anvil.
    #[must_use]
    pub fn into_inner(self) -> Anvil {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anvil::SmithingAction;
    use crate::grid::VoxelMaterial;
    use hearth_shared::VoxelPos;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_snapshots_see_whole_strokes() {
        let shared = Arc::new(SharedAnvil::default());
        shared.edit(|a| a.place_ingot("ingot-iron")).unwrap();

        let smith = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..32 {
                    let pos = VoxelPos::new(4 + i % 7, 1, 6 + i % 3);
                    shared.edit(|a| a.apply(SmithingAction::Hit(pos))).unwrap();
                }
            })
        };

        for _ in 0..32 {
            // Hits only move metal, so every snapshot holds the full ingot.
            let grid = shared.grid_snapshot().unwrap();
            assert_eq!(grid.count(VoxelMaterial::Metal), 42);
        }

        smith.join().unwrap();
        assert!(shared.read(|a| a.work_item().is_some()));
    }

    #[test]
    fn test_empty_anvil_has_no_grid() {
        let shared = SharedAnvil::new(Anvil::new());
        assert!(shared.grid_snapshot().is_none());
        assert!(shared.into_inner().work_item().is_none());
    }
}
