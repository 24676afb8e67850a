//! Lock-guarded micro-block for concurrent edit and mesh building.
//!
//! Gameplay edits run on the logic thread while the host tesselates on a
//! worker. Both go through one `RwLock` so a mesh builder never observes a
//! cuboid list that is halfway through a rebuild.
//!
//! ```text
//! Logic thread ──edit()──▶ [RwLock<MicroBlock>] ◀──snapshot()── Mesh worker
//! ```

use parking_lot::RwLock;

use crate::cuboid::PackedCuboid;
use crate::microblock::MicroBlock;
use crate::rebuild::SnowCuboids;

/// Immutable copy of everything a mesh builder needs.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSnapshot {
    /// Solid cuboids.
    pub cuboids: Vec<PackedCuboid>,
    /// Snow cap cuboids.
    pub snow: SnowCuboids,
    /// Block codes by material index.
    pub materials: Vec<String>,
    /// Side AO bitmask.
    pub emit_side_ao: u8,
}

/// A micro-block shared between threads.
#[derive(Debug, Default)]
pub struct SharedMicroBlock {
    inner: RwLock<MicroBlock>,
}

impl SharedMicroBlock {
    /// Wraps a block.
    #[must_use]
    pub fn new(block: MicroBlock) -> Self {
        Self {
            inner: RwLock::new(block),
        }
    }

    /// Runs an edit with exclusive access.
    pub fn edit<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut MicroBlock) -> R,
    {
        f(&mut self.inner.write())
    }

    /// Runs a read with shared access.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&MicroBlock) -> R,
    {
        f(&self.inner.read())
    }

    /// Copies the mesh inputs out under one read lock.
    #[must_use]
    pub fn snapshot(&self) -> MeshSnapshot {
        let block = self.inner.read();
        MeshSnapshot {
            cuboids: block.cuboids().to_vec(),
            snow: block.snow_cuboids().clone(),
            materials: block.palette().codes().to_vec(),
            emit_side_ao: block.emit_side_ao(),
        }
    }

    /// Unwraps the block.
    #[must_use]
    pub fn into_inner(self) -> MicroBlock {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::VoxelGrid;
    use crate::microblock::ChiselSize;
    use hearth_shared::VoxelPos;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_snapshots_are_never_torn() {
        let shared = Arc::new(SharedMicroBlock::new(
            MicroBlock::from_full_block("rock-granite").unwrap(),
        ));

        let writer = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..64 {
                    let pos = VoxelPos::new(i % 16, (i / 4) % 16, (i * 7) % 16);
                    shared.edit(|b| b.chisel(pos, ChiselSize::Two)).unwrap();
                }
            })
        };

        for _ in 0..64 {
            let snap = shared.snapshot();
            // A consistent list always covers exactly the voxels it expands to.
            let expanded = VoxelGrid::from_cuboids(&snap.cuboids).count() as u32;
            let volume: u32 = snap.cuboids.iter().map(|c| c.unpack().volume()).sum();
            assert_eq!(expanded, volume);
        }

        writer.join().unwrap();
        let block = Arc::try_unwrap(shared).unwrap().into_inner();
        assert!(block.size_rel() < 1.0);
    }

    #[test]
    fn test_read_and_edit() {
        let shared = SharedMicroBlock::default();
        assert!(shared.read(MicroBlock::is_empty));
        shared
            .edit(|b| b.add_voxels(VoxelPos::ZERO, "planks-oak", ChiselSize::One))
            .unwrap();
        assert_eq!(shared.snapshot().materials, vec!["planks-oak".to_string()]);
    }
}
