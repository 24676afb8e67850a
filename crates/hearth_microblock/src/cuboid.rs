//! Packed voxel cuboids.
//!
//! A cuboid is stored as one `u32` so that a whole chiseled block persists
//! as a flat integer array:
//!
//! ```text
//! bits  0-3   x1        bits 12-15  x2 - 1
//! bits  4-7   y1        bits 16-19  y2 - 1
//! bits  8-11  z1        bits 20-23  z2 - 1
//! bits 24-31  material index
//! ```
//!
//! Max bounds are exclusive in [`CuboidWithMaterial`] and stored minus one,
//! so a full 16-wide edge still fits in four bits.

use bytemuck::{Pod, Zeroable};
use hearth_shared::Cuboidf;
use serde::{Deserialize, Serialize};

use crate::error::{MicroBlockError, MicroBlockResult};

/// Voxels per block edge.
pub const GRID_SIZE: usize = 16;

/// Materials addressable by a packed cuboid.
///
/// The material field is eight bits wide but decoders only honour the low
/// four, so the palette is capped at sixteen entries.
pub const MAX_MATERIALS: usize = 16;

const NIBBLE: u32 = 0xF;

/// A cuboid in its persisted 32-bit form.
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PackedCuboid(pub u32);

impl PackedCuboid {
    /// Returns the raw packed value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Decodes into the working form.
    #[inline]
    #[must_use]
    pub const fn unpack(self) -> CuboidWithMaterial {
        from_uint(self.0)
    }
}

/// A cuboid with exclusive max bounds and a material index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CuboidWithMaterial {
    /// Min X (inclusive).
    pub x1: u8,
    /// Min Y (inclusive).
    pub y1: u8,
    /// Min Z (inclusive).
    pub z1: u8,
    /// Max X (exclusive).
    pub x2: u8,
    /// Max Y (exclusive).
    pub y2: u8,
    /// Max Z (exclusive).
    pub z2: u8,
    /// Index into the block's material palette.
    pub material: u8,
}

impl CuboidWithMaterial {
    /// Creates a validated cuboid.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCuboid` if any axis is empty, out of the 16-voxel grid,
    /// or the material does not fit the palette.
    pub fn new(
        min: [u8; 3],
        max: [u8; 3],
        material: u8,
    ) -> MicroBlockResult<Self> {
        let cuboid = Self {
            x1: min[0],
            y1: min[1],
            z1: min[2],
            x2: max[0],
            y2: max[1],
            z2: max[2],
            material,
        };
        cuboid.validate()?;
        Ok(cuboid)
    }

    /// A single voxel at the given position.
    #[must_use]
    pub const fn unit(x: u8, y: u8, z: u8, material: u8) -> Self {
        Self {
            x1: x,
            y1: y,
            z1: z,
            x2: x + 1,
            y2: y + 1,
            z2: z + 1,
            material,
        }
    }

    /// Checks the packing preconditions.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCuboid` describing the rejected bounds.
    pub fn validate(&self) -> MicroBlockResult<()> {
        let size = GRID_SIZE as u8;
        let axes_ok = self.x1 < self.x2
            && self.y1 < self.y2
            && self.z1 < self.z2
            && self.x2 <= size
            && self.y2 <= size
            && self.z2 <= size;

        if axes_ok && usize::from(self.material) < MAX_MATERIALS {
            Ok(())
        } else {
            Err(MicroBlockError::InvalidCuboid {
                x1: self.x1,
                y1: self.y1,
                z1: self.z1,
                x2: self.x2,
                y2: self.y2,
                z2: self.z2,
                material: self.material,
            })
        }
    }

    /// Packs into the persisted form.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCuboid` if the cuboid violates the layout.
    pub fn pack(&self) -> MicroBlockResult<PackedCuboid> {
        self.validate()?;
        Ok(PackedCuboid(
            u32::from(self.x1)
                | (u32::from(self.y1) << 4)
                | (u32::from(self.z1) << 8)
                | (u32::from(self.x2 - 1) << 12)
                | (u32::from(self.y2 - 1) << 16)
                | (u32::from(self.z2 - 1) << 20)
                | (u32::from(self.material) << 24),
        ))
    }

    /// Number of voxels covered.
    #[must_use]
    pub fn volume(&self) -> u32 {
        u32::from(self.x2 - self.x1) * u32::from(self.y2 - self.y1) * u32::from(self.z2 - self.z1)
    }

    /// Returns true if the voxel lies inside.
    #[must_use]
    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        (usize::from(self.x1)..usize::from(self.x2)).contains(&x)
            && (usize::from(self.y1)..usize::from(self.y2)).contains(&y)
            && (usize::from(self.z1)..usize::from(self.z2)).contains(&z)
    }

    /// Returns true if the two cuboids share at least one voxel.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x1 < other.x2
            && other.x1 < self.x2
            && self.y1 < other.y2
            && other.y1 < self.y2
            && self.z1 < other.z2
            && other.z1 < self.z2
    }

    /// Iterates every voxel position inside, X-major.
    pub fn voxels(&self) -> impl Iterator<Item = (usize, usize, usize)> {
        let (x1, x2) = (usize::from(self.x1), usize::from(self.x2));
        let (y1, y2) = (usize::from(self.y1), usize::from(self.y2));
        let (z1, z2) = (usize::from(self.z1), usize::from(self.z2));
        (x1..x2).flat_map(move |x| (y1..y2).flat_map(move |y| (z1..z2).map(move |z| (x, y, z))))
    }

    /// Converts to a block-unit box for selection and collision.
    #[must_use]
    pub fn to_cuboidf(&self) -> Cuboidf {
        Cuboidf::from_voxel_bounds([self.x1, self.y1, self.z1], [self.x2, self.y2, self.z2])
    }
}

/// Packs cuboid bounds (max exclusive) and a material into a `u32`.
///
/// # Errors
///
/// Returns `InvalidCuboid` unless `min < max <= 16` on every axis and
/// `material < 16`.
pub fn to_cuboid(
    minx: u8,
    miny: u8,
    minz: u8,
    maxx: u8,
    maxy: u8,
    maxz: u8,
    material: u8,
) -> MicroBlockResult<PackedCuboid> {
    CuboidWithMaterial {
        x1: minx,
        y1: miny,
        z1: minz,
        x2: maxx,
        y2: maxy,
        z2: maxz,
        material,
    }
    .pack()
}

/// Decodes a packed cuboid. Never fails: any `u32` maps to a valid cuboid.
#[must_use]
pub const fn from_uint(val: u32) -> CuboidWithMaterial {
    CuboidWithMaterial {
        x1: (val & NIBBLE) as u8,
        y1: ((val >> 4) & NIBBLE) as u8,
        z1: ((val >> 8) & NIBBLE) as u8,
        x2: ((val >> 12) & NIBBLE) as u8 + 1,
        y2: ((val >> 16) & NIBBLE) as u8 + 1,
        z2: ((val >> 20) & NIBBLE) as u8 + 1,
        material: ((val >> 24) & NIBBLE) as u8,
    }
}
