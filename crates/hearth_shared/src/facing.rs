//! Integer voxel positions and the six block facings.
//!
//! Facing indices are part of the persisted side-solidity layout and must
//! not be reordered: North(-Z)=0, East(+X)=1, South(+Z)=2, West(-X)=3,
//! Up(+Y)=4, Down(-Y)=5.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Integer position of a voxel inside a block-local grid.
///
/// Signed so that neighbour offsets can step outside the grid and be
/// rejected by a bounds check instead of wrapping.
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct VoxelPos {
    /// X component
    pub x: i32,
    /// Y component
    pub y: i32,
    /// Z component
    pub z: i32,
}

impl VoxelPos {
    /// Creates a new position
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Origin of the grid
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Returns this position shifted by the given deltas.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Returns the neighbouring position in the given direction.
    #[inline]
    #[must_use]
    pub const fn step(self, facing: BlockFacing) -> Self {
        let n = facing.normal();
        self.offset(n.x, n.y, n.z)
    }

    /// Returns true if every component lies in `[0, size)` for the given
    /// per-axis sizes.
    #[inline]
    #[must_use]
    pub const fn in_bounds(self, size_x: i32, size_y: i32, size_z: i32) -> bool {
        self.x >= 0
            && self.x < size_x
            && self.y >= 0
            && self.y < size_y
            && self.z >= 0
            && self.z < size_z
    }
}

impl std::ops::Add for VoxelPos {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// East-west axis
    X,
    /// Vertical axis
    Y,
    /// North-south axis
    Z,
}

/// One of the six faces of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockFacing {
    /// Negative Z
    North = 0,
    /// Positive X
    East = 1,
    /// Positive Z
    South = 2,
    /// Negative X
    West = 3,
    /// Positive Y
    Up = 4,
    /// Negative Y
    Down = 5,
}

impl BlockFacing {
    /// All faces in index order.
    pub const ALL: [Self; 6] = [
        Self::North,
        Self::East,
        Self::South,
        Self::West,
        Self::Up,
        Self::Down,
    ];

    /// The four horizontal faces in index order.
    pub const HORIZONTALS: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Stable index of this face (0-5).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks a face up by its index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::North),
            1 => Some(Self::East),
            2 => Some(Self::South),
            3 => Some(Self::West),
            4 => Some(Self::Up),
            5 => Some(Self::Down),
            _ => None,
        }
    }

    /// Unit normal pointing out of this face.
    #[must_use]
    pub const fn normal(self) -> VoxelPos {
        match self {
            Self::North => VoxelPos::new(0, 0, -1),
            Self::East => VoxelPos::new(1, 0, 0),
            Self::South => VoxelPos::new(0, 0, 1),
            Self::West => VoxelPos::new(-1, 0, 0),
            Self::Up => VoxelPos::new(0, 1, 0),
            Self::Down => VoxelPos::new(0, -1, 0),
        }
    }

    /// The face pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Axis this face is perpendicular to.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::North | Self::South => Axis::Z,
            Self::East | Self::West => Axis::X,
            Self::Up | Self::Down => Axis::Y,
        }
    }

    /// Returns true for the four side faces.
    #[inline]
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Self::Up | Self::Down)
    }
}
