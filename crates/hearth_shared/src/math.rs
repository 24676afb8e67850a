//! Floating point types handed to the host for collision and selection.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Voxels per block edge for block-unit conversions.
const VOXELS_PER_BLOCK: f32 = 16.0;

/// 3D Vector - directions and cone tests
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }
}

/// Axis-aligned box in block units (0.0 - 1.0 per block).
///
/// This is the shape hosts use for selection and collision boxes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Cuboidf {
    /// Min X
    pub x1: f32,
    /// Min Y
    pub y1: f32,
    /// Min Z
    pub z1: f32,
    /// Max X
    pub x2: f32,
    /// Max Y
    pub y2: f32,
    /// Max Z
    pub z2: f32,
}

impl Cuboidf {
    /// Creates a new box from its corners.
    #[must_use]
    pub const fn new(x1: f32, y1: f32, z1: f32, x2: f32, y2: f32, z2: f32) -> Self {
        Self { x1, y1, z1, x2, y2, z2 }
    }

    /// Converts voxel-grid bounds (max exclusive) into block units.
    #[must_use]
    pub fn from_voxel_bounds(min: [u8; 3], max: [u8; 3]) -> Self {
        Self::new(
            f32::from(min[0]) / VOXELS_PER_BLOCK,
            f32::from(min[1]) / VOXELS_PER_BLOCK,
            f32::from(min[2]) / VOXELS_PER_BLOCK,
            f32::from(max[0]) / VOXELS_PER_BLOCK,
            f32::from(max[1]) / VOXELS_PER_BLOCK,
            f32::from(max[2]) / VOXELS_PER_BLOCK,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(3.0, 0.0, 4.0);
        assert!((a.length() - 5.0).abs() < f32::EPSILON);
        assert!((a.dot(Vec3::new(1.0, 0.0, 0.0)) - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cuboid_from_voxels() {
        let full = Cuboidf::from_voxel_bounds([0, 0, 0], [16, 16, 16]);
        assert!((full.x2 - 1.0).abs() < f32::EPSILON);

        let slab = Cuboidf::from_voxel_bounds([0, 0, 0], [16, 8, 16]);
        assert!((slab.y2 - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cuboid_bytemuck() {
        let c = Cuboidf::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        let bytes: &[u8] = bytemuck::bytes_of(&c);
        assert_eq!(bytes.len(), 24);
    }
}
