//! Rigid transforms applied directly to packed cuboids.
//!
//! Each cuboid's corners are mirrored and rotated about the block centre,
//! then re-packed. No dense grid round-trip is needed.

use hearth_shared::Axis;
use tracing::debug;

use crate::cuboid::{CuboidWithMaterial, PackedCuboid, GRID_SIZE};
use crate::error::{MicroBlockError, MicroBlockResult};

const EDGE: u8 = GRID_SIZE as u8;

/// Converts degrees into quarter turns in `0..4`.
///
/// # Errors
///
/// Returns `InvalidRotation` unless `degrees` is a multiple of 90.
pub fn quarter_turns(degrees: i32) -> MicroBlockResult<u8> {
    if degrees % 90 != 0 {
        return Err(MicroBlockError::InvalidRotation(degrees));
    }
    Ok((degrees / 90).rem_euclid(4) as u8)
}

/// Mirrors a cuboid across the block centre on one axis.
#[must_use]
pub fn flip(cub: CuboidWithMaterial, axis: Axis) -> CuboidWithMaterial {
    let mut out = cub;
    match axis {
        Axis::X => {
            out.x1 = EDGE - cub.x2;
            out.x2 = EDGE - cub.x1;
        }
        Axis::Y => {
            out.y1 = EDGE - cub.y2;
            out.y2 = EDGE - cub.y1;
        }
        Axis::Z => {
            out.z1 = EDGE - cub.z2;
            out.z2 = EDGE - cub.z1;
        }
    }
    out
}

/// Rotates a cuboid by quarter turns about the vertical axis through the
/// block centre. One turn maps `(x, z)` to `(z, 16 - x)`, so east faces
/// end up north.
#[must_use]
pub fn rotate_y(cub: CuboidWithMaterial, turns: u8) -> CuboidWithMaterial {
    let mut out = cub;
    for _ in 0..turns % 4 {
        let prev = out;
        out.x1 = prev.z1;
        out.x2 = prev.z2;
        out.z1 = EDGE - prev.x2;
        out.z2 = EDGE - prev.x1;
    }
    out
}

/// Rotates (and optionally first mirrors) a whole cuboid list.
///
/// # Errors
///
/// Returns `InvalidRotation` if `degrees` is not a multiple of 90.
pub fn rotate_cuboids(
    cuboids: &[PackedCuboid],
    degrees: i32,
    flip_axis: Option<Axis>,
) -> MicroBlockResult<Vec<PackedCuboid>> {
    let turns = quarter_turns(degrees)?;

    let rotated = cuboids
        .iter()
        .map(|packed| {
            let mut cub = packed.unpack();
            if let Some(axis) = flip_axis {
                cub = flip(cub, axis);
            }
            rotate_y(cub, turns).pack()
        })
        .collect::<MicroBlockResult<Vec<_>>>()?;

    debug!(degrees, ?flip_axis, cuboids = rotated.len(), "transformed micro-block");
    Ok(rotated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::VoxelGrid;

    fn cub(min: [u8; 3], max: [u8; 3]) -> CuboidWithMaterial {
        CuboidWithMaterial::new(min, max, 1).unwrap()
    }

    #[test]
    fn test_quarter_turns() {
        assert_eq!(quarter_turns(0).unwrap(), 0);
        assert_eq!(quarter_turns(270).unwrap(), 3);
        assert_eq!(quarter_turns(-90).unwrap(), 3);
        assert_eq!(quarter_turns(450).unwrap(), 1);
        assert_eq!(quarter_turns(45), Err(MicroBlockError::InvalidRotation(45)));
    }

    #[test]
    fn test_rotate_east_strip_to_north() {
        // Strip along the east wall.
        let east = cub([14, 0, 0], [16, 4, 16]);
        let rotated = rotate_y(east, 1);
        assert_eq!(rotated, cub([0, 0, 0], [16, 4, 2]));
    }

    #[test]
    fn test_four_turns_is_identity() {
        let c = cub([1, 2, 3], [5, 9, 4]);
        assert_eq!(rotate_y(c, 4), c);
        assert_eq!(rotate_y(rotate_y(c, 1), 3), c);
    }

    #[test]
    fn test_flip_is_involution() {
        let c = cub([1, 2, 3], [5, 9, 4]);
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            assert_eq!(flip(flip(c, axis), axis), c);
        }
        assert_eq!(flip(c, Axis::Y), cub([1, 7, 3], [5, 14, 4]));
    }

    #[test]
    fn test_rotate_list_preserves_volume() {
        let list = vec![
            cub([0, 0, 0], [16, 1, 16]).pack().unwrap(),
            cub([3, 1, 0], [4, 8, 6]).pack().unwrap(),
        ];
        let before = VoxelGrid::from_cuboids(&list).count();
        let rotated = rotate_cuboids(&list, 180, Some(Axis::X)).unwrap();
        assert_eq!(VoxelGrid::from_cuboids(&rotated).count(), before);
        assert!(rotate_cuboids(&list, 30, None).is_err());
    }
}
