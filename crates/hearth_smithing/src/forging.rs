//! # Voxel Migration
//!
//! What happens to the work item when it is struck. Metal never vanishes
//! except through splitting: every move clears one cell and fills another.
//!
//! ## Hit
//!
//! ```text
//!   before          after (side view, struck at *)
//!   . * .           . . .
//!   # . #    →      # # #
//! ```
//!
//! Metal around the struck cell first tries to sink into empty space
//! directly below or one cell sideways. If nothing can sink, the
//! neighbours splash two cells outward.

use std::collections::VecDeque;

use hearth_shared::{BlockFacing, Vec3, VoxelPos};

use crate::grid::{AnvilGrid, VoxelMaterial, DEPTH, WIDTH};

/// Half-angle of the cone an upset may push metal into, in degrees.
pub const DEFAULT_CONE_DEGREES: f32 = 25.0;

/// The eight horizontal neighbour offsets, row by row.
const NEIGHBOURS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

fn cone_cos(degrees: f32) -> f32 {
    degrees.to_radians().cos()
}

impl AnvilGrid {
    /// Strikes the cell at `pos` from above.
    ///
    /// Does nothing unless the cell is metal above the bottom layer.
    pub fn on_hit(&mut self, pos: VoxelPos) {
        if pos.y <= 0 || self.get(pos) != Some(VoxelMaterial::Metal) {
            return;
        }

        let mut moved = false;
        for (dx, dz) in NEIGHBOURS_8 {
            let n = pos.offset(dx, 0, dz);
            if self.get(n) == Some(VoxelMaterial::Metal) {
                moved |= self.move_voxel_downwards(n, None, 1.0, DEFAULT_CONE_DEGREES);
            }
        }
        if self.get(pos) == Some(VoxelMaterial::Metal) {
            moved |= self.move_voxel_downwards(pos, None, 1.0, DEFAULT_CONE_DEGREES);
        }
        if moved {
            return;
        }

        let mut free_spot = None;
        for (dx, dz) in NEIGHBOURS_8 {
            let near = pos.offset(dx, 0, dz);
            let far = pos.offset(2 * dx, 0, 2 * dz);
            if !Self::contains(far) || self.get(far) != Some(VoxelMaterial::Empty) {
                continue;
            }
            match self.get(near) {
                Some(VoxelMaterial::Metal) => {
                    self.set(near, VoxelMaterial::Empty);
                    self.drop_metal(far);
                }
                Some(VoxelMaterial::Empty) if free_spot.is_none() => free_spot = Some(near),
                _ => {}
            }
        }

        if let Some(spot) = free_spot {
            if self.get(pos) == Some(VoxelMaterial::Metal) {
                self.set(pos, VoxelMaterial::Empty);
                self.drop_metal(spot);
            }
        }
    }

    /// Pushes the metal cell at `pos` sideways towards `towards`, using the
    /// default cone.
    pub fn on_upset(&mut self, pos: VoxelPos, towards: BlockFacing) {
        self.on_upset_within(pos, towards, DEFAULT_CONE_DEGREES);
    }

    /// Pushes the metal cell at `pos` sideways. In order of preference it
    /// slides onto a supported empty neighbour, climbs onto a filled
    /// neighbour when nothing blocks it from behind, or sinks into the
    /// nearest hole below within `cone_degrees` of the push direction.
    pub fn on_upset_within(&mut self, pos: VoxelPos, towards: BlockFacing, cone_degrees: f32) {
        if !towards.is_horizontal() || self.get(pos) != Some(VoxelMaterial::Metal) {
            return;
        }
        let n = pos.step(towards);
        let Some(target) = self.get(n) else {
            return;
        };

        let supported = n.y == 0 || self.get(n.offset(0, -1, 0)) != Some(VoxelMaterial::Empty);
        if target == VoxelMaterial::Empty && supported {
            self.set(pos, VoxelMaterial::Empty);
            self.set(n, VoxelMaterial::Metal);
            return;
        }

        let above = n.offset(0, 1, 0);
        let behind = self.get(pos.step(towards.opposite()));
        if target != VoxelMaterial::Empty
            && self.get(above) == Some(VoxelMaterial::Empty)
            && matches!(behind, None | Some(VoxelMaterial::Empty))
        {
            self.set(pos, VoxelMaterial::Empty);
            self.set(above, VoxelMaterial::Metal);
            return;
        }

        if pos.y > 0 && !self.move_voxel_downwards(pos, Some(towards), 1.0, cone_degrees) {
            self.move_voxel_downwards(pos, Some(towards), 2.0, cone_degrees);
        }
    }

    /// Cuts away the cell at `pos`. Slag takes adjacent slag on the same
    /// layer with it.
    pub fn on_split(&mut self, pos: VoxelPos) {
        match self.get(pos) {
            Some(VoxelMaterial::Metal) => self.set(pos, VoxelMaterial::Empty),
            Some(VoxelMaterial::Slag) => {
                self.set(pos, VoxelMaterial::Empty);
                for (dx, dz) in NEIGHBOURS_8 {
                    let n = pos.offset(dx, 0, dz);
                    if self.get(n) == Some(VoxelMaterial::Slag) {
                        self.set(n, VoxelMaterial::Empty);
                    }
                }
            }
            _ => {}
        }
    }

    /// Moves the cell at `pos` into the nearest hole on a lower layer.
    ///
    /// Layers are tried from `pos.y - 1` downwards. The metal settles into
    /// the lowest empty cell of the target column. Returns true if it moved.
    pub fn move_voxel_downwards(
        &mut self,
        pos: VoxelPos,
        towards: Option<BlockFacing>,
        max_dist: f32,
        cone_degrees: f32,
    ) -> bool {
        for y in (0..pos.y).rev() {
            let origin = VoxelPos::new(pos.x, y, pos.z);
            let Some(target) = self.get_closest_bfs(origin, towards, max_dist, cone_degrees) else {
                continue;
            };

            self.set(pos, VoxelMaterial::Empty);
            if let Some(fill_y) = (0..=target.y)
                .find(|&fy| self.get(VoxelPos::new(target.x, fy, target.z)) == Some(VoxelMaterial::Empty))
            {
                self.set(VoxelPos::new(target.x, fill_y, target.z), VoxelMaterial::Metal);
            }
            return true;
        }
        false
    }

    /// Breadth-first search for the nearest empty cell on the layer of
    /// `origin`.
    ///
    /// Expands through metal only. Cells farther than `max_dist` from the
    /// origin are skipped, as are cells outside the cone around `towards`
    /// when a direction is given.
    #[must_use]
    pub fn get_closest_bfs(
        &self,
        origin: VoxelPos,
        towards: Option<BlockFacing>,
        max_dist: f32,
        cone_degrees: f32,
    ) -> Option<VoxelPos> {
        match self.get(origin)? {
            VoxelMaterial::Empty => return Some(origin),
            VoxelMaterial::Metal => {}
            _ => return None,
        }

        let min_dot = cone_cos(cone_degrees);
        let axis = towards.map(|face| {
            let n = face.normal();
            Vec3::new(n.x as f32, 0.0, n.z as f32)
        });

        let mut visited = [false; WIDTH * DEPTH];
        let slot = |p: VoxelPos| p.x as usize * DEPTH + p.z as usize;
        visited[slot(origin)] = true;

        let mut queue = VecDeque::from([origin]);
        while let Some(node) = queue.pop_front() {
            for face in BlockFacing::HORIZONTALS {
                let next = node.step(face);
                let Some(state) = self.get(next) else {
                    continue;
                };
                if visited[slot(next)] {
                    continue;
                }
                visited[slot(next)] = true;

                let offset = Vec3::new((next.x - origin.x) as f32, 0.0, (next.z - origin.z) as f32);
                let dist = offset.length();
                if dist > max_dist {
                    continue;
                }
                if let Some(axis) = axis {
                    if offset.dot(axis) / dist < min_dot {
                        continue;
                    }
                }

                match state {
                    VoxelMaterial::Empty => return Some(next),
                    VoxelMaterial::Metal => queue.push_back(next),
                    _ => {}
                }
            }
        }
        None
    }

    /// Places metal at `pos`, or one layer lower if that cell is free.
    fn drop_metal(&mut self, pos: VoxelPos) {
        let below = pos.offset(0, -1, 0);
        if self.get(below) == Some(VoxelMaterial::Empty) {
            self.set(below, VoxelMaterial::Metal);
        } else {
            self.set(pos, VoxelMaterial::Metal);
        }
    }
}
