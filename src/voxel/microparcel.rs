//! Greedy decomposition of a tile into uniform boxes
//!
//! The sweep visits voxels with z outermost and x innermost. At every unvisited voxel it grows
//! a box along x, then y (whole rows), then z (whole slabs) while the voxels stay unvisited and
//! share the starting value. Each voxel is claimed exactly once, so the output partitions the
//! input. The result is not guaranteed to be the minimum number of boxes.

use crate::core::types::IVec3;
use crate::math::Parcel;

/// A box of voxels sharing one palette id
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Microparcel {
    pub bounds: Parcel,
    pub value: u32,
}

impl Microparcel {
    pub fn new(bounds: Parcel, value: u32) -> Self {
        Self { bounds, value }
    }
}

/// Flat value grid plus visited bitset, indexed `x + y * sx + z * sx * sy`
struct Grid {
    size_x: usize,
    size_xy: usize,
    values: Vec<u32>,
    visited: Vec<u64>,
}

impl Grid {
    fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.size_x + z * self.size_xy
    }

    fn is_visited(&self, i: usize) -> bool {
        self.visited[i >> 6] & (1 << (i & 63)) != 0
    }

    fn mark(&mut self, i: usize) {
        self.visited[i >> 6] |= 1 << (i & 63);
    }

    /// Voxel is still free and holds `value`
    fn claimable(&self, i: usize, value: u32) -> bool {
        !self.is_visited(i) && self.values[i] == value
    }
}

/// Decompose `parcel` into microparcels using `values` for each absolute voxel position
///
/// Microparcels are returned in sweep order with absolute origins. Intended for tiles (at
/// most 16 per axis) but correct for any size that fits in memory.
pub fn decompose<F>(parcel: &Parcel, mut values: F) -> Vec<Microparcel>
where
    F: FnMut(IVec3) -> u32,
{
    let size = parcel.size();
    let (sx, sy, sz) = (size.x as usize, size.y as usize, size.z as usize);
    let total = sx * sy * sz;
    let origin = parcel.origin();

    let mut grid_values = Vec::with_capacity(total);
    for z in 0..sz {
        for y in 0..sy {
            for x in 0..sx {
                grid_values.push(values(origin + IVec3::new(x as i32, y as i32, z as i32)));
            }
        }
    }

    let mut grid = Grid {
        size_x: sx,
        size_xy: sx * sy,
        values: grid_values,
        visited: vec![0; total.div_ceil(64)],
    };

    let mut result = Vec::new();

    for z in 0..sz {
        for y in 0..sy {
            for x in 0..sx {
                let start = grid.idx(x, y, z);
                if grid.is_visited(start) {
                    continue;
                }
                let value = grid.values[start];

                let mut end_x = x + 1;
                while end_x < sx && grid.claimable(grid.idx(end_x, y, z), value) {
                    end_x += 1;
                }

                let mut end_y = y + 1;
                while end_y < sy
                    && (x..end_x).all(|cx| grid.claimable(grid.idx(cx, end_y, z), value))
                {
                    end_y += 1;
                }

                let mut end_z = z + 1;
                while end_z < sz
                    && (y..end_y).all(|cy| {
                        (x..end_x).all(|cx| grid.claimable(grid.idx(cx, cy, end_z), value))
                    })
                {
                    end_z += 1;
                }

                for cz in z..end_z {
                    for cy in y..end_y {
                        for cx in x..end_x {
                            let i = grid.idx(cx, cy, cz);
                            grid.mark(i);
                        }
                    }
                }

                let local = IVec3::new(x as i32, y as i32, z as i32);
                let local_end = IVec3::new(end_x as i32, end_y as i32, end_z as i32);
                result.push(Microparcel::new(
                    Parcel::from_bounds(origin + local, origin + local_end),
                    value,
                ));
            }
        }
    }

    result
}
