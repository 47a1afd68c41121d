//! Anchor-aligned partition of a region into tiles of at most 16 voxels per axis

use crate::core::types::IVec3;
use crate::math::Parcel;

/// Tile edge length in voxels
pub const TILE_SIZE: i32 = 16;

/// A tile of a larger region; extents never exceed [`TILE_SIZE`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    pub bounds: Parcel,
}

impl Tile {
    pub fn new(bounds: Parcel) -> Self {
        debug_assert!(bounds.size().cmple(IVec3::splat(TILE_SIZE)).all());
        Self { bounds }
    }

    /// Grid coordinate of this tile relative to `anchor`, in units of [`TILE_SIZE`]
    ///
    /// Uses floor division so tiles clipped on the negative side of the anchor still land in
    /// their own grid cell.
    pub fn coord(&self, anchor: IVec3) -> IVec3 {
        (self.bounds.origin() - anchor).div_euclid(IVec3::splat(TILE_SIZE))
    }

    /// Convert an absolute position inside this tile to tile-local coordinates
    pub fn to_local(&self, pos: IVec3) -> IVec3 {
        pos - self.bounds.origin()
    }
}

/// Largest grid point `<= value` congruent to `anchor` modulo 16
pub fn floor_to_grid(anchor: i32, value: i32) -> i32 {
    value - (value - anchor).rem_euclid(TILE_SIZE)
}

/// Smallest grid point `> value` congruent to `anchor` modulo 16
pub fn ceil_to_grid(anchor: i32, value: i32) -> i32 {
    floor_to_grid(anchor, value) + TILE_SIZE
}

/// Division points of the line `[origin, origin + size)`, ascending
///
/// The first point is `origin`, the last is `origin + size`, interior points lie on the grid
/// anchored at `anchor`.
pub fn divide_1d(origin: i32, size: i32, anchor: i32) -> Vec<i32> {
    let end = origin + size;
    let mut divisions = Vec::with_capacity((size / TILE_SIZE + 2) as usize);

    divisions.push(origin);
    let mut current = ceil_to_grid(anchor, origin);
    while current < end {
        divisions.push(current);
        current += TILE_SIZE;
    }
    divisions.push(end);

    divisions
}

/// Split `region` into anchor-aligned tiles, x outermost, z innermost
pub fn subdivide(region: &Parcel, anchor: IVec3) -> Vec<Tile> {
    let xs = divide_1d(region.min_x(), region.size().x, anchor.x);
    let ys = divide_1d(region.min_y(), region.size().y, anchor.y);
    let zs = divide_1d(region.min_z(), region.size().z, anchor.z);

    let mut tiles = Vec::with_capacity((xs.len() - 1) * (ys.len() - 1) * (zs.len() - 1));
    for x in xs.windows(2) {
        let (start_x, end_x) = (x[0].max(region.min_x()), x[1].min(region.end_x()));
        if start_x >= end_x {
            continue;
        }
        for y in ys.windows(2) {
            let (start_y, end_y) = (y[0].max(region.min_y()), y[1].min(region.end_y()));
            if start_y >= end_y {
                continue;
            }
            for z in zs.windows(2) {
                let (start_z, end_z) = (z[0].max(region.min_z()), z[1].min(region.end_z()));
                if start_z >= end_z {
                    continue;
                }
                tiles.push(Tile::new(Parcel::from_bounds(
                    IVec3::new(start_x, start_y, start_z),
                    IVec3::new(end_x, end_y, end_z),
                )));
            }
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::assert_partition;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_floor_to_grid() {
        assert_eq!(floor_to_grid(0, -1), -16);
        assert_eq!(floor_to_grid(0, 0), 0);
        assert_eq!(floor_to_grid(0, 15), 0);
        assert_eq!(floor_to_grid(0, 16), 16);
        assert_eq!(floor_to_grid(0, 17), 16);
        assert_eq!(floor_to_grid(1, 1), 1);
        assert_eq!(floor_to_grid(1, 0), -15);
        assert_eq!(floor_to_grid(32, 1), 0);
        assert_eq!(floor_to_grid(33, 0), -15);
        assert_eq!(floor_to_grid(-32, 0), 0);
        assert_eq!(floor_to_grid(-30, 17), 2);
    }

    #[test]
    fn test_ceil_to_grid() {
        assert_eq!(ceil_to_grid(0, -1), 0);
        assert_eq!(ceil_to_grid(0, 0), 16);
        assert_eq!(ceil_to_grid(0, 15), 16);
        assert_eq!(ceil_to_grid(0, 16), 32);
        assert_eq!(ceil_to_grid(1, 1), 17);
        assert_eq!(ceil_to_grid(1, 0), 1);
        assert_eq!(ceil_to_grid(33, 0), 1);
        assert_eq!(ceil_to_grid(-30, 17), 18);
    }

    #[test]
    fn test_divide_1d() {
        assert_eq!(divide_1d(0, 1, 0), vec![0, 1]);
        assert_eq!(divide_1d(0, 1, -5), vec![0, 1]);
        assert_eq!(divide_1d(5, 1, 0), vec![5, 6]);
        assert_eq!(divide_1d(0, 37, 0), vec![0, 16, 32, 37]);
        assert_eq!(divide_1d(0, 16, 0), vec![0, 16]);
        assert_eq!(divide_1d(0, 16, 16), vec![0, 16]);
        assert_eq!(divide_1d(0, 17, 16), vec![0, 16, 17]);
        assert_eq!(divide_1d(0, 17, 17), vec![0, 1, 17]);
        assert_eq!(divide_1d(-2, 17, 17), vec![-2, 1, 15]);
    }

    #[test]
    fn test_divide_1d_random() {
        let mut rng = StdRng::seed_from_u64(12138);
        for _ in 0..10_000 {
            let origin = rng.gen_range(-1000..1000);
            let size = rng.gen_range(1..1000);
            let anchor = rng.gen_range(-100..100);

            let d = divide_1d(origin, size, anchor);
            assert!(d.windows(2).all(|w| w[0] < w[1]), "{:?}", d);
            assert!(d.windows(2).all(|w| w[1] - w[0] <= TILE_SIZE));
            assert_eq!(d[d.len() - 1] - d[0], size);
            for &p in &d[1..d.len() - 1] {
                assert_eq!((p - anchor).rem_euclid(TILE_SIZE), 0);
            }
        }
    }

    #[test]
    fn test_single_aligned_tile() {
        let region = Parcel::new(IVec3::ZERO, IVec3::splat(16)).unwrap();
        let tiles = subdivide(&region, IVec3::ZERO);
        assert_eq!(tiles, vec![Tile::new(region)]);
    }

    #[test]
    fn test_misaligned_anchor_splits_into_eight() {
        let region = Parcel::new(IVec3::ZERO, IVec3::splat(16)).unwrap();
        let tiles = subdivide(&region, IVec3::new(4, 5, 6));
        assert_eq!(tiles.len(), 8);
        assert_partition(&region, tiles.iter().map(|t| t.bounds));
    }

    #[test]
    fn test_tile_coord() {
        let t = Tile::new(Parcel::new(IVec3::new(3, 4, 5), IVec3::new(3, 4, 5)).unwrap());
        assert_eq!(t.coord(IVec3::ZERO), IVec3::ZERO);

        let t = Tile::new(Parcel::new(IVec3::new(-3, -4, -5), IVec3::new(3, 4, 5)).unwrap());
        assert_eq!(t.coord(IVec3::ZERO), IVec3::splat(-1));

        let t = Tile::new(Parcel::new(IVec3::new(16, -16, 32), IVec3::ONE).unwrap());
        assert_eq!(t.coord(IVec3::ZERO), IVec3::new(1, -1, 2));
        assert_eq!(t.coord(IVec3::splat(1)), IVec3::new(0, -2, 1));
    }

    #[test]
    fn test_subdivide_random_regions() {
        let mut rng = StdRng::seed_from_u64(12138);
        for _ in 0..300 {
            let origin = IVec3::new(
                rng.gen_range(-1000..1000),
                rng.gen_range(-1000..1000),
                rng.gen_range(-1000..1000),
            );
            let size = IVec3::new(rng.gen_range(1..50), rng.gen_range(1..50), rng.gen_range(1..50));
            let anchor = IVec3::new(
                rng.gen_range(-100..100),
                rng.gen_range(-100..100),
                rng.gen_range(-100..100),
            );
            let region = Parcel::new(origin, size).unwrap();
            let tiles = subdivide(&region, anchor);

            assert_partition(&region, tiles.iter().map(|t| t.bounds));
            for tile in &tiles {
                assert!(tile.bounds.size().cmple(IVec3::splat(TILE_SIZE)).all());
            }

            // distinct tiles never share a grid cell
            let mut coords: Vec<_> = tiles.iter().map(|t| t.coord(anchor).to_array()).collect();
            coords.sort();
            coords.dedup();
            assert_eq!(coords.len(), tiles.len());
        }
    }
}
