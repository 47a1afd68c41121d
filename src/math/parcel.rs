//! Integer axis-aligned boxes of voxels

use std::fmt;

use crate::core::types::{IVec3, Result};
use crate::core::Error;

/// Axis-aligned box of voxels defined by an origin and a strictly positive size
///
/// `end` is exclusive, `max` is inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Parcel {
    origin: IVec3,
    size: IVec3,
}

impl Parcel {
    /// Create a parcel from origin and size; every size component must be positive
    pub fn new(origin: IVec3, size: IVec3) -> Result<Self> {
        if size.x <= 0 || size.y <= 0 || size.z <= 0 {
            return Err(Error::InvalidGeometry(format!(
                "parcel size must be positive on every axis, got {}",
                size
            )));
        }
        Ok(Self { origin, size })
    }

    /// Create a parcel spanning two inclusive corners given in any order
    pub fn from_corners(a: IVec3, b: IVec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self {
            origin: min,
            size: max - min + IVec3::ONE,
        }
    }

    /// Create a parcel from an inclusive `start..=end` pair
    ///
    /// Unlike [`Parcel::from_corners`], `end` must not be below `start` on any axis.
    pub fn from_inclusive(start: IVec3, end: IVec3) -> Result<Self> {
        Self::new(start, end - start + IVec3::ONE)
    }

    /// Parcel built from already-validated bounds
    pub(crate) fn from_bounds(origin: IVec3, end: IVec3) -> Self {
        debug_assert!(end.cmpgt(origin).all());
        Self {
            origin,
            size: end - origin,
        }
    }

    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    pub fn size(&self) -> IVec3 {
        self.size
    }

    /// Exclusive upper corner
    pub fn end(&self) -> IVec3 {
        self.origin + self.size
    }

    /// Inclusive upper corner
    pub fn max(&self) -> IVec3 {
        self.end() - IVec3::ONE
    }

    pub fn min_x(&self) -> i32 {
        self.origin.x
    }

    pub fn min_y(&self) -> i32 {
        self.origin.y
    }

    pub fn min_z(&self) -> i32 {
        self.origin.z
    }

    pub fn end_x(&self) -> i32 {
        self.origin.x + self.size.x
    }

    pub fn end_y(&self) -> i32 {
        self.origin.y + self.size.y
    }

    pub fn end_z(&self) -> i32 {
        self.origin.z + self.size.z
    }

    /// Number of voxels
    pub fn volume(&self) -> i64 {
        self.size.x as i64 * self.size.y as i64 * self.size.z as i64
    }

    /// Check if a voxel position lies inside
    pub fn contains(&self, p: IVec3) -> bool {
        p.cmpge(self.origin).all() && p.cmplt(self.end()).all()
    }

    /// Check if another parcel lies entirely inside this one
    pub fn contains_parcel(&self, other: &Parcel) -> bool {
        other.origin.cmpge(self.origin).all() && other.end().cmple(self.end()).all()
    }

    /// Check if two parcels share at least one voxel
    pub fn intersects(&self, other: &Parcel) -> bool {
        self.origin.cmplt(other.end()).all() && other.origin.cmplt(self.end()).all()
    }

    /// Same parcel moved by `offset`
    pub fn translated(&self, offset: IVec3) -> Self {
        Self {
            origin: self.origin + offset,
            size: self.size,
        }
    }

    /// Iterate voxel positions with x outermost and z innermost
    pub fn voxels(&self) -> impl Iterator<Item = IVec3> + '_ {
        let (o, e) = (self.origin, self.end());
        (o.x..e.x).flat_map(move |x| {
            (o.y..e.y).flat_map(move |y| (o.z..e.z).map(move |z| IVec3::new(x, y, z)))
        })
    }
}

impl fmt::Display for Parcel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parcel[origin=({}, {}, {}), size=({}, {}, {})]",
            self.origin.x, self.origin.y, self.origin.z, self.size.x, self.size.y, self.size.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let p = Parcel::new(IVec3::new(1, 2, 3), IVec3::new(4, 5, 6)).unwrap();
        assert_eq!(p.end(), IVec3::new(5, 7, 9));
        assert_eq!(p.max(), IVec3::new(4, 6, 8));
        assert_eq!(p.volume(), 120);
        assert_eq!(p.end_y(), 7);
    }

    #[test]
    fn test_rejects_non_positive_size() {
        for size in [IVec3::new(0, 1, 1), IVec3::new(1, -1, 1), IVec3::new(1, 1, 0)] {
            assert!(matches!(
                Parcel::new(IVec3::ZERO, size),
                Err(Error::InvalidGeometry(_))
            ));
        }
    }

    #[test]
    fn test_from_corners_any_order() {
        let a = Parcel::from_corners(IVec3::new(3, -2, 5), IVec3::new(0, 4, 5));
        let b = Parcel::from_corners(IVec3::new(0, 4, 5), IVec3::new(3, -2, 5));
        assert_eq!(a, b);
        assert_eq!(a.origin(), IVec3::new(0, -2, 5));
        assert_eq!(a.size(), IVec3::new(4, 7, 1));
    }

    #[test]
    fn test_from_inclusive() {
        let p = Parcel::from_inclusive(IVec3::ZERO, IVec3::splat(15)).unwrap();
        assert_eq!(p.size(), IVec3::splat(16));
        assert!(Parcel::from_inclusive(IVec3::ONE, IVec3::ZERO).is_err());
    }

    #[test]
    fn test_contains_and_intersects() {
        let p = Parcel::new(IVec3::ZERO, IVec3::splat(4)).unwrap();
        assert!(p.contains(IVec3::splat(3)));
        assert!(!p.contains(IVec3::splat(4)));
        assert!(!p.contains(IVec3::new(-1, 0, 0)));

        let q = Parcel::new(IVec3::splat(3), IVec3::splat(2)).unwrap();
        let r = Parcel::new(IVec3::splat(4), IVec3::splat(2)).unwrap();
        assert!(p.intersects(&q));
        assert!(!p.intersects(&r));
        assert!(!p.contains_parcel(&q));
        assert!(p.contains_parcel(&Parcel::new(IVec3::ONE, IVec3::ONE).unwrap()));
    }

    #[test]
    fn test_voxels_order() {
        let p = Parcel::new(IVec3::ZERO, IVec3::new(2, 1, 2)).unwrap();
        let v: Vec<_> = p.voxels().collect();
        assert_eq!(
            v,
            vec![
                IVec3::new(0, 0, 0),
                IVec3::new(0, 0, 1),
                IVec3::new(1, 0, 0),
                IVec3::new(1, 0, 1),
            ]
        );
    }
}
