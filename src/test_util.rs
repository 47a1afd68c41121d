//! Shared assertions for unit tests

use std::collections::HashSet;

use crate::core::types::IVec3;
use crate::math::Parcel;

/// Assert that `parts` cover every voxel of `whole` exactly once and nothing outside it
pub fn assert_partition(whole: &Parcel, parts: impl IntoIterator<Item = Parcel>) {
    let mut seen: HashSet<IVec3> = HashSet::new();
    for part in parts {
        assert!(whole.contains_parcel(&part), "{} sticks out of {}", part, whole);
        for voxel in part.voxels() {
            assert!(seen.insert(voxel), "voxel {} covered twice", voxel);
        }
    }
    assert_eq!(seen.len() as i64, whole.volume(), "gaps in cover of {}", whole);
}
