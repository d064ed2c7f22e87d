//! A sparse octree that maps 3D coordinates of a bounded cubic field to 64-bit values. It is meant for navigation and voxel
//! data, like tagging traversability or cost at sub-meter resolution over tens of kilometers, where dense storage would be
//! prohibitive.
//!
//! This library is organized into two crates:
//! - **core**: float points, octant addressing, and the per-depth offset table
//! - **storage**: node records, the `AddressSpace` storage contract and its implementations, and the `SparseOctree` itself
//!
//! ```
//! use nav_octree::prelude::*;
//!
//! let mut octree = SparseOctree::new(OctreeSettings::default(), SlabAddressSpace::new()).unwrap();
//! octree.set(PointN([14.0, 0.25, 50.4]), 1234).unwrap();
//!
//! assert_eq!(octree.get(PointN([14.0, 0.25, 50.4])).unwrap(), Some(1234));
//! ```

pub use nav_octree_core as core;
pub use nav_octree_storage as storage;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::storage::prelude::*;
}
