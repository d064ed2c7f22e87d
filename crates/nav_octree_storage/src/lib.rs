#![allow(clippy::too_many_arguments)]

//! A sparse octree that maps points of a bounded cubic field to `i64` values, subdividing space only where values differ.
//!
//! The pieces are:
//!   - `SparseOctree`: the insert/lookup engine, generic over where its nodes live
//!   - `OctreeNode`: the compact 72-byte node record
//!   - `AddressSpace`: the storage contract for node records, with the in-memory `SlabAddressSpace` and the persistent
//!     `SledAddressSpace` (behind the `sled` feature)
//!   - `OctreeSettings`: the field size and resolution, loadable from TOML

pub mod address_space;
pub mod error;
pub mod node;
pub mod octree;
pub mod settings;

pub use address_space::*;
pub use error::*;
pub use node::*;
pub use octree::*;
pub use settings::*;

pub mod prelude {
    pub use super::{
        AddressSpace, Child, NodeAddress, OctreeError, OctreeLeaf, OctreeNode, OctreeSettings,
        OctreeVisitor, SlabAddressSpace, SparseOctree, VisitStatus,
    };

    #[cfg(feature = "sled")]
    pub use super::SledAddressSpace;
}
