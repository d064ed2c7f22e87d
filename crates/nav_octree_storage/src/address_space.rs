//! Storage of `OctreeNode` records.
//!
//! A `SparseOctree` owns no nodes itself. Every record lives in an `AddressSpace`, which hands out integer `NodeAddress`es,
//! takes them back when a subtree collapses, and reads and writes whole records by address. Any store that satisfies the
//! contract documented on the trait can back an octree; this crate provides:
//!
//!   - `SlabAddressSpace`: an in-memory arena with a free list
//!   - `SledAddressSpace`: a persistent store on top of a `sled::Tree` (requires the `sled` feature)

pub mod arena;
#[cfg(feature = "sled")]
pub mod sled_store;

pub use self::arena::*;
#[cfg(feature = "sled")]
pub use self::sled_store::*;

use crate::node::OctreeNode;

use auto_impl::auto_impl;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque handle to a node record inside of an `AddressSpace`.
///
/// Addresses are recycled after a node is collapsed into its parent, so the same address can name different nodes over
/// time. Never hold on to an address across a mutation of the octree.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct NodeAddress(pub u64);

impl NodeAddress {
    /// The root address used by the stores in this crate.
    pub const ROOT: Self = NodeAddress(0);

    /// Reinterprets the bits of a node slot as an address.
    #[inline]
    pub fn from_slot(slot: i64) -> Self {
        NodeAddress(slot as u64)
    }

    /// Reinterprets this address as the bits of a node slot.
    #[inline]
    pub fn to_slot(self) -> i64 {
        self.0 as i64
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Persistent storage and allocation of node records.
///
/// The octree relies on the following contract:
///
///   - `node` returns exactly the record last written to `address` by `set_node`.
///   - `set_node` overwrites the whole record. `depth` is the depth of the node in the tree; stores may use it to choose a
///     layout, but it carries no meaning for the octree.
///   - `root_address` is the same for the entire lifetime of the store, and the root record always exists.
///   - `rent_address` returns an address that is not in use, and whose record reads as `OctreeNode::EMPTY` until written.
///   - After `return_address`, the octree never touches that address again until it is handed out by a later
///     `rent_address`.
///   - Calls are never concurrent. A store shared between threads must provide exclusive access itself.
///
/// The octree does not retry failed calls. Renting and returning addresses while rewriting the tree is not atomic, so a
/// store that needs crash consistency must provide it underneath this interface.
#[auto_impl(&mut, Box)]
pub trait AddressSpace {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reads the record at `address`.
    fn node(&self, address: NodeAddress) -> Result<OctreeNode, Self::Error>;

    /// Overwrites the record at `address`.
    fn set_node(
        &mut self,
        address: NodeAddress,
        depth: usize,
        node: &OctreeNode,
    ) -> Result<(), Self::Error>;

    fn root_address(&self) -> NodeAddress;

    /// Allocates an address for a new node.
    fn rent_address(&mut self) -> Result<NodeAddress, Self::Error>;

    /// Releases `address` for reuse.
    fn return_address(&mut self, address: NodeAddress) -> Result<(), Self::Error>;

    /// Makes all previous writes durable, if the store supports durability.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
