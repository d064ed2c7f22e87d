//! The fixed-size record stored for every branch of a `SparseOctree`.
//!
//! An `OctreeNode` has 8 child slots of 64 bits each. A slot is either empty, a value, or the `NodeAddress` of a child
//! node. Rather than tagging every slot, the record keeps two bitmasks with one bit per slot: one bit says "this slot is a
//! node", the other says "this slot is a value". A slot with neither bit set is empty, and a slot never has both bits set.
//! This keeps the record at 72 bytes, which matters when millions of them are paged from disk.
//!
//! The bitmasks are an encoding detail. Readers see each slot as a `Child`.

use crate::address_space::NodeAddress;

use nav_octree_core::Octant;

use bytemuck::{Pod, Zeroable};

/// The decoded contents of one child slot.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Child {
    /// No data has been written in this octant.
    Empty,
    /// The whole octant has this value.
    Value(i64),
    /// The octant is subdivided by the node at this address.
    Node(NodeAddress),
}

type ChildBitMask = u8;

/// A single branch of the octree. See the module docs for the encoding.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Pod, Zeroable)]
pub struct OctreeNode {
    is_node_flags: ChildBitMask,
    is_value_flags: ChildBitMask,
    _padding: [u8; 6],
    children: [i64; 8],
}

/// Size of an encoded `OctreeNode` in bytes.
pub const NODE_RECORD_SIZE: usize = std::mem::size_of::<OctreeNode>();

impl OctreeNode {
    /// A node with all 8 slots empty.
    pub const EMPTY: Self = Self {
        is_node_flags: 0,
        is_value_flags: 0,
        _padding: [0; 6],
        children: [0; 8],
    };

    /// A node with all 8 slots holding `value`.
    #[inline]
    pub fn filled_with_value(value: i64) -> Self {
        let mut node = Self::EMPTY;
        node.fill_with_value(value);

        node
    }

    #[inline]
    pub fn child(&self, octant: Octant) -> Child {
        let i = octant.index();
        if self.is_node(octant) {
            Child::Node(NodeAddress::from_slot(self.children[i]))
        } else if self.is_value(octant) {
            Child::Value(self.children[i])
        } else {
            Child::Empty
        }
    }

    /// All 8 slots in octant order.
    pub fn children(&self) -> impl Iterator<Item = (Octant, Child)> + '_ {
        Octant::ALL
            .iter()
            .map(move |&octant| (octant, self.child(octant)))
    }

    #[inline]
    pub fn is_node(&self, octant: Octant) -> bool {
        self.is_node_flags & bit(octant) != 0
    }

    #[inline]
    pub fn is_value(&self, octant: Octant) -> bool {
        self.is_value_flags & bit(octant) != 0
    }

    /// Returns `true` iff every slot is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_node_flags == 0 && self.is_value_flags == 0
    }

    /// Makes `octant` a value slot holding `value`. Returns `false` iff it already held exactly that value.
    #[inline]
    pub fn set_child_value(&mut self, octant: Octant, value: i64) -> bool {
        if self.child(octant) == Child::Value(value) {
            return false;
        }

        let b = bit(octant);
        self.is_node_flags &= !b;
        self.is_value_flags |= b;
        self.children[octant.index()] = value;

        true
    }

    /// Makes `octant` point at the child node `address`.
    #[inline]
    pub fn set_child_node(&mut self, octant: Octant, address: NodeAddress) {
        let b = bit(octant);
        self.is_value_flags &= !b;
        self.is_node_flags |= b;
        self.children[octant.index()] = address.to_slot();
    }

    #[inline]
    pub fn clear_child(&mut self, octant: Octant) {
        let b = bit(octant);
        self.is_node_flags &= !b;
        self.is_value_flags &= !b;
        self.children[octant.index()] = 0;
    }

    /// Overwrites all 8 slots with `value`.
    #[inline]
    pub fn fill_with_value(&mut self, value: i64) {
        self.is_node_flags = 0;
        self.is_value_flags = ChildBitMask::MAX;
        self.children = [value; 8];
    }

    /// If all 8 slots hold the same value, then this node carries no more information than that value and it can be
    /// collapsed into its parent's slot.
    #[inline]
    pub fn uniform_value(&self) -> Option<i64> {
        if self.is_value_flags != ChildBitMask::MAX {
            return None;
        }

        let first = self.children[0];
        if self.children[1..].iter().all(|&c| c == first) {
            Some(first)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_optimizable(&self) -> bool {
        self.uniform_value().is_some()
    }

    /// The raw record. The encoding uses native endianness, so it is only portable between machines of the same
    /// endianness.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Decodes a record written by `as_bytes`. Returns `None` if `bytes` has the wrong length or some slot is flagged as both
    /// a node and a value.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != NODE_RECORD_SIZE {
            return None;
        }

        let mut node = Self::EMPTY;
        bytemuck::bytes_of_mut(&mut node).copy_from_slice(bytes);

        if node.is_node_flags & node.is_value_flags != 0 {
            return None;
        }

        Some(node)
    }
}

#[inline]
fn bit(octant: Octant) -> ChildBitMask {
    1 << octant.index()
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
