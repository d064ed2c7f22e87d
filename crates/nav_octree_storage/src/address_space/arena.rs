use super::{AddressSpace, NodeAddress};

use crate::node::OctreeNode;

use core::convert::TryFrom;
use slab::Slab;
use thiserror::Error;

/// An in-memory `AddressSpace`. Nodes live in a `Slab`, so an address is just a slab key, and the slab's free list recycles
/// the addresses of collapsed nodes. The most recently returned address is the next one rented.
#[derive(Clone, Debug)]
pub struct SlabAddressSpace {
    nodes: Slab<OctreeNode>,
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SlabError {
    #[error("no node is stored at address {0}")]
    UnknownAddress(NodeAddress),
    #[error("the root node cannot be returned")]
    ReturnedRoot,
}

impl Default for SlabAddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl SlabAddressSpace {
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Preallocates room for `capacity` nodes, including the root.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Slab::with_capacity(capacity.max(1));
        let root_key = nodes.insert(OctreeNode::EMPTY);
        debug_assert_eq!(root_key as u64, NodeAddress::ROOT.0);

        Self { nodes }
    }

    /// The number of nodes in use, including the root.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The addresses of all nodes in use, in ascending order.
    pub fn addresses(&self) -> impl Iterator<Item = NodeAddress> + '_ {
        self.nodes.iter().map(|(key, _)| NodeAddress(key as u64))
    }

    fn key(address: NodeAddress) -> Result<usize, SlabError> {
        usize::try_from(address.0).map_err(|_| SlabError::UnknownAddress(address))
    }
}

impl AddressSpace for SlabAddressSpace {
    type Error = SlabError;

    #[inline]
    fn node(&self, address: NodeAddress) -> Result<OctreeNode, SlabError> {
        self.nodes
            .get(Self::key(address)?)
            .copied()
            .ok_or(SlabError::UnknownAddress(address))
    }

    #[inline]
    fn set_node(
        &mut self,
        address: NodeAddress,
        _depth: usize,
        node: &OctreeNode,
    ) -> Result<(), SlabError> {
        let slot = self
            .nodes
            .get_mut(Self::key(address)?)
            .ok_or(SlabError::UnknownAddress(address))?;
        *slot = *node;

        Ok(())
    }

    #[inline]
    fn root_address(&self) -> NodeAddress {
        NodeAddress::ROOT
    }

    #[inline]
    fn rent_address(&mut self) -> Result<NodeAddress, SlabError> {
        let key = self.nodes.insert(OctreeNode::EMPTY);
        tracing::trace!(address = key, "rented slab node");

        Ok(NodeAddress(key as u64))
    }

    #[inline]
    fn return_address(&mut self, address: NodeAddress) -> Result<(), SlabError> {
        if address == NodeAddress::ROOT {
            return Err(SlabError::ReturnedRoot);
        }
        let key = Self::key(address)?;
        if !self.nodes.contains(key) {
            return Err(SlabError::UnknownAddress(address));
        }
        self.nodes.remove(key);
        tracing::trace!(address = key, "returned slab node");

        Ok(())
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod tests {
    use super::*;

    use nav_octree_core::Octant;
    use pretty_assertions::assert_eq;

    #[test]
    fn root_exists_from_the_start() {
        let space = SlabAddressSpace::new();

        assert_eq!(space.root_address(), NodeAddress::ROOT);
        assert_eq!(space.node(NodeAddress::ROOT), Ok(OctreeNode::EMPTY));
        assert_eq!(space.num_nodes(), 1);
    }

    #[test]
    fn returned_address_is_rented_next_with_empty_record() {
        let mut space = SlabAddressSpace::new();

        let a = space.rent_address().unwrap();
        let b = space.rent_address().unwrap();
        assert_eq!((a, b), (NodeAddress(1), NodeAddress(2)));

        space
            .set_node(a, 1, &OctreeNode::filled_with_value(5))
            .unwrap();
        space.return_address(a).unwrap();
        assert_eq!(space.node(a), Err(SlabError::UnknownAddress(a)));

        let c = space.rent_address().unwrap();
        assert_eq!(c, a);
        assert_eq!(space.node(c), Ok(OctreeNode::EMPTY));
        assert_eq!(
            space.addresses().collect::<Vec<_>>(),
            vec![NodeAddress::ROOT, a, b]
        );
    }

    #[test]
    fn invalid_addresses_are_errors() {
        let mut space = SlabAddressSpace::new();
        let mut node = OctreeNode::EMPTY;
        node.set_child_value(Octant::ALL[0], 1);

        assert_eq!(
            space.set_node(NodeAddress(9), 1, &node),
            Err(SlabError::UnknownAddress(NodeAddress(9)))
        );
        assert_eq!(
            space.return_address(NodeAddress(9)),
            Err(SlabError::UnknownAddress(NodeAddress(9)))
        );
        assert_eq!(
            space.return_address(NodeAddress::ROOT),
            Err(SlabError::ReturnedRoot)
        );
    }

    #[test]
    fn mutable_reference_is_an_address_space() {
        fn rent_twice(mut space: impl AddressSpace) -> NodeAddress {
            space.rent_address().unwrap();
            space.rent_address().unwrap()
        }

        let mut space = SlabAddressSpace::new();
        assert_eq!(rent_twice(&mut space), NodeAddress(2));
        assert_eq!(space.num_nodes(), 3);
    }
}
