use super::{AddressSpace, NodeAddress};

use crate::node::OctreeNode;

pub use sled;

use core::convert::TryInto;
use sled::{Db, Tree};
use thiserror::Error;

/// A persistent `AddressSpace` backed by the `sled` crate.
///
/// A store named `name` occupies three trees of a `sled::Db`:
///
///   - `{name}/nodes`: node records keyed by the big-endian bytes of their address
///   - `{name}/free`: the returned addresses that will be reused by `rent_address`
///   - `{name}/meta`: the next never-used address
///
/// Records are encoded with `OctreeNode::as_bytes`, so the store is only portable between machines of the same endianness.
///
/// Writes are not transactional across trees. A crash between returning an address and rewriting the parent node can leak
/// or double-book that address.
pub struct SledAddressSpace {
    nodes: Tree,
    free: Tree,
    meta: Tree,
    free_list: Vec<NodeAddress>,
    next_address: u64,
}

#[derive(Debug, Error)]
pub enum SledStoreError {
    #[error("sled database failure")]
    Sled(#[from] sled::Error),
    #[error("no node is stored at address {0}")]
    UnknownAddress(NodeAddress),
    #[error("the record at address {0} is corrupt")]
    CorruptRecord(NodeAddress),
    #[error("the store metadata is corrupt")]
    CorruptMetadata,
    #[error("the root node cannot be returned")]
    ReturnedRoot,
}

const NEXT_ADDRESS_KEY: &[u8] = b"next_address";

impl SledAddressSpace {
    /// Opens the store called `name` in `db`, creating an empty root node if the store does not exist yet.
    pub fn open(db: &Db, name: &str) -> Result<Self, SledStoreError> {
        let nodes = db.open_tree(format!("{}/nodes", name))?;
        let free = db.open_tree(format!("{}/free", name))?;
        let meta = db.open_tree(format!("{}/meta", name))?;

        let next_address = match meta.get(NEXT_ADDRESS_KEY)? {
            Some(bytes) => decode_address(&bytes)
                .ok_or(SledStoreError::CorruptMetadata)?
                .0,
            None => {
                nodes.insert(encode_address(NodeAddress::ROOT), OctreeNode::EMPTY.as_bytes())?;
                let next = NodeAddress::ROOT.0 + 1;
                meta.insert(NEXT_ADDRESS_KEY, &encode_address(NodeAddress(next))[..])?;
                next
            }
        };

        let mut free_list = Vec::new();
        for key in free.iter().keys() {
            let key = key?;
            free_list.push(decode_address(&key).ok_or(SledStoreError::CorruptMetadata)?);
        }

        tracing::debug!(
            store = name,
            next_address,
            free_addresses = free_list.len(),
            "opened sled address space"
        );

        Ok(Self {
            nodes,
            free,
            meta,
            free_list,
            next_address,
        })
    }

    /// The number of nodes in use, including the root.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes_tree(&self) -> &Tree {
        &self.nodes
    }
}

impl AddressSpace for SledAddressSpace {
    type Error = SledStoreError;

    fn node(&self, address: NodeAddress) -> Result<OctreeNode, SledStoreError> {
        let bytes = self
            .nodes
            .get(encode_address(address))?
            .ok_or(SledStoreError::UnknownAddress(address))?;

        OctreeNode::from_bytes(&bytes).ok_or(SledStoreError::CorruptRecord(address))
    }

    fn set_node(
        &mut self,
        address: NodeAddress,
        depth: usize,
        node: &OctreeNode,
    ) -> Result<(), SledStoreError> {
        tracing::trace!(%address, depth, "writing sled node");
        self.nodes.insert(encode_address(address), node.as_bytes())?;

        Ok(())
    }

    fn root_address(&self) -> NodeAddress {
        NodeAddress::ROOT
    }

    fn rent_address(&mut self) -> Result<NodeAddress, SledStoreError> {
        let address = if let Some(address) = self.free_list.pop() {
            self.free.remove(encode_address(address))?;
            address
        } else {
            let address = NodeAddress(self.next_address);
            self.next_address += 1;
            self.meta.insert(
                NEXT_ADDRESS_KEY,
                &encode_address(NodeAddress(self.next_address))[..],
            )?;
            address
        };
        self.nodes
            .insert(encode_address(address), OctreeNode::EMPTY.as_bytes())?;

        Ok(address)
    }

    fn return_address(&mut self, address: NodeAddress) -> Result<(), SledStoreError> {
        if address == NodeAddress::ROOT {
            return Err(SledStoreError::ReturnedRoot);
        }
        if self.nodes.remove(encode_address(address))?.is_none() {
            return Err(SledStoreError::UnknownAddress(address));
        }
        let empty: &[u8] = &[];
        self.free.insert(encode_address(address), empty)?;
        self.free_list.push(address);

        Ok(())
    }

    fn flush(&mut self) -> Result<(), SledStoreError> {
        let bytes = self.nodes.flush()?;
        tracing::debug!(bytes, "flushed sled address space");

        Ok(())
    }
}

fn encode_address(address: NodeAddress) -> [u8; 8] {
    address.0.to_be_bytes()
}

fn decode_address(bytes: &[u8]) -> Option<NodeAddress> {
    let bytes: [u8; 8] = bytes.try_into().ok()?;

    Some(NodeAddress(u64::from_be_bytes(bytes)))
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    use nav_octree_core::Octant;
    use pretty_assertions::assert_eq;

    fn temporary_db() -> sled::Result<Db> {
        sled::Config::default()
            .temporary(true)
            .use_compression(false)
            .mode(sled::Mode::LowSpace)
            .open()
    }

    #[test]
    fn new_store_has_empty_root() -> Result<(), SledStoreError> {
        let db = temporary_db()?;
        let space = SledAddressSpace::open(&db, "field")?;

        assert_eq!(space.node(space.root_address())?, OctreeNode::EMPTY);
        assert_eq!(space.num_nodes(), 1);

        Ok(())
    }

    #[test]
    fn records_and_free_list_survive_reopen() -> Result<(), SledStoreError> {
        let db = temporary_db()?;

        let mut node = OctreeNode::EMPTY;
        node.set_child_value(Octant::ALL[3], 1234);

        let (kept, returned) = {
            let mut space = SledAddressSpace::open(&db, "field")?;
            let kept = space.rent_address()?;
            let returned = space.rent_address()?;
            space.set_node(kept, 1, &node)?;
            space.return_address(returned)?;
            space.flush()?;

            (kept, returned)
        };

        let mut space = SledAddressSpace::open(&db, "field")?;
        assert_eq!(space.node(kept)?, node);
        assert!(matches!(
            space.node(returned),
            Err(SledStoreError::UnknownAddress(_))
        ));

        // The returned address is recycled before any new address is minted.
        assert_eq!(space.rent_address()?, returned);
        assert_eq!(space.node(returned)?, OctreeNode::EMPTY);
        assert_eq!(space.rent_address()?, NodeAddress(3));

        Ok(())
    }

    #[test]
    fn stores_with_different_names_are_independent() -> Result<(), SledStoreError> {
        let db = temporary_db()?;
        let mut a = SledAddressSpace::open(&db, "a")?;
        let b = SledAddressSpace::open(&db, "b")?;

        a.set_node(NodeAddress::ROOT, 0, &OctreeNode::filled_with_value(1))?;
        assert_eq!(b.node(NodeAddress::ROOT)?, OctreeNode::EMPTY);

        Ok(())
    }

    #[test]
    fn corrupt_record_is_reported() -> Result<(), SledStoreError> {
        let db = temporary_db()?;
        let space = SledAddressSpace::open(&db, "field")?;
        space
            .nodes_tree()
            .insert(encode_address(NodeAddress::ROOT), &b"garbage"[..])?;

        assert!(matches!(
            space.node(NodeAddress::ROOT),
            Err(SledStoreError::CorruptRecord(NodeAddress::ROOT))
        ));

        Ok(())
    }
}
