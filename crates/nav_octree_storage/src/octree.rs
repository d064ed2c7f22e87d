//! The `SparseOctree` maps points of a bounded cubic field to `i64` values. Space is only subdivided where values differ, and
//! any node whose 8 children end up holding the same value is collapsed back into a single value in its parent.
//!
//! # Geometry
//!
//! The root node is centered at the origin. A node at depth `d` has children whose centers are offset by
//! `DepthOffsets::offset(d)` along every axis, and children of the deepest nodes are cells of size `step`. Callers must
//! translate world coordinates into this origin-centered frame. See `Octant` for how points on a center plane are assigned.
//!
//! # Storage
//!
//! The octree itself holds no nodes. All records are read from and written to an `AddressSpace`, so the same algorithm runs
//! over an in-memory `SlabAddressSpace` or a persistent store.
//!
//! ```
//! use nav_octree_core::PointN;
//! use nav_octree_storage::prelude::*;
//!
//! let mut octree = SparseOctree::new(OctreeSettings::default(), SlabAddressSpace::new()).unwrap();
//!
//! octree.set(PointN([14.0, 0.25, 50.4]), 1234).unwrap();
//!
//! assert_eq!(octree.get(PointN([14.0, 0.25, 50.4])).unwrap(), Some(1234));
//! assert_eq!(octree.get(PointN([-1000.0, -1000.0, -1000.0])).unwrap(), None);
//! ```

use crate::{
    address_space::{AddressSpace, NodeAddress},
    error::OctreeError,
    node::{Child, OctreeNode},
    settings::OctreeSettings,
};

use nav_octree_core::{DepthOffsets, Octant, Point3f};

/// A sparse map from points in a cubic field to `i64` values. See the module docs.
pub struct SparseOctree<S> {
    settings: OctreeSettings,
    offsets: DepthOffsets,
    space: S,
}

/// What happened to a node while setting a value below it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct SetOutcome {
    /// The node's record differs from what is stored.
    changed: bool,
    /// The node may have become uniform and its parent should check whether to collapse it.
    mergeable: bool,
}

impl SetOutcome {
    const UNCHANGED: Self = Self {
        changed: false,
        mergeable: false,
    };
    const CHANGED: Self = Self {
        changed: true,
        mergeable: false,
    };
    const COLLAPSED_CHILD: Self = Self {
        changed: true,
        mergeable: true,
    };
}

impl<S> SparseOctree<S>
where
    S: AddressSpace,
{
    /// Creates an octree over `space`, which may already contain nodes written by an octree with the same `settings`.
    pub fn new(settings: OctreeSettings, space: S) -> Result<Self, OctreeError> {
        let offsets = settings.depth_offsets()?;

        tracing::debug!(
            field_size = settings.field_size,
            step = settings.step,
            max_depth = offsets.max_depth(),
            "created sparse octree"
        );

        Ok(Self {
            settings,
            offsets,
            space,
        })
    }

    pub fn settings(&self) -> &OctreeSettings {
        &self.settings
    }

    pub fn depth_offsets(&self) -> &DepthOffsets {
        &self.offsets
    }

    /// The depth of the deepest nodes.
    pub fn max_depth(&self) -> usize {
        self.offsets.max_depth()
    }

    /// Half of the edge length of the cube spanned by the root.
    pub fn half_extent(&self) -> f32 {
        self.offsets.half_extent()
    }

    /// Returns `true` iff `coords` can be read or written.
    pub fn contains(&self, coords: Point3f) -> bool {
        self.offsets.contains(coords)
    }

    pub fn address_space(&self) -> &S {
        &self.space
    }

    /// Direct access to the address space. Writing records through this reference can corrupt the octree.
    pub fn address_space_mut(&mut self) -> &mut S {
        &mut self.space
    }

    pub fn into_address_space(self) -> S {
        self.space
    }

    /// Flushes the address space.
    pub fn flush(&mut self) -> Result<(), OctreeError> {
        self.space.flush().map_err(OctreeError::storage)
    }

    /// Returns the value of the cell containing `coords`, or `None` if nothing was ever written there.
    pub fn get(&self, coords: impl Into<Point3f>) -> Result<Option<i64>, OctreeError> {
        let coords = self.check_coords(coords.into())?;

        let mut address = self.space.root_address();
        let mut center = Point3f::ZERO;
        let mut depth = 0;
        loop {
            let node = self.read_node(address)?;
            let octant = Octant::containing(coords, center);
            tracing::trace!(%address, depth, octant = octant.index(), "get");

            match node.child(octant) {
                Child::Node(child_address) => {
                    debug_assert!(depth < self.offsets.max_depth());
                    center = self.offsets.child_center(octant, depth, center);
                    address = child_address;
                    depth += 1;
                }
                Child::Value(value) => return Ok(Some(value)),
                Child::Empty => return Ok(None),
            }
        }
    }

    /// Sets the value of the cell containing `coords`.
    pub fn set(&mut self, coords: impl Into<Point3f>, value: i64) -> Result<(), OctreeError> {
        self.set_reporting_outcome(coords.into(), value)?;

        Ok(())
    }

    fn set_reporting_outcome(
        &mut self,
        coords: Point3f,
        value: i64,
    ) -> Result<SetOutcome, OctreeError> {
        let coords = self.check_coords(coords)?;

        let root_address = self.space.root_address();
        let mut root = self.read_node(root_address)?;
        let outcome = self.set_in_node(&mut root, coords, Point3f::ZERO, 0, value)?;

        // The root is never collapsed, even when it becomes uniform, because it has no parent slot to collapse into.
        if outcome.changed {
            self.write_node(root_address, 0, &root)?;
        }

        Ok(outcome)
    }

    /// Sets `value` somewhere below `node`, which is at `depth` and centered at `center`. The caller is responsible for
    /// persisting `node` if the outcome says it changed.
    fn set_in_node(
        &mut self,
        node: &mut OctreeNode,
        coords: Point3f,
        center: Point3f,
        depth: usize,
        value: i64,
    ) -> Result<SetOutcome, OctreeError> {
        let octant = Octant::containing(coords, center);

        // Base case where the child is a single cell.
        if depth == self.offsets.max_depth() {
            let changed = node.set_child_value(octant, value);
            return Ok(SetOutcome {
                changed,
                mergeable: changed,
            });
        }

        let child_center = self.offsets.child_center(octant, depth, center);
        let child_depth = depth + 1;

        match node.child(octant) {
            Child::Node(child_address) => {
                let mut child = self.read_node(child_address)?;
                let child_outcome =
                    self.set_in_node(&mut child, coords, child_center, child_depth, value)?;

                if child_outcome.mergeable {
                    if let Some(uniform_value) = child.uniform_value() {
                        node.set_child_value(octant, uniform_value);
                        self.space
                            .return_address(child_address)
                            .map_err(OctreeError::storage)?;
                        tracing::debug!(
                            address = %child_address,
                            depth = child_depth,
                            value = uniform_value,
                            "collapsed uniform node"
                        );

                        return Ok(SetOutcome::COLLAPSED_CHILD);
                    }
                }

                if child_outcome.changed {
                    self.write_node(child_address, child_depth, &child)?;

                    // A child that still exists is not uniform, so this node cannot be either.
                    Ok(SetOutcome::CHANGED)
                } else {
                    Ok(SetOutcome::UNCHANGED)
                }
            }
            Child::Value(old_value) if old_value == value => Ok(SetOutcome::UNCHANGED),
            Child::Value(old_value) => self.subdivide(
                node,
                octant,
                OctreeNode::filled_with_value(old_value),
                coords,
                child_center,
                child_depth,
                value,
            ),
            Child::Empty => self.subdivide(
                node,
                octant,
                OctreeNode::EMPTY,
                coords,
                child_center,
                child_depth,
                value,
            ),
        }
    }

    /// Replaces the `octant` slot of `node` with a new child node that starts as `child` and then has `value` set in it.
    fn subdivide(
        &mut self,
        node: &mut OctreeNode,
        octant: Octant,
        mut child: OctreeNode,
        coords: Point3f,
        child_center: Point3f,
        child_depth: usize,
        value: i64,
    ) -> Result<SetOutcome, OctreeError> {
        let child_address = self.space.rent_address().map_err(OctreeError::storage)?;
        tracing::debug!(address = %child_address, depth = child_depth, "subdivided octant");

        // A fresh child always changes and never has 8 equal values after one differing write.
        self.set_in_node(&mut child, coords, child_center, child_depth, value)?;
        self.write_node(child_address, child_depth, &child)?;
        node.set_child_node(octant, child_address);

        Ok(SetOutcome::CHANGED)
    }

    /// Visits every value stored in the octree, in preorder and in octant order within each node.
    pub fn visit_leaves(
        &self,
        visitor: &mut impl OctreeVisitor,
    ) -> Result<VisitStatus, OctreeError> {
        self._visit_leaves(self.space.root_address(), Point3f::ZERO, 0, visitor)
    }

    fn _visit_leaves(
        &self,
        address: NodeAddress,
        center: Point3f,
        depth: usize,
        visitor: &mut impl OctreeVisitor,
    ) -> Result<VisitStatus, OctreeError> {
        let node = self.read_node(address)?;

        for (octant, child) in node.children() {
            match child {
                Child::Empty => (),
                Child::Value(value) => {
                    let leaf = OctreeLeaf {
                        center: self.offsets.child_center(octant, depth, center),
                        half_size: self.offsets.offset(depth),
                        depth: depth + 1,
                        value,
                    };
                    // A leaf has nothing to descend into, so `Stop` is the same as `Continue`.
                    if visitor.visit_leaf(&leaf) == VisitStatus::ExitEarly {
                        return Ok(VisitStatus::ExitEarly);
                    }
                }
                Child::Node(child_address) => {
                    let child_center = self.offsets.child_center(octant, depth, center);
                    if self._visit_leaves(child_address, child_center, depth + 1, visitor)?
                        == VisitStatus::ExitEarly
                    {
                        return Ok(VisitStatus::ExitEarly);
                    }
                }
            }
        }

        Ok(VisitStatus::Continue)
    }

    fn check_coords(&self, coords: Point3f) -> Result<Point3f, OctreeError> {
        if self.offsets.contains(coords) {
            Ok(coords)
        } else {
            Err(OctreeError::CoordinateOutOfField {
                coords,
                half_extent: self.offsets.half_extent(),
            })
        }
    }

    #[inline]
    fn read_node(&self, address: NodeAddress) -> Result<OctreeNode, OctreeError> {
        self.space.node(address).map_err(OctreeError::storage)
    }

    #[inline]
    fn write_node(
        &mut self,
        address: NodeAddress,
        depth: usize,
        node: &OctreeNode,
    ) -> Result<(), OctreeError> {
        self.space
            .set_node(address, depth, node)
            .map_err(OctreeError::storage)
    }
}

/// A cube of the field that holds a single value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OctreeLeaf {
    pub center: Point3f,
    /// Half of the cube's edge length.
    pub half_size: f32,
    /// The depth this cube would have as a node. Children of the root have depth 1, and single cells have depth
    /// `max_depth + 1`.
    pub depth: usize,
    pub value: i64,
}

pub trait OctreeVisitor {
    /// Visit any cube that holds a value.
    fn visit_leaf(&mut self, leaf: &OctreeLeaf) -> VisitStatus;
}

impl<F> OctreeVisitor for F
where
    F: FnMut(&OctreeLeaf) -> VisitStatus,
{
    #[inline]
    fn visit_leaf(&mut self, leaf: &OctreeLeaf) -> VisitStatus {
        (self)(leaf)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VisitStatus {
    /// Continue traversing this branch.
    Continue,
    /// Do not descend into this octant. Leaves have no descendants, so traversal carries on with the next leaf.
    Stop,
    /// Stop traversing the entire tree. No further leaves will be visited.
    ExitEarly,
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
