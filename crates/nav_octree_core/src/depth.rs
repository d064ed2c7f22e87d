use crate::{Octant, Point3f};

/// The distance from a node's center to each of its children's centers, for every depth of an octree.
///
/// Index 0 is the offset used by the root and the last index is the offset used by the deepest nodes. The table is built by
/// starting at half of the step resolution and doubling while the offset still fits in half of the field size:
///
/// ```
/// use nav_octree_core::DepthOffsets;
///
/// let offsets = DepthOffsets::new(32768.0, 0.5);
///
/// assert_eq!(offsets.max_depth(), 16);
/// assert_eq!(offsets.offset(0), 16384.0);
/// assert_eq!(offsets.offset(16), 0.25);
/// ```
///
/// The doubling construction is authoritative. For field sizes that are not a power-of-2 multiple of the step, it does not
/// agree with any closed form based on `log2(field_size / step)` rounding.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthOffsets {
    offsets: Vec<f32>,
}

impl DepthOffsets {
    /// Builds the table for a cubic field with edge length `field_size` indexed at resolution `step`.
    ///
    /// # Panics
    ///
    /// If either argument is not finite and positive, if `step > field_size`, or if `step` is so small that half of it rounds
    /// to zero.
    pub fn new(field_size: f32, step: f32) -> Self {
        assert!(field_size.is_finite() && field_size > 0.0);
        assert!(step.is_finite() && step > 0.0);
        assert!(step <= field_size);

        let max_offset = field_size / 2.0;
        let mut offsets = Vec::new();
        let mut offset = step / 2.0;
        // Doubling zero never reaches `max_offset`.
        assert!(offset > 0.0, "step {} is too small to halve", step);
        while offset <= max_offset {
            offsets.push(offset);
            offset *= 2.0;
        }
        offsets.reverse();

        Self { offsets }
    }

    /// The depth of the deepest nodes. Children of nodes at this depth can only be values.
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.offsets.len() - 1
    }

    /// The offset from the center of a node at `depth` to the centers of its children. This is also the half edge length of
    /// those children.
    #[inline]
    pub fn offset(&self, depth: usize) -> f32 {
        self.offsets[depth]
    }

    /// Half of the edge length of the cube spanned by the root node. Any coordinate with a larger magnitude on some axis does
    /// not belong to the field.
    #[inline]
    pub fn half_extent(&self) -> f32 {
        2.0 * self.offsets[0]
    }

    /// Returns `true` iff every component of `coords` lies in `(-half_extent, half_extent]`. Points on a center plane belong to
    /// the negative side, so the root does not span the plane at `-half_extent`.
    #[inline]
    pub fn contains(&self, coords: Point3f) -> bool {
        let h = self.half_extent();

        coords.0.iter().all(|&c| c > -h && c <= h)
    }

    /// The center of the child `octant` of a node at `depth` centered at `parent_center`.
    #[inline]
    pub fn child_center(&self, octant: Octant, depth: usize, parent_center: Point3f) -> Point3f {
        octant.child_center(parent_center, self.offset(depth))
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.offsets
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
