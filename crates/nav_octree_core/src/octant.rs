use crate::{Point3f, PointN};

use core::convert::TryFrom;
use thiserror::Error;

/// One of the 8 children of an octree node, identified by a 3-bit index.
///
/// The index encodes, from the most significant bit, whether the child lies on the negative side of the parent's center
/// along X, Y and Z:
///
/// ```text
/// index | x | y | z
/// ------+---+---+---
///   0   | + | + | +
///   1   | + | + | -
///   2   | + | - | +
///   3   | + | - | -
///   4   | - | + | +
///   5   | - | + | -
///   6   | - | - | +
///   7   | - | - | -
/// ```
///
/// "+" means the coordinate is strictly greater than the center. A coordinate that lies exactly on a center plane belongs to
/// the "-" side of that axis, so a point exactly at the center of a node always lands in octant 7. This rule decides which
/// cell owns boundary points and must not be made symmetric without migrating existing data.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Octant(u8);

/// An octant index that is not in `0..8`.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("octant index {0} is outside of 0..8")]
pub struct InvalidOctant(pub u8);

impl Octant {
    pub const ALL: [Octant; 8] = [
        Octant(0),
        Octant(1),
        Octant(2),
        Octant(3),
        Octant(4),
        Octant(5),
        Octant(6),
        Octant(7),
    ];

    /// The child of a node centered at `center` that contains `coords`.
    #[inline]
    pub fn containing(coords: Point3f, center: Point3f) -> Self {
        let negative_x = !(coords.x() > center.x()) as u8;
        let negative_y = !(coords.y() > center.y()) as u8;
        let negative_z = !(coords.z() > center.z()) as u8;

        Octant((negative_x << 2) | (negative_y << 1) | negative_z)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The unit direction from a parent's center to this child's center.
    #[inline]
    pub fn direction(self) -> Point3f {
        let sign = |bit: u8| if self.0 & bit == 0 { 1.0 } else { -1.0 };

        PointN([sign(0b100), sign(0b010), sign(0b001)])
    }

    /// The center of this child, given the parent's center and the offset of the parent's depth.
    #[inline]
    pub fn child_center(self, parent_center: Point3f, offset: f32) -> Point3f {
        parent_center + self.direction() * offset
    }
}

impl TryFrom<u8> for Octant {
    type Error = InvalidOctant;

    #[inline]
    fn try_from(index: u8) -> Result<Self, Self::Error> {
        if index < 8 {
            Ok(Octant(index))
        } else {
            Err(InvalidOctant(index))
        }
    }
}

impl From<Octant> for usize {
    #[inline]
    fn from(octant: Octant) -> Self {
        octant.index()
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

    use pretty_assertions::assert_eq;

    #[test]
    fn octant_sign_table() {
        let expected_signs = [
            [1.0, 1.0, 1.0],
            [1.0, 1.0, -1.0],
            [1.0, -1.0, 1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, 1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [-1.0, -1.0, -1.0],
        ];

        for (octant, signs) in Octant::ALL.iter().zip(expected_signs.iter()) {
            assert_eq!(octant.direction(), PointN(*signs));

            // A point just off the center in the octant's direction must be classified as that octant.
            let probe = octant.direction() * 0.1;
            assert_eq!(Octant::containing(probe, Point3f::ZERO), *octant);
        }
    }

    #[test]
    fn ties_go_to_negative_side() {
        let center = PointN([2.0, 2.0, 2.0]);

        assert_eq!(Octant::containing(center, center).index(), 7);
        assert_eq!(
            Octant::containing(PointN([3.0, 2.0, 3.0]), center).index(),
            2
        );
        assert_eq!(
            Octant::containing(PointN([2.0, 3.0, 1.0]), center).index(),
            5
        );
    }

    #[test]
    fn child_center_moves_by_offset() {
        let parent = PointN([10.0, -10.0, 0.0]);

        assert_eq!(
            Octant::ALL[3].child_center(parent, 4.0),
            PointN([14.0, -14.0, -4.0])
        );
        assert_eq!(
            Octant::ALL[4].child_center(parent, 0.5),
            PointN([9.5, -9.5, 0.5])
        );
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        assert_eq!(Octant::try_from(7), Ok(Octant::ALL[7]));
        assert_eq!(Octant::try_from(8), Err(InvalidOctant(8)));
    }
}
