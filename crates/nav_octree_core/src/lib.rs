//! The core geometry for sparse navigation octrees:
//! - `PointN`: an N-dimensional point, most importantly `Point3f`
//! - `Octant`: one of the 8 children of an octree node, and the math for choosing and centering it
//! - `DepthOffsets`: the per-depth child offsets derived from a field size and step resolution

pub mod depth;
pub mod octant;
pub mod point;

pub use depth::DepthOffsets;
pub use octant::{InvalidOctant, Octant};
pub use point::{Point3, Point3f, PointN};

pub mod prelude {
    pub use super::{DepthOffsets, Octant, Point3, Point3f, PointN};
}
