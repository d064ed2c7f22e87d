use crate::settings::SettingsError;

use nav_octree_core::{InvalidOctant, Point3f};

use thiserror::Error;

/// Every way that an operation on a `SparseOctree` can fail.
#[derive(Debug, Error)]
pub enum OctreeError {
    /// An octant index outside of `0..8`. Octants computed by the octree are always valid, so this indicates a bug in
    /// geometry code rather than bad input.
    #[error(transparent)]
    InvalidOctant(#[from] InvalidOctant),
    /// The coordinates are not finite, or lie outside of the cube spanned by the root node.
    #[error("coordinates {coords} are outside of the field (half extent {half_extent})")]
    CoordinateOutOfField { coords: Point3f, half_extent: f32 },
    /// The address space failed to read, write or allocate a node. The octree may be left partially updated, so it should
    /// not be used after this error unless the address space guarantees otherwise.
    #[error("address space failure")]
    StorageFailure(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("invalid octree settings")]
    Settings(#[from] SettingsError),
}

impl OctreeError {
    pub(crate) fn storage<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        OctreeError::StorageFailure(Box::new(error))
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

    use nav_octree_core::{Octant, PointN};
    use std::convert::TryFrom;

    #[test]
    fn messages_name_the_cause() {
        let err: OctreeError = Octant::try_from(9).unwrap_err().into();
        assert_eq!(err.to_string(), "octant index 9 is outside of 0..8");

        let err = OctreeError::CoordinateOutOfField {
            coords: PointN([40.0, 0.0, 0.0]),
            half_extent: 16.0,
        };
        assert_eq!(
            err.to_string(),
            "coordinates (40, 0, 0) are outside of the field (half extent 16)"
        );
    }
}
