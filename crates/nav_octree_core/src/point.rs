use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An N-dimensional point, which is usually just a primitive array of type `N`. It is most convenient to construct points
/// as:
///
/// ```
/// use nav_octree_core::PointN;
///
/// let p = PointN([14.0, 0.25, 50.4]);
/// ```
///
/// 3D float points support the basic linear algebraic operations needed to walk an octree: addition, subtraction and
/// scalar multiplication.
///
/// ```
/// use nav_octree_core::{Point3f, PointN};
///
/// let center = Point3f::ZERO;
/// let offset = PointN([1.0, -1.0, 1.0]) * 0.5;
///
/// assert_eq!(center + offset, PointN([0.5, -0.5, 0.5]));
/// assert_eq!(center - offset, PointN([-0.5, 0.5, -0.5]));
/// ```
#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PointN<N>(pub N);

/// A 3-dimensional point with scalar type `T`.
pub type Point3<T> = PointN<[T; 3]>;
/// A 3-dimensional point with scalar type `f32`.
pub type Point3f = PointN<[f32; 3]>;

impl<T> Point3<T>
where
    T: Copy,
{
    #[inline]
    pub fn x(&self) -> T {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> T {
        self.0[1]
    }

    #[inline]
    pub fn z(&self) -> T {
        self.0[2]
    }

    #[inline]
    pub fn fill(value: T) -> Self {
        PointN([value; 3])
    }

    /// Returns the point after applying `f` component-wise.
    #[inline]
    pub fn map_components(&self, f: impl Fn(T) -> T) -> Self {
        PointN([f(self.x()), f(self.y()), f(self.z())])
    }
}

impl Point3f {
    pub const ZERO: Self = PointN([0.0; 3]);
    pub const ONES: Self = PointN([1.0; 3]);

    /// Returns a point where each component is the absolute value of the input component.
    #[inline]
    pub fn abs(&self) -> Self {
        self.map_components(f32::abs)
    }

    /// Returns `true` iff no component is infinite or NaN.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }

    /// The largest component. NaN components are ignored.
    #[inline]
    pub fn max_component(&self) -> f32 {
        self.x().max(self.y()).max(self.z())
    }
}

impl Add for Point3f {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        PointN([self.x() + rhs.x(), self.y() + rhs.y(), self.z() + rhs.z()])
    }
}

impl Sub for Point3f {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        PointN([self.x() - rhs.x(), self.y() - rhs.y(), self.z() - rhs.z()])
    }
}

impl Mul<f32> for Point3f {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        self.map_components(|c| c * rhs)
    }
}

impl Neg for Point3f {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::ZERO - self
    }
}

impl AddAssign for Point3f {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Point3f {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T> From<(T, T, T)> for Point3<T> {
    #[inline]
    fn from((x, y, z): (T, T, T)) -> Self {
        PointN([x, y, z])
    }
}

impl<T> From<[T; 3]> for Point3<T> {
    #[inline]
    fn from(array: [T; 3]) -> Self {
        PointN(array)
    }
}

impl<T> From<Point3<T>> for [T; 3] {
    #[inline]
    fn from(p: Point3<T>) -> Self {
        p.0
    }
}

impl fmt::Display for Point3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x(), self.y(), self.z())
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
    fn conversions_preserve_component_order() {
        let p = Point3f::from((14.0, 0.25, 50.4));

        assert_eq!(p, PointN([14.0, 0.25, 50.4]));
        assert_eq!(<[f32; 3]>::from(p), [14.0, 0.25, 50.4]);
        assert_eq!(p.to_string(), "(14, 0.25, 50.4)");
    }

    #[test]
    fn finite_and_abs() {
        assert!(PointN([1.0, -2.0, 3.0]).is_finite());
        assert!(!PointN([1.0, f32::NAN, 3.0]).is_finite());
        assert!(!PointN([f32::INFINITY, 0.0, 0.0]).is_finite());

        let p = PointN([-4.0, 2.0, -8.5]);
        assert_eq!(p.abs(), PointN([4.0, 2.0, 8.5]));
        assert_eq!(p.abs().max_component(), 8.5);
        assert_eq!(-p, PointN([4.0, -2.0, 8.5]));
    }
}
