use crate::Scalar;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Point coordinate in image pixel space.
///
/// # Examples
/// ```
/// use img_tissue_core::prelude::*;
///
/// let a = Coord::new(0.0, 0.0);
/// let b = Coord::new(3.0, 4.0);
/// assert_eq!((b - a).magnitude(), 5.0);
/// assert_eq!((b - a).sqr_magnitude(), 25.0);
/// assert_eq!(a.distance(b), 5.0);
/// assert_eq!(Coord::new(1.0, 0.0).right(), Coord::new(0.0, -1.0));
/// assert_eq!(Coord::new(1.0, 0.0).dot(Coord::new(-1.0, 0.0)), -1.0);
/// ```
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    /// X value.
    pub x: Scalar,
    /// Y value.
    pub y: Scalar,
}

impl Coord {
    /// Create new point coordinate.
    ///
    /// # Arguments
    /// * `x` - X value.
    /// * `y` - Y value.
    #[inline]
    pub fn new(x: Scalar, y: Scalar) -> Self {
        Self { x, y }
    }

    /// Return squared length of the vector.
    #[inline]
    pub fn sqr_magnitude(self) -> Scalar {
        self.x * self.x + self.y * self.y
    }

    /// Return length of the vector.
    #[inline]
    pub fn magnitude(self) -> Scalar {
        self.x.hypot(self.y)
    }

    /// Return euclidean distance to other point.
    #[inline]
    pub fn distance(self, other: Self) -> Scalar {
        (other - self).magnitude()
    }

    /// Return point moved by given offsets.
    #[inline]
    pub fn offset(self, dx: Scalar, dy: Scalar) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns dot product.
    ///
    /// # Arguments
    /// * `other` - Other vector.
    #[inline]
    pub fn dot(self, other: Self) -> Scalar {
        self.x * other.x + self.y * other.y
    }

    /// Return right vector.
    ///
    /// ```plain
    ///      ^
    /// self |
    ///      *---> right
    /// ```
    #[inline]
    pub fn right(self) -> Self {
        Self {
            x: self.y,
            y: -self.x,
        }
    }
}

impl From<(Scalar, Scalar)> for Coord {
    fn from((x, y): (Scalar, Scalar)) -> Self {
        Self { x, y }
    }
}

impl From<[Scalar; 2]> for Coord {
    fn from([x, y]: [Scalar; 2]) -> Self {
        Self { x, y }
    }
}

impl Add for Coord {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Coord {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<Scalar> for Coord {
    type Output = Self;

    fn mul(self, other: Scalar) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
        }
    }
}
