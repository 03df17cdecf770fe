use crate::coord::Coord;
use serde::{Deserialize, Serialize};

/// Triangle made of point indices.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    /// First point.
    pub a: usize,
    /// Second point.
    pub b: usize,
    /// Third point.
    pub c: usize,
}

impl Triangle {
    /// Resolve indices into owned coordinates snapshot.
    ///
    /// # Arguments
    /// * `points` - Points the indices refer to.
    #[inline]
    pub fn coords(&self, points: &[Coord]) -> TriangleCoords {
        TriangleCoords {
            a: points[self.a],
            b: points[self.b],
            c: points[self.c],
        }
    }
}

impl From<[usize; 3]> for Triangle {
    fn from([a, b, c]: [usize; 3]) -> Self {
        Self { a, b, c }
    }
}

/// Triangle that owns its points, so source and destination shapes never alias.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleCoords {
    /// First point.
    pub a: Coord,
    /// Second point.
    pub b: Coord,
    /// Third point.
    pub c: Coord,
}

impl TriangleCoords {
    #[inline]
    pub fn new(a: Coord, b: Coord, c: Coord) -> Self {
        Self { a, b, c }
    }

    /// Points in winding order.
    #[inline]
    pub fn points(&self) -> [Coord; 3] {
        [self.a, self.b, self.c]
    }
}

impl From<[Coord; 3]> for TriangleCoords {
    fn from([a, b, c]: [Coord; 3]) -> Self {
        Self { a, b, c }
    }
}
