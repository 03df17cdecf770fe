use crate::{coord::Coord, triangle::TriangleCoords, Scalar};
use serde::{Deserialize, Serialize};

/// 2D affine transform stored as `[a, b, c, d, e, f]`.
///
/// Maps `(u, v)` to `(a * u + c * v + e, b * u + d * v + f)`, which is the same
/// layout SVG `matrix(...)` and canvas `transform(...)` use.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureMatrix(pub [Scalar; 6]);

impl Default for TextureMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TextureMatrix {
    /// Identity transform.
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// Returns raw coefficients.
    #[inline]
    pub fn coefficients(&self) -> [Scalar; 6] {
        self.0
    }

    /// Transform point.
    ///
    /// # Examples
    /// ```
    /// use img_tissue_core::prelude::*;
    ///
    /// let m = TextureMatrix([2.0, 0.0, 0.0, 3.0, 1.0, -1.0]);
    /// assert_eq!(m.apply(Coord::new(1.0, 1.0)), Coord::new(3.0, 2.0));
    /// ```
    #[inline]
    pub fn apply(&self, point: Coord) -> Coord {
        let [a, b, c, d, e, f] = self.0;
        Coord::new(
            a * point.x + c * point.y + e,
            b * point.x + d * point.y + f,
        )
    }

    /// Returns inverse transform or `None` if this one is singular.
    pub fn invert(&self) -> Option<Self> {
        let [a, b, c, d, e, f] = self.0;
        let det = a * d - b * c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let idet = 1.0 / det;
        let ia = d * idet;
        let ib = -b * idet;
        let ic = -c * idet;
        let id = a * idet;
        Some(Self([
            ia,
            ib,
            ic,
            id,
            -(ia * e + ic * f),
            -(ib * e + id * f),
        ]))
    }
}

/// Solve affine transform that maps `src` triangle onto `dst` triangle.
///
/// Zero area source triangle yields [`TextureMatrix::IDENTITY`].
///
/// # Arguments
/// * `src` - Source (texture space) triangle.
/// * `dst` - Destination (screen space) triangle.
///
/// # Examples
/// ```
/// use img_tissue_core::prelude::*;
///
/// let src = TriangleCoords::new(
///     Coord::new(0.0, 0.0),
///     Coord::new(10.0, 0.0),
///     Coord::new(0.0, 10.0),
/// );
/// let dst = TriangleCoords::new(
///     Coord::new(5.0, 5.0),
///     Coord::new(25.0, 5.0),
///     Coord::new(5.0, 25.0),
/// );
/// assert_eq!(solve_affine(&src, &dst), TextureMatrix([2.0, 0.0, 0.0, 2.0, 5.0, 5.0]));
/// assert_eq!(solve_affine(&src, &src), TextureMatrix::IDENTITY);
/// ```
pub fn solve_affine(src: &TriangleCoords, dst: &TriangleCoords) -> TextureMatrix {
    let TriangleCoords {
        a: Coord { x: x0, y: y0 },
        b: Coord { x: x1, y: y1 },
        c: Coord { x: x2, y: y2 },
    } = *dst;
    let TriangleCoords {
        a: Coord { x: u0, y: v0 },
        b: Coord { x: u1, y: v1 },
        c: Coord { x: u2, y: v2 },
    } = *src;

    let dx1 = x1 - x0;
    let dy1 = y1 - y0;
    let dx2 = x2 - x0;
    let dy2 = y2 - y0;

    let du1 = u1 - u0;
    let dv1 = v1 - v0;
    let du2 = u2 - u0;
    let dv2 = v2 - v0;

    let det = du1 * dv2 - du2 * dv1;
    if det == 0.0 {
        return TextureMatrix::IDENTITY;
    }
    let idet = 1.0 / det;

    let a = (dv2 * dx1 - dv1 * dx2) * idet;
    let b = (dv2 * dy1 - dv1 * dy2) * idet;
    let c = (du1 * dx2 - du2 * dx1) * idet;
    let d = (du1 * dy2 - du2 * dy1) * idet;
    let e = x0 - a * u0 - c * v0;
    let f = y0 - b * u0 - d * v0;
    TextureMatrix([a, b, c, d, e, f])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tri(points: [(Scalar, Scalar); 3]) -> TriangleCoords {
        TriangleCoords::new(points[0].into(), points[1].into(), points[2].into())
    }

    #[test]
    fn test_self_mapping_is_identity() {
        let samples = [
            tri([(0.0, 0.0), (50.0, 0.0), (50.0, 25.0)]),
            tri([(12.5, 7.0), (3.0, 91.0), (-40.0, 2.5)]),
            tri([(100.0, 100.0), (0.0, 100.0), (100.0, 0.0)]),
        ];
        for t in &samples {
            let m = solve_affine(t, t);
            for (value, expected) in m.0.iter().zip(TextureMatrix::IDENTITY.0.iter()) {
                assert_relative_eq!(*value, *expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_maps_source_vertices_onto_destination() {
        let src = tri([(0.0, 0.0), (33.3, 0.0), (33.3, 25.0)]);
        let dst = tri([(4.0, -3.0), (20.0, 11.0), (47.5, 60.25)]);
        let m = solve_affine(&src, &dst);
        for (s, d) in src.points().iter().zip(dst.points().iter()) {
            let p = m.apply(*s);
            assert_relative_eq!(p.x, d.x, epsilon = 1e-9);
            assert_relative_eq!(p.y, d.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_collinear_source_falls_back_to_identity() {
        let src = tri([(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let dst = tri([(5.0, 0.0), (0.0, 9.0), (3.0, 3.0)]);
        assert_eq!(solve_affine(&src, &dst), TextureMatrix::IDENTITY);
    }

    #[test]
    fn test_collapsed_destination_is_not_degenerate() {
        let src = tri([(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        let focal = (4.0, 6.0);
        let dst = tri([focal, focal, focal]);
        let m = solve_affine(&src, &dst);
        assert_eq!(m, TextureMatrix([0.0, 0.0, 0.0, 0.0, 4.0, 6.0]));
        assert!(m.invert().is_none());
    }

    #[test]
    fn test_invert() {
        let m = TextureMatrix([2.0, 1.0, -1.0, 3.0, 10.0, -4.0]);
        let inv = m.invert().unwrap();
        let p = Coord::new(7.5, -2.0);
        let back = inv.apply(m.apply(p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-12);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-12);
        assert_eq!(TextureMatrix::IDENTITY.invert(), Some(TextureMatrix::IDENTITY));
    }
}
