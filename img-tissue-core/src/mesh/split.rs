use crate::{coord::Coord, mesh::grid::GridSize, triangle::Triangle, Scalar};
use serde::{Deserialize, Serialize};

/// Result of splitting an image rectangle into grid triangles.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// Grid vertices, row-major.
    pub points: Vec<Coord>,
    /// Two triangles per cell, cell-major, A before B.
    pub triangles: Vec<Triangle>,
}

/// Split rectangle into grid of cells, two triangles each.
///
/// For every cell with top-left vertex `i` the triangles are
/// `A = (i, right, below-right)` followed by `B = (i, below, below-right)`,
/// so even triangle indices are always A and odd ones are always B.
///
/// # Arguments
/// * `width` - Rectangle width.
/// * `height` - Rectangle height.
/// * `grid` - Number of columns and rows.
///
/// # Examples
/// ```
/// use img_tissue_core::prelude::*;
///
/// let split = split(100.0, 100.0, GridSize::new(2, 2));
/// assert_eq!(split.points.len(), 9);
/// assert_eq!(split.points[0], Coord::new(0.0, 0.0));
/// assert_eq!(split.points[8], Coord::new(100.0, 100.0));
/// assert_eq!(split.triangles.len(), 8);
/// assert_eq!(split.triangles[0], Triangle { a: 0, b: 1, c: 4 });
/// assert_eq!(split.triangles[1], Triangle { a: 0, b: 3, c: 4 });
/// ```
pub fn split(width: Scalar, height: Scalar, grid: GridSize) -> Split {
    let columns = grid.columns();
    let rows = grid.rows();
    let wc = width / columns as Scalar;
    let hc = height / rows as Scalar;
    let stride = columns + 1;
    let points = (0..=rows)
        .flat_map(|j| (0..=columns).map(move |i| Coord::new(i as Scalar * wc, j as Scalar * hc)))
        .collect::<Vec<_>>();
    let triangles = (0..points.len())
        .filter(|i| (i + 1) % stride != 0 && i / stride < rows)
        .flat_map(|i| {
            [
                Triangle::from([i, i + 1, i + stride + 1]),
                Triangle::from([i, i + stride, i + stride + 1]),
            ]
        })
        .collect::<Vec<_>>();
    Split { points, triangles }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_for_all_grids() {
        for columns in GridSize::MIN..=GridSize::MAX {
            for rows in GridSize::MIN..=GridSize::MAX {
                let grid = GridSize::new(columns, rows);
                let s = split(640.0, 480.0, grid);
                assert_eq!(s.points.len(), (columns + 1) * (rows + 1));
                assert_eq!(s.triangles.len(), 2 * columns * rows);
                assert!(s
                    .triangles
                    .iter()
                    .all(|t| t.a < s.points.len() && t.b < s.points.len() && t.c < s.points.len()));
            }
        }
    }

    #[test]
    fn test_row_major_points() {
        let s = split(90.0, 40.0, GridSize::new(3, 2));
        assert_eq!(s.points[1], Coord::new(30.0, 0.0));
        assert_eq!(s.points[4], Coord::new(0.0, 20.0));
        assert_eq!(s.points[11], Coord::new(90.0, 40.0));
    }

    #[test]
    fn test_diagonal_parity() {
        let grid = GridSize::new(3, 2);
        let s = split(90.0, 40.0, grid);
        let stride = grid.columns() + 1;
        for (index, t) in s.triangles.iter().enumerate() {
            assert_eq!(t.c, t.a + stride + 1);
            if index % 2 == 0 {
                assert_eq!(t.b, t.a + 1);
            } else {
                assert_eq!(t.b, t.a + stride);
            }
        }
        // second row of cells starts at vertex 4
        assert_eq!(s.triangles[6], Triangle { a: 4, b: 5, c: 9 });
        assert_eq!(s.triangles[7], Triangle { a: 4, b: 8, c: 9 });
    }

    #[test]
    fn test_cells_cover_area() {
        let s = split(120.0, 80.0, GridSize::new(5, 7));
        let area = s
            .triangles
            .iter()
            .map(|t| {
                let ab = s.points[t.b] - s.points[t.a];
                let ac = s.points[t.c] - s.points[t.a];
                (ab.x * ac.y - ab.y * ac.x).abs() * 0.5
            })
            .sum::<Scalar>();
        assert!((area - 120.0 * 80.0).abs() < 1e-6);
    }
}
