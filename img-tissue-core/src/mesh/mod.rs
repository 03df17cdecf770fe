pub mod grid;
pub mod split;

use crate::{
    coord::Coord,
    error::TissueError,
    mesh::{grid::GridSize, split::split},
    triangle::{Triangle, TriangleCoords},
    Scalar,
};
use serde::{Deserialize, Serialize};

/// Image mesh with frozen source geometry and animated destination geometry.
///
/// Source points are a deep copy made at build time, so moving destination
/// points never touches them.
///
/// # Examples
/// ```
/// use img_tissue_core::prelude::*;
///
/// let mut mesh = TissueMesh::build(200.0, 100.0, GridSize::new(2, 2));
/// mesh.dst_points_mut()[4] = Coord::new(0.0, 0.0);
/// mesh.sync_area();
/// assert_eq!(mesh.src_points()[4], Coord::new(100.0, 50.0));
/// assert_eq!(mesh.dst_area()[0].c, Coord::new(0.0, 0.0));
/// assert_eq!(mesh.src_area()[0].c, Coord::new(100.0, 50.0));
/// ```
///
/// Deserialization checks points and triangles against the grid and
/// rebuilds both areas from the points.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTissueMesh")]
pub struct TissueMesh {
    width: Scalar,
    height: Scalar,
    grid: GridSize,
    triangles: Vec<Triangle>,
    src_points: Vec<Coord>,
    src_area: Vec<TriangleCoords>,
    dst_points: Vec<Coord>,
    dst_area: Vec<TriangleCoords>,
}

impl TissueMesh {
    /// Build mesh from scratch.
    ///
    /// # Arguments
    /// * `width` - Image natural width.
    /// * `height` - Image natural height.
    /// * `grid` - Grid size.
    pub fn build(width: Scalar, height: Scalar, grid: GridSize) -> Self {
        let split = split(width, height, grid);
        let src_points = split.points.clone();
        let src_area = Self::area(&split.triangles, &src_points);
        let dst_area = src_area.clone();
        tracing::debug!(
            width,
            height,
            %grid,
            points = src_points.len(),
            triangles = split.triangles.len(),
            "mesh built"
        );
        Self {
            width,
            height,
            grid,
            triangles: split.triangles,
            src_points,
            src_area,
            dst_points: split.points,
            dst_area,
        }
    }

    /// Image width the mesh was built for.
    pub fn width(&self) -> Scalar {
        self.width
    }

    /// Image height the mesh was built for.
    pub fn height(&self) -> Scalar {
        self.height
    }

    /// Grid size the mesh was built for.
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Triangle point indices, shared by source and destination geometry.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn src_points(&self) -> &[Coord] {
        &self.src_points
    }

    pub fn src_area(&self) -> &[TriangleCoords] {
        &self.src_area
    }

    pub fn dst_points(&self) -> &[Coord] {
        &self.dst_points
    }

    pub fn dst_area(&self) -> &[TriangleCoords] {
        &self.dst_area
    }

    /// Mutable destination points. Call [`TissueMesh::sync_area`] after editing.
    pub fn dst_points_mut(&mut self) -> &mut [Coord] {
        &mut self.dst_points
    }

    /// Recompute every destination point from its index and source point, then sync area.
    ///
    /// # Arguments
    /// * `f` - Callback producing new destination point. Signature: `fn(index, source)`.
    pub fn update_dst<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, Coord) -> Coord,
    {
        for (index, (dst, src)) in self
            .dst_points
            .iter_mut()
            .zip(self.src_points.iter())
            .enumerate()
        {
            *dst = f(index, *src);
        }
        self.sync_area();
    }

    /// Rebuild destination triangles from destination points.
    pub fn sync_area(&mut self) {
        for (t, area) in self.triangles.iter().zip(self.dst_area.iter_mut()) {
            *area = t.coords(&self.dst_points);
        }
    }

    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    fn area(triangles: &[Triangle], points: &[Coord]) -> Vec<TriangleCoords> {
        triangles.iter().map(|t| t.coords(points)).collect::<Vec<_>>()
    }
}

#[derive(Deserialize)]
struct RawTissueMesh {
    width: Scalar,
    height: Scalar,
    grid: GridSize,
    triangles: Vec<Triangle>,
    src_points: Vec<Coord>,
    dst_points: Vec<Coord>,
}

impl TryFrom<RawTissueMesh> for TissueMesh {
    type Error = TissueError;

    fn try_from(raw: RawTissueMesh) -> Result<Self, Self::Error> {
        let RawTissueMesh {
            width,
            height,
            grid,
            triangles,
            src_points,
            dst_points,
        } = raw;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(TissueError::InvalidDimensions { width, height });
        }
        let count = grid.points_count();
        if src_points.len() != count || dst_points.len() != count {
            return Err(TissueError::InvalidMesh(format!(
                "grid {} needs {} points, got {} source and {} destination",
                grid,
                count,
                src_points.len(),
                dst_points.len()
            )));
        }
        if triangles.len() != grid.triangles_count() {
            return Err(TissueError::InvalidMesh(format!(
                "grid {} needs {} triangles, got {}",
                grid,
                grid.triangles_count(),
                triangles.len()
            )));
        }
        if let Some(t) = triangles
            .iter()
            .find(|t| t.a >= count || t.b >= count || t.c >= count)
        {
            return Err(TissueError::InvalidMesh(format!(
                "triangle ({}, {}, {}) refers to missing point",
                t.a, t.b, t.c
            )));
        }
        let src_area = Self::area(&triangles, &src_points);
        let dst_area = Self::area(&triangles, &dst_points);
        Ok(Self {
            width,
            height,
            grid,
            triangles,
            src_points,
            src_area,
            dst_points,
            dst_area,
        })
    }
}
