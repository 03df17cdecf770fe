use crate::{
    affine::{solve_affine, TextureMatrix},
    coord::Coord,
    mesh::TissueMesh,
    surface::RenderSurface,
    triangle::TriangleCoords,
    Scalar,
};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "parallel")]
macro_rules! iter {
    ($v:expr) => {
        $v.par_iter()
    };
}

#[cfg(not(feature = "parallel"))]
macro_rules! iter {
    ($v:expr) => {
        $v.iter()
    };
}

/// Distance in pixels clip polygons get pushed by to hide seams between triangles.
pub const ANTI_ALIAS_OFFSET: Scalar = 1.0;

/// Clip polygon of destination triangle, nudged to overlap its neighbours.
///
/// Even indices are `(self, right, below-right)` triangles and odd indices are
/// `(self, below, below-right)` ones, so the nudge pattern follows that parity.
///
/// # Arguments
/// * `index` - Triangle index in mesh.
/// * `triangle` - Destination triangle.
///
/// # Examples
/// ```
/// use img_tissue_core::prelude::*;
///
/// let t = TriangleCoords::new(
///     Coord::new(0.0, 0.0),
///     Coord::new(10.0, 0.0),
///     Coord::new(10.0, 10.0),
/// );
/// assert_eq!(
///     anti_alias_clip(0, &t),
///     [Coord::new(-1.0, 0.0), Coord::new(11.0, -1.0), Coord::new(11.0, 11.0)],
/// );
/// assert_eq!(
///     anti_alias_clip(1, &t),
///     [Coord::new(-1.0, -1.0), Coord::new(9.0, 1.0), Coord::new(11.0, 10.0)],
/// );
/// ```
pub fn anti_alias_clip(index: usize, triangle: &TriangleCoords) -> [Coord; 3] {
    let o = ANTI_ALIAS_OFFSET;
    let TriangleCoords { a, b, c } = *triangle;
    if index % 2 == 1 {
        [a.offset(-o, -o), b.offset(-o, o), c.offset(o, 0.0)]
    } else {
        [a.offset(-o, 0.0), b.offset(o, -o), c.offset(o, o)]
    }
}

/// Compute texture transforms of all mesh triangles.
pub fn texture_matrices(mesh: &TissueMesh) -> Vec<TextureMatrix> {
    iter!(mesh.src_area())
        .zip(iter!(mesh.dst_area()))
        .map(|(src, dst)| solve_affine(src, dst))
        .collect::<Vec<_>>()
}

/// Pushes mesh triangles to rendering surface.
///
/// Owns per-triangle surface handles created when geometry gets attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Projector<H> {
    handles: Vec<H>,
}

impl<H> Default for Projector<H> {
    fn default() -> Self {
        Self { handles: vec![] }
    }
}

impl<H: Copy> Projector<H> {
    /// Replace surface nodes with fresh ones matching mesh.
    ///
    /// # Arguments
    /// * `surface` - Rendering surface.
    /// * `mesh` - Freshly built mesh.
    pub fn attach<S>(surface: &mut S, mesh: &TissueMesh) -> Self
    where
        S: RenderSurface<Handle = H>,
    {
        surface.clear_triangles();
        surface.set_view_box(mesh.width(), mesh.height());
        let handles = (0..mesh.len())
            .map(|index| surface.create_triangle(index))
            .collect::<Vec<_>>();
        Self { handles }
    }

    /// Release surface nodes.
    pub fn detach<S>(&mut self, surface: &mut S)
    where
        S: RenderSurface<Handle = H>,
    {
        self.handles.clear();
        surface.clear_triangles();
    }

    /// Per-triangle handles, indexed like mesh triangles.
    pub fn handles(&self) -> &[H] {
        &self.handles
    }

    /// Emit clip and transform of every triangle.
    ///
    /// # Arguments
    /// * `mesh` - Mesh to project.
    /// * `surface` - Rendering surface.
    pub fn project<S>(&self, mesh: &TissueMesh, surface: &mut S)
    where
        S: RenderSurface<Handle = H>,
    {
        let matrices = texture_matrices(mesh);
        for (index, ((handle, dst), matrix)) in self
            .handles
            .iter()
            .zip(mesh.dst_area())
            .zip(matrices.iter())
            .enumerate()
        {
            surface.set_clip(*handle, &anti_alias_clip(index, dst));
            surface.set_transform(*handle, matrix);
        }
        tracing::trace!(triangles = self.handles.len(), "mesh projected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mesh::grid::GridSize,
        surface::{recording::RecordingSurface, SurfaceBounds},
    };

    #[test]
    fn test_attach_creates_handle_per_triangle() {
        let mut surface = RecordingSurface::new(SurfaceBounds::default());
        let mesh = TissueMesh::build(30.0, 20.0, GridSize::new(3, 2));
        let projector = Projector::attach(&mut surface, &mesh);
        assert_eq!(projector.handles().len(), 12);
        assert_eq!(surface.clips().len(), 12);
    }

    #[test]
    fn test_identity_mesh_projects_identity() {
        let mut surface = RecordingSurface::new(SurfaceBounds::default());
        let mesh = TissueMesh::build(30.0, 20.0, GridSize::new(3, 2));
        let projector = Projector::attach(&mut surface, &mesh);
        projector.project(&mesh, &mut surface);
        for m in surface.transforms() {
            for (v, e) in m.0.iter().zip(TextureMatrix::IDENTITY.0.iter()) {
                assert!((v - e).abs() < 1e-9);
            }
        }
        for (index, clip) in surface.clips().iter().enumerate() {
            assert_eq!(clip.as_slice(), &anti_alias_clip(index, &mesh.dst_area()[index]));
        }
    }

    #[test]
    fn test_clip_follows_parity_of_split() {
        let mesh = TissueMesh::build(20.0, 20.0, GridSize::new(2, 2));
        let upper = anti_alias_clip(0, &mesh.dst_area()[0]);
        let lower = anti_alias_clip(1, &mesh.dst_area()[1]);
        // upper triangle grows up and right, lower one grows left and down
        assert_eq!(upper[1], Coord::new(11.0, -1.0));
        assert_eq!(upper[2], Coord::new(11.0, 11.0));
        assert_eq!(lower[1], Coord::new(-1.0, 11.0));
        assert_eq!(lower[2], Coord::new(11.0, 10.0));
    }

    #[test]
    fn test_detach_clears_surface() {
        let mut surface = RecordingSurface::new(SurfaceBounds::default());
        let mesh = TissueMesh::build(30.0, 20.0, GridSize::new(2, 2));
        let mut projector = Projector::attach(&mut surface, &mesh);
        projector.detach(&mut surface);
        assert!(projector.handles().is_empty());
        assert!(surface.clips().is_empty());
    }
}
