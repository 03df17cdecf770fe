pub mod recording;

use crate::{affine::TextureMatrix, coord::Coord, Scalar};
use serde::{Deserialize, Serialize};

/// On-screen placement of a rendering surface.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBounds {
    /// Left edge in client space.
    pub x: Scalar,
    /// Top edge in client space.
    pub y: Scalar,
    /// Displayed width.
    pub width: Scalar,
    /// Displayed height.
    pub height: Scalar,
}

impl SurfaceBounds {
    pub fn new(x: Scalar, y: Scalar, width: Scalar, height: Scalar) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert client space point into image pixel space.
    ///
    /// Zero sized bounds keep a 1:1 scale.
    ///
    /// # Arguments
    /// * `client` - Point in client space.
    /// * `natural_width` - Image width in pixels.
    /// * `natural_height` - Image height in pixels.
    ///
    /// # Examples
    /// ```
    /// use img_tissue_core::prelude::*;
    ///
    /// let bounds = SurfaceBounds::new(10.0, 20.0, 200.0, 100.0);
    /// assert_eq!(
    ///     bounds.to_image_space(Coord::new(110.0, 70.0), 400.0, 300.0),
    ///     Coord::new(200.0, 150.0),
    /// );
    /// ```
    pub fn to_image_space(
        &self,
        client: Coord,
        natural_width: Scalar,
        natural_height: Scalar,
    ) -> Coord {
        let sx = if self.width > 0.0 {
            natural_width / self.width
        } else {
            1.0
        };
        let sy = if self.height > 0.0 {
            natural_height / self.height
        } else {
            1.0
        };
        Coord::new((client.x - self.x) * sx, (client.y - self.y) * sy)
    }
}

/// Rendering target the projector issues commands to.
///
/// Every triangle gets its own handle created once per geometry build; clip
/// and transform updates address triangles through those handles.
pub trait RenderSurface {
    /// Per-triangle node handle.
    type Handle: Copy;

    /// Declare viewable region sized to image native pixel dimensions.
    fn set_view_box(&mut self, width: Scalar, height: Scalar);

    /// Drop all per-triangle nodes.
    fn clear_triangles(&mut self);

    /// Create node for triangle at given index.
    fn create_triangle(&mut self, index: usize) -> Self::Handle;

    /// Update clip polygon of triangle node.
    fn set_clip(&mut self, handle: Self::Handle, polygon: &[Coord]);

    /// Update texture transform of triangle node.
    fn set_transform(&mut self, handle: Self::Handle, matrix: &TextureMatrix);

    /// Update accessible label.
    fn set_title(&mut self, title: &str);

    /// Current on-screen bounds.
    fn bounds(&self) -> SurfaceBounds;
}

impl<S> RenderSurface for &mut S
where
    S: RenderSurface + ?Sized,
{
    type Handle = S::Handle;

    fn set_view_box(&mut self, width: Scalar, height: Scalar) {
        (**self).set_view_box(width, height);
    }

    fn clear_triangles(&mut self) {
        (**self).clear_triangles();
    }

    fn create_triangle(&mut self, index: usize) -> Self::Handle {
        (**self).create_triangle(index)
    }

    fn set_clip(&mut self, handle: Self::Handle, polygon: &[Coord]) {
        (**self).set_clip(handle, polygon);
    }

    fn set_transform(&mut self, handle: Self::Handle, matrix: &TextureMatrix) {
        (**self).set_transform(handle, matrix);
    }

    fn set_title(&mut self, title: &str) {
        (**self).set_title(title);
    }

    fn bounds(&self) -> SurfaceBounds {
        (**self).bounds()
    }
}
