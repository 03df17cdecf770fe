use crate::{
    affine::TextureMatrix,
    coord::Coord,
    surface::{RenderSurface, SurfaceBounds},
    Scalar,
};
use serde::{Deserialize, Serialize};

/// Command received by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceCommand {
    ViewBox(Scalar, Scalar),
    ClearTriangles,
    CreateTriangle(usize),
    Clip(usize, Vec<Coord>),
    Transform(usize, TextureMatrix),
    Title(String),
}

/// Surface that only records commands and keeps latest per-triangle state.
///
/// Useful for headless hosts and for inspecting what the projector emits.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingSurface {
    bounds: SurfaceBounds,
    commands: Vec<SurfaceCommand>,
    clips: Vec<Vec<Coord>>,
    transforms: Vec<TextureMatrix>,
    title: String,
}

impl RecordingSurface {
    pub fn new(bounds: SurfaceBounds) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    pub fn set_bounds(&mut self, bounds: SurfaceBounds) {
        self.bounds = bounds;
    }

    /// All commands received so far.
    pub fn commands(&self) -> &[SurfaceCommand] {
        &self.commands
    }

    /// Forget recorded commands, keeping latest state.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Latest clip polygons by triangle index.
    pub fn clips(&self) -> &[Vec<Coord>] {
        &self.clips
    }

    /// Latest transforms by triangle index.
    pub fn transforms(&self) -> &[TextureMatrix] {
        &self.transforms
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl RenderSurface for RecordingSurface {
    type Handle = usize;

    fn set_view_box(&mut self, width: Scalar, height: Scalar) {
        self.commands.push(SurfaceCommand::ViewBox(width, height));
    }

    fn clear_triangles(&mut self) {
        self.clips.clear();
        self.transforms.clear();
        self.commands.push(SurfaceCommand::ClearTriangles);
    }

    fn create_triangle(&mut self, index: usize) -> Self::Handle {
        let handle = self.clips.len();
        self.clips.push(vec![]);
        self.transforms.push(TextureMatrix::IDENTITY);
        self.commands.push(SurfaceCommand::CreateTriangle(index));
        handle
    }

    fn set_clip(&mut self, handle: Self::Handle, polygon: &[Coord]) {
        self.clips[handle] = polygon.to_vec();
        self.commands
            .push(SurfaceCommand::Clip(handle, polygon.to_vec()));
    }

    fn set_transform(&mut self, handle: Self::Handle, matrix: &TextureMatrix) {
        self.transforms[handle] = *matrix;
        self.commands.push(SurfaceCommand::Transform(handle, *matrix));
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
        self.commands.push(SurfaceCommand::Title(title.to_owned()));
    }

    fn bounds(&self) -> SurfaceBounds {
        self.bounds
    }
}
