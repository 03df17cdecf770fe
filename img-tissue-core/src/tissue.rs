use crate::{
    animator::{Animator, AnimatorState, FrameStatus, ZoomDirection},
    coord::Coord,
    error::{TissueError, TissueResult},
    mesh::{grid::GridSize, TissueMesh},
    projector::Projector,
    scheduler::{FrameHandle, FrameQueue, FrameScheduler},
    settings::TissueSettings,
    surface::RenderSurface,
    Scalar,
};

/// Image split into triangles that can ripple-zoom towards a point.
///
/// Owns the mesh, the projector handles, the animator and both host seams:
/// the rendering surface and the frame scheduler. Any geometry rebuild
/// cancels the pending frame first, so late frames never write over fresh
/// geometry.
///
/// # Examples
/// ```
/// use img_tissue_core::prelude::*;
///
/// let surface = RecordingSurface::new(SurfaceBounds::new(0.0, 0.0, 50.0, 50.0));
/// let mut tissue = ImgTissue::new(surface, FrameQueue::default());
/// tissue.set_image_size(100.0, 100.0).unwrap();
/// tissue.zoom_in(Coord::new(25.0, 25.0), 100.0);
/// let mut time = 0.0;
/// while tissue.state() == AnimatorState::Animating {
///     tissue.tick(time);
///     time += 16.0;
/// }
/// let mesh = tissue.mesh().unwrap();
/// assert!(mesh.dst_points().iter().all(|p| *p == Coord::new(50.0, 50.0)));
/// ```
pub struct ImgTissue<S, F>
where
    S: RenderSurface,
    F: FrameScheduler,
{
    surface: S,
    scheduler: F,
    grid: GridSize,
    title: String,
    size: Option<(Scalar, Scalar)>,
    mesh: Option<TissueMesh>,
    projector: Projector<S::Handle>,
    animator: Animator,
}

impl<S, F> ImgTissue<S, F>
where
    S: RenderSurface,
    F: FrameScheduler,
{
    /// Create component with default grid and empty title.
    pub fn new(surface: S, scheduler: F) -> Self {
        Self::with_settings(surface, scheduler, &TissueSettings::default())
    }

    /// Create component from settings.
    ///
    /// # Arguments
    /// * `surface` - Rendering surface.
    /// * `scheduler` - Frame scheduler.
    /// * `settings` - Grid and title settings.
    pub fn with_settings(surface: S, scheduler: F, settings: &TissueSettings) -> Self {
        let mut result = Self {
            surface,
            scheduler,
            grid: settings.grid(),
            title: String::new(),
            size: None,
            mesh: None,
            projector: Projector::default(),
            animator: Animator::default(),
        };
        result.set_title(&settings.title);
        result
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    /// Current mesh, if image size is known.
    pub fn mesh(&self) -> Option<&TissueMesh> {
        self.mesh.as_ref()
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Image natural size, if known.
    pub fn image_size(&self) -> Option<(Scalar, Scalar)> {
        self.size
    }

    pub fn state(&self) -> AnimatorState {
        self.animator.state()
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Set image natural size and rebuild geometry.
    ///
    /// # Arguments
    /// * `width` - Natural width in pixels.
    /// * `height` - Natural height in pixels.
    ///
    /// # Returns
    /// Error when dimensions are not finite and positive.
    pub fn set_image_size(&mut self, width: Scalar, height: Scalar) -> TissueResult<()> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(TissueError::InvalidDimensions { width, height });
        }
        self.size = Some((width, height));
        self.rebuild();
        Ok(())
    }

    /// Set grid size and rebuild geometry if it changed.
    pub fn set_grid(&mut self, grid: GridSize) {
        if grid == self.grid {
            return;
        }
        self.grid = grid;
        self.rebuild();
    }

    pub fn set_columns(&mut self, columns: usize) {
        self.set_grid(self.grid.with_columns(columns));
    }

    pub fn set_rows(&mut self, rows: usize) {
        self.set_grid(self.grid.with_rows(rows));
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
        self.surface.set_title(title);
    }

    /// Start zoom towards or away from point given in surface client space.
    ///
    /// Supersedes active zoom. Ignored until image size is known.
    ///
    /// # Arguments
    /// * `client` - Focal point in client space.
    /// * `duration` - Duration of single vertex travel.
    /// * `direction` - Zoom direction.
    pub fn zoom(&mut self, client: Coord, duration: Scalar, direction: ZoomDirection) {
        let (width, height) = match self.size {
            Some(size) => size,
            None => {
                tracing::warn!("zoom requested before image size is known");
                return;
            }
        };
        let focal = self
            .surface
            .bounds()
            .to_image_space(client, width, height);
        self.animator
            .start(&mut self.scheduler, focal, duration, direction);
    }

    pub fn zoom_in(&mut self, client: Coord, duration: Scalar) {
        self.zoom(client, duration, ZoomDirection::In);
    }

    pub fn zoom_out(&mut self, client: Coord, duration: Scalar) {
        self.zoom(client, duration, ZoomDirection::Out);
    }

    /// Deliver scheduled frame.
    ///
    /// # Arguments
    /// * `handle` - Handle the scheduler returned for this frame.
    /// * `timestamp` - Frame time in milliseconds.
    ///
    /// # Returns
    /// True if frame was applied, false if it was stale.
    pub fn frame(&mut self, handle: FrameHandle, timestamp: Scalar) -> bool {
        if !self.animator.accept(handle) {
            return false;
        }
        let mesh = match self.mesh.as_mut() {
            Some(mesh) => mesh,
            None => {
                self.animator.cancel(&mut self.scheduler);
                return false;
            }
        };
        let status = self.animator.advance(mesh, timestamp);
        self.render();
        if status == FrameStatus::Continue {
            self.animator.reschedule(&mut self.scheduler);
        }
        true
    }

    /// Stop animation and restore untouched geometry.
    pub fn reset(&mut self) {
        self.rebuild();
    }

    /// Release pending frame, surface nodes and geometry.
    pub fn teardown(&mut self) {
        self.animator.cancel(&mut self.scheduler);
        self.projector.detach(&mut self.surface);
        self.mesh = None;
        tracing::debug!("tissue torn down");
    }

    /// Push current geometry to surface.
    pub fn render(&mut self) {
        if let Some(mesh) = &self.mesh {
            self.projector.project(mesh, &mut self.surface);
        }
    }

    fn rebuild(&mut self) {
        self.animator.cancel(&mut self.scheduler);
        if let Some((width, height)) = self.size {
            let mesh = TissueMesh::build(width, height, self.grid);
            self.projector = Projector::attach(&mut self.surface, &mesh);
            self.mesh = Some(mesh);
            self.render();
        }
    }
}

impl<S> ImgTissue<S, FrameQueue>
where
    S: RenderSurface,
{
    /// Deliver all due frames of internal queue at given time.
    ///
    /// # Returns
    /// True if any frame was applied.
    pub fn tick(&mut self, timestamp: Scalar) -> bool {
        let mut applied = false;
        for handle in self.scheduler.take_due() {
            applied |= self.frame(handle, timestamp);
        }
        applied
    }
}

impl<S, F> Drop for ImgTissue<S, F>
where
    S: RenderSurface,
    F: FrameScheduler,
{
    fn drop(&mut self) {
        self.animator.cancel(&mut self.scheduler);
    }
}
