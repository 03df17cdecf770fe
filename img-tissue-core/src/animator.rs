use crate::{
    coord::Coord,
    ease::linear,
    mesh::TissueMesh,
    scheduler::{FrameHandle, FrameScheduler},
    Scalar,
};

/// Direction of zoom animation.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ZoomDirection {
    /// Vertices collapse onto focal point, nearest ones first.
    #[default]
    In,
    /// Vertices return from focal point to their places, farthest ones first.
    Out,
}

/// Animator state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnimatorState {
    /// No active session.
    Idle,
    /// Session is active and frames are scheduled.
    Animating,
}

/// Outcome of single animation frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameStatus {
    /// More frames are needed.
    Continue,
    /// Session finished.
    Finished,
}

/// Single zoom animation session.
///
/// Vertex distances are captured by [`ZoomSession::begin`] on the first frame;
/// until then every vertex has zero delay.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomSession {
    focal: Coord,
    direction: ZoomDirection,
    duration: Scalar,
    start: Option<Scalar>,
    distances: Vec<Scalar>,
    max_distance: Scalar,
}

impl ZoomSession {
    pub fn new(focal: Coord, duration: Scalar, direction: ZoomDirection) -> Self {
        Self {
            focal,
            direction,
            duration,
            start: None,
            distances: vec![],
            max_distance: 0.0,
        }
    }

    /// Focal point in image space.
    pub fn focal(&self) -> Coord {
        self.focal
    }

    pub fn direction(&self) -> ZoomDirection {
        self.direction
    }

    /// Duration of single vertex travel.
    pub fn duration(&self) -> Scalar {
        self.duration
    }

    /// Timestamp of first frame, unset until that frame arrives.
    pub fn start(&self) -> Option<Scalar> {
        self.start
    }

    /// Source vertex distances to focal point.
    pub fn distances(&self) -> &[Scalar] {
        &self.distances
    }

    /// Largest of [`ZoomSession::distances`].
    pub fn max_distance(&self) -> Scalar {
        self.max_distance
    }

    /// Capture start time and vertex distances.
    ///
    /// # Arguments
    /// * `timestamp` - Time of first frame.
    /// * `points` - Source vertices.
    pub fn begin(&mut self, timestamp: Scalar, points: &[Coord]) {
        self.start = Some(timestamp);
        self.distances = points
            .iter()
            .map(|p| p.distance(self.focal))
            .collect::<Vec<_>>();
        self.max_distance = self.distances.iter().copied().fold(0.0, Scalar::max);
    }

    /// Delay before vertex at given index starts moving.
    ///
    /// Zoom in staggers from the focal point outwards, zoom out the other way.
    pub fn delay(&self, index: usize) -> Scalar {
        let ratio = match self.distances.get(index) {
            Some(distance) if self.max_distance > 0.0 => distance / self.max_distance,
            _ => 0.0,
        };
        match self.direction {
            ZoomDirection::In => ratio * self.duration,
            ZoomDirection::Out => (1.0 - ratio) * self.duration,
        }
    }

    /// Position of vertex at given time.
    ///
    /// # Arguments
    /// * `index` - Vertex index.
    /// * `source` - Vertex source position.
    /// * `elapsed` - Time since session start.
    pub fn position(&self, index: usize, source: Coord, elapsed: Scalar) -> Coord {
        let delay = self.delay(index);
        let (from, to) = match self.direction {
            ZoomDirection::In => (source, self.focal),
            ZoomDirection::Out => (self.focal, source),
        };
        Coord::new(
            linear(elapsed, from.x, to.x, self.duration, delay),
            linear(elapsed, from.y, to.y, self.duration, delay),
        )
    }

    /// Tells if another frame is needed after given elapsed time.
    ///
    /// Runs up to twice the duration so the most delayed vertices finish too.
    pub fn needs_more(&self, elapsed: Scalar) -> bool {
        elapsed < self.duration * 2.0
    }
}

/// Drives zoom sessions over mesh destination points.
///
/// Tracks the handle of the last scheduled frame, so frames delivered from
/// cancelled or superseded sessions are recognised and dropped.
///
/// # Examples
/// ```
/// use img_tissue_core::prelude::*;
///
/// let mut mesh = TissueMesh::build(100.0, 100.0, GridSize::new(2, 2));
/// let mut queue = FrameQueue::default();
/// let mut animator = Animator::default();
/// animator.start(&mut queue, Coord::new(50.0, 50.0), 100.0, ZoomDirection::In);
/// let mut time = 0.0;
/// while let Some(handle) = queue.take_due().pop() {
///     assert!(animator.accept(handle));
///     if animator.advance(&mut mesh, time) == FrameStatus::Continue {
///         animator.reschedule(&mut queue);
///     }
///     time += 16.0;
/// }
/// assert_eq!(animator.state(), AnimatorState::Idle);
/// assert!(mesh.dst_points().iter().all(|p| *p == Coord::new(50.0, 50.0)));
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Animator {
    session: Option<ZoomSession>,
    pending: Option<FrameHandle>,
}

impl Animator {
    pub fn state(&self) -> AnimatorState {
        if self.session.is_some() {
            AnimatorState::Animating
        } else {
            AnimatorState::Idle
        }
    }

    pub fn session(&self) -> Option<&ZoomSession> {
        self.session.as_ref()
    }

    /// Handle of frame currently waiting for delivery.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Start new session, superseding active one.
    ///
    /// # Arguments
    /// * `scheduler` - Frame scheduler.
    /// * `focal` - Focal point in image space.
    /// * `duration` - Duration of single vertex travel.
    /// * `direction` - Zoom direction.
    pub fn start<F>(
        &mut self,
        scheduler: &mut F,
        focal: Coord,
        duration: Scalar,
        direction: ZoomDirection,
    ) where
        F: FrameScheduler + ?Sized,
    {
        if self.session.is_some() {
            tracing::debug!("superseding active zoom session");
        }
        self.cancel(scheduler);
        self.session = Some(ZoomSession::new(focal, duration, direction));
        self.pending = Some(scheduler.request_frame());
        tracing::debug!(x = focal.x, y = focal.y, duration, ?direction, "zoom started");
    }

    /// Cancel pending frame and drop session.
    pub fn cancel<F>(&mut self, scheduler: &mut F)
    where
        F: FrameScheduler + ?Sized,
    {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        self.session = None;
    }

    /// Check delivered frame handle against pending one and consume it.
    ///
    /// # Returns
    /// True if frame belongs to active session.
    pub fn accept(&mut self, handle: FrameHandle) -> bool {
        if self.pending == Some(handle) && self.session.is_some() {
            self.pending = None;
            true
        } else {
            tracing::trace!(handle = handle.id(), "stale frame dropped");
            false
        }
    }

    /// Move destination points for given frame time.
    ///
    /// # Arguments
    /// * `mesh` - Mesh to animate.
    /// * `timestamp` - Frame time.
    ///
    /// # Returns
    /// Whether session needs more frames. Finished sessions leave animator idle.
    pub fn advance(&mut self, mesh: &mut TissueMesh, timestamp: Scalar) -> FrameStatus {
        let session = match self.session.as_mut() {
            Some(session) => session,
            None => return FrameStatus::Finished,
        };
        if session.start.is_none() {
            session.begin(timestamp, mesh.src_points());
        }
        let elapsed = timestamp - session.start.unwrap_or(timestamp);
        let session = &*session;
        mesh.update_dst(|index, source| session.position(index, source, elapsed));
        if session.needs_more(elapsed) {
            FrameStatus::Continue
        } else {
            tracing::debug!(elapsed, "zoom finished");
            self.session = None;
            FrameStatus::Finished
        }
    }

    /// Schedule next frame of active session.
    pub fn reschedule<F>(&mut self, scheduler: &mut F)
    where
        F: FrameScheduler + ?Sized,
    {
        if self.session.is_some() {
            self.pending = Some(scheduler.request_frame());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mesh::grid::GridSize, scheduler::FrameQueue};
    use approx::assert_relative_eq;

    fn run(animator: &mut Animator, queue: &mut FrameQueue, mesh: &mut TissueMesh, times: &[Scalar]) {
        for time in times {
            for handle in queue.take_due() {
                if animator.accept(handle) && animator.advance(mesh, *time) == FrameStatus::Continue
                {
                    animator.reschedule(queue);
                }
            }
        }
    }

    #[test]
    fn test_vertex_on_focal_point_starts_first() {
        let mesh = TissueMesh::build(100.0, 100.0, GridSize::new(2, 2));
        let mut session = ZoomSession::new(Coord::new(0.0, 0.0), 300.0, ZoomDirection::In);
        session.begin(0.0, mesh.src_points());
        assert_eq!(session.delay(0), 0.0);
        assert_relative_eq!(session.delay(8), 300.0);
        assert_relative_eq!(session.max_distance(), 100.0 * 2.0_f64.sqrt());

        let mut session = ZoomSession::new(Coord::new(0.0, 0.0), 300.0, ZoomDirection::Out);
        session.begin(0.0, mesh.src_points());
        assert_eq!(session.delay(0), 300.0);
        assert_relative_eq!(session.delay(8), 0.0);
    }

    #[test]
    fn test_delay_before_begin_and_out_of_range() {
        let session = ZoomSession::new(Coord::new(5.0, 5.0), 100.0, ZoomDirection::In);
        assert_eq!(session.start(), None);
        assert_eq!(session.delay(3), 0.0);

        let mut session = ZoomSession::new(Coord::new(5.0, 5.0), 100.0, ZoomDirection::Out);
        session.begin(0.0, &[Coord::new(0.0, 5.0), Coord::new(5.0, 5.0)]);
        assert_eq!(session.distances(), &[5.0, 0.0]);
        assert_eq!(session.delay(1), 100.0);
        assert_eq!(session.delay(7), 100.0);
    }

    #[test]
    fn test_zoom_in_collapses_to_focal_point() {
        let mut mesh = TissueMesh::build(100.0, 100.0, GridSize::new(4, 4));
        let mut queue = FrameQueue::default();
        let mut animator = Animator::default();
        let focal = Coord::new(25.0, 75.0);
        animator.start(&mut queue, focal, 200.0, ZoomDirection::In);
        assert_eq!(animator.state(), AnimatorState::Animating);

        run(&mut animator, &mut queue, &mut mesh, &[1000.0, 1100.0]);
        // vertex at focal point moved instantly, farthest one not yet
        let far = mesh
            .src_points()
            .iter()
            .position(|p| *p == Coord::new(100.0, 0.0))
            .unwrap();
        let near = mesh.src_points().iter().position(|p| *p == focal).unwrap();
        assert_eq!(mesh.dst_points()[near], focal);
        assert_eq!(mesh.dst_points()[far], mesh.src_points()[far]);

        let times = (0..40).map(|i| 1200.0 + i as Scalar * 16.0).collect::<Vec<_>>();
        run(&mut animator, &mut queue, &mut mesh, &times);
        assert_eq!(animator.state(), AnimatorState::Idle);
        assert!(queue.is_empty());
        assert!(mesh.dst_points().iter().all(|p| *p == focal));
        assert!(mesh
            .dst_area()
            .iter()
            .all(|t| t.points().iter().all(|p| *p == focal)));
    }

    #[test]
    fn test_zoom_out_restores_source() {
        let mut mesh = TissueMesh::build(80.0, 60.0, GridSize::new(3, 3));
        let mut queue = FrameQueue::default();
        let mut animator = Animator::default();
        animator.start(&mut queue, Coord::new(40.0, 30.0), 100.0, ZoomDirection::Out);
        run(&mut animator, &mut queue, &mut mesh, &[0.0]);
        // nothing moves on the very first frame
        assert!(mesh.dst_points().iter().all(|p| *p == Coord::new(40.0, 30.0)));
        let times = (1..=25).map(|i| i as Scalar * 10.0).collect::<Vec<_>>();
        run(&mut animator, &mut queue, &mut mesh, &times);
        assert_eq!(animator.state(), AnimatorState::Idle);
        assert_eq!(mesh.dst_points(), mesh.src_points());
    }

    #[test]
    fn test_stops_after_twice_duration() {
        let mut mesh = TissueMesh::build(10.0, 10.0, GridSize::new(2, 2));
        let mut queue = FrameQueue::default();
        let mut animator = Animator::default();
        animator.start(&mut queue, Coord::new(0.0, 0.0), 50.0, ZoomDirection::In);
        run(&mut animator, &mut queue, &mut mesh, &[0.0, 99.0]);
        assert_eq!(animator.state(), AnimatorState::Animating);
        assert_eq!(queue.pending().len(), 1);
        run(&mut animator, &mut queue, &mut mesh, &[100.0]);
        assert_eq!(animator.state(), AnimatorState::Idle);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_superseded_session_frames_are_stale() {
        let mut mesh = TissueMesh::build(10.0, 10.0, GridSize::new(2, 2));
        let mut queue = FrameQueue::default();
        let mut animator = Animator::default();
        animator.start(&mut queue, Coord::new(0.0, 0.0), 50.0, ZoomDirection::In);
        let first = animator.pending().unwrap();
        animator.start(&mut queue, Coord::new(10.0, 10.0), 50.0, ZoomDirection::In);
        assert_eq!(queue.cancelled(), 1);
        assert!(!animator.accept(first));
        assert_eq!(animator.state(), AnimatorState::Animating);
    }

    #[test]
    fn test_cancel_goes_idle() {
        let mut queue = FrameQueue::default();
        let mut animator = Animator::default();
        animator.start(&mut queue, Coord::new(0.0, 0.0), 50.0, ZoomDirection::In);
        animator.cancel(&mut queue);
        assert_eq!(animator.state(), AnimatorState::Idle);
        assert!(animator.pending().is_none());
        assert!(queue.is_empty());
    }
}
