/// Opaque handle of a scheduled frame callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Host "run on next frame" primitive.
pub trait FrameScheduler {
    /// Schedule callback for next display refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel previously scheduled callback. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler for hosts that pump frames themselves.
///
/// Requested handles wait in the queue until the host takes them and
/// delivers them back to the component along with a timestamp.
///
/// # Examples
/// ```
/// use img_tissue_core::prelude::*;
///
/// let mut queue = FrameQueue::default();
/// let a = queue.request_frame();
/// let b = queue.request_frame();
/// queue.cancel_frame(a);
/// assert_eq!(queue.take_due(), vec![b]);
/// assert!(queue.is_empty());
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameHandle>,
    cancelled: usize,
}

impl FrameQueue {
    /// Take all frames due for the next refresh.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    /// Frames waiting for delivery.
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of frames cancelled before delivery.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let count = self.pending.len();
        self.pending.retain(|h| *h != handle);
        self.cancelled += count - self.pending.len();
    }
}
