use std::sync::Arc;

use parking_lot::RwLock;

#[derive(Debug)]
struct ControlFlags {
    running: bool,
    looping: bool,
    frames: u64,
    screenshots: u32,
}

/// Flags and counters shared between the loop thread and everything else.
///
/// Cloning yields another handle to the same state. Reads take the shared lock and never block
/// each other; writes take the exclusive lock.
#[derive(Clone, Debug)]
pub struct ControlHandle {
    inner: Arc<RwLock<ControlFlags>>,
}

impl Default for ControlHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlHandle {
    /// Fresh state: looping, not running, no frames drawn.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(ControlFlags {
                running: false,
                looping: true,
                frames: 0,
                screenshots: 0,
            })),
        }
    }

    /// Restart continuous drawing after [`ControlHandle::no_loop`].
    pub fn resume_loop(&self) {
        self.inner.write().looping = true;
    }

    /// Stop drawing on every frame. The very first frame is still drawn.
    pub fn no_loop(&self) {
        self.inner.write().looping = false;
    }

    /// Whether frames after the first are drawn.
    pub fn is_looping(&self) -> bool {
        self.inner.read().looping
    }

    /// Frames drawn since the runtime started.
    pub fn frame_count(&self) -> u64 {
        self.inner.read().frames
    }

    /// Whether the loop is active and no shutdown was requested.
    pub fn is_running(&self) -> bool {
        self.inner.read().running
    }

    /// Ask the scheduler to stop before it next waits for an event.
    ///
    /// A draw cycle already in progress is not interrupted.
    pub fn request_shutdown(&self) {
        self.inner.write().running = false;
    }

    pub(crate) fn mark_running(&self) {
        self.inner.write().running = true;
    }

    pub(crate) fn increment_frame_count(&self) -> u64 {
        let mut flags = self.inner.write();
        flags.frames += 1;
        flags.frames
    }

    /// Returns the current screenshot index and advances it.
    pub(crate) fn next_screenshot_index(&self) -> u32 {
        let mut flags = self.inner.write();
        let idx = flags.screenshots;
        flags.screenshots += 1;
        idx
    }

    /// Whether a frame signal should run the draw cycle.
    ///
    /// The first frame is always drawn, even with looping disabled.
    pub(crate) fn should_draw(&self) -> bool {
        let flags = self.inner.read();
        flags.looping || flags.frames == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/control.rs"]
mod tests;
