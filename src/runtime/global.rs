//! Process-wide registry of one [`ControlHandle`], for boundary code (signal handlers, bindings)
//! that cannot thread a runtime through its call chain.
//!
//! Only control operations are reachable this way; drawing always goes through an explicit
//! [`Runtime`](crate::Runtime).

use parking_lot::RwLock;

use crate::runtime::control::ControlHandle;

static CURRENT: RwLock<Option<ControlHandle>> = parking_lot::const_rwlock(None);

/// Make `handle` the global one, returning the previously registered handle.
pub fn register(handle: ControlHandle) -> Option<ControlHandle> {
    CURRENT.write().replace(handle)
}

/// Remove the registered handle and return it.
pub fn unregister() -> Option<ControlHandle> {
    CURRENT.write().take()
}

/// The registered handle, if any.
pub fn current() -> Option<ControlHandle> {
    CURRENT.read().clone()
}

/// Frames drawn by the registered runtime; `0` when none is registered.
pub fn frame_count() -> u64 {
    current().map_or(0, |h| h.frame_count())
}

/// Looping flag of the registered runtime; `false` without one.
pub fn is_looping() -> bool {
    current().is_some_and(|h| h.is_looping())
}

/// Stop continuous drawing on the registered runtime.
pub fn no_loop() {
    with_current("no_loop", ControlHandle::no_loop);
}

/// Restart continuous drawing on the registered runtime.
pub fn resume_loop() {
    with_current("resume_loop", ControlHandle::resume_loop);
}

/// Ask the registered runtime to stop.
pub fn request_shutdown() {
    with_current("request_shutdown", ControlHandle::request_shutdown);
}

fn with_current(op: &str, f: impl FnOnce(&ControlHandle)) {
    match current() {
        Some(h) => f(&h),
        None => tracing::warn!(op, "no runtime registered; ignoring"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/global.rs"]
mod tests;
