use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::foundation::core::{PixelSize, Point};
use crate::runtime::context::Runtime;

/// Callback run with the runtime right after a frame was drawn and submitted.
pub type FrameHook = Box<dyn FnOnce(&mut Runtime) + Send>;

/// Everything the scheduler reacts to, in the order it logically occurred.
pub enum Event {
    FrameReady(FrameReady),
    /// Stop the loop; a `Some` error is returned from `run` as is.
    Shutdown(Option<anyhow::Error>),
    Input(InputEvent),
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameReady(fr) => f.debug_tuple("FrameReady").field(fr).finish(),
            Self::Shutdown(err) => f.debug_tuple("Shutdown").field(err).finish(),
            Self::Input(ev) => f.debug_tuple("Input").field(ev).finish(),
        }
    }
}

/// Permission to draw one frame.
#[derive(Default)]
pub struct FrameReady {
    /// Render-target size; the canvas size when unset.
    pub size: Option<PixelSize>,
    /// Input that arrived with this frame, dispatched before Draw.
    pub inputs: Vec<InputEvent>,
    /// Run after submission. Dropped unrun when the frame is discarded.
    pub hook: Option<FrameHook>,
}

impl FrameReady {
    /// Plain frame at the canvas size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render this frame at `size` instead of the canvas size.
    pub fn with_size(mut self, size: PixelSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Attach input dispatched before Draw.
    pub fn with_input(mut self, input: InputEvent) -> Self {
        self.inputs.push(input);
        self
    }

    /// Run `hook` after the frame is submitted.
    pub fn with_hook(mut self, hook: impl FnOnce(&mut Runtime) + Send + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for FrameReady {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameReady")
            .field("size", &self.size)
            .field("inputs", &self.inputs)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Press,
    Release,
    Move,
    Drag,
    Key,
}

/// Pointer button set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Buttons(u8);

impl Buttons {
    pub const NONE: Self = Self(0);
    pub const PRIMARY: Self = Self(1);
    pub const SECONDARY: Self = Self(1 << 1);
    pub const TERTIARY: Self = Self(1 << 2);

    /// All buttons of `other` are held.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// No button held.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Buttons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    F11,
    Named(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyState {
    Press,
    Release,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent {
    pub kind: InputKind,
    /// Pointer position in device pixels.
    pub position: Point,
    pub buttons: Buttons,
    pub key: Option<(Key, KeyState)>,
}

impl InputEvent {
    /// Pointer event at a device-pixel `position`.
    pub fn pointer(kind: InputKind, position: Point, buttons: Buttons) -> Self {
        Self {
            kind,
            position,
            buttons,
            key: None,
        }
    }

    /// Key event.
    pub fn key(key: Key, state: KeyState) -> Self {
        Self {
            kind: InputKind::Key,
            position: Point::ZERO,
            buttons: Buttons::NONE,
            key: Some((key, state)),
        }
    }
}

/// Handle the ticker thread uses to request a new frame.
pub trait Invalidate: Send + 'static {
    /// Ask for a `FrameReady` to be delivered. Never draws by itself.
    fn invalidate(&self);
}

/// The single, ordered producer of [`Event`]s.
///
/// Contract: events come out in the order they occurred, and nothing follows a `Shutdown`.
pub trait EventSource {
    /// Block until the next event. A source that can no longer produce events returns
    /// `Event::Shutdown(None)`.
    fn next_event(&mut self) -> Event;

    fn invalidator(&self) -> Box<dyn Invalidate>;
}

enum Message {
    Event(Event),
    Tick,
    Closed,
}

/// Sends `Closed` once the last [`EventSender`] clone is dropped.
#[derive(Debug)]
struct SenderGuard {
    tx: Sender<Message>,
}

impl Drop for SenderGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(Message::Closed);
    }
}

/// Cloneable sending side of a [`ChannelEventSource`].
///
/// Dropping every clone disconnects the source; the loop then stops as if it had received
/// `Shutdown(None)` after the events already queued.
#[derive(Clone, Debug)]
pub struct EventSender {
    guard: Arc<SenderGuard>,
}

impl EventSender {
    /// Queue an event. Returns `false` once the source is gone.
    pub fn send(&self, event: Event) -> bool {
        self.guard.tx.send(Message::Event(event)).is_ok()
    }

    /// Queue a frame signal.
    pub fn frame(&self, frame: FrameReady) -> bool {
        self.send(Event::FrameReady(frame))
    }

    /// Queue an input event on its own, outside any frame.
    pub fn input(&self, input: InputEvent) -> bool {
        self.send(Event::Input(input))
    }

    /// Queue a shutdown; `err` is returned from `run`.
    pub fn shutdown(&self, err: Option<anyhow::Error>) -> bool {
        self.send(Event::Shutdown(err))
    }
}

/// Coalescing frame request handed to the ticker.
///
/// At most one tick is queued at a time: the flag is set here and cleared when the loop takes
/// the tick, so a Draw slower than the tick interval never builds a backlog.
struct TickHandle {
    tx: Sender<Message>,
    pending: Arc<AtomicBool>,
}

impl Invalidate for TickHandle {
    fn invalidate(&self) {
        if !self.pending.swap(true, Ordering::AcqRel) {
            // The loop may already be gone during shutdown.
            let _ = self.tx.send(Message::Tick);
        }
    }
}

/// In-process event source over an `mpsc` channel.
///
/// Events from [`EventSender`]s are delivered one by one in send order; ticker requests are
/// coalesced into a single pending `FrameReady`.
pub struct ChannelEventSource {
    rx: Receiver<Message>,
    ticks: Sender<Message>,
    tick_pending: Arc<AtomicBool>,
}

impl ChannelEventSource {
    /// Create a source and the first of its senders.
    pub fn new() -> (Self, EventSender) {
        let (tx, rx) = mpsc::channel();
        let source = Self {
            rx,
            ticks: tx.clone(),
            tick_pending: Arc::new(AtomicBool::new(false)),
        };
        let sender = EventSender {
            guard: Arc::new(SenderGuard { tx }),
        };
        (source, sender)
    }
}

impl fmt::Debug for ChannelEventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelEventSource")
            .field("tick_pending", &self.tick_pending.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl EventSource for ChannelEventSource {
    fn next_event(&mut self) -> Event {
        match self.rx.recv() {
            Ok(Message::Event(ev)) => ev,
            Ok(Message::Tick) => {
                self.tick_pending.store(false, Ordering::Release);
                Event::FrameReady(FrameReady::new())
            }
            Ok(Message::Closed) | Err(_) => Event::Shutdown(None),
        }
    }

    fn invalidator(&self) -> Box<dyn Invalidate> {
        Box::new(TickHandle {
            tx: self.ticks.clone(),
            pending: Arc::clone(&self.tick_pending),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/events.rs"]
mod tests;
