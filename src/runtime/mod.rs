pub mod config;
mod context;
mod control;
mod events;
pub mod global;
mod input;
mod random;
mod scheduler;
mod sketch;

pub use config::RuntimeConfig;
pub use context::{Runtime, RuntimeScope};
pub use control::ControlHandle;
pub use events::{
    Buttons, ChannelEventSource, Event, EventSender, EventSource, FrameHook, FrameReady,
    InputEvent, InputKind, Invalidate, Key, KeyState,
};
pub use input::Mouse;
pub use random::RandomStream;
pub use scheduler::SchedulerState;
pub use sketch::{FnSketch, Sketch};
