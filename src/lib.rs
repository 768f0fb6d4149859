//! Sketchbook: a creative-coding runtime.
//!
//! A [`Sketch`] supplies `setup` and `draw`; a [`Runtime`] drives the frame loop, keeps the
//! drawing-attribute stack, maps logical coordinates onto the device surface and records the
//! primitives each frame draws into a [`DisplayList`] for a [`RenderTarget`].
//!
//! ```no_run
//! use sketchbook::{ChannelEventSource, Color, FnSketch, Runtime, RuntimeConfig};
//!
//! # fn main() -> sketchbook::SketchResult<()> {
//! let mut rt = Runtime::new(RuntimeConfig::default())?;
//! let mut sketch = FnSketch::new()
//!     .setup(|rt| {
//!         rt.background(Color::gray(220));
//!         Ok(())
//!     })
//!     .draw(|rt| {
//!         rt.fill(Color::rgb(255, 0, 0));
//!         rt.rect(20.0, 20.0, 160.0, 160.0);
//!         Ok(())
//!     });
//! let (mut events, _sender) = ChannelEventSource::new();
//! rt.run(&mut sketch, &mut events)?;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

pub mod assets;
pub mod canvas;
pub mod foundation;
pub mod harness;
pub mod render;
pub mod runtime;
pub mod style;

pub use canvas::{CanvasConfig, Interval};
pub use foundation::core::{Affine, BezPath, Color, PixelSize, Point, Rect, Vec2};
pub use foundation::error::{SketchError, SketchResult};
pub use render::{CpuRenderTarget, DisplayList, DrawCommand, FrameRGBA, RenderTarget};
pub use runtime::{
    Buttons, ChannelEventSource, ControlHandle, Event, EventSender, EventSource, FnSketch,
    FrameReady, InputEvent, InputKind, Invalidate, Key, KeyState, Mouse, Runtime, RuntimeConfig,
    SchedulerState, Sketch,
};
pub use style::{FontRef, StyleFrame, StyleStack, TextAlign};
