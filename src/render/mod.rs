mod backend;
mod commands;
mod cpu;
pub(crate) mod text;

pub use backend::{FrameRGBA, RenderTarget};
pub use commands::{DisplayList, DrawCommand, TextCommand};
pub use cpu::CpuRenderTarget;
