//! Drawing attributes and their save/restore stack.
mod frame;
mod stack;

pub use frame::{
    DEFAULT_STROKE_WIDTH, DEFAULT_TEXT_SIZE, FontFace, FontRef, StrokeStyle, StyleFrame,
    TextAlign, TextStyle,
};
pub use stack::{StyleScope, StyleStack};
