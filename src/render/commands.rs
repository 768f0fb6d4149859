use std::sync::Arc;

use crate::foundation::core::{Affine, BezPath, Color, PixelSize, Point, Rect};
use crate::style::{FontRef, TextAlign};

/// Text to be laid out and painted by the render target.
#[derive(Clone, Debug, PartialEq)]
pub struct TextCommand {
    pub text: String,
    /// Baseline anchor in device space, before alignment.
    pub anchor: Point,
    pub transform: Affine,
    pub color: Color,
    pub size: f64,
    pub align: TextAlign,
    /// Already resolved against the runtime's default font.
    pub font: FontRef,
}

/// One recorded drawing operation, in device space.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    PushClip(Rect),
    PopClip,
    /// Untransformed solid fill, used for the background.
    FillRect {
        rect: Rect,
        color: Color,
    },
    FillPath {
        path: BezPath,
        transform: Affine,
        color: Color,
    },
    StrokePath {
        path: BezPath,
        transform: Affine,
        color: Color,
        width: f64,
    },
    Text(TextCommand),
    Image {
        image: Arc<image::RgbaImage>,
        transform: Affine,
    },
}

/// Drawing commands recorded during one frame cycle.
#[derive(Clone, Debug)]
pub struct DisplayList {
    size: PixelSize,
    commands: Vec<DrawCommand>,
    open_clips: usize,
}

impl DisplayList {
    /// Empty list for a surface of `size`.
    pub fn new(size: PixelSize) -> Self {
        Self {
            size,
            commands: Vec::new(),
            open_clips: 0,
        }
    }

    /// Start a fresh frame bound to a render target of `size`, keeping the allocation.
    pub fn reset(&mut self, size: PixelSize) {
        self.size = size;
        self.commands.clear();
        self.open_clips = 0;
    }

    /// Surface size the commands are recorded for.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Commands in drawing order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clips pushed and not yet popped.
    pub fn open_clips(&self) -> usize {
        self.open_clips
    }

    /// Record `cmd`, tracking clip balance.
    pub fn push(&mut self, cmd: DrawCommand) {
        match cmd {
            DrawCommand::PushClip(_) => self.open_clips += 1,
            DrawCommand::PopClip => self.open_clips = self.open_clips.saturating_sub(1),
            _ => {}
        }
        self.commands.push(cmd);
    }

    /// Clip the following commands to `rect`.
    pub fn push_clip(&mut self, rect: Rect) {
        self.push(DrawCommand::PushClip(rect));
    }

    /// Close the innermost clip; ignored when none is open.
    pub fn pop_clip(&mut self) {
        if self.open_clips > 0 {
            self.push(DrawCommand::PopClip);
        }
    }
}
