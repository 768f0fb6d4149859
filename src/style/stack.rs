use std::ops::{Deref, DerefMut};

use crate::foundation::error::{SketchError, SketchResult};
use crate::style::frame::StyleFrame;

/// Nested save/restore stack of [`StyleFrame`]s.
///
/// Frames live in an arena that only grows; `top` indexes the current frame. Popping leaves the
/// slot allocated so the next push at that depth overwrites it in place with `clone_from`
/// instead of allocating.
#[derive(Debug)]
pub struct StyleStack {
    frames: Vec<StyleFrame>,
    top: usize,
}

impl Default for StyleStack {
    fn default() -> Self {
        Self::new(StyleFrame::default())
    }
}

impl StyleStack {
    /// Stack holding only `base`.
    pub fn new(base: StyleFrame) -> Self {
        Self {
            frames: vec![base],
            top: 0,
        }
    }

    /// Number of live frames, base included. Never zero.
    pub fn depth(&self) -> usize {
        self.top + 1
    }

    /// Attributes new commands are drawn with.
    pub fn current(&self) -> &StyleFrame {
        &self.frames[self.top]
    }

    /// Mutable access to the top frame.
    pub fn current_mut(&mut self) -> &mut StyleFrame {
        &mut self.frames[self.top]
    }

    /// Base frame, the one Setup configures and every frame cycle starts from.
    pub fn base(&self) -> &StyleFrame {
        &self.frames[0]
    }

    /// Duplicate the current frame on top of the stack.
    pub fn push(&mut self) {
        let next = self.top + 1;
        if next == self.frames.len() {
            let copy = self.frames[self.top].clone();
            self.frames.push(copy);
        } else {
            let (below, above) = self.frames.split_at_mut(next);
            above[0].clone_from(&below[self.top]);
        }
        self.top = next;
    }

    /// Drop the current frame, restoring the one below it.
    pub fn pop(&mut self) -> SketchResult<()> {
        if self.top == 0 {
            return Err(SketchError::StackUnderflow);
        }
        self.top -= 1;
        Ok(())
    }

    /// Discard every frame above the base.
    pub fn reset_to_base(&mut self) {
        self.top = 0;
    }

    /// Pop back down to `depth` frames if the stack is deeper.
    pub(crate) fn unwind_to(&mut self, depth: usize) {
        if depth >= 1 && self.depth() > depth {
            self.top = depth - 1;
        }
    }

    /// Push a frame that is popped again when the guard drops, on every exit path.
    pub fn scope(&mut self) -> StyleScope<'_> {
        self.push();
        let depth = self.depth();
        StyleScope { stack: self, depth }
    }
}

/// Guard returned by [`StyleStack::scope`].
#[derive(Debug)]
pub struct StyleScope<'a> {
    stack: &'a mut StyleStack,
    depth: usize,
}

impl Deref for StyleScope<'_> {
    type Target = StyleStack;

    fn deref(&self) -> &StyleStack {
        self.stack
    }
}

impl DerefMut for StyleScope<'_> {
    fn deref_mut(&mut self) -> &mut StyleStack {
        self.stack
    }
}

impl Drop for StyleScope<'_> {
    fn drop(&mut self) {
        // Unbalanced pushes inside the scope are unwound along with it.
        self.stack.unwind_to(self.depth - 1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/stack.rs"]
mod tests;
