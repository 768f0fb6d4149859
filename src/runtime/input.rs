use crate::canvas::CanvasConfig;
use crate::foundation::core::Point;
use crate::runtime::events::{Buttons, InputEvent, InputKind, Key, KeyState};

/// Pointer state in logical units, as of the last dispatched input event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Mouse {
    pub position: Point,
    pub prev_position: Point,
    pub pressed: bool,
    pub buttons: Buttons,
}

/// What the runtime itself has to do for an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputAction {
    None,
    Quit,
    Screenshot,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct InputState {
    pub(crate) mouse: Mouse,
    pub(crate) last_key: Option<(Key, KeyState)>,
}

impl InputState {
    pub(crate) fn apply(&mut self, ev: &InputEvent, canvas: &CanvasConfig) -> InputAction {
        if let Some((key, state)) = &ev.key {
            self.last_key = Some((key.clone(), *state));
            return match (key, state) {
                (Key::Escape, _) => InputAction::Quit,
                (Key::F11, KeyState::Press) => InputAction::Screenshot,
                _ => InputAction::None,
            };
        }

        match ev.kind {
            InputKind::Press => self.mouse.pressed = true,
            InputKind::Release => self.mouse.pressed = false,
            InputKind::Move | InputKind::Drag => self.mouse.prev_position = self.mouse.position,
            InputKind::Key => {}
        }
        self.mouse.position = canvas.to_logical(ev.position);
        self.mouse.buttons = ev.buttons;
        InputAction::None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/input.rs"]
mod tests;
