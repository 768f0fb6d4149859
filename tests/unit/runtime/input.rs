use super::*;
use crate::canvas::Interval;

fn pointer(kind: InputKind, x: f64, y: f64, buttons: Buttons) -> InputEvent {
    InputEvent::pointer(kind, Point::new(x, y), buttons)
}

#[test]
fn press_move_release_tracks_logical_position() {
    let canvas =
        CanvasConfig::new(200, 100, Interval::new(-1.0, 1.0), Interval::new(0.0, 10.0)).unwrap();
    let mut st = InputState::default();

    st.apply(&pointer(InputKind::Press, 100.0, 50.0, Buttons::PRIMARY), &canvas);
    assert!(st.mouse.pressed);
    assert_eq!(st.mouse.position, Point::new(0.0, 5.0));
    assert!(st.mouse.buttons.contains(Buttons::PRIMARY));

    st.apply(&pointer(InputKind::Drag, 200.0, 0.0, Buttons::PRIMARY), &canvas);
    assert_eq!(st.mouse.prev_position, Point::new(0.0, 5.0));
    assert_eq!(st.mouse.position, Point::new(1.0, 0.0));

    st.apply(&pointer(InputKind::Release, 200.0, 0.0, Buttons::NONE), &canvas);
    assert!(!st.mouse.pressed);
    assert!(st.mouse.buttons.is_empty());
    // release does not shift the previous position
    assert_eq!(st.mouse.prev_position, Point::new(0.0, 5.0));
}

#[test]
fn special_keys_map_to_actions() {
    let canvas = CanvasConfig::pixels(10, 10).unwrap();
    let mut st = InputState::default();

    let ev = InputEvent::key(Key::F11, KeyState::Press);
    assert_eq!(st.apply(&ev, &canvas), InputAction::Screenshot);
    let ev = InputEvent::key(Key::F11, KeyState::Release);
    assert_eq!(st.apply(&ev, &canvas), InputAction::None);
    let ev = InputEvent::key(Key::Escape, KeyState::Release);
    assert_eq!(st.apply(&ev, &canvas), InputAction::Quit);
    let ev = InputEvent::key(Key::Named("a".into()), KeyState::Press);
    assert_eq!(st.apply(&ev, &canvas), InputAction::None);
    assert_eq!(
        st.last_key,
        Some((Key::Named("a".into()), KeyState::Press))
    );
}

#[test]
fn key_events_leave_the_mouse_alone() {
    let canvas = CanvasConfig::pixels(10, 10).unwrap();
    let mut st = InputState::default();
    st.apply(&pointer(InputKind::Move, 3.0, 4.0, Buttons::NONE), &canvas);
    st.apply(&InputEvent::key(Key::Escape, KeyState::Press), &canvas);
    assert_eq!(st.mouse.position, Point::new(3.0, 4.0));
}
