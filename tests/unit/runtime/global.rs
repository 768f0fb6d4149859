use super::*;

// The registry is process-wide, so everything is exercised from a single test.
#[test]
fn registry_forwards_to_the_registered_handle() {
    let _ = unregister();
    assert_eq!(frame_count(), 0);
    assert!(!is_looping());
    no_loop();

    let handle = ControlHandle::new();
    assert!(register(handle.clone()).is_none());
    assert!(is_looping());

    no_loop();
    assert!(!handle.is_looping());
    resume_loop();
    assert!(handle.is_looping());

    handle.increment_frame_count();
    assert_eq!(frame_count(), 1);

    handle.mark_running();
    request_shutdown();
    assert!(!handle.is_running());

    let other = ControlHandle::new();
    let prev = register(other).unwrap();
    prev.increment_frame_count();
    assert_eq!(frame_count(), 0);

    assert!(unregister().is_some());
    assert!(current().is_none());
}
