use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SketchError::invalid_extent("x")
            .to_string()
            .contains("invalid canvas extent:")
    );
    assert!(SketchError::encode("x").to_string().contains("encode error:"));
    assert!(SketchError::decode("x").to_string().contains("decode error:"));
    assert!(SketchError::config("x").to_string().contains("config error:"));
    assert!(
        SketchError::StackUnderflow
            .to_string()
            .contains("stack underflow")
    );
}

#[test]
fn render_failure_carries_frame_context() {
    let err = SketchError::render(42, "pixmap too large");
    let msg = err.to_string();
    assert!(msg.contains("frame 42"));
    assert!(msg.contains("pixmap too large"));
}

#[test]
fn shutdown_is_transparent_and_downcastable() {
    let base = std::io::Error::other("window closed");
    let err = SketchError::Shutdown(anyhow::Error::new(base));
    assert_eq!(err.to_string(), "window closed");

    let SketchError::Shutdown(inner) = err else {
        panic!("expected shutdown variant");
    };
    assert!(inner.downcast_ref::<std::io::Error>().is_some());
}

#[test]
fn io_error_names_the_path() {
    let err = SketchError::io("out/shot.png", std::io::Error::other("denied"));
    assert!(err.to_string().contains("out/shot.png"));
}
