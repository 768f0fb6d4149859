use super::*;

#[test]
fn premul_rounds_and_keeps_alpha() {
    assert_eq!(Color::rgba(255, 0, 0, 255).to_premul(), [255, 0, 0, 255]);
    assert_eq!(Color::rgba(255, 128, 0, 128).to_premul(), [128, 64, 0, 128]);
    assert_eq!(Color::TRANSPARENT.to_premul(), [0, 0, 0, 0]);
}

#[test]
fn gray_is_opaque_and_uniform() {
    assert_eq!(Color::gray(220), Color::rgba(220, 220, 220, 255));
}

#[test]
fn unpremultiply_inverts_premultiply_for_opaque_and_half_alpha() {
    let mut px = vec![200, 100, 50, 255, 255, 0, 128, 128, 10, 20, 30, 0];
    let orig = px.clone();
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);

    assert_eq!(&px[0..4], &orig[0..4]);
    for (a, b) in px[4..7].iter().zip(&orig[4..7]) {
        assert!((i16::from(*a) - i16::from(*b)).abs() <= 1);
    }
    assert_eq!(&px[8..12], &[0, 0, 0, 0]);
}

#[test]
fn pixel_size_rect_spans_surface() {
    let r = PixelSize::new(200, 100).rect();
    assert_eq!(r, Rect::new(0.0, 0.0, 200.0, 100.0));
}
