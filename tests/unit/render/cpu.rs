use super::*;
use crate::foundation::core::{Point, Rect};

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn fill_rect_lands_in_device_space() {
    let size = PixelSize::new(32, 16);
    let mut target = CpuRenderTarget::new(size).unwrap();
    let mut list = DisplayList::new(size);
    list.push(DrawCommand::FillRect {
        rect: size.rect(),
        color: Color::gray(10),
    });
    list.push(DrawCommand::FillRect {
        rect: Rect::new(16.0, 0.0, 32.0, 16.0),
        color: Color::rgb(255, 0, 0),
    });

    let frame = target.rasterize(&list).unwrap();
    assert_eq!(frame.size(), size);
    assert!(frame.premultiplied);
    assert_eq!(px(&frame, 2, 2), [10, 10, 10, 255]);
    assert_eq!(px(&frame, 20, 8), [255, 0, 0, 255]);
}

#[test]
fn clip_limits_painting() {
    let size = PixelSize::new(16, 16);
    let mut target = CpuRenderTarget::new(size).unwrap();
    let mut list = DisplayList::new(size);
    list.push_clip(Rect::new(0.0, 0.0, 8.0, 16.0));
    list.push(DrawCommand::FillRect {
        rect: size.rect(),
        color: Color::WHITE,
    });
    list.pop_clip();

    let frame = target.rasterize(&list).unwrap();
    assert_eq!(px(&frame, 2, 8), [255, 255, 255, 255]);
    assert_eq!(px(&frame, 12, 8), [0, 0, 0, 0]);
}

#[test]
fn transformed_path_is_filled() {
    let size = PixelSize::new(20, 20);
    let mut target = CpuRenderTarget::new(size).unwrap();
    let mut list = DisplayList::new(size);
    let mut path = BezPath::new();
    path.move_to(Point::new(0.0, 0.0));
    path.line_to(Point::new(4.0, 0.0));
    path.line_to(Point::new(4.0, 4.0));
    path.line_to(Point::new(0.0, 4.0));
    path.close_path();
    list.push(DrawCommand::FillPath {
        path,
        transform: Affine::translate((10.0, 10.0)),
        color: Color::rgb(0, 0, 255),
    });

    let frame = target.rasterize(&list).unwrap();
    assert_eq!(px(&frame, 12, 12), [0, 0, 255, 255]);
    assert_eq!(px(&frame, 2, 2), [0, 0, 0, 0]);
}

#[test]
fn text_without_font_is_skipped() {
    let size = PixelSize::new(16, 16);
    let mut target = CpuRenderTarget::new(size).unwrap();
    let mut list = DisplayList::new(size);
    list.push(DrawCommand::Text(TextCommand {
        text: "hi".to_string(),
        anchor: Point::new(2.0, 12.0),
        transform: Affine::IDENTITY,
        color: Color::BLACK,
        size: 12.0,
        align: crate::style::TextAlign::Start,
        font: crate::style::FontRef::default(),
    }));

    target.submit(&list).unwrap();
    target.submit(&list).unwrap();
    assert!(target.warned_missing_font);
    assert_eq!(target.submitted_frames(), 2);
    assert!(target.last_frame().data.iter().all(|&b| b == 0));
}

#[test]
fn image_commands_draw_straight_alpha_sources() {
    let size = PixelSize::new(8, 8);
    let mut target = CpuRenderTarget::new(size).unwrap();
    let img = Arc::new(image::RgbaImage::from_pixel(
        2,
        2,
        image::Rgba([0, 255, 0, 255]),
    ));
    let mut list = DisplayList::new(size);
    list.push(DrawCommand::Image {
        image: Arc::clone(&img),
        transform: Affine::translate((4.0, 4.0)),
    });

    let frame = target.rasterize(&list).unwrap();
    assert_eq!(px(&frame, 5, 5), [0, 255, 0, 255]);
    assert_eq!(px(&frame, 1, 1), [0, 0, 0, 0]);
    assert_eq!(target.images.len(), 1);

    list.reset(size);
    target.rasterize(&list).unwrap();
    assert!(target.images.is_empty());
}

#[test]
fn mismatched_list_size_is_rejected_until_resized() {
    let mut target = CpuRenderTarget::new(PixelSize::new(8, 8)).unwrap();
    let list = DisplayList::new(PixelSize::new(10, 6));
    assert!(target.submit(&list).is_err());
    assert_eq!(target.submitted_frames(), 0);

    target.resize(PixelSize::new(10, 6)).unwrap();
    target.submit(&list).unwrap();
    assert_eq!(target.last_frame().size(), PixelSize::new(10, 6));
}

#[test]
fn zero_sized_surface_is_rejected() {
    assert!(CpuRenderTarget::new(PixelSize::new(0, 4)).is_err());
    assert!(CpuRenderTarget::new(PixelSize::new(70_000, 4)).is_err());
}
