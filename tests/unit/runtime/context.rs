use kurbo::Shape as _;

use super::*;

fn runtime(w: u32, h: u32) -> Runtime {
    Runtime::new(RuntimeConfig::manual(w, h)).unwrap()
}

fn kinds(rt: &Runtime) -> Vec<&'static str> {
    rt.display_list()
        .commands()
        .iter()
        .map(|c| match c {
            DrawCommand::PushClip(_) => "clip",
            DrawCommand::PopClip => "unclip",
            DrawCommand::FillRect { .. } => "bg",
            DrawCommand::FillPath { .. } => "fill",
            DrawCommand::StrokePath { .. } => "stroke",
            DrawCommand::Text(_) => "text",
            DrawCommand::Image { .. } => "image",
        })
        .collect()
}

#[test]
fn fresh_runtime_uses_documented_defaults() {
    let rt = Runtime::new(RuntimeConfig::default()).unwrap();
    assert_eq!((rt.width(), rt.height()), (400, 400));
    assert_eq!(rt.scheduler_state(), SchedulerState::Idle);
    assert_eq!(rt.style_depth(), 1);

    let st = rt.style();
    assert_eq!(st.background, Some(Color::TRANSPARENT));
    assert_eq!(st.fill, Some(Color::WHITE));
    assert_eq!(st.stroke_paint(), Some((Color::BLACK, 2.0)));
    assert_eq!(st.text.size, 12.0);
    assert_eq!(st.text.align, TextAlign::Start);
    assert!(st.text.font.is_default());
}

#[test]
fn invalid_canvas_keeps_the_previous_one() {
    let mut rt = runtime(100, 50);
    let err = rt.phys_canvas(100, 50, 1.0, 1.0, 0.0, 1.0).unwrap_err();
    assert!(matches!(err, SketchError::InvalidCanvasExtent(_)));
    assert!(rt.canvas(0, 10).is_err());
    assert_eq!((rt.width(), rt.height()), (100, 50));

    rt.phys_canvas(300, 200, -1.0, 1.0, 1.0, -1.0).unwrap();
    assert_eq!(rt.width(), 300);
    assert_eq!(
        rt.canvas_config().to_device(Point::new(0.0, 0.0)),
        Point::new(150.0, 100.0)
    );
}

#[test]
fn fill_and_stroke_follow_the_current_frame() {
    let mut rt = runtime(64, 64);
    rt.rect(1.0, 1.0, 10.0, 10.0);
    rt.no_fill();
    rt.triangle(0.0, 0.0, 5.0, 0.0, 0.0, 5.0);
    rt.fill(Color::rgb(0, 255, 0));
    rt.no_stroke();
    rt.circle(20.0, 20.0, 8.0);
    rt.stroke(Color::BLACK);
    rt.stroke_width(0.0);
    rt.ellipse(20.0, 20.0, 8.0, 4.0);
    rt.no_fill();
    rt.quad(0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0);

    assert_eq!(
        kinds(&rt),
        ["fill", "stroke", "stroke", "fill", "fill"]
    );
}

#[test]
fn lines_are_never_filled() {
    let mut rt = runtime(32, 32);
    rt.line(0.0, 0.0, 10.0, 10.0);
    rt.no_stroke();
    rt.line(0.0, 0.0, 10.0, 10.0);
    assert_eq!(kinds(&rt), ["stroke"]);
}

#[test]
fn shapes_are_mapped_to_device_space() {
    let mut rt = runtime(100, 100);
    rt.phys_canvas(200, 100, 0.0, 10.0, 0.0, 5.0).unwrap();
    rt.no_stroke();
    rt.rect(1.0, 1.0, 2.0, 2.0);

    let DrawCommand::FillPath { path, .. } = &rt.display_list().commands()[0] else {
        panic!("expected a fill");
    };
    let bb = path.bounding_box();
    assert_eq!((bb.x0, bb.y0, bb.x1, bb.y1), (20.0, 20.0, 60.0, 60.0));
}

#[test]
fn arc_spans_the_requested_angles() {
    let mut rt = runtime(200, 200);
    rt.no_fill();
    rt.arc(100.0, 100.0, 80.0, 40.0, 0.0, std::f64::consts::PI);

    let DrawCommand::StrokePath { path, width, .. } = &rt.display_list().commands()[0] else {
        panic!("expected a stroke");
    };
    assert_eq!(*width, 2.0);
    let bb = path.bounding_box();
    assert!((bb.x0 - 60.0).abs() < 0.5 && (bb.x1 - 140.0).abs() < 0.5, "{bb:?}");
    // y grows downward, so angles in [0, pi] sweep the lower half
    assert!((bb.y0 - 100.0).abs() < 0.5 && (bb.y1 - 120.0).abs() < 0.5, "{bb:?}");
}

#[test]
fn translate_scales_logical_offsets() {
    let mut rt = runtime(100, 100);
    rt.phys_canvas(100, 100, 0.0, 10.0, 0.0, 10.0).unwrap();
    rt.translate(1.0, 2.0);
    assert_eq!(
        rt.style().transform.translation(),
        Vec2::new(10.0, 20.0)
    );
    rt.scale(2.0, 2.0);
    rt.rotate(0.5);
    rt.reset_transform();
    assert_eq!(rt.style().transform, Affine::IDENTITY);
}

#[test]
fn push_pop_restores_attributes() {
    let mut rt = runtime(10, 10);
    rt.push();
    rt.fill(Color::rgb(1, 2, 3));
    rt.translate(3.0, 0.0);
    rt.pop().unwrap();
    assert_eq!(rt.style().fill, Some(Color::WHITE));
    assert_eq!(rt.style().transform, Affine::IDENTITY);
    assert!(matches!(rt.pop(), Err(SketchError::StackUnderflow)));
}

#[test]
fn scoped_pops_even_on_early_error() {
    let mut rt = runtime(10, 10);
    let res: SketchResult<()> = rt.scoped(|rt| {
        rt.stroke_width(9.0);
        rt.push();
        rt.canvas(0, 0)?;
        Ok(())
    });
    assert!(matches!(res, Err(SketchError::InvalidCanvasExtent(_))));
    assert_eq!(rt.style_depth(), 1);
    assert_eq!(rt.style().stroke.width, 2.0);
}

#[test]
fn scoped_pops_when_the_closure_panics() {
    let mut rt = runtime(10, 10);
    let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        rt.scoped(|rt| {
            rt.push();
            rt.fill(Color::BLACK);
            if rt.style_depth() > 1 {
                panic!("boom");
            }
        })
    }));
    assert!(caught.is_err());
    assert_eq!(rt.style_depth(), 1);
    assert_eq!(rt.style().fill, Some(Color::WHITE));
}

#[test]
fn text_resolves_the_default_font_and_anchor() {
    let mut rt = runtime(100, 100);
    rt.phys_canvas(100, 100, 0.0, 50.0, 0.0, 50.0).unwrap();
    rt.text("no font yet", 1.0, 1.0);
    let font = rt.load_font_bytes("fake", vec![0, 1, 2]);
    rt.text_size(25.0);
    rt.text_align(TextAlign::Middle);
    rt.text_color(Color::rgb(9, 9, 9));
    rt.text("hello", 10.0, 20.0);

    let cmds = rt.display_list().commands();
    let DrawCommand::Text(first) = &cmds[0] else {
        panic!("expected text");
    };
    assert!(first.font.is_default());

    let DrawCommand::Text(t) = &cmds[1] else {
        panic!("expected text");
    };
    assert_eq!(t.font, font);
    assert_eq!(t.anchor, Point::new(20.0, 40.0));
    assert_eq!(t.size, 25.0);
    assert_eq!(t.align, TextAlign::Middle);
    assert_eq!(t.color, Color::rgb(9, 9, 9));
}

#[test]
fn explicit_text_font_wins_over_the_default() {
    let mut rt = runtime(10, 10);
    let a = rt.load_font_bytes("a", vec![1]);
    let b = rt.load_font_bytes("b", vec![2]);
    rt.text_font(a.clone());
    rt.text("x", 0.0, 0.0);
    let DrawCommand::Text(t) = &rt.display_list().commands()[0] else {
        panic!("expected text");
    };
    assert_eq!(t.font, a);
    assert_ne!(t.font, b);
}

#[test]
fn draw_image_is_scoped_and_positioned() {
    let mut rt = runtime(40, 40);
    rt.translate(5.0, 0.0);
    let img = Arc::new(image::RgbaImage::new(2, 2));
    rt.draw_image(&img, 10.0, 20.0);

    assert_eq!(rt.style_depth(), 1);
    assert_eq!(rt.style().transform.translation(), Vec2::new(5.0, 0.0));
    let DrawCommand::Image { transform, .. } = &rt.display_list().commands()[0] else {
        panic!("expected image");
    };
    assert_eq!(transform.translation(), Vec2::new(15.0, 20.0));
}

#[test]
fn random_stream_is_seeded_from_config() {
    let cfg = RuntimeConfig {
        seed: 5,
        ..RuntimeConfig::manual(10, 10)
    };
    let mut a = Runtime::new(cfg.clone()).unwrap();
    let mut b = Runtime::new(cfg).unwrap();
    assert_eq!(a.random(0.0, 1.0), b.random(0.0, 1.0));
    a.random_seed(9);
    b.random_seed(9);
    assert_eq!(a.random_gaussian(0.0, 1.0), b.random_gaussian(0.0, 1.0));
}

#[test]
fn load_font_reports_missing_files() {
    let mut rt = runtime(10, 10);
    let err = rt.load_font("/definitely/not/here.ttf").unwrap_err();
    assert!(matches!(err, SketchError::Io { .. }));
}

#[test]
fn rasterize_reads_back_straight_alpha() {
    let mut rt = runtime(8, 8);
    rt.no_stroke();
    rt.fill(Color::rgba(255, 0, 0, 128));
    rt.rect(0.0, 0.0, 8.0, 8.0);
    let img = rt.rasterize().unwrap();
    let px = img.get_pixel(4, 4).0;
    assert_eq!(px[3], 128);
    assert!(px[0] >= 254, "{px:?}");
    assert_eq!(&px[1..3], &[0, 0]);
}
