use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::Arc;

use crate::assets;
use crate::canvas::{CanvasConfig, Interval};
use crate::foundation::core::{Affine, BezPath, Color, PixelSize, Point, Vec2};
use crate::foundation::error::{SketchError, SketchResult};
use crate::render::{CpuRenderTarget, DisplayList, DrawCommand, RenderTarget, TextCommand};
use crate::runtime::config::RuntimeConfig;
use crate::runtime::control::ControlHandle;
use crate::runtime::events::{FrameReady, InputEvent, Key, KeyState};
use crate::runtime::input::{InputAction, InputState, Mouse};
use crate::runtime::random::RandomStream;
use crate::runtime::scheduler::SchedulerState;
use crate::runtime::sketch::Sketch;
use crate::style::{FontFace, FontRef, StyleFrame, StyleStack, TextAlign};

/// Curve flattening tolerance for arcs and ellipses, in logical units.
const CURVE_TOLERANCE: f64 = 0.1;

/// A sketch's drawing state and the public surface user code talks to.
///
/// Everything here is owned by the loop thread. The only state shared with other threads is the
/// [`ControlHandle`] returned by [`Runtime::control`].
pub struct Runtime {
    pub(crate) config: RuntimeConfig,
    pub(crate) control: ControlHandle,
    canvas: CanvasConfig,
    pub(crate) styles: StyleStack,
    rng: RandomStream,
    list: DisplayList,
    target: Box<dyn RenderTarget>,
    target_size: PixelSize,
    input: InputState,
    default_font: FontRef,
    pub(crate) state: SchedulerState,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("canvas", &self.canvas)
            .field("state", &self.state)
            .field("frame_count", &self.control.frame_count())
            .field("style_depth", &self.styles.depth())
            .finish_non_exhaustive()
    }
}

impl Runtime {
    /// Runtime drawing into a headless [`CpuRenderTarget`].
    pub fn new(config: RuntimeConfig) -> SketchResult<Self> {
        let size = PixelSize::new(config.width, config.height);
        let canvas = CanvasConfig::pixels(size.width, size.height)?;
        let target =
            CpuRenderTarget::new(size).map_err(|e| SketchError::render(0, format!("{e:#}")))?;
        Ok(Self::assemble(config, canvas, Box::new(target)))
    }

    /// Runtime drawing into a caller-provided render target.
    pub fn with_target(config: RuntimeConfig, target: Box<dyn RenderTarget>) -> SketchResult<Self> {
        let canvas = CanvasConfig::pixels(config.width, config.height)?;
        Ok(Self::assemble(config, canvas, target))
    }

    fn assemble(config: RuntimeConfig, canvas: CanvasConfig, target: Box<dyn RenderTarget>) -> Self {
        let size = canvas.size();
        Self {
            rng: RandomStream::new(config.seed),
            config,
            control: ControlHandle::new(),
            canvas,
            styles: StyleStack::default(),
            list: DisplayList::new(size),
            target,
            target_size: size,
            input: InputState::default(),
            default_font: FontRef::default(),
            state: SchedulerState::Idle,
        }
    }

    /// Configuration the runtime was created with.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Another handle to the loop/frame/shutdown state, usable from any thread.
    pub fn control(&self) -> ControlHandle {
        self.control.clone()
    }

    /// Where the frame loop currently is.
    pub fn scheduler_state(&self) -> SchedulerState {
        self.state
    }

    /// Frames drawn so far.
    pub fn frame_count(&self) -> u64 {
        self.control.frame_count()
    }

    /// Whether frames after the first are drawn.
    pub fn is_looping(&self) -> bool {
        self.control.is_looping()
    }

    /// Restart continuous drawing.
    pub fn resume_loop(&self) {
        self.control.resume_loop();
    }

    /// Stop continuous drawing. The first frame is drawn regardless.
    pub fn no_loop(&self) {
        self.control.no_loop();
    }

    /// Size the canvas in pixels, with logical units equal to pixels.
    pub fn canvas(&mut self, width: u32, height: u32) -> SketchResult<()> {
        self.canvas = CanvasConfig::pixels(width, height)?;
        Ok(())
    }

    /// Size the canvas in pixels and map the logical extent `[xmin,xmax] x [ymin,ymax]` onto it.
    pub fn phys_canvas(
        &mut self,
        width: u32,
        height: u32,
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
    ) -> SketchResult<()> {
        self.canvas = CanvasConfig::new(
            width,
            height,
            Interval::new(xmin, xmax),
            Interval::new(ymin, ymax),
        )?;
        Ok(())
    }

    /// Current logical/device mapping.
    pub fn canvas_config(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.canvas.size().width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.canvas.size().height
    }

    /// Attributes in effect right now.
    pub fn style(&self) -> &StyleFrame {
        self.styles.current()
    }

    /// Number of style frames, 1 when nothing is pushed.
    pub fn style_depth(&self) -> usize {
        self.styles.depth()
    }

    /// Background painted at the start of every frame once set on the base frame.
    pub fn background(&mut self, c: Color) {
        self.styles.current_mut().background = Some(c);
    }

    /// Fill subsequent shapes with `c`.
    pub fn fill(&mut self, c: Color) {
        self.styles.current_mut().fill = Some(c);
    }

    /// Draw subsequent shapes without fill.
    pub fn no_fill(&mut self) {
        self.styles.current_mut().fill = None;
    }

    /// Outline subsequent shapes with `c`.
    pub fn stroke(&mut self, c: Color) {
        self.styles.current_mut().stroke.color = Some(c);
    }

    /// Draw subsequent shapes without outline.
    pub fn no_stroke(&mut self) {
        self.styles.current_mut().stroke.color = None;
    }

    /// Stroke width in device pixels; `0` disables stroking.
    pub fn stroke_width(&mut self, width: f64) {
        self.styles.current_mut().stroke.width = width;
    }

    /// Text size in device pixels.
    pub fn text_size(&mut self, size: f64) {
        self.styles.current_mut().text.size = size;
    }

    /// Horizontal placement of text relative to its anchor.
    pub fn text_align(&mut self, align: TextAlign) {
        self.styles.current_mut().text.align = align;
    }

    /// Color of subsequent text.
    pub fn text_color(&mut self, c: Color) {
        self.styles.current_mut().text.color = c;
    }

    /// Font for subsequent text; the default handle means the runtime's default font.
    pub fn text_font(&mut self, font: FontRef) {
        self.styles.current_mut().text.font = font;
    }

    /// Load a TrueType/OpenType font and make it the default for text without an explicit font.
    pub fn load_font(&mut self, path: impl AsRef<Path>) -> SketchResult<FontRef> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| SketchError::io(path, e))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(self.load_font_bytes(name, bytes))
    }

    /// Register font bytes under `name` and make them the default font.
    pub fn load_font_bytes(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> FontRef {
        let font = FontRef::new(FontFace::new(name, bytes));
        self.default_font = font.clone();
        font
    }

    /// Save the current attributes; balance with [`Runtime::pop`].
    pub fn push(&mut self) {
        self.styles.push();
    }

    /// Restore the attributes saved by the matching [`Runtime::push`].
    pub fn pop(&mut self) -> SketchResult<()> {
        self.styles.pop()
    }

    /// Push a frame that is popped when the returned guard drops.
    pub fn scope(&mut self) -> RuntimeScope<'_> {
        self.styles.push();
        let depth = self.styles.depth();
        RuntimeScope { rt: self, depth }
    }

    /// Run `f` inside a pushed frame; the frame is popped on every exit path.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Runtime) -> R) -> R {
        let mut scope = self.scope();
        f(&mut scope)
    }

    /// Move the origin by a logical offset.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        let d = self.canvas.to_device_len(Vec2::new(dx, dy));
        self.pre_transform(Affine::translate(d));
    }

    /// Rotate by `angle` radians around the current origin.
    pub fn rotate(&mut self, angle: f64) {
        self.pre_transform(Affine::rotate(angle));
    }

    /// Scale subsequent drawing about the current origin.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.pre_transform(Affine::scale_non_uniform(sx, sy));
    }

    /// Drop all translations, rotations and scales of the current frame.
    pub fn reset_transform(&mut self) {
        self.styles.current_mut().transform = Affine::IDENTITY;
    }

    fn pre_transform(&mut self, a: Affine) {
        let cur = &mut self.styles.current_mut().transform;
        *cur = *cur * a;
    }

    /// Uniform draw from `[min, max)`.
    pub fn random(&mut self, min: f64, max: f64) -> f64 {
        self.rng.uniform(min, max)
    }

    /// Normal draw with the given mean and standard deviation.
    pub fn random_gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        self.rng.gaussian(mean, std_dev)
    }

    /// Restart the random stream from `seed`.
    pub fn random_seed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    /// Pointer state in logical units.
    pub fn mouse(&self) -> Mouse {
        self.input.mouse
    }

    /// Most recent key event, if any.
    pub fn last_key(&self) -> Option<&(Key, KeyState)> {
        self.input.last_key.as_ref()
    }

    /// Stroke a segment; lines are never filled.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let mut path = BezPath::new();
        path.move_to((x1, y1));
        path.line_to((x2, y2));
        self.emit_path(path, false);
    }

    /// Rectangle with its top-left corner at `(x, y)`.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.polygon(&[(x, y), (x + w, y), (x + w, y + h), (x, y + h)]);
    }

    /// Ellipse centered on `(x, y)` with the given width and height.
    pub fn ellipse(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let e = kurbo::Ellipse::new((x, y), (0.5 * w, 0.5 * h), 0.0);
        self.emit_path(kurbo::Shape::to_path(&e, CURVE_TOLERANCE), true);
    }

    /// Circle of diameter `d` centered on `(x, y)`.
    pub fn circle(&mut self, x: f64, y: f64, d: f64) {
        self.ellipse(x, y, d, d);
    }

    /// Elliptical arc centered on `(x, y)` from angle `start` to `stop`, in radians.
    pub fn arc(&mut self, x: f64, y: f64, w: f64, h: f64, start: f64, stop: f64) {
        let arc = kurbo::Arc::new((x, y), (0.5 * w, 0.5 * h), start, stop - start, 0.0);
        let path: BezPath = kurbo::Shape::path_elements(&arc, CURVE_TOLERANCE).collect();
        self.emit_path(path, true);
    }

    /// Triangle through three logical points.
    pub fn triangle(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.polygon(&[(x1, y1), (x2, y2), (x3, y3)]);
    }

    /// Quadrilateral through four logical points, in order.
    #[allow(clippy::too_many_arguments)]
    pub fn quad(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
        x4: f64,
        y4: f64,
    ) {
        self.polygon(&[(x1, y1), (x2, y2), (x3, y3), (x4, y4)]);
    }

    /// Draw `txt` with its baseline anchored at `(x, y)`.
    pub fn text(&mut self, txt: &str, x: f64, y: f64) {
        let cur = self.styles.current();
        let font = if cur.text.font.is_default() {
            self.default_font.clone()
        } else {
            cur.text.font.clone()
        };
        let cmd = TextCommand {
            text: txt.to_string(),
            anchor: self.canvas.to_device(Point::new(x, y)),
            transform: cur.transform,
            color: cur.text.color,
            size: cur.text.size,
            align: cur.text.align,
            font,
        };
        self.list.push(DrawCommand::Text(cmd));
    }

    /// Draw `img` with its top-left corner at `(x, y)`, at one image pixel per device pixel.
    pub fn draw_image(&mut self, img: &Arc<image::RgbaImage>, x: f64, y: f64) {
        let origin = self.canvas.to_device(Point::new(x, y)).to_vec2();
        self.scoped(|rt| {
            rt.pre_transform(Affine::translate(origin));
            let transform = rt.styles.current().transform;
            rt.list.push(DrawCommand::Image {
                image: Arc::clone(img),
                transform,
            });
        });
    }

    fn polygon(&mut self, pts: &[(f64, f64)]) {
        let mut path = BezPath::new();
        for (i, &p) in pts.iter().enumerate() {
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        path.close_path();
        self.emit_path(path, true);
    }

    /// Record fill and stroke of a path given in logical units.
    fn emit_path(&mut self, mut path: BezPath, fillable: bool) {
        path.apply_affine(self.canvas.device_transform());
        let cur = self.styles.current();
        let transform = cur.transform;
        let fill = cur.fill.filter(|_| fillable);
        let stroke = cur.stroke_paint();

        match (fill, stroke) {
            (None, None) => {}
            (Some(color), None) => self.list.push(DrawCommand::FillPath {
                path,
                transform,
                color,
            }),
            (fill, Some((color, width))) => {
                if let Some(fill) = fill {
                    self.list.push(DrawCommand::FillPath {
                        path: path.clone(),
                        transform,
                        color: fill,
                    });
                }
                self.list.push(DrawCommand::StrokePath {
                    path,
                    transform,
                    color,
                    width,
                });
            }
        }
    }

    /// Commands recorded so far in the current (or last) frame.
    pub fn display_list(&self) -> &DisplayList {
        &self.list
    }

    /// Render the current display list and read it back as straight-alpha RGBA.
    pub fn rasterize(&mut self) -> SketchResult<image::RgbaImage> {
        let frame = self.control.frame_count();
        self.sync_target(self.list.size())
            .map_err(|e| SketchError::render(frame, format!("{e:#}")))?;
        let pixels = self
            .target
            .rasterize(&self.list)
            .map_err(|e| SketchError::render(frame, format!("{e:#}")))?;
        pixels
            .into_rgba_image()
            .map_err(|e| SketchError::render(frame, format!("{e:#}")))
    }

    /// Save the current canvas to `path` as PNG, JPEG or GIF, chosen by extension.
    ///
    /// Unknown extensions are written as PNG. Nothing is left at `path` on failure.
    #[tracing::instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn screenshot(&mut self, path: impl AsRef<Path>) -> SketchResult<()> {
        let img = self.rasterize()?;
        assets::write_image(path.as_ref(), &img)?;
        Ok(())
    }

    /// Read a BMP, JPEG, GIF, PNG or TIFF image, identified by its header.
    pub fn read_image(&self, path: impl AsRef<Path>) -> SketchResult<Arc<image::RgbaImage>> {
        assets::read_image(path.as_ref()).map(Arc::new)
    }

    fn sync_target(&mut self, size: PixelSize) -> anyhow::Result<()> {
        if size != self.target_size {
            self.target.resize(size)?;
            self.target_size = size;
        }
        Ok(())
    }

    /// Run Setup against the base frame, then match the render target to the canvas.
    pub(crate) fn setup_sketch<S: Sketch + ?Sized>(&mut self, sketch: &mut S) -> SketchResult<()> {
        sketch.setup(self)?;
        if self.styles.depth() != 1 {
            tracing::warn!(
                depth = self.styles.depth(),
                "setup left pushed style frames; discarding them"
            );
            self.styles.reset_to_base();
        }
        let size = self.canvas.size();
        self.sync_target(size)
            .map_err(|e| SketchError::render(0, format!("{e:#}")))?;
        self.list.reset(size);
        Ok(())
    }

    /// One full draw cycle for an accepted frame signal.
    pub(crate) fn draw_frame<S: Sketch + ?Sized>(
        &mut self,
        sketch: &mut S,
        frame: FrameReady,
    ) {
        let n = self.control.increment_frame_count();
        let size = frame.size.unwrap_or_else(|| self.canvas.size());

        self.list.reset(size);
        self.list.push_clip(size.rect());
        if let Some(bg) = self.styles.base().background
            && !bg.is_transparent()
        {
            self.list.push(DrawCommand::FillRect {
                rect: size.rect(),
                color: bg,
            });
        }

        for ev in &frame.inputs {
            self.dispatch_input(sketch, ev);
        }

        debug_assert_eq!(
            self.styles.depth(),
            1,
            "style stack must be at its base frame when a frame starts"
        );
        if self.styles.depth() != 1 {
            tracing::warn!(
                frame = n,
                depth = self.styles.depth(),
                "unbalanced style push; resetting to base frame"
            );
            self.styles.reset_to_base();
        }

        if let Err(e) = sketch.draw(self) {
            tracing::error!(frame = n, error = %e, "draw failed");
        }

        self.list.pop_clip();
        let submitted = self
            .sync_target(size)
            .and_then(|()| self.target.submit(&self.list));
        if let Err(e) = submitted {
            let err = SketchError::render(n, format!("{e:#}"));
            tracing::error!(error = %err, "frame not presented");
        }

        if let Some(hook) = frame.hook {
            hook(self);
        }
    }

    /// Update input state, apply the built-in key bindings, then hand the event to the sketch.
    pub(crate) fn dispatch_input<S: Sketch + ?Sized>(&mut self, sketch: &mut S, ev: &InputEvent) {
        match self.input.apply(ev, &self.canvas) {
            InputAction::None => {}
            InputAction::Quit => {
                tracing::info!("escape pressed; stopping");
                self.control.request_shutdown();
            }
            InputAction::Screenshot => {
                let idx = self.control.next_screenshot_index();
                let path = self.config.screenshot_dir.join(format!("out-{idx:03}.png"));
                if let Err(e) = self.screenshot(&path) {
                    tracing::error!(path = %path.display(), error = %e, "could not take screenshot");
                }
            }
        }

        if let Err(e) = sketch.input(self, ev) {
            tracing::error!(error = %e, "input callback failed");
        }
    }
}

/// Guard returned by [`Runtime::scope`]; dereferences to the runtime.
pub struct RuntimeScope<'a> {
    rt: &'a mut Runtime,
    depth: usize,
}

impl Deref for RuntimeScope<'_> {
    type Target = Runtime;

    fn deref(&self) -> &Runtime {
        self.rt
    }
}

impl DerefMut for RuntimeScope<'_> {
    fn deref_mut(&mut self) -> &mut Runtime {
        self.rt
    }
}

impl Drop for RuntimeScope<'_> {
    fn drop(&mut self) {
        self.rt.styles.unwind_to(self.depth - 1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/context.rs"]
mod tests;
