use crate::foundation::error::SketchResult;
use crate::runtime::context::Runtime;
use crate::runtime::events::InputEvent;

/// User code driven by the runtime.
///
/// `setup` runs once before the first frame; `draw` runs once per drawn frame; `input` runs for
/// every input event after the runtime updated its mouse and key state.
/// Errors returned from `setup` abort [`Runtime::run`]; errors from `draw` and `input` are
/// logged and the loop keeps going.
pub trait Sketch {
    fn setup(&mut self, _rt: &mut Runtime) -> SketchResult<()> {
        Ok(())
    }

    fn draw(&mut self, _rt: &mut Runtime) -> SketchResult<()> {
        Ok(())
    }

    fn input(&mut self, _rt: &mut Runtime, _event: &InputEvent) -> SketchResult<()> {
        Ok(())
    }
}

type SetupFn<'a> = Box<dyn FnMut(&mut Runtime) -> SketchResult<()> + 'a>;
type DrawFn<'a> = Box<dyn FnMut(&mut Runtime) -> SketchResult<()> + 'a>;
type InputFn<'a> = Box<dyn FnMut(&mut Runtime, &InputEvent) -> SketchResult<()> + 'a>;

/// [`Sketch`] assembled from closures; missing callbacks are no-ops.
#[derive(Default)]
pub struct FnSketch<'a> {
    setup: Option<SetupFn<'a>>,
    draw: Option<DrawFn<'a>>,
    input: Option<InputFn<'a>>,
}

impl<'a> FnSketch<'a> {
    /// Sketch whose callbacks all do nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` once before the first frame.
    pub fn setup(mut self, f: impl FnMut(&mut Runtime) -> SketchResult<()> + 'a) -> Self {
        self.setup = Some(Box::new(f));
        self
    }

    /// Run `f` for every drawn frame.
    pub fn draw(mut self, f: impl FnMut(&mut Runtime) -> SketchResult<()> + 'a) -> Self {
        self.draw = Some(Box::new(f));
        self
    }

    /// Run `f` for every input event.
    pub fn input(
        mut self,
        f: impl FnMut(&mut Runtime, &InputEvent) -> SketchResult<()> + 'a,
    ) -> Self {
        self.input = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for FnSketch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSketch")
            .field("setup", &self.setup.is_some())
            .field("draw", &self.draw.is_some())
            .field("input", &self.input.is_some())
            .finish()
    }
}

impl Sketch for FnSketch<'_> {
    fn setup(&mut self, rt: &mut Runtime) -> SketchResult<()> {
        self.setup.as_mut().map_or(Ok(()), |f| f(rt))
    }

    fn draw(&mut self, rt: &mut Runtime) -> SketchResult<()> {
        self.draw.as_mut().map_or(Ok(()), |f| f(rt))
    }

    fn input(&mut self, rt: &mut Runtime, event: &InputEvent) -> SketchResult<()> {
        self.input.as_mut().map_or(Ok(()), |f| f(rt, event))
    }
}
