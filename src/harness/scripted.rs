use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::foundation::error::{SketchError, SketchResult};
use crate::harness::golden::{GoldenMode, check_golden};
use crate::runtime::{ChannelEventSource, Event, FrameReady, InputEvent, Runtime, Sketch};

#[derive(Clone, Debug)]
struct GoldenCheck {
    fixture: PathBuf,
    delta: f64,
    mode: GoldenMode,
}

/// A fixed event script replayed against a runtime built with [`RuntimeConfig::manual`].
///
/// After the scripted events, one more frame and a `Shutdown` are appended. The final frame
/// takes the canvas size current when it is drawn, so a canvas set up in Setup is honored.
/// If a golden check is configured, that final frame is screenshotted and compared. Frames
/// are only drawn for scripted events, so results are deterministic.
///
/// [`RuntimeConfig::manual`]: crate::RuntimeConfig::manual
#[derive(Debug, Default)]
pub struct ScriptedRun {
    events: Vec<Event>,
    golden: Option<GoldenCheck>,
}

impl ScriptedRun {
    /// Empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any event.
    pub fn event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Append a plain frame signal.
    pub fn frame(self) -> Self {
        self.frame_with(FrameReady::new())
    }

    /// Append a prepared frame signal.
    pub fn frame_with(self, frame: FrameReady) -> Self {
        self.event(Event::FrameReady(frame))
    }

    /// Append an input event delivered outside any frame.
    pub fn input(self, input: InputEvent) -> Self {
        self.event(Event::Input(input))
    }

    /// Append an explicit shutdown; nothing scripted after it is handled.
    pub fn shutdown(self, err: Option<anyhow::Error>) -> Self {
        self.event(Event::Shutdown(err))
    }

    /// Screenshot the final frame to `fixture` and compare it with its golden file.
    pub fn golden(mut self, fixture: impl AsRef<Path>, delta: f64) -> Self {
        self.golden = Some(GoldenCheck {
            fixture: fixture.as_ref().to_path_buf(),
            delta,
            mode: GoldenMode::from_env(),
        });
        self
    }

    /// Override the mode taken from the environment; no-op without [`ScriptedRun::golden`].
    pub fn golden_mode(mut self, mode: GoldenMode) -> Self {
        if let Some(g) = self.golden.as_mut() {
            g.mode = mode;
        }
        self
    }

    /// Replay the script. Returns the run's own error first, then the golden outcome.
    pub fn run<S: Sketch + ?Sized>(self, rt: &mut Runtime, sketch: &mut S) -> SketchResult<()> {
        if rt.config().frame_interval().is_some() {
            tracing::warn!("scripted run on a ticking runtime; extra frames make it nondeterministic");
        }
        let (mut source, tx) = ChannelEventSource::new();

        for ev in self.events {
            tx.send(ev);
        }

        let outcome: Arc<Mutex<Option<SketchResult<()>>>> = Arc::new(Mutex::new(None));
        let mut last = FrameReady::new();
        if let Some(check) = self.golden.clone() {
            let slot = Arc::clone(&outcome);
            last = last.with_hook(move |rt: &mut Runtime| {
                let res = rt
                    .screenshot(&check.fixture)
                    .and_then(|()| check_golden(&check.fixture, check.delta, check.mode));
                if res.is_ok()
                    && let Err(e) = std::fs::remove_file(&check.fixture)
                {
                    tracing::warn!(path = %check.fixture.display(), error = %e, "could not remove screenshot");
                }
                *slot.lock() = Some(res);
            });
        }
        tx.frame(last);
        tx.shutdown(None);

        rt.run(sketch, &mut source)?;

        match (self.golden, outcome.lock().take()) {
            (None, _) => Ok(()),
            (Some(_), Some(res)) => res,
            (Some(check), None) => Err(SketchError::ImageMismatch(format!(
                "final frame was not drawn; nothing to compare with '{}'",
                check.fixture.display()
            ))),
        }
    }
}
