use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::foundation::error::{SketchError, SketchResult};
use crate::runtime::context::Runtime;
use crate::runtime::events::{Event, EventSource, Invalidate};
use crate::runtime::sketch::Sketch;

/// Lifecycle of [`Runtime::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SchedulerState {
    /// Not started yet.
    #[default]
    Idle,
    /// Setup done; consuming events.
    Running,
    /// Shutdown received; stopping the ticker.
    Draining,
    /// `run` returned. A runtime cannot be run again.
    Terminated,
}

/// Background thread asking for a frame every `interval`.
///
/// It only ever calls [`Invalidate::invalidate`]; drawing stays on the loop thread.
struct Ticker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn spawn(interval: Duration, invalidator: Box<dyn Invalidate>) -> std::io::Result<Self> {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = std::thread::Builder::new()
            .name("sketchbook-ticker".to_string())
            .spawn(move || {
                loop {
                    match stopped.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => invalidator.invalidate(),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;
        Ok(Self { stop, handle })
    }

    fn stop(self) {
        let _ = self.stop.send(());
        if self.handle.join().is_err() {
            tracing::warn!("ticker thread panicked");
        }
    }
}

impl Runtime {
    /// Run `sketch` until a shutdown: Setup once, then one draw cycle per accepted frame signal.
    ///
    /// Events are handled strictly in the order `events` yields them. The loop ends on a
    /// `Shutdown` event (its error, if any, is returned as [`SketchError::Shutdown`]), when
    /// the source disconnects, or when [`ControlHandle::request_shutdown`] was called, which is
    /// checked before each wait. A draw that never returns blocks shutdown.
    ///
    /// [`ControlHandle::request_shutdown`]: crate::ControlHandle::request_shutdown
    #[tracing::instrument(skip_all, fields(width = self.width(), height = self.height()))]
    pub fn run<S, E>(&mut self, sketch: &mut S, events: &mut E) -> SketchResult<()>
    where
        S: Sketch + ?Sized,
        E: EventSource + ?Sized,
    {
        if self.state != SchedulerState::Idle {
            return Err(SketchError::Other(anyhow::anyhow!(
                "runtime was already run (state {:?})",
                self.state
            )));
        }

        if let Err(e) = self.setup_sketch(sketch) {
            self.state = SchedulerState::Terminated;
            return Err(e);
        }

        self.control.mark_running();
        self.state = SchedulerState::Running;
        let ticker = match self.config.frame_interval() {
            Some(interval) => match Ticker::spawn(interval, events.invalidator()) {
                Ok(t) => Some(t),
                Err(e) => {
                    self.control.request_shutdown();
                    self.state = SchedulerState::Terminated;
                    return Err(SketchError::Other(
                        anyhow::Error::new(e).context("spawn ticker thread"),
                    ));
                }
            },
            None => None,
        };
        tracing::debug!(interval = ?self.config.frame_interval(), "frame loop started");

        let result = loop {
            if !self.control.is_running() {
                tracing::debug!("running flag cleared; stopping");
                break None;
            }
            match events.next_event() {
                Event::Shutdown(err) => break err,
                Event::FrameReady(frame) => {
                    if self.control.should_draw() {
                        self.draw_frame(sketch, frame);
                    }
                }
                Event::Input(ev) => self.dispatch_input(sketch, &ev),
            }
        };

        self.state = SchedulerState::Draining;
        if let Some(ticker) = ticker {
            ticker.stop();
        }
        self.control.request_shutdown();
        self.state = SchedulerState::Terminated;
        tracing::debug!(frames = self.control.frame_count(), "frame loop stopped");

        match result {
            Some(err) => Err(SketchError::Shutdown(err)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/scheduler.rs"]
mod tests;
