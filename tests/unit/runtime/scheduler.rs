use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::runtime::config::RuntimeConfig;
use crate::runtime::events::ChannelEventSource;
use crate::runtime::sketch::FnSketch;

#[derive(Clone)]
struct Counter(Arc<AtomicUsize>);

impl Invalidate for Counter {
    fn invalidate(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn ticker_only_invalidates_until_stopped() {
    let count = Arc::new(AtomicUsize::new(0));
    let ticker = Ticker::spawn(
        Duration::from_millis(1),
        Box::new(Counter(Arc::clone(&count))),
    )
    .unwrap();
    while count.load(Ordering::SeqCst) < 3 {
        std::thread::sleep(Duration::from_millis(1));
    }
    ticker.stop();

    let after = count.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(10));
    assert_eq!(count.load(Ordering::SeqCst), after);
}

#[test]
fn failed_setup_terminates_without_running() {
    let mut rt = Runtime::new(RuntimeConfig::manual(8, 8)).unwrap();
    let (mut source, _tx) = ChannelEventSource::new();
    let mut sketch = FnSketch::new().setup(|rt| rt.canvas(0, 0));

    let err = rt.run(&mut sketch, &mut source).unwrap_err();
    assert!(matches!(err, SketchError::InvalidCanvasExtent(_)));
    assert_eq!(rt.scheduler_state(), SchedulerState::Terminated);
    assert!(!rt.control().is_running());
}

#[test]
fn a_runtime_runs_once() {
    let mut rt = Runtime::new(RuntimeConfig::manual(8, 8)).unwrap();
    let (mut source, tx) = ChannelEventSource::new();
    tx.shutdown(None);
    rt.run(&mut FnSketch::new(), &mut source).unwrap();
    assert_eq!(rt.scheduler_state(), SchedulerState::Terminated);

    tx.shutdown(None);
    assert!(matches!(
        rt.run(&mut FnSketch::new(), &mut source),
        Err(SketchError::Other(_))
    ));
}

#[test]
fn ticking_runtime_draws_on_its_own() {
    let cfg = RuntimeConfig {
        frame_interval_ms: Some(1),
        ..RuntimeConfig::manual(8, 8)
    };
    let mut rt = Runtime::new(cfg).unwrap();
    let (mut source, _tx) = ChannelEventSource::new();
    let mut sketch = FnSketch::new().draw(|rt| {
        if rt.frame_count() >= 3 {
            rt.control().request_shutdown();
        }
        Ok(())
    });

    rt.run(&mut sketch, &mut source).unwrap();
    assert_eq!(rt.frame_count(), 3);
}
