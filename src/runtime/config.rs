use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::foundation::error::{SketchError, SketchResult};

pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 400;
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 15;
pub const DEFAULT_SEED: u64 = 1;

pub const ENV_FRAME_INTERVAL_MS: &str = "SKETCHBOOK_FRAME_INTERVAL_MS";
pub const ENV_SEED: &str = "SKETCHBOOK_SEED";
pub const ENV_SCREENSHOT_DIR: &str = "SKETCHBOOK_SCREENSHOT_DIR";

/// Startup settings of a [`Runtime`](crate::Runtime).
///
/// JSON files may omit any field. Environment overrides are applied on top with
/// [`RuntimeConfig::with_env_overrides`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Ticker period in milliseconds. `null` or `0` installs no ticker; frames are then only
    /// drawn for explicitly sent `FrameReady` events.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: Option<u64>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Directory for the numbered screenshots taken with F11.
    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: PathBuf,
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

fn default_frame_interval_ms() -> Option<u64> {
    Some(DEFAULT_FRAME_INTERVAL_MS)
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_screenshot_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            frame_interval_ms: default_frame_interval_ms(),
            seed: DEFAULT_SEED,
            screenshot_dir: default_screenshot_dir(),
        }
    }
}

impl RuntimeConfig {
    /// Manually paced configuration: no ticker, every frame comes from the caller.
    pub fn manual(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame_interval_ms: None,
            ..Self::default()
        }
    }

    /// Ticker period, `None` when frames are only sent explicitly.
    pub fn frame_interval(&self) -> Option<Duration> {
        self.frame_interval_ms
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
    }

    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> SketchResult<Self> {
        serde_json::from_str(s).map_err(|e| SketchError::config(format!("parse config JSON: {e}")))
    }

    /// Read and parse a JSON config file.
    pub fn from_json_path(path: &Path) -> SketchResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| SketchError::io(path, e))?;
        Self::from_json_str(&s).map_err(|e| match e {
            SketchError::Config(msg) => {
                SketchError::config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Apply `SKETCHBOOK_*` variables from the process environment.
    pub fn with_env_overrides(self) -> SketchResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`, which maps a variable name to its value.
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> SketchResult<Self> {
        if let Some(v) = lookup(ENV_FRAME_INTERVAL_MS) {
            let ms = parse_u64(ENV_FRAME_INTERVAL_MS, &v)?;
            self.frame_interval_ms = (ms > 0).then_some(ms);
        }
        if let Some(v) = lookup(ENV_SEED) {
            self.seed = parse_u64(ENV_SEED, &v)?;
        }
        if let Some(v) = lookup(ENV_SCREENSHOT_DIR) {
            if v.trim().is_empty() {
                return Err(SketchError::config(format!("{ENV_SCREENSHOT_DIR} is empty")));
            }
            self.screenshot_dir = PathBuf::from(v);
        }
        Ok(self)
    }
}

fn parse_u64(key: &str, v: &str) -> SketchResult<u64> {
    v.trim()
        .parse::<u64>()
        .map_err(|e| SketchError::config(format!("{key}={v:?}: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/config.rs"]
mod tests;
