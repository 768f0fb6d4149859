//! Deterministic scripted runs and golden-image checks.
mod compare;
mod golden;
mod scripted;

pub use compare::{compare_files, compare_images, images_equal_approx};
pub use golden::{GoldenMode, REGEN_GOLDEN_ENV, check_golden, golden_path};
pub use scripted::ScriptedRun;
