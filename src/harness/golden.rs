use std::path::{Path, PathBuf};

use crate::foundation::error::{SketchError, SketchResult};
use crate::harness::compare::compare_files;

/// Set to `1` (or `true`) to rewrite golden files from the current output.
pub const REGEN_GOLDEN_ENV: &str = "SKETCHBOOK_REGEN_GOLDEN";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GoldenMode {
    /// Compare against the existing golden file; a missing one is an error.
    #[default]
    Compare,
    /// Overwrite the golden file with the fresh output, then compare.
    Regenerate,
}

impl GoldenMode {
    /// `Regenerate` when `SKETCHBOOK_REGEN_GOLDEN` is `1` or `true`, else `Compare`.
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(REGEN_GOLDEN_ENV).ok().as_deref())
    }

    /// Mode for a raw variable value; unset or anything else is `Compare`.
    pub fn from_value(v: Option<&str>) -> Self {
        match v.map(str::trim) {
            Some("1") => Self::Regenerate,
            Some(v) if v.eq_ignore_ascii_case("true") => Self::Regenerate,
            _ => Self::Compare,
        }
    }
}

/// `dir/name.png` → `dir/name_golden.png`.
pub fn golden_path(fixture: &Path) -> PathBuf {
    let stem = fixture
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match fixture.extension() {
        Some(ext) => format!("{stem}_golden.{}", ext.to_string_lossy()),
        None => format!("{stem}_golden"),
    };
    fixture.with_file_name(name)
}

/// Check a freshly written `fixture` against its golden file within `delta`.
pub fn check_golden(fixture: &Path, delta: f64, mode: GoldenMode) -> SketchResult<()> {
    let golden = golden_path(fixture);
    match mode {
        GoldenMode::Regenerate => {
            std::fs::copy(fixture, &golden).map_err(|e| SketchError::io(&golden, e))?;
            tracing::info!(golden = %golden.display(), "regenerated golden file");
        }
        GoldenMode::Compare => {
            if !golden.exists() {
                return Err(SketchError::MissingGolden(golden));
            }
        }
    }
    compare_files(fixture, &golden, delta)
}

#[cfg(test)]
#[path = "../../tests/unit/harness/golden.rs"]
mod tests;
