use std::path::Path;

use crate::assets;
use crate::foundation::error::{SketchError, SketchResult};

/// Whether two images match within `delta`, a fraction of the channel range.
///
/// Every channel of every pixel may differ by at most `delta * 255`. Images of different sizes
/// never match.
pub fn images_equal_approx(got: &image::RgbaImage, want: &image::RgbaImage, delta: f64) -> bool {
    compare_images(got, want, delta).is_ok()
}

/// Like [`images_equal_approx`], describing the first difference on failure.
pub fn compare_images(
    got: &image::RgbaImage,
    want: &image::RgbaImage,
    delta: f64,
) -> SketchResult<()> {
    if got.dimensions() != want.dimensions() {
        return Err(SketchError::ImageMismatch(format!(
            "size {:?} != {:?}",
            got.dimensions(),
            want.dimensions()
        )));
    }

    let allowed = delta * 255.0;
    for (x, y, g) in got.enumerate_pixels() {
        let w = want.get_pixel(x, y);
        for c in 0..4 {
            let diff = f64::from(g.0[c].abs_diff(w.0[c]));
            if diff > allowed {
                return Err(SketchError::ImageMismatch(format!(
                    "pixel ({x},{y}) channel {c}: {:?} vs {:?} exceeds {allowed}",
                    g.0, w.0
                )));
            }
        }
    }
    Ok(())
}

/// Decode two image files and compare them.
pub fn compare_files(got: &Path, want: &Path, delta: f64) -> SketchResult<()> {
    let g = assets::read_image(got)?;
    let w = assets::read_image(want)?;
    compare_images(&g, &w, delta).map_err(|e| match e {
        SketchError::ImageMismatch(msg) => SketchError::ImageMismatch(format!(
            "{} vs {}: {msg}",
            got.display(),
            want.display()
        )),
        other => other,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/harness/compare.rs"]
mod tests;
