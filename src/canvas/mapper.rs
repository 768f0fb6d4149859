use crate::foundation::core::{Affine, PixelSize, Point, Vec2};
use crate::foundation::error::{SketchError, SketchResult};

/// Largest surface edge the CPU rasterizer can address.
pub const MAX_SURFACE_PX: u32 = u16::MAX as u32;

/// Closed interval `[min, max]` of logical units along one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Interval from `min` to `max`; `min > max` flips the axis.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Signed length, `max - min`.
    pub fn len(self) -> f64 {
        self.max - self.min
    }

    /// Whether `v` lies between the endpoints, inclusive, in either orientation.
    pub fn contains(self, v: f64) -> bool {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        lo <= v && v <= hi
    }
}

/// Canvas size plus the logical extent mapped onto it.
///
/// The forward (logical → device) and inverse coefficients are derived together in
/// [`CanvasConfig::new`]; there is no way to mutate one without the others. Resizing means
/// building a new config and replacing the old one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasConfig {
    size: PixelSize,
    x: Interval,
    y: Interval,
    // device px per logical unit
    sx: f64,
    sy: f64,
    // logical units per device px
    inv_sx: f64,
    inv_sy: f64,
}

impl CanvasConfig {
    /// Canvas whose logical units are pixels.
    pub fn pixels(width: u32, height: u32) -> SketchResult<Self> {
        Self::new(
            width,
            height,
            Interval::new(0.0, f64::from(width)),
            Interval::new(0.0, f64::from(height)),
        )
    }

    /// Canvas of `width`×`height` pixels showing the logical rectangle `x`×`y`.
    pub fn new(width: u32, height: u32, x: Interval, y: Interval) -> SketchResult<Self> {
        if width == 0 || height == 0 {
            return Err(SketchError::invalid_extent(format!(
                "canvas must be at least 1x1 px, got {width}x{height}"
            )));
        }
        if width > MAX_SURFACE_PX || height > MAX_SURFACE_PX {
            return Err(SketchError::invalid_extent(format!(
                "canvas {width}x{height} exceeds {MAX_SURFACE_PX} px per edge"
            )));
        }
        check_interval("x", x)?;
        check_interval("y", y)?;

        let sx = f64::from(width) / x.len();
        let sy = f64::from(height) / y.len();
        Ok(Self {
            size: PixelSize::new(width, height),
            x,
            y,
            sx,
            sy,
            inv_sx: 1.0 / sx,
            inv_sy: 1.0 / sy,
        })
    }

    /// Device surface size.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Logical interval mapped onto the pixel columns.
    pub fn logical_x(&self) -> Interval {
        self.x
    }

    /// Logical interval mapped onto the pixel rows.
    pub fn logical_y(&self) -> Interval {
        self.y
    }

    /// Logical x to device pixels.
    pub fn to_device_x(&self, v: f64) -> f64 {
        (v - self.x.min) * self.sx
    }

    /// Logical y to device pixels.
    pub fn to_device_y(&self, v: f64) -> f64 {
        (v - self.y.min) * self.sy
    }

    /// Device x back to logical units.
    pub fn to_logical_x(&self, v: f64) -> f64 {
        v * self.inv_sx + self.x.min
    }

    /// Device y back to logical units.
    pub fn to_logical_y(&self, v: f64) -> f64 {
        v * self.inv_sy + self.y.min
    }

    /// Logical point to device pixels.
    pub fn to_device(&self, p: Point) -> Point {
        Point::new(self.to_device_x(p.x), self.to_device_y(p.y))
    }

    /// Device point back to logical units.
    pub fn to_logical(&self, p: Point) -> Point {
        Point::new(self.to_logical_x(p.x), self.to_logical_y(p.y))
    }

    /// Scale a logical extent (width/height, offsets) to device pixels.
    ///
    /// Lengths are not shifted by the interval origin.
    pub fn to_device_len(&self, v: Vec2) -> Vec2 {
        Vec2::new(v.x * self.sx, v.y * self.sy)
    }

    /// The logical-to-device mapping as an affine transform, for building curved geometry in
    /// logical units.
    pub fn device_transform(&self) -> Affine {
        Affine::new([
            self.sx,
            0.0,
            0.0,
            self.sy,
            -self.x.min * self.sx,
            -self.y.min * self.sy,
        ])
    }

    /// Whether `p` falls inside the logical rectangle.
    pub fn contains_logical(&self, p: Point) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y)
    }
}

fn check_interval(axis: &str, iv: Interval) -> SketchResult<()> {
    if !iv.min.is_finite() || !iv.max.is_finite() {
        return Err(SketchError::invalid_extent(format!(
            "{axis} interval [{}, {}] is not finite",
            iv.min, iv.max
        )));
    }
    if iv.max == iv.min {
        return Err(SketchError::invalid_extent(format!(
            "{axis} interval is degenerate ({} == {})",
            iv.min, iv.max
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/mapper.rs"]
mod tests;
