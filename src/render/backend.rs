use crate::foundation::core::{PixelSize, unpremultiply_rgba8_in_place};
use crate::render::commands::DisplayList;

/// A rendered frame as RGBA8 pixels.
///
/// Frames coming out of the CPU target are **premultiplied alpha**; the `premultiplied` flag
/// makes this explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel size of the frame.
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    /// Straight-alpha image suitable for encoding.
    pub fn into_rgba_image(mut self) -> anyhow::Result<image::RgbaImage> {
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut self.data);
        }
        image::RgbaImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| anyhow::anyhow!("frame byte length does not match its dimensions"))
    }
}

/// The rasterizing collaborator a runtime draws into.
///
/// Implementations report failures as opaque errors; the runtime attaches frame context.
pub trait RenderTarget {
    /// Match the device surface to the canvas. Called after Setup and on canvas changes.
    fn resize(&mut self, size: PixelSize) -> anyhow::Result<()>;

    /// Present one frame's recorded commands.
    fn submit(&mut self, list: &DisplayList) -> anyhow::Result<()>;

    /// Render `list` synchronously and read the pixels back.
    fn rasterize(&mut self, list: &DisplayList) -> anyhow::Result<FrameRGBA>;
}
