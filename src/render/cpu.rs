use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::{Affine, BezPath, Color, PixelSize, premultiply_rgba8_in_place};
use crate::render::backend::{FrameRGBA, RenderTarget};
use crate::render::commands::{DisplayList, DrawCommand, TextCommand};
use crate::render::text::{TextBrushRgba8, TextLayoutEngine};
use crate::style::FontFace;

struct ImagePaint {
    // keeps the cache key's address alive
    _source: Arc<image::RgbaImage>,
    paint: vello_cpu::Image,
    used: bool,
}

/// Headless render target powered by `vello_cpu`.
///
/// `submit` rasterizes into an internal pixmap that stays readable through
/// [`CpuRenderTarget::last_frame`].
pub struct CpuRenderTarget {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
    text_engine: TextLayoutEngine,
    fonts: HashMap<usize, (Arc<FontFace>, vello_cpu::peniko::FontData)>,
    images: HashMap<usize, ImagePaint>,
    warned_missing_font: bool,
    submitted: u64,
}

impl std::fmt::Debug for CpuRenderTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRenderTarget")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("submitted", &self.submitted)
            .finish_non_exhaustive()
    }
}

impl CpuRenderTarget {
    /// CPU target for a surface of `size`; errors on zero or oversized surfaces.
    pub fn new(size: PixelSize) -> anyhow::Result<Self> {
        let (width, height) = surface_dims(size)?;
        Ok(Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
            ctx: None,
            text_engine: TextLayoutEngine::new(),
            fonts: HashMap::new(),
            images: HashMap::new(),
            warned_missing_font: false,
            submitted: 0,
        })
    }

    /// Number of frames submitted so far.
    pub fn submitted_frames(&self) -> u64 {
        self.submitted
    }

    /// Pixels of the most recently submitted frame (premultiplied).
    pub fn last_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn render_into_pixmap(&mut self, list: &DisplayList) -> anyhow::Result<()> {
        let (width, height) = surface_dims(list.size())?;
        if width != self.width || height != self.height {
            anyhow::bail!(
                "display list is {}x{} but the surface is {}x{}",
                width,
                height,
                self.width,
                self.height
            );
        }

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();

        for img in self.images.values_mut() {
            img.used = false;
        }

        let drawn = list
            .commands()
            .iter()
            .try_for_each(|cmd| self.draw_command(&mut ctx, cmd));
        if drawn.is_ok() {
            // lists read back mid-frame still have the surface clip open
            for _ in 0..list.open_clips() {
                ctx.pop_layer();
            }
            ctx.flush();
            clear_pixmap(&mut self.pixmap, [0, 0, 0, 0]);
            ctx.render_to_pixmap(&mut self.pixmap);
        }
        self.ctx = Some(ctx);
        self.images.retain(|_, img| img.used);
        drawn
    }

    fn draw_command(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        cmd: &DrawCommand,
    ) -> anyhow::Result<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match cmd {
            DrawCommand::PushClip(rect) => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                let mut clip = vello_cpu::kurbo::BezPath::new();
                clip.move_to((rect.x0, rect.y0));
                clip.line_to((rect.x1, rect.y0));
                clip.line_to((rect.x1, rect.y1));
                clip.line_to((rect.x0, rect.y1));
                clip.close_path();
                ctx.push_clip_layer(&clip);
            }
            DrawCommand::PopClip => ctx.pop_layer(),
            DrawCommand::FillRect { rect, color } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(paint_color(*color));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    rect.x0, rect.y0, rect.x1, rect.y1,
                ));
            }
            DrawCommand::FillPath {
                path,
                transform,
                color,
            } => {
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(paint_color(*color));
                ctx.fill_path(&bezpath_to_cpu(path));
            }
            DrawCommand::StrokePath {
                path,
                transform,
                color,
                width,
            } => {
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(paint_color(*color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.stroke_path(&bezpath_to_cpu(path));
            }
            DrawCommand::Text(text) => self.draw_text(ctx, text)?,
            DrawCommand::Image { image, transform } => {
                let paint = self.image_paint_for(image)?;
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(image.width()),
                    f64::from(image.height()),
                ));
            }
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        cmd: &TextCommand,
    ) -> anyhow::Result<()> {
        let Some(face) = cmd.font.face().cloned() else {
            if !self.warned_missing_font {
                tracing::warn!("no font loaded; text is not drawn until one is set");
                self.warned_missing_font = true;
            }
            return Ok(());
        };

        let brush = TextBrushRgba8 {
            r: cmd.color.r,
            g: cmd.color.g,
            b: cmd.color.b,
            a: cmd.color.a,
        };
        let layout = self
            .text_engine
            .layout_line(&cmd.text, &face, cmd.size as f32, brush)?;
        let font = self.font_data_for(&face);

        let offset = cmd
            .align
            .anchor_offset(f64::from(layout.width()), cmd.size);
        let origin = cmd.anchor + offset;
        ctx.set_transform(affine_to_cpu(
            cmd.transform * Affine::translate(origin.to_vec2()),
        ));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn font_data_for(&mut self, face: &Arc<FontFace>) -> vello_cpu::peniko::FontData {
        let key = Arc::as_ptr(face) as usize;
        self.fonts
            .entry(key)
            .or_insert_with(|| {
                let font = vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(face.bytes().as_ref().clone()),
                    0,
                );
                (Arc::clone(face), font)
            })
            .1
            .clone()
    }

    fn image_paint_for(
        &mut self,
        image: &Arc<image::RgbaImage>,
    ) -> anyhow::Result<vello_cpu::Image> {
        let key = Arc::as_ptr(image) as usize;
        if let Some(cached) = self.images.get_mut(&key) {
            cached.used = true;
            return Ok(cached.paint.clone());
        }

        let mut bytes = image.as_raw().clone();
        premultiply_rgba8_in_place(&mut bytes);
        let pixmap = pixmap_from_premul_bytes(&bytes, image.width(), image.height())?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.images.insert(
            key,
            ImagePaint {
                _source: Arc::clone(image),
                paint: paint.clone(),
                used: true,
            },
        );
        Ok(paint)
    }
}

impl RenderTarget for CpuRenderTarget {
    fn resize(&mut self, size: PixelSize) -> anyhow::Result<()> {
        let (width, height) = surface_dims(size)?;
        if width != self.width || height != self.height {
            tracing::debug!(width, height, "resizing cpu render target");
            self.width = width;
            self.height = height;
            self.pixmap = vello_cpu::Pixmap::new(width, height);
            self.ctx = None;
        }
        Ok(())
    }

    fn submit(&mut self, list: &DisplayList) -> anyhow::Result<()> {
        self.render_into_pixmap(list)?;
        self.submitted += 1;
        Ok(())
    }

    fn rasterize(&mut self, list: &DisplayList) -> anyhow::Result<FrameRGBA> {
        self.render_into_pixmap(list)?;
        Ok(self.last_frame())
    }
}

fn surface_dims(size: PixelSize) -> anyhow::Result<(u16, u16)> {
    let w: u16 = size
        .width
        .try_into()
        .context("surface width exceeds u16")?;
    let h: u16 = size
        .height
        .try_into()
        .context("surface height exceeds u16")?;
    if w == 0 || h == 0 {
        anyhow::bail!("surface must be at least 1x1, got {w}x{h}");
    }
    Ok((w, h))
}

fn paint_color(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> anyhow::Result<vello_cpu::Pixmap> {
    let w: u16 = width.try_into().context("image width exceeds u16")?;
    let h: u16 = height.try_into().context("image height exceeds u16")?;
    if bytes.len() != (width as usize) * (height as usize) * 4 {
        anyhow::bail!("image byte length mismatch");
    }
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
    for px in bytes.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
