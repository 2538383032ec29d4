use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::LoadedImage;
use crate::assets::fonts::FontBook;
use crate::foundation::color::Rgba8;
use crate::foundation::core::{Affine, Canvas, Rect};
use crate::foundation::error::{BillboardError, BillboardResult};
use crate::surface::blend::{clear_rect, composite_in_place};
use crate::surface::{CompositeMode, FrameRGBA, StateStack, Surface};
use crate::text::customization::LayoutKey;
use crate::text::layout::TextMeasure;
use crate::text::style::FontSpec;

/// Software surface: every draw call is rasterized by `vello_cpu` into a scratch pixmap and then
/// composited onto the persistent canvas with the active [`CompositeMode`].
pub struct CpuSurface {
    width: u16,
    height: u16,
    canvas: vello_cpu::Pixmap,
    scratch: vello_cpu::Pixmap,
    ctx: vello_cpu::RenderContext,
    state: StateStack,
    fonts: FontBook,
    // Keyed by the pixel buffer address; the Arc is held so the address stays unique.
    image_cache: HashMap<usize, (Arc<Vec<u8>>, vello_cpu::Image)>,
}

impl CpuSurface {
    /// Transparent surface of `canvas` size drawing text with `fonts`.
    pub fn new(canvas: Canvas, fonts: FontBook) -> BillboardResult<Self> {
        canvas.validate()?;
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| BillboardError::validation("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| BillboardError::validation("canvas height exceeds u16"))?;
        Ok(Self {
            width,
            height,
            canvas: vello_cpu::Pixmap::new(width, height),
            scratch: vello_cpu::Pixmap::new(width, height),
            ctx: vello_cpu::RenderContext::new(width, height),
            state: StateStack::default(),
            fonts,
            image_cache: HashMap::new(),
        })
    }

    /// Surface size.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    /// Font registry used for drawing and measuring.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Font registry, mutably (registering fonts invalidates cached layouts).
    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= u32::from(self.width) || y >= u32::from(self.height) {
            return None;
        }
        let i = (y as usize * usize::from(self.width) + x as usize) * 4;
        let d = self.canvas.data_as_u8_slice();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    /// Copy of the current canvas contents.
    pub fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.canvas.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn draw_with(&mut self, f: impl FnOnce(&mut vello_cpu::RenderContext)) {
        self.ctx.reset();
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        f(&mut self.ctx);
        self.ctx.flush();

        self.scratch.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.scratch);

        let mode = self.state.current().composite;
        if let Err(e) = composite_in_place(
            self.canvas.data_as_u8_slice_mut(),
            self.scratch.data_as_u8_slice(),
            mode,
        ) {
            tracing::warn!(error = %e, "composite skipped");
        }
    }

    fn image_paint(&mut self, image: &LoadedImage) -> Option<vello_cpu::Image> {
        let key = Arc::as_ptr(&image.rgba8_premul) as usize;
        if let Some((_, paint)) = self.image_cache.get(&key) {
            return Some(paint.clone());
        }
        let pixmap = match pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)
        {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "image is not drawable");
                return None;
            }
        };
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache
            .insert(key, (Arc::clone(&image.rgba8_premul), paint.clone()));
        Some(paint)
    }
}

impl Surface for CpuSurface {
    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn clear_region(&mut self, rect: Rect) {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let snap = |v: f64, max: f64| v.round().clamp(0.0, max) as u32;
        let (x0, x1) = (snap(rect.min_x(), w), snap(rect.max_x(), w));
        let (y0, y1) = (snap(rect.min_y(), h), snap(rect.max_y(), h));
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        clear_rect(
            self.canvas.data_as_u8_slice_mut(),
            u32::from(self.width),
            x0,
            y0,
            x1,
            y1,
        );
    }

    fn draw_image(&mut self, image: &LoadedImage, src: Rect, dst: Rect) {
        if src.width() <= 0.0 || src.height() <= 0.0 || dst.width() <= 0.0 || dst.height() <= 0.0
        {
            return;
        }
        let Some(paint) = self.image_paint(image) else {
            return;
        };
        let tr = Affine::translate((dst.x0, dst.y0))
            * Affine::scale_non_uniform(dst.width() / src.width(), dst.height() / src.height())
            * Affine::translate((-src.x0, -src.y0));
        self.draw_with(|ctx| {
            ctx.set_transform(affine_to_cpu(tr));
            ctx.set_paint(paint);
            ctx.fill_rect(&rect_to_cpu(src));
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let state = self.state.current().clone();
        let Some(shaped) = self.fonts.shape(text, &state.font, state.fill) else {
            return;
        };
        let origin = Affine::translate((x, y - f64::from(shaped.baseline)));
        self.draw_with(|ctx| {
            ctx.set_transform(affine_to_cpu(origin));
            for line in shaped.layout.lines() {
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
                    ctx.glyph_run(&shaped.font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        });
    }

    fn fill_rect(&mut self, rect: Rect) {
        let c = self.state.current().fill;
        self.draw_with(|ctx| {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
            ctx.fill_rect(&rect_to_cpu(rect));
        });
    }

    fn set_fill_color(&mut self, color: Rgba8) {
        self.state.current_mut().fill = color;
    }

    fn set_font(&mut self, font: FontSpec) {
        self.state.current_mut().font = font;
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.state.current_mut().composite = mode;
    }

    fn measure_text_width(&mut self, text: &str) -> f64 {
        let font = self.state.current().font.clone();
        self.fonts.text_width(text, &font)
    }

    fn line_height(&mut self) -> f64 {
        let font = self.state.current().font.clone();
        TextMeasure::line_height(&mut self.fonts, &font)
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn layout_key(&self) -> LayoutKey {
        LayoutKey {
            canvas: self.canvas(),
            fonts: self.fonts.generation(),
        }
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> BillboardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BillboardError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BillboardError::render("pixmap height exceeds u16"))?;
    if bytes.len() != (width as usize) * (height as usize) * 4 {
        return Err(BillboardError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/surface/cpu.rs"]
mod tests;
