//! The 2D drawing surface renderers paint onto.
//!
//! [`Surface`] mirrors a canvas-style API: a small mutable style state (fill color, font,
//! composite mode) scoped with [`Surface::save`] / [`Surface::restore`], and immediate-mode draw
//! calls that read it. Draw calls cannot fail.

use serde::{Deserialize, Serialize};

use crate::assets::decode::LoadedImage;
use crate::foundation::color::Rgba8;
use crate::foundation::core::Rect;
use crate::text::customization::LayoutKey;
use crate::text::layout::TextMeasure;
use crate::text::style::FontSpec;

mod blend;
/// CPU raster surface powered by `vello_cpu`.
pub mod cpu;

/// Pixel blending rule applied to subsequent draw calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeMode {
    /// Draw over existing pixels.
    #[default]
    SourceOver,
    /// Draw behind existing pixels.
    DestinationOver,
    /// Erase existing pixels where the new shape covers them.
    DestinationOut,
}

/// Style state read by draw calls.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawState {
    /// Color used by `fill_text` and `fill_rect`.
    pub fill: Rgba8,
    /// Font used by `fill_text` and measurement.
    pub font: FontSpec,
    /// Blending rule.
    pub composite: CompositeMode,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill: Rgba8::BLACK,
            font: FontSpec::new("sans-serif", 10.0),
            composite: CompositeMode::SourceOver,
        }
    }
}

/// Current [`DrawState`] plus the stack pushed by `save`.
#[derive(Clone, Debug, Default)]
pub struct StateStack {
    current: DrawState,
    saved: Vec<DrawState>,
}

impl StateStack {
    /// Active state.
    pub fn current(&self) -> &DrawState {
        &self.current
    }

    /// Active state, mutably.
    pub fn current_mut(&mut self) -> &mut DrawState {
        &mut self.current
    }

    /// Push a copy of the active state.
    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Pop the last saved state; an unbalanced restore is ignored.
    pub fn restore(&mut self) {
        if let Some(s) = self.saved.pop() {
            self.current = s;
        }
    }

    /// Number of pending saves.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

/// A rendered frame as RGBA8 pixels.
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

/// Canvas-like drawing target.
pub trait Surface {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Make `rect` fully transparent.
    fn clear_region(&mut self, rect: Rect);

    /// Draw the `src` region of `image` scaled into `dst`.
    fn draw_image(&mut self, image: &LoadedImage, src: Rect, dst: Rect);

    /// Fill `text` with the current font and color; `y` is the alphabetic baseline.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Fill `rect` with the current color.
    fn fill_rect(&mut self, rect: Rect);

    /// Set the fill color.
    fn set_fill_color(&mut self, color: Rgba8);

    /// Set the font.
    fn set_font(&mut self, font: FontSpec);

    /// Set the composite mode.
    fn set_composite_mode(&mut self, mode: CompositeMode);

    /// Width of `text` in the current font.
    fn measure_text_width(&mut self, text: &str) -> f64;

    /// Baseline-to-baseline distance of the current font.
    fn line_height(&mut self) -> f64;

    /// Push the style state.
    fn save(&mut self);

    /// Pop the style state pushed by the matching `save`.
    fn restore(&mut self);

    /// Identity used to decide whether a cached text layout still applies.
    fn layout_key(&self) -> LayoutKey;

    /// Clear the whole surface.
    fn clear(&mut self) {
        let (w, h) = (f64::from(self.width()), f64::from(self.height()));
        self.clear_region(Rect::new(0.0, 0.0, w, h));
    }
}

/// Measures text through a surface, scoping the font change to each query.
pub struct SurfaceMeasure<'a> {
    surface: &'a mut dyn Surface,
}

impl<'a> SurfaceMeasure<'a> {
    /// Borrow `surface` for measuring.
    pub fn new(surface: &'a mut dyn Surface) -> Self {
        Self { surface }
    }
}

impl TextMeasure for SurfaceMeasure<'_> {
    fn text_width(&mut self, text: &str, font: &FontSpec) -> f64 {
        self.surface.save();
        self.surface.set_font(font.clone());
        let w = self.surface.measure_text_width(text);
        self.surface.restore();
        w
    }

    fn line_height(&mut self, font: &FontSpec) -> f64 {
        self.surface.save();
        self.surface.set_font(font.clone());
        let h = self.surface.line_height();
        self.surface.restore();
        h
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/state.rs"]
mod tests;
