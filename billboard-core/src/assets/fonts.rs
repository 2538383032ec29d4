use std::{collections::HashMap, path::Path};

use anyhow::Context;

use crate::foundation::color::Rgba8;
use crate::foundation::error::{BillboardError, BillboardResult};
use crate::text::layout::TextMeasure;
use crate::text::style::FontSpec;

/// Line height used when no font at all is registered.
const FALLBACK_LINE_HEIGHT: f64 = 1.2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

struct FontFace {
    /// Family name read from the font file; this is what Parley resolves.
    registered_name: String,
    data: vello_cpu::peniko::FontData,
}

/// A single line of shaped text plus the font data its glyph ids refer to.
pub struct ShapedText {
    /// Parley layout, broken into one line.
    pub layout: parley::Layout<TextBrushRgba8>,
    /// Font the glyphs were shaped with.
    pub font: vello_cpu::peniko::FontData,
    /// Distance from the layout top to the first baseline.
    pub baseline: f32,
}

/// Registry of font files addressed by configured family name.
///
/// Families that were never registered resolve to the fallback family (the first registered one
/// unless [`FontBook::set_fallback`] picks another).
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    faces: HashMap<String, FontFace>,
    fallback: Option<String>,
    generation: u64,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    /// Empty registry with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
            fallback: None,
            generation: 0,
        }
    }

    /// Register font bytes under `family`, replacing any previous face with that name.
    pub fn register(
        &mut self,
        family: impl Into<String>,
        font_bytes: Vec<u8>,
    ) -> BillboardResult<()> {
        let family = family.into();
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            BillboardError::asset(format!("no font families registered for '{family}'"))
        })?;
        let registered_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| BillboardError::asset("registered font family has no name"))?
            .to_string();

        let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        tracing::debug!(family = %family, registered = %registered_name, "font registered");
        if self.fallback.is_none() {
            self.fallback = Some(family.clone());
        }
        self.faces.insert(
            family,
            FontFace {
                registered_name,
                data,
            },
        );
        self.generation += 1;
        Ok(())
    }

    /// Read a font file and register it under `family`.
    pub fn load(&mut self, family: impl Into<String>, path: &Path) -> BillboardResult<()> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font bytes from '{}'", path.display()))?;
        self.register(family, bytes)
    }

    /// Use `family` for every unregistered family name.
    pub fn set_fallback(&mut self, family: impl Into<String>) -> BillboardResult<()> {
        let family = family.into();
        if !self.faces.contains_key(&family) {
            return Err(BillboardError::validation(format!(
                "fallback family '{family}' is not registered"
            )));
        }
        self.fallback = Some(family);
        self.generation += 1;
        Ok(())
    }

    /// Whether `family` was registered.
    pub fn has_family(&self, family: &str) -> bool {
        self.faces.contains_key(family)
    }

    /// Whether no font is registered at all.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Changes whenever the set of faces or the fallback changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn face(&self, family: &str) -> Option<&FontFace> {
        self.faces
            .get(family)
            .or_else(|| self.fallback.as_deref().and_then(|f| self.faces.get(f)))
    }

    /// Shape `text` on a single line with `font` and `color`.
    ///
    /// Returns `None` when no font is registered.
    pub fn shape(&mut self, text: &str, font: &FontSpec, color: Rgba8) -> Option<ShapedText> {
        let Some(face) = self.face(&font.family) else {
            tracing::warn!(family = %font.family, "no font registered, text is skipped");
            return None;
        };
        let family_name = face.registered_name.clone();
        let data = face.data.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or(font.size_px);

        Some(ShapedText {
            layout,
            font: data,
            baseline,
        })
    }
}

impl TextMeasure for FontBook {
    fn text_width(&mut self, text: &str, font: &FontSpec) -> f64 {
        self.shape(text, font, Rgba8::BLACK)
            .map(|s| f64::from(s.layout.width()))
            .unwrap_or(0.0)
    }

    fn line_height(&mut self, font: &FontSpec) -> f64 {
        self.shape("Hg", font, Rgba8::BLACK)
            .map(|s| f64::from(s.layout.height()))
            .unwrap_or_else(|| f64::from(font.size_px) * FALLBACK_LINE_HEIGHT)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
