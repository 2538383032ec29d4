use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgba8;
use crate::foundation::core::Canvas;
use crate::foundation::error::{BillboardError, BillboardResult, LayoutError};
use crate::text::layout::{FinalText, TextMeasure, layout, resolve_styles};
use crate::text::style::{PlacementDirective, StyleConfig, StyleOption};

/// Identity of the surface a layout was measured against.
///
/// A cached layout is reused only while the canvas size and the loaded fonts are unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayoutKey {
    /// Surface size.
    pub canvas: Canvas,
    /// Font registry generation; bumps whenever fonts are added.
    pub fonts: u64,
}

/// A titled block of words with its styles and placement directives.
///
/// The resolved [`FinalText`] list is computed on first request and memoized per [`LayoutKey`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextCustomization {
    words: Vec<String>,
    style: StyleConfig,
    directives: Vec<PlacementDirective>,
    #[serde(skip)]
    cache: Option<(LayoutKey, Arc<[FinalText]>)>,
}

impl PartialEq for TextCustomization {
    fn eq(&self, other: &Self) -> bool {
        self.words == other.words
            && self.style == other.style
            && self.directives == other.directives
    }
}

impl TextCustomization {
    /// Bundle words, styles and directives without laying them out.
    pub fn new(
        words: Vec<String>,
        style: StyleConfig,
        directives: Vec<PlacementDirective>,
    ) -> Self {
        Self {
            words,
            style,
            directives,
            cache: None,
        }
    }

    /// Words in reading order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Placement directives, index-aligned with [`Self::words`].
    pub fn directives(&self) -> &[PlacementDirective] {
        &self.directives
    }

    /// Replace the style configuration and drop any cached layout.
    pub fn set_style(&mut self, style: StyleConfig) {
        self.style = style;
        self.cache = None;
    }

    /// Check directives and styles without measuring anything.
    pub fn validate(&self) -> Result<(), LayoutError> {
        resolve_styles(&self.words, &self.style, &self.directives).map(|_| ())
    }

    /// Return the laid-out words for the surface identified by `key`.
    pub fn final_text(
        &mut self,
        measure: &mut dyn TextMeasure,
        key: LayoutKey,
    ) -> Result<Arc<[FinalText]>, LayoutError> {
        if let Some((cached_key, text)) = &self.cache
            && *cached_key == key
        {
            return Ok(Arc::clone(text));
        }

        let text: Arc<[FinalText]> =
            layout(&self.words, &self.style, &self.directives, measure)?.into();
        tracing::debug!(
            words = text.len(),
            width = key.canvas.width,
            height = key.canvas.height,
            "text layout resolved"
        );
        self.cache = Some((key, Arc::clone(&text)));
        Ok(text)
    }
}

/// Builder for [`TextCustomization`].
pub struct TextCustomizationBuilder {
    words: Vec<String>,
    directives: Vec<PlacementDirective>,
    style: StyleConfig,
}

impl TextCustomizationBuilder {
    /// Start a block whose first word is anchored at `(x, y)`.
    pub fn new(first_word: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            words: vec![first_word.into()],
            directives: vec![PlacementDirective::Absolute { x, y }],
            style: StyleConfig::default(),
        }
    }

    /// Append a word on the current line.
    pub fn right(mut self, word: impl Into<String>) -> Self {
        self.words.push(word.into());
        self.directives.push(PlacementDirective::Right);
        self
    }

    /// Append a word at the start of a new line.
    pub fn newline(mut self, word: impl Into<String>) -> Self {
        self.words.push(word.into());
        self.directives.push(PlacementDirective::Newline);
        self
    }

    /// Font size option.
    pub fn size(mut self, size: impl Into<StyleOption<f32>>) -> Self {
        self.style.size = size.into();
        self
    }

    /// Fill color option.
    pub fn color(mut self, color: impl Into<StyleOption<Rgba8>>) -> Self {
        self.style.color = color.into();
        self
    }

    /// Font family option.
    pub fn family(mut self, family: StyleOption<String>) -> Self {
        self.style.family = family;
        self
    }

    /// Padding option.
    pub fn padding(mut self, padding: impl Into<StyleOption<f64>>) -> Self {
        self.style.padding = padding.into();
        self
    }

    /// Build and validate final [`TextCustomization`].
    pub fn build(self) -> BillboardResult<TextCustomization> {
        let text = TextCustomization::new(self.words, self.style, self.directives);
        text.validate().map_err(BillboardError::from)?;
        Ok(text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/customization.rs"]
mod tests;
