use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgba8;
use crate::foundation::error::LayoutError;
use crate::text::style::{FontSpec, PlacementDirective, StyleConfig};

/// Width and line-height queries answered by whatever will draw the text.
pub trait TextMeasure {
    /// Advance width of `text` shaped with `font`.
    fn text_width(&mut self, text: &str, font: &FontSpec) -> f64;

    /// Distance between two consecutive baselines for `font`.
    fn line_height(&mut self, font: &FontSpec) -> f64;
}

/// A word with every style property resolved, still positioned relatively.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledWord {
    /// The word.
    pub word: String,
    /// Resolved font.
    pub font: FontSpec,
    /// Resolved fill color.
    pub color: Rgba8,
    /// Resolved padding in pixels.
    pub padding: f64,
    /// How this word is placed.
    pub directive: PlacementDirective,
}

/// A word resolved to absolute pixel coordinates, ready to draw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinalText {
    /// The word.
    pub word: String,
    /// `[x, y]` with `y` on the alphabetic baseline.
    pub coordinates: [f64; 2],
    /// Resolved font.
    pub font: FontSpec,
    /// Resolved fill color.
    pub color: Rgba8,
}

impl FinalText {
    /// Left edge.
    pub fn x(&self) -> f64 {
        self.coordinates[0]
    }

    /// Baseline.
    pub fn y(&self) -> f64 {
        self.coordinates[1]
    }
}

/// Resolve style values and directives for every word.
///
/// Directives beyond `words.len()` are ignored.
pub fn resolve_styles(
    words: &[String],
    style: &StyleConfig,
    directives: &[PlacementDirective],
) -> Result<Vec<StyledWord>, LayoutError> {
    style.check()?;

    let mut out = Vec::with_capacity(words.len());
    for (i, word) in words.iter().enumerate() {
        let directive = *directives
            .get(i)
            .ok_or_else(|| LayoutError::MissingDirective {
                index: i,
                word: word.clone(),
            })?;
        match (i, directive) {
            (0, PlacementDirective::Right | PlacementDirective::Newline) => {
                return Err(LayoutError::FirstDirectiveNotAbsolute {
                    got: directive.token(),
                });
            }
            (i, PlacementDirective::Absolute { .. }) if i > 0 => {
                return Err(LayoutError::AbsoluteAfterFirst { index: i });
            }
            _ => {}
        }

        let size_px = *style.size.value_for(i).ok_or_else(|| empty("size"))?;
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(LayoutError::InvalidStyle {
                option: "size",
                reason: format!("font size must be finite and > 0 (word {i} got {size_px})"),
            });
        }
        let padding = *style.padding.value_for(i).ok_or_else(|| empty("padding"))?;
        if !padding.is_finite() {
            return Err(LayoutError::InvalidStyle {
                option: "padding",
                reason: format!("padding must be finite (word {i})"),
            });
        }
        let color = *style.color.value_for(i).ok_or_else(|| empty("color"))?;
        let family = style
            .family
            .resolve_marked(i)
            .ok_or_else(|| empty("family"))?;

        out.push(StyledWord {
            word: word.clone(),
            font: FontSpec::new(family.clone(), size_px),
            color,
            padding,
            directive,
        });
    }
    Ok(out)
}

fn empty(option: &'static str) -> LayoutError {
    LayoutError::InvalidStyle {
        option,
        reason: "no value available".to_string(),
    }
}

/// Turn styled words into absolute coordinates, left-to-right and top-to-bottom.
///
/// `right` continues after the previous word's measured width plus this word's padding;
/// `newline` returns to the first word's `x` and drops one line height of the previous word's
/// font plus padding.
pub fn position(
    styled: Vec<StyledWord>,
    measure: &mut dyn TextMeasure,
) -> Result<Vec<FinalText>, LayoutError> {
    let mut out: Vec<FinalText> = Vec::with_capacity(styled.len());
    let mut left_margin = 0.0;

    for (i, w) in styled.into_iter().enumerate() {
        let coordinates = match (out.last(), w.directive) {
            (None, PlacementDirective::Absolute { x, y }) => {
                left_margin = x;
                [x, y]
            }
            (None, d) => return Err(LayoutError::FirstDirectiveNotAbsolute { got: d.token() }),
            (Some(_), PlacementDirective::Absolute { .. }) => {
                return Err(LayoutError::AbsoluteAfterFirst { index: i });
            }
            (Some(prev), PlacementDirective::Right) => {
                let advance = measure.text_width(&prev.word, &prev.font);
                [prev.x() + advance + w.padding, prev.y()]
            }
            (Some(prev), PlacementDirective::Newline) => {
                let line = measure.line_height(&prev.font);
                [left_margin, prev.y() + line + w.padding]
            }
        };

        out.push(FinalText {
            word: w.word,
            coordinates,
            font: w.font,
            color: w.color,
        });
    }
    Ok(out)
}

/// Lay out `words` with `style` and `directives`, measuring against `measure`.
#[tracing::instrument(level = "debug", skip_all, fields(words = words.len()))]
pub fn layout(
    words: &[String],
    style: &StyleConfig,
    directives: &[PlacementDirective],
    measure: &mut dyn TextMeasure,
) -> Result<Vec<FinalText>, LayoutError> {
    let styled = resolve_styles(words, style, directives)?;
    position(styled, measure)
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
