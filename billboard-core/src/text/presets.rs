//! Ready-made text blocks.

use crate::foundation::color::Rgba8;
use crate::text::customization::TextCustomization;
use crate::text::style::{PlacementDirective, StyleConfig, StyleOption};

/// Keyword that selects the alternate (monospace) family in [`presentation_title`].
pub const ALTERNATE_FAMILY_KEYWORD: &str = "alternativa";

/// The default banner title: a greeting with the role set in the alternate family.
pub fn presentation_title() -> TextCustomization {
    let words = ["Hola,", "soy", "Ana", "desarrolladora", "web"]
        .into_iter()
        .map(str::to_string)
        .collect();

    let family = StyleOption::first_default(vec![
        "Arial".to_string(),
        "Noto Sans Mono".to_string(),
    ])
    .with_marker(ALTERNATE_FAMILY_KEYWORD, 1)
    .with_override(3, ALTERNATE_FAMILY_KEYWORD.to_string())
    .with_override(4, ALTERNATE_FAMILY_KEYWORD.to_string());

    let color = StyleOption::first_default(vec![Rgba8::WHITE, Rgba8::rgb(0xff, 0xc1, 0x07)])
        .with_override(3, Rgba8::rgb(0xff, 0xc1, 0x07))
        .with_override(4, Rgba8::rgb(0xff, 0xc1, 0x07));

    let style = StyleConfig {
        size: StyleOption::Single(50.0),
        color,
        family,
        padding: StyleOption::Single(14.0),
    };

    let directives = vec![
        PlacementDirective::Absolute { x: 40.0, y: 80.0 },
        PlacementDirective::Right,
        PlacementDirective::Right,
        PlacementDirective::Newline,
        PlacementDirective::Right,
    ];

    TextCustomization::new(words, style, directives)
}

#[cfg(test)]
#[path = "../../tests/unit/text/presets.rs"]
mod tests;
