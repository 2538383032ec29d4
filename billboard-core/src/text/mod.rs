//! Word styling and placement.
//!
//! A [`TextCustomization`](customization::TextCustomization) holds words, per-word style options
//! and placement directives; [`layout`](layout::layout) turns them into absolute coordinates using
//! a [`TextMeasure`](layout::TextMeasure) supplied by the drawing surface.

/// Word list, style and directives bundled with a cached layout.
pub mod customization;
/// Style resolution and word placement.
pub mod layout;
/// Ready-made text blocks.
pub mod presets;
/// Style options, fonts and placement directives.
pub mod style;
