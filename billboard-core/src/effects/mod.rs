//! Post-processing applied to painted frames.

/// Separable gaussian blur on premultiplied frames.
pub mod blur;
