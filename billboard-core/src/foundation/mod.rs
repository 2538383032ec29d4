//! Shared primitives: errors, frame timing, geometry re-exports and colors.

/// Straight-alpha colors and hex parsing.
pub mod color;
/// Frame indices, rates, canvas sizes and geometry.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
