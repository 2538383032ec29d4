//! Asset loading: bitmaps (raster or SVG) and font files.
//!
//! All IO happens here, before a renderer exists; renderers only see [`decode::LoadedImage`].

/// Image decoding and SVG rasterization.
pub mod decode;
/// Font registry used for shaping and measuring text.
pub mod fonts;
