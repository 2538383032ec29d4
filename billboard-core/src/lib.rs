//! Billboard plays an animated banner: a bitmap that scrolls in from the left edge of a 2D
//! surface, optionally with a block of styled words that is progressively revealed as it moves.
//!
//! # Pipeline overview
//!
//! 1. **Configure**: a JSON [`BannerConfig`] names the bitmap, fonts, text block and frame rate
//! 2. **Lay out**: a [`TextCustomization`] resolves words, styles and placement directives into
//!    absolute [`FinalText`] coordinates, measured against the surface
//! 3. **Pace**: a [`FramePacer`] turns host ticks into throttled repaints, advancing a
//!    [`Renderer`] on every tick and publishing its blur flag
//! 4. **Paint**: renderers issue canvas-style calls against a [`Surface`]; [`CpuSurface`]
//!    rasterizes them with `vello_cpu`
//! 5. **Emit** (optional): painted frames go to a [`FrameSink`] (PNG sequence or MP4 through the
//!    system `ffmpeg`)
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No IO in renderers**: bitmaps and fonts are loaded before any renderer exists.
//! - **Deterministic under simulation**: with a [`SimulatedDisplay`] the same config always
//!   produces the same frames.
//! - **Premultiplied RGBA8** on the surface; sinks convert at the edge.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod config;
mod effects;
mod encode;
mod foundation;
mod render;
mod session;
mod surface;
mod text;

pub use animation::blur::{BlurSignal, BlurSink};
pub use animation::pacer::{FramePacer, FrameTiming, PaintInfo, RunSummary, TickOutcome};
pub use animation::scheduler::{CancelToken, RealtimeDisplay, SimulatedDisplay, TickScheduler};
pub use assets::decode::{LoadedImage, decode_image, decode_svg, load_image};
pub use assets::fonts::{FontBook, ShapedText, TextBrushRgba8};
pub use config::banner::{BannerConfig, TextPreset, TextSource};
pub use effects::blur::GaussianBlur;
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use encode::png::PngSequenceSink;
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig, ensure_parent_dir};
pub use foundation::color::Rgba8;
pub use foundation::core::{Affine, Canvas, Fps, FrameIndex, Point, Rect, Rgba8Premul, Vec2};
pub use foundation::error::{BillboardError, BillboardResult, LayoutError};
pub use render::{
    ImageRenderer, Renderer, SceneMode, ScrollPhase, ScrollState, TextRenderer, create_renderer,
};
pub use session::player::{BannerSession, PlayOpts, PlayStats};
pub use surface::cpu::CpuSurface;
pub use surface::{CompositeMode, DrawState, FrameRGBA, StateStack, Surface, SurfaceMeasure};
pub use text::customization::{LayoutKey, TextCustomization, TextCustomizationBuilder};
pub use text::layout::{FinalText, StyledWord, TextMeasure, layout, position, resolve_styles};
pub use text::presets::{ALTERNATE_FAMILY_KEYWORD, presentation_title};
pub use text::style::{
    FontSpec, PlacementDirective, StyleConfig, StyleMarker, StyleOption, StyleSet,
};
