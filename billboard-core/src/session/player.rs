use std::sync::Arc;

use crate::animation::blur::BlurSignal;
use crate::animation::pacer::FramePacer;
use crate::animation::scheduler::{CancelToken, TickScheduler};
use crate::assets::decode::LoadedImage;
use crate::assets::fonts::FontBook;
use crate::config::banner::BannerConfig;
use crate::effects::blur::GaussianBlur;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::error::BillboardResult;
use crate::render::{Renderer, create_renderer};
use crate::surface::cpu::CpuSurface;
use crate::surface::{Surface, SurfaceMeasure};
use crate::text::customization::TextCustomization;
use crate::text::layout::FinalText;

/// Options for [`BannerSession::play`].
#[derive(Clone, Debug, Default)]
pub struct PlayOpts {
    /// Blur radius applied to frames painted while the blur flag is set; 0 disables blurring.
    pub blur_radius_px: u32,
    /// Flag the pacer publishes to; clone it before playing to observe it.
    pub signal: BlurSignal,
}

/// Totals of one [`BannerSession::play`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayStats {
    /// Ticks processed.
    pub ticks: u64,
    /// Frames painted and pushed to the sink.
    pub frames_painted: u64,
    /// Painted frames that were blurred.
    pub frames_blurred: u64,
    /// Whether playback stopped on cancellation.
    pub cancelled: bool,
}

/// A loaded banner: surface, fonts, bitmap and text, ready to play.
///
/// All assets load in [`BannerSession::new`], so renderers never see a half-loaded image.
pub struct BannerSession {
    config: BannerConfig,
    surface: CpuSurface,
    image: LoadedImage,
    text: Option<TextCustomization>,
}

impl BannerSession {
    /// Validate `config` and load its fonts and bitmap.
    #[tracing::instrument(level = "debug", skip_all, fields(mode = ?config.mode))]
    pub fn new(config: BannerConfig) -> BillboardResult<Self> {
        config.validate()?;
        let fonts = config.load_fonts()?;
        let image = config.load_image()?;
        Self::from_parts(config, fonts, image)
    }

    /// Session over already-loaded assets.
    pub fn from_parts(
        config: BannerConfig,
        fonts: FontBook,
        image: LoadedImage,
    ) -> BillboardResult<Self> {
        config.validate()?;
        let surface = CpuSurface::new(config.canvas, fonts)?;
        let text = config.text_customization();
        Ok(Self {
            config,
            surface,
            image,
            text,
        })
    }

    /// Configuration this session plays.
    pub fn config(&self) -> &BannerConfig {
        &self.config
    }

    /// Drawing surface.
    pub fn surface(&self) -> &CpuSurface {
        &self.surface
    }

    /// Laid-out text for this surface, or `None` without a text block.
    pub fn final_text(&mut self) -> BillboardResult<Option<Arc<[FinalText]>>> {
        let Some(text) = self.text.as_mut() else {
            return Ok(None);
        };
        let key = self.surface.layout_key();
        let runs = text.final_text(&mut SurfaceMeasure::new(&mut self.surface), key)?;
        Ok(Some(runs))
    }

    /// Fresh renderer for the configured mode, starting at offset 0.
    pub fn create_renderer(&mut self) -> BillboardResult<Box<dyn Renderer>> {
        create_renderer(
            self.config.mode,
            self.image.clone(),
            self.text.as_mut(),
            &mut self.surface,
            self.config.step_px,
        )
    }

    /// Play from the start, pushing every painted frame into `sink`.
    ///
    /// `sink.end` runs even when playback fails part-way.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn play(
        &mut self,
        scheduler: &mut dyn TickScheduler,
        sink: &mut dyn FrameSink,
        opts: PlayOpts,
        cancel: &CancelToken,
    ) -> BillboardResult<PlayStats> {
        let mut renderer = self.create_renderer()?;
        let mut pacer = FramePacer::from_fps(self.config.fps);
        let mut blur = match opts.blur_radius_px {
            0 => None,
            r => Some(GaussianBlur::new(r)?),
        };
        let mut signal = opts.signal;

        sink.begin(SinkConfig {
            width: self.config.canvas.width,
            height: self.config.canvas.height,
            fps: self.config.fps,
        })?;

        let mut blurred = 0u64;
        let run = pacer.run(
            scheduler,
            renderer.as_mut(),
            &mut self.surface,
            &mut signal,
            cancel,
            |surface, info| {
                let mut frame = surface.snapshot();
                if info.blur
                    && let Some(b) = blur.as_mut()
                {
                    b.apply(&mut frame)?;
                    blurred += 1;
                }
                sink.push_frame(info.frame, &frame)
            },
        );
        let end = sink.end();
        let summary = run?;
        end?;

        Ok(PlayStats {
            ticks: summary.ticks,
            frames_painted: summary.paints,
            frames_blurred: blurred,
            cancelled: summary.cancelled,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/player.rs"]
mod tests;
