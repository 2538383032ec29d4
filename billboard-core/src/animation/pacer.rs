use std::time::Duration;

use crate::animation::blur::BlurSink;
use crate::animation::scheduler::{CancelToken, TickScheduler};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::BillboardResult;
use crate::render::Renderer;
use crate::surface::Surface;

/// Throttle bookkeeping.
///
/// `start` is the timestamp of the last repaint and stays `None` until the first tick, which is
/// treated as if a full `target` had elapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTiming {
    /// Time since the last repaint as of the latest tick.
    pub elapsed: Duration,
    /// Timestamp of the last repaint.
    pub start: Option<Duration>,
    /// Minimum time between repaints.
    pub target: Duration,
}

/// What one tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether the renderer repainted.
    pub painted: bool,
    /// Blur flag returned by the renderer's update.
    pub blur: bool,
}

/// Details handed to the paint callback of [`FramePacer::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaintInfo {
    /// Repaint counter, starting at 0.
    pub frame: FrameIndex,
    /// Tick timestamp of the repaint.
    pub now: Duration,
    /// Blur flag set on this tick.
    pub blur: bool,
}

/// Totals of a finished [`FramePacer::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks processed.
    pub ticks: u64,
    /// Repaints performed.
    pub paints: u64,
    /// Whether the loop ended on cancellation (otherwise the scheduler ran out of ticks).
    pub cancelled: bool,
}

/// Repaints at most once per target duration, however often the host ticks.
#[derive(Clone, Debug)]
pub struct FramePacer {
    timing: FrameTiming,
}

impl FramePacer {
    /// Pacer repainting at most once per `target`.
    pub fn new(target: Duration) -> Self {
        Self {
            timing: FrameTiming {
                elapsed: target,
                start: None,
                target,
            },
        }
    }

    /// Pacer targeting `fps` repaints per second.
    pub fn from_fps(fps: Fps) -> Self {
        Self::new(fps.frame_duration())
    }

    /// Current bookkeeping.
    pub fn timing(&self) -> FrameTiming {
        self.timing
    }

    /// Handle one tick at `now`: update the renderer, publish its blur flag, and repaint when a
    /// full target duration has elapsed since the last repaint.
    pub fn tick(
        &mut self,
        now: Duration,
        renderer: &mut dyn Renderer,
        surface: &mut dyn Surface,
        blur: &mut dyn BlurSink,
    ) -> TickOutcome {
        if let Some(start) = self.timing.start {
            self.timing.elapsed = now.saturating_sub(start);
        }

        let should_blur = renderer.update();
        blur.set_should_blur(should_blur);

        let painted = self.timing.elapsed >= self.timing.target;
        if painted {
            self.timing.start = Some(now);
            renderer.render(surface);
            tracing::debug!(now_ms = now.as_secs_f64() * 1000.0, blur = should_blur, "repaint");
        }
        TickOutcome {
            painted,
            blur: should_blur,
        }
    }

    /// Drive ticks from `scheduler` until `cancel` fires or the scheduler ends.
    ///
    /// `on_paint` runs after every repaint with the freshly drawn surface; an error from it stops
    /// the loop.
    pub fn run<S, F>(
        &mut self,
        scheduler: &mut dyn TickScheduler,
        renderer: &mut dyn Renderer,
        surface: &mut S,
        blur: &mut dyn BlurSink,
        cancel: &CancelToken,
        mut on_paint: F,
    ) -> BillboardResult<RunSummary>
    where
        S: Surface,
        F: FnMut(&mut S, PaintInfo) -> BillboardResult<()>,
    {
        let mut summary = RunSummary::default();
        while let Some(now) = scheduler.request_tick() {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            summary.ticks += 1;
            let outcome = self.tick(now, renderer, surface, blur);
            if outcome.painted {
                let info = PaintInfo {
                    frame: FrameIndex(summary.paints),
                    now,
                    blur: outcome.blur,
                };
                summary.paints += 1;
                on_paint(surface, info)?;
            }
        }
        tracing::info!(
            ticks = summary.ticks,
            paints = summary.paints,
            cancelled = summary.cancelled,
            "animation loop stopped"
        );
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/pacer.rs"]
mod tests;
