use crate::assets::decode::LoadedImage;
use crate::foundation::core::Rect;
use crate::foundation::error::{BillboardError, BillboardResult};
use crate::surface::Surface;

/// Where a scroll is in its one-way animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollPhase {
    /// Offset still below the limit.
    Entering,
    /// Offset reached the limit; it never moves again.
    Settled,
}

/// Horizontal offset advanced by a fixed step and clamped at a limit (the surface width).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    x: f64,
    step: f64,
    limit: f64,
}

impl ScrollState {
    /// Offset 0 moving by `step` towards `limit`.
    pub fn new(step: f64, limit: f64) -> BillboardResult<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(BillboardError::validation(format!(
                "scroll step must be finite and > 0 (got {step})"
            )));
        }
        if !limit.is_finite() || limit < 0.0 {
            return Err(BillboardError::validation("scroll limit must be finite and >= 0"));
        }
        Ok(Self {
            x: 0.0,
            step,
            limit,
        })
    }

    /// Current offset.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Step per update.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Current phase.
    pub fn phase(&self) -> ScrollPhase {
        if self.x < self.limit {
            ScrollPhase::Entering
        } else {
            ScrollPhase::Settled
        }
    }

    /// Move one step; returns `true` while still entering afterwards.
    pub fn advance(&mut self) -> bool {
        let was = self.phase();
        self.x = (self.x + self.step).min(self.limit);
        let now = self.phase();
        if was == ScrollPhase::Entering && now == ScrollPhase::Settled {
            tracing::info!(x = self.x, "scroll settled");
        }
        now == ScrollPhase::Entering
    }
}

/// Draw `image` scaled to the surface height with its left edge at `x - surface_width`.
pub(crate) fn draw_scrolled_image(surface: &mut dyn Surface, image: &LoadedImage, x: f64) {
    let w = f64::from(surface.width());
    let h = f64::from(surface.height());
    let left = x - w;
    let src = Rect::new(0.0, 0.0, f64::from(image.width), f64::from(image.height));
    let dst = Rect::new(left, 0.0, left + image.width_at_height(h), h);
    surface.draw_image(image, src, dst);
}

#[cfg(test)]
#[path = "../../tests/unit/render/scroll.rs"]
mod tests;
