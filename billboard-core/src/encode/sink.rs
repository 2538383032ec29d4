use std::path::Path;

use anyhow::Context as _;

use crate::foundation::color::Rgba8;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{BillboardError, BillboardResult};
use crate::foundation::math::mul_div255_u8;
use crate::surface::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Repaint rate.
    pub fps: Fps,
}

/// Consumer of painted frames.
///
/// `push_frame` is called with strictly increasing [`FrameIndex`] values between `begin` and
/// `end`.
pub trait FrameSink {
    /// Called once before any frame.
    fn begin(&mut self, cfg: SinkConfig) -> BillboardResult<()>;
    /// Push one painted frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BillboardResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> BillboardResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> BillboardResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BillboardResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> BillboardResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Composite premultiplied `src` over an opaque `bg`, writing opaque RGBA8 to `dst`.
pub(crate) fn flatten_premul_over_bg(
    dst: &mut [u8],
    src_premul: &[u8],
    bg: Rgba8,
) -> BillboardResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(BillboardError::validation(
            "flatten expects equal-length rgba8 buffers",
        ));
    }
    let bg = [u16::from(bg.r), u16::from(bg.g), u16::from(bg.b)];
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let inv = 255 - u16::from(s[3]);
        for c in 0..3 {
            d[c] = s[c].saturating_add(mul_div255_u8(bg[c], inv));
        }
        d[3] = 255;
    }
    Ok(())
}

/// Convert premultiplied RGBA8 to straight alpha.
pub(crate) fn unpremultiply(dst: &mut [u8], src_premul: &[u8]) -> BillboardResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(BillboardError::validation(
            "unpremultiply expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u32::from(s[3]);
        if a == 0 {
            d.fill(0);
            continue;
        }
        for c in 0..3 {
            d[c] = ((u32::from(s[c]) * 255 + a / 2) / a).min(255) as u8;
        }
        d[3] = s[3];
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> BillboardResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
