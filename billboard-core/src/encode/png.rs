use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig, flatten_premul_over_bg, unpremultiply};
use crate::foundation::color::Rgba8;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{BillboardError, BillboardResult};
use crate::surface::FrameRGBA;

/// Writes `frame_00000.png`, `frame_00001.png`, ... into a directory.
pub struct PngSequenceSink {
    out_dir: PathBuf,
    background: Option<Rgba8>,
    cfg: Option<SinkConfig>,
    scratch: Vec<u8>,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Sink writing into `out_dir`, keeping transparency.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            background: None,
            cfg: None,
            scratch: Vec::new(),
            written: Vec::new(),
        }
    }

    /// Flatten every frame over an opaque `background` instead of keeping alpha.
    pub fn with_background(mut self, background: Option<Rgba8>) -> Self {
        self.background = background;
        self
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// File written for frame `idx`.
    pub fn frame_path(out_dir: &Path, idx: FrameIndex) -> PathBuf {
        out_dir.join(format!("frame_{:05}.png", idx.0))
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> BillboardResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(BillboardError::validation(
                "png sink width/height must be non-zero",
            ));
        }
        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("create output dir '{}'", self.out_dir.display()))?;
        self.scratch = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        self.written.clear();
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BillboardResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| BillboardError::render("png sink not started"))?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(BillboardError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        match (self.background, frame.premultiplied) {
            (Some(bg), true) => flatten_premul_over_bg(&mut self.scratch, &frame.data, bg)?,
            (None, true) => unpremultiply(&mut self.scratch, &frame.data)?,
            (_, false) => {
                if frame.data.len() != self.scratch.len() {
                    return Err(BillboardError::validation(
                        "frame.data size mismatch with width*height*4",
                    ));
                }
                self.scratch.copy_from_slice(&frame.data);
            }
        }

        let path = Self::frame_path(&self.out_dir, idx);
        image::save_buffer_with_format(
            &path,
            &self.scratch,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "frame written");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> BillboardResult<()> {
        self.cfg = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
