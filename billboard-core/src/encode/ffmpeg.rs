use std::ffi::OsString;
use std::io::{Read, Write as _};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::{FrameSink, SinkConfig, ensure_parent_dir, flatten_premul_over_bg};
use crate::foundation::color::Rgba8;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{BillboardError, BillboardResult};
use crate::surface::FrameRGBA;

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Opaque color the transparent parts of the banner are flattened onto.
    pub background: Rgba8,
    /// Seconds the last painted frame stays on screen after playback ends.
    pub hold_secs: f64,
}

impl FfmpegSinkOpts {
    /// Options for an MP4 at `out_path` over black, with no hold.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba8::BLACK,
            hold_secs: 0.0,
        }
    }
}

/// Arguments for an `ffmpeg` that reads raw RGBA frames on stdin and writes an H.264 MP4.
pub(crate) fn encode_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    let mut push = |a: &str| args.push(a.into());

    push(if opts.overwrite { "-y" } else { "-n" });
    push("-loglevel");
    push("error");
    // Input: tightly packed frames at the pacer's repaint rate.
    push("-f");
    push("rawvideo");
    push("-pix_fmt");
    push("rgba");
    push("-s");
    push(&format!("{}x{}", cfg.width, cfg.height));
    push("-r");
    push(&format!("{}/{}", cfg.fps.num, cfg.fps.den));
    push("-i");
    push("pipe:0");

    if opts.hold_secs > 0.0 {
        push("-vf");
        push(&format!("tpad=stop_mode=clone:stop_duration={}", opts.hold_secs));
    }
    for a in [
        "-an", "-c:v", "libx264", "-pix_fmt", "yuv420p", "-movflags", "+faststart",
    ] {
        push(a);
    }
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// Reject sizes `yuv420p` cannot hold.
pub(crate) fn check_encodable(cfg: &SinkConfig) -> BillboardResult<()> {
    match (cfg.width, cfg.height) {
        (0, _) | (_, 0) => Err(BillboardError::validation(
            "video banner needs a non-zero canvas",
        )),
        (w, h) if w % 2 == 1 || h % 2 == 1 => Err(BillboardError::validation(format!(
            "video banner canvas must have even sides for yuv420p (got {w}x{h})"
        ))),
        _ => Ok(()),
    }
}

/// A running `ffmpeg` child with its stderr collected on a side thread.
struct Encoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<std::io::Result<String>>>,
}

impl Encoder {
    fn spawn(args: Vec<OsString>) -> BillboardResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BillboardError::render(format!("could not start ffmpeg: {e}")))?;

        let stdin = child.stdin.take();
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut text = String::new();
                pipe.read_to_string(&mut text)?;
                Ok(text)
            })
        });
        if stdin.is_none() {
            return Err(BillboardError::render("ffmpeg stdin is not piped"));
        }
        Ok(Self {
            child,
            stdin,
            stderr,
        })
    }

    fn write(&mut self, bytes: &[u8]) -> BillboardResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| BillboardError::render("ffmpeg input already closed"))?;
        stdin
            .write_all(bytes)
            .map_err(|e| BillboardError::render(format!("ffmpeg stopped reading frames: {e}")))
    }

    fn finish(mut self) -> BillboardResult<()> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| BillboardError::render(format!("waiting for ffmpeg: {e}")))?;
        let log = match self.stderr.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| BillboardError::render("ffmpeg log reader panicked"))?
                .unwrap_or_default(),
            None => String::new(),
        };
        if status.success() {
            Ok(())
        } else {
            Err(BillboardError::render(format!(
                "ffmpeg failed ({status}): {}",
                log.trim()
            )))
        }
    }
}

/// Encodes painted banner frames to MP4 through the system `ffmpeg`.
///
/// Frames are flattened over [`FfmpegSinkOpts::background`]; the settled banner can be held at
/// the end with [`FfmpegSinkOpts::hold_secs`].
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<Encoder>,
    cfg: Option<SinkConfig>,
    rgba: Vec<u8>,
    last: Option<FrameIndex>,
    frames: u64,
}

impl FfmpegSink {
    /// Sink that starts `ffmpeg` on `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            cfg: None,
            rgba: Vec::new(),
            last: None,
            frames: 0,
        }
    }

    /// Frames handed to `ffmpeg` since `begin`.
    pub fn frames_written(&self) -> u64 {
        self.frames
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> BillboardResult<()> {
        check_encodable(&cfg)?;
        if !self.opts.hold_secs.is_finite() || self.opts.hold_secs < 0.0 {
            return Err(BillboardError::validation("hold_secs must be finite and >= 0"));
        }
        let out = &self.opts.out_path;
        if !self.opts.overwrite && out.exists() {
            return Err(BillboardError::validation(format!(
                "output file '{}' already exists",
                out.display()
            )));
        }
        ensure_parent_dir(out)?;
        if !is_ffmpeg_on_path() {
            return Err(BillboardError::render(
                "MP4 output needs ffmpeg, which was not found on PATH",
            ));
        }

        self.encoder = Some(Encoder::spawn(encode_args(&cfg, &self.opts))?);
        tracing::info!(
            out = %out.display(),
            width = cfg.width,
            height = cfg.height,
            hold_secs = self.opts.hold_secs,
            "video encode started"
        );
        self.rgba = vec![0; cfg.width as usize * cfg.height as usize * 4];
        self.cfg = Some(cfg);
        self.last = None;
        self.frames = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> BillboardResult<()> {
        let (Some(cfg), Some(encoder)) = (self.cfg.as_ref(), self.encoder.as_mut()) else {
            return Err(BillboardError::render("video sink is not started"));
        };
        if self.last.is_some_and(|last| idx <= last) {
            return Err(BillboardError::render(format!(
                "frame {} arrived after frame {}",
                idx.0,
                self.last.map_or(0, |l| l.0)
            )));
        }
        if (frame.width, frame.height) != (cfg.width, cfg.height) || !frame.premultiplied {
            return Err(BillboardError::validation(format!(
                "video sink expects premultiplied {}x{} frames, got {}x{}",
                cfg.width, cfg.height, frame.width, frame.height
            )));
        }

        flatten_premul_over_bg(&mut self.rgba, &frame.data, self.opts.background)?;
        encoder.write(&self.rgba)?;
        self.last = Some(idx);
        self.frames += 1;
        Ok(())
    }

    fn end(&mut self) -> BillboardResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| BillboardError::render("video sink is not started"))?;
        self.cfg = None;
        encoder.finish()?;
        tracing::info!(frames = self.frames, "video encode finished");
        Ok(())
    }
}

/// Whether `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
