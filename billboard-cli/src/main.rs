use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "billboard", version)]
struct Cli {
    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the banner and write one PNG per repaint.
    Render(RenderArgs),
    /// Play the banner into an MP4 video (requires `ffmpeg` on PATH).
    Video(VideoArgs),
    /// Print the resolved text layout as JSON.
    Layout(LayoutArgs),
}

#[derive(Args, Debug)]
struct PlaybackArgs {
    /// Display refresh rate driving the ticks.
    #[arg(long, default_value_t = 240.0)]
    refresh_hz: f64,

    /// Stop after this many display ticks.
    #[arg(long, default_value_t = 480)]
    max_ticks: u64,

    /// Sleep out each display interval instead of simulating the clock.
    #[arg(long, default_value_t = false)]
    realtime: bool,

    /// Blur radius for frames painted while the bitmap is still moving (0 disables).
    #[arg(long, default_value_t = 0)]
    blur_radius: u32,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input banner JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    #[command(flatten)]
    playback: PlaybackArgs,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    /// Input banner JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,
    /// Fail instead of replacing an existing output file.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,

    /// Seconds to hold the settled banner at the end of the video.
    #[arg(long, default_value_t = 0.0)]
    hold_secs: f64,

    #[command(flatten)]
    playback: PlaybackArgs,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input banner JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Video(args) => cmd_video(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn open_session(in_path: &Path) -> anyhow::Result<billboard::BannerSession> {
    let config = billboard::BannerConfig::from_path(in_path)
        .with_context(|| format!("load banner '{}'", in_path.display()))?;
    let session = billboard::BannerSession::new(config)
        .with_context(|| format!("prepare banner '{}'", in_path.display()))?;
    Ok(session)
}

fn play(
    session: &mut billboard::BannerSession,
    playback: &PlaybackArgs,
    sink: &mut dyn billboard::FrameSink,
) -> anyhow::Result<billboard::PlayStats> {
    let opts = billboard::PlayOpts {
        blur_radius_px: playback.blur_radius,
        ..Default::default()
    };
    let cancel = billboard::CancelToken::new();
    let stats = if playback.realtime {
        let mut display =
            billboard::RealtimeDisplay::new(playback.refresh_hz)?.max_ticks(playback.max_ticks);
        session.play(&mut display, sink, opts, &cancel)?
    } else {
        let mut display =
            billboard::SimulatedDisplay::new(playback.refresh_hz)?.max_ticks(playback.max_ticks);
        session.play(&mut display, sink, opts, &cancel)?
    };
    tracing::info!(
        ticks = stats.ticks,
        frames = stats.frames_painted,
        blurred = stats.frames_blurred,
        "playback finished"
    );
    Ok(stats)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args.in_path)?;
    let mut sink = billboard::PngSequenceSink::new(&args.out_dir)
        .with_background(session.config().background);
    let stats = play(&mut session, &args.playback, &mut sink)?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames_painted,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args.in_path)?;
    let mut sink_opts = billboard::FfmpegSinkOpts::new(&args.out);
    sink_opts.overwrite = !args.no_overwrite;
    sink_opts.hold_secs = args.hold_secs;
    if let Some(bg) = session.config().background {
        sink_opts.background = bg;
    }
    let mut sink = billboard::FfmpegSink::new(sink_opts);
    play(&mut session, &args.playback, &mut sink)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let mut session = open_session(&args.in_path)?;
    let runs = session
        .final_text()?
        .context("banner has no text block to lay out")?;
    let json = serde_json::to_string_pretty(&*runs).context("serialize layout")?;
    println!("{json}");
    Ok(())
}
