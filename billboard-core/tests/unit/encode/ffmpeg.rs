use super::*;
use crate::foundation::core::Fps;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(30, 1).unwrap(),
    }
}

fn args_of(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<String> {
    encode_args(cfg, opts)
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn video_canvas_must_be_even_and_non_zero() {
    assert!(check_encodable(&cfg(0, 10)).is_err());
    assert!(check_encodable(&cfg(11, 10)).is_err());
    assert!(check_encodable(&cfg(10, 11)).is_err());
    assert!(check_encodable(&cfg(10, 10)).is_ok());
}

#[test]
fn args_describe_raw_rgba_input_and_h264_output() {
    let opts = FfmpegSinkOpts::new("out/banner.mp4");
    let args = args_of(&cfg(400, 100), &opts);

    assert_eq!(args[0], "-y");
    let size = args.iter().position(|a| a == "-s").unwrap();
    assert_eq!(args[size + 1], "400x100");
    let rate = args.iter().position(|a| a == "-r").unwrap();
    assert_eq!(args[rate + 1], "30/1");
    assert!(rate < args.iter().position(|a| a == "-i").unwrap());
    assert!(!args.iter().any(|a| a == "-vf"));
    assert!(args.iter().any(|a| a == "yuv420p"));
    assert_eq!(args.last().unwrap(), "out/banner.mp4");
}

#[test]
fn args_hold_the_settled_banner_and_keep_existing_files() {
    let mut opts = FfmpegSinkOpts::new("banner.mp4");
    opts.overwrite = false;
    opts.hold_secs = 1.5;
    let args = args_of(&cfg(4, 4), &opts);

    assert_eq!(args[0], "-n");
    let vf = args.iter().position(|a| a == "-vf").unwrap();
    assert_eq!(args[vf + 1], "tpad=stop_mode=clone:stop_duration=1.5");
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/ffmpeg_tests/never.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn refuses_to_overwrite_when_asked() {
    let out = PathBuf::from("target").join("ffmpeg_tests").join("exists.mp4");
    ensure_parent_dir(&out).unwrap();
    std::fs::write(&out, b"x").unwrap();

    let mut opts = FfmpegSinkOpts::new(&out);
    opts.overwrite = false;
    let err = FfmpegSink::new(opts).begin(cfg(4, 4)).unwrap_err();
    assert!(err.to_string().contains("already exists"));
}

#[test]
fn negative_hold_is_rejected() {
    let mut opts = FfmpegSinkOpts::new("target/ffmpeg_tests/hold.mp4");
    opts.hold_secs = -1.0;
    assert!(FfmpegSink::new(opts).begin(cfg(4, 4)).is_err());
}

#[test]
fn encodes_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let out = PathBuf::from("target").join("ffmpeg_tests").join("two.mp4");
    let mut opts = FfmpegSinkOpts::new(&out);
    opts.hold_secs = 0.5;
    let mut sink = FfmpegSink::new(opts);
    sink.begin(cfg(4, 4)).unwrap();
    let frame = FrameRGBA {
        width: 4,
        height: 4,
        data: vec![255; 64],
        premultiplied: true,
    };
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    sink.push_frame(FrameIndex(1), &frame).unwrap();
    assert_eq!(sink.frames_written(), 2);
    sink.end().unwrap();
    assert!(out.is_file());
}
