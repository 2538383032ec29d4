//! Frame sinks: where painted frames go.
//!
//! Frames arrive premultiplied; each sink converts to what its output format expects.

/// MP4 output through the system `ffmpeg`.
pub mod ffmpeg;
/// One PNG per painted frame.
pub mod png;
/// The sink contract and the in-memory sink.
pub mod sink;
