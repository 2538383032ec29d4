//! Frame pacing: the loop that turns host ticks into throttled repaints.
//!
//! A [`scheduler::TickScheduler`] supplies tick timestamps, [`pacer::FramePacer`] decides per tick
//! whether enough time passed to repaint, and [`blur::BlurSink`] receives the renderer's blur flag
//! on every tick.

/// Shared blur flag.
pub mod blur;
/// Throttling loop.
pub mod pacer;
/// Tick sources and cancellation.
pub mod scheduler;
