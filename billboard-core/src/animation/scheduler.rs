use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::foundation::error::{BillboardError, BillboardResult};

/// Source of tick timestamps, one per display refresh.
pub trait TickScheduler {
    /// Wait for the next tick and return its timestamp, or `None` when no more ticks come.
    fn request_tick(&mut self) -> Option<Duration>;
}

/// Shared flag that stops a running pacer at its next tick.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

fn refresh_interval(refresh_hz: f64) -> BillboardResult<Duration> {
    if !refresh_hz.is_finite() || refresh_hz <= 0.0 {
        return Err(BillboardError::validation(format!(
            "refresh rate must be finite and > 0 (got {refresh_hz})"
        )));
    }
    Ok(Duration::from_secs_f64(1.0 / refresh_hz))
}

/// Deterministic display clock: tick `n` is at `start + n * interval`, no real waiting.
#[derive(Clone, Debug)]
pub struct SimulatedDisplay {
    interval: Duration,
    next: Duration,
    remaining: Option<u64>,
}

impl SimulatedDisplay {
    /// Default refresh rate in Hz.
    pub const DEFAULT_REFRESH_HZ: f64 = 240.0;

    /// Unbounded display refreshing at `refresh_hz`, first tick at zero.
    pub fn new(refresh_hz: f64) -> BillboardResult<Self> {
        Ok(Self::with_interval(refresh_interval(refresh_hz)?))
    }

    /// Unbounded display with an explicit tick interval.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            next: Duration::ZERO,
            remaining: None,
        }
    }

    /// Timestamp of the first tick.
    pub fn starting_at(mut self, start: Duration) -> Self {
        self.next = start;
        self
    }

    /// Stop after `ticks` ticks.
    pub fn max_ticks(mut self, ticks: u64) -> Self {
        self.remaining = Some(ticks);
        self
    }

    /// Interval between ticks.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl TickScheduler for SimulatedDisplay {
    fn request_tick(&mut self) -> Option<Duration> {
        if let Some(remaining) = &mut self.remaining {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        let now = self.next;
        self.next += self.interval;
        Some(now)
    }
}

/// Wall-clock display: sleeps out the rest of each refresh interval.
#[derive(Debug)]
pub struct RealtimeDisplay {
    origin: Instant,
    interval: Duration,
    last: Option<Instant>,
    remaining: Option<u64>,
}

impl RealtimeDisplay {
    /// Display refreshing at `refresh_hz`; timestamps count from construction.
    pub fn new(refresh_hz: f64) -> BillboardResult<Self> {
        Ok(Self {
            origin: Instant::now(),
            interval: refresh_interval(refresh_hz)?,
            last: None,
            remaining: None,
        })
    }

    /// Stop after `ticks` ticks.
    pub fn max_ticks(mut self, ticks: u64) -> Self {
        self.remaining = Some(ticks);
        self
    }
}

impl TickScheduler for RealtimeDisplay {
    fn request_tick(&mut self) -> Option<Duration> {
        if let Some(remaining) = &mut self.remaining {
            if *remaining == 0 {
                return None;
            }
            *remaining -= 1;
        }
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                std::thread::sleep(self.interval - elapsed);
            }
        }
        let now = Instant::now();
        self.last = Some(now);
        Some(now - self.origin)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scheduler.rs"]
mod tests;
