use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Receives the per-frame blur decision.
pub trait BlurSink {
    /// Record whether blur should be active; last write wins.
    fn set_should_blur(&mut self, blur: bool);
}

/// Cloneable handle to a shared blur flag.
///
/// Every clone observes the same value, so the host can read it wherever frames are presented.
#[derive(Clone, Debug, Default)]
pub struct BlurSignal {
    flag: Arc<AtomicBool>,
}

impl BlurSignal {
    /// Flag starting at `false`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value written.
    pub fn should_blur(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl BlurSink for BlurSignal {
    fn set_should_blur(&mut self, blur: bool) {
        self.flag.store(blur, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/blur.rs"]
mod tests;
