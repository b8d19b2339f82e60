//! Throttled debug snapshot writer
//!
//! Persists the most recent enhanced image to a fixed path so an operator
//! can eyeball what the OCR engine is actually being fed, without flooding
//! storage or stalling the loop with disk I/O on every cycle. Strictly a
//! human-inspection aid: writes are best-effort and failures never abort
//! the cycle.

use image::GrayImage;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Time-throttled snapshot sink
pub struct DebugSink {
    path: PathBuf,
    interval: Duration,
    last_write: Option<Instant>,
}

impl DebugSink {
    pub fn new(path: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            path: path.into(),
            interval,
            last_write: None,
        }
    }

    /// Write the snapshot if at least `interval` has passed since the last
    /// write, overwriting the previous file. Returns whether a write was
    /// attempted. `now` is passed explicitly so the throttle is testable
    /// without sleeping.
    pub fn maybe_write(&mut self, image: &GrayImage, now: Instant) -> bool {
        let due = match self.last_write {
            Some(last) => now.duration_since(last) >= self.interval,
            None => true,
        };
        if !due {
            return false;
        }

        self.last_write = Some(now);
        match image.save(&self.path) {
            Ok(()) => debug!("Debug snapshot written to {}", self.path.display()),
            Err(e) => warn!("Failed to write debug snapshot: {}", e),
        }
        true
    }
}
