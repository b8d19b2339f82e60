//! Acquisition & Control Loop
//!
//! Drives one cycle end-to-end at a target cadence: drain stale frames,
//! retrieve a fresh one, crop, enhance, snapshot, OCR, extract, report,
//! then sleep out the remainder of the interval. Per-cycle failures degrade
//! to "no result this cycle"; only device loss ends the loop.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::analysis::{extract_coordinates, Coordinates};
use crate::capture::{CaptureError, FrameSource};
use crate::config::AppConfig;
use crate::debug_sink::DebugSink;
use crate::vision::{enhance_region, TextRecognizer};

/// Result of a single sampling cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A coordinate triple was recovered
    Coordinates(Coordinates),
    /// OCR produced text but no triple; trimmed, newlines collapsed
    RawText(String),
    /// OCR produced nothing usable
    EmptyText,
    /// The ROI crop had zero area, so OCR was skipped
    NoImage,
}

/// The sampling loop and its process-lifetime state
pub struct CoordinateTracker {
    camera: Box<dyn FrameSource>,
    ocr: Box<dyn TextRecognizer>,
    debug_sink: DebugSink,
    config: AppConfig,
    running: Arc<AtomicBool>,
}

impl CoordinateTracker {
    pub fn new(
        config: AppConfig,
        camera: Box<dyn FrameSource>,
        ocr: Box<dyn TextRecognizer>,
    ) -> Self {
        let debug_sink = DebugSink::new(
            config.sampling.debug_image_path.clone(),
            config.sampling.debug_interval(),
        );
        Self {
            camera,
            ocr,
            debug_sink,
            config,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Flag that stops the loop at the next cycle boundary. Safe to set
    /// from another thread (e.g. a Ctrl-C handler); an in-flight OCR call
    /// is not preempted.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Run cycles until the stop flag clears or the device disconnects.
    ///
    /// The camera handle is owned by the tracker, so every exit path
    /// (stop request, disconnect, error) releases it on drop.
    pub fn run(&mut self) -> Result<()> {
        info!("Tracking started");
        info!(
            "Check '{}' to verify the text clarity",
            self.config.sampling.debug_image_path
        );

        let target = self.config.sampling.target_interval();
        let floor = self.config.sampling.min_delay();

        while self.running.load(Ordering::SeqCst) {
            let cycle_start = Instant::now();

            match self.run_cycle() {
                Ok(outcome) => {
                    let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
                    if let Some(line) = format_outcome(&outcome, &timestamp) {
                        println!("{line}");
                    }
                }
                Err(CaptureError::Disconnected) => {
                    warn!("Camera stopped yielding frames, ending loop");
                    break;
                }
                Err(e) => return Err(e.into()),
            }

            std::thread::sleep(cycle_delay(cycle_start.elapsed(), target, floor));
        }

        info!("Finished");
        Ok(())
    }

    /// One acquisition-to-report cycle.
    fn run_cycle(&mut self) -> Result<CycleOutcome, CaptureError> {
        // Drain the driver's internal queue so the retrieved frame is
        // current rather than several frames behind real time. The last
        // grab is the one retrieved.
        let grabs = self.config.capture.warmup_grabs.max(1);
        for _ in 0..grabs {
            self.camera.grab()?;
        }
        let frame = self.camera.retrieve()?;

        let roi = frame.crop_roi(&self.config.roi);
        let Some(enhanced) = enhance_region(&roi) else {
            debug!("Empty ROI crop, skipping OCR this cycle");
            return Ok(CycleOutcome::NoImage);
        };

        debug!(
            "Enhanced {}x{} region {:?} after capture",
            enhanced.width(),
            enhanced.height(),
            frame.timestamp.elapsed()
        );
        self.debug_sink.maybe_write(&enhanced, Instant::now());

        let text = match self.ocr.recognize(&enhanced) {
            Ok(text) => text,
            Err(e) => {
                warn!("OCR failed this cycle: {:#}", e);
                return Ok(CycleOutcome::EmptyText);
            }
        };

        if let Some(coords) = extract_coordinates(&text) {
            return Ok(CycleOutcome::Coordinates(coords));
        }

        let raw = text.trim().replace('\n', " ");
        if raw.is_empty() {
            Ok(CycleOutcome::EmptyText)
        } else {
            Ok(CycleOutcome::RawText(raw))
        }
    }
}

/// Remaining sleep for a cycle: the target interval minus the time already
/// spent, never below the floor. Slow cycles still yield briefly instead of
/// spinning; fast cycles are throttled to the cadence.
fn cycle_delay(elapsed: Duration, target: Duration, floor: Duration) -> Duration {
    target.saturating_sub(elapsed).max(floor)
}

/// Console line for a cycle outcome, or `None` when there is nothing worth
/// reporting (empty text, skipped cycle).
fn format_outcome(outcome: &CycleOutcome, timestamp: &str) -> Option<String> {
    match outcome {
        CycleOutcome::Coordinates(c) => Some(format!(
            "[{}] SUCCESS -> X:{:8.1} Y:{:8.1} Z:{:8.1}",
            timestamp, c.x, c.y, c.z
        )),
        CycleOutcome::RawText(raw) => {
            let snippet: String = raw.chars().take(40).collect();
            Some(format!("[{}] Raw Output: [{}]", timestamp, snippet))
        }
        CycleOutcome::EmptyText | CycleOutcome::NoImage => None,
    }
}
