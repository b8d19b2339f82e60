//! Application Configuration
//!
//! Tracker settings stored in TOML format. Everything here is fixed before
//! the sampling loop starts; there is no runtime reconfiguration.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Camera device settings
    pub capture: CaptureSettings,
    /// Region of the frame containing the coordinate readout
    pub roi: RoiSettings,
    /// OCR engine settings
    pub ocr: OcrSettings,
    /// Loop cadence and debug-snapshot settings
    pub sampling: SamplingSettings,
}

/// Camera device settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Device index passed to the capture backend
    pub device_index: u32,
    /// Requested capture width in pixels
    pub width: u32,
    /// Requested capture height in pixels
    pub height: u32,
    /// Buffered frames discarded before each retrieve, so the processed
    /// frame is fresh rather than a stale one from the driver's queue
    pub warmup_grabs: u32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            width: 1280,
            height: 720,
            warmup_grabs: 5,
        }
    }
}

/// Fixed rectangular region of interest, in frame pixel coordinates.
///
/// `top..bottom` rows and `left..right` columns, end-exclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiSettings {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Default for RoiSettings {
    fn default() -> Self {
        // Coordinate display area of the Bedrock Edition HUD at 1280x720.
        Self {
            top: 10,
            bottom: 160,
            left: 10,
            right: 600,
        }
    }
}

impl RoiSettings {
    /// Validate the rectangle against the configured capture resolution.
    ///
    /// Runs at startup so a bad rectangle fails before the device is even
    /// opened, not at crop time mid-loop.
    pub fn validate(&self, frame_width: u32, frame_height: u32) -> Result<()> {
        if self.top >= self.bottom || self.bottom > frame_height {
            bail!(
                "invalid ROI rows {}..{} for frame height {}",
                self.top,
                self.bottom,
                frame_height
            );
        }
        if self.left >= self.right || self.right > frame_width {
            bail!(
                "invalid ROI columns {}..{} for frame width {}",
                self.left,
                self.right,
                frame_width
            );
        }
        Ok(())
    }

    /// Region width in pixels
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    /// Region height in pixels
    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

/// OCR engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrSettings {
    /// Tesseract language models, `+`-joined (e.g. "jpn+eng")
    pub languages: String,
    /// Page segmentation mode; 6 = assume a single uniform block of text
    pub page_seg_mode: u32,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            languages: "jpn+eng".to_string(),
            page_seg_mode: 6,
        }
    }
}

/// Loop cadence and debug-snapshot settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingSettings {
    /// Target time between cycle starts, in milliseconds
    pub target_interval_ms: u64,
    /// Minimum per-cycle sleep, in milliseconds; keeps a slow cycle from
    /// turning the loop into a busy spin
    pub min_delay_ms: u64,
    /// Minimum time between debug snapshot writes, in seconds
    pub debug_interval_secs: u64,
    /// Where the debug snapshot is written, overwritten in place
    pub debug_image_path: String,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            target_interval_ms: 500,
            min_delay_ms: 100,
            debug_interval_secs: 5,
            debug_image_path: "debug_roi.png".to_string(),
        }
    }
}

impl SamplingSettings {
    pub fn target_interval(&self) -> Duration {
        Duration::from_millis(self.target_interval_ms)
    }

    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn debug_interval(&self) -> Duration {
        Duration::from_secs(self.debug_interval_secs)
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
