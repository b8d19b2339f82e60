//! coordtrack - webcam coordinate-readout tracker
//!
//! Continuously samples frames from a fixed camera pointed at a screen,
//! crops the region showing an "X, Y, Z" coordinate readout, enhances it
//! for OCR, and prints the recovered triple once per cycle.

mod analysis;
mod capture;
mod config;
mod debug_sink;
mod tracker;
mod vision;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::AppConfig;
use crate::tracker::CoordinateTracker;

/// coordtrack - OCR an on-screen coordinate readout through a webcam
#[derive(Parser, Debug)]
#[command(name = "coordtrack")]
#[command(about = "Samples a fixed camera region and extracts an X, Y, Z triple via OCR")]
struct Args {
    /// Path to a TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Camera device index, overriding the configured one
    #[arg(short, long)]
    device: Option<u32>,

    /// Probe device indices and exit
    #[arg(long)]
    list_cameras: bool,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    if args.list_cameras {
        return list_cameras();
    }

    let mut config = load_or_default_config(args.config.as_deref())?;
    if let Some(device) = args.device {
        config.capture.device_index = device;
    }

    // Bad ROI bounds abort here, before the device is opened.
    config
        .roi
        .validate(config.capture.width, config.capture.height)?;

    let camera = open_camera(&config)?;
    let ocr = open_ocr(&config)?;

    let mut tracker = CoordinateTracker::new(config, camera, ocr);

    let running = tracker.stop_flag();
    ctrlc::set_handler(move || {
        info!("Stop requested, finishing current cycle");
        running.store(false, Ordering::SeqCst);
    })?;
    info!("Press Ctrl+C to stop");

    tracker.run()
}

/// Load configuration from the given path, or fall back to defaults
fn load_or_default_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            let config = config::load_config(path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => {
            info!("Using default configuration");
            Ok(AppConfig::default())
        }
    }
}

#[cfg(feature = "camera")]
fn list_cameras() -> Result<()> {
    let found = capture::list_cameras();
    if found.is_empty() {
        println!("No cameras detected");
    } else {
        println!("Available camera indices:");
        for index in found {
            println!("  [{index}]");
        }
    }
    Ok(())
}

#[cfg(not(feature = "camera"))]
fn list_cameras() -> Result<()> {
    anyhow::bail!("built without the 'camera' feature; no capture backend available")
}

#[cfg(feature = "camera")]
fn open_camera(config: &AppConfig) -> Result<Box<dyn capture::FrameSource>> {
    let camera = capture::OpenCvCamera::open(&config.capture)?;
    Ok(Box::new(camera))
}

#[cfg(not(feature = "camera"))]
fn open_camera(_config: &AppConfig) -> Result<Box<dyn capture::FrameSource>> {
    anyhow::bail!("built without the 'camera' feature; no capture backend available")
}

#[cfg(feature = "tesseract")]
fn open_ocr(config: &AppConfig) -> Result<Box<dyn vision::TextRecognizer>> {
    let ocr = vision::TesseractOcr::new(&config.ocr)?;
    Ok(Box::new(ocr))
}

#[cfg(not(feature = "tesseract"))]
fn open_ocr(_config: &AppConfig) -> Result<Box<dyn vision::TextRecognizer>> {
    anyhow::bail!("built without the 'tesseract' feature; no OCR backend available")
}
