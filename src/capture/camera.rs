//! OpenCV `VideoCapture` backend

use image::RgbImage;
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use tracing::{debug, info};

use super::frame::CapturedFrame;
use super::{CaptureError, FrameSource};
use crate::config::CaptureSettings;

/// Highest device index probed when searching for a camera
const MAX_PROBE_INDEX: u32 = 5;

/// Camera backend over OpenCV `VideoCapture`
pub struct OpenCvCamera {
    cap: VideoCapture,
    buffer: Mat,
}

impl OpenCvCamera {
    /// Open the device and request the configured resolution.
    ///
    /// A buffer size hint of 1 is requested so the driver queues as little
    /// as possible; the warmup grabs in the loop compensate where the hint
    /// is ignored.
    pub fn open(settings: &CaptureSettings) -> Result<Self, CaptureError> {
        let index = settings.device_index;
        let mut cap = VideoCapture::new(index as i32, videoio::CAP_ANY)
            .map_err(|e| CaptureError::Backend(e.to_string()))?;

        if !cap.is_opened().unwrap_or(false) {
            return Err(CaptureError::OpenFailed { index });
        }

        let _ = cap.set(videoio::CAP_PROP_FRAME_WIDTH, settings.width as f64);
        let _ = cap.set(videoio::CAP_PROP_FRAME_HEIGHT, settings.height as f64);
        let _ = cap.set(videoio::CAP_PROP_BUFFERSIZE, 1.0);

        info!(
            "Opened camera {} at {}x{}",
            index, settings.width, settings.height
        );

        Ok(Self {
            cap,
            buffer: Mat::default(),
        })
    }
}

impl FrameSource for OpenCvCamera {
    fn grab(&mut self) -> Result<(), CaptureError> {
        match self.cap.grab() {
            Ok(true) => Ok(()),
            Ok(false) => Err(CaptureError::Disconnected),
            Err(e) => Err(CaptureError::Backend(e.to_string())),
        }
    }

    fn retrieve(&mut self) -> Result<CapturedFrame, CaptureError> {
        let ok = self
            .cap
            .retrieve(&mut self.buffer, 0)
            .map_err(|e| CaptureError::Backend(e.to_string()))?;
        if !ok {
            return Err(CaptureError::Disconnected);
        }
        let image = mat_to_rgb(&self.buffer)?;
        Ok(CapturedFrame::new(image))
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        let _ = self.cap.release();
        debug!("Camera released");
    }
}

/// Convert a BGR `Mat` into an `RgbImage`
fn mat_to_rgb(mat: &Mat) -> Result<RgbImage, CaptureError> {
    let width = mat.cols();
    let height = mat.rows();
    if width <= 0 || height <= 0 {
        return Err(CaptureError::Disconnected);
    }

    let data = mat
        .data_bytes()
        .map_err(|e| CaptureError::Backend(e.to_string()))?;
    let expected = (width as usize) * (height as usize) * 3;
    if data.len() < expected {
        return Err(CaptureError::Backend(format!(
            "unexpected frame buffer size {} for {}x{}",
            data.len(),
            width,
            height
        )));
    }

    let mut rgb = Vec::with_capacity(expected);
    for px in data[..expected].chunks_exact(3) {
        rgb.extend_from_slice(&[px[2], px[1], px[0]]);
    }

    RgbImage::from_raw(width as u32, height as u32, rgb)
        .ok_or_else(|| CaptureError::Backend("frame buffer did not match dimensions".into()))
}

/// Probe device indices and return those that open successfully
pub fn list_cameras() -> Vec<u32> {
    let mut found = Vec::new();
    for i in 0..=MAX_PROBE_INDEX {
        if let Ok(mut cap) = VideoCapture::new(i as i32, videoio::CAP_ANY) {
            if cap.is_opened().unwrap_or(false) {
                found.push(i);
            }
            let _ = cap.release();
        }
    }
    found
}
