//! Camera Capture Layer
//!
//! Abstracts the camera behind a blocking `FrameSource` trait so the
//! sampling loop can run against scripted frames in tests. The production
//! backend wraps an OpenCV `VideoCapture` (feature `camera`).

pub mod frame;

#[cfg(feature = "camera")]
mod camera;
#[cfg(feature = "camera")]
pub use camera::{list_cameras, OpenCvCamera};

use thiserror::Error;

use frame::CapturedFrame;

/// Capture-layer errors
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The device could not be opened at startup
    #[error("could not open camera device {index}")]
    OpenFailed { index: u32 },
    /// The device stopped yielding frames mid-loop
    #[error("camera disconnected or stopped yielding frames")]
    Disconnected,
    /// Backend-specific failure
    #[error("capture backend error: {0}")]
    Backend(String),
}

/// A blocking source of camera frames.
///
/// Mirrors the grab/retrieve split of typical capture drivers: `grab`
/// pulls the next frame into the driver's internal buffer (cheap, used to
/// drain stale frames), `retrieve` decodes and returns the last grabbed
/// frame. The device handle is released when the source is dropped.
pub trait FrameSource {
    /// Advance the driver's internal buffer by one frame.
    fn grab(&mut self) -> Result<(), CaptureError>;

    /// Decode and return the last grabbed frame.
    fn retrieve(&mut self) -> Result<CapturedFrame, CaptureError>;
}
