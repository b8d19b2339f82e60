//! Frame data structures for captured camera content

use image::{imageops, RgbImage};
use std::time::Instant;

use crate::config::RoiSettings;

/// A captured frame from the camera
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// RGB pixel data at the configured capture resolution
    pub image: RgbImage,
    /// Timestamp when the frame was retrieved
    pub timestamp: Instant,
}

impl CapturedFrame {
    /// Create a new captured frame
    pub fn new(image: RgbImage) -> Self {
        Self {
            image,
            timestamp: Instant::now(),
        }
    }

    /// Get frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Copy out the region of interest.
    ///
    /// The rectangle is validated against the capture resolution at startup,
    /// so the cut here cannot run off the frame.
    pub fn crop_roi(&self, roi: &RoiSettings) -> RgbImage {
        imageops::crop_imm(&self.image, roi.left, roi.top, roi.width(), roi.height()).to_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn test_frame(width: u32, height: u32) -> CapturedFrame {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 0])
        });
        CapturedFrame::new(image)
    }

    #[test]
    fn test_dimensions() {
        let frame = test_frame(64, 48);
        assert_eq!(frame.dimensions(), (64, 48));
    }

    #[test]
    fn test_crop_roi_dimensions() {
        let frame = test_frame(64, 48);
        let roi = RoiSettings {
            top: 4,
            bottom: 20,
            left: 8,
            right: 40,
        };
        let crop = frame.crop_roi(&roi);
        assert_eq!(crop.dimensions(), (32, 16));
    }

    #[test]
    fn test_crop_roi_content() {
        let frame = test_frame(64, 48);
        let roi = RoiSettings {
            top: 4,
            bottom: 20,
            left: 8,
            right: 40,
        };
        let crop = frame.crop_roi(&roi);
        // Top-left of the crop is frame pixel (8, 4).
        assert_eq!(crop.get_pixel(0, 0), frame.image.get_pixel(8, 4));
        assert_eq!(crop.get_pixel(31, 15), frame.image.get_pixel(39, 19));
    }

    #[test]
    fn test_crop_full_frame() {
        let frame = test_frame(16, 12);
        let roi = RoiSettings {
            top: 0,
            bottom: 12,
            left: 0,
            right: 16,
        };
        let crop = frame.crop_roi(&roi);
        assert_eq!(crop, frame.image);
    }
}
