//! Readout region enhancement
//!
//! Deterministic transform turning a raw cropped region into an OCR-friendly
//! binary image. The readout sits on a translucent, textured backdrop, so a
//! single global threshold does not work; each pixel is thresholded against
//! its Gaussian-weighted neighborhood mean instead.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage};
use imageproc::filter::{gaussian_blur_f32, median_filter};

/// Upscale factor applied before OCR; larger glyphs measurably improve
/// recognition on small on-screen text
const UPSCALE: f32 = 2.5;

/// Median filter radius (1 = 3x3 neighborhood), suppresses the backdrop's
/// salt-and-pepper grain without blurring glyph edges
const MEDIAN_RADIUS: u32 = 1;

/// Gaussian sigma for the local-mean threshold, sized to a 13-pixel window
const THRESHOLD_SIGMA: f32 = 2.3;

/// Offset subtracted from the local mean before thresholding
const THRESHOLD_OFFSET: i16 = 2;

/// Enhance a cropped readout region for OCR.
///
/// Grayscale, 2.5x cubic upscale, 3x3 median filter, local-adaptive
/// binarization, polarity inversion so glyphs come out dark on light.
/// Returns `None` for a zero-area input (an out-of-frame crop); cannot
/// fail otherwise.
pub fn enhance_region(roi: &RgbImage) -> Option<GrayImage> {
    let (width, height) = roi.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let gray = imageops::grayscale(roi);

    let scaled_w = (width as f32 * UPSCALE).round() as u32;
    let scaled_h = (height as f32 * UPSCALE).round() as u32;
    let resized = imageops::resize(&gray, scaled_w, scaled_h, FilterType::CatmullRom);

    let filtered = median_filter(&resized, MEDIAN_RADIUS, MEDIAN_RADIUS);

    Some(binarize_inverted(&filtered))
}

/// Local-adaptive binarization with inverted polarity.
///
/// A pixel counts as glyph foreground when it is brighter than its local
/// Gaussian-weighted mean minus the offset; foreground is rendered black
/// and everything else white, the polarity OCR engines are tuned for.
fn binarize_inverted(image: &GrayImage) -> GrayImage {
    let local_mean = gaussian_blur_f32(image, THRESHOLD_SIGMA);

    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let px = image.get_pixel(x, y)[0] as i16;
        let mean = local_mean.get_pixel(x, y)[0] as i16;
        if px > mean - THRESHOLD_OFFSET {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_zero_area_input_yields_none() {
        let empty = RgbImage::new(0, 0);
        assert!(enhance_region(&empty).is_none());

        let zero_width = RgbImage::new(0, 10);
        assert!(enhance_region(&zero_width).is_none());

        let zero_height = RgbImage::new(10, 0);
        assert!(enhance_region(&zero_height).is_none());
    }

    #[test]
    fn test_output_dimensions_scaled() {
        let roi = RgbImage::new(100, 40);
        let enhanced = enhance_region(&roi).unwrap();
        assert_eq!(enhanced.dimensions(), (250, 100));
    }

    #[test]
    fn test_odd_dimensions_round() {
        // 2.5 * 9 = 22.5 rounds up
        let roi = RgbImage::new(9, 9);
        let enhanced = enhance_region(&roi).unwrap();
        assert_eq!(enhanced.dimensions(), (23, 23));
    }

    #[test]
    fn test_output_is_strictly_binary() {
        let roi = RgbImage::from_fn(60, 24, |x, y| {
            let v = ((x * 7 + y * 13) % 256) as u8;
            Rgb([v, v / 2, v])
        });
        let enhanced = enhance_region(&roi).unwrap();
        assert!(enhanced.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_uniform_input_is_all_foreground() {
        // On a flat field every pixel equals its local mean, which is above
        // mean - offset, so the whole region binarizes to foreground black.
        let roi = RgbImage::from_pixel(40, 16, Rgb([180, 180, 180]));
        let enhanced = enhance_region(&roi).unwrap();
        assert!(enhanced.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_step_edge_produces_both_levels() {
        // Bright left half, dark right half: pixels on the dark side of the
        // transition fall below their local mean and come out white.
        let roi = RgbImage::from_fn(40, 16, |x, _| {
            if x < 20 {
                Rgb([220, 220, 220])
            } else {
                Rgb([10, 10, 10])
            }
        });
        let enhanced = enhance_region(&roi).unwrap();
        let blacks = enhanced.pixels().filter(|p| p[0] == 0).count();
        let whites = enhanced.pixels().filter(|p| p[0] == 255).count();
        assert!(blacks > 0);
        assert!(whites > 0);
    }

    #[test]
    fn test_single_pixel_input() {
        let roi = RgbImage::from_pixel(1, 1, Rgb([128, 128, 128]));
        let enhanced = enhance_region(&roi).unwrap();
        assert_eq!(enhanced.dimensions(), (3, 3));
    }
}
