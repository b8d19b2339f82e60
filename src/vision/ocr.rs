//! OCR seam and Tesseract backend
//!
//! The engine is a black box from the loop's point of view: binary image in,
//! recognized string out, parameterized by language models and a page
//! segmentation mode.

use anyhow::Result;
use image::GrayImage;

/// Maps an enhanced image to recognized text.
///
/// Implementations are synchronous and blocking; a call may take anywhere
/// from milliseconds to hundreds of milliseconds depending on image content.
pub trait TextRecognizer {
    /// Recognize text in a binary image. The result may be empty and may
    /// contain embedded newlines.
    fn recognize(&mut self, image: &GrayImage) -> Result<String>;
}

#[cfg(feature = "tesseract")]
pub use tesseract::TesseractOcr;

#[cfg(feature = "tesseract")]
mod tesseract {
    use super::TextRecognizer;
    use crate::config::OcrSettings;
    use anyhow::{Context, Result};
    use image::GrayImage;
    use leptess::{LepTess, Variable};
    use tracing::info;

    /// Tesseract OCR backend via leptess
    pub struct TesseractOcr {
        engine: LepTess,
    }

    impl TesseractOcr {
        /// Initialize Tesseract with the configured language models and
        /// page segmentation mode. Fails fast when the engine or its
        /// language data is not installed.
        pub fn new(settings: &OcrSettings) -> Result<Self> {
            let mut engine = LepTess::new(None, &settings.languages).with_context(|| {
                format!(
                    "failed to initialize Tesseract with languages '{}'; is Tesseract installed \
                     with the required language data?",
                    settings.languages
                )
            })?;

            engine
                .set_variable(
                    Variable::TesseditPagesegMode,
                    &settings.page_seg_mode.to_string(),
                )
                .context("failed to set page segmentation mode")?;

            info!(
                "Tesseract ready (languages: {}, psm: {})",
                settings.languages, settings.page_seg_mode
            );

            Ok(Self { engine })
        }
    }

    impl TextRecognizer for TesseractOcr {
        fn recognize(&mut self, image: &GrayImage) -> Result<String> {
            // leptess ingests encoded image data, not raw pixel buffers.
            let mut png = Vec::new();
            image
                .write_to(
                    &mut std::io::Cursor::new(&mut png),
                    image::ImageFormat::Png,
                )
                .context("failed to encode image for OCR")?;

            self.engine
                .set_image_from_mem(&png)
                .context("failed to load image into Tesseract")?;

            let text = self
                .engine
                .get_utf8_text()
                .context("failed to extract text from image")?;

            Ok(text)
        }
    }
}
