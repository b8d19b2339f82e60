//! Vision Layer
//!
//! Turns a cropped readout region into OCR-ready pixels and runs text
//! recognition on it. The OCR engine sits behind the `TextRecognizer`
//! trait so the loop can be tested with scripted strings.

pub mod enhance;
pub mod ocr;

pub use enhance::enhance_region;
pub use ocr::TextRecognizer;

#[cfg(feature = "tesseract")]
pub use ocr::TesseractOcr;
