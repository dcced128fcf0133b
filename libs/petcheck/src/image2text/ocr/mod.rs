mod ocr_tesseract;

mod types;
pub use types::OcrConfig;

pub use ocr_tesseract::TesseractExtractor;

use anyhow::Result;
use image::DynamicImage;

/// Turns an image into plain text. The verifier holds one behind an `Arc`
/// so tests can swap tesseract for a fixture.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, image: &DynamicImage) -> Result<String>;
}
