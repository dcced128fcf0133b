use anyhow::Result;
use image::DynamicImage;
use rusty_tesseract::{Args, Image};
use std::collections::HashMap;

use super::types::OcrConfig;
use super::TextExtractor;

/// Runs the `tesseract` binary on the image.
#[derive(Clone, Debug, Default)]
pub struct TesseractExtractor {
    config: OcrConfig,
}

impl TesseractExtractor {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    fn args(&self) -> Args {
        Args {
            lang: self.config.lang.clone().unwrap_or_else(OcrConfig::get_default_lang),
            config_variables: HashMap::new(),
            dpi: self.config.dpi.map(|dpi| dpi as i32),
            psm: Some(self.config.psm.unwrap_or(OcrConfig::get_default_psm()) as i32),
            oem: Some(self.config.oem.unwrap_or(OcrConfig::get_default_oem()) as i32),
        }
    }
}

impl TextExtractor for TesseractExtractor {
    fn extract_text(&self, image: &DynamicImage) -> Result<String> {
        let ocr_image = Image::from_dynamic_image(image)
            .map_err(|e| anyhow::anyhow!("Failed to prepare image for OCR: {}", e))?;

        let text = rusty_tesseract::image_to_string(&ocr_image, &self.args())
            .map_err(|e| anyhow::anyhow!("Tesseract failed: {}", e))?;

        log::debug!("OCR extracted {} characters", text.len());
        Ok(text)
    }
}
