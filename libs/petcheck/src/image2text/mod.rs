mod ocr;
pub use ocr::{OcrConfig, TesseractExtractor, TextExtractor};
