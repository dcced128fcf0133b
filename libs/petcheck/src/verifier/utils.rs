use image::DynamicImage;
use std::sync::Arc;

use super::types::{VerificationOutcome, VerificationResult, VerifierConfig};
use crate::image2text::TextExtractor;
use crate::stamp::StampDetector;

/// Keywords that appear in `text`, compared case-insensitively.
pub fn contains_required_keywords(text: &str, keywords: &[String]) -> Vec<String> {
    let haystack = text.to_lowercase();
    keywords
        .iter()
        .filter(|keyword| haystack.contains(&keyword.to_lowercase()))
        .cloned()
        .collect()
}

/// Checks an uploaded license for the official stamp and the issuing
/// authority's name. Built once at startup and shared across requests.
pub struct DocumentVerifier {
    stamp: Option<StampDetector>,
    ocr: Arc<dyn TextExtractor>,
    config: VerifierConfig,
}

impl DocumentVerifier {
    pub fn new(stamp: Option<StampDetector>, ocr: Arc<dyn TextExtractor>, config: VerifierConfig) -> Self {
        if stamp.is_none() {
            log::error!("Reference stamp image not available, all licenses will be rejected");
        }
        Self { stamp, ocr, config }
    }

    fn stamp_present(&self, image: &DynamicImage) -> bool {
        match &self.stamp {
            Some(detector) => detector.is_present(image),
            None => {
                log::error!("Reference image not available");
                false
            }
        }
    }

    fn keywords_present(&self, image: &DynamicImage) -> bool {
        match self.ocr.extract_text(image) {
            Ok(text) => {
                log::info!("OCR text extracted");
                let found = contains_required_keywords(&text, &self.config.required_keywords);
                log::info!("Keywords found: {:?}", found);
                !found.is_empty()
            }
            Err(e) => {
                log::error!("OCR error: {:#}", e);
                false
            }
        }
    }

    pub fn check(&self, image: &DynamicImage) -> VerificationOutcome {
        if !self.stamp_present(image) {
            return VerificationOutcome::StampNotDetected;
        }
        if !self.keywords_present(image) {
            return VerificationOutcome::KeywordsNotFound;
        }
        VerificationOutcome::Verified
    }

    pub fn verify(&self, image: &DynamicImage) -> VerificationResult {
        log::info!("Verifying license image {}x{}", image.width(), image.height());
        self.check(image).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stamp::StampConfig;
    use anyhow::Result;
    use image::{Rgb, RgbImage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedText {
        text: Option<String>,
        calls: AtomicUsize,
    }

    impl FixedText {
        fn new(text: Option<&str>) -> Self {
            Self {
                text: text.map(str::to_string),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl TextExtractor for FixedText {
        fn extract_text(&self, _image: &DynamicImage) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.text.clone().ok_or_else(|| anyhow::anyhow!("tesseract not installed"))
        }
    }

    fn verifier(text: Option<&str>) -> (DocumentVerifier, Arc<FixedText>) {
        let stamp = crate::stamp::tests_support::synthetic_stamp();
        let detector = StampDetector::new(&DynamicImage::ImageRgb8(stamp), StampConfig::default());
        let ocr = Arc::new(FixedText::new(text));
        let verifier = DocumentVerifier::new(Some(detector), ocr.clone(), VerifierConfig::default());
        (verifier, ocr)
    }

    fn stamped_document() -> DynamicImage {
        DynamicImage::ImageRgb8(crate::stamp::tests_support::document_with_stamp(90, 50))
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let keywords = VerifierConfig::get_default_keywords();
        let found = contains_required_keywords("STATE OF PALESTINE\nlicense no. 42", &keywords);
        assert_eq!(found, vec!["State of Palestine".to_string()]);
        assert!(contains_required_keywords("Ministry of Health", &keywords).is_empty());
    }

    #[test]
    fn test_valid_license() {
        let (verifier, _) = verifier(Some("State of Palestine - Ministry of Agriculture"));
        let result = verifier.verify(&stamped_document());
        assert!(result.is_valid);
        assert_eq!(result.message, "Stamp and required keywords detected");
    }

    #[test]
    fn test_missing_stamp_skips_ocr() {
        let (verifier, ocr) = verifier(Some("Ministry of Agriculture"));
        let blank = DynamicImage::ImageRgb8(RgbImage::from_pixel(160, 120, Rgb([255, 255, 255])));
        let result = verifier.verify(&blank);
        assert!(!result.is_valid);
        assert_eq!(result.message, "Official stamp not detected");
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_lined_paper_without_stamp() {
        let (verifier, ocr) = verifier(Some("State of Palestine"));
        let ruled = DynamicImage::ImageRgb8(crate::stamp::tests_support::ruled_document());
        assert_eq!(verifier.check(&ruled), VerificationOutcome::StampNotDetected);
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_keywords() {
        let (verifier, _) = verifier(Some("Veterinary clinic receipt"));
        let result = verifier.verify(&stamped_document());
        assert_eq!(result.message, "Required keywords not found");
        assert!(!result.is_valid);
    }

    #[test]
    fn test_ocr_failure_degrades_to_invalid() {
        let (verifier, ocr) = verifier(None);
        let outcome = verifier.check(&stamped_document());
        assert_eq!(outcome, VerificationOutcome::KeywordsNotFound);
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_without_reference_stamp() {
        let ocr = Arc::new(FixedText::new(Some("Ministry of Agriculture")));
        let verifier = DocumentVerifier::new(None, ocr, VerifierConfig::default());
        assert_eq!(verifier.check(&stamped_document()), VerificationOutcome::StampNotDetected);
    }
}
