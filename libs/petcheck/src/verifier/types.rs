use serde::{Deserialize, Serialize};

use crate::image2text::OcrConfig;
use crate::stamp::StampConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifierConfig {
    pub stamp: StampConfig,
    pub ocr: OcrConfig,
    /// At least one of these must appear in the OCR text, case-insensitively.
    pub required_keywords: Vec<String>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            stamp: StampConfig::default(),
            ocr: OcrConfig::default(),
            required_keywords: Self::get_default_keywords(),
        }
    }
}

impl VerifierConfig {
    pub fn get_default_keywords() -> Vec<String> {
        vec![
            "Ministry of Agriculture".to_string(),
            "State of Palestine".to_string(),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    StampNotDetected,
    KeywordsNotFound,
    Verified,
}

impl VerificationOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            VerificationOutcome::StampNotDetected => "Official stamp not detected",
            VerificationOutcome::KeywordsNotFound => "Required keywords not found",
            VerificationOutcome::Verified => "Stamp and required keywords detected",
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Verified)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_valid: bool,
    pub message: String,
}

impl From<VerificationOutcome> for VerificationResult {
    fn from(outcome: VerificationOutcome) -> Self {
        Self {
            is_valid: outcome.is_valid(),
            message: outcome.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes_camel_case() {
        let result = VerificationResult::from(VerificationOutcome::Verified);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isValid"], true);
        assert_eq!(json["message"], "Stamp and required keywords detected");
    }

    #[test]
    fn test_only_verified_is_valid() {
        assert!(!VerificationResult::from(VerificationOutcome::StampNotDetected).is_valid);
        assert!(!VerificationResult::from(VerificationOutcome::KeywordsNotFound).is_valid);
    }
}
