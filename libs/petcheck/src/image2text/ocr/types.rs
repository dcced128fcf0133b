use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OcrConfig {
    pub lang: Option<String>,
    pub dpi: Option<u32>, // dots per inch
    pub psm: Option<u32>, // Page segmentation mode
    pub oem: Option<u32>, // OCR Engine Mode
}

impl OcrConfig {
    pub fn new(lang: Option<String>, dpi: Option<u32>, psm: Option<u32>, oem: Option<u32>) -> Self {
        Self {
            lang,
            dpi,
            psm,
            oem
        }
    }

    pub fn get_default_lang() -> String {
        "eng".to_string()
    }

    // single uniform block of text, the layout of a printed license
    pub fn get_default_psm() -> u32 {
        6
    }

    pub fn get_default_oem() -> u32 {
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unset() {
        let config = OcrConfig::default();
        assert!(config.lang.is_none());
        assert!(config.dpi.is_none());
        assert_eq!(config.psm.unwrap_or(OcrConfig::get_default_psm()), 6);
        assert_eq!(config.oem.unwrap_or(OcrConfig::get_default_oem()), 3);
    }
}
