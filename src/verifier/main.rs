use clap::Parser;
use petcheck::api::{serve, verifier_router, ServerConfig, VerifierState};
use petcheck::common::init_logger_exe;
use petcheck::image2text::{OcrConfig, TesseractExtractor};
use petcheck::stamp::{StampConfig, StampDetector};
use petcheck::verifier::{DocumentVerifier, VerifierConfig};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(version, about = "Verify uploaded licenses by official stamp and issuing authority", long_about = None)]
struct Cli {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,
    #[arg(long, env = "PORT", default_value_t = 5001)]
    port: u16,
    #[arg(long, env = "MAX_UPLOAD_BYTES", help = "largest accepted request body in bytes")]
    max_upload_bytes: Option<usize>,
    #[arg(long, env = "REFERENCE_STAMP", help = "image of the official stamp to look for")]
    reference_stamp: PathBuf,
    #[arg(long, env = "STAMP_THRESHOLD", help = "minimum edge correlation coefficient for a stamp match")]
    stamp_threshold: Option<f32>,
    #[arg(long, env = "MAX_MATCH_SIDE", help = "downscale documents above this size before matching")]
    max_match_side: Option<u32>,
    #[arg(long, env = "MAX_STAMP_SIDE", help = "downscale references above this size before matching")]
    max_stamp_side: Option<u32>,
    #[arg(
        long = "keyword",
        env = "REQUIRED_KEYWORDS",
        value_delimiter = ',',
        help = "phrase the license must contain, repeatable"
    )]
    keywords: Vec<String>,
    #[arg(long, env = "TESSERACT_LANG")]
    tesseract_lang: Option<String>,
    #[arg(long, env = "TESSERACT_PSM", help = "page segmentation mode")]
    tesseract_psm: Option<u32>,
    #[arg(long, env = "TESSERACT_OEM", help = "OCR engine mode")]
    tesseract_oem: Option<u32>,
    #[arg(long, env = "TESSERACT_DPI")]
    tesseract_dpi: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger_exe();
    let cli = Cli::parse();

    log::info!("Starting license verifier...");

    let stamp_config = StampConfig::new(cli.stamp_threshold, cli.max_match_side, cli.max_stamp_side);
    let stamp = match StampDetector::from_path(&cli.reference_stamp, stamp_config.clone()) {
        Ok(detector) => Some(detector),
        Err(e) => {
            log::error!("Reference stamp image not found or failed to load: {:#}", e);
            None
        }
    };

    let ocr_config = OcrConfig::new(
        cli.tesseract_lang,
        cli.tesseract_dpi,
        cli.tesseract_psm,
        cli.tesseract_oem,
    );
    let required_keywords = if cli.keywords.is_empty() {
        VerifierConfig::get_default_keywords()
    } else {
        cli.keywords
    };
    let config = VerifierConfig {
        stamp: stamp_config,
        ocr: ocr_config.clone(),
        required_keywords,
    };
    log::info!("Required keywords: {:?}", config.required_keywords);

    let verifier = DocumentVerifier::new(stamp, Arc::new(TesseractExtractor::new(ocr_config)), config);

    let server = ServerConfig::new(Some(cli.host), cli.port, cli.max_upload_bytes);
    let app = verifier_router(VerifierState::new(verifier), &server);

    log::info!("Endpoints: POST /verify-license, GET /ping, GET /health");
    serve(app, &server).await
}
