use anyhow::Result;
use clap::{Parser, Subcommand};
use petcheck::classifier::{ClassifierConfig, OnnxConditionModel, Prediction, SkinClassifier};
use petcheck::common::{init_logger_exe, Species};
use petcheck::image2text::{OcrConfig, TesseractExtractor};
use petcheck::image_utils::{allowed_file, load_image_from_path};
use petcheck::stamp::{StampConfig, StampDetector};
use petcheck::verifier::{DocumentVerifier, VerifierConfig};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(version, about = "A CLI tool to verify licenses and classify skin photos offline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a license image for the official stamp and required keywords
    Verify {
        #[arg(long, help = "license image (png, jpg)")]
        image: PathBuf,
        #[arg(long, env = "REFERENCE_STAMP", help = "image of the official stamp")]
        reference: PathBuf,
        #[arg(long, env = "STAMP_THRESHOLD")]
        threshold: Option<f32>,
        #[arg(long = "keyword", value_delimiter = ',')]
        keywords: Vec<String>,
    },
    /// Classify the skin condition in a dog or cat photo
    Classify {
        #[arg(long, help = "photo of the affected skin (png, jpg)")]
        image: PathBuf,
        #[arg(long, help = "dog or cat")]
        species: String,
        #[arg(long, env = "MODEL_PATH")]
        model: PathBuf,
        #[arg(long, env = "LABELS_PATH")]
        labels: PathBuf,
    },
}

fn verify(image: PathBuf, reference: PathBuf, threshold: Option<f32>, keywords: Vec<String>) -> Result<()> {
    let stamp_config = StampConfig::new(threshold, None, None);
    let detector = StampDetector::from_path(&reference, stamp_config.clone())?;

    let config = VerifierConfig {
        stamp: stamp_config,
        required_keywords: if keywords.is_empty() {
            VerifierConfig::get_default_keywords()
        } else {
            keywords
        },
        ..Default::default()
    };
    let ocr = TesseractExtractor::new(OcrConfig::default());
    let verifier = DocumentVerifier::new(Some(detector), Arc::new(ocr), config);

    let document = load_image_from_path(&image)?;
    let result = verifier.verify(&document);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn classify(image: PathBuf, species: String, model: PathBuf, labels: PathBuf) -> Result<()> {
    let species: Species = species.parse()?;
    if !allowed_file(&image.to_string_lossy()) {
        anyhow::bail!("Invalid file type: {}", image.display());
    }

    let config = ClassifierConfig::new(model, labels, None);
    let classifier = SkinClassifier::new(Arc::new(OnnxConditionModel::load(&config)?));

    let classification = classifier.classify_path(&image, species)?;
    println!("{}", serde_json::to_string_pretty(&Prediction::new(classification))?);
    Ok(())
}

fn main() -> Result<()> {
    init_logger_exe();
    let cli = Cli::parse();

    let started = std::time::Instant::now();
    let result = match cli.command {
        Command::Verify {
            image,
            reference,
            threshold,
            keywords,
        } => verify(image, reference, threshold, keywords),
        Command::Classify {
            image,
            species,
            model,
            labels,
        } => classify(image, species, model, labels),
    };

    log::info!("Time taken: {:.2?}", started.elapsed());
    result
}
