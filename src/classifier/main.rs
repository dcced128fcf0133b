use clap::Parser;
use petcheck::api::{classifier_router, serve, ClassifierState, ServerConfig};
use petcheck::classifier::{ClassifierConfig, OnnxConditionModel, SkinClassifier};
use petcheck::common::init_logger_exe;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(version, about = "Classify dog and cat skin conditions from photos", long_about = None)]
struct Cli {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,
    #[arg(long, env = "PORT", default_value_t = 5006)]
    port: u16,
    #[arg(long, env = "MAX_UPLOAD_BYTES", help = "largest accepted request body in bytes")]
    max_upload_bytes: Option<usize>,
    #[arg(long, env = "MODEL_PATH", help = "skin condition network in ONNX format")]
    model: PathBuf,
    #[arg(long, env = "LABELS_PATH", help = "class labels, one per line in output order")]
    labels: PathBuf,
    #[arg(long, env = "INFERENCE_THREADS")]
    threads: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger_exe();
    let cli = Cli::parse();

    log::info!("Starting skin classifier...");

    let config = ClassifierConfig::new(cli.model, cli.labels, cli.threads);
    let model = OnnxConditionModel::load(&config)?;
    let classifier = SkinClassifier::new(Arc::new(model));

    let server = ServerConfig::new(Some(cli.host), cli.port, cli.max_upload_bytes);
    let app = classifier_router(ClassifierState::new(classifier), &server);

    log::info!("Endpoints: POST /predict, GET /ping, GET /health");
    serve(app, &server).await
}
