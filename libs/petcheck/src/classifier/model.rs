use anyhow::{Context, Result};
use image::DynamicImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;

use super::preprocessing::preprocess;
use super::types::ClassifierConfig;

/// A network that scores an image against every class it was trained on.
pub trait ConditionModel: Send + Sync {
    /// Class labels in output order, e.g. `cat_ringworm`.
    fn class_names(&self) -> &[String];

    /// Softmax over all classes, aligned with `class_names`.
    fn probabilities(&self, image: &DynamicImage) -> Result<Vec<f32>>;
}

pub fn load_class_names(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read class labels: {}", path.display()))?;

    let class_names: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if class_names.is_empty() {
        anyhow::bail!("No class labels in {}", path.display());
    }
    Ok(class_names)
}

pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|v| v / sum).collect()
}

/// Skin condition network exported to ONNX, run on CPU.
pub struct OnnxConditionModel {
    // `Session::run` takes `&mut self`
    session: Mutex<Session>,
    class_names: Vec<String>,
    input_name: String,
}

impl std::fmt::Debug for OnnxConditionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxConditionModel")
            .field("class_names", &self.class_names)
            .field("input_name", &self.input_name)
            .finish_non_exhaustive()
    }
}

impl OnnxConditionModel {
    pub fn load(config: &ClassifierConfig) -> Result<Self> {
        let model_path = config.model_path.as_path();
        if !model_path.exists() {
            anyhow::bail!("Skin model not found: {}", model_path.display());
        }

        let class_names = load_class_names(&config.labels_path)?;
        log::info!("Loaded {} class labels", class_names.len());

        let threads = config
            .intra_threads
            .unwrap_or(ClassifierConfig::get_default_intra_threads());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load skin model from {}", model_path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "input".to_string());

        log::info!(
            "Skin model loaded from {} (input: {}, {} threads)",
            model_path.display(),
            input_name,
            threads
        );

        Ok(Self {
            session: Mutex::new(session),
            class_names,
            input_name,
        })
    }
}

impl ConditionModel for OnnxConditionModel {
    fn class_names(&self) -> &[String] {
        &self.class_names
    }

    fn probabilities(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let input = preprocess(image);

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Skin model session lock poisoned"))?;

        let input_value = Value::from_array(input).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .context("Skin model inference failed")?;

        let logits: Vec<f32> = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?
            .iter()
            .copied()
            .collect();

        if logits.len() != self.class_names.len() {
            anyhow::bail!(
                "Model returned {} scores for {} class labels",
                logits.len(),
                self.class_names.len()
            );
        }

        Ok(softmax(&logits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_softmax() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);

        // large logits must not overflow
        let probs = softmax(&[1000.0, 1000.0]);
        assert!((probs[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_load_class_names() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "cat_fleas\n  cat_healthy \n\ndog_healthy")?;

        let names = load_class_names(file.path())?;
        assert_eq!(names, vec!["cat_fleas", "cat_healthy", "dog_healthy"]);
        Ok(())
    }

    #[test]
    fn test_load_empty_class_names() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        assert!(load_class_names(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_load_missing_model() {
        let config = ClassifierConfig::new("does/not/exist.onnx".into(), "labels.txt".into(), None);
        let err = OnnxConditionModel::load(&config).unwrap_err();
        assert!(err.to_string().contains("Skin model not found"));
    }
}
