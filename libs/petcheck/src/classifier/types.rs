use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::common::Species;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub model_path: PathBuf,
    /// One class label per line, in the model's output order.
    pub labels_path: PathBuf,
    pub intra_threads: Option<usize>,
}

impl ClassifierConfig {
    pub fn new(model_path: PathBuf, labels_path: PathBuf, intra_threads: Option<usize>) -> Self {
        Self {
            model_path,
            labels_path,
            intra_threads,
        }
    }

    pub fn get_default_intra_threads() -> usize {
        4
    }
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("No classes found for species: {0}")]
    NoSpeciesClasses(Species),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Inference failed: {0}")]
    Inference(#[from] anyhow::Error),
}

/// Top condition for one species. `class_probabilities` is a slice of the
/// softmax over every class the model knows, so it does not sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub species: Species,
    pub prediction: String,
    pub full_prediction: String,
    pub confidence: f32,
    pub class_probabilities: BTreeMap<String, f32>,
}

/// Body of a successful `/predict` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(flatten)]
    pub classification: Classification,
    pub recommendation: String,
}

impl Prediction {
    pub fn new(classification: Classification) -> Self {
        let recommendation = super::recommendation(
            &classification.prediction,
            classification.confidence,
            classification.species,
        );
        Self {
            classification,
            recommendation,
        }
    }
}
