use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use std::io::Write;

use super::errors::PredictError;
use super::types::ClassifierState;
use crate::classifier::Prediction;
use crate::common::Species;
use crate::image_utils::{allowed_file, file_extension};

pub const IMAGE_FIELD: &str = "image";
pub const SPECIES_FIELD: &str = "species";

/// POST /predict
///
/// Multipart field `image` plus form field `species`. The request is fully
/// validated before the model runs. The upload is spooled to a temporary
/// file that is removed once the prediction is made.
pub async fn predict(
    State(state): State<ClassifierState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Prediction>, PredictError> {
    let mut multipart = multipart?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut species = String::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        match (name.as_str(), file_name) {
            (IMAGE_FIELD, Some(file_name)) if upload.is_none() => {
                let data = field.bytes().await?.to_vec();
                upload = Some((file_name, data));
            }
            (SPECIES_FIELD, None) => species = field.text().await?,
            _ => {}
        }
    }

    let (file_name, data) = upload.ok_or(PredictError::NoImage)?;
    if file_name.is_empty() {
        return Err(PredictError::NoSelectedFile);
    }
    let species: Species = species.parse()?;
    if !allowed_file(&file_name) {
        return Err(PredictError::InvalidFileType);
    }

    log::info!("Predicting skin condition for {} ({})", species, file_name);

    let extension = file_extension(&file_name).unwrap_or_else(|| "jpg".to_string());
    let classifier = state.classifier.clone();

    let classification = tokio::task::spawn_blocking(move || {
        let mut temp = tempfile::Builder::new()
            .prefix("temp_pred")
            .suffix(&format!(".{}", extension))
            .tempfile()
            .map_err(|e| PredictError::Internal(format!("Failed to create temporary file: {}", e)))?;
        temp.write_all(&data)
            .and_then(|_| temp.flush())
            .map_err(|e| PredictError::Internal(format!("Failed to write temporary file: {}", e)))?;

        classifier
            .classify_path(temp.path(), species)
            .map_err(PredictError::from)
    })
    .await
    .map_err(|e| PredictError::Internal(e.to_string()))??;

    Ok(Json(Prediction::new(classification)))
}
