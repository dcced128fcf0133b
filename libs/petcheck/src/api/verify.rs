use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;

use super::errors::VerifyError;
use super::types::VerifierState;
use crate::image_utils::decode_image_bytes;
use crate::verifier::VerificationResult;

pub const LICENSE_FIELD: &str = "licenseImage";

struct Upload {
    file_name: String,
    data: Vec<u8>,
}

/// POST /verify-license
///
/// Multipart field `licenseImage`. Answers 200 whenever both checks ran,
/// including when the license is rejected.
pub async fn verify_license(
    State(state): State<VerifierState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VerificationResult>, VerifyError> {
    log::info!("Received request for license verification");
    let mut multipart = multipart?;

    let mut upload: Option<Upload> = None;
    let mut received_files = Vec::new();
    let mut received_form = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        // parts without a filename are plain form values, even under the upload's name
        match file_name {
            Some(file_name) if name == LICENSE_FIELD && upload.is_none() => {
                let data = field.bytes().await?.to_vec();
                received_files.push(name);
                upload = Some(Upload { file_name, data });
            }
            Some(_) => received_files.push(name),
            None => received_form.push(name),
        }
    }

    let upload = upload.ok_or(VerifyError::MissingFile {
        received_files,
        received_form,
    })?;

    if upload.file_name.is_empty() || upload.data.is_empty() {
        return Err(VerifyError::NoSelectedFile);
    }

    let verifier = state.verifier.clone();
    let result = tokio::task::spawn_blocking(move || {
        let image = decode_image_bytes(&upload.data).map_err(|e| {
            log::warn!("Could not decode {}: {:#}", upload.file_name, e);
            VerifyError::InvalidImage
        })?;
        log::info!("Image shape: {}x{}", image.width(), image.height());
        Ok::<_, VerifyError>(verifier.verify(&image))
    })
    .await
    .map_err(|e| VerifyError::Internal(e.to_string()))??;

    log::info!("License verification finished: {}", result.message);
    Ok(Json(result))
}
