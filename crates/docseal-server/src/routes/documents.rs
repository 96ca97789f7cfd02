//! `/upload` and `/verify`

use axum::extract::{Multipart, State};
use axum::Json;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use docseal::{Document, DocumentId, VerificationOutcome};
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

const DOCUMENT_FIELD: &str = "document";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_name: String,
    /// Hex SHA-256 of the document
    pub file_hash: String,
    /// Base64 of the raw signature bytes
    pub signature: String,
    /// PEM-armored public key
    pub public_key: String,
    #[serde(rename = "json_ipfs_hash", skip_serializing_if = "Option::is_none")]
    pub json_ipfs_hash: Option<String>,
    #[serde(rename = "file_ipfs_hash", skip_serializing_if = "Option::is_none")]
    pub file_ipfs_hash: Option<String>,
}

/// Pull the `document` file field out of a multipart body
async fn read_document(mut multipart: Multipart) -> Result<Document, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(DOCUMENT_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::bad_request("document field has no file name"))?;
        let content = field.bytes().await?;
        let id = DocumentId::new(file_name)?;
        return Ok(Document::new(id, content.to_vec()));
    }
    Err(ApiError::bad_request("missing multipart field 'document'"))
}

/// Sign an uploaded document and persist its artifact
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let document = read_document(multipart).await?;
    tracing::info!(
        document_id = %document.id,
        bytes = document.content.len(),
        "upload received"
    );

    let signer = state.signer.clone();
    let (receipt, document) = tokio::task::spawn_blocking(move || {
        signer.sign(&document).map(|receipt| (receipt, document))
    })
    .await??;

    let mut response = UploadResponse {
        message: "File signed successfully".to_string(),
        file_name: receipt.document_id.to_string(),
        file_hash: receipt.digest.to_hex(),
        signature: BASE64.encode(receipt.signature.as_bytes()),
        public_key: receipt.public_key_pem().to_string(),
        json_ipfs_hash: None,
        file_ipfs_hash: None,
    };

    if let Some(pinner) = &state.pinner {
        let manifest = json!({
            "fileName": response.file_name,
            "fileHash": response.file_hash,
            "signature": response.signature,
            "publicKey": response.public_key,
        });
        let json_cid = pinner.pin_json(&manifest).await.map_err(ApiError::Pinning)?;
        let file_cid = pinner
            .pin_file(&response.file_name, document.content)
            .await
            .map_err(ApiError::Pinning)?;
        response.message = "File and JSON uploaded successfully".to_string();
        response.json_ipfs_hash = Some(json_cid);
        response.file_ipfs_hash = Some(file_cid);
    }

    Ok(Json(response))
}

/// Verify an uploaded document against its stored artifact
pub async fn verify(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<VerificationOutcome>, ApiError> {
    let document = read_document(multipart).await?;

    let verifier = state.verifier.clone();
    let outcome = tokio::task::spawn_blocking(move || verifier.verify(&document)).await??;

    Ok(Json(outcome))
}
