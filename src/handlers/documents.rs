// src/handlers/documents.rs

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError, FileRejection},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        kyc::FileUploadSettings,
        person::{CategoryAttachments, IncomingFile},
    },
};

const FILES_FIELD: &str = "files";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

// Só para a documentação do corpo multipart
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadDocumentsForm {
    #[schema(value_type = Vec<String>, format = Binary)]
    pub files: Vec<String>,
}

// Lê as partes "files" (outras partes são ignoradas). Quantidade e tamanho
// são conferidos durante a leitura, antes de o corpo estourar o limite da rota.
async fn read_files(mut multipart: Multipart, limits: &FileUploadSettings) -> Result<Vec<IncomingFile>, AppError> {
    let max_bytes = limits.max_file_size_bytes() as usize;
    let mut files = Vec::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::MalformedUpload(e.body_text()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        if files.len() == limits.max_files_per_field {
            return Err(FileRejection::TooManyFiles {
                max: limits.max_files_per_field,
                received: files.len() + 1,
            }
            .into());
        }

        let name = field.file_name().unwrap_or("file").to_string();
        let content_type = field
            .content_type()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_lowercase();

        let mut content = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::MalformedUpload(e.body_text()))?
        {
            if content.len() + chunk.len() > max_bytes {
                return Err(FileRejection::TooLarge { file: name, max_mb: limits.max_file_size }.into());
            }
            content.extend_from_slice(&chunk);
        }

        files.push(IncomingFile { name, content_type, content: Bytes::from(content) });
    }

    Ok(files)
}

// POST /api/applications/{id}/persons/{person_id}/documents/{category}
#[utoipa::path(
    post,
    path = "/api/applications/{id}/persons/{person_id}/documents/{category}",
    tag = "Documents",
    request_body(content = UploadDocumentsForm, content_type = "multipart/form-data"),
    params(
        ("id" = Uuid, Path, description = "ID da aplicação"),
        ("person_id" = Uuid, Path, description = "ID da pessoa"),
        ("category" = String, Path, description = "Categoria de documentos", example = "Identity Documents")
    ),
    responses(
        (status = 201, description = "Arquivos anexados como pendentes", body = CategoryAttachments),
        (status = 400, description = "Lote rejeitado (quantidade, tamanho ou formato)"),
        (status = 404, description = "Pessoa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_documents(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((id, person_id, category)): Path<(Uuid, Uuid, String)>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let files = read_files(multipart, &app_state.settings.upload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let bucket = app_state
        .onboarding_service
        .add_documents(id, person_id, &category, files)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(bucket)))
}

// DELETE /api/applications/{id}/persons/{person_id}/documents/{category}/{file_id}
#[utoipa::path(
    delete,
    path = "/api/applications/{id}/persons/{person_id}/documents/{category}/{file_id}",
    tag = "Documents",
    params(
        ("id" = Uuid, Path, description = "ID da aplicação"),
        ("person_id" = Uuid, Path, description = "ID da pessoa"),
        ("category" = String, Path, description = "Categoria de documentos"),
        ("file_id" = Uuid, Path, description = "ID do anexo")
    ),
    responses(
        (status = 204, description = "Anexo removido (ou já inexistente)"),
        (status = 400, description = "Categoria não pertence ao tipo de entidade")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_document(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((id, person_id, category, file_id)): Path<(Uuid, Uuid, String, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .onboarding_service
        .remove_document(id, person_id, &category, file_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
