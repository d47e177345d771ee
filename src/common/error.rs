// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Motivo da rejeição de um lote de arquivos. O lote inteiro cai junto.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileRejection {
    #[error("Maximum {max} files allowed per field")]
    TooManyFiles { max: usize, received: usize },

    #[error("File \"{file}\" exceeds {max_mb}MB limit")]
    TooLarge { file: String, max_mb: u64 },

    #[error("File \"{file}\" has invalid format. Please upload images or PDF files only.")]
    InvalidFormat { file: String, content_type: String },
}

impl FileRejection {
    /// Nome do arquivo que causou a rejeição (se houver um só culpado).
    pub fn offending_file(&self) -> Option<&str> {
        match self {
            FileRejection::TooManyFiles { .. } => None,
            FileRejection::TooLarge { file, .. } | FileRejection::InvalidFormat { file, .. } => Some(file),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Erros de configuração (seleção fora do catálogo) ---
    #[error("Invalid company type: {0}")]
    UnknownCompanyType(String),

    #[error("Invalid entity type: {0}")]
    UnknownEntityType(String),

    #[error("Invalid person type: {0}")]
    UnknownRole(String),

    #[error("Categoria '{category}' não existe para {entity_type}")]
    UnknownDocumentCategory { entity_type: String, category: String },

    #[error("Entrada de catálogo não encontrada: {0}")]
    CatalogEntryNotFound(String),

    #[error("Seleção incompleta (tipo de pessoa e tipo de entidade)")]
    IncompleteSelection,

    #[error("Campo '{field}' não se aplica a {entity_type}")]
    FieldNotApplicable { field: String, entity_type: String },

    // --- Upload ---
    #[error("{0}")]
    FileRejected(FileRejection),

    #[error("Nenhum arquivo enviado")]
    EmptyUpload,

    #[error("Upload malformado: {0}")]
    MalformedUpload(String),

    // --- Estado ---
    #[error("Aplicação não encontrada")]
    ApplicationNotFound,

    #[error("Pessoa não encontrada")]
    PersonNotFound,

    #[error("{0} anexo(s) ainda pendente(s)")]
    PendingAttachments(usize),

    #[error("Tipo de empresa não selecionado")]
    CompanyTypeNotSelected,

    #[error("Confirmação da declaração de UBO ausente")]
    ConfirmationRequired,

    #[error("Passo indisponível a partir de {0}")]
    StepNotAvailable(String),

    #[error("Commit de documentos já em andamento")]
    CommitInProgress,

    // --- Autenticação / backend ---
    #[error("Missing auth token")]
    MissingToken,

    #[error("Login successful, but no token received.")]
    NoTokenReceived,

    #[error("Upload failed: {}", .0.join(", "))]
    UploadFailed(Vec<String>),

    #[error("Erro do backend: {0}")]
    Backend(String),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl From<FileRejection> for AppError {
    fn from(rejection: FileRejection) -> Self {
        AppError::FileRejected(rejection)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::UnknownCompanyType(_)
            | AppError::UnknownEntityType(_)
            | AppError::UnknownRole(_)
            | AppError::UnknownDocumentCategory { .. }
            | AppError::IncompleteSelection
            | AppError::FieldNotApplicable { .. }
            | AppError::FileRejected(_)
            | AppError::EmptyUpload
            | AppError::MalformedUpload(_)
            | AppError::CompanyTypeNotSelected
            | AppError::ConfirmationRequired => StatusCode::BAD_REQUEST,
            AppError::CatalogEntryNotFound(_) | AppError::ApplicationNotFound | AppError::PersonNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::PendingAttachments(_) | AppError::StepNotAvailable(_) | AppError::CommitInProgress => {
                StatusCode::CONFLICT
            }
            AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::NoTokenReceived | AppError::UploadFailed(_) | AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Chave da mensagem no I18nStore.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::UnknownCompanyType(_) => "unknown_company_type",
            AppError::UnknownEntityType(_) => "unknown_entity_type",
            AppError::UnknownRole(_) => "unknown_role",
            AppError::UnknownDocumentCategory { .. } => "unknown_document_category",
            AppError::CatalogEntryNotFound(_) => "catalog_entry_not_found",
            AppError::IncompleteSelection => "incomplete_selection",
            AppError::FieldNotApplicable { .. } => "field_not_applicable",
            AppError::FileRejected(FileRejection::TooManyFiles { .. }) => "too_many_files",
            AppError::FileRejected(FileRejection::TooLarge { .. }) => "file_too_large",
            AppError::FileRejected(FileRejection::InvalidFormat { .. }) => "invalid_file_format",
            AppError::EmptyUpload => "empty_upload",
            AppError::MalformedUpload(_) => "malformed_upload",
            AppError::ApplicationNotFound => "application_not_found",
            AppError::PersonNotFound => "person_not_found",
            AppError::PendingAttachments(_) => "pending_attachments",
            AppError::CompanyTypeNotSelected => "company_type_not_selected",
            AppError::ConfirmationRequired => "confirmation_required",
            AppError::StepNotAvailable(_) => "step_not_available",
            AppError::CommitInProgress => "commit_in_progress",
            AppError::MissingToken => "missing_token",
            AppError::NoTokenReceived => "no_token_received",
            AppError::UploadFailed(_) => "upload_failed",
            AppError::Backend(_) => "backend_error",
            AppError::InternalServerError(_) => "internal_error",
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            AppError::UnknownCompanyType(name)
            | AppError::UnknownEntityType(name)
            | AppError::UnknownRole(name)
            | AppError::CatalogEntryNotFound(name) => vec![("name", name.clone())],
            AppError::UnknownDocumentCategory { entity_type, category } => {
                vec![("entity_type", entity_type.clone()), ("category", category.clone())]
            }
            AppError::FieldNotApplicable { field, entity_type } => {
                vec![("field", field.clone()), ("entity_type", entity_type.clone())]
            }
            AppError::FileRejected(FileRejection::TooManyFiles { max, received }) => {
                vec![("max", max.to_string()), ("received", received.to_string())]
            }
            AppError::FileRejected(FileRejection::TooLarge { file, max_mb }) => {
                vec![("file", file.clone()), ("max", max_mb.to_string())]
            }
            AppError::FileRejected(FileRejection::InvalidFormat { file, content_type }) => {
                vec![("file", file.clone()), ("content_type", content_type.clone())]
            }
            AppError::MalformedUpload(reason) => vec![("reason", reason.clone())],
            AppError::PendingAttachments(count) => vec![("count", count.to_string())],
            AppError::StepNotAvailable(step) => vec![("step", step.clone())],
            AppError::UploadFailed(files) => vec![("files", files.join(", "))],
            AppError::Backend(message) => vec![("message", message.clone())],
            _ => Vec::new(),
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| e.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            AppError::FileRejected(rejection) => rejection.offending_file().map(|file| json!({ "file": file })),
            AppError::UploadFailed(files) => Some(json!({ "files": files })),
            _ => None,
        }
    }

    /// Converte para a resposta HTTP no idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();

        match status {
            StatusCode::INTERNAL_SERVER_ERROR => tracing::error!("Erro Interno do Servidor: {:?}", self),
            StatusCode::BAD_GATEWAY => tracing::warn!("Falha no backend remoto: {}", self),
            _ => tracing::debug!("Requisição rejeitada: {}", self),
        }

        ApiError {
            status,
            error: store.translate(&locale.0, self.code(), &self.params()),
            details: self.details(),
        }
    }
}

// Resposta padrão de erro: { "error": "...", "details": ... }
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Usado onde não há Locale disponível (middleware): cai no inglês.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), I18nStore::shared()).into_response()
    }
}
