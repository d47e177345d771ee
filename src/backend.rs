// src/backend.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    models::{
        application::CustomerDetailsPayload,
        auth::RemoteAuthAnswer,
        person::IncomingFile,
        submission::SubmissionPayload,
    },
};

pub mod http_backend;
pub use http_backend::{BackendEndpoints, HttpBackend};

/// O backend-as-a-service remoto: autenticação, aplicações, customer
/// details, upload de arquivos e submissão de documentos/UBO.
///
/// Toda chamada autenticada recebe o token explicitamente.
#[async_trait]
pub trait KycBackend: Send + Sync {
    async fn signup(&self, email: &str, password: &str, user_type: &str) -> Result<RemoteAuthAnswer, AppError>;

    async fn login(&self, email: &str, password: &str) -> Result<RemoteAuthAnswer, AppError>;

    /// Devolve o ID remoto da nova aplicação.
    async fn create_application(
        &self,
        token: &str,
        application_type: &str,
        company_name: &str,
    ) -> Result<String, AppError>;

    async fn save_customer_details(&self, token: &str, payload: &CustomerDetailsPayload) -> Result<(), AppError>;

    /// Um arquivo por chamada (multipart). Devolve a referência remota (URL).
    async fn upload_file(&self, token: &str, file: &IncomingFile) -> Result<String, AppError>;

    /// Devolve a mensagem do backend, se houver.
    async fn submit_documents(&self, token: &str, payload: &SubmissionPayload) -> Result<Option<String>, AppError>;
}
