// src/models/submission.rs

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    kyc::{EntityType, PersonRole},
    person::FieldValues,
    session::UboPerson,
};

// Tudo aqui é o formato enviado ao backend: só referências, nenhum conteúdo.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttachmentRef {
    pub id: Uuid,
    pub display_name: String,
    pub remote_reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DocumentGroupPayload {
    pub category: String,
    pub files: Vec<AttachmentRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PersonPayload {
    pub id: Uuid,
    pub role: PersonRole,
    pub entity_type: EntityType,
    #[schema(value_type = Object)]
    pub fields: FieldValues,
    pub documents: Vec<DocumentGroupPayload>,
}

/// Corpo do POST de documentos/UBO.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmissionPayload {
    pub application_id: String,
    pub company_type: String,
    pub company_documents: Vec<String>,
    pub beneficial_owner: String,
    pub ultimate_beneficial_owner: String,
    pub source_of_funds: String,
    pub shareholders_source_of_wealth: String,
    pub shareholders_nationality_country: String,
    pub confirmation_checked: bool,
    pub ubo_persons: Vec<UboPerson>,
    pub kyc_persons: Vec<PersonPayload>,
}

// Resposta do commit do passo
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    pub uploaded_files: usize,
    pub submitted_persons: usize,
    pub message: Option<String>,
    pub next_step: crate::models::session::WizardStep,
}
