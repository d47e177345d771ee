// src/models/person.rs

use std::collections::BTreeMap;

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::kyc::{EntityType, PersonRole};

// ---
// 1. Arquivo anexado (pendente até o upload devolver uma referência)
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    pub id: Uuid,
    #[schema(example = "passport.pdf")]
    pub display_name: String,
    #[schema(example = "application/pdf")]
    pub content_type: String,
    pub size_bytes: u64,
    /// `None` enquanto o arquivo não foi enviado ao backend.
    pub remote_reference: Option<String>,
    pub added_at: DateTime<Utc>,

    // O conteúdo nunca sai daqui: só a referência remota vai no payload.
    #[serde(skip)]
    pub content: Bytes,
}

impl FileAttachment {
    pub fn is_pending(&self) -> bool {
        self.remote_reference.is_none()
    }
}

/// Um arquivo recebido do cliente, ainda não validado.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    pub content_type: String,
    pub content: Bytes,
}

impl IncomingFile {
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

// ---
// 2. Bucket de anexos de uma categoria
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAttachments {
    #[schema(example = "Identity Documents")]
    pub category: String,
    pub files: Vec<FileAttachment>,
}

// ---
// 3. Valores dos campos, na ordem do catálogo do tipo de entidade
// ---
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues(Vec<(String, String)>);

impl FieldValues {
    /// Todos os campos do tipo de entidade, em branco.
    pub fn blank(entity_type: EntityType) -> Self {
        Self(
            entity_type
                .fields()
                .iter()
                .map(|field| (field.to_string(), String::new()))
                .collect(),
        )
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.iter().find(|(name, _)| name == field).map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Altera um campo existente sem mexer na ordem. Campo desconhecido: `false`.
    pub fn set(&mut self, field: &str, value: String) -> bool {
        match self.0.iter_mut().find(|(name, _)| name == field) {
            Some((_, current)) => {
                *current = value;
                true
            }
            None => false,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Objeto JSON com as chaves na ordem do catálogo
impl Serialize for FieldValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, value)| (name, value)))
    }
}

// ---
// 4. Pessoa (acionista ou diretor)
// ---
// `role` e `entity_type` não mudam depois da criação; os campos e as
// categorias são os do tipo de entidade.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub id: Uuid,
    pub role: PersonRole,
    pub entity_type: EntityType,
    #[schema(value_type = Object)]
    pub fields: FieldValues,
    pub attachments: Vec<CategoryAttachments>,
    pub created_at: DateTime<Utc>,
}

impl PersonRecord {
    pub fn category(&self, name: &str) -> Option<&CategoryAttachments> {
        self.attachments.iter().find(|c| c.category == name)
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut CategoryAttachments> {
        self.attachments.iter_mut().find(|c| c.category == name)
    }

    pub fn pending_count(&self) -> usize {
        self.attachments
            .iter()
            .flat_map(|c| c.files.iter())
            .filter(|f| f.is_pending())
            .count()
    }
}

// Resposta da listagem: a numeração é calculada, nunca armazenada
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonView {
    #[schema(example = 1)]
    pub display_number: usize,
    #[serde(flatten)]
    pub person: PersonRecord,
}

// --- Payloads de entrada ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonPayload {
    // Strings vazias modelam o botão "Adicionar" desabilitado
    #[serde(default)]
    #[schema(example = "Shareholder")]
    pub role: String,
    #[serde(default)]
    #[schema(example = "Individual")]
    pub entity_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePersonPayload {
    pub fields: BTreeMap<String, String>,
}
