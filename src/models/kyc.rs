// src/models/kyc.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---
// 1. Papel da pessoa dentro da empresa
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PersonRole {
    Shareholder,
    Director,
}

impl PersonRole {
    pub const ALL: [PersonRole; 2] = [PersonRole::Shareholder, PersonRole::Director];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonRole::Shareholder => "Shareholder",
            PersonRole::Director => "Director",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == name)
    }
}

// ---
// 2. Tipo de entidade KYC (Individual / Corporate / Trust)
// ---
// O conjunto de campos e de categorias de documentos é fixo por variante.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum EntityType {
    Individual,
    Corporate,
    Trust,
}

/// Categoria de documento na forma estática (tabela embutida no binário).
#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

const INDIVIDUAL_FIELDS: &[&str] = &[
    "firstName",
    "lastName",
    "dateOfBirth",
    "nationality",
    "residingCountry",
    "proofOfIdentity",
    "documentId",
    "mobileNumber",
    "email",
];

const CORPORATE_FIELDS: &[&str] = &[
    "entityName",
    "registrationNumber",
    "countryOfRegistration",
    "dateOfRegistration",
    "registeredAddress",
    "contactEmail",
    "contactPhone",
];

const TRUST_FIELDS: &[&str] = &[
    "trustName",
    "dateOfIncorporation",
    "countryOfIncorporation",
    "trusteeDetails",
    "settlorDetails",
    "protectorDetails",
    "beneficiaryDetails",
];

const INDIVIDUAL_CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        name: "Identity Documents",
        description: "Valid government-issued identification documents",
        required: true,
    },
    CategorySpec {
        name: "Address Proof Documents",
        description: "Proof of residential address (less than 3 months old)",
        required: true,
    },
];

const CORPORATE_CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        name: "Incorporation Documents",
        description: "Certificate of Incorporation or E-Certificate of Incorporation, Certificate of change of name (if applicable)",
        required: true,
    },
    CategorySpec {
        name: "Company Address Proof",
        description: "Proof of Company's registered address",
        required: true,
    },
    CategorySpec {
        name: "Corporate Registers",
        description: "Register of Directors and Register of Shareholders",
        required: true,
    },
];

const TRUST_CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        name: "Trust Formation Documents",
        description: "Declaration of Trust or Trust deed",
        required: true,
    },
    CategorySpec {
        name: "Parties Identity Documents",
        description: "Identity documents and proof of address of the Settlor, Enforcer, Protector & Beneficiaries",
        required: true,
    },
    CategorySpec {
        name: "Trustee Corporate Documents",
        description: "Certificate of Incorporation of Trustee, Register of Directors, Register of Shareholders",
        required: true,
    },
    CategorySpec {
        name: "Trustee Address Proof",
        description: "Proof of Registered Address of the Trustee",
        required: true,
    },
];

impl EntityType {
    pub const ALL: [EntityType; 3] = [EntityType::Individual, EntityType::Corporate, EntityType::Trust];

    /// Chave usada no catálogo e no payload enviado ao backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Individual => "Individual",
            EntityType::Corporate => "Corporate",
            EntityType::Trust => "Trust",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|entity| entity.as_str() == name)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EntityType::Individual => "Individual",
            EntityType::Corporate => "Corporate Entity",
            EntityType::Trust => "Trust Entity",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EntityType::Individual => "Natural person as director or shareholder",
            EntityType::Corporate => "Corporate entity as director or shareholder",
            EntityType::Trust => "Trust entity as director or shareholder",
        }
    }

    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            EntityType::Individual => INDIVIDUAL_FIELDS,
            EntityType::Corporate => CORPORATE_FIELDS,
            EntityType::Trust => TRUST_FIELDS,
        }
    }

    pub fn document_categories(&self) -> &'static [CategorySpec] {
        match self {
            EntityType::Individual => INDIVIDUAL_CATEGORIES,
            EntityType::Corporate => CORPORATE_CATEGORIES,
            EntityType::Trust => TRUST_CATEGORIES,
        }
    }

    /// Lista "legada" de documentos exigidos (texto livre, sem agrupamento).
    pub fn documents(&self) -> &'static [&'static str] {
        match self {
            EntityType::Individual => &[
                "Identity Documents (Passport/NIC)",
                "Proof of Address (Less than 3 months)",
            ],
            EntityType::Corporate => &[
                "Certificate of Incorporation or E-Certificate of Incorporation",
                "Certificate of change of name (if applicable)",
                "Proof of Company's registered address",
                "Register of Directors",
                "Register of Shareholders",
            ],
            EntityType::Trust => &[
                "Declaration of Trust or Trust deed",
                "Identity documents and proof of address of the Settlor, Enforcer, Protector & Beneficiaries",
                "Certificate of Incorporation of Trustee",
                "Register of Directors of the Trustee",
                "Register of Shareholders of the Trustee",
                "Proof of Registered Address of the Trustee",
            ],
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields().contains(&field)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.document_categories().iter().any(|c| c.name == category)
    }
}

// ---
// 3. Estruturas do catálogo (como expostas pela API)
// ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyTypeRequirement {
    #[schema(example = "Trust")]
    pub name: String,
    pub documents: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCategory {
    #[schema(example = "Identity Documents")]
    pub name: String,
    pub description: String,
    pub required: bool,
}

impl From<&CategorySpec> for DocumentCategory {
    fn from(spec: &CategorySpec) -> Self {
        Self {
            name: spec.name.to_string(),
            description: spec.description.to_string(),
            required: spec.required,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityTypeRequirement {
    pub entity_type: EntityType,
    #[schema(example = "Corporate Entity")]
    pub name: String,
    pub description: String,
    pub fields: Vec<String>,
    pub documents: Vec<String>,
    pub document_categories: Vec<DocumentCategory>,
}

impl From<EntityType> for EntityTypeRequirement {
    fn from(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            name: entity_type.display_name().to_string(),
            description: entity_type.description().to_string(),
            fields: entity_type.fields().iter().map(|f| f.to_string()).collect(),
            documents: entity_type.documents().iter().map(|d| d.to_string()).collect(),
            document_categories: entity_type
                .document_categories()
                .iter()
                .map(DocumentCategory::from)
                .collect(),
        }
    }
}

// ---
// 4. Limites de upload
// ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadSettings {
    /// Em MB
    #[schema(example = 10)]
    pub max_file_size: u64,
    pub allowed_formats: Vec<String>,
    #[schema(example = 5)]
    pub max_files_per_field: usize,
}

impl FileUploadSettings {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size * 1024 * 1024
    }

    pub fn accepts(&self, content_type: &str) -> bool {
        self.allowed_formats.iter().any(|f| f == content_type)
    }
}

impl Default for FileUploadSettings {
    fn default() -> Self {
        Self {
            max_file_size: 10,
            allowed_formats: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/jpg".to_string(),
                "application/pdf".to_string(),
            ],
            max_files_per_field: 5,
        }
    }
}

// Resposta agregada de GET /api/catalog/options
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOptions {
    pub countries: Vec<String>,
    pub proof_of_identity_options: Vec<String>,
    pub roles: Vec<PersonRole>,
    pub file_upload_settings: FileUploadSettings,
}
