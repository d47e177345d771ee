// src/services/catalog.rs

use crate::models::kyc::{
    CatalogOptions, CompanyTypeRequirement, DocumentCategory, EntityType, EntityTypeRequirement,
    FileUploadSettings, PersonRole,
};

// (nome, descrição, documentos exigidos) por tipo de empresa
const COMPANY_TYPES: &[(&str, &str, &[&str])] = &[
    (
        "GBC Authorized Foreign",
        "Global Business Company with foreign authorization",
        &[
            "Certificate of Incorporation",
            "FSC License",
            "Register of Directors",
            "Register of Shareholders",
        ],
    ),
    (
        "Trust",
        "Trust entity requiring specific documentation",
        &["Trust Deed", "Settlor ID", "Trustee ID", "Beneficiary Register"],
    ),
    (
        "Association",
        "Association or non-profit organization",
        &[
            "Constitution Document",
            "Resolution to Open Account",
            "Certificate of Registration",
        ],
    ),
    (
        "Private Company",
        "Private limited company",
        &[
            "Certificate of Incorporation",
            "Memorandum of Association",
            "Articles of Association",
            "Register of Directors",
            "Register of Shareholders",
            "Board Resolution",
        ],
    ),
    (
        "Partnership",
        "Partnership business entity",
        &[
            "Partnership Agreement",
            "Certificate of Registration",
            "Partners Register",
            "Resolution to Open Account",
        ],
    ),
    (
        "Sole Proprietorship",
        "Individual business ownership",
        &[
            "Business Registration Certificate",
            "Trade License",
            "Owner ID Document",
        ],
    ),
];

const PROOF_OF_IDENTITY_OPTIONS: &[&str] = &["NIC", "Passport", "Driver License", "National ID Card", "Voter ID"];

const COUNTRIES: &[&str] = &[
    "Mauritius",
    "India",
    "United Kingdom",
    "United States",
    "Canada",
    "Australia",
    "South Africa",
    "France",
    "Germany",
    "Singapore",
    "Hong Kong",
    "UAE",
    "Switzerland",
    "Netherlands",
    "Belgium",
    "Luxembourg",
    "Ireland",
    "New Zealand",
    "Japan",
    "China",
    "Brazil",
    "Argentina",
    "Mexico",
    "Chile",
    "Colombia",
    "Peru",
    "Kenya",
    "Nigeria",
    "Ghana",
    "Egypt",
    "Morocco",
    "Tunisia",
    "Seychelles",
    "Madagascar",
    "Botswana",
    "Namibia",
    "Zambia",
    "Zimbabwe",
];

/// Catálogo de requisitos KYC. Montado uma vez na inicialização e somente
/// leitura depois disso.
///
/// As consultas por nome nunca falham: chave desconhecida devolve vazio.
/// Quem chama valida antes com `is_valid_*`.
#[derive(Debug, Clone)]
pub struct RequirementsCatalog {
    company_types: Vec<CompanyTypeRequirement>,
    upload_settings: FileUploadSettings,
}

impl RequirementsCatalog {
    pub fn new(upload_settings: FileUploadSettings) -> Self {
        let company_types = COMPANY_TYPES
            .iter()
            .map(|(name, description, documents)| CompanyTypeRequirement {
                name: name.to_string(),
                description: description.to_string(),
                documents: documents.iter().map(|d| d.to_string()).collect(),
            })
            .collect();

        Self { company_types, upload_settings }
    }

    // --- Tipos de empresa ---

    pub fn company_types(&self) -> &[CompanyTypeRequirement] {
        &self.company_types
    }

    pub fn company_type(&self, name: &str) -> Option<&CompanyTypeRequirement> {
        self.company_types.iter().find(|c| c.name == name)
    }

    pub fn is_valid_company_type(&self, name: &str) -> bool {
        self.company_type(name).is_some()
    }

    pub fn documents_for_company_type(&self, name: &str) -> Vec<String> {
        self.company_type(name).map(|c| c.documents.clone()).unwrap_or_default()
    }

    pub fn company_type_description(&self, name: &str) -> String {
        self.company_type(name).map(|c| c.description.clone()).unwrap_or_default()
    }

    // --- Tipos de entidade ---

    pub fn entity_types(&self) -> Vec<EntityTypeRequirement> {
        EntityType::ALL.into_iter().map(EntityTypeRequirement::from).collect()
    }

    pub fn entity_type_config(&self, name: &str) -> Option<EntityTypeRequirement> {
        EntityType::from_name(name).map(EntityTypeRequirement::from)
    }

    pub fn is_valid_entity_type(&self, name: &str) -> bool {
        EntityType::from_name(name).is_some()
    }

    pub fn fields_for_entity_type(&self, name: &str) -> &'static [&'static str] {
        EntityType::from_name(name).map(|e| e.fields()).unwrap_or(&[])
    }

    pub fn document_categories_for_entity_type(&self, name: &str) -> Vec<DocumentCategory> {
        EntityType::from_name(name)
            .map(|e| e.document_categories().iter().map(DocumentCategory::from).collect())
            .unwrap_or_default()
    }

    pub fn documents_for_entity_type(&self, name: &str) -> &'static [&'static str] {
        EntityType::from_name(name).map(|e| e.documents()).unwrap_or(&[])
    }

    pub fn entity_type_description(&self, name: &str) -> &'static str {
        EntityType::from_name(name).map(|e| e.description()).unwrap_or("")
    }

    // --- Listas auxiliares ---

    pub fn proof_of_identity_options(&self) -> &'static [&'static str] {
        PROOF_OF_IDENTITY_OPTIONS
    }

    pub fn is_valid_proof_of_identity(&self, value: &str) -> bool {
        PROOF_OF_IDENTITY_OPTIONS.contains(&value)
    }

    pub fn countries(&self) -> &'static [&'static str] {
        COUNTRIES
    }

    pub fn is_valid_country(&self, country: &str) -> bool {
        COUNTRIES.contains(&country)
    }

    pub fn file_upload_settings(&self) -> &FileUploadSettings {
        &self.upload_settings
    }

    pub fn options(&self) -> CatalogOptions {
        CatalogOptions {
            countries: COUNTRIES.iter().map(|c| c.to_string()).collect(),
            proof_of_identity_options: PROOF_OF_IDENTITY_OPTIONS.iter().map(|p| p.to_string()).collect(),
            roles: PersonRole::ALL.to_vec(),
            file_upload_settings: self.file_upload_settings().clone(),
        }
    }
}

impl Default for RequirementsCatalog {
    fn default() -> Self {
        Self::new(FileUploadSettings::default())
    }
}
