// src/models/session.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::person::PersonRecord;

// ---
// 1. Telas do assistente
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    Auth,
    Landing,
    McLanding,
    AccountOpening,
    BusinessProfile,
    DocumentsUbo,
    InternetBanking,
    ApprovalMatrix,
    EntityTaxResidency,
}

impl WizardStep {
    /// Próxima tela; `None` na última.
    pub fn next(&self, application_type: ApplicationType) -> Option<WizardStep> {
        match self {
            WizardStep::Auth => Some(application_type.landing()),
            WizardStep::Landing | WizardStep::McLanding => Some(WizardStep::AccountOpening),
            WizardStep::AccountOpening => Some(WizardStep::BusinessProfile),
            WizardStep::BusinessProfile => Some(WizardStep::DocumentsUbo),
            WizardStep::DocumentsUbo => Some(WizardStep::InternetBanking),
            WizardStep::InternetBanking => Some(WizardStep::ApprovalMatrix),
            WizardStep::ApprovalMatrix => Some(WizardStep::EntityTaxResidency),
            WizardStep::EntityTaxResidency => None,
        }
    }

    pub fn previous(&self, application_type: ApplicationType) -> Option<WizardStep> {
        match self {
            WizardStep::Auth => None,
            WizardStep::Landing | WizardStep::McLanding => Some(WizardStep::Auth),
            WizardStep::AccountOpening => Some(application_type.landing()),
            WizardStep::BusinessProfile => Some(WizardStep::AccountOpening),
            WizardStep::DocumentsUbo => Some(WizardStep::BusinessProfile),
            WizardStep::InternetBanking => Some(WizardStep::DocumentsUbo),
            WizardStep::ApprovalMatrix => Some(WizardStep::InternetBanking),
            WizardStep::EntityTaxResidency => Some(WizardStep::ApprovalMatrix),
        }
    }

    // Estas telas só avançam pelo commit (chamada ao backend)
    pub fn requires_commit(&self) -> bool {
        matches!(self, WizardStep::AccountOpening | WizardStep::DocumentsUbo)
    }
}

// ---
// 2. Tipo de aplicação (fluxo padrão ou empresa de gestão)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationType {
    Corporate,
    Management,
}

impl ApplicationType {
    pub fn landing(&self) -> WizardStep {
        match self {
            ApplicationType::Corporate => WizardStep::Landing,
            ApplicationType::Management => WizardStep::McLanding,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationType::Corporate => "corporate",
            ApplicationType::Management => "management",
        }
    }
}

// ---
// 3. Declaração de UBO
// ---
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UboPerson {
    pub full_name: String,
    pub nationality: String,
    pub residential_address: String,
    pub nic_passport: String,
    #[schema(example = "25%")]
    pub controlling_ownership_interest: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UboDeclaration {
    pub beneficial_owner: String,
    pub ultimate_beneficial_owner: String,
    pub source_of_funds: String,
    pub shareholders_source_of_wealth: String,
    pub shareholders_nationality_country: String,
    pub confirmation_checked: bool,
    pub ubo_persons: Vec<UboPerson>,
}

// ---
// 4. Estado de uma aplicação de onboarding
// ---
// Objeto explícito, dono de todo o estado das telas até o commit de cada passo.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSession {
    pub id: Uuid,
    /// ID devolvido pelo backend ao criar a aplicação
    pub remote_application_id: String,
    pub application_type: ApplicationType,
    pub company_name: String,
    pub step: WizardStep,
    pub company_type: Option<String>,
    pub company_documents: Vec<String>,
    pub ubo: UboDeclaration,
    pub persons: Vec<PersonRecord>,
    pub account_opening_saved: bool,
    pub documents_submitted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Hash do token que criou a aplicação; nunca o token em si
    #[serde(skip)]
    pub owner: String,
    // Um commit de documentos/UBO por vez
    #[serde(skip)]
    pub commit_in_progress: bool,
}

impl OnboardingSession {
    pub fn new(remote_application_id: String, application_type: ApplicationType, company_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            remote_application_id,
            application_type,
            company_name,
            // Quem cria a aplicação já saiu da landing page
            step: WizardStep::AccountOpening,
            company_type: None,
            company_documents: Vec::new(),
            ubo: UboDeclaration::default(),
            persons: Vec::new(),
            account_opening_saved: false,
            documents_submitted: false,
            created_at: now,
            updated_at: now,
            owner: String::new(),
            commit_in_progress: false,
        }
    }

    pub fn with_owner(mut self, token: &str) -> Self {
        self.owner = owner_key(token);
        self
    }

    pub fn is_owned_by(&self, token: &str) -> bool {
        !self.owner.is_empty() && self.owner == owner_key(token)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn owner_key(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

// --- Payloads de entrada ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationPayload {
    pub application_type: ApplicationType,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Tech Solutions Mauritius Ltd")]
    pub company_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectCompanyTypePayload {
    #[schema(example = "Private Company")]
    pub company_type: String,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StepDirection {
    Next,
    Back,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_route_follows_the_screen_order() {
        let mut step = WizardStep::Auth;
        let mut visited = vec![step];
        while let Some(next) = step.next(ApplicationType::Corporate) {
            visited.push(next);
            step = next;
        }
        assert_eq!(
            visited,
            vec![
                WizardStep::Auth,
                WizardStep::Landing,
                WizardStep::AccountOpening,
                WizardStep::BusinessProfile,
                WizardStep::DocumentsUbo,
                WizardStep::InternetBanking,
                WizardStep::ApprovalMatrix,
                WizardStep::EntityTaxResidency,
            ]
        );
    }

    #[test]
    fn management_flow_goes_through_mc_landing() {
        assert_eq!(WizardStep::Auth.next(ApplicationType::Management), Some(WizardStep::McLanding));
        assert_eq!(
            WizardStep::AccountOpening.previous(ApplicationType::Management),
            Some(WizardStep::McLanding)
        );
    }

    #[test]
    fn new_session_starts_on_account_opening_with_no_persons() {
        let session = OnboardingSession::new("42".into(), ApplicationType::Corporate, "Acme".into());
        assert_eq!(session.step, WizardStep::AccountOpening);
        assert!(session.persons.is_empty());
        assert!(session.company_type.is_none());
        assert!(!session.commit_in_progress);
    }

    #[test]
    fn ownership_is_checked_against_the_token_hash() {
        let session = OnboardingSession::new("42".into(), ApplicationType::Corporate, "Acme".into()).with_owner("tok-a");
        assert!(session.is_owned_by("tok-a"));
        assert!(!session.is_owned_by("tok-b"));
        assert_ne!(session.owner, "tok-a");

        let orphan = OnboardingSession::new("43".into(), ApplicationType::Corporate, "Acme".into());
        assert!(!orphan.is_owned_by(""));
    }
}
