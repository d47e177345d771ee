// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::session::WizardStep;

// Tipo de usuário informado no cadastro: define a landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Company,
    Management,
}

impl UserType {
    pub fn landing(&self) -> WizardStep {
        match self {
            UserType::Company => WizardStep::Landing,
            UserType::Management => WizardStep::McLanding,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Company => "company",
            UserType::Management => "management",
        }
    }

    // O provedor devolve texto livre; qualquer coisa diferente de "management" é empresa
    pub fn from_remote(value: Option<&str>) -> Option<Self> {
        value.map(|v| if v == "management" { UserType::Management } else { UserType::Company })
    }
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "cfo@tech.mu")]
    pub email: String,
    #[validate(length(min = 6, message = "min_length_6"))]
    pub password: String,
    #[serde(default)]
    pub user_type: UserType,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "cfo@tech.mu")]
    pub email: String,
    #[validate(length(min = 6, message = "min_length_6"))]
    pub password: String,
}

// Resposta de autenticação com o token do provedor
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_type: UserType,
    pub landing: WizardStep,
}

/// O que o provedor de autenticação devolve em signup/login.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAuthAnswer {
    pub auth_token: Option<String>,
    pub user_type: Option<String>,
}
