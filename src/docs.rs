// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::signup,
        handlers::auth::login,

        // --- Catalog ---
        handlers::catalog::list_company_types,
        handlers::catalog::get_company_type,
        handlers::catalog::list_entity_types,
        handlers::catalog::get_entity_type,
        handlers::catalog::get_options,

        // --- Applications ---
        handlers::applications::create_application,
        handlers::applications::get_application,
        handlers::applications::discard_application,
        handlers::applications::select_company_type,
        handlers::applications::update_ubo_declaration,
        handlers::applications::save_account_opening,
        handlers::applications::navigate,
        handlers::applications::commit_documents_ubo,

        // --- Persons ---
        handlers::persons::create_person,
        handlers::persons::list_persons,
        handlers::persons::update_person,
        handlers::persons::delete_person,

        // --- Documents ---
        handlers::documents::upload_documents,
        handlers::documents::delete_document,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserType,
            models::auth::SignupPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Catalog ---
            models::kyc::PersonRole,
            models::kyc::EntityType,
            models::kyc::CompanyTypeRequirement,
            models::kyc::DocumentCategory,
            models::kyc::EntityTypeRequirement,
            models::kyc::FileUploadSettings,
            models::kyc::CatalogOptions,

            // --- Applications ---
            models::session::WizardStep,
            models::session::ApplicationType,
            models::session::UboPerson,
            models::session::UboDeclaration,
            models::session::OnboardingSession,
            models::session::CreateApplicationPayload,
            models::session::SelectCompanyTypePayload,
            models::session::StepDirection,
            models::application::AccountOpeningForm,
            models::submission::CommitResponse,

            // --- Persons / Documents ---
            models::person::FileAttachment,
            models::person::CategoryAttachments,
            models::person::PersonRecord,
            models::person::PersonView,
            models::person::CreatePersonPayload,
            models::person::UpdatePersonPayload,
            handlers::documents::UploadDocumentsForm,
        )
    ),
    tags(
        (name = "Auth", description = "Cadastro e login no provedor de autenticação"),
        (name = "Catalog", description = "Catálogo de requisitos KYC"),
        (name = "Applications", description = "Assistente de onboarding: telas e commits"),
        (name = "Persons", description = "Acionistas e diretores"),
        (name = "Documents", description = "Anexos por pessoa e categoria")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
