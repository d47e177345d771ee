// src/handlers/catalog.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::kyc::{CatalogOptions, CompanyTypeRequirement, EntityTypeRequirement},
};

// Catálogo público: somente leitura, sem token.

// GET /api/catalog/company-types
#[utoipa::path(
    get,
    path = "/api/catalog/company-types",
    tag = "Catalog",
    responses(
        (status = 200, description = "Tipos de empresa e documentos exigidos", body = Vec<CompanyTypeRequirement>)
    )
)]
pub async fn list_company_types(State(app_state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(app_state.catalog.company_types().to_vec()))
}

// GET /api/catalog/company-types/{name}
#[utoipa::path(
    get,
    path = "/api/catalog/company-types/{name}",
    tag = "Catalog",
    params(("name" = String, Path, description = "Nome do tipo de empresa", example = "Trust")),
    responses(
        (status = 200, description = "Tipo de empresa", body = CompanyTypeRequirement),
        (status = 404, description = "Tipo de empresa desconhecido")
    )
)]
pub async fn get_company_type(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let company = app_state
        .catalog
        .company_type(&name)
        .cloned()
        .ok_or_else(|| AppError::CatalogEntryNotFound(name).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(company)))
}

// GET /api/catalog/entity-types
#[utoipa::path(
    get,
    path = "/api/catalog/entity-types",
    tag = "Catalog",
    responses(
        (status = 200, description = "Tipos de entidade com campos e categorias", body = Vec<EntityTypeRequirement>)
    )
)]
pub async fn list_entity_types(State(app_state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(app_state.catalog.entity_types()))
}

// GET /api/catalog/entity-types/{name}
#[utoipa::path(
    get,
    path = "/api/catalog/entity-types/{name}",
    tag = "Catalog",
    params(("name" = String, Path, description = "Individual, Corporate ou Trust", example = "Individual")),
    responses(
        (status = 200, description = "Configuração do tipo de entidade", body = EntityTypeRequirement),
        (status = 404, description = "Tipo de entidade desconhecido")
    )
)]
pub async fn get_entity_type(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let config = app_state
        .catalog
        .entity_type_config(&name)
        .ok_or_else(|| AppError::CatalogEntryNotFound(name).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(config)))
}

// GET /api/catalog/options
#[utoipa::path(
    get,
    path = "/api/catalog/options",
    tag = "Catalog",
    responses(
        (status = 200, description = "Países, documentos de identidade e limites de upload", body = CatalogOptions)
    )
)]
pub async fn get_options(State(app_state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(app_state.catalog.options()))
}
