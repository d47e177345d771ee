// src/handlers/applications.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::BearerToken, i18n::Locale},
    models::{
        application::AccountOpeningForm,
        session::{CreateApplicationPayload, OnboardingSession, SelectCompanyTypePayload, StepDirection, UboDeclaration},
        submission::CommitResponse,
    },
};

// =============================================================================
//  ÁREA 1: APLICAÇÃO
// =============================================================================

// POST /api/applications
#[utoipa::path(
    post,
    path = "/api/applications",
    tag = "Applications",
    request_body = CreateApplicationPayload,
    responses(
        (status = 201, description = "Aplicação criada no backend e sessão aberta", body = OnboardingSession),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Token ausente"),
        (status = 502, description = "Falha no backend")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_application(
    State(app_state): State<AppState>,
    locale: Locale,
    token: BearerToken,
    Json(payload): Json<CreateApplicationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let session = app_state
        .onboarding_service
        .create_application(token.as_str(), payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(session)))
}

// GET /api/applications/{id}
#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    tag = "Applications",
    params(("id" = Uuid, Path, description = "ID da aplicação")),
    responses(
        (status = 200, description = "Estado atual do assistente", body = OnboardingSession),
        (status = 404, description = "Aplicação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_application(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let session = app_state
        .onboarding_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(session)))
}

// DELETE /api/applications/{id}
#[utoipa::path(
    delete,
    path = "/api/applications/{id}",
    tag = "Applications",
    params(("id" = Uuid, Path, description = "ID da aplicação")),
    responses(
        (status = 204, description = "Sessão descartada (ou já inexistente)")
    ),
    security(("api_jwt" = []))
)]
pub async fn discard_application(State(app_state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    app_state.onboarding_service.discard_application(id).await;
    StatusCode::NO_CONTENT
}

// =============================================================================
//  ÁREA 2: TELAS
// =============================================================================

// PUT /api/applications/{id}/company-type
#[utoipa::path(
    put,
    path = "/api/applications/{id}/company-type",
    tag = "Applications",
    request_body = SelectCompanyTypePayload,
    params(("id" = Uuid, Path, description = "ID da aplicação")),
    responses(
        (status = 200, description = "Tipo de empresa e checklist de documentos", body = OnboardingSession),
        (status = 400, description = "Tipo de empresa desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn select_company_type(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectCompanyTypePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let session = app_state
        .onboarding_service
        .select_company_type(id, &payload.company_type)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(session)))
}

// PUT /api/applications/{id}/ubo-declaration
#[utoipa::path(
    put,
    path = "/api/applications/{id}/ubo-declaration",
    tag = "Applications",
    request_body = UboDeclaration,
    params(("id" = Uuid, Path, description = "ID da aplicação")),
    responses(
        (status = 200, description = "Declaração de UBO gravada", body = OnboardingSession)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_ubo_declaration(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UboDeclaration>,
) -> Result<impl IntoResponse, ApiError> {
    let session = app_state
        .onboarding_service
        .update_ubo(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(session)))
}

// PUT /api/applications/{id}/account-opening
#[utoipa::path(
    put,
    path = "/api/applications/{id}/account-opening",
    tag = "Applications",
    request_body = AccountOpeningForm,
    params(("id" = Uuid, Path, description = "ID da aplicação")),
    responses(
        (status = 200, description = "Customer details gravados no backend", body = OnboardingSession),
        (status = 400, description = "Formulário inválido"),
        (status = 502, description = "Falha no backend")
    ),
    security(("api_jwt" = []))
)]
pub async fn save_account_opening(
    State(app_state): State<AppState>,
    locale: Locale,
    token: BearerToken,
    Path(id): Path<Uuid>,
    Json(form): Json<AccountOpeningForm>,
) -> Result<impl IntoResponse, ApiError> {
    let session = app_state
        .onboarding_service
        .save_account_opening(id, token.as_str(), form)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(session)))
}

// POST /api/applications/{id}/steps/{direction}
#[utoipa::path(
    post,
    path = "/api/applications/{id}/steps/{direction}",
    tag = "Applications",
    params(
        ("id" = Uuid, Path, description = "ID da aplicação"),
        ("direction" = StepDirection, Path, description = "next ou back")
    ),
    responses(
        (status = 200, description = "Nova tela atual", body = OnboardingSession),
        (status = 409, description = "Passo indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn navigate(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((id, direction)): Path<(Uuid, StepDirection)>,
) -> Result<impl IntoResponse, ApiError> {
    let session = app_state
        .onboarding_service
        .navigate(id, direction)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(session)))
}

// POST /api/applications/{id}/documents-ubo/commit
#[utoipa::path(
    post,
    path = "/api/applications/{id}/documents-ubo/commit",
    tag = "Applications",
    params(("id" = Uuid, Path, description = "ID da aplicação")),
    responses(
        (status = 200, description = "Arquivos enviados e documentos/UBO submetidos", body = CommitResponse),
        (status = 400, description = "Tipo de empresa ou confirmação ausente"),
        (status = 409, description = "Fora da tela de documentos/UBO"),
        (status = 502, description = "Upload ou submissão falhou")
    ),
    security(("api_jwt" = []))
)]
pub async fn commit_documents_ubo(
    State(app_state): State<AppState>,
    locale: Locale,
    token: BearerToken,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handle = app_state
        .onboarding_service
        .handle(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .submission_service
        .commit_documents_step(&handle, token.as_str())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(response)))
}
