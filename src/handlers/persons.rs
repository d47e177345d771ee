// src/handlers/persons.rs

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
    middleware::i18n::Locale,
    models::person::{CreatePersonPayload, PersonView, UpdatePersonPayload},
};

// POST /api/applications/{id}/persons
#[utoipa::path(
    post,
    path = "/api/applications/{id}/persons",
    tag = "Persons",
    request_body = CreatePersonPayload,
    params(("id" = Uuid, Path, description = "ID da aplicação")),
    responses(
        (status = 201, description = "Pessoa criada com os campos do tipo de entidade", body = PersonView),
        (status = 400, description = "Seleção incompleta ou fora do catálogo")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_person(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreatePersonPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let person = app_state
        .onboarding_service
        .add_person(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(person)))
}

// GET /api/applications/{id}/persons
#[utoipa::path(
    get,
    path = "/api/applications/{id}/persons",
    tag = "Persons",
    params(("id" = Uuid, Path, description = "ID da aplicação")),
    responses(
        (status = 200, description = "Pessoas na ordem de inclusão, numeradas", body = Vec<PersonView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_persons(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let persons = app_state
        .onboarding_service
        .list_persons(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(persons)))
}

// PATCH /api/applications/{id}/persons/{person_id}
#[utoipa::path(
    patch,
    path = "/api/applications/{id}/persons/{person_id}",
    tag = "Persons",
    request_body = UpdatePersonPayload,
    params(
        ("id" = Uuid, Path, description = "ID da aplicação"),
        ("person_id" = Uuid, Path, description = "ID da pessoa")
    ),
    responses(
        (status = 200, description = "Campos atualizados", body = PersonView),
        (status = 400, description = "Campo não pertence ao tipo de entidade"),
        (status = 404, description = "Pessoa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_person(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((id, person_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdatePersonPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let person = app_state
        .onboarding_service
        .update_person(id, person_id, payload.fields)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(person)))
}

// DELETE /api/applications/{id}/persons/{person_id}
#[utoipa::path(
    delete,
    path = "/api/applications/{id}/persons/{person_id}",
    tag = "Persons",
    params(
        ("id" = Uuid, Path, description = "ID da aplicação"),
        ("person_id" = Uuid, Path, description = "ID da pessoa")
    ),
    responses(
        (status = 204, description = "Pessoa removida (ou já inexistente)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_person(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((id, person_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .onboarding_service
        .remove_person(id, person_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
