// src/lib.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod backend;
pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{
    config::AppState,
    docs::ApiDoc,
    middleware::auth::{application_owner_guard, auth_guard},
};

/// Monta o router completo (rotas públicas, protegidas e documentação).
pub fn build_router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login));

    // Catálogo de requisitos (público, somente leitura)
    let catalog_routes = Router::new()
        .route("/company-types", get(handlers::catalog::list_company_types))
        .route("/company-types/{name}", get(handlers::catalog::get_company_type))
        .route("/entity-types", get(handlers::catalog::list_entity_types))
        .route("/entity-types/{name}", get(handlers::catalog::get_entity_type))
        .route("/options", get(handlers::catalog::get_options));

    // Rotas de uma aplicação: só o token que a criou tem acesso
    let owned_routes = Router::new()
        .route(
            "/{id}",
            get(handlers::applications::get_application).delete(handlers::applications::discard_application),
        )
        .route("/{id}/company-type", put(handlers::applications::select_company_type))
        .route("/{id}/ubo-declaration", put(handlers::applications::update_ubo_declaration))
        .route("/{id}/account-opening", put(handlers::applications::save_account_opening))
        .route("/{id}/steps/{direction}", post(handlers::applications::navigate))
        .route("/{id}/documents-ubo/commit", post(handlers::applications::commit_documents_ubo))
        .route(
            "/{id}/persons",
            post(handlers::persons::create_person).get(handlers::persons::list_persons),
        )
        .route(
            "/{id}/persons/{person_id}",
            patch(handlers::persons::update_person).delete(handlers::persons::delete_person),
        )
        .route(
            "/{id}/persons/{person_id}/documents/{category}",
            post(handlers::documents::upload_documents),
        )
        .route(
            "/{id}/persons/{person_id}/documents/{category}/{file_id}",
            delete(handlers::documents::delete_document),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            application_owner_guard,
        ));

    // O assistente: tudo exige o token do provedor
    let application_routes = Router::new()
        .route("/", post(handlers::applications::create_application))
        .merge(owned_routes)
        // O lote é validado arquivo a arquivo; o limite só corta corpos absurdos
        .layer(DefaultBodyLimit::max(app_state.settings.body_limit()))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/catalog", catalog_routes)
        .nest("/api/applications", application_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
