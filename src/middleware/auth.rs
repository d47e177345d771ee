// src/middleware/auth.rs

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Path, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

/// Token emitido pelo provedor de autenticação, repassado ao backend
/// em cada upload e submissão.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // O guard já validou e guardou o token nos "extensions"
        if let Some(token) = parts.extensions.get::<BearerToken>() {
            return Ok(token.clone());
        }

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::MissingToken)?;

        let token = bearer.token().trim();
        if token.is_empty() {
            return Err(AppError::MissingToken);
        }

        Ok(BearerToken(token.to_string()))
    }
}

// O middleware em si: sem token, a chamada para aqui (401), a sessão continua viva.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    token: Result<BearerToken, AppError>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = token.map_err(|e| {
        tracing::debug!("Requisição sem token para {}", request.uri().path());
        e.to_api_error(&locale, &app_state.i18n_store)
    })?;

    request.extensions_mut().insert(token);
    Ok(next.run(request).await)
}

// Cada aplicação só é visível para o token que a criou. Para os demais ela
// simplesmente não existe (404).
pub async fn application_owner_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    token: Result<BearerToken, AppError>,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = token.map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // ID malformado ou aplicação inexistente: o handler responde
    let Some(id) = params.get("id").and_then(|v| Uuid::parse_str(v).ok()) else {
        return Ok(next.run(request).await);
    };
    if let Ok(handle) = app_state.sessions.find(id).await {
        let owned = handle.lock().await.is_owned_by(token.as_str());
        if !owned {
            tracing::warn!("Acesso negado à aplicação {} (token de outro usuário)", id);
            return Err(AppError::ApplicationNotFound.to_api_error(&locale, &app_state.i18n_store));
        }
    }

    Ok(next.run(request).await)
}
