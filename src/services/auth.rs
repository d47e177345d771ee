// src/services/auth.rs

use std::sync::Arc;

use crate::{
    backend::KycBackend,
    common::error::AppError,
    models::auth::{AuthResponse, RemoteAuthAnswer, UserType},
};

// Autenticação é delegada ao provedor remoto: aqui só interpretamos a resposta.
#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn KycBackend>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn KycBackend>) -> Self {
        Self { backend }
    }

    pub async fn signup(&self, email: &str, password: &str, user_type: UserType) -> Result<AuthResponse, AppError> {
        let answer = self.backend.signup(email, password, user_type.as_str()).await?;
        let response = into_auth_response(answer, user_type)?;

        tracing::info!("✅ Usuário registrado no provedor ({})", response.user_type.as_str());
        Ok(response)
    }

    /// O tipo de usuário vem do provedor; na falta dele, empresa.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let answer = self.backend.login(email, password).await?;
        into_auth_response(answer, UserType::default())
    }
}

fn into_auth_response(answer: RemoteAuthAnswer, fallback: UserType) -> Result<AuthResponse, AppError> {
    let token = answer
        .auth_token
        .filter(|t| !t.trim().is_empty())
        .ok_or(AppError::NoTokenReceived)?;

    let user_type = UserType::from_remote(answer.user_type.as_deref()).unwrap_or(fallback);

    Ok(AuthResponse {
        token,
        user_type,
        landing: user_type.landing(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::WizardStep;

    #[test]
    fn token_is_required() {
        let err = into_auth_response(RemoteAuthAnswer::default(), UserType::Company).unwrap_err();
        assert!(matches!(err, AppError::NoTokenReceived));

        let blank = RemoteAuthAnswer { auth_token: Some("  ".into()), user_type: None };
        assert!(into_auth_response(blank, UserType::Company).is_err());
    }

    #[test]
    fn management_users_land_on_the_management_page() {
        let answer = RemoteAuthAnswer {
            auth_token: Some("abc".into()),
            user_type: Some("management".into()),
        };
        let response = into_auth_response(answer, UserType::Company).unwrap();
        assert_eq!(response.token, "abc");
        assert_eq!(response.landing, WizardStep::McLanding);
    }

    #[test]
    fn missing_remote_user_type_uses_the_fallback() {
        let answer = RemoteAuthAnswer { auth_token: Some("abc".into()), user_type: None };
        let response = into_auth_response(answer, UserType::Management).unwrap();
        assert_eq!(response.user_type, UserType::Management);

        let answer = RemoteAuthAnswer { auth_token: Some("abc".into()), user_type: Some("other".into()) };
        assert_eq!(into_auth_response(answer, UserType::Management).unwrap().user_type, UserType::Company);
    }
}
