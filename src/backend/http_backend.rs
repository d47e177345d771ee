// src/backend/http_backend.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::{
    backend::KycBackend,
    common::error::AppError,
    models::{
        application::CustomerDetailsPayload,
        auth::RemoteAuthAnswer,
        person::IncomingFile,
        submission::SubmissionPayload,
    },
};

/// URLs base de cada API do backend (podem ser grupos diferentes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEndpoints {
    pub auth_api: String,
    pub application_api: String,
    pub customer_api: String,
    pub documents_api: String,
}

impl BackendEndpoints {
    /// Todas as APIs no mesmo endereço base.
    pub fn single(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            auth_api: base.clone(),
            application_api: base.clone(),
            customer_api: base.clone(),
            documents_api: base,
        }
    }

    fn url(base: &str, path: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), path)
    }
}

#[derive(Clone)]
pub struct HttpBackend {
    http: Client,
    endpoints: BackendEndpoints,
}

impl HttpBackend {
    pub fn new(endpoints: BackendEndpoints, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoints })
    }

    // Extrai a mensagem de erro do backend ({ "message": ... }) ou usa o padrão
    async fn failure(response: Response, fallback: &str) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string());

        tracing::warn!("Backend respondeu {}: {}", status, body.chars().take(200).collect::<String>());
        AppError::Backend(message)
    }

    fn network(err: reqwest::Error, what: &str) -> AppError {
        tracing::warn!("Erro de rede em {}: {}", what, err);
        AppError::Backend(format!("Network error during {}", what))
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: String,
        token: Option<&str>,
        body: &impl serde::Serialize,
        fallback: &str,
    ) -> Result<T, AppError> {
        let mut request = self.http.post(&url).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| Self::network(e, fallback))?;
        if !response.status().is_success() {
            return Err(Self::failure(response, fallback).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Backend(format!("{}: invalid response ({})", fallback, e)))
    }
}

#[async_trait]
impl KycBackend for HttpBackend {
    async fn signup(&self, email: &str, password: &str, user_type: &str) -> Result<RemoteAuthAnswer, AppError> {
        let url = BackendEndpoints::url(&self.endpoints.auth_api, "auth/signup");
        let body = json!({ "email": email, "password": password, "user_type": user_type });
        self.post_json(url, None, &body, "Signup failed").await
    }

    async fn login(&self, email: &str, password: &str) -> Result<RemoteAuthAnswer, AppError> {
        let url = BackendEndpoints::url(&self.endpoints.auth_api, "auth/login");
        let body = json!({ "email": email, "password": password });
        self.post_json(url, None, &body, "Login failed").await
    }

    async fn create_application(
        &self,
        token: &str,
        application_type: &str,
        company_name: &str,
    ) -> Result<String, AppError> {
        let url = BackendEndpoints::url(&self.endpoints.application_api, "application");
        let body = json!({ "application_type": application_type, "company_name": company_name });
        let created: Value = self
            .post_json(url, Some(token), &body, "Failed to create application")
            .await?;

        // O ID pode vir como número ou texto
        match created.get("id") {
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            _ => Err(AppError::Backend("Failed to create application: no id returned".to_string())),
        }
    }

    async fn save_customer_details(&self, token: &str, payload: &CustomerDetailsPayload) -> Result<(), AppError> {
        let url = BackendEndpoints::url(&self.endpoints.customer_api, "customer_details");
        let _: Value = self
            .post_json(url, Some(token), payload, "Failed to save customer details")
            .await?;
        Ok(())
    }

    async fn upload_file(&self, token: &str, file: &IncomingFile) -> Result<String, AppError> {
        let url = BackendEndpoints::url(&self.endpoints.documents_api, "things");

        let part = multipart::Part::bytes(file.content.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| AppError::Backend(format!("Upload failed: {}", e)))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Self::network(e, "upload"))?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Backend(format!("Upload failed: {}", text)));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("Upload failed: invalid response ({})", e)))?;

        // A URL do arquivo vem em image.url
        data.pointer("/image/url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::Backend("No file URL returned from API".to_string()))
    }

    async fn submit_documents(&self, token: &str, payload: &SubmissionPayload) -> Result<Option<String>, AppError> {
        let url = BackendEndpoints::url(&self.endpoints.documents_api, "stakeholders_info_docs");
        let result: Value = self
            .post_json(url, Some(token), payload, "Submission failed")
            .await?;

        Ok(result.get("message").and_then(Value::as_str).map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_base_is_shared_and_trailing_slash_trimmed() {
        let endpoints = BackendEndpoints::single("https://backend.example/api/");
        assert_eq!(endpoints.auth_api, "https://backend.example/api");
        assert_eq!(endpoints.documents_api, endpoints.customer_api);
        assert_eq!(
            BackendEndpoints::url(&endpoints.auth_api, "auth/login"),
            "https://backend.example/api/auth/login"
        );
    }
}
