// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use kyc_onboarding::{
    backend::KycBackend,
    build_router,
    common::error::AppError,
    config::{AppState, Settings},
    models::{
        application::CustomerDetailsPayload,
        auth::RemoteAuthAnswer,
        person::IncomingFile,
        submission::SubmissionPayload,
    },
};

pub const TOKEN: &str = "test-token";
pub const BOUNDARY: &str = "kyc-boundary";

/// Backend em memória. Uploads de arquivos cujo nome começa com "fail" falham.
#[derive(Default)]
pub struct FakeBackend {
    pub uploads: Mutex<Vec<String>>,
    pub customer_details: Mutex<Vec<CustomerDetailsPayload>>,
    pub submissions: Mutex<Vec<SubmissionPayload>>,
}

#[async_trait]
impl KycBackend for FakeBackend {
    async fn signup(&self, _email: &str, _password: &str, user_type: &str) -> Result<RemoteAuthAnswer, AppError> {
        Ok(RemoteAuthAnswer {
            auth_token: Some("signup-token".into()),
            user_type: Some(user_type.to_string()),
        })
    }

    async fn login(&self, email: &str, _password: &str) -> Result<RemoteAuthAnswer, AppError> {
        if email.starts_with("tokenless") {
            return Ok(RemoteAuthAnswer::default());
        }
        let user_type = email.starts_with("mc").then(|| "management".to_string());
        Ok(RemoteAuthAnswer { auth_token: Some("login-token".into()), user_type })
    }

    async fn create_application(&self, _token: &str, _application_type: &str, _company_name: &str) -> Result<String, AppError> {
        Ok("1234".into())
    }

    async fn save_customer_details(&self, _token: &str, payload: &CustomerDetailsPayload) -> Result<(), AppError> {
        self.customer_details.lock().unwrap().push(payload.clone());
        Ok(())
    }

    async fn upload_file(&self, _token: &str, file: &IncomingFile) -> Result<String, AppError> {
        if file.name.starts_with("fail") {
            return Err(AppError::Backend("Upload failed: storage offline".into()));
        }
        self.uploads.lock().unwrap().push(file.name.clone());
        Ok(format!("https://files.test/{}", file.name))
    }

    async fn submit_documents(&self, _token: &str, payload: &SubmissionPayload) -> Result<Option<String>, AppError> {
        self.submissions.lock().unwrap().push(payload.clone());
        Ok(Some("KYC documents received".into()))
    }
}

pub fn test_app() -> (Router, Arc<FakeBackend>) {
    test_app_with(&[])
}

/// App de teste com variáveis de ambiente extras (limites de upload etc.).
pub fn test_app_with(vars: &[(&str, &str)]) -> (Router, Arc<FakeBackend>) {
    let backend = Arc::new(FakeBackend::default());
    let settings = Settings::from_lookup(|key| {
        if key == "KYC_BACKEND_URL" {
            return Some("http://backend.test".to_string());
        }
        vars.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    })
    .expect("configuração de teste");
    let state = AppState::from_parts(backend.clone(), settings).expect("estado de teste");
    (build_router(state), backend)
}

pub fn json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    json_request_as(TOKEN, method, uri, body)
}

pub fn json_request_as(token: &str, method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Corpo multipart com uma parte "files" por arquivo, entregue em pedaços
/// de 64KB como chegaria pela rede.
pub fn multipart_request(uri: &str, files: &[(String, &str, Vec<u8>)]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, content_type, content) in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\n", name).as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let chunks: Vec<Result<Vec<u8>, std::io::Error>> = body.chunks(64 * 1024).map(|c| Ok(c.to_vec())).collect();

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from_stream(stream::iter(chunks)))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}
