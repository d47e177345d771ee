// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    backend::{BackendEndpoints, HttpBackend, KycBackend},
    common::i18n::I18nStore,
    db::SessionRepository,
    models::kyc::FileUploadSettings,
    services::{AttachmentService, AuthService, OnboardingService, RequirementsCatalog, SubmissionService},
};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_TTL_MINS: u64 = 120;
const SESSION_SWEEP_SECS: u64 = 60;

// Configuração lida do ambiente (.env incluído)
#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: String,
    pub endpoints: BackendEndpoints,
    pub http_timeout: Duration,
    pub upload: FileUploadSettings,
    /// Tempo sem mudança até a sessão ser descartada da memória
    pub session_ttl: Duration,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de qualquer fonte chave → valor.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base = var("KYC_BACKEND_URL").context("KYC_BACKEND_URL deve ser definida")?;
        let mut endpoints = BackendEndpoints::single(&base);
        if let Some(url) = var("KYC_AUTH_API") {
            endpoints.auth_api = url;
        }
        if let Some(url) = var("KYC_APPLICATION_API") {
            endpoints.application_api = url;
        }
        if let Some(url) = var("KYC_CUSTOMER_API") {
            endpoints.customer_api = url;
        }
        if let Some(url) = var("KYC_DOCUMENTS_API") {
            endpoints.documents_api = url;
        }

        let timeout_secs = match var("KYC_HTTP_TIMEOUT_SECS") {
            Some(v) => v.parse().context("KYC_HTTP_TIMEOUT_SECS deve ser um número")?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let ttl_mins = match var("KYC_SESSION_TTL_MINS") {
            Some(v) => v.parse().context("KYC_SESSION_TTL_MINS deve ser um número")?,
            None => DEFAULT_SESSION_TTL_MINS,
        };
        if ttl_mins == 0 {
            anyhow::bail!("KYC_SESSION_TTL_MINS deve ser maior que zero");
        }

        let mut upload = FileUploadSettings::default();
        if let Some(v) = var("KYC_MAX_FILE_SIZE_MB") {
            upload.max_file_size = v.parse().context("KYC_MAX_FILE_SIZE_MB deve ser um número")?;
        }
        if let Some(v) = var("KYC_MAX_FILES_PER_FIELD") {
            upload.max_files_per_field = v.parse().context("KYC_MAX_FILES_PER_FIELD deve ser um número")?;
        }
        if let Some(v) = var("KYC_ALLOWED_FORMATS") {
            upload.allowed_formats = v
                .split(',')
                .map(|f| f.trim().to_lowercase())
                .filter(|f| !f.is_empty())
                .collect();
        }
        if upload.max_files_per_field == 0 || upload.allowed_formats.is_empty() {
            anyhow::bail!("Configuração de upload inválida: {:?}", upload);
        }

        Ok(Self {
            addr: var("APP_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            endpoints,
            http_timeout: Duration::from_secs(timeout_secs),
            upload,
            session_ttl: Duration::from_secs(ttl_mins.saturating_mul(60)),
        })
    }

    /// Limite do corpo das requisições multipart: um lote cheio mais folga
    /// para os cabeçalhos das partes.
    pub fn body_limit(&self) -> usize {
        let batch = self.upload.max_file_size_bytes() as usize * self.upload.max_files_per_field;
        batch + 1024 * 1024
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(SESSION_SWEEP_SECS)
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub i18n_store: Arc<I18nStore>,
    pub catalog: Arc<RequirementsCatalog>,
    pub sessions: SessionRepository,
    pub settings: Settings,

    pub auth_service: AuthService,
    pub onboarding_service: OnboardingService,
    pub submission_service: SubmissionService,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Settings::from_env()?;
        let backend = HttpBackend::new(settings.endpoints.clone(), settings.http_timeout)?;

        tracing::info!("✅ Backend remoto configurado em {}", settings.endpoints.application_api);
        Self::from_parts(Arc::new(backend), settings)
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_parts(backend: Arc<dyn KycBackend>, settings: Settings) -> anyhow::Result<Self> {
        let i18n_store = Arc::new(I18nStore::load()?);
        let catalog = Arc::new(RequirementsCatalog::new(settings.upload.clone()));
        let sessions = SessionRepository::new();
        let attachments = AttachmentService::new(settings.upload.clone());

        let auth_service = AuthService::new(backend.clone());
        let onboarding_service =
            OnboardingService::new(backend.clone(), sessions.clone(), catalog.clone(), attachments.clone());
        let submission_service = SubmissionService::new(backend, attachments);

        Ok(Self {
            i18n_store,
            catalog,
            sessions,
            settings,
            auth_service,
            onboarding_service,
            submission_service,
        })
    }
}
