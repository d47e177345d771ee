// src/services/onboarding_service.rs

use std::{collections::BTreeMap, sync::Arc};

use uuid::Uuid;
use validator::Validate;

use crate::{
    backend::KycBackend,
    common::error::AppError,
    db::{SessionHandle, SessionRepository},
    models::{
        application::{AccountOpeningForm, CustomerDetailsPayload},
        person::{CategoryAttachments, CreatePersonPayload, IncomingFile, PersonView},
        session::{CreateApplicationPayload, OnboardingSession, StepDirection, UboDeclaration, WizardStep},
    },
    services::{
        attachment_service::AttachmentService,
        catalog::RequirementsCatalog,
        person_service,
    },
};

/// Estado do assistente por aplicação: seleção do tipo de empresa, UBO,
/// pessoas, anexos e navegação entre as telas.
///
/// Toda mutação acontece com o Mutex da sessão travado; as respostas são
/// cópias do estado logo depois da mudança.
#[derive(Clone)]
pub struct OnboardingService {
    backend: Arc<dyn KycBackend>,
    sessions: SessionRepository,
    catalog: Arc<RequirementsCatalog>,
    attachments: AttachmentService,
}

impl OnboardingService {
    pub fn new(
        backend: Arc<dyn KycBackend>,
        sessions: SessionRepository,
        catalog: Arc<RequirementsCatalog>,
        attachments: AttachmentService,
    ) -> Self {
        Self { backend, sessions, catalog, attachments }
    }

    // =========================================================================
    //  APLICAÇÃO
    // =========================================================================

    pub async fn create_application(
        &self,
        token: &str,
        payload: CreateApplicationPayload,
    ) -> Result<OnboardingSession, AppError> {
        payload.validate()?;

        let company_name = payload.company_name.trim().to_string();
        let remote_id = self
            .backend
            .create_application(token, payload.application_type.as_str(), &company_name)
            .await?;

        let session = OnboardingSession::new(remote_id, payload.application_type, company_name).with_owner(token);
        let snapshot = session.clone();
        self.sessions.insert(session).await;

        tracing::info!(
            "✅ Aplicação {} criada (remota {}, {})",
            snapshot.id,
            snapshot.remote_application_id,
            snapshot.application_type.as_str()
        );
        Ok(snapshot)
    }

    pub async fn handle(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        self.sessions.find(id).await
    }

    /// Descarta a sessão e os anexos ainda em memória. Nada muda no backend.
    pub async fn discard_application(&self, id: Uuid) -> bool {
        let removed = self.sessions.remove(id).await;
        if removed {
            tracing::info!("Aplicação {} descartada", id);
        }
        removed
    }

    pub async fn get(&self, id: Uuid) -> Result<OnboardingSession, AppError> {
        let handle = self.sessions.find(id).await?;
        let session = handle.lock().await;
        Ok(session.clone())
    }

    /// Seleciona o tipo de empresa e monta a lista de documentos exigidos.
    /// Tipo desconhecido não altera nada.
    pub async fn select_company_type(&self, id: Uuid, company_type: &str) -> Result<OnboardingSession, AppError> {
        let company = self
            .catalog
            .company_type(company_type)
            .ok_or_else(|| AppError::UnknownCompanyType(company_type.to_string()))?;

        let handle = self.sessions.find(id).await?;
        let mut session = handle.lock().await;
        session.company_type = Some(company.name.clone());
        session.company_documents = company.documents.clone();
        session.touch();

        tracing::info!("Aplicação {}: tipo de empresa '{}'", id, company.name);
        Ok(session.clone())
    }

    pub async fn update_ubo(&self, id: Uuid, declaration: UboDeclaration) -> Result<OnboardingSession, AppError> {
        let handle = self.sessions.find(id).await?;
        let mut session = handle.lock().await;
        session.ubo = declaration;
        session.touch();
        Ok(session.clone())
    }

    /// Grava o formulário de abertura de conta no backend (customer details).
    /// Na tela de abertura de conta, avança para o perfil do negócio.
    pub async fn save_account_opening(
        &self,
        id: Uuid,
        token: &str,
        form: AccountOpeningForm,
    ) -> Result<OnboardingSession, AppError> {
        form.validate()?;

        let handle = self.sessions.find(id).await?;
        let remote_id = handle.lock().await.remote_application_id.clone();

        let payload = CustomerDetailsPayload::from_form(form, &remote_id);
        self.backend.save_customer_details(token, &payload).await?;

        let mut session = handle.lock().await;
        session.account_opening_saved = true;
        if session.step == WizardStep::AccountOpening {
            session.step = WizardStep::BusinessProfile;
        }
        session.touch();

        tracing::info!("✅ Customer details gravados para a aplicação {}", session.remote_application_id);
        Ok(session.clone())
    }

    /// Navegação entre telas. As telas com commit só avançam depois dele.
    pub async fn navigate(&self, id: Uuid, direction: StepDirection) -> Result<OnboardingSession, AppError> {
        let handle = self.sessions.find(id).await?;
        let mut session = handle.lock().await;
        let current = session.step;
        if session.commit_in_progress {
            return Err(AppError::CommitInProgress);
        }

        let target = match direction {
            StepDirection::Next => {
                if current.requires_commit() && !is_committed(&session, current) {
                    return Err(AppError::StepNotAvailable(format!("{:?}", current)));
                }
                current.next(session.application_type)
            }
            StepDirection::Back => current.previous(session.application_type),
        };

        let target = target.ok_or_else(|| AppError::StepNotAvailable(format!("{:?}", current)))?;
        session.step = target;
        session.touch();

        tracing::debug!("Aplicação {}: {:?} -> {:?}", id, current, target);
        Ok(session.clone())
    }

    // =========================================================================
    //  PESSOAS
    // =========================================================================

    pub async fn add_person(&self, id: Uuid, payload: CreatePersonPayload) -> Result<PersonView, AppError> {
        let (role, entity_type) = person_service::parse_selection(&payload.role, &payload.entity_type)?;

        let handle = self.sessions.find(id).await?;
        let mut session = handle.lock().await;
        let person = person_service::create_person(&mut session.persons, Some(role), Some(entity_type))
            .cloned()
            .ok_or(AppError::IncompleteSelection)?;
        session.touch();

        let display_number = person_service::display_number(&session.persons, person.id).unwrap_or(1);
        tracing::info!(
            "Aplicação {}: {} {} #{} adicionado ({})",
            id,
            role.as_str(),
            entity_type.as_str(),
            display_number,
            person.id
        );

        Ok(PersonView { display_number, person })
    }

    pub async fn list_persons(&self, id: Uuid) -> Result<Vec<PersonView>, AppError> {
        let handle = self.sessions.find(id).await?;
        let session = handle.lock().await;
        Ok(person_service::numbered(&session.persons))
    }

    pub async fn update_person(
        &self,
        id: Uuid,
        person_id: Uuid,
        fields: BTreeMap<String, String>,
    ) -> Result<PersonView, AppError> {
        let handle = self.sessions.find(id).await?;
        let mut session = handle.lock().await;

        let person = person_service::find_person_mut(&mut session.persons, person_id)?;
        person_service::update_fields(person, fields)?;
        let person = person.clone();
        session.touch();

        let display_number = person_service::display_number(&session.persons, person_id).unwrap_or(1);
        Ok(PersonView { display_number, person })
    }

    /// Remove a pessoa e seus anexos. Pessoa inexistente: nada acontece.
    pub async fn remove_person(&self, id: Uuid, person_id: Uuid) -> Result<bool, AppError> {
        let handle = self.sessions.find(id).await?;
        let mut session = handle.lock().await;

        let removed = person_service::remove_person(&mut session.persons, person_id);
        if removed {
            session.touch();
            tracing::info!("Aplicação {}: pessoa {} removida", id, person_id);
        }
        Ok(removed)
    }

    // =========================================================================
    //  DOCUMENTOS
    // =========================================================================

    /// Anexa um lote a uma categoria da pessoa e devolve a categoria inteira.
    pub async fn add_documents(
        &self,
        id: Uuid,
        person_id: Uuid,
        category: &str,
        files: Vec<IncomingFile>,
    ) -> Result<CategoryAttachments, AppError> {
        let handle = self.sessions.find(id).await?;
        let mut session = handle.lock().await;

        let person = person_service::find_person_mut(&mut session.persons, person_id)?;
        let added = self.attachments.add_files(person, category, files)?;
        let bucket = person
            .category(category)
            .cloned()
            .ok_or_else(|| AppError::CatalogEntryNotFound(category.to_string()))?;
        session.touch();

        tracing::info!(
            "Aplicação {}: {} arquivo(s) em '{}' para a pessoa {}",
            id,
            added.len(),
            category,
            person_id
        );
        Ok(bucket)
    }

    pub async fn remove_document(
        &self,
        id: Uuid,
        person_id: Uuid,
        category: &str,
        file_id: Uuid,
    ) -> Result<bool, AppError> {
        let handle = self.sessions.find(id).await?;
        let mut session = handle.lock().await;

        let person = person_service::find_person_mut(&mut session.persons, person_id)?;
        let removed = self.attachments.remove_file(person, category, file_id)?;
        if removed {
            session.touch();
        }
        Ok(removed)
    }
}

fn is_committed(session: &OnboardingSession, step: WizardStep) -> bool {
    match step {
        WizardStep::AccountOpening => session.account_opening_saved,
        WizardStep::DocumentsUbo => session.documents_submitted,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use axum::body::Bytes;

    use crate::models::{
        auth::RemoteAuthAnswer,
        kyc::{EntityType, FileUploadSettings, PersonRole},
        session::ApplicationType,
        submission::SubmissionPayload,
    };

    #[derive(Default)]
    struct RecordingBackend {
        customer_details: StdMutex<Vec<CustomerDetailsPayload>>,
    }

    #[async_trait]
    impl KycBackend for RecordingBackend {
        async fn signup(&self, _: &str, _: &str, _: &str) -> Result<RemoteAuthAnswer, AppError> {
            unimplemented!()
        }

        async fn login(&self, _: &str, _: &str) -> Result<RemoteAuthAnswer, AppError> {
            unimplemented!()
        }

        async fn create_application(&self, _: &str, _: &str, _: &str) -> Result<String, AppError> {
            Ok("901".into())
        }

        async fn save_customer_details(&self, _: &str, payload: &CustomerDetailsPayload) -> Result<(), AppError> {
            self.customer_details.lock().unwrap().push(payload.clone());
            Ok(())
        }

        async fn upload_file(&self, _: &str, file: &IncomingFile) -> Result<String, AppError> {
            Ok(format!("https://cdn.test/{}", file.name))
        }

        async fn submit_documents(&self, _: &str, _: &SubmissionPayload) -> Result<Option<String>, AppError> {
            Ok(None)
        }
    }

    fn service(backend: Arc<RecordingBackend>) -> OnboardingService {
        let settings = FileUploadSettings::default();
        OnboardingService::new(
            backend,
            SessionRepository::new(),
            Arc::new(RequirementsCatalog::new(settings.clone())),
            AttachmentService::new(settings),
        )
    }

    async fn new_application(svc: &OnboardingService) -> Uuid {
        let payload = CreateApplicationPayload {
            application_type: ApplicationType::Corporate,
            company_name: "Tech Solutions Mauritius Ltd".into(),
        };
        svc.create_application("tok", payload).await.unwrap().id
    }

    fn person(role: &str, entity_type: &str) -> CreatePersonPayload {
        CreatePersonPayload { role: role.into(), entity_type: entity_type.into() }
    }

    #[tokio::test]
    async fn created_application_keeps_the_remote_id() {
        let svc = service(Arc::default());
        let id = new_application(&svc).await;
        let session = svc.get(id).await.unwrap();
        assert_eq!(session.remote_application_id, "901");
        assert_eq!(session.step, WizardStep::AccountOpening);
    }

    #[tokio::test]
    async fn unknown_company_type_leaves_the_state_unchanged() {
        let svc = service(Arc::default());
        let id = new_application(&svc).await;

        let err = svc.select_company_type(id, "Cooperative").await.unwrap_err();
        assert!(matches!(err, AppError::UnknownCompanyType(_)));
        assert!(svc.get(id).await.unwrap().company_type.is_none());

        let session = svc.select_company_type(id, "Trust").await.unwrap();
        assert_eq!(session.company_documents.len(), 4);
        assert_eq!(session.company_documents[0], "Trust Deed");
    }

    #[tokio::test]
    async fn account_opening_must_be_saved_before_moving_on() {
        let backend = Arc::new(RecordingBackend::default());
        let svc = service(backend.clone());
        let id = new_application(&svc).await;

        let err = svc.navigate(id, StepDirection::Next).await.unwrap_err();
        assert!(matches!(err, AppError::StepNotAvailable(_)));

        let form = AccountOpeningForm {
            business_category: "Trading".into(),
            entity_name: "Tech Solutions Mauritius Ltd".into(),
            ..Default::default()
        };
        let session = svc.save_account_opening(id, "tok", form).await.unwrap();
        assert_eq!(session.step, WizardStep::BusinessProfile);
        assert_eq!(backend.customer_details.lock().unwrap()[0].application_id, "901");

        let session = svc.navigate(id, StepDirection::Next).await.unwrap();
        assert_eq!(session.step, WizardStep::DocumentsUbo);
        // Documentos/UBO só avançam pelo commit
        assert!(svc.navigate(id, StepDirection::Next).await.is_err());
        let session = svc.navigate(id, StepDirection::Back).await.unwrap();
        assert_eq!(session.step, WizardStep::BusinessProfile);
    }

    #[tokio::test]
    async fn invalid_account_opening_form_is_not_sent() {
        let backend = Arc::new(RecordingBackend::default());
        let svc = service(backend.clone());
        let id = new_application(&svc).await;

        let err = svc.save_account_opening(id, "tok", AccountOpeningForm::default()).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(backend.customer_details.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_person_selection_keeps_the_collection() {
        let svc = service(Arc::default());
        let id = new_application(&svc).await;

        assert!(matches!(
            svc.add_person(id, person("Director", "Foundation")).await,
            Err(AppError::UnknownEntityType(_))
        ));
        assert!(matches!(svc.add_person(id, person("", "")).await, Err(AppError::IncompleteSelection)));
        assert!(svc.list_persons(id).await.unwrap().is_empty());

        let first = svc.add_person(id, person("Shareholder", "Individual")).await.unwrap();
        let second = svc.add_person(id, person("Shareholder", "Individual")).await.unwrap();
        assert_eq!((first.display_number, second.display_number), (1, 2));
        assert_eq!(second.person.role, PersonRole::Shareholder);
        assert_eq!(second.person.entity_type, EntityType::Individual);
    }

    #[tokio::test]
    async fn documents_are_tracked_per_person_and_category() {
        let svc = service(Arc::default());
        let id = new_application(&svc).await;
        let trust = svc.add_person(id, person("Director", "Trust")).await.unwrap().person.id;

        let file = IncomingFile {
            name: "deed.pdf".into(),
            content_type: "application/pdf".into(),
            content: Bytes::from_static(b"%PDF"),
        };
        let bucket = svc
            .add_documents(id, trust, "Trust Formation Documents", vec![file])
            .await
            .unwrap();
        assert_eq!(bucket.files.len(), 1);
        assert!(bucket.files[0].is_pending());

        let file_id = bucket.files[0].id;
        assert!(svc.remove_document(id, trust, "Trust Formation Documents", file_id).await.unwrap());
        assert!(!svc.remove_document(id, trust, "Trust Formation Documents", file_id).await.unwrap());

        assert!(svc.remove_person(id, trust).await.unwrap());
        assert!(!svc.remove_person(id, trust).await.unwrap());
        assert!(matches!(
            svc.remove_document(id, trust, "Trust Formation Documents", file_id).await,
            Err(AppError::PersonNotFound)
        ));
    }

    #[tokio::test]
    async fn unknown_application_is_not_found() {
        let svc = service(Arc::default());
        assert!(matches!(svc.get(Uuid::new_v4()).await, Err(AppError::ApplicationNotFound)));
    }

    #[tokio::test]
    async fn application_belongs_to_the_creating_token_and_can_be_discarded() {
        let svc = service(Arc::default());
        let id = new_application(&svc).await;

        let session = svc.get(id).await.unwrap();
        assert!(session.is_owned_by("tok"));
        assert!(!session.is_owned_by("other"));

        assert!(svc.discard_application(id).await);
        assert!(!svc.discard_application(id).await);
        assert!(matches!(svc.get(id).await, Err(AppError::ApplicationNotFound)));
    }

    #[tokio::test]
    async fn navigation_waits_for_a_running_commit() {
        let svc = service(Arc::default());
        let id = new_application(&svc).await;
        svc.handle(id).await.unwrap().lock().await.commit_in_progress = true;

        let err = svc.navigate(id, StepDirection::Back).await.unwrap_err();
        assert!(matches!(err, AppError::CommitInProgress));
        assert_eq!(svc.get(id).await.unwrap().step, WizardStep::AccountOpening);
    }
}
