// src/services/submission_service.rs

use std::sync::Arc;

use anyhow::anyhow;
use tokio::task::JoinSet;

use crate::{
    backend::KycBackend,
    common::error::AppError,
    db::SessionHandle,
    models::{
        person::PersonRecord,
        session::{OnboardingSession, WizardStep},
        submission::{AttachmentRef, CommitResponse, DocumentGroupPayload, PersonPayload, SubmissionPayload},
    },
    services::attachment_service::{AttachmentService, PendingUpload},
};

/// Achata as pessoas e seus anexos no formato do backend.
///
/// Falha se ainda houver anexo pendente: só referências remotas entram no
/// payload. Mantém a ordem guardada de pessoas, categorias e arquivos.
pub fn assemble_persons(persons: &[PersonRecord]) -> Result<Vec<PersonPayload>, AppError> {
    let pending: usize = persons.iter().map(PersonRecord::pending_count).sum();
    if pending > 0 {
        return Err(AppError::PendingAttachments(pending));
    }

    Ok(persons
        .iter()
        .map(|person| PersonPayload {
            id: person.id,
            role: person.role,
            entity_type: person.entity_type,
            fields: person.fields.clone(),
            documents: person
                .attachments
                .iter()
                .map(|bucket| DocumentGroupPayload {
                    category: bucket.category.clone(),
                    files: bucket
                        .files
                        .iter()
                        .filter_map(|f| {
                            f.remote_reference.as_ref().map(|reference| AttachmentRef {
                                id: f.id,
                                display_name: f.display_name.clone(),
                                remote_reference: reference.clone(),
                            })
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect())
}

pub fn assemble_payload(session: &OnboardingSession) -> Result<SubmissionPayload, AppError> {
    let company_type = session.company_type.clone().ok_or(AppError::CompanyTypeNotSelected)?;
    let kyc_persons = assemble_persons(&session.persons)?;
    let ubo = &session.ubo;

    Ok(SubmissionPayload {
        application_id: session.remote_application_id.clone(),
        company_type,
        company_documents: session.company_documents.clone(),
        beneficial_owner: ubo.beneficial_owner.clone(),
        ultimate_beneficial_owner: ubo.ultimate_beneficial_owner.clone(),
        source_of_funds: ubo.source_of_funds.clone(),
        shareholders_source_of_wealth: ubo.shareholders_source_of_wealth.clone(),
        shareholders_nationality_country: ubo.shareholders_nationality_country.clone(),
        confirmation_checked: ubo.confirmation_checked,
        ubo_persons: ubo.ubo_persons.clone(),
        kyc_persons,
    })
}

#[derive(Clone)]
pub struct SubmissionService {
    backend: Arc<dyn KycBackend>,
    attachments: AttachmentService,
}

impl SubmissionService {
    pub fn new(backend: Arc<dyn KycBackend>, attachments: AttachmentService) -> Self {
        Self { backend, attachments }
    }

    /// "Próximo" da tela de documentos/UBO: envia os pendentes, monta o
    /// payload e submete. Qualquer falha aborta o passo inteiro; repetir só
    /// reenvia o que continua pendente. Um segundo commit enquanto o primeiro
    /// não terminou é recusado.
    pub async fn commit_documents_step(&self, handle: &SessionHandle, token: &str) -> Result<CommitResponse, AppError> {
        // 1. Pré-condições, marca de commit e cópia dos pendentes
        // (a sessão fica livre durante os uploads)
        let (guard, pending, was_submitted) = {
            let mut session = handle.lock().await;
            if session.commit_in_progress {
                return Err(AppError::CommitInProgress);
            }
            if session.step != WizardStep::DocumentsUbo {
                return Err(AppError::StepNotAvailable(format!("{:?}", session.step)));
            }
            if session.company_type.is_none() {
                return Err(AppError::CompanyTypeNotSelected);
            }
            if !session.ubo.confirmation_checked {
                return Err(AppError::ConfirmationRequired);
            }
            session.commit_in_progress = true;
            (
                CommitGuard::new(handle.clone()),
                self.attachments.pending(&session.persons),
                session.documents_submitted,
            )
        };

        // 2. Uploads em paralelo, independentes entre si
        let results = self.upload_all(pending, token).await?;

        // Sucessos são gravados mesmo se outro arquivo falhar: a nova tentativa
        // só reenvia o que continua pendente
        let (uploaded, payload) = {
            let mut session = handle.lock().await;
            let uploaded = self.record_uploads(&mut session, results)?;

            // 3. Monta o payload com o estado atual, se o passo ainda é o mesmo
            if session.step != WizardStep::DocumentsUbo || session.documents_submitted != was_submitted {
                return Err(AppError::StepNotAvailable(format!("{:?}", session.step)));
            }
            (uploaded, assemble_payload(&session)?)
        };
        let submitted_persons = payload.kyc_persons.len();

        let message = self.backend.submit_documents(token, &payload).await?;

        // 4. Só avança depois da resposta do backend
        let mut session = handle.lock().await;
        session.documents_submitted = true;
        session.step = WizardStep::InternetBanking;
        session.touch();
        guard.release(&mut session);

        tracing::info!(
            "✅ Documentos/UBO submetidos para a aplicação {} ({} pessoas, {} uploads)",
            session.remote_application_id,
            submitted_persons,
            uploaded
        );

        Ok(CommitResponse {
            uploaded_files: uploaded,
            submitted_persons,
            message,
            next_step: session.step,
        })
    }

    async fn upload_all(
        &self,
        pending: Vec<PendingUpload>,
        token: &str,
    ) -> Result<Vec<(PendingUpload, Result<String, AppError>)>, AppError> {
        let mut tasks = JoinSet::new();
        for upload in pending {
            let backend = self.backend.clone();
            let token = token.to_string();
            tasks.spawn(async move {
                let result = backend.upload_file(&token, &upload.file).await;
                (upload, result)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let (upload, result) = joined.map_err(|e| anyhow!("tarefa de upload abortada: {}", e))?;
            results.push((upload, result));
        }
        Ok(results)
    }

    // Devolve quantos uploads foram gravados; erro se algum falhou
    fn record_uploads(
        &self,
        session: &mut OnboardingSession,
        results: Vec<(PendingUpload, Result<String, AppError>)>,
    ) -> Result<usize, AppError> {
        let mut failed = Vec::new();
        let mut recorded = 0;

        for (upload, result) in results {
            match result {
                Ok(reference) => {
                    if self.attachments.mark_uploaded(
                        &mut session.persons,
                        upload.person_id,
                        &upload.category,
                        upload.attachment_id,
                        reference,
                    ) {
                        recorded += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!("Upload de {} falhou na sessão {}: {}", upload.file.name, session.id, e);
                    failed.push(upload.file.name);
                }
            }
        }

        if recorded > 0 {
            session.touch();
        }
        if !failed.is_empty() {
            return Err(AppError::UploadFailed(failed));
        }
        Ok(recorded)
    }
}

// Desfaz a marca de commit em qualquer saída, inclusive quando a
// requisição é cancelada no meio dos uploads.
struct CommitGuard {
    handle: Option<SessionHandle>,
}

impl CommitGuard {
    fn new(handle: SessionHandle) -> Self {
        Self { handle: Some(handle) }
    }

    fn release(mut self, session: &mut OnboardingSession) {
        session.commit_in_progress = false;
        self.handle = None;
    }
}

impl Drop for CommitGuard {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let released = match handle.try_lock() {
            Ok(mut session) => {
                session.commit_in_progress = false;
                true
            }
            Err(_) => false,
        };
        if !released {
            tokio::spawn(async move {
                handle.lock().await.commit_in_progress = false;
            });
        }
    }
}
