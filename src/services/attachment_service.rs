// src/services/attachment_service.rs

use axum::body::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::{AppError, FileRejection},
    models::{
        kyc::FileUploadSettings,
        person::{CategoryAttachments, FileAttachment, IncomingFile, PersonRecord},
    },
};

/// Um anexo ainda sem referência remota, copiado para ser enviado fora da sessão.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub person_id: Uuid,
    pub category: String,
    pub attachment_id: Uuid,
    pub file: IncomingFile,
}

// Livro de anexos: por pessoa, por categoria, independente das demais.
#[derive(Debug, Clone)]
pub struct AttachmentService {
    settings: FileUploadSettings,
}

impl AttachmentService {
    pub fn new(settings: FileUploadSettings) -> Self {
        Self { settings }
    }

    /// Valida o lote inteiro antes de qualquer mutação. A primeira violação
    /// rejeita todos os arquivos da chamada.
    pub fn validate(&self, files: &[IncomingFile]) -> Result<(), FileRejection> {
        if files.len() > self.settings.max_files_per_field {
            return Err(FileRejection::TooManyFiles {
                max: self.settings.max_files_per_field,
                received: files.len(),
            });
        }

        let max_bytes = self.settings.max_file_size_bytes();
        for file in files {
            if file.size() > max_bytes {
                return Err(FileRejection::TooLarge {
                    file: file.name.clone(),
                    max_mb: self.settings.max_file_size,
                });
            }
            if !self.settings.accepts(&file.content_type) {
                return Err(FileRejection::InvalidFormat {
                    file: file.name.clone(),
                    content_type: file.content_type.clone(),
                });
            }
        }

        Ok(())
    }

    /// Registra os arquivos como pendentes (o upload acontece no commit do passo).
    pub fn add_files(
        &self,
        person: &mut PersonRecord,
        category: &str,
        files: Vec<IncomingFile>,
    ) -> Result<Vec<Uuid>, AppError> {
        let entity_type = person.entity_type;
        let bucket = checked_category(person, category)?;

        if files.is_empty() {
            return Err(AppError::EmptyUpload);
        }

        if let Err(rejection) = self.validate(&files) {
            tracing::warn!(
                "Lote rejeitado para {} ({}): {}",
                category,
                entity_type.as_str(),
                rejection
            );
            return Err(rejection.into());
        }

        let now = Utc::now();
        let ids = files
            .into_iter()
            .map(|file| {
                let attachment = FileAttachment {
                    id: Uuid::new_v4(),
                    size_bytes: file.size(),
                    display_name: file.name,
                    content_type: file.content_type,
                    remote_reference: None,
                    added_at: now,
                    content: file.content,
                };
                let id = attachment.id;
                bucket.files.push(attachment);
                id
            })
            .collect();

        Ok(ids)
    }

    /// Remove exatamente um anexo. ID inexistente não faz nada (`Ok(false)`).
    pub fn remove_file(&self, person: &mut PersonRecord, category: &str, file_id: Uuid) -> Result<bool, AppError> {
        let bucket = checked_category(person, category)?;
        let before = bucket.files.len();
        bucket.files.retain(|f| f.id != file_id);
        Ok(bucket.files.len() != before)
    }

    /// Todos os anexos pendentes, na ordem de pessoas e categorias.
    pub fn pending(&self, persons: &[PersonRecord]) -> Vec<PendingUpload> {
        persons
            .iter()
            .flat_map(|person| {
                person.attachments.iter().flat_map(move |bucket| {
                    bucket.files.iter().filter(|f| f.is_pending()).map(move |f| PendingUpload {
                        person_id: person.id,
                        category: bucket.category.clone(),
                        attachment_id: f.id,
                        file: IncomingFile {
                            name: f.display_name.clone(),
                            content_type: f.content_type.clone(),
                            content: f.content.clone(),
                        },
                    })
                })
            })
            .collect()
    }

    /// Grava a referência remota. Se o anexo (ou a pessoa) foi removido
    /// enquanto o upload corria, a referência é descartada e devolve `false`.
    pub fn mark_uploaded(
        &self,
        persons: &mut [PersonRecord],
        person_id: Uuid,
        category: &str,
        attachment_id: Uuid,
        reference: String,
    ) -> bool {
        let attachment = persons
            .iter_mut()
            .find(|p| p.id == person_id)
            .and_then(|p| p.category_mut(category))
            .and_then(|bucket| bucket.files.iter_mut().find(|f| f.id == attachment_id));

        match attachment {
            Some(attachment) => {
                attachment.remote_reference = Some(reference);
                // Com a referência remota, os bytes não são mais necessários
                attachment.content = Bytes::new();
                true
            }
            None => {
                tracing::debug!("Upload órfão ignorado: {} ({})", attachment_id, category);
                false
            }
        }
    }
}

// O catálogo decide quais categorias existem para o tipo de entidade
fn checked_category<'a>(person: &'a mut PersonRecord, category: &str) -> Result<&'a mut CategoryAttachments, AppError> {
    let entity_type = person.entity_type;
    let unknown = || AppError::UnknownDocumentCategory {
        entity_type: entity_type.as_str().to_string(),
        category: category.to_string(),
    };

    if !entity_type.has_category(category) {
        return Err(unknown());
    }
    person.category_mut(category).ok_or_else(unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::kyc::{EntityType, PersonRole},
        services::person_service::create_person,
    };

    const IDENTITY: &str = "Identity Documents";

    fn file(name: &str, content_type: &str, size: usize) -> IncomingFile {
        IncomingFile {
            name: name.to_string(),
            content_type: content_type.to_string(),
            content: Bytes::from(vec![0u8; size]),
        }
    }

    fn pdf(name: &str) -> IncomingFile {
        file(name, "application/pdf", 1024)
    }

    fn individual() -> Vec<PersonRecord> {
        let mut persons = Vec::new();
        create_person(&mut persons, Some(PersonRole::Shareholder), Some(EntityType::Individual));
        persons
    }

    fn service() -> AttachmentService {
        AttachmentService::new(FileUploadSettings::default())
    }

    #[test]
    fn valid_batch_is_appended_as_pending_in_order() {
        let mut persons = individual();
        let ids = service()
            .add_files(&mut persons[0], IDENTITY, vec![pdf("a.pdf"), file("b.png", "image/png", 10)])
            .unwrap();

        let bucket = persons[0].category(IDENTITY).unwrap();
        assert_eq!(bucket.files.iter().map(|f| f.id).collect::<Vec<_>>(), ids);
        assert_eq!(bucket.files[0].display_name, "a.pdf");
        assert!(bucket.files.iter().all(FileAttachment::is_pending));
        // As outras categorias não mudam
        assert!(persons[0].category("Address Proof Documents").unwrap().files.is_empty());
    }

    #[test]
    fn one_oversized_file_rejects_the_whole_batch() {
        let mut persons = individual();
        let too_big = file("huge.pdf", "application/pdf", 10 * 1024 * 1024 + 1);
        let err = service()
            .add_files(&mut persons[0], IDENTITY, vec![pdf("a.pdf"), too_big, pdf("c.pdf"), pdf("d.pdf")])
            .unwrap_err();

        match err {
            AppError::FileRejected(rejection) => {
                assert_eq!(rejection.offending_file(), Some("huge.pdf"));
                assert!(matches!(rejection, FileRejection::TooLarge { max_mb: 10, .. }));
            }
            other => panic!("erro inesperado: {:?}", other),
        }
        assert!(persons[0].category(IDENTITY).unwrap().files.is_empty());
    }

    #[test]
    fn more_than_the_maximum_files_is_rejected() {
        let mut persons = individual();
        let batch: Vec<_> = (0..6).map(|i| pdf(&format!("{}.pdf", i))).collect();
        let err = service().add_files(&mut persons[0], IDENTITY, batch).unwrap_err();

        assert!(matches!(
            err,
            AppError::FileRejected(FileRejection::TooManyFiles { max: 5, received: 6 })
        ));
        assert!(persons[0].category(IDENTITY).unwrap().files.is_empty());
    }

    #[test]
    fn wrong_format_is_rejected() {
        let mut persons = individual();
        let err = service()
            .add_files(&mut persons[0], IDENTITY, vec![file("notes.txt", "text/plain", 3)])
            .unwrap_err();
        assert!(matches!(err, AppError::FileRejected(FileRejection::InvalidFormat { .. })));
    }

    #[test]
    fn category_must_belong_to_the_entity_type() {
        let mut persons = individual();
        let err = service()
            .add_files(&mut persons[0], "Trust Formation Documents", vec![pdf("deed.pdf")])
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownDocumentCategory { .. }));

        let err = service().add_files(&mut persons[0], IDENTITY, Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::EmptyUpload));
    }

    #[test]
    fn remove_file_is_idempotent() {
        let mut persons = individual();
        let svc = service();
        let ids = svc
            .add_files(&mut persons[0], IDENTITY, vec![pdf("a.pdf"), pdf("b.pdf")])
            .unwrap();

        assert!(svc.remove_file(&mut persons[0], IDENTITY, ids[0]).unwrap());
        assert!(!svc.remove_file(&mut persons[0], IDENTITY, ids[0]).unwrap());

        let remaining: Vec<_> = persons[0].category(IDENTITY).unwrap().files.iter().map(|f| f.id).collect();
        assert_eq!(remaining, vec![ids[1]]);
    }

    #[test]
    fn orphaned_upload_results_are_ignored() {
        let mut persons = individual();
        let svc = service();
        let person_id = persons[0].id;
        let ids = svc.add_files(&mut persons[0], IDENTITY, vec![pdf("a.pdf"), pdf("b.pdf")]).unwrap();

        let pending = svc.pending(&persons);
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].attachment_id, ids[0]);

        // Removido enquanto o upload estava em andamento
        svc.remove_file(&mut persons[0], IDENTITY, ids[0]).unwrap();
        assert!(!svc.mark_uploaded(&mut persons, person_id, IDENTITY, ids[0], "https://cdn/a".into()));
        assert!(svc.mark_uploaded(&mut persons, person_id, IDENTITY, ids[1], "https://cdn/b".into()));

        assert!(svc.pending(&persons).is_empty());
        assert_eq!(persons[0].pending_count(), 0);
    }

    #[test]
    fn uploaded_attachments_drop_their_content() {
        let mut persons = individual();
        let svc = service();
        let person_id = persons[0].id;
        let ids = svc.add_files(&mut persons[0], IDENTITY, vec![pdf("a.pdf"), pdf("b.pdf")]).unwrap();

        assert!(svc.mark_uploaded(&mut persons, person_id, IDENTITY, ids[0], "https://cdn/a".into()));

        let files = &persons[0].category(IDENTITY).unwrap().files;
        assert!(files[0].content.is_empty());
        assert_eq!(files[0].remote_reference.as_deref(), Some("https://cdn/a"));
        // O pendente continua com os bytes para o upload
        assert!(!files[1].content.is_empty());
        assert!(files[0].size_bytes > 0);
    }
}
