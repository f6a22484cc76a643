//! Upload orchestration: one file, one case, one in-flight request.

use std::sync::Arc;

use bytes::Bytes;
use dk_core::error::Result;
use dk_core::models::{Document, DocumentUpload};
use dk_core::traits::{CaseRepository, UploadPhase, UploadProgress};

use crate::store::CaseStore;

/// Where an upload lands: a case, and optionally a checklist slot.
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub case_id: String,
    /// None appends the file as an extra attachment.
    pub slot: Option<String>,
}

/// Builds an upload from a file name and raw bytes, guessing the content
/// type from the extension.
pub fn upload_from_file(
    file_name: impl Into<String>,
    data: Bytes,
    slot: Option<String>,
) -> DocumentUpload {
    let file_name = file_name.into();
    let content_type = mime_guess::from_path(&file_name).first();
    DocumentUpload {
        file_name,
        content_type,
        data,
        slot,
    }
}

/// Drives a single upload end to end: ship the file through the repository,
/// then merge the returned document into the store under the
/// slot-replacement rule.
///
/// Phase events are reported in order on `progress` and always end with
/// `Done` or `Failed`; they are milestones, not percentages. A failure
/// leaves the store untouched. Re-entrancy is a caller error: the initiating
/// control must stay disabled while a run is in flight.
pub struct UploadOrchestrator {
    repo: Arc<dyn CaseRepository>,
}

impl UploadOrchestrator {
    pub fn new(repo: Arc<dyn CaseRepository>) -> Self {
        Self { repo }
    }

    pub async fn upload(
        &self,
        store: &mut CaseStore,
        target: &UploadTarget,
        upload: DocumentUpload,
        progress: &dyn UploadProgress,
    ) -> Result<Document> {
        progress.phase(UploadPhase::Preparing);

        let outcome = self.run(store, target, upload, progress).await;
        match &outcome {
            Ok(doc) => {
                progress.phase(UploadPhase::Done);
                tracing::info!(case_id = %target.case_id, document_id = %doc.id, "document uploaded");
            }
            Err(err) => {
                progress.phase(UploadPhase::Failed);
                tracing::warn!(case_id = %target.case_id, error = %err, "upload failed");
            }
        }
        outcome
    }

    async fn run(
        &self,
        store: &mut CaseStore,
        target: &UploadTarget,
        upload: DocumentUpload,
        progress: &dyn UploadProgress,
    ) -> Result<Document> {
        let viewer = store.viewer().clone();

        progress.phase(UploadPhase::Transferring);
        let doc = self
            .repo
            .upload_document(&viewer, &target.case_id, upload)
            .await?;

        progress.phase(UploadPhase::Finalizing);
        store.merge_document(&target.case_id, doc.clone())?;
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participants::ParticipantResolver;
    use chrono::Utc;
    use dk_core::error::AppError;
    use dk_core::models::{
        Case, CasePage, CaseStatus, Category, DocumentStatus, Identity, Role,
    };
    use dk_core::traits::MockCaseRepository;
    use std::sync::Mutex;

    /// Collects phases for assertions.
    #[derive(Default)]
    struct Recorder(Mutex<Vec<UploadPhase>>);

    impl UploadProgress for Recorder {
        fn phase(&self, phase: UploadPhase) {
            self.0.lock().unwrap().push(phase);
        }
    }

    fn viewer() -> Identity {
        Identity {
            id: "3".to_string(),
            name: String::new(),
            role: Role::Demandeur,
        }
    }

    fn open_case(id: &str) -> Case {
        Case {
            id: id.to_string(),
            title: "Permis d'études".to_string(),
            description: "…".to_string(),
            requester_id: "3".to_string(),
            expert_id: None,
            category: Category::Etudes,
            status: CaseStatus::Ouvert,
            created_at: Utc::now(),
            budget: None,
            documents: Vec::new(),
        }
    }

    fn served_document(slot: Option<&str>) -> Document {
        Document {
            id: "d-1".to_string(),
            name: "passeport.pdf".to_string(),
            status: DocumentStatus::Pending,
            kind: "application/pdf".to_string(),
            updated_at: Utc::now(),
            url: Some("/files/d-1".to_string()),
            slot: slot.map(str::to_string),
        }
    }

    async fn store_with_case(repo: MockCaseRepository) -> (CaseStore, Arc<dyn CaseRepository>) {
        let repo: Arc<dyn CaseRepository> = Arc::new(repo);
        let mut store = CaseStore::new(
            Arc::clone(&repo),
            Arc::new(ParticipantResolver::empty()),
            viewer(),
        );
        store.refresh().await.unwrap();
        (store, repo)
    }

    #[tokio::test]
    async fn success_merges_and_reports_phases_in_order() {
        let mut repo = MockCaseRepository::new();
        repo.expect_list_cases().return_once(|_| {
            Ok(CasePage {
                cases: vec![open_case("dos-1")],
                participants: Vec::new(),
            })
        });
        repo.expect_upload_document()
            .return_once(|_, _, _| Ok(served_document(Some("PASSPORT"))));

        let (mut store, repo) = store_with_case(repo).await;
        let orchestrator = UploadOrchestrator::new(repo);
        let recorder = Recorder::default();

        let doc = orchestrator
            .upload(
                &mut store,
                &UploadTarget {
                    case_id: "dos-1".to_string(),
                    slot: Some("PASSPORT".to_string()),
                },
                upload_from_file("passeport.pdf", Bytes::from_static(b"%PDF"), Some("PASSPORT".to_string())),
                &recorder,
            )
            .await
            .unwrap();

        assert_eq!(doc.slot.as_deref(), Some("PASSPORT"));
        let case = store.get("dos-1").unwrap();
        assert_eq!(case.documents.len(), 1);
        assert_eq!(case.documents[0].id, "d-1");

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![
                UploadPhase::Preparing,
                UploadPhase::Transferring,
                UploadPhase::Finalizing,
                UploadPhase::Done,
            ]
        );
    }

    #[tokio::test]
    async fn replacement_keeps_a_single_slot_holder() {
        let mut repo = MockCaseRepository::new();
        repo.expect_list_cases().return_once(|_| {
            let mut case = open_case("dos-1");
            case.documents.push(Document {
                id: "d-0".to_string(),
                status: DocumentStatus::Rejected,
                ..served_document(Some("PASSPORT"))
            });
            Ok(CasePage {
                cases: vec![case],
                participants: Vec::new(),
            })
        });
        repo.expect_upload_document()
            .return_once(|_, _, _| Ok(served_document(Some("PASSPORT"))));

        let (mut store, repo) = store_with_case(repo).await;
        let orchestrator = UploadOrchestrator::new(repo);

        orchestrator
            .upload(
                &mut store,
                &UploadTarget {
                    case_id: "dos-1".to_string(),
                    slot: Some("PASSPORT".to_string()),
                },
                upload_from_file("passeport-v2.pdf", Bytes::from_static(b"%PDF"), Some("PASSPORT".to_string())),
                &dk_core::traits::NoProgress,
            )
            .await
            .unwrap();

        let case = store.get("dos-1").unwrap();
        assert_eq!(case.documents.len(), 1);
        assert_eq!(case.documents[0].id, "d-1");
        // The earlier rejection is gone with the document it applied to.
        assert_eq!(case.documents[0].status, DocumentStatus::Pending);
    }

    #[tokio::test]
    async fn failure_leaves_the_store_unchanged() {
        let mut repo = MockCaseRepository::new();
        repo.expect_list_cases().return_once(|_| {
            Ok(CasePage {
                cases: vec![open_case("dos-1")],
                participants: Vec::new(),
            })
        });
        repo.expect_upload_document()
            .return_once(|_, _, _| Err(AppError::Remote("Fichier trop volumineux".to_string())));

        let (mut store, repo) = store_with_case(repo).await;
        let orchestrator = UploadOrchestrator::new(repo);
        let recorder = Recorder::default();

        let err = orchestrator
            .upload(
                &mut store,
                &UploadTarget {
                    case_id: "dos-1".to_string(),
                    slot: None,
                },
                upload_from_file("gros.pdf", Bytes::from_static(b"%PDF"), None),
                &recorder,
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Fichier trop volumineux");
        assert!(store.get("dos-1").unwrap().documents.is_empty());
        assert_eq!(
            recorder.0.lock().unwrap().last(),
            Some(&UploadPhase::Failed)
        );
    }

    #[test]
    fn content_type_is_guessed_from_the_name() {
        let upload = upload_from_file("preuve.pdf", Bytes::new(), None);
        assert_eq!(
            upload.content_type.as_ref().map(|m| m.essence_str()),
            Some("application/pdf")
        );
        assert_eq!(upload.kind_label(), "application/pdf");

        let unknown = upload_from_file("mystere", Bytes::new(), None);
        assert!(unknown.content_type.is_none());
        assert_eq!(unknown.kind_label(), "FILE");
    }
}
