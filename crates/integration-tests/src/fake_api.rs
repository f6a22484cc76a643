//! An in-process stand-in for the dossier API: the same `CaseRepository`
//! contract the REST adapter fulfills, document storage included, so the
//! upload and review paths can run end to end without a server.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use dk_core::error::{AppError, Result};
use dk_core::models::{
    Case, CaseDraft, CasePage, CaseStatus, Document, DocumentStatus, DocumentUpload, FetchedCase,
    Identity, ParticipantProfile, ReviewDecision, Role,
};
use dk_core::traits::CaseRepository;

#[derive(Default)]
pub struct FakeApi {
    cases: RwLock<Vec<Case>>,
    /// Returned with every list/create response, like the real API's
    /// requester/professional metadata.
    participants: Vec<ParticipantProfile>,
    next_id: AtomicU64,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_participants(mut self, participants: Vec<ParticipantProfile>) -> Self {
        self.participants = participants;
        self
    }

    fn visible_to(case: &Case, viewer: &Identity) -> bool {
        match viewer.role {
            Role::Demandeur => case.requester_id == viewer.id,
            Role::Expert => case.expert_id.as_deref() == Some(viewer.id.as_str()),
            Role::Admin => true,
        }
    }

    fn next(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[async_trait]
impl CaseRepository for FakeApi {
    async fn list_cases(&self, viewer: &Identity) -> Result<CasePage> {
        let cases = self.cases.read().unwrap_or_else(|e| e.into_inner());
        Ok(CasePage {
            cases: cases
                .iter()
                .filter(|case| Self::visible_to(case, viewer))
                .cloned()
                .collect(),
            participants: self.participants.clone(),
        })
    }

    async fn create_case(&self, viewer: &Identity, draft: CaseDraft) -> Result<FetchedCase> {
        let case = Case {
            id: self.next("dos"),
            title: draft.title,
            description: draft.description,
            requester_id: viewer.id.clone(),
            // The platform assigns an expert on creation.
            expert_id: Some("1".to_string()),
            category: draft.category,
            status: CaseStatus::Ouvert,
            created_at: Utc::now(),
            budget: None,
            documents: Vec::new(),
        };

        let mut cases = self.cases.write().unwrap_or_else(|e| e.into_inner());
        cases.insert(0, case.clone());
        Ok(FetchedCase {
            case,
            participants: self.participants.clone(),
        })
    }

    async fn delete_case(&self, _viewer: &Identity, case_id: &str) -> Result<()> {
        let mut cases = self.cases.write().unwrap_or_else(|e| e.into_inner());
        match cases.iter().position(|c| c.id == case_id) {
            Some(pos) => {
                cases.remove(pos);
                Ok(())
            }
            None => Err(AppError::NotFound(
                "Dossier".to_string(),
                case_id.to_string(),
            )),
        }
    }

    async fn upload_document(
        &self,
        _viewer: &Identity,
        case_id: &str,
        upload: DocumentUpload,
    ) -> Result<Document> {
        let mut cases = self.cases.write().unwrap_or_else(|e| e.into_inner());
        let case = cases
            .iter_mut()
            .find(|c| c.id == case_id)
            .ok_or_else(|| AppError::NotFound("Dossier".to_string(), case_id.to_string()))?;

        let id = self.next("doc");
        let doc = Document {
            url: Some(format!("/files/{id}")),
            id,
            name: upload.file_name.clone(),
            status: DocumentStatus::Pending,
            kind: upload.kind_label(),
            updated_at: Utc::now(),
            slot: upload.slot.clone(),
        };

        // The server applies the same slot-replacement rule as the client.
        case.merge_document(doc.clone());
        Ok(doc)
    }

    async fn review_document(
        &self,
        _viewer: &Identity,
        case_id: &str,
        document_id: &str,
        decision: ReviewDecision,
    ) -> Result<DocumentStatus> {
        let mut cases = self.cases.write().unwrap_or_else(|e| e.into_inner());
        let case = cases
            .iter_mut()
            .find(|c| c.id == case_id)
            .ok_or_else(|| AppError::NotFound("Dossier".to_string(), case_id.to_string()))?;

        let status = decision.status();
        if !case.set_document_status(document_id, status) {
            return Err(AppError::NotFound(
                "Document".to_string(),
                document_id.to_string(),
            ));
        }
        Ok(status)
    }
}
