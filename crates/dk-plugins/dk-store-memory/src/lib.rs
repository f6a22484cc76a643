//! # dk-store-memory
//!
//! In-memory implementation of `CaseRepository` for local-only mode. The
//! visible set is the union of cases created this session and the seed data,
//! scoped by the viewer's role: a requester sees their own cases, an expert
//! the ones assigned to them, an admin everything. Document storage and
//! review are rejected here — those actions strictly require a backend.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use dk_core::error::{AppError, Result};
use dk_core::models::{
    Case, CaseDraft, CasePage, CaseStatus, Document, DocumentStatus, DocumentUpload, FetchedCase,
    Identity, ReviewDecision, Role,
};
use dk_core::traits::CaseRepository;
use uuid::Uuid;

pub mod seed;

pub struct MemoryCaseRepository {
    /// Cases created this session, most recent first.
    local: RwLock<Vec<Case>>,
    /// Seed cases shown alongside the local ones.
    seeded: RwLock<Vec<Case>>,
}

impl MemoryCaseRepository {
    pub fn new() -> Self {
        Self::with_seed(seed::seed_cases())
    }

    pub fn with_seed(cases: Vec<Case>) -> Self {
        Self {
            local: RwLock::new(Vec::new()),
            seeded: RwLock::new(cases),
        }
    }

    fn visible_to(case: &Case, viewer: &Identity) -> bool {
        match viewer.role {
            Role::Demandeur => case.requester_id == viewer.id,
            Role::Expert => case.expert_id.as_deref() == Some(viewer.id.as_str()),
            Role::Admin => true,
        }
    }
}

impl Default for MemoryCaseRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaseRepository for MemoryCaseRepository {
    async fn list_cases(&self, viewer: &Identity) -> Result<CasePage> {
        let local = self.local.read().unwrap_or_else(|e| e.into_inner());
        let seeded = self.seeded.read().unwrap_or_else(|e| e.into_inner());

        let cases: Vec<Case> = local
            .iter()
            .chain(seeded.iter())
            .filter(|case| Self::visible_to(case, viewer))
            .cloned()
            .collect();

        // Participant metadata comes from the resolver's seed profiles in
        // this mode; there is no remote response to harvest.
        Ok(CasePage {
            cases,
            participants: Vec::new(),
        })
    }

    async fn create_case(&self, viewer: &Identity, draft: CaseDraft) -> Result<FetchedCase> {
        let case = Case {
            id: format!("local-{}", Uuid::new_v4()),
            title: draft.title,
            description: draft.description,
            requester_id: viewer.id.clone(),
            expert_id: None,
            category: draft.category,
            status: CaseStatus::Ouvert,
            created_at: Utc::now(),
            budget: None,
            documents: Vec::new(),
        };

        let mut local = self.local.write().unwrap_or_else(|e| e.into_inner());
        local.insert(0, case.clone());
        tracing::debug!(case_id = %case.id, "local case created");

        Ok(FetchedCase {
            case,
            participants: Vec::new(),
        })
    }

    async fn delete_case(&self, _viewer: &Identity, case_id: &str) -> Result<()> {
        {
            let mut local = self.local.write().unwrap_or_else(|e| e.into_inner());
            if let Some(pos) = local.iter().position(|c| c.id == case_id) {
                local.remove(pos);
                tracing::debug!(case_id, "local case deleted");
                return Ok(());
            }
        }

        let mut seeded = self.seeded.write().unwrap_or_else(|e| e.into_inner());
        if let Some(pos) = seeded.iter().position(|c| c.id == case_id) {
            seeded.remove(pos);
            tracing::debug!(case_id, "seed case deleted");
            return Ok(());
        }

        Err(AppError::NotFound(
            "Dossier".to_string(),
            case_id.to_string(),
        ))
    }

    async fn upload_document(
        &self,
        _viewer: &Identity,
        _case_id: &str,
        _upload: DocumentUpload,
    ) -> Result<Document> {
        Err(AppError::NotConfigured("API non configurée.".to_string()))
    }

    async fn review_document(
        &self,
        _viewer: &Identity,
        _case_id: &str,
        _document_id: &str,
        _decision: ReviewDecision,
    ) -> Result<DocumentStatus> {
        Err(AppError::NotConfigured("API non configurée.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dk_core::models::Category;

    fn viewer(id: &str, role: Role) -> Identity {
        Identity {
            id: id.to_string(),
            name: String::new(),
            role,
        }
    }

    fn draft(title: &str) -> CaseDraft {
        CaseDraft {
            title: title.to_string(),
            description: "Relecture complète du dossier.".to_string(),
            category: Category::Etudes,
        }
    }

    #[tokio::test]
    async fn requester_sees_only_their_cases() {
        let repo = MemoryCaseRepository::new();
        let owner = viewer("3", Role::Demandeur);
        let stranger = viewer("someone-else", Role::Demandeur);

        let own = repo.list_cases(&owner).await.unwrap();
        assert_eq!(own.cases.len(), 1);
        assert_eq!(own.cases[0].id, "r1");

        assert!(repo.list_cases(&stranger).await.unwrap().cases.is_empty());
    }

    #[tokio::test]
    async fn expert_sees_assigned_cases_and_admin_sees_all() {
        let repo = MemoryCaseRepository::new();

        let assigned = repo.list_cases(&viewer("1", Role::Expert)).await.unwrap();
        assert_eq!(assigned.cases.len(), 1);

        let other_expert = repo.list_cases(&viewer("2", Role::Expert)).await.unwrap();
        assert!(other_expert.cases.is_empty());

        let all = repo.list_cases(&viewer("admin", Role::Admin)).await.unwrap();
        assert_eq!(all.cases.len(), 1);
    }

    #[tokio::test]
    async fn created_case_is_open_empty_and_first() {
        let repo = MemoryCaseRepository::new();
        let owner = viewer("3", Role::Demandeur);

        let created = repo
            .create_case(&owner, draft("Permis d'études"))
            .await
            .unwrap();
        assert!(created.case.id.starts_with("local-"));
        assert_eq!(created.case.status, CaseStatus::Ouvert);
        assert!(created.case.documents.is_empty());
        assert!(created.case.expert_id.is_none());

        let listed = repo.list_cases(&owner).await.unwrap();
        assert_eq!(listed.cases[0].id, created.case.id);
    }

    #[tokio::test]
    async fn delete_removes_from_the_owning_list() {
        let repo = MemoryCaseRepository::new();
        let owner = viewer("3", Role::Demandeur);

        let created = repo
            .create_case(&owner, draft("À supprimer"))
            .await
            .unwrap();
        repo.delete_case(&owner, &created.case.id).await.unwrap();
        repo.delete_case(&owner, "r1").await.unwrap();

        for role in [Role::Demandeur, Role::Expert, Role::Admin] {
            let page = repo.list_cases(&viewer("3", role)).await.unwrap();
            assert!(page.cases.is_empty());
        }

        let err = repo.delete_case(&owner, "r1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_, _)));
    }

    #[tokio::test]
    async fn storage_actions_require_a_backend() {
        let repo = MemoryCaseRepository::new();
        let owner = viewer("3", Role::Demandeur);

        let upload = DocumentUpload {
            file_name: "passeport.pdf".to_string(),
            content_type: None,
            data: bytes::Bytes::new(),
            slot: Some("PASSPORT".to_string()),
        };
        let err = repo.upload_document(&owner, "r1", upload).await.unwrap_err();
        assert!(matches!(err, AppError::NotConfigured(_)));

        let err = repo
            .review_document(&viewer("1", Role::Expert), "r1", "d2", ReviewDecision::Validated)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotConfigured(_)));
    }
}
