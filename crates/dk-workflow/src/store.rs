//! Session case store: the set of cases visible to the acting user, with the
//! filtering and mutations the surrounding views trigger.

use std::sync::Arc;

use dk_core::error::{AppError, Result};
use dk_core::models::{
    Case, CaseDraft, Category, Document, DocumentStatus, Identity, ReviewDecision, Role,
};
use dk_core::traits::CaseRepository;

use crate::participants::ParticipantResolver;

/// Display filtering for the case list.
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    /// None shows every category.
    pub category: Option<Category>,
    /// Case-insensitive substring match against the raw id and its
    /// display-prefixed forms.
    pub query: String,
}

/// The in-memory snapshot of the viewer's cases, refreshed wholesale from a
/// [`CaseRepository`]. All mutations happen on discrete caller events; a
/// failed operation leaves the snapshot at its last-known-good state.
pub struct CaseStore {
    repo: Arc<dyn CaseRepository>,
    resolver: Arc<ParticipantResolver>,
    viewer: Identity,
    /// Most recent first.
    cases: Vec<Case>,
    /// Base for resolving relative document urls.
    api_base: Option<String>,
    /// Prefixes recognized by the id search ("cap" matches "CAP-r1").
    reference_prefixes: Vec<String>,
}

impl CaseStore {
    pub fn new(
        repo: Arc<dyn CaseRepository>,
        resolver: Arc<ParticipantResolver>,
        viewer: Identity,
    ) -> Self {
        Self {
            repo,
            resolver,
            viewer,
            cases: Vec::new(),
            api_base: None,
            reference_prefixes: vec!["cap".to_string(), "capitune".to_string()],
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    pub fn with_reference_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.reference_prefixes = prefixes;
        self
    }

    pub fn viewer(&self) -> &Identity {
        &self.viewer
    }

    pub fn resolver(&self) -> &ParticipantResolver {
        &self.resolver
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn get(&self, case_id: &str) -> Option<&Case> {
        self.cases.iter().find(|c| c.id == case_id)
    }

    /// Replaces the snapshot with the repository's answer and feeds any
    /// harvested participant metadata into the resolver.
    pub async fn refresh(&mut self) -> Result<()> {
        let page = self.repo.list_cases(&self.viewer).await?;
        self.resolver.absorb(page.participants);
        tracing::debug!(count = page.cases.len(), "case snapshot refreshed");
        self.cases = page.cases;
        Ok(())
    }

    /// The filtered view of the snapshot.
    pub fn visible(&self, filter: &CaseFilter) -> Vec<&Case> {
        let query = filter.query.trim().to_lowercase();
        self.cases
            .iter()
            .filter(|case| {
                let category_ok = filter.category.map_or(true, |c| case.category == c);
                category_ok && (query.is_empty() || self.matches_reference(&case.id, &query))
            })
            .collect()
    }

    /// Matches a lowercased search string against the raw id and its
    /// display-prefixed forms (`cap-<id>`, `#cap-<id>`, …).
    fn matches_reference(&self, id: &str, query: &str) -> bool {
        let id = id.to_lowercase();
        if id.contains(query) {
            return true;
        }
        self.reference_prefixes.iter().any(|prefix| {
            let prefixed = format!("{prefix}-{id}");
            prefixed.contains(query) || format!("#{prefixed}").contains(query)
        })
    }

    /// Creates a case from the draft and prepends it to the snapshot.
    pub async fn create(&mut self, draft: CaseDraft) -> Result<Case> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("Veuillez entrer un titre.".to_string()));
        }
        let description = draft.description.trim().to_string();
        if description.is_empty() {
            return Err(AppError::Validation(
                "Veuillez entrer une description.".to_string(),
            ));
        }

        let fetched = self
            .repo
            .create_case(
                &self.viewer,
                CaseDraft {
                    title,
                    description,
                    category: draft.category,
                },
            )
            .await?;

        self.resolver.absorb(fetched.participants);
        self.cases.insert(0, fetched.case.clone());
        tracing::info!(case_id = %fetched.case.id, "case created");
        Ok(fetched.case)
    }

    /// Deletes a case. Only the case's requester or an admin may do this;
    /// any confirmation prompt is the caller's responsibility. Terminal: the
    /// case disappears from every later visible-set computation.
    pub async fn delete(&mut self, case_id: &str) -> Result<()> {
        let case = self.get(case_id).ok_or_else(|| {
            AppError::NotFound("Dossier".to_string(), case_id.to_string())
        })?;

        let permitted =
            self.viewer.role == Role::Admin || case.requester_id == self.viewer.id;
        if !permitted {
            return Err(AppError::Forbidden(
                "Seul le demandeur ou un administrateur peut supprimer ce dossier.".to_string(),
            ));
        }

        self.repo.delete_case(&self.viewer, case_id).await?;
        self.cases.retain(|c| c.id != case_id);
        tracing::info!(case_id, "case deleted");
        Ok(())
    }

    /// Records a reviewer decision and applies the stored status to the
    /// snapshot. Only `status` changes; a later decision overwrites an
    /// earlier one.
    pub async fn review(
        &mut self,
        case_id: &str,
        document_id: &str,
        decision: ReviewDecision,
    ) -> Result<DocumentStatus> {
        if self.viewer.role != Role::Expert {
            return Err(AppError::Forbidden(
                "Seul un expert peut statuer sur un document.".to_string(),
            ));
        }

        let status = self
            .repo
            .review_document(&self.viewer, case_id, document_id, decision)
            .await?;

        if let Some(case) = self.cases.iter_mut().find(|c| c.id == case_id) {
            case.set_document_status(document_id, status);
        }
        Ok(status)
    }

    /// Merges an uploaded document into its case under the slot-replacement
    /// rule. Used by the upload orchestrator once the transport succeeded.
    pub(crate) fn merge_document(&mut self, case_id: &str, doc: Document) -> Result<()> {
        let case = self
            .cases
            .iter_mut()
            .find(|c| c.id == case_id)
            .ok_or_else(|| AppError::NotFound("Dossier".to_string(), case_id.to_string()))?;
        case.merge_document(doc);
        Ok(())
    }

    /// Resolves a document's url for download: absolute http(s) urls pass
    /// through, relative ones are joined onto the API base when one is
    /// configured. A blank url yields None — nothing to download.
    pub fn document_url(&self, doc: &Document) -> Option<String> {
        let url = doc.url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
        if url.starts_with("http://") || url.starts_with("https://") {
            return Some(url.to_string());
        }
        match &self.api_base {
            Some(base) => Some(format!("{base}{url}")),
            None => Some(url.to_string()),
        }
    }
}
