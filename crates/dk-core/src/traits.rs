//! # Core Traits (Ports)
//!
//! Contracts the workflow services depend on. The adapters under
//! `crates/dk-plugins` implement these; which implementation runs is decided
//! once at startup from configuration.

use async_trait::async_trait;
#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::error::Result;
use crate::models::{
    CaseDraft, CasePage, Document, DocumentStatus, DocumentUpload, FetchedCase, Identity,
    ReviewDecision,
};

/// Case persistence and mutation contract.
///
/// The in-memory adapter serves locally-created and seed cases and applies
/// role scoping itself; the REST adapter proxies the dossier API, whose
/// answers are authoritative for the caller's identity.
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// Lists the cases visible to `viewer`, together with any participant
    /// metadata the source returned alongside them.
    async fn list_cases(&self, viewer: &Identity) -> Result<CasePage>;

    /// Creates a case. The returned case carries the assigned id, status and
    /// (for remote sources) the resolved participants.
    async fn create_case(&self, viewer: &Identity, draft: CaseDraft) -> Result<FetchedCase>;

    /// Deletes a case. Terminal and irreversible.
    async fn delete_case(&self, viewer: &Identity, case_id: &str) -> Result<()>;

    /// Stores a document on a case and returns its descriptor. Local-only
    /// adapters reject this with a configuration error: document storage
    /// strictly requires a backend.
    async fn upload_document(
        &self,
        viewer: &Identity,
        case_id: &str,
        upload: DocumentUpload,
    ) -> Result<Document>;

    /// Records a reviewer decision on a document and returns the stored
    /// status. Repeatable: a later decision overwrites an earlier one.
    async fn review_document(
        &self,
        viewer: &Identity,
        case_id: &str,
        document_id: &str,
        decision: ReviewDecision,
    ) -> Result<DocumentStatus>;
}

/// Identity and short-lived credential contract.
///
/// Sign-in and sign-out transitions are handled by the surrounding shell;
/// this port only answers "who is acting" and "with what token".
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// The signed-in user, if any.
    fn identity(&self) -> Option<Identity>;

    /// A bearer token for the current identity. Fails when nobody is signed
    /// in or the token can no longer be produced.
    async fn bearer_token(&self) -> Result<String>;
}

/// Coarse upload lifecycle milestones.
///
/// The transport exposes no byte counts, so these are ordered phase markers
/// rather than percentages; a run always ends with `Done` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Preparing,
    Transferring,
    Finalizing,
    Done,
    Failed,
}

impl UploadPhase {
    /// User-facing label for the phase.
    pub fn label(self) -> &'static str {
        match self {
            UploadPhase::Preparing => "Préparation du téléversement…",
            UploadPhase::Transferring => "Téléversement…",
            UploadPhase::Finalizing => "Finalisation…",
            UploadPhase::Done => "Terminé.",
            UploadPhase::Failed => "Échec du téléversement.",
        }
    }
}

/// Receives upload phase events for user feedback. Implementations must not
/// block.
pub trait UploadProgress: Send + Sync {
    fn phase(&self, phase: UploadPhase);
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl UploadProgress for NoProgress {
    fn phase(&self, _phase: UploadPhase) {}
}
