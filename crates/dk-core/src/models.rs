//! # Domain Models
//!
//! Core entities of the dossier workflow. Identifiers are plain strings
//! because the dossier API assigns them; locally-created cases carry a
//! synthesized `local-` id instead.

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// The acting user's role in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Case owner (client).
    Demandeur,
    /// Reviewer permitted to validate or reject submitted documents.
    Expert,
    Admin,
}

/// The signed-in user, as supplied by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// Service category of a case. Immutable after creation; determines the
/// document checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Immigration,
    #[serde(rename = "Études")]
    Etudes,
    Travail,
    Installation,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Immigration,
        Category::Etudes,
        Category::Travail,
        Category::Installation,
    ];

    /// Tolerant parse of a category label as it appears on the wire.
    /// Accepts the unaccented spelling of "Études"; anything unrecognized
    /// falls back to Immigration.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "études" | "etudes" => Category::Etudes,
            "travail" => Category::Travail,
            "installation" => Category::Installation,
            _ => Category::Immigration,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Immigration => "Immigration",
            Category::Etudes => "Études",
            Category::Travail => "Travail",
            Category::Installation => "Installation",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle state of a case. Driven by processes outside this workflow:
/// it is read and displayed here, never transitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    Ouvert,
    #[serde(rename = "En cours")]
    EnCours,
    #[serde(rename = "Clôturé")]
    Cloture,
}

impl CaseStatus {
    /// Tolerant parse of a status label, defaulting to Ouvert.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "en cours" => CaseStatus::EnCours,
            "clôturé" | "cloture" => CaseStatus::Cloture,
            _ => CaseStatus::Ouvert,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CaseStatus::Ouvert => "Ouvert",
            CaseStatus::EnCours => "En cours",
            CaseStatus::Cloture => "Clôturé",
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Stored review state of an uploaded document.
///
/// There is no stored "missing" value: a slot with no document at all is
/// reported as [`SlotStatus::Missing`] by the detail view-model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Pending,
    Validated,
    Rejected,
}

/// Effective state of a checklist slot, including the absence of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Missing,
    Pending,
    Validated,
    Rejected,
}

impl SlotStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SlotStatus::Missing => "MISSING",
            SlotStatus::Pending => "PENDING",
            SlotStatus::Validated => "VALIDATED",
            SlotStatus::Rejected => "REJECTED",
        }
    }
}

impl From<DocumentStatus> for SlotStatus {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Pending => SlotStatus::Pending,
            DocumentStatus::Validated => SlotStatus::Validated,
            DocumentStatus::Rejected => SlotStatus::Rejected,
        }
    }
}

/// A reviewer's verdict on a submitted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Validated,
    Rejected,
}

impl ReviewDecision {
    pub fn status(self) -> DocumentStatus {
        match self {
            ReviewDecision::Validated => DocumentStatus::Validated,
            ReviewDecision::Rejected => DocumentStatus::Rejected,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            ReviewDecision::Validated => "VALIDATED",
            ReviewDecision::Rejected => "REJECTED",
        }
    }
}

/// An uploaded file attached to a case.
///
/// Immutable except for `status`, which moves only through explicit reviewer
/// decisions (and resets to Pending when a replacement lands in its slot).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    pub status: DocumentStatus,
    /// MIME type or coarse category string ("PDF", "FILE") reported by the
    /// API.
    #[serde(rename = "type")]
    pub kind: String,
    pub updated_at: DateTime<Utc>,
    /// Storage location; may be relative to the API base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Checklist slot tag. None marks a free-form extra attachment that is
    /// appended rather than replacing anything.
    #[serde(default)]
    pub slot: Option<String>,
}

/// A unit of work owned by a requester, optionally assigned to an expert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Owner; immutable after creation.
    pub requester_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expert_id: Option<String>,
    /// Immutable after creation; drives the checklist.
    pub category: Category,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
    /// Display string ("250$ - 400$"); no arithmetic is ever done on it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    /// Most-recent-first.
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl Case {
    /// Merges an uploaded document into the attachment list.
    ///
    /// A document carrying a slot replaces the current holder of that slot
    /// (no history is kept); the new document always lands at the front.
    /// Slot-less extras never displace anything.
    pub fn merge_document(&mut self, doc: Document) {
        if let Some(slot) = doc.slot.clone() {
            self.documents
                .retain(|d| d.slot.as_deref() != Some(slot.as_str()));
        }
        self.documents.insert(0, doc);
    }

    /// The current document occupying a checklist slot, if any.
    pub fn document_for_slot(&self, slot: &str) -> Option<&Document> {
        self.documents
            .iter()
            .find(|d| d.slot.as_deref() == Some(slot))
    }

    /// Applies a reviewer decision in place. Only `status` changes; returns
    /// false when the document is not on this case.
    pub fn set_document_status(&mut self, document_id: &str, status: DocumentStatus) -> bool {
        match self.documents.iter_mut().find(|d| d.id == document_id) {
            Some(doc) => {
                doc.status = status;
                true
            }
            None => false,
        }
    }
}

/// One entry of a category's document checklist. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub slot: &'static str,
    pub label: &'static str,
    pub required: bool,
}

/// Display metadata for a user id. A cache entry, never authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantProfile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Input of the create-case operation.
#[derive(Debug, Clone, Serialize)]
pub struct CaseDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
}

/// A file handed to the upload orchestrator.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: Option<mime::Mime>,
    pub data: Bytes,
    /// Target checklist slot; None appends the file as an extra attachment.
    pub slot: Option<String>,
}

impl DocumentUpload {
    /// The document `type` value to fall back to when the server omits one.
    pub fn kind_label(&self) -> String {
        self.content_type
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "FILE".to_string())
    }
}

/// A repository page: cases plus the participant metadata harvested from the
/// same response, so callers can feed their display cache.
#[derive(Debug, Clone, Default)]
pub struct CasePage {
    pub cases: Vec<Case>,
    pub participants: Vec<ParticipantProfile>,
}

/// A single fetched or created case with its harvested participants.
#[derive(Debug, Clone)]
pub struct FetchedCase {
    pub case: Case,
    pub participants: Vec<ParticipantProfile>,
}

/// Parses the API's mixed timestamp formats: RFC 3339 first, then a plain
/// `YYYY-MM-DD` date at midnight UTC. Unparseable input resolves to now, the
/// same last resort the upload path uses for missing timestamps.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw.trim()) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        return DateTime::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc);
    }
    Utc::now()
}
