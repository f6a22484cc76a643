//! Case detail view-model: what the detail pane shows and which actions the
//! acting user may take, derived from a case and the viewer's role.

use dk_core::checklist::checklist;
use dk_core::models::{Case, ChecklistItem, Document, Identity, ParticipantProfile, Role, SlotStatus};

use crate::participants::ParticipantResolver;

/// Actions enabled for one checklist row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowActions {
    /// Requester: upload or replace the slot's document.
    pub can_upload: bool,
    /// Expert: validate or reject. Requires an existing document — a
    /// decision on a missing slot is a no-op and is not offered.
    pub can_review: bool,
    /// Anyone: open the stored file. Requires a non-empty url.
    pub can_download: bool,
}

/// One checklist item with its matching document, if any.
#[derive(Debug, Clone)]
pub struct ChecklistRow {
    pub item: ChecklistItem,
    pub document: Option<Document>,
    /// `Missing` when no document occupies the slot.
    pub status: SlotStatus,
    pub actions: RowActions,
}

/// A participant line: the resolved profile plus the deterministic one-letter
/// placeholder shown when no avatar is available.
#[derive(Debug, Clone)]
pub struct ParticipantRow {
    pub user_id: Option<String>,
    pub profile: Option<ParticipantProfile>,
    pub initial: char,
}

impl ParticipantRow {
    fn build(user_id: Option<&str>, resolver: &ParticipantResolver, fallback: char) -> Self {
        let profile = user_id.and_then(|id| resolver.resolve(id));
        let initial = match (user_id, &profile) {
            (None, _) => '—',
            (Some(_), Some(p)) => p
                .name
                .chars()
                .next()
                .and_then(|c| c.to_uppercase().next())
                .unwrap_or(fallback),
            (Some(_), None) => fallback,
        };
        Self {
            user_id: user_id.map(str::to_string),
            profile,
            initial,
        }
    }
}

/// Required-slot progress for a case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChecklistProgress {
    /// Required slots with a document in place, whatever its status.
    pub provided: usize,
    /// Required slots whose document has been validated.
    pub validated: usize,
    pub required: usize,
}

#[derive(Debug, Clone)]
pub struct CaseDetail {
    pub rows: Vec<ChecklistRow>,
    /// Every current attachment: the per-slot winners plus slot-less extras.
    pub attachments: Vec<Document>,
    pub requester: ParticipantRow,
    pub expert: ParticipantRow,
    pub progress: ChecklistProgress,
}

impl CaseDetail {
    /// Derives the detail view of `case` as seen by `viewer`.
    pub fn build(case: &Case, viewer: &Identity, resolver: &ParticipantResolver) -> Self {
        let rows: Vec<ChecklistRow> = checklist(case.category)
            .iter()
            .map(|item| {
                let document = case.document_for_slot(item.slot).cloned();
                let status = document
                    .as_ref()
                    .map(|d| SlotStatus::from(d.status))
                    .unwrap_or(SlotStatus::Missing);
                let actions = RowActions {
                    can_upload: viewer.role == Role::Demandeur,
                    can_review: viewer.role == Role::Expert && document.is_some(),
                    can_download: document
                        .as_ref()
                        .and_then(|d| d.url.as_deref())
                        .map(str::trim)
                        .is_some_and(|u| !u.is_empty()),
                };
                ChecklistRow {
                    item: *item,
                    document,
                    status,
                    actions,
                }
            })
            .collect();

        let mut progress = ChecklistProgress::default();
        for row in rows.iter().filter(|r| r.item.required) {
            progress.required += 1;
            if row.document.is_some() {
                progress.provided += 1;
            }
            if row.status == SlotStatus::Validated {
                progress.validated += 1;
            }
        }

        Self {
            rows,
            attachments: case.documents.clone(),
            requester: ParticipantRow::build(Some(&case.requester_id), resolver, 'D'),
            expert: ParticipantRow::build(case.expert_id.as_deref(), resolver, 'E'),
            progress,
        }
    }
}
