//! Wire types of the dossier API and their mapping onto the domain models.
//!
//! Mapping is tolerant where the API has historically been loose: unknown
//! categories collapse to Immigration, unknown case statuses to Ouvert, and
//! gaps in an upload response are filled from the submitted file.

use chrono::Utc;
use dk_core::models::{
    parse_timestamp, Case, CaseStatus, Category, Document, DocumentStatus, DocumentUpload,
    ParticipantProfile,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error payload shared by every endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope {
    #[serde(default)]
    pub items: Vec<DossierDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemEnvelope {
    #[serde(default)]
    pub item: Option<DossierDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadEnvelope {
    #[serde(default)]
    pub item: Option<UploadedDocumentDto>,
}

/// Acknowledgement of a review decision. Decoded only to confirm the body is
/// well-formed; the stored status is the decision we sent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ReviewAck {
    pub ok: Option<bool>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateDossierBody<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PartyDto {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl PartyDto {
    fn profile(&self) -> ParticipantProfile {
        ParticipantProfile {
            id: self.id.clone(),
            name: self.full_name.clone(),
            avatar: self
                .avatar_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocumentDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub slot: Option<String>,
    pub status: DocumentStatus,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl DocumentDto {
    pub fn into_document(self) -> Document {
        Document {
            id: self.id,
            name: self.name,
            status: self.status,
            kind: self.kind.unwrap_or_else(|| "FILE".to_string()),
            updated_at: self
                .updated_at
                .as_deref()
                .map(parse_timestamp)
                .unwrap_or_else(Utc::now),
            url: self.url.filter(|u| !u.trim().is_empty()),
            slot: self.slot,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DossierDto {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    pub requester: PartyDto,
    pub professional: PartyDto,
    #[serde(default)]
    pub documents: Vec<DocumentDto>,
}

impl DossierDto {
    /// Splits the wire item into the case and the participant profiles it
    /// carried, so the caller can feed its display cache.
    pub fn into_parts(self) -> (Case, Vec<ParticipantProfile>) {
        let participants = vec![self.requester.profile(), self.professional.profile()];

        let case = Case {
            id: self.id,
            title: self.title,
            description: self.description,
            requester_id: self.requester.id,
            expert_id: Some(self.professional.id).filter(|id| !id.trim().is_empty()),
            category: Category::from_label(self.category.as_deref().unwrap_or_default()),
            status: CaseStatus::from_label(self.status.as_deref().unwrap_or_default()),
            created_at: self
                .created_at
                .as_deref()
                .map(parse_timestamp)
                .unwrap_or_else(Utc::now),
            budget: self.budget,
            documents: self
                .documents
                .into_iter()
                .map(DocumentDto::into_document)
                .collect(),
        };

        (case, participants)
    }
}

/// Upload response: every field is optional, and gaps are filled from the
/// file that was submitted. The slot deliberately comes from the response
/// alone — a server that omits it has stored an extra attachment, and the
/// merge must not displace the current slot holder.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct UploadedDocumentDto {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub mime_type: Option<String>,
    pub status: Option<DocumentStatus>,
    pub updated_at: Option<String>,
    pub slot: Option<String>,
}

impl UploadedDocumentDto {
    pub fn into_document(self, upload: &DocumentUpload) -> Document {
        Document {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| format!("doc-{}", Uuid::new_v4())),
            name: self
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| upload.file_name.clone()),
            status: self.status.unwrap_or(DocumentStatus::Pending),
            kind: self
                .mime_type
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| upload.kind_label()),
            updated_at: self
                .updated_at
                .as_deref()
                .map(parse_timestamp)
                .unwrap_or_else(Utc::now),
            url: self.url.filter(|u| !u.trim().is_empty()),
            slot: self.slot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn dossier_item_maps_to_case_and_participants() {
        let json = serde_json::json!({
            "id": "dos-42",
            "title": "Permis de travail",
            "description": "Offre signée, visa à monter",
            "status": "En cours",
            "category": "travail",
            "createdAt": "2024-06-01T09:00:00Z",
            "requester": { "id": "u-9", "fullName": "Awa Diallo", "avatarUrl": null },
            "professional": { "id": "u-1", "fullName": "Marc-André Tremblay", "avatarUrl": "https://cdn/avatars/u-1.png" },
            "documents": [
                { "id": "d-1", "name": "offre.pdf", "url": "/files/d-1", "slot": "OFFER",
                  "status": "VALIDATED", "type": "application/pdf", "updatedAt": "2024-06-02T10:00:00Z" }
            ]
        });

        let dto: DossierDto = serde_json::from_value(json).unwrap();
        let (case, participants) = dto.into_parts();

        assert_eq!(case.category, Category::Travail);
        assert_eq!(case.status, CaseStatus::EnCours);
        assert_eq!(case.expert_id.as_deref(), Some("u-1"));
        assert_eq!(case.documents.len(), 1);
        assert_eq!(case.documents[0].status, DocumentStatus::Validated);
        assert_eq!(case.documents[0].url.as_deref(), Some("/files/d-1"));

        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0].id, "u-9");
        assert!(participants[0].avatar.is_none());
        assert!(participants[1].avatar.is_some());
    }

    #[test]
    fn unknown_labels_collapse_to_defaults() {
        let json = serde_json::json!({
            "id": "dos-1",
            "title": "t",
            "description": "d",
            "status": "ARCHIVED",
            "category": "Autre chose",
            "requester": { "id": "u-9", "fullName": "A" },
            "professional": { "id": "", "fullName": "" }
        });

        let (case, _) = serde_json::from_value::<DossierDto>(json)
            .unwrap()
            .into_parts();
        assert_eq!(case.category, Category::Immigration);
        assert_eq!(case.status, CaseStatus::Ouvert);
        assert!(case.expert_id.is_none());
        assert!(case.documents.is_empty());
    }

    #[test]
    fn upload_gaps_are_filled_from_the_file() {
        let upload = DocumentUpload {
            file_name: "passeport.png".to_string(),
            content_type: Some(mime::IMAGE_PNG),
            data: Bytes::from_static(b"png"),
            slot: Some("PASSPORT".to_string()),
        };

        let doc = UploadedDocumentDto::default().into_document(&upload);
        assert!(doc.id.starts_with("doc-"));
        assert_eq!(doc.name, "passeport.png");
        assert_eq!(doc.kind, "image/png");
        assert_eq!(doc.status, DocumentStatus::Pending);
        assert!(doc.url.is_none());
        // Missing slot in the response means the server stored an extra
        // attachment, whatever slot was requested.
        assert!(doc.slot.is_none());
    }

    #[test]
    fn upload_response_wins_over_the_file() {
        let upload = DocumentUpload {
            file_name: "scan.jpg".to_string(),
            content_type: None,
            data: Bytes::from_static(b"jpg"),
            slot: None,
        };

        let dto: UploadedDocumentDto = serde_json::from_value(serde_json::json!({
            "id": "d-7",
            "name": "Passeport.jpg",
            "url": "/files/d-7",
            "mimeType": "image/jpeg",
            "status": "PENDING",
            "updatedAt": "2024-06-03T08:00:00Z",
            "slot": "PASSPORT"
        }))
        .unwrap();

        let doc = dto.into_document(&upload);
        assert_eq!(doc.id, "d-7");
        assert_eq!(doc.name, "Passeport.jpg");
        assert_eq!(doc.kind, "image/jpeg");
        assert_eq!(doc.slot.as_deref(), Some("PASSPORT"));
        assert_eq!(doc.url.as_deref(), Some("/files/d-7"));
    }

    #[test]
    fn error_envelope_tolerates_any_shape() {
        let with: ErrorEnvelope =
            serde_json::from_str(r#"{"error":"Jeton invalide"}"#).unwrap();
        assert_eq!(with.error.as_deref(), Some("Jeton invalide"));

        let without: ErrorEnvelope = serde_json::from_str("{}").unwrap();
        assert!(without.error.is_none());
    }
}
