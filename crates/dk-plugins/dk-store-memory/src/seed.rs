//! Seed data shown in local-only mode: a demo case and the participant
//! profiles it references.

use dk_core::models::{
    parse_timestamp, Case, CaseStatus, Category, Document, DocumentStatus, ParticipantProfile,
};
use once_cell::sync::Lazy;

static SEED_PARTICIPANTS: Lazy<Vec<ParticipantProfile>> = Lazy::new(|| {
    vec![
        ParticipantProfile {
            id: "1".to_string(),
            name: "Marc-André Tremblay".to_string(),
            avatar: Some("https://i.pravatar.cc/150?u=marc".to_string()),
        },
        ParticipantProfile {
            id: "2".to_string(),
            name: "Sophie Lévesque".to_string(),
            avatar: Some("https://i.pravatar.cc/150?u=sophie".to_string()),
        },
        ParticipantProfile {
            id: "3".to_string(),
            name: "Amine Benhalima".to_string(),
            avatar: Some("https://i.pravatar.cc/150?u=amine".to_string()),
        },
    ]
});

/// Static fallback profiles for the participant resolver.
pub fn seed_participants() -> Vec<ParticipantProfile> {
    SEED_PARTICIPANTS.clone()
}

/// The demo cases. Their documents predate the checklist slots, so they
/// surface as extra attachments rather than slot holders.
pub fn seed_cases() -> Vec<Case> {
    vec![Case {
        id: "r1".to_string(),
        title: "Révision Dossier Permis d'Études".to_string(),
        description: "J'ai ma lettre d'acceptation de l'UQAM, j'ai besoin d'une relecture finale \
                      de mes preuves financières."
            .to_string(),
        requester_id: "3".to_string(),
        expert_id: Some("1".to_string()),
        category: Category::Etudes,
        status: CaseStatus::EnCours,
        created_at: parse_timestamp("2024-05-25"),
        budget: Some("250$ - 400$".to_string()),
        documents: vec![
            Document {
                id: "d1".to_string(),
                name: "Lettre_Acceptation_UQAM.pdf".to_string(),
                status: DocumentStatus::Validated,
                kind: "PDF".to_string(),
                updated_at: parse_timestamp("2024-05-25"),
                url: None,
                slot: None,
            },
            Document {
                id: "d2".to_string(),
                name: "Preuve_Fonds_Bancaire.pdf".to_string(),
                status: DocumentStatus::Pending,
                kind: "PDF".to_string(),
                updated_at: parse_timestamp("2024-05-26"),
                url: None,
                slot: None,
            },
        ],
    }]
}
