//! Checklist resolution: category → ordered document slots.

use crate::models::{Category, ChecklistItem};

const ETUDES: &[ChecklistItem] = &[
    ChecklistItem {
        slot: "PASSPORT",
        label: "Pièce d'identité (passeport/CNI)",
        required: true,
    },
    ChecklistItem {
        slot: "ACCEPTANCE",
        label: "Lettre d'acceptation / Contrat",
        required: true,
    },
    ChecklistItem {
        slot: "FUNDS",
        label: "Preuve de fonds",
        required: true,
    },
];

const TRAVAIL: &[ChecklistItem] = &[
    ChecklistItem {
        slot: "PASSPORT",
        label: "Pièce d'identité (passeport/CNI)",
        required: true,
    },
    ChecklistItem {
        slot: "OFFER",
        label: "Offre d'emploi / Contrat",
        required: true,
    },
    ChecklistItem {
        slot: "CV",
        label: "CV",
        required: false,
    },
];

const INSTALLATION: &[ChecklistItem] = &[
    ChecklistItem {
        slot: "PASSPORT",
        label: "Pièce d'identité (passeport/CNI)",
        required: true,
    },
    ChecklistItem {
        slot: "ADDRESS",
        label: "Justificatif de domicile",
        required: false,
    },
];

// Immigration doubles as the fallback table: identity document, proof of
// funds, supplementary forms.
const DEFAULT: &[ChecklistItem] = &[
    ChecklistItem {
        slot: "PASSPORT",
        label: "Pièce d'identité (passeport/CNI)",
        required: true,
    },
    ChecklistItem {
        slot: "FUNDS",
        label: "Preuve de fonds",
        required: true,
    },
    ChecklistItem {
        slot: "FORMS",
        label: "Formulaires / pièces complémentaires",
        required: false,
    },
];

/// Resolves the document checklist for a case category.
///
/// Pure, total, and deterministic: every category yields the same non-empty,
/// stably-ordered slice on every call. Unrecognized wire labels already
/// collapse to [`Category::Immigration`] at parse time, so the fallback table
/// covers them too.
pub fn checklist(category: Category) -> &'static [ChecklistItem] {
    match category {
        Category::Etudes => ETUDES,
        Category::Travail => TRAVAIL,
        Category::Installation => INSTALLATION,
        Category::Immigration => DEFAULT,
    }
}
