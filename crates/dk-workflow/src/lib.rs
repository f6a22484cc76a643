//! # dk-workflow
//!
//! The services of the dossier workflow, built on the dk-core ports: the
//! session case store, the upload orchestrator, the case-detail view-model,
//! and the participant resolver. Which repository sits behind them is decided
//! once at startup; nothing here feature-detects a backend.

pub mod detail;
pub mod participants;
pub mod store;
pub mod upload;

pub use detail::{CaseDetail, ChecklistProgress, ChecklistRow, ParticipantRow, RowActions};
pub use participants::ParticipantResolver;
pub use store::{CaseFilter, CaseStore};
pub use upload::{upload_from_file, UploadOrchestrator, UploadTarget};
