//! dossier-kit/crates/dk-core/src/lib.rs
//!
//! The central domain logic and interface definitions for the dossier
//! workflow: case and document models, the per-category checklist, the
//! repository/identity ports, and the error taxonomy.

pub mod checklist;
pub mod error;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use checklist::*;
pub use error::*;
pub use models::*;
pub use traits::*;
