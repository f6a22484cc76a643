//! # AppError
//!
//! Centralized error handling for the dossier workflow. Every variant's
//! message is already user-facing (the product speaks French to its users),
//! so callers surface `to_string()` directly when no friendlier mapping
//! exists.

use thiserror::Error;

/// The primary error type for all dk-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// The action requires a configured backend (e.g. document storage).
    #[error("{0}")]
    NotConfigured(String),

    /// No signed-in identity, or a token could not be obtained.
    #[error("{0}")]
    Unauthenticated(String),

    /// The viewer's role does not permit the action.
    #[error("{0}")]
    Forbidden(String),

    /// Input rejected before leaving the client (e.g. empty title).
    #[error("{0}")]
    Validation(String),

    /// Resource not found (case or document).
    #[error("{0} introuvable ({1})")]
    NotFound(String, String),

    /// The server answered with an error payload; its message, verbatim.
    #[error("{0}")]
    Remote(String),

    /// The request never completed (network failure, undecodable response).
    #[error("{0}")]
    Transport(String),
}

/// A specialized Result type for dossier workflow logic.
pub type Result<T> = std::result::Result<T, AppError>;
