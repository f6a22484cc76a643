//! # dk-store-rest
//!
//! REST implementation of `CaseRepository` over the dossier API. The server
//! is authoritative: list answers are already scoped to the caller's
//! identity, so no client-side role filtering happens here.
//!
//! Every call acquires a bearer token from the `TokenProvider` port first
//! and fails fast when none is available. Error bodies are decoded as
//! `{"error": "..."}` and surfaced verbatim; when a response carries no
//! usable message, a per-operation fallback is shown instead.

use std::sync::Arc;

use async_trait::async_trait;
use dk_core::error::{AppError, Result};
use dk_core::models::{
    CaseDraft, CasePage, Document, DocumentStatus, DocumentUpload, FetchedCase, Identity,
    ParticipantProfile, ReviewDecision,
};
use dk_core::traits::{CaseRepository, TokenProvider};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

mod dto;

/// Route prefix of the dossier API, joined onto the configured base URL.
const API_PREFIX: &str = "/api/v3";

const LOAD_FAILED: &str = "Erreur lors du chargement des dossiers";
const CREATE_FAILED: &str = "Impossible de créer le dossier";
const DELETE_FAILED: &str = "Impossible de supprimer le dossier";
const UPLOAD_FAILED: &str = "Erreur lors de l'upload";
const REVIEW_FAILED: &str = "Erreur de mise à jour";

pub struct RestCaseRepository {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl RestCaseRepository {
    /// `base_url` is the server origin; the API prefix is appended here.
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }
}

fn transport(err: reqwest::Error, fallback: &str) -> AppError {
    tracing::warn!(error = %err, "dossier API request failed");
    AppError::Transport(fallback.to_string())
}

/// Turns an unsuccessful response into the server's error message, or the
/// per-operation fallback when the body carries none.
async fn error_from(res: Response, fallback: &str) -> AppError {
    let status = res.status();
    let message = res
        .json::<dto::ErrorEnvelope>()
        .await
        .ok()
        .and_then(|envelope| envelope.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    tracing::warn!(%status, message, "dossier API error");
    AppError::Remote(message)
}

async fn decode<T: DeserializeOwned>(res: Response, fallback: &str) -> Result<T> {
    if !res.status().is_success() {
        return Err(error_from(res, fallback).await);
    }
    res.json::<T>().await.map_err(|err| {
        tracing::warn!(error = %err, "undecodable dossier API response");
        AppError::Remote("Réponse invalide du serveur".to_string())
    })
}

#[async_trait]
impl CaseRepository for RestCaseRepository {
    async fn list_cases(&self, _viewer: &Identity) -> Result<CasePage> {
        let token = self.tokens.bearer_token().await?;
        let res = self
            .http
            .get(self.endpoint("/dossiers"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport(e, LOAD_FAILED))?;

        let envelope: dto::ListEnvelope = decode(res, LOAD_FAILED).await?;

        let mut cases = Vec::with_capacity(envelope.items.len());
        let mut participants: Vec<ParticipantProfile> = Vec::new();
        for item in envelope.items {
            let (case, mut people) = item.into_parts();
            cases.push(case);
            participants.append(&mut people);
        }

        tracing::debug!(count = cases.len(), "dossiers fetched");
        Ok(CasePage {
            cases,
            participants,
        })
    }

    async fn create_case(&self, _viewer: &Identity, draft: CaseDraft) -> Result<FetchedCase> {
        let token = self.tokens.bearer_token().await?;
        let res = self
            .http
            .post(self.endpoint("/dossiers"))
            .bearer_auth(token)
            .json(&dto::CreateDossierBody {
                title: &draft.title,
                description: &draft.description,
                category: draft.category.label(),
            })
            .send()
            .await
            .map_err(|e| transport(e, CREATE_FAILED))?;

        let envelope: dto::ItemEnvelope = decode(res, CREATE_FAILED).await?;
        let item = envelope
            .item
            .ok_or_else(|| AppError::Remote("Réponse invalide du serveur".to_string()))?;

        let (case, participants) = item.into_parts();
        Ok(FetchedCase {
            case,
            participants,
        })
    }

    async fn delete_case(&self, _viewer: &Identity, case_id: &str) -> Result<()> {
        let token = self.tokens.bearer_token().await?;
        let res = self
            .http
            .delete(self.endpoint(&format!("/dossiers/{case_id}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport(e, DELETE_FAILED))?;

        if res.status().is_success() {
            return Ok(());
        }
        Err(error_from(res, DELETE_FAILED).await)
    }

    async fn upload_document(
        &self,
        _viewer: &Identity,
        case_id: &str,
        upload: DocumentUpload,
    ) -> Result<Document> {
        let token = self.tokens.bearer_token().await?;

        let mut part = Part::stream(reqwest::Body::from(upload.data.clone()))
            .file_name(upload.file_name.clone());
        if let Some(content_type) = &upload.content_type {
            part = part
                .mime_str(content_type.as_ref())
                .map_err(|e| transport(e, UPLOAD_FAILED))?;
        }

        let mut form = Form::new().part("file", part);
        if let Some(slot) = &upload.slot {
            form = form.text("slot", slot.clone());
        }

        let res = self
            .http
            .post(self.endpoint(&format!("/dossiers/{case_id}/documents")))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport(e, UPLOAD_FAILED))?;

        let envelope: dto::UploadEnvelope = decode(res, UPLOAD_FAILED).await?;
        Ok(envelope.item.unwrap_or_default().into_document(&upload))
    }

    async fn review_document(
        &self,
        _viewer: &Identity,
        case_id: &str,
        document_id: &str,
        decision: ReviewDecision,
    ) -> Result<DocumentStatus> {
        let token = self.tokens.bearer_token().await?;
        let res = self
            .http
            .patch(self.endpoint(&format!(
                "/dossiers/{case_id}/documents/{document_id}/status"
            )))
            .bearer_auth(token)
            .json(&serde_json::json!({ "status": decision.as_wire() }))
            .send()
            .await
            .map_err(|e| transport(e, REVIEW_FAILED))?;

        let ack: dto::ReviewAck = decode(res, REVIEW_FAILED).await?;
        tracing::debug!(ok = ?ack.ok, status = ?ack.status, document_id, "review acknowledged");
        Ok(decision.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dk_core::models::Role;
    use dk_core::traits::MockTokenProvider;

    #[test]
    fn endpoints_join_base_and_prefix() {
        let tokens: Arc<dyn TokenProvider> = Arc::new(MockTokenProvider::new());
        let repo = RestCaseRepository::new(" https://api.capitune.example/ ", tokens);

        assert_eq!(
            repo.endpoint("/dossiers"),
            "https://api.capitune.example/api/v3/dossiers"
        );
        assert_eq!(
            repo.endpoint("/dossiers/dos-1/documents/d-2/status"),
            "https://api.capitune.example/api/v3/dossiers/dos-1/documents/d-2/status"
        );
    }

    #[tokio::test]
    async fn missing_token_fails_before_any_request() {
        let mut tokens = MockTokenProvider::new();
        tokens.expect_bearer_token().returning(|| {
            Err(AppError::Unauthenticated(
                "Connectez-vous pour continuer.".to_string(),
            ))
        });

        // The base url points nowhere; the auth failure must short-circuit
        // before the transport is touched.
        let repo = RestCaseRepository::new("http://127.0.0.1:0", Arc::new(tokens));
        let viewer = Identity {
            id: "3".to_string(),
            name: String::new(),
            role: Role::Demandeur,
        };

        let err = repo.list_cases(&viewer).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }
}
