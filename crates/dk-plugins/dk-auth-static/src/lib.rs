//! # dk-auth-static
//!
//! Static implementation of `TokenProvider`: a configured identity with a
//! pre-issued bearer token and an optional expiry instant. Stands in for the
//! platform identity provider, whose sign-in/sign-out flows live in the
//! surrounding shell — refreshing an expired token is that shell's job, so
//! here expiry is simply an authentication failure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dk_core::error::{AppError, Result};
use dk_core::models::Identity;
use dk_core::traits::TokenProvider;
use secrecy::{ExposeSecret, SecretString};

pub struct StaticTokenProvider {
    identity: Option<Identity>,
    token: Option<SecretString>,
    expires_at: Option<DateTime<Utc>>,
}

impl StaticTokenProvider {
    pub fn new(identity: Identity, token: SecretString) -> Self {
        Self {
            identity: Some(identity),
            token: Some(token),
            expires_at: None,
        }
    }

    /// A provider with nobody signed in; every token request fails.
    pub fn signed_out() -> Self {
        Self {
            identity: None,
            token: None,
            expires_at: None,
        }
    }

    /// Marks the token as usable only before `expires_at`.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    fn identity(&self) -> Option<Identity> {
        self.identity.clone()
    }

    async fn bearer_token(&self) -> Result<String> {
        let token = match (&self.identity, &self.token) {
            (Some(_), Some(token)) => token,
            _ => {
                return Err(AppError::Unauthenticated(
                    "Connectez-vous pour continuer.".to_string(),
                ))
            }
        };

        if let Some(expiry) = self.expires_at {
            if Utc::now() >= expiry {
                return Err(AppError::Unauthenticated(
                    "Impossible de récupérer le jeton de connexion.".to_string(),
                ));
            }
        }

        Ok(token.expose_secret().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use dk_core::models::Role;

    fn amine() -> Identity {
        Identity {
            id: "3".to_string(),
            name: "Amine Benhalima".to_string(),
            role: Role::Demandeur,
        }
    }

    #[tokio::test]
    async fn signed_out_provider_rejects_token_requests() {
        let provider = StaticTokenProvider::signed_out();
        assert!(provider.identity().is_none());

        let err = provider.bearer_token().await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn live_token_is_returned() {
        let provider = StaticTokenProvider::new(amine(), SecretString::from("tok-123"));
        assert_eq!(provider.bearer_token().await.unwrap(), "tok-123");
    }

    #[tokio::test]
    async fn expired_token_is_an_auth_failure() {
        let provider = StaticTokenProvider::new(amine(), SecretString::from("tok-123"))
            .with_expiry(Utc::now() - Duration::minutes(5));

        let err = provider.bearer_token().await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }
}
