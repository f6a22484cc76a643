//! # dossier-kit binary
//!
//! Assembles the workflow from configuration and walks the visible case set.
//! A smoke surface for the library crates, not a product UI: the real client
//! embeds `dk-workflow` directly.

use std::sync::Arc;

use anyhow::{bail, Context};
use dk_configs::{BackendMode, Settings};
use dk_core::models::{Identity, ParticipantProfile, Role};
use dk_core::traits::{CaseRepository, TokenProvider};
use dk_workflow::{CaseDetail, CaseFilter, CaseStore, ParticipantResolver};

// Feature-gated imports: the binary only links the plugins it was built with.
#[cfg(feature = "auth-static")]
use dk_auth_static::StaticTokenProvider;
#[cfg(feature = "store-memory")]
use dk_store_memory::MemoryCaseRepository;
#[cfg(feature = "store-rest")]
use dk_store_rest::RestCaseRepository;

fn parse_role(raw: &str) -> anyhow::Result<Role> {
    match raw.trim().to_uppercase().as_str() {
        "DEMANDEUR" => Ok(Role::Demandeur),
        "EXPERT" => Ok(Role::Expert),
        "ADMIN" => Ok(Role::Admin),
        other => bail!("unknown role {other:?} (expected DEMANDEUR, EXPERT or ADMIN)"),
    }
}

fn seed_profiles() -> Vec<ParticipantProfile> {
    #[cfg(feature = "store-memory")]
    {
        dk_store_memory::seed::seed_participants()
    }
    #[cfg(not(feature = "store-memory"))]
    {
        Vec::new()
    }
}

fn build_provider(
    token: Option<secrecy::SecretString>,
    identity: Identity,
) -> anyhow::Result<Arc<dyn TokenProvider>> {
    #[cfg(feature = "auth-static")]
    {
        let provider = match token {
            Some(token) => StaticTokenProvider::new(identity, token),
            None => StaticTokenProvider::signed_out(),
        };
        Ok(Arc::new(provider))
    }
    #[cfg(not(feature = "auth-static"))]
    {
        let _ = (token, identity);
        bail!("no auth plugin compiled in")
    }
}

fn build_repository(
    settings: &Settings,
    tokens: Arc<dyn TokenProvider>,
) -> anyhow::Result<Arc<dyn CaseRepository>> {
    match settings.backend {
        BackendMode::Memory => {
            #[cfg(feature = "store-memory")]
            {
                let _ = &tokens;
                Ok(Arc::new(MemoryCaseRepository::new()))
            }
            #[cfg(not(feature = "store-memory"))]
            {
                bail!("backend \"memory\" requested but the store-memory plugin is not compiled in")
            }
        }
        BackendMode::Rest => {
            #[cfg(feature = "store-rest")]
            {
                let base = settings
                    .api_base()
                    .context("backend \"rest\" requires api_base_url")?;
                Ok(Arc::new(RestCaseRepository::new(base, tokens)))
            }
            #[cfg(not(feature = "store-rest"))]
            {
                bail!("backend \"rest\" requested but the store-rest plugin is not compiled in")
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut settings = Settings::load().context("failed to load configuration")?;

    let identity = match &settings.identity {
        Some(cfg) => Identity {
            id: cfg.id.clone(),
            name: cfg.name.clone(),
            role: parse_role(&cfg.role)?,
        },
        // Demo identity: the seed requester.
        None => Identity {
            id: "3".to_string(),
            name: "Amine Benhalima".to_string(),
            role: Role::Demandeur,
        },
    };

    let provider = build_provider(settings.bearer_token.take(), identity.clone())?;
    let repo = build_repository(&settings, provider)?;

    let resolver = Arc::new(ParticipantResolver::new(seed_profiles()));
    let mut store = CaseStore::new(repo, resolver, identity)
        .with_reference_prefixes(settings.reference_prefixes.clone());
    if let Some(base) = settings.api_base() {
        store = store.with_api_base(base);
    }

    store.refresh().await?;
    tracing::info!(cases = store.cases().len(), "dossiers visibles");

    for case in store.visible(&CaseFilter::default()) {
        let detail = CaseDetail::build(case, store.viewer(), store.resolver());
        tracing::info!(
            id = %case.id,
            titre = %case.title,
            categorie = %case.category,
            statut = %case.status,
            pieces_fournies = detail.progress.provided,
            pieces_requises = detail.progress.required,
            "dossier"
        );
    }

    Ok(())
}
