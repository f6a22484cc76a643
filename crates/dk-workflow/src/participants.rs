//! Participant display metadata: a remote-fed override cache over static
//! seed profiles.

use dashmap::DashMap;
use dk_core::models::ParticipantProfile;

/// Resolves a user id to display metadata. Never authoritative, never does
/// I/O: the override cache is populated by whichever operation fetched case
/// data bearing participant info.
pub struct ParticipantResolver {
    /// Harvested from list/create responses; takes precedence.
    overrides: DashMap<String, ParticipantProfile>,
    /// Static fallback profiles.
    seeds: Vec<ParticipantProfile>,
}

impl ParticipantResolver {
    pub fn new(seeds: Vec<ParticipantProfile>) -> Self {
        Self {
            overrides: DashMap::new(),
            seeds,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Stores profiles harvested from a remote response. Entries with
    /// nothing to display are skipped so they cannot shadow a usable seed.
    pub fn absorb(&self, profiles: Vec<ParticipantProfile>) {
        for profile in profiles {
            if profile.id.trim().is_empty() {
                continue;
            }
            if profile.name.trim().is_empty() && profile.avatar.is_none() {
                continue;
            }
            self.overrides.insert(profile.id.clone(), profile);
        }
    }

    /// Looks up display metadata for a user id; overrides shadow seeds.
    pub fn resolve(&self, id: &str) -> Option<ParticipantProfile> {
        if id.trim().is_empty() {
            return None;
        }
        if let Some(hit) = self.overrides.get(id) {
            return Some(hit.clone());
        }
        self.seeds.iter().find(|p| p.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, name: &str) -> ParticipantProfile {
        ParticipantProfile {
            id: id.to_string(),
            name: name.to_string(),
            avatar: None,
        }
    }

    #[test]
    fn overrides_shadow_seeds() {
        let resolver = ParticipantResolver::new(vec![profile("1", "Marc-André Tremblay")]);
        assert_eq!(
            resolver.resolve("1").unwrap().name,
            "Marc-André Tremblay"
        );

        resolver.absorb(vec![profile("1", "M.-A. Tremblay (à jour)")]);
        assert_eq!(resolver.resolve("1").unwrap().name, "M.-A. Tremblay (à jour)");
    }

    #[test]
    fn unknown_and_blank_ids_resolve_to_none() {
        let resolver = ParticipantResolver::new(vec![profile("1", "Marc")]);
        assert!(resolver.resolve("nobody").is_none());
        assert!(resolver.resolve("  ").is_none());
    }

    #[test]
    fn empty_harvested_entries_do_not_shadow_seeds() {
        let resolver = ParticipantResolver::new(vec![profile("1", "Marc")]);
        resolver.absorb(vec![profile("1", "  ")]);
        assert_eq!(resolver.resolve("1").unwrap().name, "Marc");
    }
}
