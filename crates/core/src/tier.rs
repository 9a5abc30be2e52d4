//! Trust tiers and the externally-configured tier vocabulary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A discrete trust level.
///
/// Tiers are independent grants, not a hierarchy: the resolver compares a
/// claimed tier against the authoritative record with equality, never with
/// an ordering. `Guest` is the anonymous identity and has no backing record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Guest,
    Standard,
    Privileged,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Guest, Tier::Standard, Tier::Privileged];
}

impl core::fmt::Display for Tier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Tier::Guest => f.write_str("guest"),
            Tier::Standard => f.write_str("standard"),
            Tier::Privileged => f.write_str("privileged"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VocabularyError {
    #[error("tier label for {0} is empty")]
    EmptyLabel(Tier),

    #[error("tier labels must be distinct: '{0}' is used twice")]
    DuplicateLabel(String),
}

/// The wire vocabulary for tiers.
///
/// Token claims and deployment configuration speak in labels, not in the
/// `Tier` enum, so the label set can vary per environment. Construction is
/// validated once at configuration-load time; after that an unrecognized
/// label can only mean an untrusted token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierVocabulary {
    guest: String,
    standard: String,
    privileged: String,
}

impl TierVocabulary {
    pub fn new(
        guest: impl Into<String>,
        standard: impl Into<String>,
        privileged: impl Into<String>,
    ) -> Result<Self, VocabularyError> {
        let vocab = Self {
            guest: guest.into(),
            standard: standard.into(),
            privileged: privileged.into(),
        };

        for tier in Tier::ALL {
            if vocab.label(tier).is_empty() {
                return Err(VocabularyError::EmptyLabel(tier));
            }
        }
        if vocab.guest == vocab.standard || vocab.standard == vocab.privileged {
            return Err(VocabularyError::DuplicateLabel(vocab.standard));
        }
        if vocab.guest == vocab.privileged {
            return Err(VocabularyError::DuplicateLabel(vocab.privileged));
        }

        Ok(vocab)
    }

    /// The label a token carries for `tier`.
    pub fn label(&self, tier: Tier) -> &str {
        match tier {
            Tier::Guest => &self.guest,
            Tier::Standard => &self.standard,
            Tier::Privileged => &self.privileged,
        }
    }

    /// Resolve a wire label back to a tier. `None` means the label is not
    /// part of this deployment's vocabulary and the token cannot be trusted.
    pub fn resolve(&self, label: &str) -> Option<Tier> {
        Tier::ALL.into_iter().find(|t| self.label(*t) == label)
    }
}

impl Default for TierVocabulary {
    fn default() -> Self {
        Self {
            guest: "guest".to_string(),
            standard: "user".to_string(),
            privileged: "admin".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary_round_trips_every_tier() {
        let vocab = TierVocabulary::default();
        for tier in Tier::ALL {
            assert_eq!(vocab.resolve(vocab.label(tier)), Some(tier));
        }
    }

    #[test]
    fn unknown_label_resolves_to_none() {
        let vocab = TierVocabulary::default();
        assert_eq!(vocab.resolve("superuser"), None);
        assert_eq!(vocab.resolve(""), None);
    }

    #[test]
    fn empty_label_is_rejected() {
        let err = TierVocabulary::new("guest", "", "admin").unwrap_err();
        assert_eq!(err, VocabularyError::EmptyLabel(Tier::Standard));
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let err = TierVocabulary::new("member", "member", "admin").unwrap_err();
        assert_eq!(err, VocabularyError::DuplicateLabel("member".to_string()));

        let err = TierVocabulary::new("admin", "user", "admin").unwrap_err();
        assert_eq!(err, VocabularyError::DuplicateLabel("admin".to_string()));
    }

    #[test]
    fn environment_specific_labels_are_honored() {
        let vocab = TierVocabulary::new("anon", "member", "operator").unwrap();
        assert_eq!(vocab.resolve("operator"), Some(Tier::Privileged));
        // The built-in names are not magic once a vocabulary is configured.
        assert_eq!(vocab.resolve("admin"), None);
    }
}
