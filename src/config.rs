//! Search and rewrite policy.
//!
//! Policies are plain serde structs. They persist as CBOR, like every other
//! on-disk artifact of the crate, through the [`Policy`] trait.

use crate::list::constants::DEFAULT_MAX_REWRITE_ROUNDS;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error loading or saving a policy.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config encoding failed: {0}")]
    Cbor(#[from] serde_cbor::Error),
    #[error("config file access failed: {0}")]
    Io(#[from] std::io::Error),
}

/// CBOR persistence shared by all policies.
pub trait Policy: Serialize + DeserializeOwned {
    /// Serializes the policy to CBOR bytes.
    fn to_cbor(&self) -> Result<Vec<u8>, ConfigError> {
        Ok(serde_cbor::to_vec(self)?)
    }

    /// Deserializes a policy from CBOR bytes.
    ///
    /// Missing fields take their default values.
    fn from_cbor(bytes: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_cbor::from_slice(bytes)?)
    }

    /// Saves the policy to a file.
    fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let bytes = self.to_cbor()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Loads a policy from a file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path)?;
        Self::from_cbor(&bytes)
    }
}

/// Policy for sequence matching.
///
/// The default search is unbounded, which explores the full candidate space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum number of candidates pulled across all positions of the
    /// search, nested lists included, if bounded.
    pub max_steps: Option<u64>,
}

impl MatchConfig {
    /// Returns this policy with the search bounded to `max_steps` candidates.
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

impl Policy for MatchConfig {}

/// Policy for fixed-point rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Maximum number of changing passes before giving up.
    pub max_rounds: u32,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_REWRITE_ROUNDS,
        }
    }
}

impl Policy for RewriteConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.max_steps, None);
        assert_eq!(RewriteConfig::default().max_rounds, 64);
        assert_eq!(config.with_max_steps(7).max_steps, Some(7));
    }

    #[test]
    fn test_cbor_is_stable() {
        let config = MatchConfig::default().with_max_steps(1_000);
        let bytes = config.to_cbor().expect("serialization should succeed");
        let decoded = MatchConfig::from_cbor(&bytes).expect("deserialization should succeed");
        assert_eq!(decoded, config);
        assert_eq!(decoded.to_cbor().expect("second serialization should succeed"), bytes);
    }

    #[test]
    fn test_missing_fields_default() {
        let empty: BTreeMap<&str, u64> = BTreeMap::new();
        let bytes = serde_cbor::to_vec(&empty).unwrap();
        assert_eq!(MatchConfig::from_cbor(&bytes).unwrap(), MatchConfig::default());
        assert_eq!(RewriteConfig::from_cbor(&bytes).unwrap(), RewriteConfig::default());
    }

    #[test]
    fn test_file_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let config = MatchConfig {
            max_steps: Some(42),
        };
        config.save_to_file(file.path()).unwrap();
        assert_eq!(MatchConfig::load_from_file(file.path()).unwrap(), config);

        let rewrite = RewriteConfig { max_rounds: 8 };
        rewrite.save_to_file(file.path()).unwrap();
        assert_eq!(RewriteConfig::load_from_file(file.path()).unwrap(), rewrite);
    }

    #[test]
    fn test_errors() {
        let err = MatchConfig::from_cbor(&[0x61, b'x']).unwrap_err();
        assert!(matches!(err, ConfigError::Cbor(_)));

        let dir = tempfile::tempdir().unwrap();
        let err = MatchConfig::load_from_file(&dir.path().join("absent.cbor")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.to_string().starts_with("config file access failed"));
    }
}
