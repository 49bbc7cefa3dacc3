//! # Block Propagation Configuration
//!
//! Values are injected at service construction; nothing here is read from
//! global state after that point.

use serde::{Deserialize, Serialize};
use shared_types::Hash;
use std::num::NonZeroUsize;

use crate::events::PropagationError;

/// Peers at most this many blocks behind an incoming block receive it.
pub const DEFAULT_BROADCAST_HEIGHT_WINDOW: u64 = 100;

/// Default number of block hashes remembered for deduplication.
pub const DEFAULT_SEEN_CACHE_SIZE: usize = 1024;

const ENV_SEEN_CACHE_SIZE: &str = "QC_PROPAGATION_SEEN_CACHE_SIZE";
const ENV_SYNC_ONLY: &str = "QC_PROPAGATION_SYNC_ONLY";
const ENV_GENESIS_HASH: &str = "QC_PROPAGATION_GENESIS_HASH";
const ENV_HEIGHT_WINDOW: &str = "QC_PROPAGATION_HEIGHT_WINDOW";

/// Block propagation configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationConfig {
    /// Seen block cache capacity (must be positive).
    pub seen_cache_size: usize,
    /// Sync-only nodes import blocks but never relay them.
    pub sync_only: bool,
    /// Genesis hash of the network, carried in status announcements.
    pub genesis_hash: Hash,
    /// Maximum height lag of a peer that still receives a relayed block.
    pub broadcast_height_window: u64,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            seen_cache_size: DEFAULT_SEEN_CACHE_SIZE,
            sync_only: false,
            genesis_hash: [0u8; 32],
            broadcast_height_window: DEFAULT_BROADCAST_HEIGHT_WINDOW,
        }
    }
}

impl PropagationConfig {
    /// Create a config for testing (small cache).
    pub fn for_testing() -> Self {
        Self {
            seen_cache_size: 16,
            ..Default::default()
        }
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, PropagationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (environment, file, test map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PropagationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup(ENV_SEEN_CACHE_SIZE) {
            config.seen_cache_size = val.trim().parse().map_err(|_| {
                PropagationError::InvalidConfig(format!("{ENV_SEEN_CACHE_SIZE}={val}"))
            })?;
        }

        if let Some(val) = lookup(ENV_SYNC_ONLY) {
            config.sync_only = parse_flag(&val).ok_or_else(|| {
                PropagationError::InvalidConfig(format!("{ENV_SYNC_ONLY}={val}"))
            })?;
        }

        if let Some(val) = lookup(ENV_GENESIS_HASH) {
            config.genesis_hash = parse_hash(&val).ok_or_else(|| {
                PropagationError::InvalidConfig(format!("{ENV_GENESIS_HASH}={val}"))
            })?;
        }

        if let Some(val) = lookup(ENV_HEIGHT_WINDOW) {
            config.broadcast_height_window = val.trim().parse().map_err(|_| {
                PropagationError::InvalidConfig(format!("{ENV_HEIGHT_WINDOW}={val}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), PropagationError> {
        self.seen_cache_capacity().map(|_| ())
    }

    /// Seen cache capacity as a non-zero size.
    pub fn seen_cache_capacity(&self) -> Result<NonZeroUsize, PropagationError> {
        NonZeroUsize::new(self.seen_cache_size).ok_or_else(|| {
            PropagationError::InvalidConfig("seen_cache_size must be positive".to_string())
        })
    }
}

/// Parse a boolean flag: `1`/`true` or `0`/`false`, case-insensitive.
fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Parse a 32-byte hash from hex, with or without a `0x` prefix.
fn parse_hash(val: &str) -> Option<Hash> {
    let trimmed = val.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(digits).ok()?;
    bytes.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = PropagationConfig::default();
        assert_eq!(config.seen_cache_size, 1024);
        assert!(!config.sync_only);
        assert_eq!(config.broadcast_height_window, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_cache_size_rejected() {
        let config = PropagationConfig {
            seen_cache_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PropagationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let genesis = "ab".repeat(32);
        let prefixed = format!("0x{genesis}");
        let config = PropagationConfig::from_lookup(lookup_from(&[
            ("QC_PROPAGATION_SEEN_CACHE_SIZE", "64"),
            ("QC_PROPAGATION_SYNC_ONLY", "TRUE"),
            ("QC_PROPAGATION_GENESIS_HASH", prefixed.as_str()),
            ("QC_PROPAGATION_HEIGHT_WINDOW", "32"),
        ]))
        .unwrap();

        assert_eq!(config.seen_cache_size, 64);
        assert!(config.sync_only);
        assert_eq!(config.genesis_hash, [0xAB; 32]);
        assert_eq!(config.broadcast_height_window, 32);
    }

    #[test]
    fn test_from_lookup_empty_is_default() {
        let config = PropagationConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, PropagationConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let short_hash = PropagationConfig::from_lookup(lookup_from(&[(
            "QC_PROPAGATION_GENESIS_HASH",
            "abcd",
        )]));
        assert!(matches!(short_hash, Err(PropagationError::InvalidConfig(_))));

        let zero_cache = PropagationConfig::from_lookup(lookup_from(&[(
            "QC_PROPAGATION_SEEN_CACHE_SIZE",
            "0",
        )]));
        assert!(matches!(zero_cache, Err(PropagationError::InvalidConfig(_))));

        let not_a_number = PropagationConfig::from_lookup(lookup_from(&[(
            "QC_PROPAGATION_HEIGHT_WINDOW",
            "far",
        )]));
        assert!(matches!(not_a_number, Err(PropagationError::InvalidConfig(_))));

        for bad in ["yes", "garbage", "2", ""] {
            let result = PropagationConfig::from_lookup(lookup_from(&[(
                "QC_PROPAGATION_SYNC_ONLY",
                bad,
            )]));
            assert!(
                matches!(result, Err(PropagationError::InvalidConfig(_))),
                "sync-only value {bad:?}"
            );
        }
    }

    #[test]
    fn test_sync_only_flag_values() {
        for (val, expected) in [
            ("1", true),
            ("true", true),
            (" true", true),
            ("TRUE\n", true),
            ("0", false),
            ("False", false),
        ] {
            let config = PropagationConfig::from_lookup(lookup_from(&[(
                "QC_PROPAGATION_SYNC_ONLY",
                val,
            )]))
            .unwrap();
            assert_eq!(config.sync_only, expected, "sync-only value {val:?}");
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = PropagationConfig {
            seen_cache_size: 256,
            sync_only: true,
            genesis_hash: [0x5A; 32],
            broadcast_height_window: 42,
        };

        let json = serde_json::to_string(&config).unwrap();
        let decoded: PropagationConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, config);
    }
}
