//! Environment configuration for the binaries.
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `GEO_PUZZLE_EXPAND_POLICY` | `spend`, `skip` | `spend` |
//! | `GEO_PUZZLE_LEVEL_OVERFLOW` | `first`, `last` | `first` |
//! | `GEO_PUZZLE_LOG_PATH` | file path | unset |
//!
//! Absent or unparseable values fall back to the default. The listen
//! address is read by [`crate::adapter::ServerConfig::from_env`].

use std::path::PathBuf;

use crate::core::EngineConfig;
use crate::types::{ExpandPolicy, LevelOverflow};

pub const EXPAND_POLICY_VAR: &str = "GEO_PUZZLE_EXPAND_POLICY";
pub const LEVEL_OVERFLOW_VAR: &str = "GEO_PUZZLE_LEVEL_OVERFLOW";
pub const LOG_PATH_VAR: &str = "GEO_PUZZLE_LOG_PATH";

/// Engine policies from the process environment
pub fn engine_config_from_env() -> EngineConfig {
    engine_config_from_lookup(|key| std::env::var(key).ok())
}

pub fn engine_config_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> EngineConfig {
    let expand_policy = lookup(EXPAND_POLICY_VAR)
        .and_then(|s| ExpandPolicy::from_str(&s))
        .unwrap_or_default();
    let level_overflow = lookup(LEVEL_OVERFLOW_VAR)
        .and_then(|s| LevelOverflow::from_str(&s))
        .unwrap_or_default();

    EngineConfig::default()
        .with_expand_policy(expand_policy)
        .with_level_overflow(level_overflow)
}

/// Log file path, if one is configured
pub fn log_path_from_env() -> Option<PathBuf> {
    std::env::var(LOG_PATH_VAR)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset_or_invalid() {
        assert_eq!(engine_config_from_lookup(|_| None), EngineConfig::default());
        assert_eq!(
            engine_config_from_lookup(|_| Some("bogus".to_string())),
            EngineConfig::default()
        );
    }

    #[test]
    fn reads_both_policies() {
        let cfg = engine_config_from_lookup(|key| match key {
            EXPAND_POLICY_VAR => Some("skip".to_string()),
            LEVEL_OVERFLOW_VAR => Some(" last ".to_string()),
            _ => None,
        });
        assert_eq!(cfg.expand_policy, ExpandPolicy::SkipAtCeiling);
        assert_eq!(cfg.level_overflow, LevelOverflow::RepeatLast);
    }
}
