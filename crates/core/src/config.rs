//! Engine policies
//!
//! Plain data with defaults that reproduce the literal game behavior. Hosts
//! decide how to fill it (the `geo-puzzle` binaries read the environment).

use crate::types::{ExpandPolicy, LevelOverflow};

/// Behavioral policies shared by both engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EngineConfig {
    /// `expand` when every piece is already large
    pub expand_policy: ExpandPolicy,
    /// Template used by levels past the end of the catalog
    pub level_overflow: LevelOverflow,
}

impl EngineConfig {
    pub fn with_expand_policy(mut self, expand_policy: ExpandPolicy) -> Self {
        self.expand_policy = expand_policy;
        self
    }

    pub fn with_level_overflow(mut self, level_overflow: LevelOverflow) -> Self {
        self.level_overflow = level_overflow;
        self
    }
}
