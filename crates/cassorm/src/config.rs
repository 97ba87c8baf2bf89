//! Repository and session configuration.

use crate::error::{OrmError, OrmResult};
use serde::Deserialize;

/// Default cap applied by `EntityRepository::find_by`.
pub const DEFAULT_FIND_LIMIT: u32 = 100;

/// Environment variable holding comma-separated contact points.
pub const NODES_ENV: &str = "CASSORM_NODES";
/// Environment variable holding the keyspace to `USE`.
pub const KEYSPACE_ENV: &str = "CASSORM_KEYSPACE";

/// Behaviour shared by every call of an `EntityRepository`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Stamp `created_at` / `updated_at` on create and update.
    pub timestamps: bool,
    /// Row cap for `find_by`; zero disables the cap.
    pub find_limit: u32,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            timestamps: true,
            find_limit: DEFAULT_FIND_LIMIT,
        }
    }
}

impl RepositoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    pub fn with_find_limit(mut self, limit: u32) -> Self {
        self.find_limit = limit;
        self
    }
}

/// Where to reach the cluster.
///
/// Deserializable so applications can embed it in their own config files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Contact points as `host:port`.
    pub nodes: Vec<String>,
    /// Keyspace selected after connecting.
    #[serde(default)]
    pub keyspace: Option<String>,
}

impl SessionConfig {
    pub fn new<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
            keyspace: None,
        }
    }

    pub fn with_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = Some(keyspace.into());
        self
    }

    /// Read `CASSORM_NODES` (required) and `CASSORM_KEYSPACE` (optional).
    pub fn from_env() -> OrmResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> OrmResult<Self> {
        let nodes: Vec<String> = lookup(NODES_ENV)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|node| !node.is_empty())
            .map(str::to_string)
            .collect();
        if nodes.is_empty() {
            return Err(OrmError::Connection(format!("{NODES_ENV} is not set")));
        }

        let keyspace = lookup(KEYSPACE_ENV)
            .map(|ks| ks.trim().to_string())
            .filter(|ks| !ks.is_empty());

        Ok(Self { nodes, keyspace })
    }
}
