//! In-memory reader backed by a JSON snapshot file

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use swapline_core::{Address, Error, PoolId, ReadError};

use crate::{ChainReader, LaunchProfile, PoolSnapshot, Result, TokenFeeProfile};

/// Token capability entry in a snapshot file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEntry {
    pub token: Address,
    #[serde(flatten)]
    pub profile: TokenFeeProfile,
}

/// On-disk snapshot layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub pools: Vec<PoolSnapshot>,
    /// Tokens with a fee capability; anything absent is a plain token
    #[serde(default)]
    pub tokens: Vec<TokenEntry>,
}

/// Reader serving a fixed snapshot.
///
/// Pool enumeration order is the order of the snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    name: String,
    pools: Vec<PoolSnapshot>,
    by_id: HashMap<PoolId, usize>,
    profiles: HashMap<Address, LaunchProfile>,
}

impl SnapshotReader {
    pub fn new(name: impl Into<String>, snapshot: SnapshotFile) -> Self {
        let mut by_id = HashMap::with_capacity(snapshot.pools.len());
        for (i, pool) in snapshot.pools.iter().enumerate() {
            by_id.entry(pool.id).or_insert(i);
        }

        let profiles = snapshot
            .tokens
            .into_iter()
            .filter_map(|entry| {
                entry
                    .profile
                    .into_launch_profile()
                    .map(|profile| (entry.token, profile))
            })
            .collect();

        Self {
            name: name.into(),
            pools: snapshot.pools,
            by_id,
            profiles,
        }
    }

    /// Load a snapshot file from disk
    pub fn from_file(path: &Path) -> swapline_core::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let snapshot: SnapshotFile = serde_json::from_str(&raw)?;

        tracing::info!(
            path = %path.display(),
            pools = snapshot.pools.len(),
            tokens = snapshot.tokens.len(),
            "Loaded pool snapshot"
        );

        Ok(Self::new(path.display().to_string(), snapshot))
    }

    /// All pools in enumeration order
    pub fn pools(&self) -> &[PoolSnapshot] {
        &self.pools
    }
}

#[async_trait]
impl ChainReader for SnapshotReader {
    fn source_name(&self) -> &str {
        &self.name
    }

    async fn pool_ids(&self) -> Result<Vec<PoolId>> {
        Ok(self.pools.iter().map(|p| p.id).collect())
    }

    async fn pool_snapshot(&self, pool: &PoolId) -> Result<PoolSnapshot> {
        self.by_id
            .get(pool)
            .map(|&i| self.pools[i].clone())
            .ok_or_else(|| ReadError::NotFound {
                what: format!("pool {}", pool),
            })
    }

    async fn launch_profile(&self, token: &Address) -> Result<Option<LaunchProfile>> {
        Ok(self.profiles.get(token).copied())
    }
}
