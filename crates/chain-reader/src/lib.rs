//! chain-reader: boundary to the external chain-state source
//!
//! Pool reserves and token fee capabilities are read through the
//! [`ChainReader`] trait. The quoting core never talks to a chain directly;
//! it consumes what a reader returns. Reads are bounded by a timeout and can
//! be abandoned through a [`CancelToken`].

pub mod cancel;
pub mod capabilities;
pub mod snapshot;

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use swapline_core::{amount_str, Address, Amount, PoolId, ReadError};

pub use cancel::CancelToken;
pub use capabilities::{probe_launch_profile, LaunchProfile, TokenFeeProfile};
pub use snapshot::{SnapshotFile, SnapshotReader, TokenEntry};

/// Result type for reader operations
pub type Result<T> = std::result::Result<T, ReadError>;

/// Reserve snapshot of one pool as reported by the chain.
///
/// `token0`/`token1` are taken as given; canonical ordering is applied by the
/// consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub id: PoolId,
    pub token0: Address,
    pub token1: Address,
    #[serde(with = "amount_str")]
    pub reserve0: Amount,
    #[serde(with = "amount_str")]
    pub reserve1: Amount,
}

/// External chain-state source
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Human-readable source name for logs
    fn source_name(&self) -> &str;

    /// Enumerate known pools
    async fn pool_ids(&self) -> Result<Vec<PoolId>>;

    /// Current reserves of one pool
    async fn pool_snapshot(&self, pool: &PoolId) -> Result<PoolSnapshot>;

    /// Launch-platform registration of a token.
    ///
    /// `Ok(None)` means the token does not expose the capability, which is
    /// the common case and not an error.
    async fn launch_profile(&self, token: &Address) -> Result<Option<LaunchProfile>>;
}

/// Run a read under a timeout, abandoning it as soon as `cancel` fires.
pub async fn timed_read<T, F>(
    what: impl fmt::Display,
    timeout: Duration,
    cancel: &CancelToken,
    fut: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ReadError::Cancelled),
        res = tokio::time::timeout(timeout, fut) => match res {
            Ok(inner) => inner,
            Err(_) => Err(ReadError::Timeout {
                what: what.to_string(),
                millis: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        },
    }
}
