//! Token fee capability probing
//!
//! Some tokens are issued through a launch platform and route part of every
//! trading fee to their creator. Whether a token does so is an optional
//! capability: most tokens simply don't have it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use swapline_core::Address;

use crate::{timed_read, CancelToken, ChainReader, Result};

/// Launch-platform registration of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchProfile {
    /// Platform the token reports it was launched from
    pub platform: Address,
    /// Creator receiving the creator share of the fee
    pub creator: Address,
}

/// Flat capability record as published by indexers and snapshot files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFeeProfile {
    pub is_special_token: bool,
    #[serde(default)]
    pub creator_address: Address,
    #[serde(default)]
    pub platform: Address,
}

impl TokenFeeProfile {
    /// Typed form: `None` unless the token is flagged special
    pub fn into_launch_profile(self) -> Option<LaunchProfile> {
        self.is_special_token.then_some(LaunchProfile {
            platform: self.platform,
            creator: self.creator_address,
        })
    }
}

impl From<Option<LaunchProfile>> for TokenFeeProfile {
    fn from(profile: Option<LaunchProfile>) -> Self {
        match profile {
            Some(p) => Self {
                is_special_token: true,
                creator_address: p.creator,
                platform: p.platform,
            },
            None => Self {
                is_special_token: false,
                creator_address: Address::ZERO,
                platform: Address::ZERO,
            },
        }
    }
}

/// Probe one token's launch profile with a bounded, cancellable read
pub async fn probe_launch_profile(
    reader: &dyn ChainReader,
    token: &Address,
    timeout: Duration,
    cancel: &CancelToken,
) -> Result<Option<LaunchProfile>> {
    let profile = timed_read(
        format!("launch profile of {}", token),
        timeout,
        cancel,
        reader.launch_profile(token),
    )
    .await?;

    tracing::debug!(
        source = reader.source_name(),
        token = %token.short(),
        launch = profile.is_some(),
        "Probed token fee capability"
    );

    Ok(profile)
}
