//! Fee tiers
//!
//! The fee charged by a hop depends on the token being sold into it, not on
//! the pool. Plain tokens pay the LP fee only; tokens launched from the
//! configured launch platform divert one part to their creator.

use std::collections::HashMap;

use chain_reader::LaunchProfile;
use serde::{Deserialize, Serialize};
use swapline_core::{Address, ReadError};

use crate::constants::fees::{
    DEFAULT_LP_FEE_PARTS, FEE_DENOMINATOR, LAUNCH_CREATOR_FEE_PARTS, LAUNCH_LP_FEE_PARTS,
};
use crate::state::{AmmError, Pool};

/// Fee applied to one hop, in parts of [`FEE_DENOMINATOR`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeInfo {
    pub lp_fee_parts: u32,
    pub creator_fee_parts: u32,
    /// Receives the creator share; zero when there is none
    pub creator_recipient: Address,
}

impl FeeInfo {
    /// Tier for plain tokens: 0.3% to LPs
    pub const DEFAULT: FeeInfo = FeeInfo {
        lp_fee_parts: DEFAULT_LP_FEE_PARTS,
        creator_fee_parts: 0,
        creator_recipient: Address::ZERO,
    };

    /// Split tier for launch tokens: 0.2% to LPs, 0.1% to `creator`
    pub const fn launch(creator: Address) -> Self {
        Self {
            lp_fee_parts: LAUNCH_LP_FEE_PARTS,
            creator_fee_parts: LAUNCH_CREATOR_FEE_PARTS,
            creator_recipient: creator,
        }
    }

    /// Build a custom tier; the parts must leave something to swap.
    pub fn new(
        lp_fee_parts: u32,
        creator_fee_parts: u32,
        creator_recipient: Address,
    ) -> Result<Self, AmmError> {
        match lp_fee_parts.checked_add(creator_fee_parts) {
            Some(total) if total < FEE_DENOMINATOR => Ok(Self {
                lp_fee_parts,
                creator_fee_parts,
                creator_recipient,
            }),
            _ => Err(AmmError::InvalidFee {
                lp: lp_fee_parts,
                creator: creator_fee_parts,
            }),
        }
    }

    pub const fn total_parts(&self) -> u32 {
        self.lp_fee_parts.saturating_add(self.creator_fee_parts)
    }

    /// Whether part of the fee goes to a creator
    pub fn is_split(&self) -> bool {
        self.creator_fee_parts > 0
    }
}

impl Default for FeeInfo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Tier for a token given its launch profile.
///
/// Only a profile registered with `launch_platform` and naming a creator
/// earns the split tier. A zero platform disables launch tiers entirely.
pub fn fee_for_profile(profile: Option<&LaunchProfile>, launch_platform: &Address) -> FeeInfo {
    match profile {
        Some(p)
            if !launch_platform.is_zero()
                && p.platform == *launch_platform
                && !p.creator.is_zero() =>
        {
            FeeInfo::launch(p.creator)
        }
        _ => FeeInfo::DEFAULT,
    }
}

/// Resolves hop fees from previously probed launch profiles.
///
/// Tokens never probed are treated as plain. Tokens whose probe failed are
/// unavailable: any hop selling them fails with `ExternalRead`.
#[derive(Debug, Clone, Default)]
pub struct FeeResolver {
    launch_platform: Address,
    profiles: HashMap<Address, Option<LaunchProfile>>,
    unavailable: HashMap<Address, ReadError>,
}

impl FeeResolver {
    pub fn new(launch_platform: Address) -> Self {
        Self {
            launch_platform,
            ..Default::default()
        }
    }

    pub fn with_profile(mut self, token: Address, profile: Option<LaunchProfile>) -> Self {
        self.insert_profile(token, profile);
        self
    }

    pub fn insert_profile(&mut self, token: Address, profile: Option<LaunchProfile>) {
        self.unavailable.remove(&token);
        self.profiles.insert(token, profile);
    }

    pub fn mark_unavailable(&mut self, token: Address, error: ReadError) {
        self.profiles.remove(&token);
        self.unavailable.insert(token, error);
    }

    pub fn unavailable_count(&self) -> usize {
        self.unavailable.len()
    }

    /// Fee tier charged when selling `token`
    pub fn tier_for(&self, token: &Address) -> Result<FeeInfo, AmmError> {
        if let Some(error) = self.unavailable.get(token) {
            return Err(AmmError::ExternalRead(error.clone()));
        }
        let profile = self.profiles.get(token).and_then(Option::as_ref);
        Ok(fee_for_profile(profile, &self.launch_platform))
    }

    /// Fee for selling `input_token` into `pool`
    pub fn resolve(&self, pool: &Pool, input_token: &Address) -> Result<FeeInfo, AmmError> {
        if !pool.contains(input_token) {
            return Err(AmmError::InvalidToken {
                token: *input_token,
                pool: pool.id,
            });
        }
        self.tier_for(input_token)
    }
}
