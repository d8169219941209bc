//! AMM State Types
//!
//! Data structures for pools, quote requests, and quotes.

use std::fmt;

use chain_reader::PoolSnapshot;
use serde::{Deserialize, Serialize};
use swapline_core::{amount_str, Address, Amount, PoolId, ReadError};
use thiserror::Error;

use crate::constants::search::DEFAULT_MAX_HOPS;

/// Constant-product pool in canonical token order (`token0 < token1`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub token0: Address,
    pub token1: Address,
    #[serde(with = "amount_str")]
    pub reserve0: Amount,
    #[serde(with = "amount_str")]
    pub reserve1: Amount,
}

impl Pool {
    /// Build a pool from tokens in any order; reserves follow their tokens.
    pub fn new(
        id: PoolId,
        token_a: Address,
        token_b: Address,
        reserve_a: Amount,
        reserve_b: Amount,
    ) -> Self {
        if token_a <= token_b {
            Self {
                id,
                token0: token_a,
                token1: token_b,
                reserve0: reserve_a,
                reserve1: reserve_b,
            }
        } else {
            Self {
                id,
                token0: token_b,
                token1: token_a,
                reserve0: reserve_b,
                reserve1: reserve_a,
            }
        }
    }

    /// A pool with an empty side cannot quote anything
    pub fn is_inert(&self) -> bool {
        self.reserve0 == 0 || self.reserve1 == 0
    }

    pub fn contains(&self, token: &Address) -> bool {
        self.token0 == *token || self.token1 == *token
    }

    /// The token on the other side of `token`
    pub fn other(&self, token: &Address) -> Option<Address> {
        if *token == self.token0 {
            Some(self.token1)
        } else if *token == self.token1 {
            Some(self.token0)
        } else {
            None
        }
    }

    /// `(reserve_in, reserve_out)` for a swap selling `token_in`
    pub fn reserves_for(&self, token_in: &Address) -> Option<(Amount, Amount)> {
        if *token_in == self.token0 {
            Some((self.reserve0, self.reserve1))
        } else if *token_in == self.token1 {
            Some((self.reserve1, self.reserve0))
        } else {
            None
        }
    }
}

impl From<PoolSnapshot> for Pool {
    fn from(snap: PoolSnapshot) -> Self {
        Self::new(snap.id, snap.token0, snap.token1, snap.reserve0, snap.reserve1)
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pool {} | {}: {} | {}: {}",
            self.id.short(),
            self.token0.short(),
            self.reserve0,
            self.token1.short(),
            self.reserve1
        )
    }
}

/// Which side of the swap is fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "amount", rename_all = "snake_case")]
pub enum SwapAmount {
    /// Sell exactly this much of the input token
    ExactIn(#[serde(with = "amount_str")] Amount),
    /// Buy exactly this much of the output token
    ExactOut(#[serde(with = "amount_str")] Amount),
}

/// Quote request. Exactly one of `amount_in` / `amount_out` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapQuoteRequest {
    pub token_in: Address,
    pub token_out: Address,
    #[serde(default, with = "amount_str::option")]
    pub amount_in: Option<Amount>,
    #[serde(default, with = "amount_str::option")]
    pub amount_out: Option<Amount>,
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,
    pub tolerance_bps: u32,
}

fn default_max_hops() -> usize {
    DEFAULT_MAX_HOPS
}

impl SwapQuoteRequest {
    pub fn exact_in(token_in: Address, token_out: Address, amount: Amount) -> Self {
        Self {
            token_in,
            token_out,
            amount_in: Some(amount),
            amount_out: None,
            max_hops: DEFAULT_MAX_HOPS,
            tolerance_bps: swapline_core::constants::DEFAULT_TOLERANCE_BPS,
        }
    }

    pub fn exact_out(token_in: Address, token_out: Address, amount: Amount) -> Self {
        Self {
            amount_in: None,
            amount_out: Some(amount),
            ..Self::exact_in(token_in, token_out, 0)
        }
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn with_tolerance_bps(mut self, tolerance_bps: u32) -> Self {
        self.tolerance_bps = tolerance_bps;
        self
    }

    /// The fixed side of the swap, rejecting both/neither/zero amounts
    pub fn swap_amount(&self) -> Result<SwapAmount, AmmError> {
        match (self.amount_in, self.amount_out) {
            (Some(_), Some(_)) => Err(AmmError::invalid_input(
                "set either amount_in or amount_out, not both",
            )),
            (None, None) => Err(AmmError::invalid_input(
                "one of amount_in or amount_out is required",
            )),
            (Some(0), None) | (None, Some(0)) => {
                Err(AmmError::invalid_input("amount must be positive"))
            }
            (Some(a), None) => Ok(SwapAmount::ExactIn(a)),
            (None, Some(a)) => Ok(SwapAmount::ExactOut(a)),
        }
    }
}

/// One hop of a quoted route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopQuote {
    pub pool_id: PoolId,
    pub token_in: Address,
    pub token_out: Address,
    #[serde(with = "amount_str")]
    pub amount_in: Amount,
    #[serde(with = "amount_str")]
    pub amount_out: Amount,
    /// Total fee taken from `amount_in` (LP + creator)
    #[serde(with = "amount_str")]
    pub fee_amount: Amount,
    /// Creator share of `fee_amount`
    #[serde(with = "amount_str")]
    pub creator_fee_amount: Amount,
    pub creator_recipient: Address,
    pub impact_bps: i64,
    #[serde(with = "amount_str")]
    pub reserve_in: Amount,
    #[serde(with = "amount_str")]
    pub reserve_out: Amount,
}

/// A complete evaluated route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteQuote {
    pub hops: Vec<HopQuote>,
    #[serde(with = "amount_str")]
    pub amount_in: Amount,
    #[serde(with = "amount_str")]
    pub amount_out: Amount,
    /// Sum of per-hop impacts (additive, not compounded)
    pub price_impact_bps: i64,
    #[serde(with = "amount_str")]
    pub total_fee_amount: Amount,
}

impl RouteQuote {
    pub fn pool_ids(&self) -> Vec<PoolId> {
        self.hops.iter().map(|h| h.pool_id).collect()
    }
}

/// Enforceable limit handed to the execution layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapLimit {
    MinAmountOut(#[serde(with = "amount_str")] Amount),
    MaxAmountIn(#[serde(with = "amount_str")] Amount),
}

/// Final quote for the best route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub route: Vec<PoolId>,
    pub per_hop: Vec<HopQuote>,
    #[serde(with = "amount_str")]
    pub amount_in: Amount,
    #[serde(with = "amount_str")]
    pub amount_out: Amount,
    pub price_impact_bps: i64,
    #[serde(with = "amount_str")]
    pub total_fee_amount: Amount,
    #[serde(flatten)]
    pub limit: SwapLimit,
    pub tolerance_bps: u32,
}

impl SwapQuote {
    pub fn from_route(route: RouteQuote, limit: SwapLimit, tolerance_bps: u32) -> Self {
        Self {
            route: route.pool_ids(),
            amount_in: route.amount_in,
            amount_out: route.amount_out,
            price_impact_bps: route.price_impact_bps,
            total_fee_amount: route.total_fee_amount,
            per_hop: route.hops,
            limit,
            tolerance_bps,
        }
    }

    pub fn min_amount_out(&self) -> Option<Amount> {
        match self.limit {
            SwapLimit::MinAmountOut(a) => Some(a),
            SwapLimit::MaxAmountIn(_) => None,
        }
    }

    pub fn max_amount_in(&self) -> Option<Amount> {
        match self.limit {
            SwapLimit::MaxAmountIn(a) => Some(a),
            SwapLimit::MinAmountOut(_) => None,
        }
    }
}

/// AMM protocol errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("No route from {token_in} to {token_out} within {max_hops} hops")]
    NoRouteFound {
        token_in: Address,
        token_out: Address,
        max_hops: usize,
    },

    #[error("Insufficient liquidity: requested {requested}, reserve {available}")]
    InsufficientLiquidity { requested: Amount, available: Amount },

    #[error("Pool {pool} has an empty reserve")]
    InertPool { pool: PoolId },

    #[error("Swap through pool {pool} yields nothing")]
    ZeroOutput { pool: PoolId },

    #[error("Token {token} is not in pool {pool}")]
    InvalidToken { token: Address, pool: PoolId },

    #[error("Invalid fee: lp {lp} + creator {creator} parts must stay below 1000")]
    InvalidFee { lp: u32, creator: u32 },

    #[error("Amount does not fit in 128 bits")]
    Overflow,

    #[error("External read failed: {0}")]
    ExternalRead(ReadError),

    #[error("Quote cancelled")]
    Cancelled,
}

impl From<ReadError> for AmmError {
    fn from(e: ReadError) -> Self {
        match e {
            ReadError::Cancelled => Self::Cancelled,
            other => Self::ExternalRead(other),
        }
    }
}

impl AmmError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::NoRouteFound { .. } => "no_route_found",
            Self::InsufficientLiquidity { .. } => "insufficient_liquidity",
            Self::InertPool { .. } => "inert_pool",
            Self::ZeroOutput { .. } => "zero_output",
            Self::InvalidToken { .. } => "invalid_token",
            Self::InvalidFee { .. } => "invalid_fee",
            Self::Overflow => "overflow",
            Self::ExternalRead(_) => "external_read_failure",
            Self::Cancelled => "cancelled",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput { .. } | Self::InvalidToken { .. } => 400,
            Self::NoRouteFound { .. } => 404,
            Self::InsufficientLiquidity { .. }
            | Self::InertPool { .. }
            | Self::ZeroOutput { .. }
            | Self::Overflow => 422,
            Self::InvalidFee { .. } => 500,
            Self::ExternalRead(_) => 503,
            // Client closed request
            Self::Cancelled => 499,
        }
    }
}
