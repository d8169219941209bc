//! Data Transfer Objects for API requests and responses

use amm::{AmmError, Pool, SwapQuote, SwapQuoteRequest};
use serde::{Deserialize, Serialize};
use swapline_core::{amount_str, Address, Amount, RouterConfig};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Chain source the quotes are read from
    pub source: String,
}

impl HealthResponse {
    pub fn ok(source: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            source: source.into(),
        }
    }
}

/// Pool listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolsResponse {
    pub source: String,
    pub pools: Vec<Pool>,
    pub count: usize,
    /// Pools left out for an empty reserve
    pub inert: usize,
    /// Pools whose read failed
    pub failed: usize,
}

/// Quote request as sent by clients.
///
/// Hop bound and tolerance fall back to the router config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequestDto {
    pub token_in: Address,
    pub token_out: Address,
    #[serde(default, with = "amount_str::option")]
    pub amount_in: Option<Amount>,
    #[serde(default, with = "amount_str::option")]
    pub amount_out: Option<Amount>,
    #[serde(default)]
    pub max_hops: Option<usize>,
    #[serde(default)]
    pub tolerance_bps: Option<u32>,
    /// Client session; a new quote cancels the session's previous one
    #[serde(default)]
    pub session: Option<String>,
}

impl QuoteRequestDto {
    pub fn to_request(&self, config: &RouterConfig) -> SwapQuoteRequest {
        SwapQuoteRequest {
            token_in: self.token_in,
            token_out: self.token_out,
            amount_in: self.amount_in,
            amount_out: self.amount_out,
            max_hops: self.max_hops.unwrap_or(config.max_hops),
            tolerance_bps: self.tolerance_bps.unwrap_or(config.tolerance_bps),
        }
    }
}

/// Ranked alternatives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesResponse {
    pub routes: Vec<SwapQuote>,
    pub count: usize,
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&AmmError> for ApiError {
    fn from(e: &AmmError) -> Self {
        Self::new(e.error_code(), e.to_string())
    }
}
