//! AMM Constants
//!
//! Fee parameters of the constant-product pools and fixed-point scales.

/// Fee constants
pub mod fees {
    /// Fee parts are expressed out of this denominator
    pub const FEE_DENOMINATOR: u32 = 1000;

    /// LP share for plain tokens (0.3%)
    pub const DEFAULT_LP_FEE_PARTS: u32 = 3;

    /// LP share for launch tokens (0.2%)
    pub const LAUNCH_LP_FEE_PARTS: u32 = 2;

    /// Creator share for launch tokens (0.1%)
    pub const LAUNCH_CREATOR_FEE_PARTS: u32 = 1;
}

/// Basis-point scale used for price impact and slippage
pub mod bps {
    /// 100% in basis points
    pub const DENOMINATOR: u32 = swapline_core::constants::BPS_DENOMINATOR;
}

/// Route search limits
pub mod search {
    /// Default hop bound
    pub const DEFAULT_MAX_HOPS: usize = swapline_core::constants::DEFAULT_MAX_HOPS;

    /// Hard ceiling on the hop bound
    pub const MAX_HOPS_LIMIT: usize = swapline_core::constants::MAX_HOPS_LIMIT;
}
