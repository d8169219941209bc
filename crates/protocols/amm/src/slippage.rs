//! Slippage bounds
//!
//! Turns a quoted amount into the limit the execution layer enforces.
//! Nothing here enforces anything.

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use swapline_core::Amount;

use crate::constants::bps::DENOMINATOR as BPS;
use crate::state::{AmmError, RouteQuote, SwapAmount, SwapLimit};

fn check_tolerance(tolerance_bps: u32) -> Result<(), AmmError> {
    if tolerance_bps > BPS {
        return Err(AmmError::invalid_input(format!(
            "tolerance {} bps exceeds {}",
            tolerance_bps, BPS
        )));
    }
    Ok(())
}

/// `floor(amount_out * (10000 - tol) / 10000)`
pub fn min_amount_out(amount_out: Amount, tolerance_bps: u32) -> Result<Amount, AmmError> {
    check_tolerance(tolerance_bps)?;
    let scaled = BigUint::from(amount_out) * BigUint::from(BPS - tolerance_bps) / BigUint::from(BPS);
    // Never larger than amount_out
    scaled.to_u128().ok_or(AmmError::Overflow)
}

/// `ceil(amount_in * (10000 + tol) / 10000)`
pub fn max_amount_in(amount_in: Amount, tolerance_bps: u32) -> Result<Amount, AmmError> {
    check_tolerance(tolerance_bps)?;
    let numerator = BigUint::from(amount_in) * BigUint::from(BPS + tolerance_bps);
    let denominator = BigUint::from(BPS);
    let scaled = (numerator + &denominator - 1u32) / denominator;
    scaled.to_u128().ok_or(AmmError::Overflow)
}

/// Limit for a quoted route: a floor on output when the input was fixed, a
/// ceiling on input when the output was fixed.
pub fn limit_for(
    amount: &SwapAmount,
    route: &RouteQuote,
    tolerance_bps: u32,
) -> Result<SwapLimit, AmmError> {
    match amount {
        SwapAmount::ExactIn(_) => Ok(SwapLimit::MinAmountOut(min_amount_out(
            route.amount_out,
            tolerance_bps,
        )?)),
        SwapAmount::ExactOut(_) => Ok(SwapLimit::MaxAmountIn(max_amount_in(
            route.amount_in,
            tolerance_bps,
        )?)),
    }
}
