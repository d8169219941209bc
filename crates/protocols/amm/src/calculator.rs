//! AMM Calculator
//!
//! Swap math using the constant product formula (x * y = k) with the fee
//! deducted from the input. All intermediate products are formed in
//! arbitrary precision so the results match the on-chain integer math
//! exactly; rounding always favors the pool.

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use swapline_core::Amount;

use crate::constants::fees::FEE_DENOMINATOR;
use crate::fees::FeeInfo;
use crate::state::AmmError;

/// Fee taken from a hop's input, split by recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    /// Total fee (LP + creator)
    pub total: Amount,
    /// Creator share of `total`
    pub creator: Amount,
}

impl FeeSplit {
    /// LP share of `total`
    pub fn lp(&self) -> Amount {
        self.total - self.creator
    }
}

/// `D - f` for a fee, or `None` when the fee would consume the whole input
fn net_fee_factor(fee: &FeeInfo) -> Option<u32> {
    FEE_DENOMINATOR
        .checked_sub(fee.total_parts())
        .filter(|factor| *factor > 0)
}

/// Calculate swap output for an exact input.
///
/// Formula: output = (input * (D - f) * reserves_out) / (reserves_in * D + input * (D - f))
///
/// Returns 0 for a zero input, an empty reserve, or a fee that leaves
/// nothing to swap; the caller treats that as "no liquidity".
pub fn amount_out(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: &FeeInfo,
) -> Amount {
    if amount_in == 0 || reserve_in == 0 || reserve_out == 0 {
        return 0;
    }
    let Some(factor) = net_fee_factor(fee) else {
        return 0;
    };

    let amount_in_net = BigUint::from(amount_in) * BigUint::from(factor);
    let numerator = &amount_in_net * BigUint::from(reserve_out);
    let denominator = BigUint::from(reserve_in) * BigUint::from(FEE_DENOMINATOR) + amount_in_net;

    // numerator / denominator < reserve_out, so it always fits
    (numerator / denominator).to_u128().unwrap_or(0)
}

/// Calculate required input for a desired output (reverse calculation).
///
/// Formula: input = (reserves_in * output * D) / ((reserves_out - output) * (D - f)) + 1
///
/// The `+ 1` rounds up so the returned input is always enough on-chain.
pub fn amount_in(
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: &FeeInfo,
) -> Result<Amount, AmmError> {
    if amount_out >= reserve_out || reserve_in == 0 {
        return Err(AmmError::InsufficientLiquidity {
            requested: amount_out,
            available: reserve_out,
        });
    }
    let factor = net_fee_factor(fee).ok_or(AmmError::InvalidFee {
        lp: fee.lp_fee_parts,
        creator: fee.creator_fee_parts,
    })?;

    let numerator = BigUint::from(reserve_in)
        * BigUint::from(amount_out)
        * BigUint::from(FEE_DENOMINATOR);
    let denominator = BigUint::from(reserve_out - amount_out) * BigUint::from(factor);

    let result = numerator / denominator + 1u32;
    result.to_u128().ok_or(AmmError::Overflow)
}

/// Fee charged on a hop input: `input * f / D`, with the creator share
/// `input * creator / D` carved out of it.
pub fn fee_amount(amount_in: Amount, fee: &FeeInfo) -> FeeSplit {
    let scaled = |parts: u32| -> Amount {
        let value = BigUint::from(amount_in) * BigUint::from(parts) / BigUint::from(FEE_DENOMINATOR);
        // parts < D, so value < amount_in
        value.to_u128().unwrap_or(0)
    };

    let total = scaled(fee.total_parts().min(FEE_DENOMINATOR));
    let creator = scaled(fee.creator_fee_parts.min(FEE_DENOMINATOR)).min(total);
    FeeSplit { total, creator }
}
