//! Price impact in basis points
//!
//! Impact compares the executed price of a hop with the pre-trade reserve
//! ratio. The hop fee is reported separately, so impact is measured against
//! the fee-net input and only reflects movement along the curve. Values are
//! zero or negative; -10000 would mean the trade returned nothing.

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use swapline_core::Amount;

use crate::constants::bps::DENOMINATOR as BPS;
use crate::constants::fees::FEE_DENOMINATOR;
use crate::fees::FeeInfo;

/// Impact of one hop.
///
/// `floor(out * reserve_in * 10000 * D / (in * (D - f) * reserve_out)) - 10000`
///
/// Degenerate inputs (nothing sold, empty reserve, fee eating the input)
/// report 0.
pub fn hop_impact_bps(
    amount_in: Amount,
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: &FeeInfo,
) -> i64 {
    let factor = FEE_DENOMINATOR.saturating_sub(fee.total_parts());
    if amount_in == 0 || reserve_in == 0 || reserve_out == 0 || factor == 0 {
        return 0;
    }

    let numerator = BigUint::from(amount_out)
        * BigUint::from(reserve_in)
        * BigUint::from(BPS)
        * BigUint::from(FEE_DENOMINATOR);
    let denominator =
        BigUint::from(amount_in) * BigUint::from(factor) * BigUint::from(reserve_out);

    // The curve never pays more than spot, so the ratio is at most 10000
    let ratio = (numerator / denominator)
        .to_i64()
        .unwrap_or(i64::from(BPS))
        .min(i64::from(BPS));
    ratio - i64::from(BPS)
}

/// Route impact as the plain sum of hop impacts.
///
/// This is an additive approximation; compounding would give
/// `prod(1 + i) - 1` instead.
pub fn route_impact_bps(hop_impacts: impl IntoIterator<Item = i64>) -> i64 {
    hop_impacts
        .into_iter()
        .fold(0i64, |total, impact| total.saturating_add(impact))
}
