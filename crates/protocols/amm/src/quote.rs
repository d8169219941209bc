//! Swap quoting over an in-memory pool graph
//!
//! Validates a [`SwapQuoteRequest`], runs the route search and attaches the
//! slippage limit. Everything here is synchronous; see [`crate::fetch`] for
//! the variant that reads pools from a chain source first.

use chain_reader::CancelToken;

use crate::constants::bps::DENOMINATOR as BPS;
use crate::constants::search::MAX_HOPS_LIMIT;
use crate::fees::FeeResolver;
use crate::graph::PoolGraph;
use crate::router::{best_route, rank_routes, RouteQuery};
use crate::slippage::limit_for;
use crate::state::{AmmError, RouteQuote, SwapQuote, SwapQuoteRequest};

/// Check a request and turn it into a route query
pub fn validate_request(request: &SwapQuoteRequest) -> Result<RouteQuery, AmmError> {
    if request.token_in == request.token_out {
        return Err(AmmError::invalid_input("token_in and token_out must differ"));
    }
    let amount = request.swap_amount()?;
    if request.max_hops == 0 || request.max_hops > MAX_HOPS_LIMIT {
        return Err(AmmError::invalid_input(format!(
            "max_hops must be between 1 and {}",
            MAX_HOPS_LIMIT
        )));
    }
    if request.tolerance_bps > BPS {
        return Err(AmmError::invalid_input(format!(
            "tolerance_bps must be at most {}",
            BPS
        )));
    }

    Ok(RouteQuery {
        token_in: request.token_in,
        token_out: request.token_out,
        amount,
        max_hops: request.max_hops,
    })
}

/// Attach the slippage limit to a quoted route
pub fn finish_quote(
    query: &RouteQuery,
    route: RouteQuote,
    tolerance_bps: u32,
) -> Result<SwapQuote, AmmError> {
    let limit = limit_for(&query.amount, &route, tolerance_bps)?;
    Ok(SwapQuote::from_route(route, limit, tolerance_bps))
}

/// Quote the best route for `request`
pub fn quote_swap(
    graph: &PoolGraph,
    resolver: &FeeResolver,
    request: &SwapQuoteRequest,
    cancel: &CancelToken,
) -> Result<SwapQuote, AmmError> {
    let query = validate_request(request)?;
    let route = best_route(graph, resolver, &query, cancel)?;

    tracing::debug!(
        hops = route.hops.len(),
        amount_in = %route.amount_in,
        amount_out = %route.amount_out,
        impact_bps = route.price_impact_bps,
        "Quoted swap"
    );

    finish_quote(&query, route, request.tolerance_bps)
}

/// Quote up to `max_routes` alternatives, best first
pub fn quote_alternatives(
    graph: &PoolGraph,
    resolver: &FeeResolver,
    request: &SwapQuoteRequest,
    max_routes: usize,
    cancel: &CancelToken,
) -> Result<Vec<SwapQuote>, AmmError> {
    let query = validate_request(request)?;
    rank_routes(graph, resolver, &query, max_routes, cancel)?
        .into_iter()
        .map(|route| finish_quote(&query, route, request.tolerance_bps))
        .collect()
}
