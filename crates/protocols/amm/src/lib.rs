//! Constant-product AMM routing and quoting
//!
//! Quotes swaps across a graph of constant-product pools: exact integer swap
//! math, per-token fee tiers, breadth-first multi-hop route search, price
//! impact and slippage limits. Everything except [`fetch`] is synchronous
//! and works on an in-memory [`PoolGraph`].

pub mod calculator;
pub mod constants;
pub mod fees;
pub mod fetch;
pub mod graph;
pub mod impact;
pub mod quote;
pub mod router;
pub mod slippage;
pub mod state;

// Re-exports
pub use calculator::{amount_in, amount_out, fee_amount, FeeSplit};
pub use fees::{fee_for_profile, FeeInfo, FeeResolver};
pub use fetch::{
    load_fee_resolver, load_pool_graph, quote_swap_live, rank_routes_live, MarketSnapshot,
};
pub use graph::{Neighbor, PoolGraph};
pub use impact::{hop_impact_bps, route_impact_bps};
pub use quote::{quote_alternatives, quote_swap, validate_request};
pub use router::{best_route, find_paths, quote_path, rank_routes, CandidatePath, RouteQuery};
pub use slippage::{limit_for, max_amount_in, min_amount_out};
pub use state::{
    AmmError, HopQuote, Pool, RouteQuote, SwapAmount, SwapLimit, SwapQuote, SwapQuoteRequest,
};
