//! Smart Router: Multi-Hop Route Search
//!
//! Finds every path from the input token to the output token within the hop
//! bound, evaluates each one hop by hop, and selects the best.
//!
//! Paths are discovered breadth-first, so shorter routes come first and the
//! direct pool (when there is one) is always the first candidate. A pool is
//! used at most once per path while tokens may be revisited through other
//! pools. Among equally good routes the first discovered wins.

use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};

use chain_reader::CancelToken;
use swapline_core::{Address, Amount};

use crate::calculator::{amount_in, amount_out, fee_amount};
use crate::constants::search::MAX_HOPS_LIMIT;
use crate::fees::{FeeInfo, FeeResolver};
use crate::graph::PoolGraph;
use crate::impact::{hop_impact_bps, route_impact_bps};
use crate::state::{AmmError, HopQuote, Pool, RouteQuote, SwapAmount};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What to route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteQuery {
    pub token_in: Address,
    pub token_out: Address,
    pub amount: SwapAmount,
    pub max_hops: usize,
}

/// A discovered path: pools by graph index and the tokens they connect.
///
/// `tokens` has one more entry than `pools`; hop `i` sells `tokens[i]`
/// into `pools[i]` for `tokens[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    pub pools: Vec<usize>,
    pub tokens: Vec<Address>,
}

impl CandidatePath {
    pub fn hop_count(&self) -> usize {
        self.pools.len()
    }

    /// Token sold into each hop; empty for a path with too few tokens
    pub fn hop_inputs(&self) -> &[Address] {
        self.tokens.get(..self.pools.len()).unwrap_or_default()
    }
}

/// Path under construction in the search queue
struct PartialPath {
    pools: Vec<usize>,
    tokens: Vec<Address>,
    used: HashSet<usize>,
}

impl PartialPath {
    fn head(&self) -> Address {
        // tokens always holds at least the starting token
        self.tokens[self.tokens.len() - 1]
    }
}

// ---------------------------------------------------------------------------
// Step 1: Path Finding
// ---------------------------------------------------------------------------

/// Find all paths from `token_in` to `token_out` with at most `max_hops`
/// pools, in discovery order.
///
/// The direct pool comes first. Duplicate pool sequences are dropped and a
/// path that reaches `token_out` is not extended. Checks `cancel` before
/// expanding each queued path.
pub fn find_paths(
    graph: &PoolGraph,
    token_in: &Address,
    token_out: &Address,
    max_hops: usize,
    cancel: &CancelToken,
) -> Result<Vec<CandidatePath>, AmmError> {
    check_hops(max_hops)?;
    if token_in == token_out {
        return Err(AmmError::invalid_input("token_in and token_out must differ"));
    }

    let mut paths: Vec<CandidatePath> = Vec::new();
    let mut seen: HashSet<Vec<usize>> = HashSet::new();

    if let Some(direct) = graph.direct_pool_index(token_in, token_out) {
        seen.insert(vec![direct]);
        paths.push(CandidatePath {
            pools: vec![direct],
            tokens: vec![*token_in, *token_out],
        });
    }

    let mut queue: VecDeque<PartialPath> = VecDeque::new();
    queue.push_back(PartialPath {
        pools: Vec::new(),
        tokens: vec![*token_in],
        used: HashSet::new(),
    });
    let mut expanded = 0usize;

    while let Some(partial) = queue.pop_front() {
        if cancel.is_cancelled() {
            return Err(AmmError::Cancelled);
        }
        expanded += 1;

        for neighbor in graph.neighbor_edges(&partial.head()) {
            if partial.used.contains(&neighbor.pool) {
                continue;
            }

            let mut pools = partial.pools.clone();
            pools.push(neighbor.pool);
            let mut tokens = partial.tokens.clone();
            tokens.push(neighbor.token);

            if neighbor.token == *token_out {
                if seen.insert(pools.clone()) {
                    paths.push(CandidatePath { pools, tokens });
                }
            } else if pools.len() < max_hops {
                let mut used = partial.used.clone();
                used.insert(neighbor.pool);
                queue.push_back(PartialPath {
                    pools,
                    tokens,
                    used,
                });
            }
        }
    }

    tracing::debug!(
        token_in = %token_in.short(),
        token_out = %token_out.short(),
        max_hops,
        expanded,
        candidates = paths.len(),
        "Path search finished"
    );

    Ok(paths)
}

/// Distinct hop input tokens across `paths`, in first-seen order
pub fn hop_input_tokens(paths: &[CandidatePath]) -> Vec<Address> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .flat_map(|p| p.hop_inputs().iter().copied())
        .filter(|token| seen.insert(*token))
        .collect()
}

fn check_hops(max_hops: usize) -> Result<(), AmmError> {
    if max_hops == 0 || max_hops > MAX_HOPS_LIMIT {
        return Err(AmmError::invalid_input(format!(
            "max_hops must be between 1 and {}, got {}",
            MAX_HOPS_LIMIT, max_hops
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Step 2: Multi-Hop Quoting
// ---------------------------------------------------------------------------

fn path_pool<'a>(graph: &'a PoolGraph, index: usize) -> Result<&'a Pool, AmmError> {
    let pool = graph
        .pool(index)
        .ok_or_else(|| AmmError::invalid_input(format!("unknown pool index {}", index)))?;
    if pool.is_inert() {
        return Err(AmmError::InertPool { pool: pool.id });
    }
    Ok(pool)
}

fn reserves(pool: &Pool, token_in: &Address) -> Result<(Amount, Amount), AmmError> {
    pool.reserves_for(token_in).ok_or(AmmError::InvalidToken {
        token: *token_in,
        pool: pool.id,
    })
}

#[allow(clippy::too_many_arguments)]
fn hop_quote(
    pool: &Pool,
    token_in: Address,
    token_out: Address,
    amount_in: Amount,
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: &FeeInfo,
) -> HopQuote {
    let split = fee_amount(amount_in, fee);
    HopQuote {
        pool_id: pool.id,
        token_in,
        token_out,
        amount_in,
        amount_out,
        fee_amount: split.total,
        creator_fee_amount: split.creator,
        creator_recipient: fee.creator_recipient,
        impact_bps: hop_impact_bps(amount_in, amount_out, reserve_in, reserve_out, fee),
        reserve_in,
        reserve_out,
    }
}

fn assemble(hops: Vec<HopQuote>) -> Result<RouteQuote, AmmError> {
    let (first, last) = match (hops.first(), hops.last()) {
        (Some(first), Some(last)) => (first.amount_in, last.amount_out),
        _ => return Err(AmmError::invalid_input("empty route")),
    };
    let total_fee_amount = hops.iter().try_fold(0 as Amount, |total, hop| {
        total.checked_add(hop.fee_amount).ok_or(AmmError::Overflow)
    })?;
    let price_impact_bps = route_impact_bps(hops.iter().map(|h| h.impact_bps));

    Ok(RouteQuote {
        hops,
        amount_in: first,
        amount_out: last,
        price_impact_bps,
        total_fee_amount,
    })
}

/// Quote one path.
///
/// Exact input walks forward, feeding each hop's output into the next.
/// Exact output walks backward from the requested amount. Every hop takes
/// its fee from its own input token.
pub fn quote_path(
    graph: &PoolGraph,
    resolver: &FeeResolver,
    path: &CandidatePath,
    amount: SwapAmount,
) -> Result<RouteQuote, AmmError> {
    if path.pools.is_empty() || path.tokens.len() != path.pools.len() + 1 {
        return Err(AmmError::invalid_input("malformed path"));
    }

    let mut hops = Vec::with_capacity(path.pools.len());

    match amount {
        SwapAmount::ExactIn(input) => {
            let mut current = input;
            for (i, &index) in path.pools.iter().enumerate() {
                let pool = path_pool(graph, index)?;
                let (token_in, token_out) = (path.tokens[i], path.tokens[i + 1]);
                let fee = resolver.resolve(pool, &token_in)?;
                let (reserve_in, reserve_out) = reserves(pool, &token_in)?;

                let output = amount_out(current, reserve_in, reserve_out, &fee);
                if output == 0 {
                    return Err(AmmError::ZeroOutput { pool: pool.id });
                }

                hops.push(hop_quote(
                    pool,
                    token_in,
                    token_out,
                    current,
                    output,
                    reserve_in,
                    reserve_out,
                    &fee,
                ));
                current = output;
            }
        }
        SwapAmount::ExactOut(output) => {
            let mut needed = output;
            for (i, &index) in path.pools.iter().enumerate().rev() {
                let pool = path_pool(graph, index)?;
                let (token_in, token_out) = (path.tokens[i], path.tokens[i + 1]);
                let fee = resolver.resolve(pool, &token_in)?;
                let (reserve_in, reserve_out) = reserves(pool, &token_in)?;

                let input = amount_in(needed, reserve_in, reserve_out, &fee)?;

                hops.push(hop_quote(
                    pool,
                    token_in,
                    token_out,
                    input,
                    needed,
                    reserve_in,
                    reserve_out,
                    &fee,
                ));
                needed = input;
            }
            hops.reverse();
        }
    }

    assemble(hops)
}

// ---------------------------------------------------------------------------
// Step 3: Selection
// ---------------------------------------------------------------------------

/// Ordering of two routes for the fixed side of the swap; `Less` is better.
fn compare_routes(amount: &SwapAmount, a: &RouteQuote, b: &RouteQuote) -> Ordering {
    match amount {
        SwapAmount::ExactIn(_) => b.amount_out.cmp(&a.amount_out),
        SwapAmount::ExactOut(_) => a.amount_in.cmp(&b.amount_in),
    }
}

/// Quote every path, dropping the ones that cannot be executed.
///
/// Returns surviving routes in discovery order. Checks `cancel` before each
/// evaluation.
pub fn evaluate_paths(
    graph: &PoolGraph,
    resolver: &FeeResolver,
    paths: &[CandidatePath],
    amount: SwapAmount,
    cancel: &CancelToken,
) -> Result<Vec<RouteQuote>, AmmError> {
    let mut routes = Vec::with_capacity(paths.len());

    for path in paths {
        if cancel.is_cancelled() {
            return Err(AmmError::Cancelled);
        }
        match quote_path(graph, resolver, path, amount) {
            Ok(route) => routes.push(route),
            Err(e) => {
                tracing::debug!(
                    hops = path.hop_count(),
                    reason = e.error_code(),
                    "Dropping candidate route: {}",
                    e
                );
            }
        }
    }

    Ok(routes)
}

/// Best route among `routes` by strict comparison, so ties keep the earlier
pub fn select_best(amount: &SwapAmount, routes: Vec<RouteQuote>) -> Option<RouteQuote> {
    let mut best: Option<RouteQuote> = None;
    for route in routes {
        let better = match &best {
            None => true,
            Some(current) => compare_routes(amount, &route, current) == Ordering::Less,
        };
        if better {
            best = Some(route);
        }
    }
    best
}

/// Order routes best-first, keeping discovery order among equals
pub fn order_routes(amount: &SwapAmount, routes: &mut Vec<RouteQuote>, max_routes: usize) {
    routes.sort_by(|a, b| compare_routes(amount, a, b));
    routes.truncate(max_routes);
}

fn no_route(query: &RouteQuery) -> AmmError {
    AmmError::NoRouteFound {
        token_in: query.token_in,
        token_out: query.token_out,
        max_hops: query.max_hops,
    }
}

/// Surviving routes over already discovered `paths`, or `NoRouteFound`
pub fn routes_over_paths(
    graph: &PoolGraph,
    resolver: &FeeResolver,
    query: &RouteQuery,
    paths: &[CandidatePath],
    cancel: &CancelToken,
) -> Result<Vec<RouteQuote>, AmmError> {
    let routes = evaluate_paths(graph, resolver, paths, query.amount, cancel)?;
    if routes.is_empty() {
        return Err(no_route(query));
    }

    tracing::debug!(
        candidates = paths.len(),
        surviving = routes.len(),
        "Evaluated candidate routes"
    );
    Ok(routes)
}

/// Find and quote the best route for `query`
pub fn best_route(
    graph: &PoolGraph,
    resolver: &FeeResolver,
    query: &RouteQuery,
    cancel: &CancelToken,
) -> Result<RouteQuote, AmmError> {
    let paths = find_paths(
        graph,
        &query.token_in,
        &query.token_out,
        query.max_hops,
        cancel,
    )?;
    let routes = routes_over_paths(graph, resolver, query, &paths, cancel)?;
    select_best(&query.amount, routes).ok_or_else(|| no_route(query))
}

/// Find and quote all routes, returning the top `max_routes` best-first
pub fn rank_routes(
    graph: &PoolGraph,
    resolver: &FeeResolver,
    query: &RouteQuery,
    max_routes: usize,
    cancel: &CancelToken,
) -> Result<Vec<RouteQuote>, AmmError> {
    let paths = find_paths(
        graph,
        &query.token_in,
        &query.token_out,
        query.max_hops,
        cancel,
    )?;
    let mut routes = routes_over_paths(graph, resolver, query, &paths, cancel)?;
    order_routes(&query.amount, &mut routes, max_routes);
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_reader::LaunchProfile;
    use swapline_core::ReadError;

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    const A: u8 = 0x0a;
    const B: u8 = 0x0b;
    const C: u8 = 0x0c;
    const D: u8 = 0x0d;
    const PLATFORM: u8 = 0xee;

    fn make_pool(id: u8, a: u8, b: u8, ra: Amount, rb: Amount) -> Pool {
        Pool::new(addr(id), addr(a), addr(b), ra, rb)
    }

    fn plain() -> FeeResolver {
        FeeResolver::new(addr(PLATFORM))
    }

    fn exact_in(a: u8, b: u8, amount: Amount, max_hops: usize) -> RouteQuery {
        RouteQuery {
            token_in: addr(a),
            token_out: addr(b),
            amount: SwapAmount::ExactIn(amount),
            max_hops,
        }
    }

    fn exact_out(a: u8, b: u8, amount: Amount, max_hops: usize) -> RouteQuery {
        RouteQuery {
            amount: SwapAmount::ExactOut(amount),
            ..exact_in(a, b, 0, max_hops)
        }
    }

    fn pool_ids(graph: &PoolGraph, path: &CandidatePath) -> Vec<Address> {
        path.pools
            .iter()
            .map(|&i| graph.pool(i).unwrap().id)
            .collect()
    }

    #[test]
    fn test_find_direct_path_first() {
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, C, 1000, 1000),
            make_pool(0xa2, C, B, 1000, 1000),
            make_pool(0xa3, A, B, 1000, 1000),
        ]);
        let paths = find_paths(&graph, &addr(A), &addr(B), 3, &CancelToken::new()).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(pool_ids(&graph, &paths[0]), vec![addr(0xa3)]);
        assert_eq!(pool_ids(&graph, &paths[1]), vec![addr(0xa1), addr(0xa2)]);
        assert_eq!(paths[1].tokens, vec![addr(A), addr(C), addr(B)]);
    }

    #[test]
    fn test_find_multihop_path() {
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, C, 1000, 1000),
            make_pool(0xa2, C, D, 1000, 1000),
            make_pool(0xa3, D, B, 1000, 1000),
        ]);
        let paths = find_paths(&graph, &addr(A), &addr(B), 3, &CancelToken::new()).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].hop_count(), 3);
        assert_eq!(paths[0].hop_inputs(), &[addr(A), addr(C), addr(D)]);
    }

    #[test]
    fn test_max_hops_limit() {
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, C, 1000, 1000),
            make_pool(0xa2, C, D, 1000, 1000),
            make_pool(0xa3, D, B, 1000, 1000),
        ]);
        let cancel = CancelToken::new();
        assert!(find_paths(&graph, &addr(A), &addr(B), 2, &cancel)
            .unwrap()
            .is_empty());
        let err = best_route(&graph, &plain(), &exact_in(A, B, 10, 2), &cancel).unwrap_err();
        assert!(matches!(err, AmmError::NoRouteFound { max_hops: 2, .. }));

        assert!(matches!(
            find_paths(&graph, &addr(A), &addr(B), 0, &cancel),
            Err(AmmError::InvalidInput { .. })
        ));
        assert!(matches!(
            find_paths(&graph, &addr(A), &addr(B), MAX_HOPS_LIMIT + 1, &cancel),
            Err(AmmError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_no_pool_reuse_but_token_revisit() {
        // Two A-B pools and an A-C pool: A -> B -> A -> C revisits A
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, B, 1000, 1000),
            make_pool(0xa2, B, A, 1000, 1000),
            make_pool(0xa3, A, C, 1000, 1000),
        ]);
        let paths = find_paths(&graph, &addr(A), &addr(C), 3, &CancelToken::new()).unwrap();
        let routes: Vec<Vec<Address>> = paths.iter().map(|p| pool_ids(&graph, p)).collect();

        assert_eq!(routes[0], vec![addr(0xa3)]);
        assert!(routes.contains(&vec![addr(0xa1), addr(0xa2), addr(0xa3)]));
        assert!(routes.contains(&vec![addr(0xa2), addr(0xa1), addr(0xa3)]));
        for route in &routes {
            let distinct: HashSet<_> = route.iter().collect();
            assert_eq!(distinct.len(), route.len(), "pool reused in {:?}", route);
        }
    }

    #[test]
    fn test_path_not_extended_past_target() {
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, B, 1000, 1000),
            make_pool(0xa2, B, C, 1000, 1000),
            make_pool(0xa3, C, B, 1000, 1000),
        ]);
        let paths = find_paths(&graph, &addr(A), &addr(B), 3, &CancelToken::new()).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].hop_count(), 1);
    }

    #[test]
    fn test_two_hop_beats_thin_direct_pool() {
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, B, 1_000, 1_000),
            make_pool(0xa2, A, C, 1_000_000, 1_000_000),
            make_pool(0xa3, C, B, 1_000_000, 1_000_000),
        ]);
        let route = best_route(&graph, &plain(), &exact_in(A, B, 100, 3), &CancelToken::new())
            .unwrap();
        assert_eq!(route.pool_ids(), vec![addr(0xa2), addr(0xa3)]);
        assert_eq!(route.amount_out, 98);
        assert_eq!(route.amount_in, 100);
    }

    #[test]
    fn test_tie_goes_to_first_discovered() {
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, B, 5_000, 5_000),
            make_pool(0xa2, A, B, 5_000, 5_000),
        ]);
        let cancel = CancelToken::new();
        let route = best_route(&graph, &plain(), &exact_in(A, B, 100, 3), &cancel).unwrap();
        assert_eq!(route.pool_ids(), vec![addr(0xa1)]);

        let route = best_route(&graph, &plain(), &exact_out(A, B, 100, 3), &cancel).unwrap();
        assert_eq!(route.pool_ids(), vec![addr(0xa1)]);

        // Reproducible
        let again = best_route(&graph, &plain(), &exact_out(A, B, 100, 3), &cancel).unwrap();
        assert_eq!(route, again);
    }

    #[test]
    fn test_exact_out_minimizes_input() {
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, B, 1_000, 1_000),
            make_pool(0xa2, A, B, 10_000, 10_000),
        ]);
        let route = best_route(&graph, &plain(), &exact_out(A, B, 100, 1), &CancelToken::new())
            .unwrap();
        assert_eq!(route.pool_ids(), vec![addr(0xa2)]);
        assert_eq!(route.amount_in, 102);
        assert_eq!(route.amount_out, 100);
    }

    #[test]
    fn test_exact_out_multi_hop_walks_backward() {
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, C, 100_000, 100_000),
            make_pool(0xa2, C, B, 100_000, 100_000),
        ]);
        let route = best_route(&graph, &plain(), &exact_out(A, B, 500, 2), &CancelToken::new())
            .unwrap();
        assert_eq!(route.hops.len(), 2);
        assert_eq!(route.hops[1].amount_out, 500);
        assert_eq!(route.hops[0].amount_out, route.hops[1].amount_in);

        // The computed input really buys the requested output
        let forward = best_route(
            &graph,
            &plain(),
            &exact_in(A, B, route.amount_in, 2),
            &CancelToken::new(),
        )
        .unwrap();
        assert!(forward.amount_out >= 500);
    }

    #[test]
    fn test_exact_out_over_reserve_eliminates_route() {
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, B, 1_000, 150),
            make_pool(0xa2, A, C, 1_000_000, 1_000_000),
            make_pool(0xa3, C, B, 1_000_000, 1_000_000),
        ]);
        let cancel = CancelToken::new();
        let route = best_route(&graph, &plain(), &exact_out(A, B, 200, 3), &cancel).unwrap();
        assert_eq!(route.pool_ids(), vec![addr(0xa2), addr(0xa3)]);

        let err = best_route(&graph, &plain(), &exact_out(A, B, 2_000_000, 3), &cancel)
            .unwrap_err();
        assert!(matches!(err, AmmError::NoRouteFound { .. }));
    }

    #[test]
    fn test_zero_output_eliminates_route() {
        let graph = PoolGraph::new(vec![make_pool(0xa1, A, B, 1_000_000, 10)]);
        let err = best_route(&graph, &plain(), &exact_in(A, B, 1, 1), &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, AmmError::NoRouteFound { .. }));
    }

    #[test]
    fn test_per_hop_fees_sum_to_total() {
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, C, 1_000_000, 2_000_000),
            make_pool(0xa2, C, D, 2_000_000, 3_000_000),
            make_pool(0xa3, D, B, 3_000_000, 1_000_000),
        ]);
        let route = best_route(
            &graph,
            &plain(),
            &exact_in(A, B, 50_000, 3),
            &CancelToken::new(),
        )
        .unwrap();
        let sum: Amount = route.hops.iter().map(|h| h.fee_amount).sum();
        assert_eq!(sum, route.total_fee_amount);
        assert_eq!(route.hops[0].fee_amount, 150);
        let impact: i64 = route.hops.iter().map(|h| h.impact_bps).sum();
        assert_eq!(impact, route.price_impact_bps);
    }

    #[test]
    fn test_launch_fee_only_on_its_hop() {
        // A -> C -> B where C is a launch token
        let creator = addr(0xcc);
        let resolver = plain().with_profile(
            addr(C),
            Some(LaunchProfile {
                platform: addr(PLATFORM),
                creator,
            }),
        );
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, C, 1_000_000, 1_000_000),
            make_pool(0xa2, C, B, 1_000_000, 1_000_000),
        ]);
        let route = best_route(
            &graph,
            &resolver,
            &exact_in(A, B, 10_000, 2),
            &CancelToken::new(),
        )
        .unwrap();

        let first = &route.hops[0];
        assert_eq!(first.creator_fee_amount, 0);
        assert!(first.creator_recipient.is_zero());
        assert_eq!(first.fee_amount, 30);

        let second = &route.hops[1];
        assert_eq!(second.token_in, addr(C));
        assert_eq!(second.creator_recipient, creator);
        assert!(second.creator_fee_amount > 0);
        assert_eq!(
            second.amount_out,
            amount_out(first.amount_out, 1_000_000, 1_000_000, &FeeInfo::launch(creator))
        );
    }

    #[test]
    fn test_unavailable_profile_drops_only_its_hops() {
        // The route through C is better but C's profile could not be read
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, C, 1_000_000, 1_000_000),
            make_pool(0xa2, C, B, 10_000_000, 10_000_000),
            make_pool(0xa3, A, D, 1_000_000, 1_000_000),
            make_pool(0xa4, D, B, 1_000_000, 1_000_000),
        ]);
        let cancel = CancelToken::new();
        let best = best_route(&graph, &plain(), &exact_in(A, B, 10_000, 2), &cancel).unwrap();
        assert_eq!(best.pool_ids(), vec![addr(0xa1), addr(0xa2)]);

        let mut resolver = plain();
        resolver.mark_unavailable(
            addr(C),
            ReadError::Unreachable {
                source_name: "test".into(),
            },
        );
        let best = best_route(&graph, &resolver, &exact_in(A, B, 10_000, 2), &cancel).unwrap();
        assert_eq!(best.pool_ids(), vec![addr(0xa3), addr(0xa4)]);
    }

    #[test]
    fn test_rank_routes_best_first() {
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, B, 1_000, 1_000),
            make_pool(0xa2, A, B, 100_000, 100_000),
            make_pool(0xa3, A, B, 10_000, 10_000),
        ]);
        let cancel = CancelToken::new();
        let query = exact_in(A, B, 500, 1);
        let ranked = rank_routes(&graph, &plain(), &query, 5, &cancel).unwrap();
        let order: Vec<Address> = ranked.iter().map(|r| r.hops[0].pool_id).collect();
        assert_eq!(order, vec![addr(0xa2), addr(0xa3), addr(0xa1)]);

        let best = best_route(&graph, &plain(), &query, &cancel).unwrap();
        assert_eq!(ranked[0], best);

        let top = rank_routes(&graph, &plain(), &query, 1, &cancel).unwrap();
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn test_hop_input_tokens_distinct() {
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, B, 1000, 1000),
            make_pool(0xa2, A, C, 1000, 1000),
            make_pool(0xa3, C, B, 1000, 1000),
        ]);
        let paths = find_paths(&graph, &addr(A), &addr(B), 2, &CancelToken::new()).unwrap();
        assert_eq!(hop_input_tokens(&paths), vec![addr(A), addr(C)]);
    }

    #[test]
    fn test_cancelled_search() {
        let graph = PoolGraph::new(vec![make_pool(0xa1, A, B, 1000, 1000)]);
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(
            find_paths(&graph, &addr(A), &addr(B), 3, &cancel),
            Err(AmmError::Cancelled)
        );
        let paths = vec![CandidatePath {
            pools: vec![0],
            tokens: vec![addr(A), addr(B)],
        }];
        assert_eq!(
            evaluate_paths(&graph, &plain(), &paths, SwapAmount::ExactIn(10), &cancel),
            Err(AmmError::Cancelled)
        );
    }

    #[test]
    fn test_cancel_stops_running_search() {
        // every pair of 16 tokens is pooled, so a 6-hop search cannot finish
        // before the token fires
        let tokens: Vec<u8> = (1..=16).collect();
        let mut pools = Vec::new();
        for (i, &a) in tokens.iter().enumerate() {
            for &b in &tokens[i + 1..] {
                pools.push(make_pool(0x40 + pools.len() as u8, a, b, 1000, 1000));
            }
        }
        let graph = PoolGraph::new(pools);
        assert_eq!(graph.pool_count(), 120);

        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        let canceller = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let result = find_paths(&graph, &addr(1), &addr(16), 6, &cancel);
        canceller.join().unwrap();

        assert_eq!(result, Err(AmmError::Cancelled));
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_short_token_list_has_no_hop_inputs() {
        let graph = PoolGraph::new(vec![
            make_pool(0xa1, A, C, 1000, 1000),
            make_pool(0xa2, C, B, 1000, 1000),
        ]);
        let malformed = CandidatePath {
            pools: vec![0, 1],
            tokens: vec![addr(A)],
        };
        assert!(malformed.hop_inputs().is_empty());
        assert!(hop_input_tokens(std::slice::from_ref(&malformed)).is_empty());
        assert!(matches!(
            quote_path(&graph, &plain(), &malformed, SwapAmount::ExactIn(10)),
            Err(AmmError::InvalidInput { .. })
        ));
    }
}
