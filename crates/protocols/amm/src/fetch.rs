//! Pool and fee-profile fetching
//!
//! The only async part of the crate. Reads a fresh snapshot of every pool
//! from a [`ChainReader`], builds the graph, finds candidate paths, then
//! probes the launch profile of each token sold along any of them. Reads run
//! concurrently, each under the configured timeout. A failed pool read drops
//! that pool and a failed profile read drops hops selling that token; only
//! the pool enumeration itself is fatal.

use std::time::Duration;

use chain_reader::{probe_launch_profile, timed_read, CancelToken, ChainReader};
use futures::future::join_all;
use swapline_core::{Address, ReadError, RouterConfig};

use crate::fees::FeeResolver;
use crate::graph::PoolGraph;
use crate::quote::{finish_quote, validate_request};
use crate::router::{
    find_paths, hop_input_tokens, order_routes, routes_over_paths, select_best, RouteQuery,
};
use crate::state::{AmmError, Pool, RouteQuote, SwapQuote, SwapQuoteRequest};

/// Graph built from one round of pool reads
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub graph: PoolGraph,
    /// Pools whose read failed and were left out
    pub failed_pools: usize,
}

/// Read every pool the source knows about and build the graph
pub async fn load_pool_graph(
    reader: &dyn ChainReader,
    timeout: Duration,
    cancel: &CancelToken,
) -> Result<MarketSnapshot, AmmError> {
    let ids = timed_read("pool list", timeout, cancel, reader.pool_ids()).await?;

    let reads = ids.iter().map(|id| {
        timed_read(
            format!("pool {}", id),
            timeout,
            cancel,
            reader.pool_snapshot(id),
        )
    });
    let results = join_all(reads).await;

    let mut pools = Vec::with_capacity(results.len());
    let mut failed_pools = 0;
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(snapshot) => pools.push(Pool::from(snapshot)),
            Err(ReadError::Cancelled) => return Err(AmmError::Cancelled),
            Err(e) => {
                tracing::warn!("Failed to read pool {}: {}", id.short(), e);
                failed_pools += 1;
            }
        }
    }

    let graph = PoolGraph::new(pools);
    tracing::info!(
        source = reader.source_name(),
        pools = graph.pool_count(),
        inert = graph.inert_count(),
        failed = failed_pools,
        "Loaded pool graph"
    );

    Ok(MarketSnapshot {
        graph,
        failed_pools,
    })
}

/// Probe the launch profile of each token, once per token
pub async fn load_fee_resolver(
    reader: &dyn ChainReader,
    tokens: &[Address],
    launch_platform: Address,
    timeout: Duration,
    cancel: &CancelToken,
) -> Result<FeeResolver, AmmError> {
    let probes = tokens
        .iter()
        .map(|token| probe_launch_profile(reader, token, timeout, cancel));
    let results = join_all(probes).await;

    let mut resolver = FeeResolver::new(launch_platform);
    for (token, result) in tokens.iter().zip(results) {
        match result {
            Ok(profile) => resolver.insert_profile(*token, profile),
            Err(ReadError::Cancelled) => return Err(AmmError::Cancelled),
            Err(e) => {
                tracing::warn!("Failed to probe fee profile of {}: {}", token.short(), e);
                resolver.mark_unavailable(*token, e);
            }
        }
    }

    Ok(resolver)
}

/// Read pools and profiles, then quote every surviving route
async fn live_routes(
    reader: &dyn ChainReader,
    config: &RouterConfig,
    query: &RouteQuery,
    cancel: &CancelToken,
) -> Result<Vec<RouteQuote>, AmmError> {
    let timeout = config.read_timeout();
    let market = load_pool_graph(reader, timeout, cancel).await?;

    let paths = find_paths(
        &market.graph,
        &query.token_in,
        &query.token_out,
        query.max_hops,
        cancel,
    )?;
    let tokens = hop_input_tokens(&paths);
    let resolver =
        load_fee_resolver(reader, &tokens, config.launch_platform, timeout, cancel).await?;

    routes_over_paths(&market.graph, &resolver, query, &paths, cancel)
}

/// Quote the best route using live reads
pub async fn quote_swap_live(
    reader: &dyn ChainReader,
    config: &RouterConfig,
    request: &SwapQuoteRequest,
    cancel: &CancelToken,
) -> Result<SwapQuote, AmmError> {
    let query = validate_request(request)?;
    let routes = live_routes(reader, config, &query, cancel).await?;
    let route = select_best(&query.amount, routes).ok_or(AmmError::NoRouteFound {
        token_in: query.token_in,
        token_out: query.token_out,
        max_hops: query.max_hops,
    })?;
    finish_quote(&query, route, request.tolerance_bps)
}

/// Quote up to `config.max_routes` alternatives using live reads
pub async fn rank_routes_live(
    reader: &dyn ChainReader,
    config: &RouterConfig,
    request: &SwapQuoteRequest,
    cancel: &CancelToken,
) -> Result<Vec<SwapQuote>, AmmError> {
    let query = validate_request(request)?;
    let mut routes = live_routes(reader, config, &query, cancel).await?;
    order_routes(&query.amount, &mut routes, config.max_routes);
    routes
        .into_iter()
        .map(|route| finish_quote(&query, route, request.tolerance_bps))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chain_reader::{LaunchProfile, PoolSnapshot};
    use std::collections::{HashMap, HashSet};
    use swapline_core::PoolId;

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    const A: u8 = 0x0a;
    const B: u8 = 0x0b;
    const C: u8 = 0x0c;
    const PLATFORM: u8 = 0xee;

    #[derive(Default)]
    struct MockReader {
        pools: Vec<PoolSnapshot>,
        profiles: HashMap<Address, LaunchProfile>,
        broken_pools: HashSet<PoolId>,
        broken_tokens: HashSet<Address>,
        slow_tokens: HashSet<Address>,
        list_fails: bool,
    }

    impl MockReader {
        fn with_pool(mut self, id: u8, a: u8, b: u8, ra: u128, rb: u128) -> Self {
            self.pools.push(PoolSnapshot {
                id: addr(id),
                token0: addr(a),
                token1: addr(b),
                reserve0: ra,
                reserve1: rb,
            });
            self
        }
    }

    #[async_trait]
    impl ChainReader for MockReader {
        fn source_name(&self) -> &str {
            "mock"
        }

        async fn pool_ids(&self) -> chain_reader::Result<Vec<PoolId>> {
            if self.list_fails {
                return Err(ReadError::Unreachable {
                    source_name: "mock".into(),
                });
            }
            Ok(self.pools.iter().map(|p| p.id).collect())
        }

        async fn pool_snapshot(&self, pool: &PoolId) -> chain_reader::Result<PoolSnapshot> {
            if self.broken_pools.contains(pool) {
                return Err(ReadError::Malformed {
                    message: "bad reserves".into(),
                });
            }
            self.pools
                .iter()
                .find(|p| p.id == *pool)
                .cloned()
                .ok_or(ReadError::NotFound {
                    what: pool.to_string(),
                })
        }

        async fn launch_profile(
            &self,
            token: &Address,
        ) -> chain_reader::Result<Option<LaunchProfile>> {
            if self.slow_tokens.contains(token) {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            if self.broken_tokens.contains(token) {
                return Err(ReadError::Unreachable {
                    source_name: "mock".into(),
                });
            }
            Ok(self.profiles.get(token).copied())
        }
    }

    fn config() -> RouterConfig {
        RouterConfig {
            launch_platform: addr(PLATFORM),
            read_timeout_ms: 200,
            ..RouterConfig::default()
        }
    }

    fn two_routes() -> MockReader {
        // A -> C -> B is deeper than A -> B
        MockReader::default()
            .with_pool(0xa1, A, B, 10_000, 10_000)
            .with_pool(0xa2, A, C, 1_000_000, 1_000_000)
            .with_pool(0xa3, C, B, 1_000_000, 1_000_000)
    }

    #[tokio::test]
    async fn test_live_quote_picks_best_route() {
        let reader = two_routes();
        let request = SwapQuoteRequest::exact_in(addr(A), addr(B), 1_000);
        let quote = quote_swap_live(&reader, &config(), &request, &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(quote.route, vec![addr(0xa2), addr(0xa3)]);
        assert!(quote.min_amount_out().unwrap() <= quote.amount_out);
    }

    #[tokio::test]
    async fn test_failed_pool_read_is_tolerated() {
        let mut reader = two_routes();
        reader.broken_pools.insert(addr(0xa3));

        let market = load_pool_graph(&reader, Duration::from_secs(1), &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(market.failed_pools, 1);
        assert_eq!(market.graph.pool_count(), 2);

        let request = SwapQuoteRequest::exact_in(addr(A), addr(B), 1_000);
        let quote = quote_swap_live(&reader, &config(), &request, &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(quote.route, vec![addr(0xa1)]);
    }

    #[tokio::test]
    async fn test_failed_profile_read_drops_its_hops() {
        let mut reader = two_routes();
        reader.broken_tokens.insert(addr(C));

        let request = SwapQuoteRequest::exact_in(addr(A), addr(B), 1_000);
        let quote = quote_swap_live(&reader, &config(), &request, &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(quote.route, vec![addr(0xa1)]);

        // With every route blocked the caller sees no route
        reader.broken_tokens.insert(addr(A));
        let err = quote_swap_live(&reader, &config(), &request, &CancelToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AmmError::NoRouteFound { .. }));
    }

    #[tokio::test]
    async fn test_slow_profile_read_times_out() {
        let mut reader = two_routes();
        reader.slow_tokens.insert(addr(C));

        let resolver = load_fee_resolver(
            &reader,
            &[addr(A), addr(C)],
            addr(PLATFORM),
            Duration::from_millis(20),
            &CancelToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(resolver.unavailable_count(), 1);
        assert!(matches!(
            resolver.tier_for(&addr(C)),
            Err(AmmError::ExternalRead(ReadError::Timeout { .. }))
        ));
    }

    #[tokio::test]
    async fn test_launch_profile_applied_live() {
        let mut reader = two_routes();
        reader.profiles.insert(
            addr(C),
            LaunchProfile {
                platform: addr(PLATFORM),
                creator: addr(0xcc),
            },
        );
        let request = SwapQuoteRequest::exact_in(addr(A), addr(B), 1_000);
        let quote = quote_swap_live(&reader, &config(), &request, &CancelToken::new())
            .await
            .unwrap();
        assert!(quote.per_hop[0].creator_recipient.is_zero());
        assert_eq!(quote.per_hop[1].creator_recipient, addr(0xcc));
    }

    #[tokio::test]
    async fn test_pool_list_failure_is_fatal() {
        let mut reader = two_routes();
        reader.list_fails = true;
        let request = SwapQuoteRequest::exact_in(addr(A), addr(B), 1_000);
        let err = quote_swap_live(&reader, &config(), &request, &CancelToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AmmError::ExternalRead(ReadError::Unreachable { .. })));
        assert_eq!(err.status_code(), 503);
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight_reads() {
        let mut reader = two_routes();
        reader.slow_tokens.insert(addr(A));
        let mut config = config();
        config.read_timeout_ms = 60_000;

        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let request = SwapQuoteRequest::exact_in(addr(A), addr(B), 1_000);
        let err = tokio::time::timeout(
            Duration::from_secs(5),
            quote_swap_live(&reader, &config, &request, &cancel),
        )
        .await
        .expect("cancellation did not stop the quote")
        .unwrap_err();
        assert_eq!(err, AmmError::Cancelled);
    }

    #[tokio::test]
    async fn test_rank_routes_live() {
        let reader = two_routes();
        let request = SwapQuoteRequest::exact_out(addr(A), addr(B), 500);
        let quotes = rank_routes_live(&reader, &config(), &request, &CancelToken::new())
            .await
            .unwrap();
        assert_eq!(quotes.len(), 2);
        assert!(quotes[0].amount_in <= quotes[1].amount_in);
        assert!(quotes.iter().all(|q| q.amount_out == 500));
    }
}
