//! Pool graph
//!
//! Tokens are nodes and routable pools are edges. The graph is built once
//! from a snapshot and never changes or fetches afterwards; a search borrows
//! it immutably.

use std::collections::{HashMap, HashSet};

use swapline_core::{Address, PoolId};

use crate::state::Pool;

/// Adjacency entry: the pool (by index) and the token on its far side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    pub pool: usize,
    pub token: Address,
}

/// Adjacency-list pool graph over canonical pools.
#[derive(Debug, Clone, Default)]
pub struct PoolGraph {
    pools: Vec<Pool>,
    adjacency: HashMap<Address, Vec<Neighbor>>,
    pairs: HashMap<(Address, Address), usize>,
    inert_count: usize,
}

impl PoolGraph {
    /// Build a graph from pools in enumeration order.
    ///
    /// Inert pools (an empty reserve) are counted and left out. Pools joining
    /// a token to itself, and repeated pool ids, are dropped.
    pub fn new(pools: impl IntoIterator<Item = Pool>) -> Self {
        let mut graph = Self::default();
        let mut seen: HashSet<PoolId> = HashSet::new();

        for pool in pools {
            if pool.token0 == pool.token1 {
                tracing::warn!(pool = %pool.id, "Skipping pool with identical tokens");
                continue;
            }
            if !seen.insert(pool.id) {
                tracing::warn!(pool = %pool.id, "Skipping duplicate pool id");
                continue;
            }
            if pool.is_inert() {
                graph.inert_count += 1;
                continue;
            }

            let index = graph.pools.len();
            graph
                .adjacency
                .entry(pool.token0)
                .or_default()
                .push(Neighbor {
                    pool: index,
                    token: pool.token1,
                });
            graph
                .adjacency
                .entry(pool.token1)
                .or_default()
                .push(Neighbor {
                    pool: index,
                    token: pool.token0,
                });
            graph
                .pairs
                .entry((pool.token0, pool.token1))
                .or_insert(index);
            graph.pools.push(pool);
        }

        tracing::debug!(
            pools = graph.pools.len(),
            inert = graph.inert_count,
            tokens = graph.adjacency.len(),
            "Built pool graph"
        );
        graph
    }

    /// Number of routable pools
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Number of pools excluded for an empty reserve
    pub fn inert_count(&self) -> usize {
        self.inert_count
    }

    pub fn token_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn pool(&self, index: usize) -> Option<&Pool> {
        self.pools.get(index)
    }

    /// Routable pools in enumeration order
    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn contains_token(&self, token: &Address) -> bool {
        self.adjacency.contains_key(token)
    }

    /// Raw adjacency of `token`, in pool enumeration order
    pub fn neighbor_edges(&self, token: &Address) -> &[Neighbor] {
        self.adjacency
            .get(token)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Pools touching `token` with the counter token of each
    pub fn neighbors<'a>(
        &'a self,
        token: &Address,
    ) -> impl Iterator<Item = (&'a Pool, Address)> + 'a {
        self.neighbor_edges(token)
            .iter()
            .map(move |n| (&self.pools[n.pool], n.token))
    }

    /// Index of the first pool joining `a` and `b`, in either order
    pub fn direct_pool_index(&self, a: &Address, b: &Address) -> Option<usize> {
        let key = if a <= b { (*a, *b) } else { (*b, *a) };
        self.pairs.get(&key).copied()
    }

    /// First pool joining `a` and `b`, in either order
    pub fn direct_pool(&self, a: &Address, b: &Address) -> Option<&Pool> {
        self.direct_pool_index(a, b).map(|i| &self.pools[i])
    }
}

impl FromIterator<Pool> for PoolGraph {
    fn from_iter<I: IntoIterator<Item = Pool>>(iter: I) -> Self {
        Self::new(iter)
    }
}
