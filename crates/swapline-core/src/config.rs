//! Configuration types for Swapline

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_HOPS, DEFAULT_TOLERANCE_BPS, MAX_HOPS_LIMIT};
use crate::{Address, Error, Result};

/// Environment variable naming the JSON config file
pub const CONFIG_ENV_VAR: &str = "SWAPLINE_CONFIG";

/// Routing and quoting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Launch platform whose tokens carry the split creator fee
    #[serde(default)]
    pub launch_platform: Address,

    /// Hop bound used when a request does not set one
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    /// Slippage tolerance used when a request does not set one
    #[serde(default = "default_tolerance_bps")]
    pub tolerance_bps: u32,

    /// Timeout for each external read, in milliseconds
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Number of alternatives returned by route ranking
    #[serde(default = "default_max_routes")]
    pub max_routes: usize,
}

fn default_max_hops() -> usize {
    DEFAULT_MAX_HOPS
}

fn default_tolerance_bps() -> u32 {
    DEFAULT_TOLERANCE_BPS
}

fn default_read_timeout_ms() -> u64 {
    10_000
}

fn default_max_routes() -> usize {
    5
}

impl RouterConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            launch_platform: Address::ZERO,
            max_hops: default_max_hops(),
            tolerance_bps: default_tolerance_bps(),
            read_timeout_ms: default_read_timeout_ms(),
            max_routes: default_max_routes(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Routing settings
    #[serde(default)]
    pub router: RouterConfig,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// JSON pool snapshot served by the built-in reader
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

fn default_api_port() -> u16 {
    19080
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            router: RouterConfig::default(),
            api_port: default_api_port(),
            snapshot_path: None,
        }
    }
}

impl AppConfig {
    /// Load from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by `SWAPLINE_CONFIG`, or defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.router.max_hops == 0 || self.router.max_hops > MAX_HOPS_LIMIT {
            return Err(Error::Config(format!(
                "router.max_hops must be between 1 and {}",
                MAX_HOPS_LIMIT
            )));
        }
        if self.router.read_timeout_ms == 0 {
            return Err(Error::Config("router.read_timeout_ms must be positive".into()));
        }
        if self.router.tolerance_bps > crate::constants::BPS_DENOMINATOR {
            return Err(Error::Config(format!(
                "router.tolerance_bps {} exceeds 10000",
                self.router.tolerance_bps
            )));
        }
        Ok(())
    }
}
