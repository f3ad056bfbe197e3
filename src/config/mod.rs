//! Engine configuration.
//!
//! Hosts load a TOML file describing market parameters, oracle policy, and
//! default trade guards. Everything numeric is in base units (e6) to match
//! the engine; nothing is hardcoded in the domain layer.

pub mod loader;

use serde::Deserialize;

pub use loader::load_config;

/// Top-level engine configuration, loaded from `engine.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Parameters for newly initialized markets.
    pub market: MarketParams,
    /// Oracle freshness policy.
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Default per-trade guards applied when a trade carries none.
    #[serde(default)]
    pub guards: GuardDefaults,
}

/// Parameters for market initialization.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketParams {
    /// LMSR liquidity parameter `b`, base units. Higher = deeper book.
    pub liquidity: i64,
    /// Trading fee in basis points.
    #[serde(default)]
    pub fee_bps: u16,
}

/// Oracle freshness policy.
#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// Maximum acceptable sample age for lifecycle reads, seconds.
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: i64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            max_age_secs: default_max_age_secs(),
        }
    }
}

/// Default trade guard settings.
///
/// Absent fields mean the corresponding guard is disabled — there is no
/// zero-means-off convention anywhere in this table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuardDefaults {
    /// Hard execution-price bound, scale e6 (e.g. 650000 = 0.65).
    pub price_limit_e6: Option<i64>,
    /// Ceiling on total trade cost, base currency units.
    pub max_total_cost: Option<u64>,
    /// Allow partial fills.
    #[serde(default)]
    pub allow_partial: bool,
    /// Minimum acceptable partial fill, base units. Only meaningful with
    /// `allow_partial`; omit it to accept any nonzero fill.
    pub min_fill_shares: Option<u64>,
}

fn default_max_age_secs() -> i64 {
    90
}
