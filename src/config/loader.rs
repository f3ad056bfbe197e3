//! Configuration loading and validation.
//!
//! Loads `engine.toml`, validates every parameter up front, and converts
//! the validated tables into domain inputs. A config that passes here can
//! be handed to the engine without further checks.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::guards::{FillPolicy, GuardConfig, MinFill};
use crate::domain::market::MarketState;

use super::{EngineConfig, GuardDefaults};

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns a detailed error if the file cannot be read, the TOML does not
/// parse, or any validation rule is violated.
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&content)?;

    info!(
        liquidity = config.market.liquidity,
        fee_bps = config.market.fee_bps,
        oracle_max_age_secs = config.oracle.max_age_secs,
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<EngineConfig> {
    let config: EngineConfig =
        toml::from_str(content).with_context(|| "Failed to parse engine config")?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &EngineConfig) -> Result<()> {
    anyhow::ensure!(
        config.market.liquidity > 0,
        "market.liquidity must be positive, got {}",
        config.market.liquidity
    );
    anyhow::ensure!(
        config.market.fee_bps < 10_000,
        "market.fee_bps must be below 10000 (100%), got {}",
        config.market.fee_bps
    );
    anyhow::ensure!(
        config.oracle.max_age_secs > 0,
        "oracle.max_age_secs must be positive, got {}",
        config.oracle.max_age_secs
    );

    let guards = &config.guards;
    if let Some(limit) = guards.price_limit_e6 {
        anyhow::ensure!(
            limit > 0 && limit < 1_000_000,
            "guards.price_limit_e6 must be strictly inside (0, 1000000), got {limit}"
        );
    }
    if let Some(max) = guards.max_total_cost {
        anyhow::ensure!(
            i64::try_from(max).is_ok(),
            "guards.max_total_cost too large to represent: {max}"
        );
    }
    if let Some(min_fill) = guards.min_fill_shares {
        anyhow::ensure!(
            guards.allow_partial,
            "guards.min_fill_shares requires guards.allow_partial = true"
        );
        anyhow::ensure!(
            min_fill > 0,
            "guards.min_fill_shares must be nonzero; omit it to accept any fill"
        );
    }
    Ok(())
}

impl EngineConfig {
    /// Builds the domain guard config from the validated defaults table.
    pub fn guard_config(&self) -> GuardConfig {
        GuardConfig {
            price_limit: self.guards.price_limit_e6.map(|limit| Decimal::new(limit, 6)),
            slippage: None,
            max_total_cost: self.guards.max_total_cost,
            fill_policy: fill_policy(&self.guards),
        }
    }

    /// Initializes a fresh market from the validated parameters.
    ///
    /// # Errors
    /// Propagates `InvalidLiquidity`; unreachable after `validate_config`.
    pub fn new_market(&self, start_price: i64) -> Result<MarketState> {
        MarketState::new(self.market.liquidity, self.market.fee_bps, start_price)
            .map_err(anyhow::Error::from)
    }
}

fn fill_policy(guards: &GuardDefaults) -> FillPolicy {
    if !guards.allow_partial {
        return FillPolicy::AllOrNothing;
    }
    FillPolicy::Partial {
        min_fill: guards
            .min_fill_shares
            .map_or(MinFill::AnyNonZero, MinFill::AtLeast),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const FULL: &str = r#"
        [market]
        liquidity = 500000000
        fee_bps = 25

        [oracle]
        max_age_secs = 120

        [guards]
        price_limit_e6 = 650000
        max_total_cost = 100000000
        allow_partial = true
        min_fill_shares = 10000000
    "#;

    #[test]
    fn test_full_config_parses() {
        let config = parse_config(FULL).unwrap();
        assert_eq!(config.market.liquidity, 500_000_000);
        assert_eq!(config.market.fee_bps, 25);
        assert_eq!(config.oracle.max_age_secs, 120);

        let guards = config.guard_config();
        assert_eq!(guards.price_limit, Some(dec!(0.65)));
        assert_eq!(guards.max_total_cost, Some(100_000_000));
        assert_eq!(
            guards.fill_policy,
            FillPolicy::Partial { min_fill: MinFill::AtLeast(10_000_000) }
        );
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config("[market]\nliquidity = 500000000\n").unwrap();
        assert_eq!(config.market.fee_bps, 0);
        assert_eq!(config.oracle.max_age_secs, 90);

        let guards = config.guard_config();
        assert_eq!(guards.price_limit, None);
        assert_eq!(guards.max_total_cost, None);
        assert_eq!(guards.fill_policy, FillPolicy::AllOrNothing);
    }

    #[test]
    fn test_partial_without_floor_means_any_nonzero() {
        let config = parse_config(
            "[market]\nliquidity = 1000000\n[guards]\nallow_partial = true\n",
        )
        .unwrap();
        assert_eq!(
            config.guard_config().fill_policy,
            FillPolicy::Partial { min_fill: MinFill::AnyNonZero }
        );
    }

    #[test]
    fn test_rejects_non_positive_liquidity() {
        assert!(parse_config("[market]\nliquidity = 0\n").is_err());
        assert!(parse_config("[market]\nliquidity = -5\n").is_err());
    }

    #[test]
    fn test_rejects_zero_min_fill() {
        let err = parse_config(
            "[market]\nliquidity = 1000000\n[guards]\nallow_partial = true\nmin_fill_shares = 0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("min_fill_shares"));
    }

    #[test]
    fn test_rejects_min_fill_without_partial() {
        assert!(parse_config(
            "[market]\nliquidity = 1000000\n[guards]\nmin_fill_shares = 5\n"
        )
        .is_err());
    }

    #[test]
    fn test_rejects_out_of_range_price_limit() {
        assert!(parse_config(
            "[market]\nliquidity = 1000000\n[guards]\nprice_limit_e6 = 1000000\n"
        )
        .is_err());
        assert!(parse_config(
            "[market]\nliquidity = 1000000\n[guards]\nprice_limit_e6 = 0\n"
        )
        .is_err());
    }

    #[test]
    fn test_new_market_from_config() {
        let config = parse_config(FULL).unwrap();
        let market = config.new_market(64_000).unwrap();
        assert_eq!(market.b, 500_000_000);
        assert_eq!(market.fee_bps, 25);
        assert_eq!(market.start_price, 64_000);
    }
}
