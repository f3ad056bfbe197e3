//! Trade guard validation.
//!
//! A guard config expresses per-trade risk limits: a hard price bound, a
//! slippage tolerance against an earlier quote, and a total-cost ceiling.
//! Disabled guards are absent `Option`s, never zero sentinels, so "no limit"
//! and "limit of exactly zero" cannot be confused.
//!
//! Every enabled check is evaluated and reported even after one fails —
//! hosts render the full pass/fail vector in previews. Execution only
//! proceeds when all enabled checks pass, or via the partial-fill solver
//! when the fill policy allows it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::errors::EngineError;
use super::lmsr::quantize_cost;
use super::market::{MarketState, Side, TradeAction};

/// Fixed freshness window for slippage reference quotes, seconds.
pub const QUOTE_FRESHNESS_SECS: i64 = 30;

/// Slippage guard: execution may not deviate from a prior quote by more
/// than `max_bps` basis points, and the quote itself must be fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlippageGuard {
    /// Maximum allowed deviation in basis points.
    pub max_bps: u32,
    /// Reference price captured when the trade was quoted, in (0, 1).
    pub quote_price: Decimal,
    /// Unix seconds at which the quote was captured.
    pub quoted_at: i64,
}

impl SlippageGuard {
    /// Evaluates this guard against an execution price.
    ///
    /// A non-positive quote price fails as `InvalidGuardConfig` rather than
    /// dividing by it, and a quote older than `QUOTE_FRESHNESS_SECS` fails
    /// with the distinct `StaleQuote` outcome before any deviation math runs.
    pub fn check(&self, execution_price: Decimal, now: i64) -> GuardCheck {
        if self.quote_price <= Decimal::ZERO {
            return GuardCheck::Failed(EngineError::InvalidGuardConfig);
        }
        if now.saturating_sub(self.quoted_at) > QUOTE_FRESHNESS_SECS {
            return GuardCheck::Failed(EngineError::StaleQuote);
        }
        let deviation = (execution_price - self.quote_price).abs() / self.quote_price;
        if deviation * dec!(10000) > Decimal::from(self.max_bps) {
            GuardCheck::Failed(EngineError::SlippageExceeded)
        } else {
            GuardCheck::Passed
        }
    }
}

/// Minimum acceptable fill for a partial execution.
///
/// "Partial with no floor" must be said out loud via `AnyNonZero`; it is
/// never the accidental meaning of an omitted or zero field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinFill {
    /// Any nonzero fill is acceptable.
    AnyNonZero,
    /// At least this many shares (base units) must execute.
    AtLeast(u64),
}

impl MinFill {
    /// Smallest share count this floor admits.
    pub(crate) const fn floor_shares(self) -> u64 {
        match self {
            Self::AnyNonZero => 1,
            Self::AtLeast(n) => n,
        }
    }
}

/// Whether a guarded trade may shrink to satisfy its guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillPolicy {
    /// Execute the full requested size or nothing.
    AllOrNothing,
    /// Allow the solver to find the largest passing size.
    Partial { min_fill: MinFill },
}

/// Per-trade guard configuration. Transient input, not persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Hard bound on the average execution price.
    pub price_limit: Option<Decimal>,
    /// Slippage tolerance against a prior quote.
    pub slippage: Option<SlippageGuard>,
    /// Ceiling on total cost, base currency units.
    pub max_total_cost: Option<u64>,
    /// All-or-nothing vs. partial fill behavior.
    pub fill_policy: FillPolicy,
}

impl GuardConfig {
    /// A config with every guard disabled and all-or-nothing fills.
    pub const fn unrestricted() -> Self {
        Self {
            price_limit: None,
            slippage: None,
            max_total_cost: None,
            fill_policy: FillPolicy::AllOrNothing,
        }
    }

    /// Rejects malformed guard combinations before any pricing runs.
    ///
    /// # Errors
    /// `InvalidGuardConfig` for: a price limit outside (0, 1); a
    /// non-positive quote price; a cost ceiling that cannot be represented
    /// signed; `AtLeast(0)` (spell it `AnyNonZero`); or a minimum fill
    /// larger than the requested size.
    pub fn validate(&self, requested_shares: u64) -> Result<(), EngineError> {
        if let Some(limit) = self.price_limit {
            if limit <= Decimal::ZERO || limit >= Decimal::ONE {
                return Err(EngineError::InvalidGuardConfig);
            }
        }
        if let Some(slippage) = &self.slippage {
            if slippage.quote_price <= Decimal::ZERO {
                return Err(EngineError::InvalidGuardConfig);
            }
        }
        if let Some(max) = self.max_total_cost {
            if i64::try_from(max).is_err() {
                return Err(EngineError::InvalidGuardConfig);
            }
        }
        if let FillPolicy::Partial { min_fill } = self.fill_policy {
            match min_fill {
                MinFill::AtLeast(0) => return Err(EngineError::InvalidGuardConfig),
                MinFill::AtLeast(n) if n > requested_shares => {
                    return Err(EngineError::InvalidGuardConfig);
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Outcome of one guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardCheck {
    Passed,
    Failed(EngineError),
}

impl GuardCheck {
    /// True when the check passed.
    pub const fn passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// The failure reason, if any.
    pub const fn failure(&self) -> Option<EngineError> {
        match self {
            Self::Passed => None,
            Self::Failed(e) => Some(*e),
        }
    }
}

/// Full guard evaluation at one candidate size.
///
/// `None` entries are guards that were disabled in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardReport {
    /// Average execution price at the evaluated size.
    pub execution_price: Decimal,
    /// Signed total cost at the evaluated size, base units. Negative means
    /// sell proceeds.
    pub total_cost: i64,
    pub price_limit: Option<GuardCheck>,
    pub slippage: Option<GuardCheck>,
    pub cost_limit: Option<GuardCheck>,
}

impl GuardReport {
    /// True when every enabled check passed.
    pub fn all_passed(&self) -> bool {
        [self.price_limit, self.slippage, self.cost_limit]
            .iter()
            .flatten()
            .all(GuardCheck::passed)
    }

    /// First failure in evaluation order, if any.
    pub fn first_failure(&self) -> Option<EngineError> {
        [self.price_limit, self.slippage, self.cost_limit]
            .iter()
            .flatten()
            .find_map(GuardCheck::failure)
    }
}

/// Prices a candidate trade and evaluates every enabled guard against it.
///
/// Pure: reads market state, mutates nothing. Checks run in the fixed order
/// price limit → slippage → cost limit, and all of them are reported.
///
/// # Errors
/// Only configuration and arithmetic errors; guard failures are data inside
/// the returned report.
pub fn evaluate(
    side: Side,
    action: TradeAction,
    shares: u64,
    config: &GuardConfig,
    market: &MarketState,
    now: i64,
) -> Result<GuardReport, EngineError> {
    let model = market.model()?;
    let shares_i64 = i64::try_from(shares).map_err(|_| EngineError::ArithmeticOverflow)?;
    let delta_units = match action {
        TradeAction::Buy => shares_i64,
        TradeAction::Sell => -shares_i64,
    };
    let quote = model.trade_cost(
        side,
        market.q_yes_dec(),
        market.q_no_dec(),
        Decimal::new(delta_units, 6),
    );
    let total_cost = quantize_cost(quote.cost)?;
    let execution_price = quote.execution_price;

    let price_limit = config.price_limit.map(|limit| match action {
        TradeAction::Buy if execution_price > limit => {
            GuardCheck::Failed(EngineError::PriceLimitExceeded)
        }
        TradeAction::Sell if execution_price < limit => {
            GuardCheck::Failed(EngineError::PriceLimitNotMet)
        }
        _ => GuardCheck::Passed,
    });

    let slippage = config
        .slippage
        .as_ref()
        .map(|guard| guard.check(execution_price, now));

    let cost_limit = config.max_total_cost.map(|max| {
        // A ceiling beyond i64 cannot be breached by any representable cost.
        let ceiling = i64::try_from(max).unwrap_or(i64::MAX);
        if total_cost > ceiling {
            GuardCheck::Failed(EngineError::CostExceedsLimit)
        } else {
            GuardCheck::Passed
        }
    });

    Ok(GuardReport {
        execution_price,
        total_cost,
        price_limit,
        slippage,
        cost_limit,
    })
}
