//! Partial-fill solver.
//!
//! When a full-size request fails its guards and the fill policy allows
//! shrinking, this module binary-searches execution size for the largest
//! fill that passes every enabled guard.
//!
//! Correctness precondition: guard pass/fail must be monotonic in trade
//! size — a smaller size has the same or better chance of passing. This
//! holds for the price-limit and slippage checks under LMSR (average
//! execution price moves toward spot as size shrinks) and for the cost
//! ceiling (cost is increasing in size). Any new guard type must be shown
//! monotonic before the solver may rely on it.

use tracing::debug;

use super::errors::EngineError;
use super::guards::{self, GuardConfig, GuardReport, MinFill};
use super::market::{MarketState, Side, TradeAction};

/// Fixed iteration bound. Sixteen halvings resolve the fill to within
/// 1/65536 of the requested range, which is finer than the fee and
/// rounding granularity for the magnitudes this engine trades.
pub const MAX_SEARCH_ITERATIONS: usize = 16;

/// Largest passing fill found by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillSolution {
    /// Executable size, base units. Within `[min_fill, requested]`.
    pub shares: u64,
    /// Guard evaluation at that size; all enabled checks passed.
    pub report: GuardReport,
}

/// Finds the largest executable size in `[min_fill, requested_shares]`.
///
/// Returns `Ok(None)` when even the minimum fill fails — callers surface
/// that as `MinFillNotMet`. The search keeps the best passing size seen so
/// far and probes the upper half after each pass, the lower half after each
/// failure, for at most `MAX_SEARCH_ITERATIONS` probes.
pub fn find_max_executable(
    side: Side,
    action: TradeAction,
    requested_shares: u64,
    min_fill: MinFill,
    config: &GuardConfig,
    market: &MarketState,
    now: i64,
) -> Result<Option<FillSolution>, EngineError> {
    let floor = min_fill.floor_shares();
    if floor == 0 || floor > requested_shares {
        return Err(EngineError::InvalidGuardConfig);
    }

    let floor_report = guards::evaluate(side, action, floor, config, market, now)?;
    if !floor_report.all_passed() {
        debug!(floor, "minimum fill fails guards, no partial execution");
        return Ok(None);
    }

    let mut best = FillSolution {
        shares: floor,
        report: floor_report,
    };
    let mut lo = floor + 1;
    let mut hi = requested_shares;

    for _ in 0..MAX_SEARCH_ITERATIONS {
        if lo > hi {
            break;
        }
        let mid = lo + (hi - lo) / 2;
        let report = guards::evaluate(side, action, mid, config, market, now)?;
        if report.all_passed() {
            best = FillSolution { shares: mid, report };
            lo = mid + 1;
        } else {
            hi = mid - 1;
        }
    }

    debug!(
        requested = requested_shares,
        executable = best.shares,
        "partial fill resolved"
    );
    Ok(Some(best))
}
