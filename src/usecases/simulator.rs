//! Trade simulation and application.
//!
//! `simulate_trade` is the shared entry point for bots, off-chain
//! simulators, and the on-chain execution path — all three preview through
//! the exact same arithmetic, so a previewed price can never diverge from an
//! executed one. `apply_trade` runs the same simulation and then mutates
//! market and position state, charging fees on top of the LMSR cost.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::errors::EngineError;
use crate::domain::fill::find_max_executable;
use crate::domain::guards::{self, FillPolicy, GuardConfig, GuardReport};
use crate::domain::market::{fee_amount, MarketState, Position, Side, TradeAction};

/// A trade request against the market maker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub side: Side,
    pub action: TradeAction,
    /// Requested size in share base units (e6).
    pub shares: u64,
}

/// Outcome of previewing a trade against current state.
///
/// Guard failures land here as data (`success == false` plus a populated
/// `error` and per-check report), never as `Err` — previews need the full
/// picture. `Err` is reserved for configuration and arithmetic faults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSimulation {
    /// Whether the trade (possibly shrunk) can execute.
    pub success: bool,
    /// Size that would execute, base units. Zero when nothing can.
    pub shares_to_execute: u64,
    /// Average execution price at that size.
    pub execution_price: Decimal,
    /// Signed total LMSR cost at that size, base units (fee excluded).
    pub total_cost: i64,
    /// True when the solver shrank the request to satisfy guards.
    pub is_partial_fill: bool,
    /// Per-guard pass/fail vector. At the executed size when a fill was
    /// found, at the requested size otherwise.
    pub guards: GuardReport,
    /// Why the trade cannot execute, when `success == false`.
    pub error: Option<EngineError>,
}

/// Receipt for an applied trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub side: Side,
    pub action: TradeAction,
    /// Executed size, base units.
    pub shares: u64,
    /// Gross LMSR cost (buys) or proceeds (sells), base units.
    pub gross: u64,
    /// Fee charged, base units.
    pub fee: u64,
    /// Trader's net debit (buys: gross + fee) or credit (sells:
    /// gross - fee), base units.
    pub net: u64,
    pub is_partial_fill: bool,
    /// Spot prices after the trade applied.
    pub price_yes_after: Decimal,
    pub price_no_after: Decimal,
}

/// Previews a trade without touching state.
///
/// # Errors
/// `MarketNotOpen`, `InvalidGuardConfig`, `InvalidLiquidity`, or
/// `ArithmeticOverflow`. Guard rejections come back inside the simulation.
pub fn simulate_trade(
    request: &TradeRequest,
    config: &GuardConfig,
    market: &MarketState,
    now: i64,
) -> Result<TradeSimulation, EngineError> {
    if !market.is_open() {
        return Err(EngineError::MarketNotOpen);
    }
    config.validate(request.shares)?;

    let full_report =
        guards::evaluate(request.side, request.action, request.shares, config, market, now)?;

    // Zero-size request: a no-op quote of the spot price, never an error.
    if request.shares == 0 {
        return Ok(TradeSimulation {
            success: true,
            shares_to_execute: 0,
            execution_price: full_report.execution_price,
            total_cost: 0,
            is_partial_fill: false,
            guards: full_report,
            error: None,
        });
    }

    if full_report.all_passed() {
        return Ok(TradeSimulation {
            success: true,
            shares_to_execute: request.shares,
            execution_price: full_report.execution_price,
            total_cost: full_report.total_cost,
            is_partial_fill: false,
            guards: full_report,
            error: None,
        });
    }

    match config.fill_policy {
        FillPolicy::AllOrNothing => Ok(TradeSimulation {
            success: false,
            shares_to_execute: 0,
            execution_price: full_report.execution_price,
            total_cost: full_report.total_cost,
            is_partial_fill: false,
            error: full_report.first_failure(),
            guards: full_report,
        }),
        FillPolicy::Partial { min_fill } => {
            let solution = find_max_executable(
                request.side,
                request.action,
                request.shares,
                min_fill,
                config,
                market,
                now,
            )?;
            match solution {
                Some(fill) => Ok(TradeSimulation {
                    success: true,
                    shares_to_execute: fill.shares,
                    execution_price: fill.report.execution_price,
                    total_cost: fill.report.total_cost,
                    is_partial_fill: true,
                    guards: fill.report,
                    error: None,
                }),
                None => Ok(TradeSimulation {
                    success: false,
                    shares_to_execute: 0,
                    execution_price: full_report.execution_price,
                    total_cost: full_report.total_cost,
                    is_partial_fill: false,
                    guards: full_report,
                    error: Some(EngineError::MinFillNotMet),
                }),
            }
        }
    }
}

/// Simulates, then applies the trade to market and position state.
///
/// Sells are additionally bounded by the position's holdings, and the vault
/// must cover sell proceeds. Fees accrue in `fees_collected`, outside the
/// payout pool. On any `Err`, no state has been touched.
pub fn apply_trade(
    market: &mut MarketState,
    position: &mut Position,
    request: &TradeRequest,
    config: &GuardConfig,
    now: i64,
) -> Result<TradeReceipt, EngineError> {
    let simulation = simulate_trade(request, config, market, now)?;
    if !simulation.success {
        let reason = simulation.error.unwrap_or(EngineError::InvalidGuardConfig);
        warn!(
            side = %request.side,
            action = %request.action,
            shares = request.shares,
            error = %reason,
            "trade rejected by guards"
        );
        return Err(reason);
    }

    let shares = simulation.shares_to_execute;
    let shares_i64 = i64::try_from(shares).map_err(|_| EngineError::ArithmeticOverflow)?;

    let receipt = match request.action {
        TradeAction::Buy => {
            let gross =
                u64::try_from(simulation.total_cost).map_err(|_| EngineError::ArithmeticOverflow)?;
            let fee = fee_amount(gross, market.fee_bps);
            let net = gross.checked_add(fee).ok_or(EngineError::ArithmeticOverflow)?;

            let q = market.quantity(request.side);
            let new_q = q.checked_add(shares_i64).ok_or(EngineError::ArithmeticOverflow)?;
            let new_vault = market
                .vault_balance
                .checked_add(gross)
                .ok_or(EngineError::ArithmeticOverflow)?;
            let new_fees = market
                .fees_collected
                .checked_add(fee)
                .ok_or(EngineError::ArithmeticOverflow)?;
            let new_shares = position
                .shares(request.side)
                .checked_add(shares)
                .ok_or(EngineError::ArithmeticOverflow)?;

            match request.side {
                Side::Yes => market.q_yes = new_q,
                Side::No => market.q_no = new_q,
            }
            market.vault_balance = new_vault;
            market.fees_collected = new_fees;
            *position.shares_mut(request.side) = new_shares;

            TradeReceipt {
                side: request.side,
                action: request.action,
                shares,
                gross,
                fee,
                net,
                is_partial_fill: simulation.is_partial_fill,
                price_yes_after: market.spot_price(Side::Yes)?,
                price_no_after: market.spot_price(Side::No)?,
            }
        }
        TradeAction::Sell => {
            if position.shares(request.side) < shares {
                return Err(EngineError::InsufficientShares);
            }
            // total_cost <= 0 for sells; proceeds are its magnitude.
            let gross = simulation.total_cost.unsigned_abs();
            if market.vault_balance < gross {
                return Err(EngineError::InsufficientLiquidity);
            }
            let fee = fee_amount(gross, market.fee_bps);
            let net = gross.checked_sub(fee).ok_or(EngineError::ArithmeticOverflow)?;

            let q = market.quantity(request.side);
            let new_q = q.checked_sub(shares_i64).ok_or(EngineError::ArithmeticOverflow)?;
            let new_fees = market
                .fees_collected
                .checked_add(fee)
                .ok_or(EngineError::ArithmeticOverflow)?;

            match request.side {
                Side::Yes => market.q_yes = new_q,
                Side::No => market.q_no = new_q,
            }
            market.vault_balance -= gross;
            market.fees_collected = new_fees;
            *position.shares_mut(request.side) -= shares;

            TradeReceipt {
                side: request.side,
                action: request.action,
                shares,
                gross,
                fee,
                net,
                is_partial_fill: simulation.is_partial_fill,
                price_yes_after: market.spot_price(Side::Yes)?,
                price_no_after: market.spot_price(Side::No)?,
            }
        }
    };

    info!(
        side = %receipt.side,
        action = %receipt.action,
        shares = receipt.shares,
        gross = receipt.gross,
        fee = receipt.fee,
        partial = receipt.is_partial_fill,
        "trade applied"
    );
    Ok(receipt)
}
