//! Market lifecycle transitions.
//!
//! One-way state machine: `Open → Stopped → Settled`, then per-owner
//! redemption and a final sweep when the host retires the market. Each
//! transition validates the current status first, so a replayed or
//! out-of-order instruction fails cleanly instead of corrupting state.

use tracing::info;

use crate::domain::errors::EngineError;
use crate::domain::market::{MarketState, MarketStatus, Position, Side};
use crate::domain::oracle::{self, OracleSample};
use crate::domain::settlement::{payout_per_share, position_payout};

/// Halts trading and snapshots the close price from the oracle.
///
/// The snapshot taken here is the price resolution will compare against
/// `start_price` — resolution itself does not consult the oracle again.
///
/// # Errors
/// `MarketNotOpen` if already stopped or settled; `OracleUnavailable` or
/// `StaleOracle` if no usable close price exists right now.
pub fn stop_market(
    market: &mut MarketState,
    sample: Option<&OracleSample>,
    now: i64,
    max_age_secs: i64,
) -> Result<(), EngineError> {
    if market.status != MarketStatus::Open {
        return Err(EngineError::MarketNotOpen);
    }
    let price = oracle::aggregate(sample, now, max_age_secs)?;
    if price.stale {
        return Err(EngineError::StaleOracle);
    }
    market.end_price = Some(price.median);
    market.status = MarketStatus::Stopped;
    info!(end_price = price.median, age_secs = price.age_secs, "market stopped");
    Ok(())
}

/// Declares the winner and freezes the payout rate.
///
/// YES wins iff the close price strictly exceeds the start price; an exact
/// tie resolves NO. The payout-per-share is computed once here and frozen on
/// the state, so every later redemption pays the same rate no matter how
/// drained the vault is by then.
///
/// # Errors
/// `MarketNotStopped` unless exactly one `stop_market` preceded this call.
pub fn resolve_market(market: &mut MarketState) -> Result<Side, EngineError> {
    if market.status != MarketStatus::Stopped {
        return Err(EngineError::MarketNotStopped);
    }
    let end_price = market.end_price.ok_or(EngineError::MarketNotStopped)?;

    let winner = if end_price > market.start_price {
        Side::Yes
    } else {
        Side::No
    };
    let pps = payout_per_share(market.vault_balance, market.quantity(winner))?;

    market.winner = Some(winner);
    market.pps = Some(pps);
    market.status = MarketStatus::Settled;
    info!(
        winner = %winner,
        start_price = market.start_price,
        end_price,
        pps,
        "market resolved"
    );
    Ok(winner)
}

/// Redeems one position against a settled market.
///
/// Pays `winning_shares * pps / SCALE` out of the vault into the position's
/// reserve, then zeroes both sides of the holding. Losing shares are simply
/// destroyed. Redeeming an already-empty position is a zero-payout no-op.
///
/// # Errors
/// `MarketNotSettled` before resolution; `InsufficientLiquidity` if the
/// vault cannot cover the frozen-rate payout (only reachable if the host
/// debited the vault outside this engine).
pub fn redeem_position(
    market: &mut MarketState,
    position: &mut Position,
) -> Result<u64, EngineError> {
    if market.status != MarketStatus::Settled {
        return Err(EngineError::MarketNotSettled);
    }
    let winner = market.winner.ok_or(EngineError::MarketNotSettled)?;
    let pps = market.pps.ok_or(EngineError::MarketNotSettled)?;

    let amount = position_payout(position.shares(winner), pps)?;
    if amount > market.vault_balance {
        return Err(EngineError::InsufficientLiquidity);
    }

    market.vault_balance -= amount;
    position.reserve = position
        .reserve
        .checked_add(amount)
        .ok_or(EngineError::ArithmeticOverflow)?;
    position.yes_shares = 0;
    position.no_shares = 0;

    info!(owner = %position.owner, amount, "position redeemed");
    Ok(amount)
}

/// Drains whatever remains in a settled market's vault and fee pot.
///
/// Unclaimed payouts stay in the vault until the host retires the market;
/// this is that recovery path, typically run while initializing the
/// successor market. Returns the swept total and leaves both balances zero.
///
/// # Errors
/// `MarketNotSettled` — sweeping an active market would steal the payout
/// pool out from under open positions.
pub fn sweep_unredeemed(market: &mut MarketState) -> Result<u64, EngineError> {
    if market.status != MarketStatus::Settled {
        return Err(EngineError::MarketNotSettled);
    }
    let swept = market
        .vault_balance
        .checked_add(market.fees_collected)
        .ok_or(EngineError::ArithmeticOverflow)?;
    market.vault_balance = 0;
    market.fees_collected = 0;
    info!(swept, "unredeemed balance swept");
    Ok(swept)
}
