//! Settlement arithmetic.
//!
//! Once a market settles, the vault is split pro rata across the winning
//! side at a fixed payout-per-share (pps). The intermediate product is
//! widened to u128 so it cannot wrap, pps is capped at face value, and every
//! per-position payout floors — together those guarantee the vault is never
//! over-distributed.
//!
//! Known limitation, preserved on purpose: payouts an owner never claims
//! stay stranded in the vault. They are only recovered by the bulk sweep the
//! host runs when initializing the next market — there is no on-demand
//! force-redeem path.

use serde::{Deserialize, Serialize};

use super::errors::EngineError;
use super::market::{MarketState, MarketStatus, Position, SCALE};

/// One owner's share of the settled vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionPayout {
    pub owner: String,
    /// Payout in base currency units.
    pub amount: u64,
}

/// Result of settling a market across a set of positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Payout-per-share, scale `SCALE`, capped at face value.
    pub pps: u64,
    pub payouts: Vec<PositionPayout>,
    /// Vault remainder after all computed payouts.
    pub surplus: u64,
}

/// Payout-per-share: `min(SCALE, floor(vault * SCALE / winning_total))`.
///
/// `winning_total <= 0` pays zero — an empty winning side has nobody to pay.
///
/// # Errors
/// `ArithmeticOverflow` if the widened product cannot be computed; fatal,
/// settlement halts rather than wrapping.
pub fn payout_per_share(vault_balance: u64, winning_total: i64) -> Result<u64, EngineError> {
    if winning_total <= 0 {
        return Ok(0);
    }
    let scaled = u128::from(vault_balance)
        .checked_mul(u128::from(SCALE))
        .ok_or(EngineError::ArithmeticOverflow)?;
    let pps = scaled / u128::from(winning_total.unsigned_abs());
    u64::try_from(pps.min(u128::from(SCALE))).map_err(|_| EngineError::ArithmeticOverflow)
}

/// One position's payout: `floor(winning_shares * pps / SCALE)`.
pub fn position_payout(winning_shares: u64, pps: u64) -> Result<u64, EngineError> {
    let product = u128::from(winning_shares)
        .checked_mul(u128::from(pps))
        .ok_or(EngineError::ArithmeticOverflow)?;
    u64::try_from(product / u128::from(SCALE)).map_err(|_| EngineError::ArithmeticOverflow)
}

/// Computes the full payout schedule for a settled market.
///
/// Pure preview: mutates nothing. Individual redemptions happen through
/// `usecases::lifecycle::redeem_position`.
///
/// # Errors
/// `MarketNotSettled` before resolution; `InsufficientLiquidity` if the
/// payout sum somehow exceeded the vault (defensive — the cap and floors
/// make this unreachable).
pub fn settle(
    market: &MarketState,
    positions: &[Position],
) -> Result<SettlementReport, EngineError> {
    if market.status != MarketStatus::Settled {
        return Err(EngineError::MarketNotSettled);
    }
    let winner = market.winner.ok_or(EngineError::MarketNotSettled)?;

    let pps = match market.pps {
        Some(p) => p,
        None => payout_per_share(market.vault_balance, market.quantity(winner))?,
    };

    let mut payouts = Vec::with_capacity(positions.len());
    let mut total: u64 = 0;
    for position in positions {
        let amount = position_payout(position.shares(winner), pps)?;
        total = total
            .checked_add(amount)
            .ok_or(EngineError::ArithmeticOverflow)?;
        payouts.push(PositionPayout {
            owner: position.owner.clone(),
            amount,
        });
    }

    if total > market.vault_balance {
        return Err(EngineError::InsufficientLiquidity);
    }

    Ok(SettlementReport {
        pps,
        payouts,
        surplus: market.vault_balance - total,
    })
}
