//! Core market state and position types.
//!
//! A `MarketState` is an explicit value passed by reference into every
//! operation — there is no process-wide market singleton, and concurrent
//! markets are independent instances. The engine mutates a state only through
//! `usecases`; everything in this module is bookkeeping and invariant checks.
//!
//! All money and share quantities are fixed-point integers at scale 1e6
//! (`SCALE`), matching the settlement currency's smallest-unit convention.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::EngineError;
use super::lmsr::LmsrModel;

/// Fixed-point scale for money and share quantities (1.0 == 1_000_000).
pub const SCALE: u64 = 1_000_000;

/// Outcome side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// The opposing outcome.
    pub const fn other(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "YES"),
            Self::No => write!(f, "NO"),
        }
    }
}

/// Direction of a trade against the market maker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Market lifecycle status.
///
/// Transitions are one-way: `Open → Stopped → Settled`. A new market is a
/// new instance; nothing returns a market to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketStatus {
    /// Trading allowed.
    Open,
    /// Trading halted, close-price snapshot taken, awaiting resolution.
    Stopped,
    /// Winner declared, quantities frozen, redemptions allowed. Terminal.
    Settled,
}

/// Full state of one binary LMSR market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketState {
    /// LMSR liquidity parameter, base units (e6). Always positive.
    pub b: i64,
    /// Net YES quantity outstanding, base units. Cumulative LMSR quantity,
    /// signed — not a user share count.
    pub q_yes: i64,
    /// Net NO quantity outstanding, base units.
    pub q_no: i64,
    /// Trading fee in basis points, charged outside the payout pool.
    pub fee_bps: u16,
    /// Lifecycle status.
    pub status: MarketStatus,
    /// Winning side, set exactly once at settlement.
    pub winner: Option<Side>,
    /// Payout pool in base currency units.
    pub vault_balance: u64,
    /// Oracle price at market creation (oracle scale).
    pub start_price: i64,
    /// Oracle price snapshot taken when the market stopped (oracle scale).
    pub end_price: Option<i64>,
    /// Payout-per-share fixed at settlement, scale `SCALE`. `Some` iff
    /// `status == Settled`. Frozen so later redemptions against a draining
    /// vault all pay the same rate.
    pub pps: Option<u64>,
    /// Accumulated trading fees, tracked separately from the vault.
    pub fees_collected: u64,
}

impl MarketState {
    /// Creates a fresh `Open` market.
    ///
    /// # Errors
    /// `InvalidLiquidity` if `b <= 0` — a fatal configuration error, never
    /// a recoverable guard outcome.
    pub fn new(b: i64, fee_bps: u16, start_price: i64) -> Result<Self, EngineError> {
        if b <= 0 {
            return Err(EngineError::InvalidLiquidity);
        }
        Ok(Self {
            b,
            q_yes: 0,
            q_no: 0,
            fee_bps,
            status: MarketStatus::Open,
            winner: None,
            vault_balance: 0,
            start_price,
            end_price: None,
            pps: None,
            fees_collected: 0,
        })
    }

    /// Whether trades may currently be applied.
    pub fn is_open(&self) -> bool {
        self.status == MarketStatus::Open
    }

    /// Net outstanding quantity for one side, base units.
    pub const fn quantity(&self, side: Side) -> i64 {
        match side {
            Side::Yes => self.q_yes,
            Side::No => self.q_no,
        }
    }

    /// Pricing model over this market's liquidity parameter.
    pub fn model(&self) -> Result<LmsrModel, EngineError> {
        LmsrModel::from_base_units(self.b)
    }

    /// Outstanding YES quantity in share units.
    pub fn q_yes_dec(&self) -> Decimal {
        Decimal::new(self.q_yes, 6)
    }

    /// Outstanding NO quantity in share units.
    pub fn q_no_dec(&self) -> Decimal {
        Decimal::new(self.q_no, 6)
    }

    /// Current spot price of `side`, in (0, 1).
    pub fn spot_price(&self, side: Side) -> Result<Decimal, EngineError> {
        Ok(self.model()?.price(side, self.q_yes_dec(), self.q_no_dec()))
    }
}

/// One owner's holdings in a market.
///
/// Created on first trade, mutated by buys/sells while the market is open,
/// and logically destroyed (shares zeroed) on redemption after settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Owner identity, host-defined (wallet address, account key, ...).
    pub owner: String,
    /// YES shares held, base units. Never negative.
    pub yes_shares: u64,
    /// NO shares held, base units.
    pub no_shares: u64,
    /// Owner-scoped reserve balance, credited on redemption.
    pub reserve: u64,
}

impl Position {
    /// Empty position for `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            yes_shares: 0,
            no_shares: 0,
            reserve: 0,
        }
    }

    /// Shares held on one side.
    pub const fn shares(&self, side: Side) -> u64 {
        match side {
            Side::Yes => self.yes_shares,
            Side::No => self.no_shares,
        }
    }

    pub(crate) fn shares_mut(&mut self, side: Side) -> &mut u64 {
        match side {
            Side::Yes => &mut self.yes_shares,
            Side::No => &mut self.no_shares,
        }
    }

    /// True once both sides are empty.
    pub const fn is_empty(&self) -> bool {
        self.yes_shares == 0 && self.no_shares == 0
    }
}

/// Fee amount for a given gross cost, `floor(cost * fee_bps / 10_000)`.
///
/// Widened through u128 so the product cannot wrap.
pub fn fee_amount(cost: u64, fee_bps: u16) -> u64 {
    ((u128::from(cost) * u128::from(fee_bps)) / 10_000) as u64
}
