//! Logarithmic Market Scoring Rule (LMSR) pricing model.
//!
//! Reference: Hanson (2003) "Combinatorial Information Market Design".
//!
//! All math runs on `Decimal` with the integer-backed `maths` exp/ln, so a
//! previewed cost and an executed cost are bit-identical on every host.
//! Exponents are shifted by `max(q_yes, q_no) / b` before calling `exp`
//! (log-sum-exp), keeping every exponent non-positive; without the shift a
//! lopsided book overflows the exponential.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::errors::EngineError;
use super::market::Side;

/// Below this shifted exponent the term is indistinguishable from zero at
/// Decimal precision; short-circuiting keeps the Taylor series bounded.
const EXP_UNDERFLOW_FLOOR: Decimal = dec!(-60);

/// Base-unit scale as a Decimal (1.0 == 1e6 base units).
const SCALE_DEC: Decimal = dec!(1_000_000);

/// Cost and average execution price for one candidate trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeQuote {
    /// Signed cost in currency units: positive for buys, negative (proceeds)
    /// for sells, zero for a no-op.
    pub cost: Decimal,
    /// Average price per share paid or received, in (0, 1).
    pub execution_price: Decimal,
}

/// LMSR pricing model for a binary outcome market.
///
/// The liquidity parameter `b` controls depth: higher `b` means slower price
/// movement per share traded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LmsrModel {
    /// Liquidity parameter in share units (b > 0).
    b: Decimal,
}

impl LmsrModel {
    /// Creates a model with the given liquidity parameter.
    ///
    /// # Errors
    /// `InvalidLiquidity` if `b <= 0`.
    pub fn new(b: Decimal) -> Result<Self, EngineError> {
        if b <= Decimal::ZERO {
            return Err(EngineError::InvalidLiquidity);
        }
        Ok(Self { b })
    }

    /// Creates a model from a base-unit (e6) liquidity parameter.
    pub fn from_base_units(b_e6: i64) -> Result<Self, EngineError> {
        Self::new(Decimal::new(b_e6, 6))
    }

    /// Returns the liquidity parameter.
    pub const fn liquidity(&self) -> Decimal {
        self.b
    }

    /// LMSR cost function `C(q) = b * ln(exp(q_yes/b) + exp(q_no/b))`.
    ///
    /// Evaluated as `b * (m + ln(exp(q_yes/b - m) + exp(q_no/b - m)))` with
    /// `m = max(q_yes, q_no) / b`, restoring the offset after the log.
    pub fn cost(&self, q_yes: Decimal, q_no: Decimal) -> Decimal {
        let e_yes = q_yes / self.b;
        let e_no = q_no / self.b;
        let shift = e_yes.max(e_no);
        let sum = exp_shifted(e_yes - shift) + exp_shifted(e_no - shift);
        self.b * (shift + sum.ln())
    }

    /// Spot price of `side`: `exp(q_s/b) / (exp(q_yes/b) + exp(q_no/b))`.
    ///
    /// Guarantees `price(Yes) + price(No) == 1` exactly. Each price stays in
    /// (0, 1) until the book is so lopsided that the dominated exponential
    /// underflows, at which point the losing side quotes exactly zero.
    pub fn price(&self, side: Side, q_yes: Decimal, q_no: Decimal) -> Decimal {
        match side {
            Side::Yes => self.price_yes(q_yes, q_no),
            Side::No => Decimal::ONE - self.price_yes(q_yes, q_no),
        }
    }

    fn price_yes(&self, q_yes: Decimal, q_no: Decimal) -> Decimal {
        let e_yes = q_yes / self.b;
        let e_no = q_no / self.b;
        let shift = e_yes.max(e_no);
        let w_yes = exp_shifted(e_yes - shift);
        let w_no = exp_shifted(e_no - shift);
        w_yes / (w_yes + w_no)
    }

    /// Cost of adding a signed quantity `delta` (share units) to `side`.
    ///
    /// `delta = 0` is a zero-cost no-op quoting the spot price, not an error.
    pub fn trade_cost(
        &self,
        side: Side,
        q_yes: Decimal,
        q_no: Decimal,
        delta: Decimal,
    ) -> TradeQuote {
        if delta.is_zero() {
            return TradeQuote {
                cost: Decimal::ZERO,
                execution_price: self.price(side, q_yes, q_no),
            };
        }
        let before = self.cost(q_yes, q_no);
        let after = match side {
            Side::Yes => self.cost(q_yes + delta, q_no),
            Side::No => self.cost(q_yes, q_no + delta),
        };
        let cost = after - before;
        TradeQuote {
            cost,
            execution_price: cost / delta,
        }
    }
}

/// `exp(x)` for shifted exponents, `x <= 0` by construction.
fn exp_shifted(x: Decimal) -> Decimal {
    if x < EXP_UNDERFLOW_FLOOR {
        Decimal::ZERO
    } else {
        x.exp()
    }
}

/// Quantizes a currency-unit cost to signed base units (e6).
///
/// Rounds toward positive infinity: buy costs round up against the trader,
/// sell proceeds (negative costs) round down in magnitude. The vault never
/// leaks value through rounding.
pub fn quantize_cost(cost: Decimal) -> Result<i64, EngineError> {
    (cost * SCALE_DEC)
        .ceil()
        .to_i64()
        .ok_or(EngineError::ArithmeticOverflow)
}
