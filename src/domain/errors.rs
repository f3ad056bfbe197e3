//! Engine error taxonomy.
//!
//! Guard failures are ordinary values: they travel inside result structs so
//! hosts can render full previews, and they convert into `Err` only when a
//! caller tries to execute past them. Configuration errors are raised before
//! any state mutation. Nothing in the engine panics on user input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All failure modes surfaced by the market engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EngineError {
    /// Liquidity parameter `b` must be strictly positive.
    #[error("liquidity parameter b must be positive")]
    InvalidLiquidity,

    /// Trading operation attempted on a market that is not `Open`.
    #[error("market is not open for trading")]
    MarketNotOpen,

    /// Resolution attempted on a market that is not `Stopped`.
    #[error("market is not stopped")]
    MarketNotStopped,

    /// Settlement or redemption attempted before the market is `Settled`.
    #[error("market is not settled")]
    MarketNotSettled,

    /// The oracle feed account is missing entirely.
    #[error("oracle feed unavailable")]
    OracleUnavailable,

    /// Oracle sample older than the allowed age threshold.
    #[error("oracle sample is stale")]
    StaleOracle,

    /// Buy execution price above the configured limit.
    #[error("execution price exceeds price limit")]
    PriceLimitExceeded,

    /// Sell execution price below the configured limit.
    #[error("execution price below price limit")]
    PriceLimitNotMet,

    /// The slippage reference quote is older than the freshness window.
    #[error("reference quote is stale")]
    StaleQuote,

    /// Execution price deviates from the quote by more than the allowed bps.
    #[error("slippage tolerance exceeded")]
    SlippageExceeded,

    /// Total trade cost above the configured ceiling.
    #[error("total cost exceeds limit")]
    CostExceedsLimit,

    /// Even the minimum acceptable fill fails the guards.
    #[error("minimum fill size cannot be executed")]
    MinFillNotMet,

    /// Position holds fewer shares than the sell requests.
    #[error("position holds insufficient shares")]
    InsufficientShares,

    /// Vault cannot cover a payout. Unreachable given the payout cap, but
    /// checked on every money movement anyway.
    #[error("vault balance insufficient for payout")]
    InsufficientLiquidity,

    /// Contradictory or nonsensical guard configuration.
    #[error("invalid guard configuration")]
    InvalidGuardConfig,

    /// Checked arithmetic overflowed. Fatal: the operation is aborted with
    /// no state change rather than silently wrapping.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// Persisted flat record failed structural validation on decode.
    #[error("malformed account record")]
    MalformedRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            EngineError::InvalidLiquidity.to_string(),
            "liquidity parameter b must be positive"
        );
        assert_eq!(EngineError::StaleQuote.to_string(), "reference quote is stale");
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&EngineError::SlippageExceeded).unwrap();
        let back: EngineError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EngineError::SlippageExceeded);
    }
}
