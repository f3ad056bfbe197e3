//! Domain layer — deterministic market-core logic.
//!
//! Pure functions over explicit state: no I/O, no clocks, no background
//! work. Callers supply timestamps and persist results. Identical inputs
//! always yield identical outputs, on-chain or off.

pub mod errors;
pub mod fill;
pub mod guards;
pub mod lmsr;
pub mod market;
pub mod oracle;
pub mod settlement;

// Re-export core types for convenience
pub use errors::EngineError;
pub use fill::{find_max_executable, FillSolution};
pub use guards::{FillPolicy, GuardCheck, GuardConfig, GuardReport, MinFill, SlippageGuard};
pub use lmsr::{LmsrModel, TradeQuote};
pub use market::{MarketState, MarketStatus, Position, Side, TradeAction, SCALE};
pub use oracle::{AggregatedPrice, FeedObservation, OracleSample};
pub use settlement::{settle, PositionPayout, SettlementReport};
