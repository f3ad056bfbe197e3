//! Adapters — serialization boundaries around the domain.

pub mod records;

pub use records::{MarketStateRecord, OracleRecord, MARKET_RECORD_LEN};
