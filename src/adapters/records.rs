//! Flat persistence records.
//!
//! On-chain accounts and snapshot files store these fixed-size Borsh
//! records, not the domain types directly. Records are deliberately flat —
//! no `Option`, no enums with payloads — so every serialized market has the
//! same byte length and fields can be patched in place.
//!
//! `MarketStateRecord` layout (little-endian, 68 bytes):
//!
//! | offset | size | field            |
//! |--------|------|------------------|
//! | 0      | 8    | `b`              |
//! | 8      | 8    | `q_yes`          |
//! | 16     | 8    | `q_no`           |
//! | 24     | 2    | `fee_bps`        |
//! | 26     | 1    | `status`         |
//! | 27     | 1    | `winner`         |
//! | 28     | 8    | `vault_balance`  |
//! | 36     | 8    | `start_price`    |
//! | 44     | 8    | `end_price`      |
//! | 52     | 8    | `pps`            |
//! | 60     | 8    | `fees_collected` |
//!
//! `end_price` is meaningful only once `status >= STATUS_STOPPED`; `winner`
//! and `pps` only at `STATUS_SETTLED`. Decoding validates that coupling and
//! rejects records that claim one without the other.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::domain::errors::EngineError;
use crate::domain::market::{MarketState, MarketStatus, Side};
use crate::domain::oracle::{FeedObservation, OracleSample};

pub const STATUS_OPEN: u8 = 0;
pub const STATUS_STOPPED: u8 = 1;
pub const STATUS_SETTLED: u8 = 2;

pub const WINNER_NONE: u8 = 0;
pub const WINNER_YES: u8 = 1;
pub const WINNER_NO: u8 = 2;

/// Serialized size of a `MarketStateRecord`, bytes.
pub const MARKET_RECORD_LEN: usize = 68;

/// Fixed-size wire form of a `MarketState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct MarketStateRecord {
    pub b: i64,
    pub q_yes: i64,
    pub q_no: i64,
    pub fee_bps: u16,
    pub status: u8,
    pub winner: u8,
    pub vault_balance: u64,
    pub start_price: i64,
    /// Valid once stopped; zero before that.
    pub end_price: i64,
    /// Valid once settled; zero before that.
    pub pps: u64,
    pub fees_collected: u64,
}

impl From<&MarketState> for MarketStateRecord {
    fn from(state: &MarketState) -> Self {
        Self {
            b: state.b,
            q_yes: state.q_yes,
            q_no: state.q_no,
            fee_bps: state.fee_bps,
            status: match state.status {
                MarketStatus::Open => STATUS_OPEN,
                MarketStatus::Stopped => STATUS_STOPPED,
                MarketStatus::Settled => STATUS_SETTLED,
            },
            winner: match state.winner {
                None => WINNER_NONE,
                Some(Side::Yes) => WINNER_YES,
                Some(Side::No) => WINNER_NO,
            },
            vault_balance: state.vault_balance,
            start_price: state.start_price,
            end_price: state.end_price.unwrap_or(0),
            pps: state.pps.unwrap_or(0),
            fees_collected: state.fees_collected,
        }
    }
}

impl TryFrom<&MarketStateRecord> for MarketState {
    type Error = EngineError;

    fn try_from(record: &MarketStateRecord) -> Result<Self, EngineError> {
        if record.b <= 0 {
            return Err(EngineError::MalformedRecord);
        }
        let status = match record.status {
            STATUS_OPEN => MarketStatus::Open,
            STATUS_STOPPED => MarketStatus::Stopped,
            STATUS_SETTLED => MarketStatus::Settled,
            _ => return Err(EngineError::MalformedRecord),
        };
        let winner = match record.winner {
            WINNER_NONE => None,
            WINNER_YES => Some(Side::Yes),
            WINNER_NO => Some(Side::No),
            _ => return Err(EngineError::MalformedRecord),
        };
        // A winner byte implies settled, and settled implies a winner.
        if winner.is_some() != (status == MarketStatus::Settled) {
            return Err(EngineError::MalformedRecord);
        }
        let end_price = match status {
            MarketStatus::Open => None,
            MarketStatus::Stopped | MarketStatus::Settled => Some(record.end_price),
        };
        let pps = match status {
            MarketStatus::Settled => Some(record.pps),
            _ => None,
        };
        Ok(Self {
            b: record.b,
            q_yes: record.q_yes,
            q_no: record.q_no,
            fee_bps: record.fee_bps,
            status,
            winner,
            vault_balance: record.vault_balance,
            start_price: record.start_price,
            end_price,
            pps,
            fees_collected: record.fees_collected,
        })
    }
}

/// Fixed-size wire form of a three-feed oracle sample.
///
/// Values and timestamps are split into parallel arrays so hosts can update
/// one feed's slot without re-encoding the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct OracleRecord {
    pub values: [i64; 3],
    pub timestamps: [i64; 3],
    pub decimals: u8,
}

impl From<&OracleSample> for OracleRecord {
    fn from(sample: &OracleSample) -> Self {
        Self {
            values: [
                sample.feeds[0].value,
                sample.feeds[1].value,
                sample.feeds[2].value,
            ],
            timestamps: [
                sample.feeds[0].timestamp,
                sample.feeds[1].timestamp,
                sample.feeds[2].timestamp,
            ],
            decimals: sample.decimals,
        }
    }
}

impl From<&OracleRecord> for OracleSample {
    fn from(record: &OracleRecord) -> Self {
        let feed = |i: usize| FeedObservation {
            value: record.values[i],
            timestamp: record.timestamps[i],
        };
        Self {
            feeds: [feed(0), feed(1), feed(2)],
            decimals: record.decimals,
        }
    }
}
