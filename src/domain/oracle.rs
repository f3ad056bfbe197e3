//! Oracle price aggregation.
//!
//! Three independent feeds are reduced to a robust price and a freshness
//! measurement. The median tolerates exactly one faulty feed; the age is
//! taken from the **most recent** timestamp, so a single live feed keeps the
//! sample fresh even when the other two have stalled. That asymmetry is
//! deliberate and load-bearing — do not "fix" it to use the median timestamp.
//!
//! Staleness is advisory here: the aggregate carries a `stale` flag and the
//! lifecycle layer decides whether stale data is acceptable for the operation
//! at hand (it never is for settlement unless the caller opts in).

use serde::{Deserialize, Serialize};

use super::errors::EngineError;

/// One `(value, timestamp)` observation from a single feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedObservation {
    /// Price in the feed's fixed decimal scale.
    pub value: i64,
    /// Unix seconds at which the feed published this value.
    pub timestamp: i64,
}

/// A full three-feed sample plus its shared decimal scale.
///
/// Transient input — aggregated and discarded, never persisted as state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleSample {
    pub feeds: [FeedObservation; 3],
    /// Number of decimal places in each feed value.
    pub decimals: u8,
}

/// Aggregated result: robust price plus freshness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedPrice {
    /// Median of the three feed values, outlier-tolerant against one
    /// faulty feed.
    pub median: i64,
    /// Decimal scale carried over from the sample.
    pub decimals: u8,
    /// `now` minus the freshest feed timestamp. Negative means a feed
    /// reported from the future, which is always treated as stale.
    pub age_secs: i64,
    /// Whether the sample breached the caller-supplied age threshold.
    pub stale: bool,
}

impl OracleSample {
    /// Reduces the sample to a median price and an age relative to `now`.
    ///
    /// `max_age_secs` is caller policy (e.g. 90 for settlement reads).
    pub fn aggregate(&self, now: i64, max_age_secs: i64) -> AggregatedPrice {
        let mut values = [
            self.feeds[0].value,
            self.feeds[1].value,
            self.feeds[2].value,
        ];
        values.sort_unstable();
        let newest = self
            .feeds
            .iter()
            .map(|f| f.timestamp)
            .max()
            .unwrap_or_default();
        let age_secs = now.saturating_sub(newest);
        AggregatedPrice {
            median: values[1],
            decimals: self.decimals,
            age_secs,
            stale: age_secs < 0 || age_secs > max_age_secs,
        }
    }
}

/// Aggregates an optionally-present oracle account.
///
/// # Errors
/// `OracleUnavailable` when the feed account is absent. Staleness is not an
/// error at this layer; callers inspect `AggregatedPrice::stale`.
pub fn aggregate(
    sample: Option<&OracleSample>,
    now: i64,
    max_age_secs: i64,
) -> Result<AggregatedPrice, EngineError> {
    sample
        .map(|s| s.aggregate(now, max_age_secs))
        .ok_or(EngineError::OracleUnavailable)
}
