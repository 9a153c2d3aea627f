//! Error taxonomy for the forecast evaluation engine.
//!
//! Per-event data quality problems (`InvalidPrice`, `MalformedForecast`)
//! are caught by the scorer, counted, and skipped; configuration problems
//! (`InvalidSplit`, `InvalidBands`, `Configuration`) abort before any
//! scoring work begins.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::outcome::Outcome;

/// Errors raised by the evaluation and backtesting engine.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// A market price that cannot pay out (must be strictly above 1.0).
    #[error("invalid market price for {outcome}: {price} (must be > 1.0)")]
    InvalidPrice {
        /// Outcome class the price was quoted for.
        outcome: Outcome,
        /// The offending price.
        price: Decimal,
    },

    /// The split specification itself is unusable.
    #[error("invalid split specification: {0}")]
    InvalidSplit(String),

    /// The chronological split left too few evaluation events.
    #[error("insufficient test data: {actual} events in test window, need at least {required}")]
    InsufficientTestData {
        /// Minimum number of evaluation events required.
        required: usize,
        /// Number of events the split actually produced.
        actual: usize,
    },

    /// The event source violated its sorted-by-kickoff contract.
    #[error("unordered input: fixture {fixture_id} kicks off before its predecessor")]
    UnorderedInput {
        /// Fixture whose kickoff precedes the one before it.
        fixture_id: u64,
    },

    /// The classifier returned something that is not a probability
    /// distribution over the outcome classes.
    #[error("malformed forecast for fixture {fixture_id}: {reason}")]
    MalformedForecast {
        /// Fixture the forecast was requested for.
        fixture_id: u64,
        /// Shape/sum/finiteness check that failed.
        reason: String,
    },

    /// Band boundaries are not ascending, half-open, non-overlapping.
    #[error("invalid band layout: {0}")]
    InvalidBands(String),

    /// Settings could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl EngineError {
    /// Creates a malformed-forecast error.
    pub fn malformed_forecast(fixture_id: u64, reason: impl Into<String>) -> Self {
        Self::MalformedForecast {
            fixture_id,
            reason: reason.into(),
        }
    }

    /// Returns true if the error describes bad per-event data that the
    /// scorer isolates and skips rather than aborting the run.
    #[must_use]
    pub fn is_data_quality(&self) -> bool {
        matches!(
            self,
            Self::InvalidPrice { .. } | Self::MalformedForecast { .. }
        )
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
