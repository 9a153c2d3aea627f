//! Market odds to probability conversion.
//!
//! Bookmaker prices embed a margin (the overround): the raw implied
//! probabilities 1/price sum to more than 1. The normalizer strips the
//! margin proportionally so downstream code always works with a proper
//! distribution.

use oddsbench_core::{Distribution, EngineError, MarketOdds, Outcome, Result};
use rust_decimal::prelude::ToPrimitive;

/// Converts a set of mutually exclusive market prices into a probability
/// distribution with the overround removed.
pub struct OddsNormalizer;

impl OddsNormalizer {
    /// De-margins the given prices.
    ///
    /// Raw implied probability per class is 1/price; each is divided by
    /// the raw sum so the result sums to 1. Prices that cannot pay out
    /// are rejected before any arithmetic.
    ///
    /// # Errors
    /// Returns `InvalidPrice` if any price is at or below 1.0.
    pub fn normalize(odds: &MarketOdds) -> Result<Distribution> {
        odds.validate()?;

        let mut raw = [0.0_f64; 3];
        for outcome in Outcome::ALL {
            let price = odds.price(outcome);
            let price_f = price
                .to_f64()
                .ok_or(EngineError::InvalidPrice { outcome, price })?;
            raw[outcome.index()] = 1.0 / price_f;
        }

        let overround: f64 = raw.iter().sum();
        Distribution::new(
            raw[0] / overround,
            raw[1] / overround,
            raw[2] / overround,
        )
    }

    /// The bookmaker margin: sum of raw implied probabilities minus 1.
    /// Zero for a fair book, positive in practice.
    ///
    /// # Errors
    /// Returns `InvalidPrice` if any price is at or below 1.0.
    pub fn overround(odds: &MarketOdds) -> Result<f64> {
        odds.validate()?;

        let mut sum = 0.0_f64;
        for outcome in Outcome::ALL {
            let price = odds.price(outcome);
            let price_f = price
                .to_f64()
                .ok_or(EngineError::InvalidPrice { outcome, price })?;
            sum += 1.0 / price_f;
        }
        Ok(sum - 1.0)
    }
}
