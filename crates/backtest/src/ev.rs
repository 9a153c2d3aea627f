//! Expected value of a unit stake.

use oddsbench_core::{Distribution, MarketOdds, Outcome};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Computes `EV = p * price - 1` for a unit stake.
pub struct ExpectedValueCalculator;

impl ExpectedValueCalculator {
    /// Expected value of a unit stake at the given price with the given
    /// win probability.
    #[must_use]
    pub fn expected_value(probability: f64, price: Decimal) -> f64 {
        probability * price.to_f64().unwrap_or(f64::NAN) - 1.0
    }

    /// Expected value of backing one outcome, given the forecast and the
    /// quoted prices.
    #[must_use]
    pub fn for_outcome(forecast: &Distribution, odds: &MarketOdds, outcome: Outcome) -> f64 {
        Self::expected_value(forecast.probability(outcome), odds.price(outcome))
    }

    /// Expected values for all three outcomes, in priority order.
    #[must_use]
    pub fn for_all(forecast: &Distribution, odds: &MarketOdds) -> [(Outcome, f64); 3] {
        Outcome::ALL.map(|outcome| (outcome, Self::for_outcome(forecast, odds, outcome)))
    }
}
