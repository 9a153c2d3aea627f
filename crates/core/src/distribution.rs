//! Validated probability distributions over the three match outcomes.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::outcome::Outcome;

/// Maximum distance from 1.0 the probabilities of a valid distribution
/// may sum to.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// A probability distribution over the three match outcomes.
///
/// Construction validates finiteness, range, and the sum constraint, so a
/// `Distribution` held anywhere downstream is known to be well formed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    home: f64,
    draw: f64,
    away: f64,
}

impl Distribution {
    /// Creates a distribution from per-outcome probabilities.
    ///
    /// # Errors
    /// Returns `MalformedForecast` (fixture id 0; the scorer re-tags it with
    /// the real fixture) if any value is non-finite, outside [0, 1], or the
    /// sum differs from 1.0 by more than [`SUM_TOLERANCE`].
    pub fn new(home: f64, draw: f64, away: f64) -> Result<Self> {
        for (outcome, p) in Outcome::ALL.iter().zip([home, draw, away]) {
            if !p.is_finite() {
                return Err(EngineError::malformed_forecast(
                    0,
                    format!("probability for {outcome} is not finite"),
                ));
            }
            if !(0.0..=1.0).contains(&p) {
                return Err(EngineError::malformed_forecast(
                    0,
                    format!("probability for {outcome} is {p}, outside [0, 1]"),
                ));
            }
        }
        let sum = home + draw + away;
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(EngineError::malformed_forecast(
                0,
                format!("probabilities sum to {sum}, not 1.0"),
            ));
        }
        Ok(Self { home, draw, away })
    }

    /// Creates a distribution from a slice in [`Outcome::ALL`] order.
    ///
    /// # Errors
    /// Returns `MalformedForecast` if the slice is not exactly three
    /// elements long or the values fail validation.
    pub fn from_slice(probabilities: &[f64]) -> Result<Self> {
        match probabilities {
            [home, draw, away] => Self::new(*home, *draw, *away),
            other => Err(EngineError::malformed_forecast(
                0,
                format!("expected 3 class probabilities, got {}", other.len()),
            )),
        }
    }

    /// Probability assigned to the given outcome.
    #[must_use]
    pub fn probability(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    /// The outcome with the highest probability.
    ///
    /// Exact ties resolve to the earlier entry in [`Outcome::ALL`]
    /// (Home, then Draw, then Away).
    #[must_use]
    pub fn favourite(&self) -> Outcome {
        let mut best = Outcome::Home;
        for outcome in [Outcome::Draw, Outcome::Away] {
            if self.probability(outcome) > self.probability(best) {
                best = outcome;
            }
        }
        best
    }

    /// Iterates over `(outcome, probability)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Outcome, f64)> + '_ {
        Outcome::ALL
            .into_iter()
            .map(move |outcome| (outcome, self.probability(outcome)))
    }
}
