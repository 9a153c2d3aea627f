//! Scoring of the evaluation window.
//!
//! One pass over the test events: query the classifier, de-margin the
//! market prices, derive the pick and its expected value. Per-event data
//! problems (bad prices, malformed forecasts) skip that event with a
//! counter and a warning; they never abort the run and never default
//! silently.

use oddsbench_core::{
    Distribution, EngineError, MatchClassifier, MatchEvent, Outcome,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ev::ExpectedValueCalculator;
use crate::odds::OddsNormalizer;

/// One evaluated event. Immutable after scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredEvent {
    /// The underlying match.
    pub event: MatchEvent,
    /// Classifier distribution.
    pub forecast: Distribution,
    /// De-margined market distribution.
    pub market: Distribution,
    /// Forecast argmax (ties by the fixed outcome priority).
    pub pick: Outcome,
    /// Forecast probability of the pick.
    pub pick_probability: f64,
    /// Market price quoted for the pick.
    pub pick_price: Decimal,
    /// Expected value of a unit stake on the pick.
    pub expected_value: f64,
    /// Forecast minus market probability for the pick.
    pub disagreement: f64,
    /// The market's favourite (lowest price), for baseline comparison.
    pub market_favourite: Outcome,
}

impl ScoredEvent {
    /// True if the pick matched the realized result.
    #[must_use]
    pub fn pick_won(&self) -> bool {
        self.pick == self.event.result
    }

    /// True if the market's favourite matched the realized result.
    #[must_use]
    pub fn market_favourite_won(&self) -> bool {
        self.market_favourite == self.event.result
    }

    /// Forecast minus market probability for an arbitrary outcome.
    #[must_use]
    pub fn disagreement_for(&self, outcome: Outcome) -> f64 {
        self.forecast.probability(outcome) - self.market.probability(outcome)
    }

    /// Expected value of a unit stake on an arbitrary outcome.
    #[must_use]
    pub fn expected_value_for(&self, outcome: Outcome) -> f64 {
        ExpectedValueCalculator::for_outcome(&self.forecast, &self.event.odds, outcome)
    }
}

/// Everything one scoring pass produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringOutput {
    /// Successfully scored events, in input order.
    pub scored: Vec<ScoredEvent>,
    /// Events excluded for data quality reasons.
    pub skipped: usize,
    /// One human-readable line per skipped event.
    pub warnings: Vec<String>,
}

/// Scores an evaluation window against a classifier.
pub struct ForecastScorer;

impl ForecastScorer {
    /// Scores every event, skipping (and counting) the malformed ones.
    /// Always runs to completion.
    #[must_use]
    pub fn score(classifier: &dyn MatchClassifier, events: &[MatchEvent]) -> ScoringOutput {
        let mut scored = Vec::with_capacity(events.len());
        let mut skipped = 0;
        let mut warnings = Vec::new();

        for event in events {
            match Self::score_one(classifier, event) {
                Ok(item) => scored.push(item),
                Err(err) => {
                    skipped += 1;
                    let message = format!("fixture {}: {err}", event.fixture_id);
                    warn!(fixture_id = event.fixture_id, %err, "event skipped");
                    warnings.push(message);
                }
            }
        }

        ScoringOutput {
            scored,
            skipped,
            warnings,
        }
    }

    fn score_one(
        classifier: &dyn MatchClassifier,
        event: &MatchEvent,
    ) -> oddsbench_core::Result<ScoredEvent> {
        let market = OddsNormalizer::normalize(&event.odds)?;
        let forecast = classifier
            .predict_distribution(&event.features)
            .map_err(|err| Self::tag_fixture(err, event.fixture_id))?;

        let pick = forecast.favourite();
        let pick_probability = forecast.probability(pick);
        let pick_price = event.odds.price(pick);
        let expected_value =
            ExpectedValueCalculator::for_outcome(&forecast, &event.odds, pick);
        let disagreement = forecast.probability(pick) - market.probability(pick);

        Ok(ScoredEvent {
            event: event.clone(),
            forecast,
            market,
            pick,
            pick_probability,
            pick_price,
            expected_value,
            disagreement,
            market_favourite: market.favourite(),
        })
    }

    /// Distribution validation happens before the fixture is known, so
    /// forecast errors surface with a placeholder id. Attach the real one.
    fn tag_fixture(err: EngineError, fixture_id: u64) -> EngineError {
        match err {
            EngineError::MalformedForecast { reason, .. } => {
                EngineError::MalformedForecast { fixture_id, reason }
            }
            other => other,
        }
    }
}
