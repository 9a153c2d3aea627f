//! Banded aggregation of accuracy and profitability.
//!
//! The caller supplies the bins; the engine never invents quantile cuts.
//! Sparse bins are reported with a `reliable` flag rather than dropped,
//! so a thin slice of the data can never vanish from a report.

use oddsbench_core::{EngineError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::scorer::ScoredEvent;

/// A half-open interval `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Inclusive lower edge.
    pub low: f64,
    /// Exclusive upper edge.
    pub high: f64,
}

impl Band {
    /// Creates a band.
    #[must_use]
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Whether the value falls inside `[low, high)`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value < self.high
    }
}

/// Which per-event number the bands slice over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandDimension {
    /// Forecast probability of the pick.
    PickProbability,
    /// Signed forecast-minus-market disagreement of the pick.
    Disagreement,
}

impl BandDimension {
    fn value_of(self, scored: &ScoredEvent) -> f64 {
        match self {
            Self::PickProbability => scored.pick_probability,
            Self::Disagreement => scored.disagreement,
        }
    }
}

/// Aggregates for one band. Empty and sparse bands are still reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandReport {
    /// The interval this row covers.
    pub band: Band,
    /// Events that fell in the band.
    pub count: usize,
    /// Events whose pick won.
    pub correct: usize,
    /// `correct / count`, 0 for an empty band.
    pub hit_rate: f64,
    /// Events whose market favourite won, for baseline comparison.
    pub market_correct: usize,
    /// `market_correct / count`, 0 for an empty band.
    pub market_hit_rate: f64,
    /// Total profit at the given flat stake.
    pub profit: Decimal,
    /// `profit / (count * stake)` as a fraction, 0 for an empty band.
    pub roi: f64,
    /// False when the band holds fewer samples than the configured
    /// minimum; consumers should not draw conclusions from such rows.
    pub reliable: bool,
}

/// Slices scored events into caller-supplied bands.
pub struct BandAggregator {
    dimension: BandDimension,
    bands: Vec<Band>,
    min_samples: usize,
}

impl BandAggregator {
    /// Creates an aggregator over the given bands.
    ///
    /// # Errors
    /// Returns `InvalidBands` unless every band has finite `low < high`
    /// and the bands are ascending and non-overlapping.
    pub fn new(dimension: BandDimension, bands: Vec<Band>, min_samples: usize) -> Result<Self> {
        if bands.is_empty() {
            return Err(EngineError::InvalidBands("no bands supplied".to_string()));
        }
        for band in &bands {
            if !band.low.is_finite() || !band.high.is_finite() || band.low >= band.high {
                return Err(EngineError::InvalidBands(format!(
                    "band [{}, {}) is not a valid half-open interval",
                    band.low, band.high
                )));
            }
        }
        for pair in bands.windows(2) {
            if pair[1].low < pair[0].high {
                return Err(EngineError::InvalidBands(format!(
                    "band [{}, {}) overlaps or precedes [{}, {})",
                    pair[1].low, pair[1].high, pair[0].low, pair[0].high
                )));
            }
        }
        Ok(Self {
            dimension,
            bands,
            min_samples,
        })
    }

    /// The dimension this aggregator slices over.
    #[must_use]
    pub fn dimension(&self) -> BandDimension {
        self.dimension
    }

    /// Aggregates the events into one report per band, in band order.
    /// Events outside every band are ignored; the caller chose the
    /// domain. Profit per event is `stake * (price - 1)` on a winning
    /// pick, `-stake` otherwise.
    #[must_use]
    pub fn aggregate(&self, scored: &[ScoredEvent], stake: Decimal) -> Vec<BandReport> {
        let mut reports: Vec<BandReport> = self
            .bands
            .iter()
            .map(|band| BandReport {
                band: *band,
                count: 0,
                correct: 0,
                hit_rate: 0.0,
                market_correct: 0,
                market_hit_rate: 0.0,
                profit: Decimal::ZERO,
                roi: 0.0,
                reliable: false,
            })
            .collect();

        for event in scored {
            let value = self.dimension.value_of(event);
            let Some(report) = reports.iter_mut().find(|r| r.band.contains(value)) else {
                continue;
            };
            report.count += 1;
            if event.pick_won() {
                report.correct += 1;
                report.profit += stake * (event.pick_price - Decimal::ONE);
            } else {
                report.profit -= stake;
            }
            if event.market_favourite_won() {
                report.market_correct += 1;
            }
        }

        for report in &mut reports {
            if report.count > 0 {
                report.hit_rate = report.correct as f64 / report.count as f64;
                report.market_hit_rate = report.market_correct as f64 / report.count as f64;
                let staked = stake * Decimal::from(report.count as u64);
                if staked > Decimal::ZERO {
                    report.roi = (report.profit / staked).to_f64().unwrap_or(0.0);
                }
            }
            report.reliable = report.count >= self.min_samples;
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use oddsbench_core::{
        Distribution, MarketOdds, MatchClassifier, MatchEvent, Outcome, Result,
    };
    use rust_decimal_macros::dec;

    use crate::scorer::ForecastScorer;

    struct HomeLean(f64);

    impl MatchClassifier for HomeLean {
        fn predict_distribution(&self, _features: &[f64]) -> Result<Distribution> {
            let rest = (1.0 - self.0) / 2.0;
            Distribution::new(self.0, rest, rest)
        }
    }

    fn scored_with(home_prob: f64, result: Outcome) -> ScoredEvent {
        let event = MatchEvent::new(
            1,
            Utc.with_ymd_and_hms(2024, 8, 1, 15, 0, 0).unwrap() + Duration::hours(1),
            result,
            vec![],
            MarketOdds::new(dec!(2.0), dec!(3.0), dec!(6.0)),
        );
        let classifier = HomeLean(home_prob);
        ForecastScorer::score(&classifier, &[event]).scored.remove(0)
    }

    fn probability_bands() -> Vec<Band> {
        vec![
            Band::new(0.4, 0.5),
            Band::new(0.5, 0.6),
            Band::new(0.6, 0.7),
        ]
    }

    #[test]
    fn rejects_empty_band_list() {
        assert!(BandAggregator::new(BandDimension::PickProbability, vec![], 1).is_err());
    }

    #[test]
    fn rejects_inverted_band() {
        let bands = vec![Band::new(0.6, 0.5)];
        assert!(matches!(
            BandAggregator::new(BandDimension::PickProbability, bands, 1),
            Err(EngineError::InvalidBands(_))
        ));
    }

    #[test]
    fn rejects_overlapping_bands() {
        let bands = vec![Band::new(0.4, 0.55), Band::new(0.5, 0.6)];
        assert!(BandAggregator::new(BandDimension::PickProbability, bands, 1).is_err());
    }

    #[test]
    fn rejects_descending_bands() {
        let bands = vec![Band::new(0.5, 0.6), Band::new(0.3, 0.4)];
        assert!(BandAggregator::new(BandDimension::PickProbability, bands, 1).is_err());
    }

    #[test]
    fn gaps_between_bands_are_allowed() {
        let bands = vec![Band::new(0.0, 0.2), Band::new(0.5, 0.7)];
        assert!(BandAggregator::new(BandDimension::PickProbability, bands, 1).is_ok());
    }

    #[test]
    fn bin_edges_are_half_open() {
        let band = Band::new(0.5, 0.6);
        assert!(band.contains(0.5));
        assert!(!band.contains(0.6));
    }

    #[test]
    fn events_land_in_the_right_band() {
        let aggregator =
            BandAggregator::new(BandDimension::PickProbability, probability_bands(), 1).unwrap();
        let events = vec![
            scored_with(0.45, Outcome::Home),
            scored_with(0.55, Outcome::Home),
            scored_with(0.55, Outcome::Away),
            scored_with(0.65, Outcome::Home),
        ];

        let reports = aggregator.aggregate(&events, dec!(10));
        assert_eq!(reports[0].count, 1);
        assert_eq!(reports[1].count, 2);
        assert_eq!(reports[2].count, 1);

        // Middle band: one win at 2.0 (+10) and one loss (-10).
        assert_eq!(reports[1].correct, 1);
        assert!((reports[1].hit_rate - 0.5).abs() < f64::EPSILON);
        assert_eq!(reports[1].profit, dec!(0));
        assert!(reports[1].roi.abs() < f64::EPSILON);
    }

    #[test]
    fn sparse_bands_are_flagged_not_hidden() {
        let aggregator =
            BandAggregator::new(BandDimension::PickProbability, probability_bands(), 2).unwrap();
        let events = vec![scored_with(0.45, Outcome::Home)];

        let reports = aggregator.aggregate(&events, dec!(10));
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].count, 1);
        assert!(!reports[0].reliable);
        assert_eq!(reports[1].count, 0);
        assert!(!reports[1].reliable);
    }

    #[test]
    fn band_counts_partition_the_input_when_bands_cover_the_domain() {
        let aggregator = BandAggregator::new(
            BandDimension::PickProbability,
            vec![Band::new(0.0, 0.5), Band::new(0.5, 1.0)],
            1,
        )
        .unwrap();
        let events: Vec<ScoredEvent> = [0.34, 0.45, 0.52, 0.61, 0.72]
            .iter()
            .map(|p| scored_with(*p, Outcome::Home))
            .collect();

        let reports = aggregator.aggregate(&events, dec!(10));
        let total: usize = reports.iter().map(|r| r.count).sum();
        assert_eq!(total, events.len());
    }

    #[test]
    fn disagreement_dimension_uses_signed_gap() {
        // Forecast home 0.6 vs market home 0.5: disagreement +0.1.
        let aggregator = BandAggregator::new(
            BandDimension::Disagreement,
            vec![Band::new(-0.5, 0.0), Band::new(0.0, 0.5)],
            1,
        )
        .unwrap();
        let events = vec![scored_with(0.6, Outcome::Home)];
        let reports = aggregator.aggregate(&events, dec!(10));
        assert_eq!(reports[0].count, 0);
        assert_eq!(reports[1].count, 1);
    }

    #[test]
    fn market_baseline_tracked_per_band() {
        let aggregator = BandAggregator::new(
            BandDimension::PickProbability,
            vec![Band::new(0.0, 1.0)],
            1,
        )
        .unwrap();
        // Market favourite is Home on this book; result Away.
        let events = vec![scored_with(0.6, Outcome::Away)];
        let reports = aggregator.aggregate(&events, dec!(10));
        assert_eq!(reports[0].market_correct, 0);
        assert_eq!(reports[0].correct, 0);
    }
}
