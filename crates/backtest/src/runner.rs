//! Strategy backtests over one evaluation window.
//!
//! The runner does one split, one scoring pass, then evaluates every
//! strategy against the same read-only scored set. Same inputs, same
//! report, bit for bit.

use oddsbench_core::{
    BacktestSettings, HitRateValidation, MatchClassifier, MatchEvent, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bands::{BandAggregator, BandReport};
use crate::policy::{PickRule, Strategy};
use crate::scorer::{ForecastScorer, ScoredEvent};
use crate::split::ChronologicalSplitter;

/// Per-strategy aggregates for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyReport {
    /// Strategy label.
    pub name: String,
    /// Bets placed.
    pub selected: usize,
    /// Bets that won.
    pub correct: usize,
    /// `correct / selected`, 0 when nothing was selected.
    pub hit_rate: f64,
    /// Wilson CI and significance of the hit rate against the market
    /// favourite baseline.
    pub validation: HitRateValidation,
    /// Total amount staked.
    pub total_staked: Decimal,
    /// Net profit over the window.
    pub profit: Decimal,
    /// `profit / total_staked`, 0 when nothing was staked.
    pub roi: Decimal,
    /// True when the policy selected no events. A valid degenerate
    /// result; such strategies are excluded from best/worst ranking.
    pub empty_selection: bool,
    /// Band sub-reports, when an aggregator is configured and the
    /// strategy follows the forecast favourite.
    pub bands: Option<Vec<BandReport>>,
}

/// Full output of one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// One report per strategy, in input order.
    pub strategies: Vec<StrategyReport>,
    /// Name of the highest-ROI strategy with a non-empty selection.
    pub best: Option<String>,
    /// Name of the lowest-ROI strategy with a non-empty selection.
    pub worst: Option<String>,
    /// Events in the evaluation window after the split.
    pub test_events: usize,
    /// Hit rate of always backing the market favourite, over every
    /// scored event. The baseline every strategy is judged against.
    pub market_hit_rate: f64,
    /// Events excluded for data quality reasons.
    pub skipped: usize,
    /// One line per skipped event.
    pub warnings: Vec<String>,
}

/// Orchestrates split, scoring, and strategy evaluation.
pub struct BacktestRunner {
    settings: BacktestSettings,
    band_aggregator: Option<BandAggregator>,
}

impl BacktestRunner {
    /// Creates a runner with the given settings and no band slicing.
    #[must_use]
    pub fn new(settings: BacktestSettings) -> Self {
        Self {
            settings,
            band_aggregator: None,
        }
    }

    /// Attaches a band aggregator. Favourite-rule strategies then carry
    /// band sub-reports over their own selections.
    #[must_use]
    pub fn with_bands(mut self, aggregator: BandAggregator) -> Self {
        self.band_aggregator = Some(aggregator);
        self
    }

    /// Runs every strategy over the evaluation window.
    ///
    /// # Errors
    /// Fails fast on configuration problems: an unusable split spec,
    /// unordered input, or a cutoff split leaving too few test events.
    /// Per-event data problems are skipped and reported, never fatal.
    pub fn run(
        &self,
        classifier: &dyn MatchClassifier,
        events: &[MatchEvent],
        strategies: &[Strategy],
    ) -> Result<BacktestReport> {
        let splitter =
            ChronologicalSplitter::new(self.settings.split, self.settings.min_test_events)?;
        let split = splitter.split(events)?;

        let scoring = ForecastScorer::score(classifier, split.test);

        let market_wins = scoring
            .scored
            .iter()
            .filter(|s| s.market_favourite_won())
            .count();
        let market_hit_rate = if scoring.scored.is_empty() {
            0.0
        } else {
            market_wins as f64 / scoring.scored.len() as f64
        };

        let reports: Vec<StrategyReport> = strategies
            .iter()
            .map(|strategy| self.evaluate(strategy, &scoring.scored, market_hit_rate))
            .collect();

        let (best, worst) = Self::rank(&reports);

        Ok(BacktestReport {
            strategies: reports,
            best,
            worst,
            test_events: split.test.len(),
            market_hit_rate,
            skipped: scoring.skipped,
            warnings: scoring.warnings,
        })
    }

    fn evaluate(
        &self,
        strategy: &Strategy,
        scored: &[ScoredEvent],
        baseline: f64,
    ) -> StrategyReport {
        let mut selected = 0_usize;
        let mut correct = 0_usize;
        let mut profit = Decimal::ZERO;
        let mut picked_events: Vec<ScoredEvent> = Vec::new();

        for event in scored {
            let Some(candidate) = strategy.selects(event) else {
                continue;
            };
            selected += 1;
            let price = event.event.odds.price(candidate.outcome);
            if event.event.result == candidate.outcome {
                correct += 1;
                profit += strategy.stake * (price - Decimal::ONE);
            } else {
                profit -= strategy.stake;
            }
            if self.band_aggregator.is_some() && strategy.pick_rule == PickRule::Favourite {
                picked_events.push(event.clone());
            }
        }

        let total_staked = strategy.stake * Decimal::from(selected as u64);
        let roi = if total_staked > Decimal::ZERO {
            profit / total_staked
        } else {
            Decimal::ZERO
        };
        let hit_rate = if selected > 0 {
            correct as f64 / selected as f64
        } else {
            0.0
        };

        let bands = match (&self.band_aggregator, strategy.pick_rule) {
            (Some(aggregator), PickRule::Favourite) => {
                Some(aggregator.aggregate(&picked_events, strategy.stake))
            }
            _ => None,
        };

        debug!(
            strategy = %strategy.name,
            selected,
            correct,
            %profit,
            "strategy evaluated"
        );

        StrategyReport {
            name: strategy.name.clone(),
            selected,
            correct,
            hit_rate,
            validation: HitRateValidation::from_counts(correct, selected, baseline),
            total_staked,
            profit,
            roi,
            empty_selection: selected == 0,
            bands,
        }
    }

    /// Best and worst by ROI among strategies that selected anything.
    /// Strict comparisons keep the earlier strategy on ties.
    fn rank(reports: &[StrategyReport]) -> (Option<String>, Option<String>) {
        let mut best: Option<&StrategyReport> = None;
        let mut worst: Option<&StrategyReport> = None;
        for report in reports.iter().filter(|r| !r.empty_selection) {
            if best.map_or(true, |b| report.roi > b.roi) {
                best = Some(report);
            }
            if worst.map_or(true, |w| report.roi < w.roi) {
                worst = Some(report);
            }
        }
        (
            best.map(|r| r.name.clone()),
            worst.map(|r| r.name.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use oddsbench_core::{
        Distribution, EngineError, MarketOdds, Outcome, SplitSpec,
    };
    use rust_decimal_macros::dec;

    use crate::policy::SelectionPolicy;

    /// Always leans home with the given probability.
    struct HomeLean(f64);

    impl MatchClassifier for HomeLean {
        fn predict_distribution(&self, _features: &[f64]) -> oddsbench_core::Result<Distribution> {
            let rest = (1.0 - self.0) / 2.0;
            Distribution::new(self.0, rest, rest)
        }
    }

    fn settings() -> BacktestSettings {
        BacktestSettings {
            stake: dec!(1),
            split: SplitSpec::Fraction(0.5),
            min_test_events: 0,
            min_band_samples: 1,
        }
    }

    /// Events where the first half trains and the second half carries
    /// the given results at even money on the home side.
    fn events_with_test_results(test_results: &[Outcome]) -> Vec<MatchEvent> {
        let start = Utc.with_ymd_and_hms(2024, 8, 1, 15, 0, 0).unwrap();
        let odds = MarketOdds::new(dec!(2.0), dec!(3.4), dec!(3.6));
        let train = test_results
            .iter()
            .enumerate()
            .map(|(i, _)| {
                MatchEvent::new(i as u64, start + Duration::days(i as i64), Outcome::Home, vec![], odds)
            });
        let offset = test_results.len();
        let test = test_results.iter().enumerate().map(move |(i, result)| {
            MatchEvent::new(
                (offset + i) as u64,
                start + Duration::days((offset + i) as i64),
                *result,
                vec![],
                odds,
            )
        });
        train.chain(test).collect()
    }

    fn favourite_strategy(stake: Decimal) -> Strategy {
        Strategy::new(
            "favourite",
            PickRule::Favourite,
            SelectionPolicy::always(),
            stake,
        )
    }

    #[test]
    fn worked_example_six_wins_four_losses() {
        // 6 wins at price 2.0 and 4 losses at unit stake:
        // profit = 6 * 1 - 4 = 2, ROI = 2 / 10 = 20%.
        let mut results = vec![Outcome::Home; 6];
        results.extend(vec![Outcome::Away; 4]);
        let events = events_with_test_results(&results);

        let runner = BacktestRunner::new(settings());
        let classifier = HomeLean(0.6);
        let report = runner
            .run(&classifier, &events, &[favourite_strategy(dec!(1))])
            .unwrap();

        let strategy = &report.strategies[0];
        assert_eq!(strategy.selected, 10);
        assert_eq!(strategy.correct, 6);
        assert_eq!(strategy.profit, dec!(2));
        assert_eq!(strategy.roi, dec!(0.2));
        assert!((strategy.hit_rate - 0.6).abs() < 1e-12);
        assert!(!strategy.empty_selection);
    }

    #[test]
    fn empty_selection_is_degenerate_not_error() {
        let events = events_with_test_results(&[Outcome::Home; 4]);
        let impossible = Strategy::new(
            "impossible",
            PickRule::Favourite,
            SelectionPolicy::MinProbability(0.99),
            dec!(1),
        );

        let runner = BacktestRunner::new(settings());
        let classifier = HomeLean(0.6);
        let report = runner.run(&classifier, &events, &[impossible]).unwrap();

        let strategy = &report.strategies[0];
        assert!(strategy.empty_selection);
        assert_eq!(strategy.selected, 0);
        assert_eq!(strategy.profit, dec!(0));
        assert_eq!(strategy.roi, dec!(0));
        // Nothing selected anywhere: no ranking.
        assert_eq!(report.best, None);
        assert_eq!(report.worst, None);
    }

    #[test]
    fn empty_selections_excluded_from_ranking() {
        let mut results = vec![Outcome::Home; 6];
        results.extend(vec![Outcome::Away; 4]);
        let events = events_with_test_results(&results);

        let strategies = vec![
            favourite_strategy(dec!(1)),
            Strategy::new(
                "impossible",
                PickRule::Favourite,
                SelectionPolicy::MinProbability(0.99),
                dec!(1),
            ),
        ];

        let runner = BacktestRunner::new(settings());
        let classifier = HomeLean(0.6);
        let report = runner.run(&classifier, &events, &strategies).unwrap();

        assert_eq!(report.best.as_deref(), Some("favourite"));
        assert_eq!(report.worst.as_deref(), Some("favourite"));
    }

    #[test]
    fn ranking_ties_keep_input_order() {
        let events = events_with_test_results(&[Outcome::Home; 4]);
        // Two identical strategies: first wins both rankings.
        let strategies = vec![
            Strategy::new("first", PickRule::Favourite, SelectionPolicy::always(), dec!(1)),
            Strategy::new("second", PickRule::Favourite, SelectionPolicy::always(), dec!(1)),
        ];

        let runner = BacktestRunner::new(settings());
        let classifier = HomeLean(0.6);
        let report = runner.run(&classifier, &events, &strategies).unwrap();

        assert_eq!(report.best.as_deref(), Some("first"));
        assert_eq!(report.worst.as_deref(), Some("first"));
    }

    #[test]
    fn fixed_rule_judges_its_own_class() {
        // Forecast favours Home 0.6; Away has probability 0.2 but a juicy
        // price of 6.0, so its EV is 0.2 * 6 - 1 = 0.2.
        let start = Utc.with_ymd_and_hms(2024, 8, 1, 15, 0, 0).unwrap();
        let odds = MarketOdds::new(dec!(2.0), dec!(3.0), dec!(6.0));
        let events: Vec<MatchEvent> = (0..4)
            .map(|i| {
                MatchEvent::new(
                    i,
                    start + Duration::days(i as i64),
                    if i == 3 { Outcome::Away } else { Outcome::Home },
                    vec![],
                    odds,
                )
            })
            .collect();

        let away_value = Strategy::new(
            "away_value",
            PickRule::Fixed(Outcome::Away),
            SelectionPolicy::MinExpectedValue(0.0),
            dec!(1),
        );

        let runner = BacktestRunner::new(BacktestSettings {
            split: SplitSpec::Fraction(0.5),
            ..settings()
        });
        let classifier = HomeLean(0.6);
        let report = runner.run(&classifier, &events, &[away_value]).unwrap();

        let strategy = &report.strategies[0];
        // Both test events selected (EV on Away is positive throughout);
        // one win at 6.0 (+5) and one loss (-1).
        assert_eq!(strategy.selected, 2);
        assert_eq!(strategy.correct, 1);
        assert_eq!(strategy.profit, dec!(4));
        // Fixed-rule strategies carry no band sub-reports.
        assert!(strategy.bands.is_none());
    }

    #[test]
    fn bands_attached_for_favourite_strategies() {
        use crate::bands::{Band, BandDimension};

        let events = events_with_test_results(&[Outcome::Home; 4]);
        let aggregator = BandAggregator::new(
            BandDimension::PickProbability,
            vec![Band::new(0.0, 0.5), Band::new(0.5, 1.0)],
            1,
        )
        .unwrap();

        let runner = BacktestRunner::new(settings()).with_bands(aggregator);
        let classifier = HomeLean(0.6);
        let report = runner
            .run(&classifier, &events, &[favourite_strategy(dec!(1))])
            .unwrap();

        let bands = report.strategies[0].bands.as_ref().unwrap();
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].count, 0);
        assert_eq!(bands[1].count, 4);
    }

    #[test]
    fn split_errors_abort_the_run() {
        let events = events_with_test_results(&[Outcome::Home; 4]);
        let runner = BacktestRunner::new(BacktestSettings {
            split: SplitSpec::Cutoff(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()),
            min_test_events: 5,
            ..settings()
        });
        let classifier = HomeLean(0.6);
        let err = runner
            .run(&classifier, &events, &[favourite_strategy(dec!(1))])
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientTestData { .. }));
    }

    #[test]
    fn report_carries_skip_counts() {
        let start = Utc.with_ymd_and_hms(2024, 8, 1, 15, 0, 0).unwrap();
        let good = MarketOdds::new(dec!(2.0), dec!(3.4), dec!(3.6));
        let bad = MarketOdds::new(dec!(0.9), dec!(3.4), dec!(3.6));
        let events: Vec<MatchEvent> = (0..4)
            .map(|i| {
                MatchEvent::new(
                    i,
                    start + Duration::days(i as i64),
                    Outcome::Home,
                    vec![],
                    if i == 3 { bad } else { good },
                )
            })
            .collect();

        let runner = BacktestRunner::new(settings());
        let classifier = HomeLean(0.6);
        let report = runner
            .run(&classifier, &events, &[favourite_strategy(dec!(1))])
            .unwrap();

        assert_eq!(report.test_events, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.strategies[0].selected, 1);
    }

    #[test]
    fn identical_runs_produce_identical_reports() {
        let mut results = vec![Outcome::Home; 6];
        results.extend(vec![Outcome::Away; 4]);
        let events = events_with_test_results(&results);
        let strategies = Strategy::standard_set(dec!(10));

        let runner = BacktestRunner::new(settings());
        let classifier = HomeLean(0.6);
        let first = runner.run(&classifier, &events, &strategies).unwrap();
        let second = runner.run(&classifier, &events, &strategies).unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
