//! Forecast evaluation and strategy backtesting for three-way match
//! markets.
//!
//! The pipeline: split the event stream chronologically, score the
//! evaluation window (classifier forecast + de-margined market
//! distribution + expected value per event), then evaluate named
//! staking strategies and banded accuracy slices over the same
//! read-only scored set.

pub mod bands;
pub mod ev;
pub mod odds;
pub mod policy;
pub mod runner;
pub mod scorer;
pub mod split;

pub use bands::{Band, BandAggregator, BandDimension, BandReport};
pub use ev::ExpectedValueCalculator;
pub use odds::OddsNormalizer;
pub use policy::{BetCandidate, PickRule, SelectionPolicy, Strategy};
pub use runner::{BacktestReport, BacktestRunner, StrategyReport};
pub use scorer::{ForecastScorer, ScoredEvent, ScoringOutput};
pub use split::{ChronologicalSplit, ChronologicalSplitter};
