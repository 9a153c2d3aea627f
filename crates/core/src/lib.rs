pub mod classifier;
pub mod distribution;
pub mod error;
pub mod event;
pub mod outcome;
pub mod settings;
pub mod validation;

pub use classifier::MatchClassifier;
pub use distribution::{Distribution, SUM_TOLERANCE};
pub use error::{EngineError, Result};
pub use event::{MarketOdds, MatchEvent};
pub use outcome::Outcome;
pub use settings::{BacktestSettings, SettingsLoader, SplitSpec};
pub use validation::{binomial_test, wilson_ci, HitRateValidation};
