//! Run configuration, loaded from TOML and environment variables.

use chrono::{DateTime, Utc};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// How to partition the chronological event stream into train and test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitSpec {
    /// Train on the leading fraction of events, evaluate on the rest.
    /// Must lie strictly inside (0, 1).
    Fraction(f64),
    /// Train on events with kickoff strictly before the instant,
    /// evaluate on the rest.
    Cutoff(DateTime<Utc>),
}

impl SplitSpec {
    /// Validates the specification itself, independent of any data.
    ///
    /// # Errors
    /// Returns `InvalidSplit` for a fraction at or outside (0, 1), or a
    /// non-finite fraction.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Fraction(f) if !f.is_finite() || *f <= 0.0 || *f >= 1.0 => Err(
                EngineError::InvalidSplit(format!("fraction {f} must lie strictly inside (0, 1)")),
            ),
            _ => Ok(()),
        }
    }
}

impl Default for SplitSpec {
    fn default() -> Self {
        // Matches the historical 70/30 evaluation convention.
        Self::Fraction(0.7)
    }
}

/// Tunable knobs for a backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    /// Flat stake placed on every selected bet.
    pub stake: Decimal,
    /// Train/test partition rule.
    pub split: SplitSpec,
    /// Minimum evaluation events a cutoff split must leave.
    pub min_test_events: usize,
    /// Bands with fewer scored events than this are flagged low-sample.
    pub min_band_samples: usize,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            stake: Decimal::TEN,
            split: SplitSpec::default(),
            min_test_events: 50,
            min_band_samples: 50,
        }
    }
}

pub struct SettingsLoader;

impl SettingsLoader {
    /// Loads settings by merging `config/Backtest.toml` with
    /// `ODDSBENCH_`-prefixed environment variables. Missing sources fall
    /// back to defaults.
    ///
    /// # Errors
    /// Returns `Configuration` if a present source cannot be parsed.
    pub fn load() -> Result<BacktestSettings> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file("config/Backtest.toml"))
                .merge(Env::prefixed("ODDSBENCH_")),
        )
    }

    /// Loads settings with an additional profile overlay, e.g.
    /// `config/Backtest.premier_league.toml`.
    ///
    /// # Errors
    /// Returns `Configuration` if a present source cannot be parsed.
    pub fn load_with_profile(profile: &str) -> Result<BacktestSettings> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file("config/Backtest.toml"))
                .merge(Toml::file(format!("config/Backtest.{profile}.toml")))
                .merge(Env::prefixed("ODDSBENCH_")),
        )
    }

    fn from_figment(figment: Figment) -> Result<BacktestSettings> {
        let settings: BacktestSettings = figment
            .extract()
            .map_err(|e| EngineError::Configuration(e.to_string()))?;
        settings.split.validate()?;
        Ok(settings)
    }
}
