//! Historical match events and their market quotes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::outcome::Outcome;

/// Decimal market prices for the three outcomes of one match.
///
/// Each price is the payout multiplier for a unit stake if that outcome
/// occurs. A valid price is strictly greater than 1.0; anything at or
/// below 1.0 cannot return a profit and is rejected by [`MarketOdds::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOdds {
    /// Price quoted on the home win.
    pub home: Decimal,
    /// Price quoted on the draw.
    pub draw: Decimal,
    /// Price quoted on the away win.
    pub away: Decimal,
}

impl MarketOdds {
    /// Creates odds from decimal prices.
    #[must_use]
    pub fn new(home: Decimal, draw: Decimal, away: Decimal) -> Self {
        Self { home, draw, away }
    }

    /// Creates odds from fractional quotes, `(numerator, denominator)` per
    /// outcome. A fractional quote of n/d pays n/d profit per unit staked,
    /// so the decimal price is `1 + n/d`.
    ///
    /// # Errors
    /// Returns `InvalidPrice` if any denominator is zero.
    pub fn from_fractional(
        home: (u32, u32),
        draw: (u32, u32),
        away: (u32, u32),
    ) -> Result<Self> {
        let convert = |outcome: Outcome, (num, den): (u32, u32)| -> Result<Decimal> {
            if den == 0 {
                return Err(EngineError::InvalidPrice {
                    outcome,
                    price: Decimal::ZERO,
                });
            }
            Ok(Decimal::ONE + Decimal::from(num) / Decimal::from(den))
        };
        Ok(Self {
            home: convert(Outcome::Home, home)?,
            draw: convert(Outcome::Draw, draw)?,
            away: convert(Outcome::Away, away)?,
        })
    }

    /// Price quoted for the given outcome.
    #[must_use]
    pub fn price(&self, outcome: Outcome) -> Decimal {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    /// Checks that every price can actually pay out.
    ///
    /// # Errors
    /// Returns `InvalidPrice` naming the first outcome whose price is at
    /// or below 1.0.
    pub fn validate(&self) -> Result<()> {
        for outcome in Outcome::ALL {
            let price = self.price(outcome);
            if price <= Decimal::ONE {
                return Err(EngineError::InvalidPrice { outcome, price });
            }
        }
        Ok(())
    }
}

/// One historical match: what was known before kickoff and what happened.
///
/// The feature vector is opaque to the engine; it is produced (and
/// imputed) by the upstream feature pipeline and only ever forwarded to
/// the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Upstream fixture identifier.
    pub fixture_id: u64,
    /// Kickoff time; the ordering and partitioning key.
    pub kickoff_at: DateTime<Utc>,
    /// Realized full-time result.
    pub result: Outcome,
    /// Pre-imputed numeric features for the classifier.
    pub features: Vec<f64>,
    /// Pre-kickoff market prices.
    pub odds: MarketOdds,
}

impl MatchEvent {
    /// Creates a new match event.
    #[must_use]
    pub fn new(
        fixture_id: u64,
        kickoff_at: DateTime<Utc>,
        result: Outcome,
        features: Vec<f64>,
        odds: MarketOdds,
    ) -> Self {
        Self {
            fixture_id,
            kickoff_at,
            result,
            features,
            odds,
        }
    }
}
