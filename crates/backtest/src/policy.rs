//! Strategies: what to back and when to stake.
//!
//! A strategy has two independent axes. The *pick rule* decides which
//! outcome a bet would be placed on (follow the forecast favourite, or
//! always a fixed class). The *selection policy* is a composable
//! predicate over that candidate bet's probability, expected value and
//! model/market disagreement; only candidates it accepts are staked.

use oddsbench_core::Outcome;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::scorer::ScoredEvent;

/// Which outcome a strategy would back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickRule {
    /// Back the forecast argmax.
    Favourite,
    /// Always back one outcome class, whatever the forecast favours.
    Fixed(Outcome),
}

/// The bet a pick rule proposes for one scored event. Thresholds are
/// always evaluated against these numbers, so a `Fixed` rule judges the
/// fixed class's own probability and value rather than the favourite's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetCandidate {
    /// Outcome the stake would go on.
    pub outcome: Outcome,
    /// Forecast probability of that outcome.
    pub probability: f64,
    /// Expected value of a unit stake on that outcome.
    pub expected_value: f64,
    /// Forecast minus market probability for that outcome.
    pub disagreement: f64,
}

impl BetCandidate {
    /// Builds the candidate a pick rule proposes for one scored event.
    #[must_use]
    pub fn propose(scored: &ScoredEvent, rule: PickRule) -> Self {
        match rule {
            PickRule::Favourite => Self {
                outcome: scored.pick,
                probability: scored.pick_probability,
                expected_value: scored.expected_value,
                disagreement: scored.disagreement,
            },
            PickRule::Fixed(outcome) => Self {
                outcome,
                probability: scored.forecast.probability(outcome),
                expected_value: scored.expected_value_for(outcome),
                disagreement: scored.disagreement_for(outcome),
            },
        }
    }
}

/// Composable selection predicate. Pure data, serializable, so strategy
/// definitions can live in config files.
///
/// `MinProbability` is inclusive; `MinExpectedValue` and
/// `MinDisagreement` are strict, so `MinExpectedValue(0.0)` reads
/// "positive EV".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Accepts when every child accepts. Empty = accept everything.
    All(Vec<SelectionPolicy>),
    /// Accepts when any child accepts. Empty = accept nothing.
    Any(Vec<SelectionPolicy>),
    /// Exact complement of the child.
    Not(Box<SelectionPolicy>),
    /// Candidate probability at least this.
    MinProbability(f64),
    /// Candidate EV strictly above this.
    MinExpectedValue(f64),
    /// Candidate disagreement strictly above this.
    MinDisagreement(f64),
    /// Rejects candidates on any of the listed outcomes.
    Exclude(Vec<Outcome>),
}

impl SelectionPolicy {
    /// The policy that accepts every candidate.
    #[must_use]
    pub fn always() -> Self {
        Self::All(Vec::new())
    }

    /// Evaluates the predicate against one candidate bet.
    #[must_use]
    pub fn accepts(&self, candidate: &BetCandidate) -> bool {
        match self {
            Self::All(children) => children.iter().all(|c| c.accepts(candidate)),
            Self::Any(children) => children.iter().any(|c| c.accepts(candidate)),
            Self::Not(child) => !child.accepts(candidate),
            Self::MinProbability(p) => candidate.probability >= *p,
            Self::MinExpectedValue(e) => candidate.expected_value > *e,
            Self::MinDisagreement(d) => candidate.disagreement > *d,
            Self::Exclude(outcomes) => !outcomes.contains(&candidate.outcome),
        }
    }
}

/// A named staking strategy. Never mutated mid-run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Report label.
    pub name: String,
    /// Which outcome to back.
    pub pick_rule: PickRule,
    /// Which candidates to stake.
    pub policy: SelectionPolicy,
    /// Flat stake per selected bet.
    pub stake: Decimal,
}

impl Strategy {
    /// Creates a strategy.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        pick_rule: PickRule,
        policy: SelectionPolicy,
        stake: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            pick_rule,
            policy,
            stake,
        }
    }

    /// Returns the candidate bet if this strategy stakes the event.
    #[must_use]
    pub fn selects(&self, scored: &ScoredEvent) -> Option<BetCandidate> {
        let candidate = BetCandidate::propose(scored, self.pick_rule);
        self.policy.accepts(&candidate).then_some(candidate)
    }

    /// The canonical comparison set: the favourite baseline plus the
    /// probability/EV threshold combinations that have proven worth
    /// tracking, all at the same flat stake.
    #[must_use]
    pub fn standard_set(stake: Decimal) -> Vec<Strategy> {
        let no_draw = SelectionPolicy::Exclude(vec![Outcome::Draw]);
        vec![
            Strategy::new(
                "favourite",
                PickRule::Favourite,
                SelectionPolicy::always(),
                stake,
            ),
            Strategy::new(
                "favourite_no_draw",
                PickRule::Favourite,
                no_draw.clone(),
                stake,
            ),
            Strategy::new(
                "prob45_ev_pos",
                PickRule::Favourite,
                SelectionPolicy::All(vec![
                    SelectionPolicy::MinProbability(0.45),
                    SelectionPolicy::MinExpectedValue(0.0),
                ]),
                stake,
            ),
            Strategy::new(
                "prob50_ev_pos",
                PickRule::Favourite,
                SelectionPolicy::All(vec![
                    SelectionPolicy::MinProbability(0.50),
                    SelectionPolicy::MinExpectedValue(0.0),
                ]),
                stake,
            ),
            Strategy::new(
                "prob50_ev5_no_draw",
                PickRule::Favourite,
                SelectionPolicy::All(vec![
                    SelectionPolicy::MinProbability(0.50),
                    SelectionPolicy::MinExpectedValue(0.05),
                    no_draw.clone(),
                ]),
                stake,
            ),
            Strategy::new(
                "prob55_ev_pos_no_draw",
                PickRule::Favourite,
                SelectionPolicy::All(vec![
                    SelectionPolicy::MinProbability(0.55),
                    SelectionPolicy::MinExpectedValue(0.0),
                    no_draw,
                ]),
                stake,
            ),
            Strategy::new(
                "home_prob50_ev_pos",
                PickRule::Fixed(Outcome::Home),
                SelectionPolicy::All(vec![
                    SelectionPolicy::MinProbability(0.50),
                    SelectionPolicy::MinExpectedValue(0.0),
                ]),
                stake,
            ),
            Strategy::new(
                "prob60",
                PickRule::Favourite,
                SelectionPolicy::MinProbability(0.60),
                stake,
            ),
        ]
    }
}
