//! The fixed set of mutually exclusive match results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Full-time result of a match.
///
/// The declaration order doubles as the tie-break priority: whenever two
/// outcomes carry exactly the same probability, the one listed first wins.
/// Every component that resolves ties uses this single ordering, so runs
/// are reproducible bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    /// Home team wins.
    Home,
    /// Match ends level.
    Draw,
    /// Away team wins.
    Away,
}

impl Outcome {
    /// All outcomes in tie-break priority order.
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];

    /// Position of this outcome within [`Outcome::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Outcome::Home => 0,
            Outcome::Draw => 1,
            Outcome::Away => 2,
        }
    }

    /// Stable lowercase label, matching the upstream data source.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Home => "home_win",
            Outcome::Draw => "draw",
            Outcome::Away => "away_win",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_outcomes_in_priority_order() {
        assert_eq!(
            Outcome::ALL,
            [Outcome::Home, Outcome::Draw, Outcome::Away]
        );
    }

    #[test]
    fn index_matches_position_in_all() {
        for (i, outcome) in Outcome::ALL.iter().enumerate() {
            assert_eq!(outcome.index(), i);
        }
    }

    #[test]
    fn ordering_follows_declaration_order() {
        assert!(Outcome::Home < Outcome::Draw);
        assert!(Outcome::Draw < Outcome::Away);
    }

    #[test]
    fn labels_match_upstream_result_names() {
        assert_eq!(Outcome::Home.label(), "home_win");
        assert_eq!(Outcome::Draw.label(), "draw");
        assert_eq!(Outcome::Away.label(), "away_win");
    }

    #[test]
    fn serializes_as_variant_name() {
        assert_eq!(serde_json::to_string(&Outcome::Home).unwrap(), r#""Home""#);
        assert_eq!(serde_json::to_string(&Outcome::Away).unwrap(), r#""Away""#);
    }

    #[test]
    fn deserializes_from_variant_name() {
        let outcome: Outcome = serde_json::from_str(r#""Draw""#).unwrap();
        assert_eq!(outcome, Outcome::Draw);
    }
}
