//! Chronological train/test partitioning.
//!
//! Evaluation must never see events the model could not have known about
//! at fit time, so the stream is cut strictly by kickoff order. There is
//! no shuffling anywhere.

use oddsbench_core::{EngineError, MatchEvent, Result, SplitSpec};
use tracing::debug;

/// Borrowed view of one chronological partition.
#[derive(Debug, Clone, Copy)]
pub struct ChronologicalSplit<'a> {
    /// Events the model may be fitted on.
    pub train: &'a [MatchEvent],
    /// Events reserved for evaluation.
    pub test: &'a [MatchEvent],
}

/// Partitions a kickoff-sorted event stream into train and test windows.
pub struct ChronologicalSplitter {
    spec: SplitSpec,
    min_test_events: usize,
}

impl ChronologicalSplitter {
    /// Creates a splitter for the given specification.
    ///
    /// # Errors
    /// Returns `InvalidSplit` if the specification itself is unusable
    /// (e.g. a fraction outside (0, 1)).
    pub fn new(spec: SplitSpec, min_test_events: usize) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            spec,
            min_test_events,
        })
    }

    /// Splits the events. Idempotent and deterministic.
    ///
    /// # Errors
    /// - `UnorderedInput` if any event kicks off before its predecessor.
    /// - `InvalidSplit` if a fractional split is asked to partition fewer
    ///   than two events.
    /// - `InsufficientTestData` if a cutoff split leaves fewer evaluation
    ///   events than the configured minimum.
    pub fn split<'a>(&self, events: &'a [MatchEvent]) -> Result<ChronologicalSplit<'a>> {
        Self::check_ordering(events)?;

        let train_len = match self.spec {
            SplitSpec::Fraction(fraction) => {
                if events.len() < 2 {
                    return Err(EngineError::InvalidSplit(format!(
                        "fractional split needs at least 2 events, got {}",
                        events.len()
                    )));
                }
                // Clamp so both partitions stay non-empty.
                let raw = (events.len() as f64 * fraction).floor() as usize;
                raw.clamp(1, events.len() - 1)
            }
            SplitSpec::Cutoff(cutoff) => {
                let train_len = events.partition_point(|e| e.kickoff_at < cutoff);
                let test_len = events.len() - train_len;
                if test_len < self.min_test_events {
                    return Err(EngineError::InsufficientTestData {
                        required: self.min_test_events,
                        actual: test_len,
                    });
                }
                train_len
            }
        };

        let (train, test) = events.split_at(train_len);
        debug!(
            train = train.len(),
            test = test.len(),
            "chronological split"
        );
        Ok(ChronologicalSplit { train, test })
    }

    fn check_ordering(events: &[MatchEvent]) -> Result<()> {
        for pair in events.windows(2) {
            if pair[1].kickoff_at < pair[0].kickoff_at {
                return Err(EngineError::UnorderedInput {
                    fixture_id: pair[1].fixture_id,
                });
            }
        }
        Ok(())
    }
}
