//! Classifier seam.
//!
//! The engine never trains or owns a model; it only asks an implementor
//! of [`MatchClassifier`] for a probability distribution given a feature
//! vector. Fitting happens outside the engine, on the training window
//! the splitter hands back to the caller.

use crate::distribution::Distribution;
use crate::error::Result;

/// A fitted three-way match result classifier.
///
/// Implementations must be deterministic: the same features must yield
/// the same distribution across calls, or downstream reports stop being
/// reproducible.
pub trait MatchClassifier {
    /// Produces a probability distribution over the three outcomes for
    /// one feature vector.
    ///
    /// # Errors
    /// Returns `MalformedForecast` when the underlying model emits
    /// something that is not a valid distribution.
    fn predict_distribution(&self, features: &[f64]) -> Result<Distribution>;

    /// Predicts a batch of feature vectors.
    ///
    /// Equivalent to calling [`MatchClassifier::predict_distribution`]
    /// per element; implementations may override for throughput but must
    /// keep the results identical.
    ///
    /// # Errors
    /// Fails on the first vector the model cannot score.
    fn predict_batch(&self, batch: &[Vec<f64>]) -> Result<Vec<Distribution>> {
        batch
            .iter()
            .map(|features| self.predict_distribution(features))
            .collect()
    }
}
