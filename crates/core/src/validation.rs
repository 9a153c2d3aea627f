//! Statistical validation for strategy hit rates.
//!
//! Provides hypothesis testing and confidence intervals for judging
//! whether a strategy's observed hit rate reflects real predictive power
//! or sampling noise.

use serde::{Deserialize, Serialize};

/// Statistical summary of a strategy's hit rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitRateValidation {
    /// Proportion of selected bets that won.
    pub hit_rate: f64,
    /// Wilson score confidence interval (lower bound)
    pub wilson_ci_lower: f64,
    /// Wilson score confidence interval (upper bound)
    pub wilson_ci_upper: f64,
    /// p-value from binomial test (H0: hit rate = baseline)
    pub p_value: f64,
    /// Number of settled bets
    pub sample_size: usize,
    /// Whether the result is statistically significant at alpha = 0.05
    pub is_significant: bool,
}

impl HitRateValidation {
    /// Creates a validation result from win counts against a baseline
    /// hit rate (e.g. the market favourite's historical strike rate).
    #[must_use]
    pub fn from_counts(wins: usize, total: usize, baseline: f64) -> Self {
        let hit_rate = if total == 0 {
            0.0
        } else {
            wins as f64 / total as f64
        };

        let (wilson_ci_lower, wilson_ci_upper) = wilson_ci(wins, total, 1.96);
        let p_value = binomial_test(wins, total, baseline);

        Self {
            hit_rate,
            wilson_ci_lower,
            wilson_ci_upper,
            p_value,
            sample_size: total,
            is_significant: p_value < 0.05,
        }
    }

    /// Returns true if the lower bound of the CI clears the baseline.
    #[must_use]
    pub fn beats_baseline(&self, baseline: f64) -> bool {
        self.wilson_ci_lower > baseline
    }
}

/// Calculates the Wilson score confidence interval for a proportion.
///
/// Preferred over the normal approximation because it has better coverage
/// near 0 and 1 and for small samples.
///
/// # Formula
/// ```text
/// CI = (p + z^2/(2n) +/- z * sqrt(p(1-p)/n + z^2/(4n^2))) / (1 + z^2/n)
/// ```
///
/// # Arguments
/// * `wins` - Number of successes
/// * `n` - Total number of trials
/// * `z` - Z-score for confidence level (1.96 for 95%)
///
/// # Examples
/// ```
/// use oddsbench_core::validation::wilson_ci;
///
/// let (lower, upper) = wilson_ci(50, 100, 1.96);
/// assert!(lower > 0.39 && lower < 0.41);
/// assert!(upper > 0.59 && upper < 0.61);
/// ```
#[must_use]
pub fn wilson_ci(wins: usize, n: usize, z: f64) -> (f64, f64) {
    if n == 0 {
        return (0.0, 0.0);
    }

    let n_f = n as f64;
    let p = wins as f64 / n_f;
    let z_sq = z * z;

    let denominator = 1.0 + z_sq / n_f;
    let center = p + z_sq / (2.0 * n_f);

    // Under the square root: p(1-p)/n + z^2/(4n^2)
    let variance_term = p * (1.0 - p) / n_f;
    let correction_term = z_sq / (4.0 * n_f * n_f);
    let spread = z * (variance_term + correction_term).sqrt();

    let lower = (center - spread) / denominator;
    let upper = (center + spread) / denominator;

    (lower.max(0.0), upper.min(1.0))
}

/// Performs a two-tailed binomial test.
///
/// Tests the null hypothesis that the true probability equals `p0`, using
/// the normal approximation with continuity correction.
///
/// # Examples
/// ```
/// use oddsbench_core::validation::binomial_test;
///
/// // 55 out of 100 is not significantly different from 50%
/// let p = binomial_test(55, 100, 0.5);
/// assert!(p > 0.05);
///
/// // 65 out of 100 is significantly different from 50%
/// let p = binomial_test(65, 100, 0.5);
/// assert!(p < 0.05);
/// ```
#[must_use]
pub fn binomial_test(successes: usize, n: usize, p0: f64) -> f64 {
    if n == 0 {
        return 1.0;
    }

    let n_f = n as f64;
    let k = successes as f64;

    let expected = n_f * p0;
    let std_dev = (n_f * p0 * (1.0 - p0)).sqrt();

    if std_dev < f64::EPSILON {
        // Edge case: p0 = 0 or p0 = 1
        if (p0 < f64::EPSILON && successes == 0) || (p0 > 1.0 - f64::EPSILON && successes == n) {
            return 1.0;
        }
        return 0.0;
    }

    // Continuity correction
    let z = (k - expected).abs() - 0.5;
    if z < 0.0 {
        return 1.0;
    }
    let z_score = z / std_dev;

    2.0 * (1.0 - standard_normal_cdf(z_score))
}

/// Approximation of the standard normal CDF using the Abramowitz and Stegun formula.
/// Accurate to about 10^-5.
fn standard_normal_cdf(x: f64) -> f64 {
    if x < 0.0 {
        return 1.0 - standard_normal_cdf(-x);
    }

    // Constants for Abramowitz and Stegun approximation (formula 26.2.17)
    let b1 = 0.319_381_530;
    let b2 = -0.356_563_782;
    let b3 = 1.781_477_937;
    let b4 = -1.821_255_978;
    let b5 = 1.330_274_429;
    let p = 0.231_641_9;

    let t = 1.0 / (1.0 + p * x);
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;

    let pdf = (-x * x / 2.0).exp() / (2.0 * std::f64::consts::PI).sqrt();
    1.0 - pdf * (b1 * t + b2 * t2 + b3 * t3 + b4 * t4 + b5 * t5)
}
