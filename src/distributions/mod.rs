//! Probability distributions.
//!
//! One validated parameter struct per distribution kind, each exposing
//! density/mass, CDF, quantile and closed-form summary statistics.
//! Construction is the only place parameters are checked: a value of any
//! of these types is always inside its parameter domain, so evaluation
//! never produces NaN from bad parameters.
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Mean | Variance |
//! |---|---|---|---|
//! | [`Normal`] | μ, σ | μ | σ² |
//! | [`LogNormal`] | μ, σ | exp(μ+σ²/2) | (exp(σ²)−1)·exp(2μ+σ²) |
//! | [`Uniform`] | a, b | (a+b)/2 | (b−a)²/12 |
//! | [`Triangular`] | a, c, b | (a+b+c)/3 | (a²+b²+c²−ab−ac−bc)/18 |
//! | [`Exponential`] | λ | 1/λ | 1/λ² |
//! | [`Gamma`] | k, θ | kθ | kθ² |
//! | [`Beta`] | α, β | α/(α+β) | αβ/((α+β)²(α+β+1)) |
//! | [`ChiSquared`] | k | k | 2k |
//! | [`Bernoulli`] | p | p | p(1−p) |
//! | [`Binomial`] | n, p | np | np(1−p) |
//! | [`Poisson`] | λ | λ | λ |
//! | [`Geometric`] | p | 1/p | (1−p)/p² |
//!
//! The tagged union over all kinds lives in [`crate::descriptor`].

mod continuous;
mod discrete;

pub use continuous::{Beta, ChiSquared, Exponential, Gamma, LogNormal, Normal, Triangular, Uniform};
pub use discrete::{Bernoulli, Binomial, Geometric, Poisson};

use serde::Serialize;

use crate::error::StatError;

/// Closed-form summary statistics of a distribution.
///
/// `mode` is `None` when the distribution has no unique mode;
/// `skewness` and `excess_kurtosis` are `None` when the variance is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    /// Exact for continuous kinds; heuristic for Poisson and Binomial.
    pub median: f64,
    pub mode: Option<f64>,
    pub skewness: Option<f64>,
    pub excess_kurtosis: Option<f64>,
}

impl Summary {
    pub(crate) fn new(
        mean: f64,
        variance: f64,
        median: f64,
        mode: Option<f64>,
        skewness: Option<f64>,
        excess_kurtosis: Option<f64>,
    ) -> Self {
        Self {
            mean,
            variance,
            std_dev: variance.sqrt(),
            median,
            mode,
            skewness,
            excess_kurtosis,
        }
    }
}

/// Rejects probabilities outside `[0, 1]` for quantile evaluation.
pub(crate) fn check_quantile_probability(p: f64) -> Result<(), StatError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(StatError::domain(format!(
            "quantile probability must lie in [0, 1], got {p}"
        )))
    }
}

/// Inverts a continuous, non-decreasing `cdf` by bisection.
///
/// `lo` must satisfy `cdf(lo) ≤ p`; `hi` is doubled away from `lo` until
/// `cdf(hi) ≥ p`.
pub(crate) fn bisect_quantile(p: f64, lo: f64, hi: f64, cdf: impl Fn(f64) -> f64) -> f64 {
    const MAX_ITER: usize = 200;

    let mut lo = lo;
    let mut hi = hi;
    let mut step = (hi - lo).max(1.0);
    while cdf(hi) < p {
        lo = hi;
        step *= 2.0;
        hi += step;
        if !hi.is_finite() {
            return f64::INFINITY;
        }
    }

    for _ in 0..MAX_ITER {
        let mid = 0.5 * (lo + hi);
        if hi - lo <= 1e-14 * mid.abs().max(1.0) {
            break;
        }
        if cdf(mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Smallest integer `k ≥ first` with `cdf(k) ≥ p`.
///
/// Gallops upward by doubling steps until the target is bracketed (or up
/// to `last`), then bisects, so the cost is logarithmic in `k`. Returns
/// `+∞` if no bracket exists below 2⁵³.
pub(crate) fn search_discrete_quantile(
    p: f64,
    first: u64,
    last: Option<u64>,
    cdf: impl Fn(u64) -> f64,
) -> f64 {
    const LIMIT: u64 = 1 << 53;

    if cdf(first) >= p {
        return first as f64;
    }
    let mut lo = first;
    let mut hi = match last {
        Some(last) => last,
        None => {
            let mut step: u64 = 1;
            let mut hi = first + 1;
            while cdf(hi) < p {
                lo = hi;
                step = step.saturating_mul(2);
                hi = match hi.checked_add(step) {
                    Some(next) if next < LIMIT => next,
                    _ => return f64::INFINITY,
                };
            }
            hi
        }
    };
    // cdf(lo) < p ≤ cdf(hi)
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if cdf(mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    hi as f64
}

/// Returns `Some(k)` when `x` is an integer within `[0, u64::MAX]`.
pub(crate) fn as_count(x: f64) -> Option<u64> {
    if x >= 0.0 && x.fract() == 0.0 && x <= u64::MAX as f64 {
        Some(x as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_std_dev_from_variance() {
        let s = Summary::new(1.0, 4.0, 1.0, Some(1.0), Some(0.0), Some(0.0));
        assert_eq!(s.std_dev, 2.0);
    }

    #[test]
    fn test_bisect_quantile_expands_upper_bound() {
        // Exponential(1) CDF, median ln 2.
        let q = bisect_quantile(0.5, 0.0, 0.1, |x| 1.0 - (-x).exp());
        assert!((q - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn test_check_quantile_probability() {
        assert!(check_quantile_probability(0.0).is_ok());
        assert!(check_quantile_probability(1.0).is_ok());
        assert!(check_quantile_probability(1.5).is_err());
        assert!(check_quantile_probability(f64::NAN).is_err());
    }

    #[test]
    fn test_as_count() {
        assert_eq!(as_count(3.0), Some(3));
        assert_eq!(as_count(0.0), Some(0));
        assert_eq!(as_count(2.5), None);
        assert_eq!(as_count(-1.0), None);
        assert_eq!(as_count(f64::NAN), None);
    }
}
