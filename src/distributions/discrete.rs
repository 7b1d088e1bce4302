//! Discrete distributions.
//!
//! Mass functions take `x: f64` so that discrete and continuous kinds share
//! one evaluation path; any non-integer or out-of-support `x` has mass 0.
//! Cumulative functions accept any real `x` and evaluate at ⌊x⌋.

use super::{as_count, check_quantile_probability, search_discrete_quantile, Summary};
use crate::error::{ensure_positive, ensure_probability, StatError};
use crate::special;

/// True when `x` is an integer up to floating-point noise in its product.
fn is_whole(x: f64) -> bool {
    (x - x.round()).abs() <= 1e-9 * x.abs().max(1.0)
}

// ============================================================================
// Bernoulli Distribution
// ============================================================================

/// Bernoulli distribution: 1 with probability p, 0 otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bernoulli {
    p: f64,
}

impl Bernoulli {
    /// # Errors
    /// Returns [`StatError::Domain`] if `p ∉ [0, 1]`.
    pub fn new(p: f64) -> Result<Self, StatError> {
        let p = ensure_probability("Bernoulli p", p)?;
        Ok(Self { p })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn support(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    pub fn pmf(&self, x: f64) -> f64 {
        match as_count(x) {
            Some(0) => 1.0 - self.p,
            Some(1) => self.p,
            _ => 0.0,
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else if x < 1.0 {
            1.0 - self.p
        } else {
            1.0
        }
    }

    pub fn quantile(&self, p: f64) -> Result<f64, StatError> {
        check_quantile_probability(p)?;
        Ok(if p <= 1.0 - self.p { 0.0 } else { 1.0 })
    }

    pub fn summary(&self) -> Summary {
        let p = self.p;
        let q = 1.0 - p;
        let variance = p * q;
        let median = if p < 0.5 {
            0.0
        } else if p > 0.5 {
            1.0
        } else {
            0.5
        };
        let mode = if p < 0.5 {
            Some(0.0)
        } else if p > 0.5 {
            Some(1.0)
        } else {
            None
        };
        let (skewness, kurtosis) = if variance > 0.0 {
            (
                Some((1.0 - 2.0 * p) / variance.sqrt()),
                Some((1.0 - 6.0 * variance) / variance),
            )
        } else {
            (None, None)
        };
        Summary::new(p, variance, median, mode, skewness, kurtosis)
    }
}

// ============================================================================
// Binomial Distribution
// ============================================================================

/// Binomial distribution: number of successes in `n` independent trials
/// with success probability `p`.
///
/// The mass function is evaluated in log space,
/// `ln C(n,k) + k·ln p + (n−k)·ln(1−p)`, so it stays finite for `n` in the
/// thousands. `p = 0` and `p = 1` are point masses and never evaluate `ln 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binomial {
    n: u64,
    p: f64,
}

impl Binomial {
    /// # Errors
    /// Returns [`StatError::Domain`] if `p ∉ [0, 1]`.
    ///
    /// # Examples
    /// ```
    /// use u_statlab::distributions::Binomial;
    /// let b = Binomial::new(10, 0.5).unwrap();
    /// assert!((b.pmf(5.0) - 252.0 / 1024.0).abs() < 1e-12);
    /// ```
    pub fn new(n: u64, p: f64) -> Result<Self, StatError> {
        let p = ensure_probability("Binomial p", p)?;
        Ok(Self { n, p })
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn support(&self) -> (f64, f64) {
        (0.0, self.n as f64)
    }

    pub fn pmf(&self, x: f64) -> f64 {
        let Some(k) = as_count(x) else {
            return 0.0;
        };
        if k > self.n {
            return 0.0;
        }
        if self.p == 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if self.p == 1.0 {
            return if k == self.n { 1.0 } else { 0.0 };
        }
        let ln_pmf = special::ln_binomial_coefficient(self.n, k)
            + k as f64 * self.p.ln()
            + (self.n - k) as f64 * (-self.p).ln_1p();
        ln_pmf.exp()
    }

    /// P(X ≤ ⌊x⌋) = I_{1−p}(n − k, k + 1); 0 below the support and 1 at or
    /// above `n`. Constant time in `k`.
    pub fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            return 0.0;
        }
        if x >= self.n as f64 {
            return 1.0;
        }
        let k = x.floor();
        special::regularized_incomplete_beta(1.0 - self.p, self.n as f64 - k, k + 1.0)
            .clamp(0.0, 1.0)
    }

    /// Smallest k with F(k) ≥ p, by bisection over `[0, n]`.
    pub fn quantile(&self, p: f64) -> Result<f64, StatError> {
        check_quantile_probability(p)?;
        Ok(search_discrete_quantile(p, 0, Some(self.n), |k| self.cdf(k as f64)))
    }

    /// Median is the heuristic ⌊np + ½⌋, which may differ from the exact
    /// median by one. When `(n+1)p` is an integer and `0 < p < 1` the
    /// distribution has two modes and `mode` is `None`.
    pub fn summary(&self) -> Summary {
        let n = self.n as f64;
        let p = self.p;
        let q = 1.0 - p;
        let mean = n * p;
        let variance = n * p * q;
        let peak = (n + 1.0) * p;
        let mode = if p > 0.0 && p < 1.0 && is_whole(peak) && peak >= 1.0 {
            None
        } else {
            Some(peak.floor().min(n))
        };
        let (skewness, kurtosis) = if variance > 0.0 {
            (
                Some((1.0 - 2.0 * p) / variance.sqrt()),
                Some((1.0 - 6.0 * p * q) / variance),
            )
        } else {
            (None, None)
        };
        Summary::new(
            mean,
            variance,
            (mean + 0.5).floor(),
            mode,
            skewness,
            kurtosis,
        )
    }
}

// ============================================================================
// Poisson Distribution
// ============================================================================

/// Poisson distribution with rate λ.
///
/// pmf(k) = exp(k·ln λ − λ − ln k!), so large λ and k do not overflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poisson {
    lambda: f64,
}

impl Poisson {
    /// # Errors
    /// Returns [`StatError::Domain`] if `lambda ≤ 0` or not finite.
    pub fn new(lambda: f64) -> Result<Self, StatError> {
        let lambda = ensure_positive("Poisson lambda", lambda)?;
        Ok(Self { lambda })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    pub fn pmf(&self, x: f64) -> f64 {
        match as_count(x) {
            Some(k) => self.mass(k),
            None => 0.0,
        }
    }

    fn mass(&self, k: u64) -> f64 {
        (k as f64 * self.lambda.ln() - self.lambda - special::ln_factorial(k)).exp()
    }

    /// P(X ≤ ⌊x⌋) = Q(⌊x⌋ + 1, λ), the regularized upper incomplete gamma.
    pub fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            return 0.0;
        }
        if x == f64::INFINITY {
            return 1.0;
        }
        special::regularized_upper_gamma(x.floor() + 1.0, self.lambda).clamp(0.0, 1.0)
    }

    /// Smallest k with F(k) ≥ p; `+∞` for `p = 1`.
    pub fn quantile(&self, p: f64) -> Result<f64, StatError> {
        check_quantile_probability(p)?;
        if p == 1.0 {
            return Ok(f64::INFINITY);
        }
        Ok(search_discrete_quantile(p, 0, None, |k| self.cdf(k as f64)))
    }

    /// Median is the heuristic ⌊λ + 1/3 − 0.02/λ⌋, an approximation of the
    /// exact median. An integer λ has two modes, λ − 1 and λ, so `mode` is
    /// `None`.
    pub fn summary(&self) -> Summary {
        let l = self.lambda;
        let mode = if l.fract() == 0.0 { None } else { Some(l.floor()) };
        let median = (l + 1.0 / 3.0 - 0.02 / l).floor().max(0.0);
        Summary::new(
            l,
            l,
            median,
            mode,
            Some(1.0 / l.sqrt()),
            Some(1.0 / l),
        )
    }
}

// ============================================================================
// Geometric Distribution
// ============================================================================

/// Geometric distribution: number of trials up to and including the first
/// success, support `{1, 2, 3, ...}`.
///
/// - PMF: (1−p)^{k−1}·p
/// - CDF: 1 − (1−p)^{⌊x⌋}
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometric {
    p: f64,
}

impl Geometric {
    /// # Errors
    /// Returns [`StatError::Domain`] unless `0 < p < 1`.
    pub fn new(p: f64) -> Result<Self, StatError> {
        if !(p > 0.0 && p < 1.0) {
            return Err(StatError::domain(format!(
                "Geometric p must lie in (0, 1), got {p}"
            )));
        }
        Ok(Self { p })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn support(&self) -> (f64, f64) {
        (1.0, f64::INFINITY)
    }

    pub fn pmf(&self, x: f64) -> f64 {
        match as_count(x) {
            Some(k) if k >= 1 => ((k - 1) as f64 * (-self.p).ln_1p()).exp() * self.p,
            _ => 0.0,
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if x < 1.0 {
            return 0.0;
        }
        -(x.floor() * (-self.p).ln_1p()).exp_m1()
    }

    /// Smallest k ≥ 1 with F(k) ≥ p; `+∞` for `p = 1`.
    pub fn quantile(&self, p: f64) -> Result<f64, StatError> {
        check_quantile_probability(p)?;
        if p == 1.0 {
            return Ok(f64::INFINITY);
        }
        if p == 0.0 {
            return Ok(1.0);
        }
        let mut k = ((-p).ln_1p() / (-self.p).ln_1p()).ceil().max(1.0);
        // Correct the closed form for rounding at exact boundaries.
        while self.cdf(k) < p {
            k += 1.0;
        }
        while k > 1.0 && self.cdf(k - 1.0) >= p {
            k -= 1.0;
        }
        Ok(k)
    }

    pub fn summary(&self) -> Summary {
        let p = self.p;
        let q = 1.0 - p;
        let median = (-1.0 / q.log2()).ceil();
        Summary::new(
            1.0 / p,
            q / (p * p),
            median,
            Some(1.0),
            Some((2.0 - p) / q.sqrt()),
            Some(6.0 + p * p / q),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    // --- Bernoulli ---

    #[test]
    fn test_bernoulli_pmf_cdf() {
        let b = Bernoulli::new(0.3).unwrap();
        assert!((b.pmf(0.0) - 0.7).abs() < 1e-15);
        assert_eq!(b.pmf(1.0), 0.3);
        assert_eq!(b.pmf(0.5), 0.0);
        assert_eq!(b.pmf(2.0), 0.0);
        assert_eq!(b.cdf(-0.1), 0.0);
        assert!((b.cdf(0.5) - 0.7).abs() < 1e-15);
        assert_eq!(b.cdf(1.0), 1.0);
    }

    #[test]
    fn test_bernoulli_summary() {
        let s = Bernoulli::new(0.5).unwrap().summary();
        assert_eq!(s.mode, None);
        assert_eq!(s.median, 0.5);
        assert_eq!(s.skewness, Some(0.0));
        assert_eq!(s.excess_kurtosis, Some(-2.0));

        let degenerate = Bernoulli::new(1.0).unwrap().summary();
        assert_eq!(degenerate.variance, 0.0);
        assert_eq!(degenerate.skewness, None);
        assert_eq!(degenerate.mode, Some(1.0));
    }

    #[test]
    fn test_bernoulli_invalid() {
        assert!(Bernoulli::new(1.1).is_err());
        assert!(Bernoulli::new(-0.1).is_err());
        assert!(Bernoulli::new(f64::NAN).is_err());
    }

    // --- Binomial ---

    #[test]
    fn test_binomial_pmf_known() {
        let b = Binomial::new(10, 0.5).unwrap();
        assert!((b.pmf(5.0) - 252.0 / 1024.0).abs() < 1e-12);
        assert!((b.pmf(0.0) - 1.0 / 1024.0).abs() < 1e-15);
        assert_eq!(b.pmf(11.0), 0.0);
        assert_eq!(b.pmf(2.5), 0.0);
        assert_eq!(b.pmf(-1.0), 0.0);
    }

    #[test]
    fn test_binomial_pmf_sums_to_one() {
        for &(n, p) in &[(0, 0.3), (1, 0.5), (20, 0.1), (100, 0.37), (500, 0.9)] {
            let b = Binomial::new(n, p).unwrap();
            let total: f64 = (0..=n).map(|k| b.pmf(k as f64)).sum();
            assert!((total - 1.0).abs() < 1e-9, "n={n}, p={p}: Σ = {total}");
        }
    }

    #[test]
    fn test_binomial_extreme_p() {
        let zero = Binomial::new(8, 0.0).unwrap();
        assert_eq!(zero.pmf(0.0), 1.0);
        assert_eq!(zero.pmf(3.0), 0.0);
        assert_eq!(zero.cdf(0.0), 1.0);

        let one = Binomial::new(8, 1.0).unwrap();
        assert_eq!(one.pmf(8.0), 1.0);
        assert_eq!(one.pmf(7.0), 0.0);
        assert_eq!(one.cdf(7.0), 0.0);
        assert_eq!(one.cdf(8.0), 1.0);
        assert_eq!(one.summary().skewness, None);
    }

    #[test]
    fn test_binomial_large_n_finite() {
        let b = Binomial::new(2000, 0.5).unwrap();
        let peak = b.pmf(1000.0);
        assert!(peak.is_finite() && peak > 0.0);
        assert!((peak - 0.017839).abs() < 1e-5);
    }

    #[test]
    fn test_binomial_cdf_floor_and_limits() {
        let b = Binomial::new(4, 0.5).unwrap();
        assert_eq!(b.cdf(-0.5), 0.0);
        assert!((b.cdf(1.7) - 5.0 / 16.0).abs() < 1e-12);
        assert_eq!(b.cdf(4.0), 1.0);
        assert_eq!(b.cdf(100.0), 1.0);
    }

    #[test]
    fn test_binomial_cdf_matches_summed_mass() {
        let b = Binomial::new(30, 0.35).unwrap();
        let mut sum = 0.0;
        for k in 0..30 {
            sum += b.pmf(f64::from(k));
            assert!((b.cdf(f64::from(k)) - sum).abs() < 1e-12, "k={k}");
        }
    }

    #[test]
    fn test_binomial_huge_n_is_fast() {
        let b = Binomial::new(400_000_000, 0.5).unwrap();
        let start = Instant::now();
        let at_mean = b.cdf(2e8);
        let median = b.quantile(0.5).unwrap();
        assert!(start.elapsed() < Duration::from_secs(2), "{:?}", start.elapsed());
        assert!((at_mean - 0.5).abs() < 1e-3, "F(np) = {at_mean}");
        assert!((median - 2e8).abs() <= 10.0, "median {median}");
    }

    #[test]
    fn test_binomial_quantile() {
        let b = Binomial::new(4, 0.5).unwrap();
        assert_eq!(b.quantile(0.0).unwrap(), 0.0);
        assert_eq!(b.quantile(0.3).unwrap(), 1.0);
        assert_eq!(b.quantile(0.32).unwrap(), 2.0);
        assert_eq!(b.quantile(0.5).unwrap(), 2.0);
        assert_eq!(b.quantile(1.0).unwrap(), 4.0);
    }

    #[test]
    fn test_binomial_summary() {
        let s = Binomial::new(10, 0.3).unwrap().summary();
        assert!((s.mean - 3.0).abs() < 1e-12);
        assert!((s.variance - 2.1).abs() < 1e-12);
        assert_eq!(s.median, 3.0);
        assert_eq!(s.mode, Some(3.0));
        assert_eq!(Binomial::new(9, 0.5).unwrap().summary().mode, None);
        assert_eq!(Binomial::new(4, 0.2).unwrap().summary().mode, None);
        assert_eq!(Binomial::new(5, 1.0).unwrap().summary().mode, Some(5.0));
        let expected_skew = 0.4 / 2.1_f64.sqrt();
        assert!((s.skewness.unwrap() - expected_skew).abs() < 1e-12);
    }

    // --- Poisson ---

    #[test]
    fn test_poisson_pmf_known() {
        let p = Poisson::new(3.0).unwrap();
        let expected = 27.0 * (-3.0_f64).exp() / 6.0;
        assert!((p.pmf(3.0) - expected).abs() < 1e-12);
        assert!((p.pmf(0.0) - (-3.0_f64).exp()).abs() < 1e-15);
        assert_eq!(p.pmf(1.5), 0.0);
    }

    #[test]
    fn test_poisson_cdf_limits() {
        let p = Poisson::new(4.5).unwrap();
        assert_eq!(p.cdf(-1.0), 0.0);
        assert!((p.cdf(1e6) - 1.0).abs() < 1e-9);
        assert_eq!(p.cdf(f64::INFINITY), 1.0);
        assert!((p.cdf(0.9) - (-4.5_f64).exp()).abs() < 1e-14);
    }

    #[test]
    fn test_poisson_large_lambda() {
        let p = Poisson::new(1000.0).unwrap();
        let at_mean = p.pmf(1000.0);
        assert!(at_mean.is_finite() && at_mean > 0.0);
        assert!((p.cdf(1000.0) - 0.5084).abs() < 1e-3);
    }

    #[test]
    fn test_poisson_quantile() {
        let p = Poisson::new(2.0).unwrap();
        assert_eq!(p.quantile(0.0).unwrap(), 0.0);
        let med = p.quantile(0.5).unwrap();
        assert!(p.cdf(med) >= 0.5);
        assert!(p.cdf(med - 1.0) < 0.5);
        assert_eq!(p.quantile(1.0).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_poisson_summary() {
        let s = Poisson::new(5.0).unwrap().summary();
        assert_eq!(s.mean, 5.0);
        assert_eq!(s.variance, 5.0);
        assert_eq!(s.median, 5.0);
        assert_eq!(s.mode, None);
        assert!((s.excess_kurtosis.unwrap() - 0.2).abs() < 1e-15);
    }

    #[test]
    fn test_poisson_mode_unique_only_for_fractional_lambda() {
        assert_eq!(Poisson::new(3.0).unwrap().summary().mode, None);
        assert_eq!(Poisson::new(3.7).unwrap().summary().mode, Some(3.0));
        assert_eq!(Poisson::new(0.4).unwrap().summary().mode, Some(0.0));
    }

    #[test]
    fn test_poisson_cdf_matches_summed_mass() {
        let p = Poisson::new(7.5).unwrap();
        let mut sum = 0.0;
        for k in 0..40 {
            sum += p.pmf(f64::from(k));
            assert!((p.cdf(f64::from(k)) - sum).abs() < 1e-12, "k={k}");
        }
    }

    #[test]
    fn test_poisson_huge_lambda_is_fast() {
        let p = Poisson::new(1e8).unwrap();
        let start = Instant::now();
        let at_mean = p.cdf(1e8);
        let median = p.quantile(0.5).unwrap();
        assert!(start.elapsed() < Duration::from_secs(2), "{:?}", start.elapsed());
        assert!((at_mean - 0.5).abs() < 1e-3, "F(λ) = {at_mean}");
        assert!((median - 1e8).abs() <= 10.0, "median {median}");
    }

    #[test]
    fn test_poisson_invalid() {
        assert!(Poisson::new(0.0).is_err());
        assert!(Poisson::new(-1.0).is_err());
        assert!(Poisson::new(f64::INFINITY).is_err());
    }

    // --- Geometric ---

    #[test]
    fn test_geometric_pmf_cdf() {
        let g = Geometric::new(0.25).unwrap();
        assert_eq!(g.pmf(0.0), 0.0);
        assert!((g.pmf(1.0) - 0.25).abs() < 1e-15);
        assert!((g.pmf(3.0) - 0.75 * 0.75 * 0.25).abs() < 1e-15);
        assert_eq!(g.cdf(0.5), 0.0);
        assert!((g.cdf(2.0) - (1.0 - 0.75 * 0.75)).abs() < 1e-15);
    }

    #[test]
    fn test_geometric_quantile() {
        let g = Geometric::new(0.5).unwrap();
        assert_eq!(g.quantile(0.0).unwrap(), 1.0);
        assert_eq!(g.quantile(0.5).unwrap(), 1.0);
        assert_eq!(g.quantile(0.75).unwrap(), 2.0);
        assert_eq!(g.quantile(0.76).unwrap(), 3.0);
        assert_eq!(g.quantile(1.0).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_geometric_summary() {
        let s = Geometric::new(0.5).unwrap().summary();
        assert_eq!(s.mean, 2.0);
        assert_eq!(s.variance, 2.0);
        assert_eq!(s.median, 1.0);
        assert_eq!(s.mode, Some(1.0));
    }

    #[test]
    fn test_geometric_invalid() {
        assert!(Geometric::new(0.0).is_err());
        assert!(Geometric::new(1.0).is_err());
        assert!(Geometric::new(f64::NAN).is_err());
    }
}
