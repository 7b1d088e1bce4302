//! Continuous distributions.

use std::f64::consts::{LN_2, SQRT_2};

use super::{bisect_quantile, check_quantile_probability, Summary};
use crate::error::{ensure_finite, ensure_positive, StatError};
use crate::special;

// ============================================================================
// Normal Distribution
// ============================================================================

/// Normal (Gaussian) distribution N(μ, σ²).
///
/// # Mathematical Definition
/// - PDF: exp(−(x−μ)²/(2σ²)) / (σ√(2π))
/// - CDF: ½·(1 + erf((x−μ)/(σ√2)))
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    mean: f64,
    std: f64,
}

impl Normal {
    /// Creates a new normal distribution with mean `mean` and standard
    /// deviation `std`.
    ///
    /// # Errors
    /// Returns [`StatError::Domain`] if `std ≤ 0` or either parameter is
    /// not finite.
    ///
    /// # Examples
    /// ```
    /// use u_statlab::distributions::Normal;
    /// assert!(Normal::new(0.0, 1.0).is_ok());
    /// assert!(Normal::new(0.0, 0.0).is_err());
    /// ```
    pub fn new(mean: f64, std: f64) -> Result<Self, StatError> {
        let mean = ensure_finite("Normal mean", mean)?;
        let std = ensure_positive("Normal std", std)?;
        Ok(Self { mean, std })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std(&self) -> f64 {
        self.std
    }

    pub fn support(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }

    pub fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.std;
        special::standard_normal_pdf(z) / self.std
    }

    /// CDF via the Abramowitz-Stegun erf; exactly `0.5` at the mean.
    pub fn cdf(&self, x: f64) -> f64 {
        if x == f64::INFINITY {
            return 1.0;
        }
        if x == f64::NEG_INFINITY {
            return 0.0;
        }
        let z = (x - self.mean) / (self.std * SQRT_2);
        0.5 * (1.0 + special::erf(z))
    }

    /// Inverse CDF: μ + σ·Φ⁻¹(p).
    pub fn quantile(&self, p: f64) -> Result<f64, StatError> {
        check_quantile_probability(p)?;
        Ok(self.mean + self.std * special::inverse_normal_cdf(p))
    }

    pub fn summary(&self) -> Summary {
        Summary::new(
            self.mean,
            self.std * self.std,
            self.mean,
            Some(self.mean),
            Some(0.0),
            Some(0.0),
        )
    }
}

// ============================================================================
// LogNormal Distribution
// ============================================================================

/// Log-normal distribution: if X ~ LogNormal(μ, σ), then ln(X) ~ N(μ, σ²).
///
/// Reference: Johnson, Kotz & Balakrishnan (1994), *Continuous Univariate
/// Distributions*, Vol. 1, Chapter 14.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormal {
    mu: f64,
    sigma: f64,
}

impl LogNormal {
    /// Creates a new log-normal distribution; `mu` and `sigma` are the mean
    /// and standard deviation of ln(X).
    ///
    /// # Errors
    /// Returns [`StatError::Domain`] if `sigma ≤ 0` or a parameter is not finite.
    pub fn new(mu: f64, sigma: f64) -> Result<Self, StatError> {
        let mu = ensure_finite("LogNormal mu", mu)?;
        let sigma = ensure_positive("LogNormal sigma", sigma)?;
        Ok(Self { mu, sigma })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        let z = (x.ln() - self.mu) / self.sigma;
        special::standard_normal_pdf(z) / (x * self.sigma)
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        let z = (x.ln() - self.mu) / self.sigma;
        special::standard_normal_cdf(z)
    }

    /// Inverse CDF: exp(μ + σ·Φ⁻¹(p)).
    pub fn quantile(&self, p: f64) -> Result<f64, StatError> {
        check_quantile_probability(p)?;
        Ok((self.mu + self.sigma * special::inverse_normal_cdf(p)).exp())
    }

    pub fn summary(&self) -> Summary {
        let s2 = self.sigma * self.sigma;
        let es2 = s2.exp();
        let mean = (self.mu + s2 / 2.0).exp();
        let variance = (es2 - 1.0) * (2.0 * self.mu + s2).exp();
        let skewness = (es2 + 2.0) * (es2 - 1.0).sqrt();
        let kurtosis = (4.0 * s2).exp() + 2.0 * (3.0 * s2).exp() + 3.0 * (2.0 * s2).exp() - 6.0;
        Summary::new(
            mean,
            variance,
            self.mu.exp(),
            Some((self.mu - s2).exp()),
            Some(skewness),
            Some(kurtosis),
        )
    }
}

// ============================================================================
// Uniform Distribution
// ============================================================================

/// Continuous uniform distribution on `[min, max]`.
///
/// - PDF: 1/(max−min) on `[min, max]`, 0 elsewhere
/// - CDF: clamps to 0 below `min` and 1 above `max`, linear in between
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    min: f64,
    max: f64,
}

impl Uniform {
    /// Creates a new uniform distribution on `[min, max]`.
    ///
    /// # Errors
    /// Returns [`StatError::Domain`] if `min >= max` or either bound is not finite.
    pub fn new(min: f64, max: f64) -> Result<Self, StatError> {
        let min = ensure_finite("Uniform min", min)?;
        let max = ensure_finite("Uniform max", max)?;
        if min >= max {
            return Err(StatError::domain(format!(
                "Uniform requires min < max, got min={min}, max={max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn support(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if x >= self.min && x <= self.max {
            1.0 / (self.max - self.min)
        } else {
            0.0
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if x <= self.min {
            0.0
        } else if x >= self.max {
            1.0
        } else {
            (x - self.min) / (self.max - self.min)
        }
    }

    /// Inverse CDF: min + p·(max−min).
    pub fn quantile(&self, p: f64) -> Result<f64, StatError> {
        check_quantile_probability(p)?;
        Ok(self.min + p * (self.max - self.min))
    }

    pub fn summary(&self) -> Summary {
        let range = self.max - self.min;
        let mid = (self.min + self.max) / 2.0;
        Summary::new(mid, range * range / 12.0, mid, None, Some(0.0), Some(-1.2))
    }
}

// ============================================================================
// Triangular Distribution
// ============================================================================

/// Triangular distribution with lower limit `min`, peak `mode` and upper
/// limit `max`.
///
/// Reference: Johnson, Kotz & Balakrishnan (1995), *Continuous Univariate
/// Distributions*, Vol. 2, Chapter 26.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangular {
    min: f64,
    mode: f64,
    max: f64,
}

impl Triangular {
    /// # Errors
    /// Returns [`StatError::Domain`] unless `min ≤ mode ≤ max` and `min < max`.
    pub fn new(min: f64, mode: f64, max: f64) -> Result<Self, StatError> {
        let min = ensure_finite("Triangular min", min)?;
        let mode = ensure_finite("Triangular mode", mode)?;
        let max = ensure_finite("Triangular max", max)?;
        if min > mode || mode > max || min >= max {
            return Err(StatError::domain(format!(
                "Triangular requires min ≤ mode ≤ max and min < max, got {min}, {mode}, {max}"
            )));
        }
        Ok(Self { min, mode, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn mode(&self) -> f64 {
        self.mode
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn support(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// ```text
    /// f(x) = 2(x−a) / ((b−a)(c−a))  for a ≤ x < c
    ///      = 2 / (b−a)               at x = c
    ///      = 2(b−x) / ((b−a)(b−c))  for c < x ≤ b
    /// ```
    pub fn pdf(&self, x: f64) -> f64 {
        let (a, c, b) = (self.min, self.mode, self.max);
        if x < a || x > b {
            0.0
        } else if x < c {
            2.0 * (x - a) / ((b - a) * (c - a))
        } else if x == c {
            2.0 / (b - a)
        } else {
            2.0 * (b - x) / ((b - a) * (b - c))
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        let (a, c, b) = (self.min, self.mode, self.max);
        if x <= a {
            0.0
        } else if x <= c {
            (x - a) * (x - a) / ((b - a) * (c - a))
        } else if x < b {
            1.0 - (b - x) * (b - x) / ((b - a) * (b - c))
        } else {
            1.0
        }
    }

    /// ```text
    /// F⁻¹(p) = a + √(p·(b−a)·(c−a))        if p < F(c)
    ///        = b − √((1−p)·(b−a)·(b−c))    otherwise
    /// ```
    pub fn quantile(&self, p: f64) -> Result<f64, StatError> {
        check_quantile_probability(p)?;
        let (a, c, b) = (self.min, self.mode, self.max);
        let fc = (c - a) / (b - a);
        if p < fc {
            Ok(a + ((b - a) * (c - a) * p).sqrt())
        } else {
            Ok(b - ((b - a) * (b - c) * (1.0 - p)).sqrt())
        }
    }

    pub fn summary(&self) -> Summary {
        let (a, c, b) = (self.min, self.mode, self.max);
        let mean = (a + b + c) / 3.0;
        let q = a * a + b * b + c * c - a * b - a * c - b * c;
        let variance = q / 18.0;
        let median = if c >= (a + b) / 2.0 {
            a + ((b - a) * (c - a) / 2.0).sqrt()
        } else {
            b - ((b - a) * (b - c) / 2.0).sqrt()
        };
        let skewness =
            SQRT_2 * (a + b - 2.0 * c) * (2.0 * a - b - c) * (a - 2.0 * b + c) / (5.0 * q.powf(1.5));
        Summary::new(mean, variance, median, Some(c), Some(skewness), Some(-0.6))
    }
}

// ============================================================================
// Exponential Distribution
// ============================================================================

/// Exponential distribution with rate λ.
///
/// - PDF: λe^{−λx} for x ≥ 0
/// - CDF: 1 − e^{−λx} for x ≥ 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    rate: f64,
}

impl Exponential {
    /// # Errors
    /// Returns [`StatError::Domain`] if `rate ≤ 0` or not finite.
    pub fn new(rate: f64) -> Result<Self, StatError> {
        let rate = ensure_positive("Exponential rate", rate)?;
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            self.rate * (-self.rate * x).exp()
        }
    }

    /// # Examples
    /// ```
    /// use u_statlab::distributions::Exponential;
    /// let e = Exponential::new(2.0).unwrap();
    /// assert!((e.cdf(std::f64::consts::LN_2 / 2.0) - 0.5).abs() < 1e-15);
    /// ```
    pub fn cdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            -(-self.rate * x).exp_m1()
        }
    }

    /// Inverse CDF: −ln(1−p)/λ.
    pub fn quantile(&self, p: f64) -> Result<f64, StatError> {
        check_quantile_probability(p)?;
        Ok(-(-p).ln_1p() / self.rate)
    }

    pub fn summary(&self) -> Summary {
        let mean = 1.0 / self.rate;
        Summary::new(mean, mean * mean, LN_2 / self.rate, Some(0.0), Some(2.0), Some(6.0))
    }
}

// ============================================================================
// Gamma Distribution
// ============================================================================

/// Gamma distribution with shape k and scale θ.
///
/// - PDF: x^{k−1} e^{−x/θ} / (Γ(k) θ^k), evaluated in log space
/// - CDF: P(k, x/θ), the regularized lower incomplete gamma function
///
/// The density at `x = 0` is `+∞` when `k < 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gamma {
    shape: f64,
    scale: f64,
    ln_norm: f64,
}

impl Gamma {
    /// # Errors
    /// Returns [`StatError::Domain`] if `shape` or `scale` is not a finite
    /// positive number.
    pub fn new(shape: f64, scale: f64) -> Result<Self, StatError> {
        let shape = ensure_positive("Gamma shape", shape)?;
        let scale = ensure_positive("Gamma scale", scale)?;
        let ln_norm = special::ln_gamma(shape) + shape * scale.ln();
        Ok(Self {
            shape,
            scale,
            ln_norm,
        })
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 || x == f64::INFINITY {
            return 0.0;
        }
        if x == 0.0 {
            return if self.shape < 1.0 {
                f64::INFINITY
            } else if self.shape == 1.0 {
                1.0 / self.scale
            } else {
                0.0
            };
        }
        ((self.shape - 1.0) * x.ln() - x / self.scale - self.ln_norm).exp()
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        special::regularized_lower_gamma(self.shape, x / self.scale).clamp(0.0, 1.0)
    }

    /// Inverse CDF by bisection on [`Gamma::cdf`].
    pub fn quantile(&self, p: f64) -> Result<f64, StatError> {
        check_quantile_probability(p)?;
        if p == 0.0 {
            return Ok(0.0);
        }
        if p == 1.0 {
            return Ok(f64::INFINITY);
        }
        let mean = self.shape * self.scale;
        let sd = self.shape.sqrt() * self.scale;
        Ok(bisect_quantile(p, 0.0, mean + 4.0 * sd, |x| self.cdf(x)))
    }

    pub fn summary(&self) -> Summary {
        let (k, theta) = (self.shape, self.scale);
        let median = self.quantile(0.5).unwrap_or(k * theta);
        Summary::new(
            k * theta,
            k * theta * theta,
            median,
            Some((k - 1.0).max(0.0) * theta),
            Some(2.0 / k.sqrt()),
            Some(6.0 / k),
        )
    }
}

// ============================================================================
// Beta Distribution
// ============================================================================

/// Beta distribution on `[0, 1]` with shape parameters α and β.
///
/// - PDF: x^{α−1}(1−x)^{β−1} / B(α, β), evaluated in log space
/// - CDF: I_x(α, β), the regularized incomplete beta function
///
/// The density is `+∞` at 0 when `α < 1` and at 1 when `β < 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beta {
    alpha: f64,
    beta: f64,
    ln_norm: f64,
}

impl Beta {
    /// # Errors
    /// Returns [`StatError::Domain`] if `alpha` or `beta` is not a finite
    /// positive number.
    pub fn new(alpha: f64, beta: f64) -> Result<Self, StatError> {
        let alpha = ensure_positive("Beta alpha", alpha)?;
        let beta = ensure_positive("Beta beta", beta)?;
        Ok(Self {
            alpha,
            beta,
            ln_norm: special::ln_beta(alpha, beta),
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn support(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return 0.0;
        }
        if x == 0.0 {
            return boundary_density(self.alpha, self.beta);
        }
        if x == 1.0 {
            return boundary_density(self.beta, self.alpha);
        }
        ((self.alpha - 1.0) * x.ln() + (self.beta - 1.0) * (-x).ln_1p() - self.ln_norm).exp()
    }

    pub fn cdf(&self, x: f64) -> f64 {
        special::regularized_incomplete_beta(x, self.alpha, self.beta).clamp(0.0, 1.0)
    }

    /// Inverse CDF by bisection on [`Beta::cdf`].
    pub fn quantile(&self, p: f64) -> Result<f64, StatError> {
        check_quantile_probability(p)?;
        if p == 0.0 {
            return Ok(0.0);
        }
        if p == 1.0 {
            return Ok(1.0);
        }
        Ok(bisect_quantile(p, 0.0, 1.0, |x| self.cdf(x)))
    }

    pub fn summary(&self) -> Summary {
        let (a, b) = (self.alpha, self.beta);
        let s = a + b;
        let mean = a / s;
        let variance = a * b / (s * s * (s + 1.0));
        let mode = if a > 1.0 && b > 1.0 {
            Some((a - 1.0) / (s - 2.0))
        } else if a <= 1.0 && b > 1.0 || a < 1.0 && b == 1.0 {
            Some(0.0)
        } else if a > 1.0 && b <= 1.0 || a == 1.0 && b < 1.0 {
            Some(1.0)
        } else {
            None
        };
        let skewness = 2.0 * (b - a) * (s + 1.0).sqrt() / ((s + 2.0) * (a * b).sqrt());
        let kurtosis =
            6.0 * ((a - b).powi(2) * (s + 1.0) - a * b * (s + 2.0)) / (a * b * (s + 2.0) * (s + 3.0));
        let median = self.quantile(0.5).unwrap_or(mean);
        Summary::new(mean, variance, median, mode, Some(skewness), Some(kurtosis))
    }
}

/// Beta density at the boundary where the exponent on `x` is `own - 1`.
fn boundary_density(own: f64, other: f64) -> f64 {
    if own < 1.0 {
        f64::INFINITY
    } else if own == 1.0 {
        // 1 / B(1, other) = other
        other
    } else {
        0.0
    }
}

// ============================================================================
// Chi-Squared Distribution
// ============================================================================

/// Chi-squared distribution with k degrees of freedom, i.e. Gamma(k/2, 2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquared {
    k: f64,
    inner: Gamma,
}

impl ChiSquared {
    /// # Errors
    /// Returns [`StatError::Domain`] if `k ≤ 0` or not finite.
    pub fn new(k: f64) -> Result<Self, StatError> {
        let k = ensure_positive("ChiSquared degrees of freedom", k)?;
        let inner = Gamma::new(k / 2.0, 2.0)?;
        Ok(Self { k, inner })
    }

    pub fn degrees_of_freedom(&self) -> f64 {
        self.k
    }

    pub fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    pub fn pdf(&self, x: f64) -> f64 {
        self.inner.pdf(x)
    }

    pub fn cdf(&self, x: f64) -> f64 {
        self.inner.cdf(x)
    }

    pub fn quantile(&self, p: f64) -> Result<f64, StatError> {
        self.inner.quantile(p)
    }

    pub fn summary(&self) -> Summary {
        let k = self.k;
        let median = self.inner.quantile(0.5).unwrap_or(k);
        Summary::new(
            k,
            2.0 * k,
            median,
            Some((k - 2.0).max(0.0)),
            Some((8.0 / k).sqrt()),
            Some(12.0 / k),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_cdf_monotone(cdf: impl Fn(f64) -> f64, lo: f64, hi: f64) {
        let mut prev = cdf(lo);
        for i in 1..=400 {
            let x = lo + (hi - lo) * i as f64 / 400.0;
            let c = cdf(x);
            assert!(c >= prev - 1e-12, "CDF not monotonic at x={x}: {prev} -> {c}");
            assert!((0.0..=1.0).contains(&c), "CDF({x}) = {c} out of [0,1]");
            prev = c;
        }
    }

    // --- Normal ---

    #[test]
    fn test_normal_cdf_at_mean_is_exact() {
        for &(mu, sigma) in &[(0.0, 1.0), (10.0, 2.0), (-3.5, 0.01), (1e6, 1e3)] {
            let n = Normal::new(mu, sigma).unwrap();
            assert_eq!(n.cdf(mu), 0.5);
        }
    }

    #[test]
    fn test_normal_pdf_symmetric() {
        let n = Normal::new(3.0, 1.5).unwrap();
        for &d in &[0.1, 0.7, 1.9, 4.0] {
            assert!((n.pdf(3.0 + d) - n.pdf(3.0 - d)).abs() < 1e-15);
        }
    }

    #[test]
    fn test_normal_pdf_peak() {
        let n = Normal::new(0.0, 2.0).unwrap();
        assert!((n.pdf(0.0) - 0.3989422804014327 / 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_normal_invalid() {
        assert!(matches!(Normal::new(0.0, 0.0), Err(StatError::Domain(_))));
        assert!(matches!(Normal::new(0.0, -1.0), Err(StatError::Domain(_))));
        assert!(Normal::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_normal_quantile() {
        let n = Normal::new(100.0, 15.0).unwrap();
        assert!((n.quantile(0.5).unwrap() - 100.0).abs() < 1e-4);
        assert!((n.quantile(0.975).unwrap() - (100.0 + 15.0 * 1.959964)).abs() < 1e-3);
        assert_eq!(n.quantile(0.0).unwrap(), f64::NEG_INFINITY);
        assert!(n.quantile(1.2).is_err());
    }

    #[test]
    fn test_normal_cdf_limits() {
        let n = Normal::new(2.0, 3.0).unwrap();
        assert_eq!(n.cdf(f64::NEG_INFINITY), 0.0);
        assert_eq!(n.cdf(f64::INFINITY), 1.0);
        assert!(n.cdf(2.0 - 40.0) < 1e-6);
        assert!((n.cdf(2.0 + 40.0) - 1.0).abs() < 1e-6);
    }

    // --- LogNormal ---

    #[test]
    fn test_lognormal_median_and_mean() {
        let ln = LogNormal::new(0.0, 1.0).unwrap();
        let s = ln.summary();
        assert!((s.mean - 0.5_f64.exp()).abs() < 1e-12);
        assert_eq!(s.median, 1.0);
        assert_eq!(ln.cdf(1.0), 0.5);
        assert_eq!(ln.cdf(0.0), 0.0);
        assert_eq!(ln.pdf(-1.0), 0.0);
    }

    // --- Uniform ---

    #[test]
    fn test_uniform_pdf_cdf() {
        let u = Uniform::new(0.0, 5.0).unwrap();
        assert!((u.pdf(2.5) - 0.2).abs() < 1e-15);
        assert_eq!(u.pdf(-1.0), 0.0);
        assert_eq!(u.cdf(-1.0), 0.0);
        assert_eq!(u.cdf(2.5), 0.5);
        assert_eq!(u.cdf(6.0), 1.0);
    }

    #[test]
    fn test_uniform_summary() {
        let s = Uniform::new(0.0, 10.0).unwrap().summary();
        assert_eq!(s.mean, 5.0);
        assert!((s.variance - 100.0 / 12.0).abs() < 1e-12);
        assert_eq!(s.mode, None);
        assert_eq!(s.excess_kurtosis, Some(-1.2));
    }

    #[test]
    fn test_uniform_invalid() {
        assert!(Uniform::new(5.0, 5.0).is_err());
        assert!(Uniform::new(5.0, 3.0).is_err());
        assert!(Uniform::new(f64::NAN, 5.0).is_err());
    }

    // --- Triangular ---

    #[test]
    fn test_triangular_cdf_and_quantile() {
        let t = Triangular::new(0.0, 5.0, 10.0).unwrap();
        assert_eq!(t.cdf(0.0), 0.0);
        assert_eq!(t.cdf(5.0), 0.5);
        assert_eq!(t.cdf(10.0), 1.0);
        assert!((t.quantile(0.5).unwrap() - 5.0).abs() < 1e-12);
        assert!((t.pdf(5.0) - 0.2).abs() < 1e-15);
    }

    #[test]
    fn test_triangular_mode_at_boundary() {
        let t = Triangular::new(0.0, 0.0, 2.0).unwrap();
        assert!((t.pdf(0.0) - 1.0).abs() < 1e-15);
        assert!((t.pdf(1.0) - 0.5).abs() < 1e-15);
        assert_cdf_monotone(|x| t.cdf(x), -1.0, 3.0);
    }

    #[test]
    fn test_triangular_symmetric_summary() {
        let s = Triangular::new(0.0, 5.0, 10.0).unwrap().summary();
        assert!((s.mean - 5.0).abs() < 1e-12);
        assert!((s.median - 5.0).abs() < 1e-12);
        assert!(s.skewness.unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_triangular_invalid() {
        assert!(Triangular::new(5.0, 3.0, 10.0).is_err());
        assert!(Triangular::new(0.0, 11.0, 10.0).is_err());
        assert!(Triangular::new(5.0, 5.0, 5.0).is_err());
    }

    // --- Exponential ---

    #[test]
    fn test_exponential_median_property() {
        let e = Exponential::new(2.0).unwrap();
        assert!((e.cdf(LN_2 / 2.0) - 0.5).abs() < 1e-15);
        assert!((e.summary().median - LN_2 / 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_exponential_pdf_cdf() {
        let e = Exponential::new(0.5).unwrap();
        assert_eq!(e.pdf(-1.0), 0.0);
        assert_eq!(e.cdf(-1.0), 0.0);
        assert_eq!(e.pdf(0.0), 0.5);
        assert!((e.cdf(2.0) - (1.0 - (-1.0_f64).exp())).abs() < 1e-15);
        let q = e.quantile(0.9).unwrap();
        assert!((e.cdf(q) - 0.9).abs() < 1e-14);
    }

    #[test]
    fn test_exponential_invalid() {
        assert!(Exponential::new(0.0).is_err());
        assert!(Exponential::new(-2.0).is_err());
    }

    // --- Gamma ---

    #[test]
    fn test_gamma_shape_one_is_exponential() {
        let g = Gamma::new(1.0, 2.0).unwrap();
        let e = Exponential::new(0.5).unwrap();
        for &x in &[0.0, 0.3, 1.0, 4.0, 10.0] {
            assert!((g.pdf(x) - e.pdf(x)).abs() < 1e-12, "pdf at {x}");
            assert!((g.cdf(x) - e.cdf(x)).abs() < 1e-10, "cdf at {x}");
        }
    }

    #[test]
    fn test_gamma_pdf_integer_shape() {
        // Gamma(3, 1): x² e^{-x} / 2
        let g = Gamma::new(3.0, 1.0).unwrap();
        let x = 2.0_f64;
        assert!((g.pdf(x) - x * x * (-x).exp() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_gamma_boundary_density() {
        assert_eq!(Gamma::new(0.5, 1.0).unwrap().pdf(0.0), f64::INFINITY);
        assert_eq!(Gamma::new(2.0, 1.0).unwrap().pdf(0.0), 0.0);
        assert_eq!(Gamma::new(2.0, 1.0).unwrap().pdf(-1.0), 0.0);
    }

    #[test]
    fn test_gamma_quantile_roundtrip() {
        let g = Gamma::new(2.5, 1.5).unwrap();
        for &p in &[0.01, 0.25, 0.5, 0.75, 0.99] {
            let x = g.quantile(p).unwrap();
            assert!((g.cdf(x) - p).abs() < 1e-9, "p={p}, x={x}");
        }
    }

    #[test]
    fn test_gamma_summary() {
        let s = Gamma::new(4.0, 0.5).unwrap().summary();
        assert!((s.mean - 2.0).abs() < 1e-15);
        assert!((s.variance - 1.0).abs() < 1e-15);
        assert_eq!(s.mode, Some(1.5));
        assert_eq!(s.skewness, Some(1.0));
        assert_eq!(s.excess_kurtosis, Some(1.5));
        // Median lies between mode and mean for right-skewed gamma.
        assert!(s.median > 1.5 && s.median < 2.0);
    }

    // --- Beta ---

    #[test]
    fn test_beta_uniform_case() {
        let b = Beta::new(1.0, 1.0).unwrap();
        for &x in &[0.0, 0.2, 0.5, 0.9, 1.0] {
            assert!((b.pdf(x) - 1.0).abs() < 1e-12, "pdf at {x}");
        }
        assert!((b.cdf(0.3) - 0.3).abs() < 1e-12);
        assert_eq!(b.summary().mode, None);
    }

    #[test]
    fn test_beta_pdf_known() {
        // Beta(2, 3): 12 x (1-x)²
        let b = Beta::new(2.0, 3.0).unwrap();
        let x = 0.4_f64;
        assert!((b.pdf(x) - 12.0 * x * (1.0 - x).powi(2)).abs() < 1e-10);
        assert_eq!(b.pdf(1.5), 0.0);
    }

    #[test]
    fn test_beta_symmetric_summary() {
        let s = Beta::new(3.0, 3.0).unwrap().summary();
        assert!((s.mean - 0.5).abs() < 1e-15);
        assert!((s.median - 0.5).abs() < 1e-8);
        assert_eq!(s.mode, Some(0.5));
        assert!(s.skewness.unwrap().abs() < 1e-15);
    }

    #[test]
    fn test_beta_boundary_modes() {
        assert_eq!(Beta::new(0.5, 2.0).unwrap().summary().mode, Some(0.0));
        assert_eq!(Beta::new(2.0, 1.0).unwrap().summary().mode, Some(1.0));
        assert_eq!(Beta::new(0.5, 0.5).unwrap().summary().mode, None);
        assert_eq!(Beta::new(0.5, 2.0).unwrap().pdf(0.0), f64::INFINITY);
        assert_eq!(Beta::new(1.0, 3.0).unwrap().pdf(0.0), 3.0);
    }

    // --- ChiSquared ---

    #[test]
    fn test_chi_squared_two_df_is_exponential() {
        let c = ChiSquared::new(2.0).unwrap();
        for &x in &[0.5, 1.0, 5.0] {
            assert!((c.cdf(x) - (1.0 - (-x / 2.0).exp())).abs() < 1e-10);
        }
    }

    #[test]
    fn test_chi_squared_critical_value() {
        let c = ChiSquared::new(1.0).unwrap();
        assert!((c.cdf(3.841458820694124) - 0.95).abs() < 1e-8);
        assert!((c.quantile(0.95).unwrap() - 3.841458820694124).abs() < 1e-6);
    }

    #[test]
    fn test_cdf_monotone_all_continuous() {
        let n = Normal::new(0.0, 1.0).unwrap();
        assert_cdf_monotone(|x| n.cdf(x), -8.0, 8.0);
        let l = LogNormal::new(0.5, 0.8).unwrap();
        assert_cdf_monotone(|x| l.cdf(x), -1.0, 30.0);
        let g = Gamma::new(0.7, 3.0).unwrap();
        assert_cdf_monotone(|x| g.cdf(x), -1.0, 40.0);
        let b = Beta::new(0.6, 2.5).unwrap();
        assert_cdf_monotone(|x| b.cdf(x), -0.1, 1.1);
        let c = ChiSquared::new(5.0).unwrap();
        assert_cdf_monotone(|x| c.cdf(x), 0.0, 40.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn normal_cdf_at_mean_is_half(mu in -1e3_f64..1e3, sigma in 1e-3_f64..1e3) {
            let n = Normal::new(mu, sigma).unwrap();
            prop_assert_eq!(n.cdf(mu), 0.5);
        }

        #[test]
        fn uniform_quantile_roundtrip(
            min in -100.0_f64..0.0,
            max in 1.0_f64..100.0,
            p in 0.0_f64..=1.0,
        ) {
            let u = Uniform::new(min, max).unwrap();
            let x = u.quantile(p).unwrap();
            prop_assert!((u.cdf(x) - p).abs() < 1e-12);
        }

        #[test]
        fn triangular_quantile_roundtrip(
            min in -50.0_f64..0.0,
            mode_frac in 0.01_f64..0.99,
            range in 1.0_f64..50.0,
            p in 0.001_f64..0.999,
        ) {
            let max = min + range;
            let mode = min + mode_frac * range;
            let t = Triangular::new(min, mode, max).unwrap();
            let x = t.quantile(p).unwrap();
            prop_assert!((t.cdf(x) - p).abs() < 1e-8, "p={p} -> x={x}");
        }

        #[test]
        fn gamma_cdf_in_unit_interval(shape in 0.2_f64..20.0, scale in 0.1_f64..10.0, x in 0.0_f64..200.0) {
            let g = Gamma::new(shape, scale).unwrap();
            let c = g.cdf(x);
            prop_assert!((0.0..=1.0).contains(&c));
        }

        #[test]
        fn beta_quantile_roundtrip(a in 0.5_f64..10.0, b in 0.5_f64..10.0, p in 0.01_f64..0.99) {
            let beta = Beta::new(a, b).unwrap();
            let x = beta.quantile(p).unwrap();
            prop_assert!((beta.cdf(x) - p).abs() < 1e-8, "p={p} -> x={x}");
        }
    }
}
