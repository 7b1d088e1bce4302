//! Distribution descriptor: one tagged value over every supported kind.
//!
//! [`Distribution`] wraps a validated parameter struct from
//! [`crate::distributions`] and dispatches density, cumulative, quantile,
//! summary, curve, probability-query, sampling and histogram operations to
//! it. [`DistributionConfig`] is its serializable form:
//!
//! ```json
//! { "distribution": "binomial", "parameters": { "n": 20, "p": 0.3 } }
//! ```
//!
//! Deserializing a [`Distribution`] goes through [`DistributionConfig`] and
//! validates the parameters, so an out-of-domain configuration is rejected
//! at the boundary.
//!
//! # Examples
//! ```
//! use u_statlab::descriptor::{Distribution, DistributionConfig, ProbabilityQuery};
//!
//! let d = DistributionConfig::Normal { mean: 0.0, std: 1.0 }.build().unwrap();
//! let p = d.probability(&ProbabilityQuery::Between(-1.96, 1.96)).unwrap();
//! assert!((p - 0.95).abs() < 1e-3);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::distributions::{
    as_count, Bernoulli, Beta, Binomial, ChiSquared, Exponential, Gamma, Geometric, LogNormal,
    Normal, Poisson, Summary, Triangular, Uniform,
};
use crate::error::StatError;
use crate::histogram::{self, Histogram, HistogramOptions, Normalization, MAX_DISCRETE_BINS};
use crate::sampling;

// ============================================================================
// Distribution Kind
// ============================================================================

/// Name of a supported distribution family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionKind {
    Normal,
    LogNormal,
    Uniform,
    Triangular,
    Exponential,
    Gamma,
    Beta,
    ChiSquared,
    Bernoulli,
    Binomial,
    Poisson,
    Geometric,
}

impl DistributionKind {
    /// Every kind, continuous first.
    pub const ALL: [DistributionKind; 12] = [
        DistributionKind::Normal,
        DistributionKind::LogNormal,
        DistributionKind::Uniform,
        DistributionKind::Triangular,
        DistributionKind::Exponential,
        DistributionKind::Gamma,
        DistributionKind::Beta,
        DistributionKind::ChiSquared,
        DistributionKind::Bernoulli,
        DistributionKind::Binomial,
        DistributionKind::Poisson,
        DistributionKind::Geometric,
    ];

    /// The snake_case name used in serialized configurations.
    pub fn name(self) -> &'static str {
        match self {
            DistributionKind::Normal => "normal",
            DistributionKind::LogNormal => "log_normal",
            DistributionKind::Uniform => "uniform",
            DistributionKind::Triangular => "triangular",
            DistributionKind::Exponential => "exponential",
            DistributionKind::Gamma => "gamma",
            DistributionKind::Beta => "beta",
            DistributionKind::ChiSquared => "chi_squared",
            DistributionKind::Bernoulli => "bernoulli",
            DistributionKind::Binomial => "binomial",
            DistributionKind::Poisson => "poisson",
            DistributionKind::Geometric => "geometric",
        }
    }

    pub fn is_discrete(self) -> bool {
        matches!(
            self,
            DistributionKind::Bernoulli
                | DistributionKind::Binomial
                | DistributionKind::Poisson
                | DistributionKind::Geometric
        )
    }

    /// Parameter names expected by [`DistributionConfig::from_parameters`].
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            DistributionKind::Normal => &["mean", "std"],
            DistributionKind::LogNormal => &["mu", "sigma"],
            DistributionKind::Uniform => &["min", "max"],
            DistributionKind::Triangular => &["min", "mode", "max"],
            DistributionKind::Exponential => &["rate"],
            DistributionKind::Gamma => &["shape", "scale"],
            DistributionKind::Beta => &["alpha", "beta"],
            DistributionKind::ChiSquared => &["k"],
            DistributionKind::Bernoulli => &["p"],
            DistributionKind::Binomial => &["n", "p"],
            DistributionKind::Poisson => &["lambda"],
            DistributionKind::Geometric => &["p"],
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistributionKind {
    type Err = StatError;

    /// Parses a kind name, ignoring case, `_`, `-` and spaces
    /// (`"ChiSquared"`, `"chi-squared"` and `"chi_squared"` all match).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        DistributionKind::ALL
            .into_iter()
            .find(|kind| kind.name().replace('_', "") == key)
            .ok_or_else(|| StatError::domain(format!("unknown distribution kind `{s}`")))
    }
}

// ============================================================================
// Distribution Config
// ============================================================================

/// Serializable distribution kind plus parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "distribution", content = "parameters", rename_all = "snake_case")]
pub enum DistributionConfig {
    Normal { mean: f64, std: f64 },
    LogNormal { mu: f64, sigma: f64 },
    Uniform { min: f64, max: f64 },
    Triangular { min: f64, mode: f64, max: f64 },
    Exponential { rate: f64 },
    Gamma { shape: f64, scale: f64 },
    Beta { alpha: f64, beta: f64 },
    ChiSquared { k: f64 },
    Bernoulli { p: f64 },
    Binomial { n: u64, p: f64 },
    Poisson { lambda: f64 },
    Geometric { p: f64 },
}

impl DistributionConfig {
    pub fn kind(&self) -> DistributionKind {
        match self {
            DistributionConfig::Normal { .. } => DistributionKind::Normal,
            DistributionConfig::LogNormal { .. } => DistributionKind::LogNormal,
            DistributionConfig::Uniform { .. } => DistributionKind::Uniform,
            DistributionConfig::Triangular { .. } => DistributionKind::Triangular,
            DistributionConfig::Exponential { .. } => DistributionKind::Exponential,
            DistributionConfig::Gamma { .. } => DistributionKind::Gamma,
            DistributionConfig::Beta { .. } => DistributionKind::Beta,
            DistributionConfig::ChiSquared { .. } => DistributionKind::ChiSquared,
            DistributionConfig::Bernoulli { .. } => DistributionKind::Bernoulli,
            DistributionConfig::Binomial { .. } => DistributionKind::Binomial,
            DistributionConfig::Poisson { .. } => DistributionKind::Poisson,
            DistributionConfig::Geometric { .. } => DistributionKind::Geometric,
        }
    }

    /// Builds a configuration from a kind and a loose `name → value` map.
    ///
    /// Extra entries are ignored. `n` must be a non-negative integer.
    ///
    /// # Errors
    /// [`StatError::Domain`] if a required parameter is missing or `n` is
    /// not a non-negative integer. Parameter domains are checked by
    /// [`DistributionConfig::build`].
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeMap;
    /// use u_statlab::descriptor::{DistributionConfig, DistributionKind};
    ///
    /// let params = BTreeMap::from([("n".to_string(), 10.0), ("p".to_string(), 0.5)]);
    /// let config = DistributionConfig::from_parameters(DistributionKind::Binomial, &params).unwrap();
    /// assert_eq!(config, DistributionConfig::Binomial { n: 10, p: 0.5 });
    /// ```
    pub fn from_parameters(
        kind: DistributionKind,
        params: &BTreeMap<String, f64>,
    ) -> Result<Self, StatError> {
        let get = |name: &str| -> Result<f64, StatError> {
            params.get(name).copied().ok_or_else(|| {
                StatError::domain(format!("missing parameter `{name}` for {kind}"))
            })
        };

        Ok(match kind {
            DistributionKind::Normal => DistributionConfig::Normal {
                mean: get("mean")?,
                std: get("std")?,
            },
            DistributionKind::LogNormal => DistributionConfig::LogNormal {
                mu: get("mu")?,
                sigma: get("sigma")?,
            },
            DistributionKind::Uniform => DistributionConfig::Uniform {
                min: get("min")?,
                max: get("max")?,
            },
            DistributionKind::Triangular => DistributionConfig::Triangular {
                min: get("min")?,
                mode: get("mode")?,
                max: get("max")?,
            },
            DistributionKind::Exponential => DistributionConfig::Exponential { rate: get("rate")? },
            DistributionKind::Gamma => DistributionConfig::Gamma {
                shape: get("shape")?,
                scale: get("scale")?,
            },
            DistributionKind::Beta => DistributionConfig::Beta {
                alpha: get("alpha")?,
                beta: get("beta")?,
            },
            DistributionKind::ChiSquared => DistributionConfig::ChiSquared { k: get("k")? },
            DistributionKind::Bernoulli => DistributionConfig::Bernoulli { p: get("p")? },
            DistributionKind::Binomial => {
                let raw_n = get("n")?;
                let n = as_count(raw_n).ok_or_else(|| {
                    StatError::domain(format!(
                        "Binomial n must be a non-negative integer, got {raw_n}"
                    ))
                })?;
                DistributionConfig::Binomial { n, p: get("p")? }
            }
            DistributionKind::Poisson => DistributionConfig::Poisson {
                lambda: get("lambda")?,
            },
            DistributionKind::Geometric => DistributionConfig::Geometric { p: get("p")? },
        })
    }

    /// Validates the parameters and builds the distribution.
    ///
    /// # Errors
    /// [`StatError::Domain`] if any parameter lies outside its domain.
    pub fn build(&self) -> Result<Distribution, StatError> {
        Ok(match *self {
            DistributionConfig::Normal { mean, std } => Distribution::Normal(Normal::new(mean, std)?),
            DistributionConfig::LogNormal { mu, sigma } => {
                Distribution::LogNormal(LogNormal::new(mu, sigma)?)
            }
            DistributionConfig::Uniform { min, max } => Distribution::Uniform(Uniform::new(min, max)?),
            DistributionConfig::Triangular { min, mode, max } => {
                Distribution::Triangular(Triangular::new(min, mode, max)?)
            }
            DistributionConfig::Exponential { rate } => {
                Distribution::Exponential(Exponential::new(rate)?)
            }
            DistributionConfig::Gamma { shape, scale } => {
                Distribution::Gamma(Gamma::new(shape, scale)?)
            }
            DistributionConfig::Beta { alpha, beta } => Distribution::Beta(Beta::new(alpha, beta)?),
            DistributionConfig::ChiSquared { k } => Distribution::ChiSquared(ChiSquared::new(k)?),
            DistributionConfig::Bernoulli { p } => Distribution::Bernoulli(Bernoulli::new(p)?),
            DistributionConfig::Binomial { n, p } => Distribution::Binomial(Binomial::new(n, p)?),
            DistributionConfig::Poisson { lambda } => Distribution::Poisson(Poisson::new(lambda)?),
            DistributionConfig::Geometric { p } => Distribution::Geometric(Geometric::new(p)?),
        })
    }
}

// ============================================================================
// Probability Query
// ============================================================================

/// A probability question about a single random variable X.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "query_type", content = "bounds", rename_all = "snake_case")]
pub enum ProbabilityQuery {
    /// P(X ≤ x).
    LessThan(f64),
    /// P(X > x).
    GreaterThan(f64),
    /// P(a ≤ X ≤ b).
    Between(f64, f64),
    /// P(X = x): the mass for discrete kinds, 0 for continuous ones.
    Exactly(f64),
}

impl ProbabilityQuery {
    fn validate(&self) -> Result<(), StatError> {
        let (lower, upper) = match *self {
            ProbabilityQuery::LessThan(x)
            | ProbabilityQuery::GreaterThan(x)
            | ProbabilityQuery::Exactly(x) => (x, x),
            ProbabilityQuery::Between(a, b) => (a, b),
        };
        if let Some(x) = [lower, upper].into_iter().find(|x| !x.is_finite()) {
            return Err(StatError::domain(format!(
                "query bound must be finite, got {x}"
            )));
        }
        if lower > upper {
            return Err(StatError::domain(format!(
                "query lower bound {lower} exceeds upper bound {upper}"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ProbabilityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbabilityQuery::LessThan(x) => write!(f, "P(X ≤ {x})"),
            ProbabilityQuery::GreaterThan(x) => write!(f, "P(X > {x})"),
            ProbabilityQuery::Between(a, b) => write!(f, "P({a} ≤ X ≤ {b})"),
            ProbabilityQuery::Exactly(x) => write!(f, "P(X = {x})"),
        }
    }
}

// ============================================================================
// Curve
// ============================================================================

/// Density (or mass) and cumulative values over a grid of points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    pub x_values: Vec<f64>,
    pub pdf_values: Vec<f64>,
    pub cdf_values: Vec<f64>,
}

impl Curve {
    pub fn len(&self) -> usize {
        self.x_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_values.is_empty()
    }
}

// ============================================================================
// Distribution
// ============================================================================

/// A validated distribution of any supported kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "DistributionConfig", try_from = "DistributionConfig")]
pub enum Distribution {
    Normal(Normal),
    LogNormal(LogNormal),
    Uniform(Uniform),
    Triangular(Triangular),
    Exponential(Exponential),
    Gamma(Gamma),
    Beta(Beta),
    ChiSquared(ChiSquared),
    Bernoulli(Bernoulli),
    Binomial(Binomial),
    Poisson(Poisson),
    Geometric(Geometric),
}

/// Applies the same expression to whichever parameter struct is inside.
macro_rules! dispatch {
    ($value:expr, $d:ident => $body:expr) => {
        match $value {
            Distribution::Normal($d) => $body,
            Distribution::LogNormal($d) => $body,
            Distribution::Uniform($d) => $body,
            Distribution::Triangular($d) => $body,
            Distribution::Exponential($d) => $body,
            Distribution::Gamma($d) => $body,
            Distribution::Beta($d) => $body,
            Distribution::ChiSquared($d) => $body,
            Distribution::Bernoulli($d) => $body,
            Distribution::Binomial($d) => $body,
            Distribution::Poisson($d) => $body,
            Distribution::Geometric($d) => $body,
        }
    };
}

impl Distribution {
    /// Builds a distribution from a kind and a loose parameter map.
    ///
    /// # Errors
    /// [`StatError::Domain`] for missing or out-of-domain parameters.
    pub fn from_parameters(
        kind: DistributionKind,
        params: &BTreeMap<String, f64>,
    ) -> Result<Self, StatError> {
        DistributionConfig::from_parameters(kind, params)?.build()
    }

    pub fn kind(&self) -> DistributionKind {
        self.config().kind()
    }

    pub fn config(&self) -> DistributionConfig {
        DistributionConfig::from(*self)
    }

    pub fn is_discrete(&self) -> bool {
        self.kind().is_discrete()
    }

    /// Density at `x` for continuous kinds, mass at `x` for discrete kinds.
    pub fn pdf(&self, x: f64) -> f64 {
        match self {
            Distribution::Normal(d) => d.pdf(x),
            Distribution::LogNormal(d) => d.pdf(x),
            Distribution::Uniform(d) => d.pdf(x),
            Distribution::Triangular(d) => d.pdf(x),
            Distribution::Exponential(d) => d.pdf(x),
            Distribution::Gamma(d) => d.pdf(x),
            Distribution::Beta(d) => d.pdf(x),
            Distribution::ChiSquared(d) => d.pdf(x),
            Distribution::Bernoulli(d) => d.pmf(x),
            Distribution::Binomial(d) => d.pmf(x),
            Distribution::Poisson(d) => d.pmf(x),
            Distribution::Geometric(d) => d.pmf(x),
        }
    }

    /// P(X ≤ x).
    pub fn cdf(&self, x: f64) -> f64 {
        dispatch!(self, d => d.cdf(x))
    }

    /// Inverse CDF; the smallest support point with F(k) ≥ p for discrete kinds.
    ///
    /// # Errors
    /// [`StatError::Domain`] if `p ∉ [0, 1]`.
    pub fn quantile(&self, p: f64) -> Result<f64, StatError> {
        dispatch!(self, d => d.quantile(p))
    }

    /// `(lower, upper)` bounds of the support; infinite where unbounded.
    pub fn support(&self) -> (f64, f64) {
        dispatch!(self, d => d.support())
    }

    /// Closed-form summary statistics.
    ///
    /// # Errors
    /// [`StatError::NumericOverflow`] if any statistic is not representable
    /// (e.g. the kurtosis of a log-normal with σ = 15).
    pub fn summary(&self) -> Result<Summary, StatError> {
        let summary = dispatch!(self, d => d.summary());
        let fields = [
            ("mean", Some(summary.mean)),
            ("variance", Some(summary.variance)),
            ("std_dev", Some(summary.std_dev)),
            ("median", Some(summary.median)),
            ("mode", summary.mode),
            ("skewness", summary.skewness),
            ("excess_kurtosis", summary.excess_kurtosis),
        ];
        for (name, value) in fields {
            if let Some(v) = value.filter(|v| !v.is_finite()) {
                return Err(StatError::NumericOverflow(format!(
                    "{} {name} is not finite ({v})",
                    self.kind()
                )));
            }
        }
        Ok(summary)
    }

    /// Evaluates the density (or mass) at every point.
    pub fn pdf_values(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.pdf(x)).collect()
    }

    /// Evaluates the CDF at every point.
    pub fn cdf_values(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.cdf(x)).collect()
    }

    /// Answers a [`ProbabilityQuery`].
    ///
    /// For discrete kinds `Between(a, b)` counts every integer in `[a, b]`,
    /// i.e. F(b) − F(⌈a⌉ − 1).
    ///
    /// # Errors
    /// [`StatError::Domain`] if a bound is not finite or `a > b`.
    ///
    /// # Examples
    /// ```
    /// use u_statlab::descriptor::{DistributionConfig, ProbabilityQuery};
    /// let die = DistributionConfig::Binomial { n: 1, p: 0.5 }.build().unwrap();
    /// assert_eq!(die.probability(&ProbabilityQuery::Exactly(1.0)).unwrap(), 0.5);
    /// ```
    pub fn probability(&self, query: &ProbabilityQuery) -> Result<f64, StatError> {
        query.validate()?;
        let p = match *query {
            ProbabilityQuery::LessThan(x) => self.cdf(x),
            ProbabilityQuery::GreaterThan(x) => 1.0 - self.cdf(x),
            ProbabilityQuery::Between(a, b) => {
                if self.is_discrete() {
                    self.cdf(b) - self.cdf(a.ceil() - 1.0)
                } else {
                    self.cdf(b) - self.cdf(a)
                }
            }
            ProbabilityQuery::Exactly(x) => {
                if self.is_discrete() {
                    self.pdf(x)
                } else {
                    0.0
                }
            }
        };
        Ok(p.clamp(0.0, 1.0))
    }

    /// Default plotting range: the support clipped to mean ± 4σ, widened to
    /// whole numbers for discrete kinds.
    ///
    /// # Errors
    /// [`StatError::NumericOverflow`] if the moments are not finite.
    pub fn plot_range(&self) -> Result<(f64, f64), StatError> {
        let summary = self.summary()?;
        let (lo, hi) = self.support();
        let spread = 4.0 * summary.std_dev;
        let lower = lo.max(summary.mean - spread);
        let upper = hi.min(summary.mean + spread);
        if self.is_discrete() {
            let lower = lower.floor().max(lo);
            Ok((lower, upper.ceil().max(lower)))
        } else {
            Ok((lower, upper))
        }
    }

    /// Density and CDF over [`Distribution::plot_range`].
    ///
    /// Continuous kinds use `points` evenly spaced values; discrete kinds use
    /// every integer in the range and ignore `points`.
    ///
    /// # Errors
    /// - [`StatError::Domain`] if `points < 2` for a continuous kind, or the
    ///   discrete range holds more than [`MAX_DISCRETE_BINS`] integers.
    /// - [`StatError::NumericOverflow`] if the moments are not finite.
    pub fn curve(&self, points: usize) -> Result<Curve, StatError> {
        let (lo, hi) = self.plot_range()?;
        let x_values: Vec<f64> = if self.is_discrete() {
            let count = hi - lo + 1.0;
            if count > MAX_DISCRETE_BINS as f64 {
                return Err(StatError::domain(format!(
                    "discrete curve would need {count} points, limit is {MAX_DISCRETE_BINS}"
                )));
            }
            (0..count as usize).map(|i| lo + i as f64).collect()
        } else {
            if points < 2 {
                return Err(StatError::domain(format!(
                    "a continuous curve needs at least 2 points, got {points}"
                )));
            }
            let step = (hi - lo) / (points - 1) as f64;
            (0..points).map(|i| lo + step * i as f64).collect()
        };
        Ok(Curve {
            pdf_values: self.pdf_values(&x_values),
            cdf_values: self.cdf_values(&x_values),
            x_values,
        })
    }

    /// Draws `n` values; see [`sampling::generate_sample`].
    pub fn sample(&self, n: usize, seed: Option<u64>) -> Result<Vec<f64>, StatError> {
        sampling::generate_sample(self, n, seed)
    }

    /// Bins a sample drawn from this distribution: unit-width integer bins
    /// for discrete kinds, Sturges bins otherwise.
    pub fn histogram(
        &self,
        sample: &[f64],
        normalization: Normalization,
    ) -> Result<Histogram, StatError> {
        if self.is_discrete() {
            histogram::discrete_histogram(sample, normalization)
        } else {
            let options = HistogramOptions {
                bins: None,
                normalization,
            };
            histogram::histogram(sample, &options)
        }
    }
}

impl From<Distribution> for DistributionConfig {
    fn from(d: Distribution) -> Self {
        match d {
            Distribution::Normal(d) => DistributionConfig::Normal {
                mean: d.mean(),
                std: d.std(),
            },
            Distribution::LogNormal(d) => DistributionConfig::LogNormal {
                mu: d.mu(),
                sigma: d.sigma(),
            },
            Distribution::Uniform(d) => DistributionConfig::Uniform {
                min: d.min(),
                max: d.max(),
            },
            Distribution::Triangular(d) => DistributionConfig::Triangular {
                min: d.min(),
                mode: d.mode(),
                max: d.max(),
            },
            Distribution::Exponential(d) => DistributionConfig::Exponential { rate: d.rate() },
            Distribution::Gamma(d) => DistributionConfig::Gamma {
                shape: d.shape(),
                scale: d.scale(),
            },
            Distribution::Beta(d) => DistributionConfig::Beta {
                alpha: d.alpha(),
                beta: d.beta(),
            },
            Distribution::ChiSquared(d) => DistributionConfig::ChiSquared {
                k: d.degrees_of_freedom(),
            },
            Distribution::Bernoulli(d) => DistributionConfig::Bernoulli { p: d.p() },
            Distribution::Binomial(d) => DistributionConfig::Binomial { n: d.n(), p: d.p() },
            Distribution::Poisson(d) => DistributionConfig::Poisson { lambda: d.lambda() },
            Distribution::Geometric(d) => DistributionConfig::Geometric { p: d.p() },
        }
    }
}

impl TryFrom<DistributionConfig> for Distribution {
    type Error = StatError;

    fn try_from(config: DistributionConfig) -> Result<Self, Self::Error> {
        config.build()
    }
}

// ============================================================================
// Tests
// ============================================================================
