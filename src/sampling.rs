//! Seeded random sampling from any [`Distribution`].
//!
//! # Reproducibility
//!
//! Pass `Some(seed)` to [`generate_sample`] for a deterministic sequence:
//! the generator is `SmallRng` seeded through [`create_rng`], so the same
//! seed yields identical draws on the same platform. `None` seeds from the
//! operating system.
//!
//! # Algorithms
//!
//! Draws come from the `rand_distr` samplers: ziggurat for Normal and
//! Exponential, Marsaglia-Tsang for Gamma (and Beta, ChiSquared built on it),
//! BTPE for Binomial and PTRS-style rejection for Poisson. Geometric draws
//! count failures and are shifted by one to count trials.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution as _;

use crate::descriptor::Distribution;
use crate::error::StatError;

/// Creates a fast, seeded random number generator.
///
/// Uses `SmallRng` (Xoshiro256++). The sequence is deterministic for a
/// given seed on the same platform.
///
/// # Examples
/// ```
/// use u_statlab::sampling::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Seeded generator for `Some(seed)`, OS-seeded generator for `None`.
pub fn rng_from(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => SmallRng::from_os_rng(),
    }
}

/// Draws `n` values from `distribution`.
///
/// Discrete kinds produce integral values.
///
/// # Errors
/// - [`StatError::Domain`] if the sampler rejects the parameters (e.g. a
///   Poisson rate beyond the sampler's supported range).
/// - [`StatError::NumericOverflow`] if a draw is not finite.
///
/// # Examples
/// ```
/// use u_statlab::descriptor::DistributionConfig;
/// use u_statlab::sampling::generate_sample;
///
/// let d = DistributionConfig::Poisson { lambda: 4.0 }.build().unwrap();
/// let a = generate_sample(&d, 50, Some(7)).unwrap();
/// let b = generate_sample(&d, 50, Some(7)).unwrap();
/// assert_eq!(a, b);
/// assert!(a.iter().all(|x| x.fract() == 0.0));
/// ```
pub fn generate_sample(
    distribution: &Distribution,
    n: usize,
    seed: Option<u64>,
) -> Result<Vec<f64>, StatError> {
    let mut rng = rng_from(seed);
    sample_with(distribution, n, &mut rng)
}

/// Draws `n` values using a caller-supplied generator.
pub fn sample_with<R: Rng + ?Sized>(
    distribution: &Distribution,
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>, StatError> {
    let sampler = Sampler::new(distribution)?;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let x = sampler.draw(rng);
        if !x.is_finite() {
            return Err(StatError::NumericOverflow(format!(
                "{} sampler produced a non-finite draw",
                distribution.kind()
            )));
        }
        out.push(x);
    }
    Ok(out)
}

/// `rand_distr` sampler for each kind, built once per batch.
enum Sampler {
    Normal(rand_distr::Normal<f64>),
    LogNormal(rand_distr::LogNormal<f64>),
    Uniform(rand_distr::Uniform<f64>),
    Triangular(rand_distr::Triangular<f64>),
    Exponential(rand_distr::Exp<f64>),
    Gamma(rand_distr::Gamma<f64>),
    Beta(rand_distr::Beta<f64>),
    ChiSquared(rand_distr::ChiSquared<f64>),
    Bernoulli(rand_distr::Bernoulli),
    Binomial(rand_distr::Binomial),
    Poisson(rand_distr::Poisson<f64>),
    Geometric(rand_distr::Geometric),
}

fn rejected(e: impl std::fmt::Display) -> StatError {
    StatError::domain(format!("sampler rejected parameters: {e}"))
}

impl Sampler {
    fn new(distribution: &Distribution) -> Result<Self, StatError> {
        Ok(match *distribution {
            Distribution::Normal(d) => {
                Sampler::Normal(rand_distr::Normal::new(d.mean(), d.std()).map_err(rejected)?)
            }
            Distribution::LogNormal(d) => Sampler::LogNormal(
                rand_distr::LogNormal::new(d.mu(), d.sigma()).map_err(rejected)?,
            ),
            Distribution::Uniform(d) => Sampler::Uniform(
                rand_distr::Uniform::new_inclusive(d.min(), d.max()).map_err(rejected)?,
            ),
            Distribution::Triangular(d) => Sampler::Triangular(
                rand_distr::Triangular::new(d.min(), d.max(), d.mode()).map_err(rejected)?,
            ),
            Distribution::Exponential(d) => {
                Sampler::Exponential(rand_distr::Exp::new(d.rate()).map_err(rejected)?)
            }
            Distribution::Gamma(d) => {
                Sampler::Gamma(rand_distr::Gamma::new(d.shape(), d.scale()).map_err(rejected)?)
            }
            Distribution::Beta(d) => {
                Sampler::Beta(rand_distr::Beta::new(d.alpha(), d.beta()).map_err(rejected)?)
            }
            Distribution::ChiSquared(d) => Sampler::ChiSquared(
                rand_distr::ChiSquared::new(d.degrees_of_freedom()).map_err(rejected)?,
            ),
            Distribution::Bernoulli(d) => {
                Sampler::Bernoulli(rand_distr::Bernoulli::new(d.p()).map_err(rejected)?)
            }
            Distribution::Binomial(d) => {
                Sampler::Binomial(rand_distr::Binomial::new(d.n(), d.p()).map_err(rejected)?)
            }
            Distribution::Poisson(d) => {
                Sampler::Poisson(rand_distr::Poisson::new(d.lambda()).map_err(rejected)?)
            }
            Distribution::Geometric(d) => {
                Sampler::Geometric(rand_distr::Geometric::new(d.p()).map_err(rejected)?)
            }
        })
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Normal(s) => s.sample(rng),
            Sampler::LogNormal(s) => s.sample(rng),
            Sampler::Uniform(s) => s.sample(rng),
            Sampler::Triangular(s) => s.sample(rng),
            Sampler::Exponential(s) => s.sample(rng),
            Sampler::Gamma(s) => s.sample(rng),
            Sampler::Beta(s) => s.sample(rng),
            Sampler::ChiSquared(s) => s.sample(rng),
            Sampler::Bernoulli(s) => {
                if s.sample(rng) {
                    1.0
                } else {
                    0.0
                }
            }
            Sampler::Binomial(s) => s.sample(rng) as f64,
            Sampler::Poisson(s) => s.sample(rng),
            Sampler::Geometric(s) => s.sample(rng) as f64 + 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DistributionConfig;
    use crate::stats;

    fn build(config: DistributionConfig) -> Distribution {
        config.build().unwrap()
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut a = create_rng(123);
        let mut b = create_rng(123);
        for _ in 0..100 {
            let x: f64 = a.random();
            let y: f64 = b.random();
            assert_eq!(x, y);
        }
    }

    #[test]
    fn test_same_seed_same_sample() {
        for config in [
            DistributionConfig::Normal { mean: 0.0, std: 1.0 },
            DistributionConfig::Gamma { shape: 2.0, scale: 1.0 },
            DistributionConfig::Binomial { n: 30, p: 0.2 },
        ] {
            let d = build(config);
            assert_eq!(
                generate_sample(&d, 50, Some(7)).unwrap(),
                generate_sample(&d, 50, Some(7)).unwrap()
            );
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let d = build(DistributionConfig::Normal { mean: 0.0, std: 1.0 });
        assert_ne!(
            generate_sample(&d, 20, Some(1)).unwrap(),
            generate_sample(&d, 20, Some(2)).unwrap()
        );
    }

    #[test]
    fn test_unseeded_sample_length() {
        let d = build(DistributionConfig::Uniform { min: 0.0, max: 1.0 });
        let s = generate_sample(&d, 25, None).unwrap();
        assert_eq!(s.len(), 25);
        assert!(s.iter().all(|x| (0.0..=1.0).contains(x)));
    }

    #[test]
    fn test_zero_draws() {
        let d = build(DistributionConfig::Exponential { rate: 1.0 });
        assert!(generate_sample(&d, 0, Some(1)).unwrap().is_empty());
    }

    #[test]
    fn test_samples_within_support() {
        let cases = [
            DistributionConfig::Triangular { min: 1.0, mode: 2.0, max: 5.0 },
            DistributionConfig::Beta { alpha: 0.5, beta: 0.5 },
            DistributionConfig::Bernoulli { p: 0.4 },
            DistributionConfig::Binomial { n: 12, p: 0.7 },
            DistributionConfig::Geometric { p: 0.3 },
            DistributionConfig::LogNormal { mu: 0.0, sigma: 1.0 },
        ];
        for config in cases {
            let d = build(config);
            let (lo, hi) = d.support();
            for x in generate_sample(&d, 2000, Some(11)).unwrap() {
                assert!(x >= lo && x <= hi, "{:?} drew {x}", d.kind());
                if d.is_discrete() {
                    assert_eq!(x.fract(), 0.0);
                }
            }
        }
    }

    #[test]
    fn test_sample_moments_converge() {
        let cases = [
            DistributionConfig::Normal { mean: 3.0, std: 2.0 },
            DistributionConfig::Exponential { rate: 0.5 },
            DistributionConfig::Gamma { shape: 3.0, scale: 2.0 },
            DistributionConfig::Beta { alpha: 2.0, beta: 3.0 },
            DistributionConfig::ChiSquared { k: 4.0 },
            DistributionConfig::Binomial { n: 40, p: 0.25 },
            DistributionConfig::Poisson { lambda: 6.0 },
            DistributionConfig::Geometric { p: 0.2 },
        ];
        for config in cases {
            let d = build(config);
            let expected = d.summary().unwrap();
            let draws = generate_sample(&d, 50_000, Some(42)).unwrap();
            let m = stats::mean(&draws).unwrap();
            let v = stats::variance(&draws).unwrap();
            let tol_mean = 5.0 * expected.std_dev / (draws.len() as f64).sqrt();
            assert!((m - expected.mean).abs() < tol_mean, "{:?}: mean {m} vs {}", d.kind(), expected.mean);
            assert!(
                (v - expected.variance).abs() < 0.1 * expected.variance,
                "{:?}: variance {v} vs {}",
                d.kind(),
                expected.variance
            );
        }
    }
}
