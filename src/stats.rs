//! Descriptive statistics over `f64` slices.
//!
//! Primitives ([`mean`], [`variance`], [`quantile`], ...) return `Option`
//! and yield `None` for empty input or non-finite values. The
//! `Result`-returning helpers ([`percentiles`], [`describe`],
//! [`rolling_mean`], [`rolling_std_dev`]) report why they cannot answer
//! through [`StatError`].
//!
//! # Algorithms
//!
//! - **Sums**: Neumaier compensated summation.
//!   Reference: Neumaier (1974), *ZAMM* 54(1), pp. 39–51.
//! - **Moments**: Welford's online update, extended to M₃ and M₄.
//!   References: Welford (1962), *Technometrics* 4(3);
//!   Pébay (2008), Sandia Report SAND2008-6212.
//! - **Quantiles**: R-7 linear interpolation (default in R and NumPy).
//!   Reference: Hyndman & Fan (1996), *The American Statistician* 50(4).

use serde::Serialize;

use crate::error::StatError;

fn all_finite(data: &[f64]) -> bool {
    data.iter().all(|x| x.is_finite())
}

/// Returns a sorted copy, or `None` if `data` contains NaN.
fn sorted_copy(data: &[f64]) -> Option<Vec<f64>> {
    if data.iter().any(|x| x.is_nan()) {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    Some(sorted)
}

// ============================================================================
// Location and Spread
// ============================================================================

/// Neumaier compensated sum.
///
/// Tracks the low-order bits lost at each addition, including the case
/// where the addend is larger than the running total.
///
/// # Examples
/// ```
/// use u_statlab::stats::compensated_sum;
/// assert_eq!(compensated_sum(&[1.0, 1e100, 1.0, -1e100]), 2.0);
/// ```
pub fn compensated_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for &x in data {
        let t = sum + x;
        compensation += if sum.abs() >= x.abs() {
            (sum - t) + x
        } else {
            (x - t) + sum
        };
        sum = t;
    }
    sum + compensation
}

/// Arithmetic mean.
///
/// # Examples
/// ```
/// use u_statlab::stats::mean;
/// assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !all_finite(data) {
        return None;
    }
    Some(compensated_sum(data) / data.len() as f64)
}

/// Sample variance (denominator `n − 1`); `None` for fewer than 2 values.
///
/// # Examples
/// ```
/// use u_statlab::stats::variance;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((variance(&v).unwrap() - 32.0 / 7.0).abs() < 1e-12);
/// ```
pub fn variance(data: &[f64]) -> Option<f64> {
    if !all_finite(data) {
        return None;
    }
    data.iter().copied().collect::<WelfordAccumulator>().sample_variance()
}

/// Population variance (denominator `n`).
pub fn population_variance(data: &[f64]) -> Option<f64> {
    if !all_finite(data) {
        return None;
    }
    data.iter().copied().collect::<WelfordAccumulator>().population_variance()
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

pub fn population_std_dev(data: &[f64]) -> Option<f64> {
    population_variance(data).map(f64::sqrt)
}

/// Smallest value; `None` if empty or any value is NaN.
pub fn min(data: &[f64]) -> Option<f64> {
    if data.iter().any(|x| x.is_nan()) {
        return None;
    }
    data.iter().copied().reduce(f64::min)
}

/// Largest value; `None` if empty or any value is NaN.
pub fn max(data: &[f64]) -> Option<f64> {
    if data.iter().any(|x| x.is_nan()) {
        return None;
    }
    data.iter().copied().reduce(f64::max)
}

/// Median: the R-7 quantile at `p = 0.5`.
///
/// # Examples
/// ```
/// use u_statlab::stats::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
pub fn median(data: &[f64]) -> Option<f64> {
    quantile(data, 0.5)
}

/// `p`-th sample quantile by R-7 linear interpolation.
///
/// With `h = (n − 1)·p`, `j = ⌊h⌋` and `g = h − j`, returns
/// `(1 − g)·x[j] + g·x[j+1]` on the sorted data.
///
/// # Examples
/// ```
/// use u_statlab::stats::quantile;
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(quantile(&data, 0.25), Some(2.0));
/// assert_eq!(quantile(&data, 1.0), Some(5.0));
/// assert_eq!(quantile(&data, 1.5), None);
/// ```
pub fn quantile(data: &[f64], p: f64) -> Option<f64> {
    quantile_sorted(&sorted_copy(data)?, p)
}

/// R-7 quantile of data the caller has already sorted ascending.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * p;
    let j = h.floor() as usize;
    let g = h - h.floor();
    match sorted.get(j + 1) {
        Some(&next) => Some((1.0 - g) * sorted[j] + g * next),
        None => Some(sorted[j]),
    }
}

// ============================================================================
// Shape
// ============================================================================

/// Adjusted Fisher-Pearson skewness G₁ (Excel `SKEW()`,
/// `scipy.stats.skew(bias=False)`).
///
/// `None` for fewer than 3 values, non-finite input or zero variance.
///
/// Reference: Joanes & Gill (1998), *The Statistician* 47(1).
pub fn skewness(data: &[f64]) -> Option<f64> {
    if !all_finite(data) {
        return None;
    }
    data.iter().copied().collect::<WelfordAccumulator>().skewness()
}

/// Excess kurtosis G₂ with small-sample correction (Excel `KURT()`).
///
/// `None` for fewer than 4 values, non-finite input or zero variance.
pub fn kurtosis(data: &[f64]) -> Option<f64> {
    if !all_finite(data) {
        return None;
    }
    data.iter().copied().collect::<WelfordAccumulator>().kurtosis()
}

/// Sample covariance Σ(xᵢ − x̄)(yᵢ − ȳ) / (n − 1).
///
/// `None` if the lengths differ, `n < 2`, or any value is not finite.
///
/// # Examples
/// ```
/// use u_statlab::stats::covariance;
/// let cov = covariance(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
/// assert!((cov - 5.0).abs() < 1e-14);
/// ```
pub fn covariance(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;
    let sum: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
    Some(sum / (x.len() - 1) as f64)
}

// ============================================================================
// Welford Accumulator
// ============================================================================

/// Single-pass accumulator of the first four central moments.
///
/// Each update adjusts M₄ before M₃ before M₂, since the higher moments
/// depend on the previous lower ones.
///
/// # Examples
/// ```
/// use u_statlab::stats::WelfordAccumulator;
/// let acc: WelfordAccumulator = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter().collect();
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-14);
/// assert!((acc.population_variance().unwrap() - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WelfordAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
    m3: f64,
    m4: f64,
}

impl WelfordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one observation.
    pub fn update(&mut self, value: f64) {
        let prev = self.count as f64;
        self.count += 1;
        if self.count == 1 {
            // Moments stay zero; avoids squaring a huge first delta.
            self.mean = value;
            return;
        }
        let n = self.count as f64;
        let delta = value - self.mean;
        let dn = delta / n;
        let dn2 = dn * dn;
        let term = delta * dn * prev;

        self.m4 += term * dn2 * (n * n - 3.0 * n + 3.0) + 6.0 * dn2 * self.m2 - 4.0 * dn * self.m3;
        self.m3 += term * dn * (n - 2.0) - 3.0 * dn * self.m2;
        self.m2 += term;
        self.mean += dn;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Variance with denominator `n − 1`; needs 2 observations.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }

    /// Variance with denominator `n`; needs 1 observation.
    pub fn population_variance(&self) -> Option<f64> {
        (self.count > 0).then(|| self.m2 / self.count as f64)
    }

    pub fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }

    /// G₁: `√(n(n−1))/(n−2) · √n·M₃/M₂^{3/2}`.
    pub fn skewness(&self) -> Option<f64> {
        if self.count < 3 || self.m2 == 0.0 {
            return None;
        }
        let n = self.count as f64;
        let g1 = n.sqrt() * self.m3 / self.m2.powf(1.5);
        Some((n * (n - 1.0)).sqrt() / (n - 2.0) * g1)
    }

    /// G₂: `(n−1)/((n−2)(n−3)) · ((n+1)·g₂ + 6)` with `g₂ = n·M₄/M₂² − 3`.
    pub fn kurtosis(&self) -> Option<f64> {
        if self.count < 4 || self.m2 == 0.0 {
            return None;
        }
        let n = self.count as f64;
        let g2 = n * self.m4 / (self.m2 * self.m2) - 3.0;
        Some((n - 1.0) / ((n - 2.0) * (n - 3.0)) * ((n + 1.0) * g2 + 6.0))
    }
}

impl Extend<f64> for WelfordAccumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.update(x);
        }
    }
}

impl FromIterator<f64> for WelfordAccumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

// ============================================================================
// Checked Summaries
// ============================================================================

fn check_sample(data: &[f64], min: usize) -> Result<(), StatError> {
    if data.len() < min {
        return Err(StatError::insufficient(data.len(), min));
    }
    match data.iter().position(|x| !x.is_finite()) {
        Some(i) => Err(StatError::domain(format!(
            "value at index {i} is not finite ({})",
            data[i]
        ))),
        None => Ok(()),
    }
}

/// R-7 quantiles of `data` at each probability in `ps` (fractions in
/// `[0, 1]`, so the 90th percentile is `0.9`). Sorts once.
///
/// # Errors
/// - [`StatError::InsufficientData`] if `data` is empty.
/// - [`StatError::Domain`] for a non-finite value or a probability outside `[0, 1]`.
///
/// # Examples
/// ```
/// use u_statlab::stats::percentiles;
/// let q = percentiles(&[1.0, 2.0, 3.0, 4.0, 5.0], &[0.0, 0.5, 0.75]).unwrap();
/// assert_eq!(q, vec![1.0, 3.0, 4.0]);
/// ```
pub fn percentiles(data: &[f64], ps: &[f64]) -> Result<Vec<f64>, StatError> {
    check_sample(data, 1)?;
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    ps.iter()
        .map(|&p| {
            quantile_sorted(&sorted, p).ok_or_else(|| {
                StatError::domain(format!("percentile probability must lie in [0, 1], got {p}"))
            })
        })
        .collect()
}

/// Five-number summary plus moments of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Description {
    pub count: usize,
    pub mean: f64,
    /// `None` for a single observation.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

impl Description {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Describes a sample in one pass over the moments plus one sort.
///
/// # Errors
/// [`StatError::InsufficientData`] if `data` is empty;
/// [`StatError::Domain`] if any value is not finite.
///
/// # Examples
/// ```
/// use u_statlab::stats::describe;
/// let d = describe(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(d.median, 3.0);
/// assert_eq!((d.q1, d.q3), (2.0, 4.0));
/// ```
pub fn describe(data: &[f64]) -> Result<Description, StatError> {
    check_sample(data, 1)?;
    let acc: WelfordAccumulator = data.iter().copied().collect();
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let q = |p: f64| quantile_sorted(&sorted, p).unwrap_or(f64::NAN);
    Ok(Description {
        count: data.len(),
        mean: compensated_sum(data) / data.len() as f64,
        std_dev: acc.sample_std_dev(),
        min: sorted[0],
        q1: q(0.25),
        median: q(0.5),
        q3: q(0.75),
        max: sorted[sorted.len() - 1],
        skewness: acc.skewness(),
        kurtosis: acc.kurtosis(),
    })
}

// ============================================================================
// Rolling Statistics
// ============================================================================

fn check_window(data: &[f64], window: usize) -> Result<(), StatError> {
    if window == 0 {
        return Err(StatError::domain("rolling window must be at least 1"));
    }
    check_sample(data, window)
}

/// Trailing moving average: element `i` is the mean of
/// `data[i..i + window]`, so the output has `len − window + 1` values.
///
/// The window sum is maintained by adding the incoming value and removing
/// the outgoing one, with Neumaier compensation on both.
///
/// # Errors
/// - [`StatError::Domain`] if `window == 0` or a value is not finite.
/// - [`StatError::InsufficientData`] if `window > data.len()`.
///
/// # Examples
/// ```
/// use u_statlab::stats::rolling_mean;
/// let m = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
/// assert_eq!(m, vec![2.0, 3.0, 4.0]);
/// ```
pub fn rolling_mean(data: &[f64], window: usize) -> Result<Vec<f64>, StatError> {
    check_window(data, window)?;
    let w = window as f64;
    let mut sum = RunningSum::default();
    for &x in &data[..window] {
        sum.add(x);
    }
    let mut out = Vec::with_capacity(data.len() - window + 1);
    out.push(sum.value() / w);
    for (incoming, outgoing) in data[window..].iter().zip(data) {
        sum.add(*incoming);
        sum.add(-outgoing);
        out.push(sum.value() / w);
    }
    Ok(out)
}

/// Trailing moving sample standard deviation, aligned like
/// [`rolling_mean`]. Each window is evaluated with the two-pass formula.
///
/// # Errors
/// - [`StatError::Domain`] if `window < 2` or a value is not finite.
/// - [`StatError::InsufficientData`] if `window > data.len()`.
pub fn rolling_std_dev(data: &[f64], window: usize) -> Result<Vec<f64>, StatError> {
    if window == 1 {
        return Err(StatError::domain(
            "rolling standard deviation needs a window of at least 2",
        ));
    }
    check_window(data, window)?;
    Ok(data
        .windows(window)
        .map(|w| {
            let m = compensated_sum(w) / window as f64;
            let ss: f64 = w.iter().map(|x| (x - m) * (x - m)).sum();
            (ss / (window - 1) as f64).sqrt()
        })
        .collect())
}

#[derive(Debug, Default)]
struct RunningSum {
    sum: f64,
    compensation: f64,
}

impl RunningSum {
    fn add(&mut self, x: f64) {
        let t = self.sum + x;
        self.compensation += if self.sum.abs() >= x.abs() {
            (self.sum - t) + x
        } else {
            (x - t) + self.sum
        };
        self.sum = t;
    }

    fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

// ============================================================================
// Tests
// ============================================================================
