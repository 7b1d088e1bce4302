//! Histogram binning for samples and observed data.
//!
//! Continuous data is split into equal-width bins over `[min, max]`, with
//! the bin count chosen by Sturges' rule unless given explicitly. Discrete
//! data uses unit-width bins centred on each integer so that bar heights
//! line up with the probability mass function.
//!
//! Reference: Sturges (1926), "The Choice of a Class Interval",
//! *Journal of the American Statistical Association* 21(153).

use serde::{Deserialize, Serialize};

use crate::error::StatError;

/// Lower clamp for [`sturges_bin_count`].
pub const MIN_STURGES_BINS: usize = 5;
/// Upper clamp for [`sturges_bin_count`].
pub const MAX_STURGES_BINS: usize = 30;
/// Largest number of unit bins (or curve points) a discrete range may span.
pub const MAX_DISCRETE_BINS: usize = 100_000;

/// Sturges' rule `⌈log₂ n + 1⌉`, clamped to `[5, 30]`.
///
/// # Examples
/// ```
/// use u_statlab::histogram::sturges_bin_count;
/// assert_eq!(sturges_bin_count(0), 5);
/// assert_eq!(sturges_bin_count(100), 8);
/// assert_eq!(sturges_bin_count(1 << 40), 30);
/// ```
pub fn sturges_bin_count(n: usize) -> usize {
    if n <= 1 {
        return MIN_STURGES_BINS;
    }
    let bins = ((n as f64).log2() + 1.0).ceil() as usize;
    bins.clamp(MIN_STURGES_BINS, MAX_STURGES_BINS)
}

/// How bin counts are scaled into [`Bin::value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Raw counts.
    Count,
    /// Fraction of observations; values sum to 1.
    #[default]
    Proportion,
    /// Count / (total · width); Σ value·width = 1.
    Density,
}

/// Options for [`histogram`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HistogramOptions {
    /// Number of bins; Sturges' rule when `None`.
    pub bins: Option<usize>,
    pub normalization: Normalization,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// Count scaled per [`Histogram::normalization`].
    pub value: f64,
}

impl Bin {
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.lower + self.upper)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
    pub bin_width: f64,
    /// Number of observations binned.
    pub total: usize,
    pub normalization: Normalization,
}

impl Histogram {
    /// Σ value·width; 1 for a density histogram.
    pub fn area(&self) -> f64 {
        self.bins.iter().map(|b| b.value * self.bin_width).sum()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.bins.iter().map(|b| b.count).collect()
    }

    fn from_counts(
        counts: Vec<usize>,
        lower: f64,
        bin_width: f64,
        total: usize,
        normalization: Normalization,
    ) -> Self {
        let scale = match normalization {
            Normalization::Count => 1.0,
            Normalization::Proportion => 1.0 / total as f64,
            Normalization::Density => 1.0 / (total as f64 * bin_width),
        };
        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bin {
                lower: lower + i as f64 * bin_width,
                upper: lower + (i + 1) as f64 * bin_width,
                count,
                value: count as f64 * scale,
            })
            .collect();
        Self {
            bins,
            bin_width,
            total,
            normalization,
        }
    }
}

fn check_data(data: &[f64]) -> Result<(f64, f64), StatError> {
    if data.is_empty() {
        return Err(StatError::insufficient(0, 1));
    }
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for (i, &x) in data.iter().enumerate() {
        if !x.is_finite() {
            return Err(StatError::domain(format!(
                "cannot bin non-finite value {x} at index {i}"
            )));
        }
        lo = lo.min(x);
        hi = hi.max(x);
    }
    Ok((lo, hi))
}

/// Equal-width histogram over `[min, max]`; the maximum falls in the last
/// bin. Constant data is binned over `[x − 0.5, x + 0.5]`.
///
/// # Errors
/// - [`StatError::InsufficientData`] for empty `data`.
/// - [`StatError::Domain`] for a non-finite value or `bins == Some(0)`.
/// - [`StatError::NumericOverflow`] if `max − min` exceeds the `f64` range.
///
/// # Examples
/// ```
/// use u_statlab::histogram::{histogram, HistogramOptions, Normalization};
/// let opts = HistogramOptions { bins: Some(2), normalization: Normalization::Count };
/// let h = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], &opts).unwrap();
/// assert_eq!(h.counts(), vec![2, 3]);
/// ```
pub fn histogram(data: &[f64], options: &HistogramOptions) -> Result<Histogram, StatError> {
    let (mut lo, mut hi) = check_data(data)?;
    let bins = options.bins.unwrap_or_else(|| sturges_bin_count(data.len()));
    if bins == 0 {
        return Err(StatError::domain("histogram needs at least one bin"));
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    if !width.is_finite() {
        return Err(StatError::NumericOverflow(format!(
            "data range [{lo}, {hi}] is too wide to bin"
        )));
    }

    let mut counts = vec![0_usize; bins];
    for &x in data {
        let idx = (((x - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Ok(Histogram::from_counts(
        counts,
        lo,
        width,
        data.len(),
        options.normalization,
    ))
}

/// Unit-width bins centred on every integer from ⌊min⌋ to ⌈max⌉.
/// Non-integer values fall in the bin of the nearest integer.
///
/// # Errors
/// - [`StatError::InsufficientData`] for empty `data`.
/// - [`StatError::Domain`] for a non-finite value, or a range wider than
///   [`MAX_DISCRETE_BINS`].
///
/// # Examples
/// ```
/// use u_statlab::histogram::{discrete_histogram, Normalization};
/// let h = discrete_histogram(&[1.0, 1.0, 2.0, 4.0], Normalization::Count).unwrap();
/// assert_eq!(h.counts(), vec![2, 1, 0, 1]);
/// assert_eq!(h.bins[0].midpoint(), 1.0);
/// ```
pub fn discrete_histogram(
    data: &[f64],
    normalization: Normalization,
) -> Result<Histogram, StatError> {
    let (lo, hi) = check_data(data)?;
    let first = lo.floor();
    let span = hi.ceil() - first + 1.0;
    if span > MAX_DISCRETE_BINS as f64 {
        return Err(StatError::domain(format!(
            "discrete range [{first}, {}] spans more than {MAX_DISCRETE_BINS} bins",
            hi.ceil()
        )));
    }
    let bins = span as usize;

    let mut counts = vec![0_usize; bins];
    for &x in data {
        let idx = ((x.round() - first) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Ok(Histogram::from_counts(
        counts,
        first - 0.5,
        1.0,
        data.len(),
        normalization,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(bins: Option<usize>, normalization: Normalization) -> HistogramOptions {
        HistogramOptions {
            bins,
            normalization,
        }
    }

    #[test]
    fn test_sturges() {
        assert_eq!(sturges_bin_count(1), 5);
        assert_eq!(sturges_bin_count(16), 5);
        assert_eq!(sturges_bin_count(17), 6);
        assert_eq!(sturges_bin_count(1000), 11);
        assert_eq!(sturges_bin_count(usize::MAX), 30);
    }

    #[test]
    fn test_histogram_counts_and_edges() {
        let data = [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 5.0];
        let h = histogram(&data, &opts(Some(5), Normalization::Count)).unwrap();
        assert_eq!(h.bin_width, 1.0);
        assert_eq!(h.counts(), vec![2, 2, 2, 2, 2]);
        assert_eq!(h.bins[0].lower, 0.0);
        assert_eq!(h.bins[4].upper, 5.0);
        assert_eq!(h.counts().iter().sum::<usize>(), data.len());
    }

    #[test]
    fn test_histogram_default_uses_sturges_and_proportion() {
        let data: Vec<f64> = (0..100).map(f64::from).collect();
        let h = histogram(&data, &HistogramOptions::default()).unwrap();
        assert_eq!(h.bins.len(), 8);
        assert_eq!(h.normalization, Normalization::Proportion);
        let total: f64 = h.bins.iter().map(|b| b.value).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_density_area() {
        let data = [0.1, 0.2, 0.25, 0.7, 0.9, 1.3, 2.2];
        let h = histogram(&data, &opts(Some(4), Normalization::Density)).unwrap();
        assert!((h.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_constant_data() {
        let h = histogram(&[3.0; 4], &opts(Some(5), Normalization::Count)).unwrap();
        assert_eq!(h.bins[0].lower, 2.5);
        assert_eq!(h.bins[4].upper, 3.5);
        assert_eq!(h.counts(), vec![0, 0, 4, 0, 0]);
    }

    #[test]
    fn test_histogram_errors() {
        assert!(matches!(
            histogram(&[], &HistogramOptions::default()),
            Err(StatError::InsufficientData { got: 0, min: 1 })
        ));
        assert!(matches!(
            histogram(&[1.0, f64::NAN], &HistogramOptions::default()),
            Err(StatError::Domain(_))
        ));
        assert!(histogram(&[1.0, 2.0], &opts(Some(0), Normalization::Count)).is_err());
    }

    #[test]
    fn test_histogram_range_overflow() {
        let data = [-1e308, 0.0, 1e308];
        assert!(matches!(
            histogram(&data, &HistogramOptions::default()),
            Err(StatError::NumericOverflow(_))
        ));
        let h = histogram(&[-1e307, 1e307], &HistogramOptions::default()).unwrap();
        assert!(h.bins.iter().all(|b| b.lower.is_finite() && b.upper.is_finite()));
        assert!(h.area().is_finite());
    }

    #[test]
    fn test_discrete_histogram() {
        let h = discrete_histogram(&[0.0, 2.0, 2.0, 3.0], Normalization::Proportion).unwrap();
        assert_eq!(h.bins.len(), 4);
        assert_eq!(h.bins[0].lower, -0.5);
        assert_eq!(h.bins[3].upper, 3.5);
        assert_eq!(h.bins[2].value, 0.5);
        assert_eq!(h.bins[1].count, 0);
    }

    #[test]
    fn test_discrete_histogram_density_matches_proportion() {
        let data = [5.0, 6.0, 6.0, 9.0];
        let p = discrete_histogram(&data, Normalization::Proportion).unwrap();
        let d = discrete_histogram(&data, Normalization::Density).unwrap();
        assert_eq!(p.bins, d.bins);
        assert!((d.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_discrete_histogram_range_limit() {
        assert!(matches!(
            discrete_histogram(&[0.0, 1e9], Normalization::Count),
            Err(StatError::Domain(_))
        ));
    }
}
