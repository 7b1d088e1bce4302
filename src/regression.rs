//! Pearson correlation and simple ordinary least squares.
//!
//! Both work from the centred sums
//!
//! ```text
//! Sxx = Σ(xᵢ − x̄)²    Syy = Σ(yᵢ − ȳ)²    Sxy = Σ(xᵢ − x̄)(yᵢ − ȳ)
//! ```
//!
//! with r = Sxy/√(Sxx·Syy), slope = Sxy/Sxx and intercept = ȳ − slope·x̄.
//! The means use compensated summation, so exactly linear data yields
//! exactly ±1 and exact coefficients.

use serde::Serialize;

use crate::error::StatError;
use crate::special;
use crate::stats::compensated_sum;

/// Significance level used for [`Correlation::significant`].
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

struct CentredSums {
    n: usize,
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

fn centred_sums(xs: &[f64], ys: &[f64]) -> Result<CentredSums, StatError> {
    if xs.len() != ys.len() {
        return Err(StatError::domain(format!(
            "paired inputs differ in length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < 2 {
        return Err(StatError::insufficient(xs.len(), 2));
    }
    if let Some(i) = xs.iter().zip(ys).position(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(StatError::domain(format!(
            "pair at index {i} is not finite ({}, {})",
            xs[i], ys[i]
        )));
    }

    let n = xs.len();
    let mean_x = compensated_sum(xs) / n as f64;
    let mean_y = compensated_sum(ys) / n as f64;
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if !(sxx.is_finite() && syy.is_finite() && sxy.is_finite()) {
        return Err(StatError::NumericOverflow(format!(
            "centred sums of squares overflow (sxx={sxx}, syy={syy}, sxy={sxy})"
        )));
    }
    Ok(CentredSums {
        n,
        mean_x,
        mean_y,
        sxx,
        syy,
        sxy,
    })
}

// ============================================================================
// Correlation
// ============================================================================

/// Result of [`pearson_correlation`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlation {
    /// Pearson's r, in `[-1, 1]`.
    pub coefficient: f64,
    /// Two-sided p-value for H₀: ρ = 0.
    pub p_value: f64,
    /// `p_value < 0.05`.
    pub significant: bool,
    pub n: usize,
}

/// Pearson product-moment correlation with a two-sided t-test.
///
/// The test statistic is `t = r·√((n−2)/(1−r²))` with `n − 2` degrees of
/// freedom. A perfect linear relation gives `p = 0`; with exactly two
/// pairs there are no degrees of freedom and `p = 1`.
///
/// # Errors
/// - [`StatError::Domain`] if the lengths differ, a value is not finite,
///   or either input has zero variance.
/// - [`StatError::InsufficientData`] if there are fewer than 2 pairs.
/// - [`StatError::NumericOverflow`] if the centred sums of squares exceed
///   the `f64` range.
///
/// # Examples
/// ```
/// use u_statlab::regression::pearson_correlation;
/// let c = pearson_correlation(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
/// assert_eq!(c.coefficient, 1.0);
/// assert_eq!(c.p_value, 0.0);
/// assert!(c.significant);
/// ```
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Result<Correlation, StatError> {
    let s = centred_sums(xs, ys)?;
    if s.sxx == 0.0 || s.syy == 0.0 {
        return Err(StatError::domain(
            "correlation requires both inputs to have non-zero variance",
        ));
    }

    let r = (s.sxy / (s.sxx * s.syy).sqrt()).clamp(-1.0, 1.0);
    let p_value = if s.n == 2 {
        1.0
    } else if r.abs() == 1.0 {
        0.0
    } else {
        let df = (s.n - 2) as f64;
        let t = r * (df / (1.0 - r * r)).sqrt();
        special::t_two_sided_p_value(t, df)
    };

    Ok(Correlation {
        coefficient: r,
        p_value,
        significant: p_value < SIGNIFICANCE_LEVEL,
        n: s.n,
    })
}

// ============================================================================
// Linear Regression
// ============================================================================

/// Ordinary least-squares line `y = intercept + slope·x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, `1 − SS_res/SS_tot`.
    pub r_squared: f64,
    pub n: usize,
    /// √(SS_res / (n − 2)); `None` for two points.
    pub residual_std_error: Option<f64>,
    pub slope_std_error: Option<f64>,
    pub intercept_std_error: Option<f64>,
    /// Two-sided p-value for H₀: slope = 0.
    pub slope_p_value: Option<f64>,
}

impl LinearFit {
    /// Fitted value at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Observed minus fitted value for each pair.
    ///
    /// # Errors
    /// [`StatError::Domain`] if the lengths differ.
    pub fn residuals(&self, xs: &[f64], ys: &[f64]) -> Result<Vec<f64>, StatError> {
        if xs.len() != ys.len() {
            return Err(StatError::domain(format!(
                "paired inputs differ in length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        Ok(xs.iter().zip(ys).map(|(&x, &y)| y - self.predict(x)).collect())
    }
}

/// Fits `y = intercept + slope·x` by the closed-form normal equations.
///
/// R² is 1 when the fit is exact, including a constant `y`.
///
/// # Errors
/// - [`StatError::Domain`] if the lengths differ, a value is not finite,
///   or all `x` are equal.
/// - [`StatError::InsufficientData`] if there are fewer than 2 pairs.
/// - [`StatError::NumericOverflow`] if the centred sums of squares exceed
///   the `f64` range.
///
/// # Examples
/// ```
/// use u_statlab::regression::linear_regression;
/// let fit = linear_regression(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
/// assert_eq!((fit.slope, fit.intercept, fit.r_squared), (2.0, 0.0, 1.0));
/// assert_eq!(fit.predict(10.0), 20.0);
/// ```
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Result<LinearFit, StatError> {
    let s = centred_sums(xs, ys)?;
    if s.sxx == 0.0 {
        return Err(StatError::domain(
            "linear regression requires x to have non-zero variance",
        ));
    }

    let slope = s.sxy / s.sxx;
    let intercept = s.mean_y - slope * s.mean_x;
    let ss_res: f64 = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| {
            let e = y - (intercept + slope * x);
            e * e
        })
        .sum();
    let r_squared = if s.syy == 0.0 {
        1.0
    } else {
        (1.0 - ss_res / s.syy).clamp(0.0, 1.0)
    };

    let n = s.n as f64;
    let (residual_std_error, slope_std_error, intercept_std_error, slope_p_value) = if s.n > 2 {
        let df = n - 2.0;
        let se = (ss_res / df).sqrt();
        let slope_se = se / s.sxx.sqrt();
        let intercept_se = se * (1.0 / n + s.mean_x * s.mean_x / s.sxx).sqrt();
        let p = if slope_se == 0.0 {
            if slope == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            special::t_two_sided_p_value(slope / slope_se, df)
        };
        (Some(se), Some(slope_se), Some(intercept_se), Some(p))
    } else {
        (None, None, None, None)
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
        n: s.n,
        residual_std_error,
        slope_std_error,
        intercept_std_error,
        slope_p_value,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn correlation_bounded(
            pairs in proptest::collection::vec((-1e3_f64..1e3, -1e3_f64..1e3), 3..50)
        ) {
            let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            if let Ok(c) = pearson_correlation(&xs, &ys) {
                prop_assert!((-1.0..=1.0).contains(&c.coefficient));
                prop_assert!((0.0..=1.0).contains(&c.p_value));
            }
        }

        #[test]
        fn r_squared_is_r_squared(
            pairs in proptest::collection::vec((-1e3_f64..1e3, -1e3_f64..1e3), 3..50)
        ) {
            let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            if let (Ok(c), Ok(fit)) = (pearson_correlation(&xs, &ys), linear_regression(&xs, &ys)) {
                prop_assert!((c.coefficient * c.coefficient - fit.r_squared).abs() < 1e-8);
            }
        }

        #[test]
        fn recovers_exact_line(
            slope in -10.0_f64..10.0,
            intercept in -10.0_f64..10.0,
            n in 3_usize..30,
        ) {
            let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
            let ys: Vec<f64> = xs.iter().map(|x| intercept + slope * x).collect();
            let fit = linear_regression(&xs, &ys).unwrap();
            prop_assert!((fit.slope - slope).abs() < 1e-9);
            prop_assert!((fit.intercept - intercept).abs() < 1e-9);
        }
    }
}
