//! Column-level helpers for tabular data loaded by the caller.
//!
//! Cells arrive as strings (CSV parsing lives outside this crate). This
//! module decides what a column holds, converts numeric columns, and
//! produces the per-category summaries used by comparative and
//! compositional views.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::StatError;
use crate::stats::{describe, Description};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const DATE_TIME_FORMATS: [&str; 1] = ["%Y-%m-%d %H:%M:%S"];

/// What a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Time,
}

/// Thresholds for [`classify_column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyOptions {
    /// An integer-coded column with at most this many distinct values is
    /// treated as categorical.
    pub max_categorical_levels: usize,
    /// Minimum non-blank rows before the level rule applies.
    pub min_rows_for_levels: usize,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            max_categorical_levels: 5,
            min_rows_for_levels: 20,
        }
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|x| x.is_finite())
}

fn is_time(cell: &str) -> bool {
    DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(cell, fmt).is_ok())
        || DATE_TIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(cell, fmt).is_ok())
        || DateTime::parse_from_rfc3339(cell).is_ok()
}

/// Classifies a column from its cells. Blank cells are ignored.
///
/// - All numeric: [`ColumnKind::Numeric`], unless every value is an
///   integer, there are at least `min_rows_for_levels` rows and no more
///   than `max_categorical_levels` distinct values. Such a column is a
///   coded factor and classifies as [`ColumnKind::Categorical`].
/// - All dates or timestamps (`2024-03-01`, `03/01/2024`,
///   `2024-03-01 12:00:00`, RFC 3339): [`ColumnKind::Time`].
/// - Anything else, including an all-blank column: [`ColumnKind::Categorical`].
///
/// # Examples
/// ```
/// use u_statlab::dataset::{classify_column, ClassifyOptions, ColumnKind};
/// let opts = ClassifyOptions::default();
/// assert_eq!(classify_column(&["1.5", "2", " ", "3e2"], &opts), ColumnKind::Numeric);
/// assert_eq!(classify_column(&["2024-01-05", "2024-02-11"], &opts), ColumnKind::Time);
/// assert_eq!(classify_column(&["red", "blue", "7"], &opts), ColumnKind::Categorical);
/// ```
pub fn classify_column<S: AsRef<str>>(values: &[S], options: &ClassifyOptions) -> ColumnKind {
    let cells: Vec<&str> = values
        .iter()
        .map(|v| v.as_ref().trim())
        .filter(|c| !c.is_empty())
        .collect();
    if cells.is_empty() {
        return ColumnKind::Categorical;
    }

    let numbers: Option<Vec<f64>> = cells.iter().map(|c| parse_number(c)).collect();
    if let Some(numbers) = numbers {
        let integer_coded = numbers.iter().all(|x| x.fract() == 0.0);
        if integer_coded && numbers.len() >= options.min_rows_for_levels {
            // + 0.0 folds -0.0 into 0.0
            let levels: BTreeSet<u64> = numbers.iter().map(|x| (x + 0.0).to_bits()).collect();
            if levels.len() <= options.max_categorical_levels {
                return ColumnKind::Categorical;
            }
        }
        return ColumnKind::Numeric;
    }

    if cells.iter().all(|c| is_time(c)) {
        ColumnKind::Time
    } else {
        ColumnKind::Categorical
    }
}

/// Parses every cell of a column as a finite number.
///
/// # Errors
/// [`StatError::Domain`] naming the first row that is blank, not a number
/// or not finite.
///
/// # Examples
/// ```
/// use u_statlab::dataset::numeric_column;
/// assert_eq!(numeric_column(&["1", " 2.5 ", "-3"]).unwrap(), vec![1.0, 2.5, -3.0]);
/// assert!(numeric_column(&["1", "n/a"]).is_err());
/// ```
pub fn numeric_column<S: AsRef<str>>(values: &[S]) -> Result<Vec<f64>, StatError> {
    values
        .iter()
        .enumerate()
        .map(|(row, v)| {
            let cell = v.as_ref().trim();
            parse_number(cell).ok_or_else(|| {
                StatError::domain(format!("row {row}: `{cell}` is not a finite number"))
            })
        })
        .collect()
}

/// Describes `values` separately for each group label.
///
/// `groups[i]` labels `values[i]`. Labels are trimmed; the map iterates in
/// label order.
///
/// # Errors
/// - [`StatError::Domain`] if the slices differ in length or a value is not finite.
/// - [`StatError::InsufficientData`] if there are no rows.
pub fn group_descriptions<S: AsRef<str>>(
    groups: &[S],
    values: &[f64],
) -> Result<BTreeMap<String, Description>, StatError> {
    if groups.len() != values.len() {
        return Err(StatError::domain(format!(
            "group column has {} rows but value column has {}",
            groups.len(),
            values.len()
        )));
    }
    if values.is_empty() {
        return Err(StatError::insufficient(0, 1));
    }

    let mut buckets: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (group, &value) in groups.iter().zip(values) {
        buckets
            .entry(group.as_ref().trim().to_string())
            .or_default()
            .push(value);
    }
    buckets
        .into_iter()
        .map(|(group, data)| Ok((group, describe(&data)?)))
        .collect()
}

/// Count and share of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    /// `count` over the number of non-blank cells.
    pub proportion: f64,
}

/// Frequency table of a categorical column, most frequent first; ties
/// keep label order. Blank cells are skipped.
///
/// # Examples
/// ```
/// use u_statlab::dataset::composition;
/// let shares = composition(&["b", "a", "b", "", "c", "b"]);
/// assert_eq!(shares[0].category, "b");
/// assert_eq!(shares[0].count, 3);
/// assert_eq!(shares[0].proportion, 0.6);
/// assert_eq!(shares[1].category, "a");
/// ```
pub fn composition<S: AsRef<str>>(categories: &[S]) -> Vec<CategoryShare> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for c in categories {
        let c = c.as_ref().trim();
        if !c.is_empty() {
            *counts.entry(c).or_insert(0) += 1;
        }
    }
    let total: usize = counts.values().sum();

    let mut shares: Vec<CategoryShare> = counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category: category.to_string(),
            count,
            proportion: count as f64 / total as f64,
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}
