//! Bounded log of recent probability calculations.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::descriptor::{Distribution, DistributionConfig, ProbabilityQuery};
use crate::error::StatError;

/// Number of entries kept; older ones are dropped.
pub const MAX_HISTORY: usize = 10;

/// One evaluated query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub distribution: DistributionConfig,
    pub query: ProbabilityQuery,
    pub probability: f64,
}

/// Most recent calculations, newest first, capped at [`MAX_HISTORY`].
///
/// # Examples
/// ```
/// use u_statlab::descriptor::{DistributionConfig, ProbabilityQuery};
/// use u_statlab::history::CalculationHistory;
///
/// let normal = DistributionConfig::Normal { mean: 0.0, std: 1.0 }.build().unwrap();
/// let mut history = CalculationHistory::new();
/// let p = history.record(&normal, &ProbabilityQuery::LessThan(0.0)).unwrap();
/// assert_eq!(p, 0.5);
/// assert_eq!(history.latest().unwrap().probability, 0.5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationHistory {
    entries: VecDeque<HistoryEntry>,
}

impl CalculationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates `query` against `distribution`, stores the result and
    /// returns the probability. Failed queries are not recorded.
    pub fn record(
        &mut self,
        distribution: &Distribution,
        query: &ProbabilityQuery,
    ) -> Result<f64, StatError> {
        let probability = distribution.probability(query)?;
        self.push(HistoryEntry {
            distribution: distribution.config(),
            query: *query,
            probability,
        });
        Ok(probability)
    }

    /// Adds an entry at the front, evicting the oldest beyond [`MAX_HISTORY`].
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(MAX_HISTORY);
    }

    /// Entries from newest to oldest.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
