//! Partition of loop records into vectorized and scalar cohorts.

use crate::record::LoopRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two diagrams a cohort or ceiling set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cohort {
    Vector,
    Scalar,
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vector => f.write_str("vector"),
            Self::Scalar => f.write_str("scalar"),
        }
    }
}

/// Loop records split by vectorization, each hottest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cohorts {
    pub vectorized: Vec<LoopRecord>,
    pub scalar: Vec<LoopRecord>,
}

impl Cohorts {
    #[must_use]
    pub fn get(&self, cohort: Cohort) -> &[LoopRecord] {
        match cohort {
            Cohort::Vector => &self.vectorized,
            Cohort::Scalar => &self.scalar,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vectorized.len() + self.scalar.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sorts records by self time and splits them into cohorts.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopClassifier;

impl LoopClassifier {
    /// Order records by `self_time_seconds`, descending. Stable, so equal
    /// times keep their input order.
    pub fn sort_by_self_time(records: &mut [LoopRecord]) {
        records.sort_by(|a, b| b.self_time_seconds.total_cmp(&a.self_time_seconds));
    }

    /// Sort, then partition. Every record lands in exactly one cohort and
    /// each cohort preserves the sorted order.
    #[must_use]
    pub fn classify(mut records: Vec<LoopRecord>) -> Cohorts {
        Self::sort_by_self_time(&mut records);
        let (vectorized, scalar) = records.into_iter().partition(|r| r.is_vectorized);
        Cohorts { vectorized, scalar }
    }
}
