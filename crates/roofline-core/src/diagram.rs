//! Renderable diagram descriptions.

use crate::builder::{LineSeries, RooflineSeries};
use crate::classify::Cohort;
use crate::record::LoopRecord;
use serde::{Deserialize, Serialize};

/// One measured loop placed on the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub location: String,
    /// Arithmetic intensity.
    pub x: f64,
    /// Achieved GFLOP/s.
    pub y: f64,
    /// Self time in seconds, drives the colour.
    pub weight: f64,
}

impl From<&LoopRecord> for ScatterPoint {
    fn from(record: &LoopRecord) -> Self {
        Self {
            location: record.location.clone(),
            x: record.arithmetic_intensity,
            y: record.achieved_throughput,
            weight: record.self_time_seconds,
        }
    }
}

/// Everything a renderer needs to draw one roofline diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub cohort: Cohort,
    /// Hottest loop first.
    pub points: Vec<ScatterPoint>,
    pub memory_lines: Vec<LineSeries>,
    pub compute_lines: Vec<LineSeries>,
    pub memory_domain_max: f64,
}

impl Diagram {
    /// Range of the point weights, `None` without points.
    #[must_use]
    pub fn weight_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.weight).fold(None, |acc, w| match acc {
            None => Some((w, w)),
            Some((lo, hi)) => Some((lo.min(w), hi.max(w))),
        })
    }
}

/// The vector and scalar diagrams of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramPair {
    pub vector: Diagram,
    pub scalar: Diagram,
}

impl DiagramPair {
    #[must_use]
    pub const fn get(&self, cohort: Cohort) -> &Diagram {
        match cohort {
            Cohort::Vector => &self.vector,
            Cohort::Scalar => &self.scalar,
        }
    }

    /// Vector first, then scalar.
    pub fn iter(&self) -> impl Iterator<Item = &Diagram> {
        [&self.vector, &self.scalar].into_iter()
    }
}

/// Pairs a cohort with its roofline series. No numeric transformation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramAssembler;

impl DiagramAssembler {
    #[must_use]
    pub fn assemble(cohort: Cohort, records: &[LoopRecord], series: RooflineSeries) -> Diagram {
        Diagram {
            cohort,
            points: records.iter().map(ScatterPoint::from).collect(),
            memory_lines: series.memory_lines,
            compute_lines: series.compute_lines,
            memory_domain_max: series.memory_domain_max,
        }
    }
}
