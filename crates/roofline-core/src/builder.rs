//! Roofline line construction.
//!
//! Memory ceilings become diagonals through the origin (y = x * bandwidth),
//! compute ceilings become horizontals (y = peak). Sampling is linear on
//! purpose: the renderer applies the log transform, and a line sampled
//! linearly stays straight under it.

use crate::ceiling::CeilingSet;
use crate::config::BuilderConfig;
use crate::error::{Result, RooflineError};
use crate::roof::{RoofDefinition, RoofKind};
use serde::{Deserialize, Serialize};

/// One sampled ceiling line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    /// Name of the roof this line was derived from.
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl LineSeries {
    /// Iterate over `(x, y)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// All lines of one diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RooflineSeries {
    pub memory_lines: Vec<LineSeries>,
    pub compute_lines: Vec<LineSeries>,
    /// Arithmetic intensity where the fastest compute ceiling meets the
    /// slowest memory ceiling; the memory diagonals end here.
    pub memory_domain_max: f64,
}

/// `samples` evenly spaced values from `start` to `stop`, both inclusive.
#[must_use]
pub fn linspace(start: f64, stop: f64, samples: usize) -> Vec<f64> {
    match samples {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (stop - start) / (n - 1) as f64;
            let mut xs: Vec<f64> = (0..n).map(|i| (i as f64).mul_add(step, start)).collect();
            xs[n - 1] = stop;
            xs
        }
    }
}

/// Computes the line families for a ceiling set.
#[derive(Debug, Clone)]
pub struct RooflineBuilder {
    samples: usize,
    compute_domain_max: f64,
}

impl Default for RooflineBuilder {
    fn default() -> Self {
        Self::new(&BuilderConfig::default())
    }
}

impl RooflineBuilder {
    #[must_use]
    pub fn new(config: &BuilderConfig) -> Self {
        Self {
            samples: config.samples,
            compute_domain_max: config.compute_domain_max,
        }
    }

    /// `max(compute peaks) / min(memory bandwidths)`, normalized.
    pub fn memory_domain_max(&self, set: &CeilingSet) -> Result<f64> {
        let peak = set.max_compute_peak().ok_or(RooflineError::MissingCeilingKind {
            cohort: set.cohort,
            kind: RoofKind::Compute,
        })?;
        let bandwidth = set
            .min_memory_bandwidth()
            .ok_or(RooflineError::MissingCeilingKind {
                cohort: set.cohort,
                kind: RoofKind::Memory,
            })?;
        let bound = peak / bandwidth;
        if bound.is_finite() && bound > 0.0 {
            Ok(bound)
        } else {
            Err(RooflineError::DegenerateDomain {
                cohort: set.cohort,
                bound,
            })
        }
    }

    pub fn build(&self, set: &CeilingSet) -> Result<RooflineSeries> {
        set.validate()?;
        let memory_domain_max = self.memory_domain_max(set)?;

        let memory_x = linspace(0.0, memory_domain_max, self.samples);
        let memory_lines = set
            .memory_ceilings
            .iter()
            .map(|roof| diagonal(roof, &memory_x))
            .collect();

        let compute_x = linspace(0.0, self.compute_domain_max, self.samples);
        let compute_lines = set
            .compute_ceilings
            .iter()
            .map(|roof| horizontal(roof, &compute_x))
            .collect();

        tracing::debug!(
            cohort = %set.cohort,
            memory_domain_max,
            samples = self.samples,
            "built roofline series"
        );

        Ok(RooflineSeries {
            memory_lines,
            compute_lines,
            memory_domain_max,
        })
    }
}

fn diagonal(roof: &RoofDefinition, xs: &[f64]) -> LineSeries {
    let bandwidth = roof.normalized();
    LineSeries {
        name: roof.name.clone(),
        x: xs.to_vec(),
        y: xs.iter().map(|x| x * bandwidth).collect(),
    }
}

fn horizontal(roof: &RoofDefinition, xs: &[f64]) -> LineSeries {
    LineSeries {
        name: roof.name.clone(),
        x: xs.to_vec(),
        y: vec![roof.normalized(); xs.len()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Cohort;
    use proptest::prelude::*;

    fn roof(name: &str, kind: RoofKind, value: f64) -> RoofDefinition {
        RoofDefinition {
            name: name.to_string(),
            kind,
            is_single_threaded: true,
            is_scalar: false,
            bandwidth_or_peak: value,
        }
    }

    fn set(memory: &[f64], compute: &[f64]) -> CeilingSet {
        let mut set = CeilingSet::empty(Cohort::Vector);
        for (i, &b) in memory.iter().enumerate() {
            set.push(roof(&format!("mem{i}"), RoofKind::Memory, b));
        }
        for (i, &p) in compute.iter().enumerate() {
            set.push(roof(&format!("cmp{i}"), RoofKind::Compute, p));
        }
        set
    }

    #[test]
    fn test_linspace_matches_endpoints() {
        let xs = linspace(0.0, 100.0, 50);
        assert_eq!(xs.len(), 50);
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[49], 100.0);
        assert!((xs[1] - 100.0 / 49.0).abs() < 1e-12);
    }

    #[test]
    fn test_linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 1.0, 1), vec![3.0]);
    }

    #[test]
    fn test_build_line_counts() {
        let series = RooflineBuilder::default()
            .build(&set(&[1e10, 2e11], &[5e9, 1.1e11, 2.1e11]))
            .unwrap();
        assert_eq!(series.memory_lines.len(), 2);
        assert_eq!(series.compute_lines.len(), 3);
        assert!(series.memory_lines.iter().all(|l| l.x.len() == 50));
    }

    #[test]
    fn test_memory_domain_bound() {
        let series = RooflineBuilder::default()
            .build(&set(&[1e10, 2e11], &[5e9, 2e11]))
            .unwrap();
        assert_eq!(series.memory_domain_max, 20.0);
        assert_eq!(*series.memory_lines[0].x.last().unwrap(), 20.0);
    }

    #[test]
    fn test_compute_domain_is_fixed() {
        let builder = RooflineBuilder::new(&BuilderConfig {
            samples: 11,
            compute_domain_max: 10.0,
        });
        let series = builder.build(&set(&[1e10], &[5e9])).unwrap();
        assert_eq!(series.compute_lines[0].x, linspace(0.0, 10.0, 11));
        assert!(series.compute_lines[0].y.iter().all(|&y| y == 5.0));
    }

    #[test]
    fn test_build_requires_both_kinds() {
        let err = RooflineBuilder::default().build(&set(&[1e10], &[])).unwrap_err();
        assert!(matches!(
            err,
            RooflineError::MissingCeilingKind {
                kind: RoofKind::Compute,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_bandwidth_is_degenerate() {
        let err = RooflineBuilder::default()
            .build(&set(&[0.0], &[5e9]))
            .unwrap_err();
        assert!(matches!(err, RooflineError::DegenerateDomain { .. }));
    }

    #[test]
    fn test_all_zero_compute_peaks_are_degenerate() {
        let err = RooflineBuilder::default()
            .build(&set(&[2e9], &[0.0, 0.0]))
            .unwrap_err();
        assert!(matches!(
            err,
            RooflineError::DegenerateDomain { bound, .. } if bound == 0.0
        ));
    }

    #[test]
    fn test_points_iterates_pairs() {
        let series = RooflineBuilder::default().build(&set(&[2e9], &[4e9])).unwrap();
        let first: Vec<_> = series.memory_lines[0].points().take(2).collect();
        assert_eq!(first[0], (0.0, 0.0));
        assert_eq!(first[1].1, first[1].0 * 2.0);
    }

    fn arb_set() -> impl Strategy<Value = CeilingSet> {
        (
            prop::collection::vec(1.0e8f64..1.0e12, 1..6),
            prop::collection::vec(1.0e8f64..1.0e13, 1..6),
        )
            .prop_map(|(memory, compute)| set(&memory, &compute))
    }

    proptest! {
        #[test]
        fn prop_diagonal_identity(set in arb_set(), samples in 2usize..200) {
            let builder = RooflineBuilder::new(&BuilderConfig { samples, compute_domain_max: 100.0 });
            let series = builder.build(&set).unwrap();
            for (line, roof) in series.memory_lines.iter().zip(&set.memory_ceilings) {
                let b = roof.normalized();
                prop_assert_eq!(line.x.len(), samples);
                for (x, y) in line.points() {
                    prop_assert!((y - x * b).abs() <= f64::EPSILON * (x * b).abs());
                }
            }
        }

        #[test]
        fn prop_horizontal_identity(set in arb_set()) {
            let series = RooflineBuilder::default().build(&set).unwrap();
            for (line, roof) in series.compute_lines.iter().zip(&set.compute_ceilings) {
                let p = roof.normalized();
                prop_assert!(line.y.iter().all(|&y| y == p));
            }
        }

        #[test]
        fn prop_domain_bound(set in arb_set()) {
            let series = RooflineBuilder::default().build(&set).unwrap();
            let max_peak = set.compute_ceilings.iter().map(RoofDefinition::normalized).fold(f64::MIN, f64::max);
            let min_bw = set.memory_ceilings.iter().map(RoofDefinition::normalized).fold(f64::MAX, f64::min);
            let expected = max_peak / min_bw;
            prop_assert!((series.memory_domain_max - expected).abs() <= 1e-12 * expected);
            for line in &series.memory_lines {
                prop_assert_eq!(line.x.last().copied(), Some(series.memory_domain_max));
            }
        }
    }
}
