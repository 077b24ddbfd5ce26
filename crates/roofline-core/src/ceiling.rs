//! Assembly of the vector and scalar ceiling sets from parsed roofs.

use crate::classify::Cohort;
use crate::config::RoofLayout;
use crate::error::{Result, RooflineError};
use crate::roof::{RoofDefinition, RoofKind, SHARED_MEMORY_ROOF};
use serde::Serialize;
use tracing::debug;

/// The ceilings bounding one diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CeilingSet {
    pub cohort: Cohort,
    pub memory_ceilings: Vec<RoofDefinition>,
    pub compute_ceilings: Vec<RoofDefinition>,
}

impl CeilingSet {
    #[must_use]
    pub const fn empty(cohort: Cohort) -> Self {
        Self {
            cohort,
            memory_ceilings: Vec::new(),
            compute_ceilings: Vec::new(),
        }
    }

    /// Build a set from candidate roofs, routing each by kind.
    #[must_use]
    pub fn from_roofs<'a, I>(cohort: Cohort, roofs: I) -> Self
    where
        I: IntoIterator<Item = &'a RoofDefinition>,
    {
        let mut set = Self::empty(cohort);
        for roof in roofs {
            set.push(roof.clone());
        }
        set
    }

    pub fn push(&mut self, roof: RoofDefinition) {
        match roof.kind {
            RoofKind::Memory => self.memory_ceilings.push(roof),
            RoofKind::Compute => self.compute_ceilings.push(roof),
        }
    }

    /// Both kinds must be present for a diagram to exist.
    pub fn validate(&self) -> Result<()> {
        if self.memory_ceilings.is_empty() {
            return Err(RooflineError::MissingCeilingKind {
                cohort: self.cohort,
                kind: RoofKind::Memory,
            });
        }
        if self.compute_ceilings.is_empty() {
            return Err(RooflineError::MissingCeilingKind {
                cohort: self.cohort,
                kind: RoofKind::Compute,
            });
        }
        Ok(())
    }

    /// Fastest compute ceiling, normalized. `None` when there are none.
    #[must_use]
    pub fn max_compute_peak(&self) -> Option<f64> {
        self.compute_ceilings
            .iter()
            .map(RoofDefinition::normalized)
            .reduce(f64::max)
    }

    /// Slowest memory ceiling, normalized. `None` when there are none.
    #[must_use]
    pub fn min_memory_bandwidth(&self) -> Option<f64> {
        self.memory_ceilings
            .iter()
            .map(RoofDefinition::normalized)
            .reduce(f64::min)
    }
}

/// The memory roof that both ceiling sets carry, matched by exact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedCeilingRule {
    name: String,
}

impl Default for SharedCeilingRule {
    fn default() -> Self {
        Self::new(SHARED_MEMORY_ROOF)
    }
}

impl SharedCeilingRule {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn matches(&self, roof: &RoofDefinition) -> bool {
        roof.is_memory() && roof.name == self.name
    }
}

/// Result of [`CeilingSelector::partition`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CeilingSelection {
    pub vector: CeilingSet,
    pub scalar: CeilingSet,
    /// Multi-threaded roofs. Parsed and kept, but neither diagram uses them.
    pub multi_threaded: Vec<RoofDefinition>,
}

impl CeilingSelection {
    #[must_use]
    pub const fn get(&self, cohort: Cohort) -> &CeilingSet {
        match cohort {
            Cohort::Vector => &self.vector,
            Cohort::Scalar => &self.scalar,
        }
    }
}

/// Splits roofs by threading mode and instruction width.
#[derive(Debug, Clone, Default)]
pub struct CeilingSelector {
    shared: SharedCeilingRule,
}

impl CeilingSelector {
    #[must_use]
    pub fn new(layout: &RoofLayout) -> Self {
        Self::with_shared_rule(SharedCeilingRule::new(layout.shared_memory_roof.clone()))
    }

    #[must_use]
    pub const fn with_shared_rule(shared: SharedCeilingRule) -> Self {
        Self { shared }
    }

    #[must_use]
    pub const fn shared_rule(&self) -> &SharedCeilingRule {
        &self.shared
    }

    /// Build both ceiling sets without checking them.
    #[must_use]
    pub fn partition(&self, roofs: &[RoofDefinition]) -> CeilingSelection {
        let (single, multi_threaded): (Vec<_>, Vec<_>) =
            roofs.iter().cloned().partition(|r| r.is_single_threaded);
        let (scalar_candidates, vector_candidates): (Vec<_>, Vec<_>) =
            single.into_iter().partition(|r| r.is_scalar);

        let vector = CeilingSet::from_roofs(Cohort::Vector, &vector_candidates);
        let mut scalar = CeilingSet::from_roofs(Cohort::Scalar, &scalar_candidates);

        for roof in vector_candidates.iter().filter(|r| self.shared.matches(r)) {
            debug!(roof = %roof.name, "sharing memory ceiling with scalar set");
            scalar.memory_ceilings.push(roof.clone());
        }

        debug!(
            vector_memory = vector.memory_ceilings.len(),
            vector_compute = vector.compute_ceilings.len(),
            scalar_memory = scalar.memory_ceilings.len(),
            scalar_compute = scalar.compute_ceilings.len(),
            ignored_multi_threaded = multi_threaded.len(),
            "partitioned roofs"
        );

        CeilingSelection {
            vector,
            scalar,
            multi_threaded,
        }
    }

    /// Build both ceiling sets and require each to have memory and compute
    /// members. The vector set is checked first.
    pub fn select(&self, roofs: &[RoofDefinition]) -> Result<CeilingSelection> {
        let selection = self.partition(roofs);
        selection.vector.validate()?;
        selection.scalar.validate()?;
        Ok(selection)
    }
}
