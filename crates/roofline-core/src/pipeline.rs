//! End-to-end run: raw tables in, diagram pair out.

use crate::builder::RooflineBuilder;
use crate::ceiling::CeilingSelector;
use crate::classify::{Cohort, LoopClassifier};
use crate::config::RooflineConfig;
use crate::diagram::{DiagramAssembler, DiagramPair};
use crate::error::Result;
use crate::record::{LoopRecord, RecordCleaner};
use crate::roof::{RoofDefinition, RoofParser};
use crate::table::{RoofReader, SurveyReader};
use std::path::Path;
use tracing::info;

/// Runs the cleaner, parser, classifier, selector, builder and assembler in
/// order. Any error aborts the run; there is no partial output.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: RooflineConfig,
    cleaner: RecordCleaner,
    parser: RoofParser,
    selector: CeilingSelector,
    builder: RooflineBuilder,
}

impl Pipeline {
    pub fn new(config: RooflineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cleaner: RecordCleaner::new(&config.survey),
            parser: RoofParser::new(&config.roofs),
            selector: CeilingSelector::new(&config.roofs),
            builder: RooflineBuilder::new(&config.builder),
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &RooflineConfig {
        &self.config
    }

    /// Read and clean survey rows from text.
    pub fn records_from_str(&self, survey: &str) -> Result<Vec<LoopRecord>> {
        let rows = SurveyReader::new(&self.config.survey).read_str(survey)?;
        Ok(rows.iter().map(|row| self.cleaner.clean(row)).collect())
    }

    /// Read and parse roof rows from text.
    pub fn roofs_from_str(&self, roofs: &str) -> Result<Vec<RoofDefinition>> {
        let rows = RoofReader::new(&self.config.roofs).read_str(roofs)?;
        self.parser.parse_all(&rows)
    }

    /// Classify, select, build and assemble.
    pub fn diagrams(
        &self,
        records: Vec<LoopRecord>,
        roofs: &[RoofDefinition],
    ) -> Result<DiagramPair> {
        let total = records.len();
        let cohorts = LoopClassifier::classify(records);
        info!(
            records = total,
            vectorized = cohorts.vectorized.len(),
            scalar = cohorts.scalar.len(),
            "classified survey loops"
        );

        let selection = self.selector.select(roofs)?;
        if !selection.multi_threaded.is_empty() {
            info!(
                count = selection.multi_threaded.len(),
                "multi-threaded roofs are not drawn"
            );
        }

        let vector_series = self.builder.build(&selection.vector)?;
        let scalar_series = self.builder.build(&selection.scalar)?;
        info!(
            vector_domain = vector_series.memory_domain_max,
            scalar_domain = scalar_series.memory_domain_max,
            "built roofline ceilings"
        );

        Ok(DiagramPair {
            vector: DiagramAssembler::assemble(Cohort::Vector, &cohorts.vectorized, vector_series),
            scalar: DiagramAssembler::assemble(Cohort::Scalar, &cohorts.scalar, scalar_series),
        })
    }

    pub fn run_str(&self, survey: &str, roofs: &str) -> Result<DiagramPair> {
        let records = self.records_from_str(survey)?;
        let roofs = self.roofs_from_str(roofs)?;
        self.diagrams(records, &roofs)
    }

    pub fn run_paths(&self, survey: &Path, roofs: &Path) -> Result<DiagramPair> {
        info!(survey = %survey.display(), roofs = %roofs.display(), "reading inputs");
        let rows = SurveyReader::new(&self.config.survey).read_path(survey)?;
        let records = rows.iter().map(|row| self.cleaner.clean(row)).collect();
        let raw_roofs = RoofReader::new(&self.config.roofs).read_path(roofs)?;
        let roofs = self.parser.parse_all(&raw_roofs)?;
        self.diagrams(records, &roofs)
    }
}
