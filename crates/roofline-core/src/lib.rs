//! Roofline ceiling construction and loop classification.
//!
//! This crate turns two profiler exports into two roofline diagrams:
//! - a per-loop survey: [`SurveyReader`] → [`RecordCleaner`] → [`LoopRecord`]
//! - a list of hardware roofs: [`RoofReader`] → [`RoofParser`] → [`RoofDefinition`]
//!
//! Loops are split into vectorized and scalar [`Cohorts`] by
//! [`LoopClassifier`]; roofs into vector and scalar [`CeilingSet`]s by
//! [`CeilingSelector`]. [`RooflineBuilder`] samples each set into memory
//! diagonals and compute horizontals, and [`DiagramAssembler`] pairs the two
//! into a [`Diagram`] for a renderer. [`Pipeline`] runs the whole chain.
//!
//! # Example
//!
//! ```
//! use roofline_core::{Pipeline, RooflineConfig};
//!
//! let mut config = RooflineConfig::default();
//! config.survey.skip_rows = 0;
//! config.survey.columns = vec![0, 1, 2, 3, 4];
//!
//! let survey = "\
//! Loop,Self Time,Type,Self AI,Self GFLOPS
//! [loop in axpy at DLMUSN.f90:12],1.25s,Vectorized (Body),0.08,1.9
//! [loop in init at DLMUSN.f90:40],0.5s,Scalar,0.02,0.1
//! ";
//! let roofs = "\
//! Name,Type,Bandwidth
//! DRAM Bandwidth (single-threaded),memory,1.2e10
//! L1 Bandwidth (single-threaded),memory,2.0e11
//! DP Vector FMA Peak (single-threaded),compute,1.1e11
//! Scalar Add Peak (single-threaded),compute,7.3e9
//! ";
//!
//! let pipeline = Pipeline::new(config).unwrap();
//! let diagrams = pipeline.run_str(survey, roofs).unwrap();
//! assert_eq!(diagrams.vector.points[0].location, "axpy :12");
//! assert_eq!(diagrams.scalar.memory_lines.len(), 1);
//! ```

mod builder;
mod ceiling;
mod classify;
mod config;
mod diagram;
mod error;
mod pipeline;
mod record;
mod roof;
mod table;

pub use builder::{linspace, LineSeries, RooflineBuilder, RooflineSeries};
pub use ceiling::{CeilingSelection, CeilingSelector, CeilingSet, SharedCeilingRule};
pub use classify::{Cohort, Cohorts, LoopClassifier};
pub use config::{BuilderConfig, RoofLayout, RooflineConfig, SurveyLayout};
pub use diagram::{Diagram, DiagramAssembler, DiagramPair, ScatterPoint};
pub use error::{Result, RooflineError, Table};
pub use pipeline::Pipeline;
pub use record::{LoopRecord, RawSurveyRow, RecordCleaner};
pub use roof::{RawRoofRow, RoofDefinition, RoofKind, RoofParser, GIGA, SHARED_MEMORY_ROOF};
pub use table::{RoofReader, SurveyReader};
