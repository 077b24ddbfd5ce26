//! Error types for roofline-core.

use crate::classify::Cohort;
use crate::roof::RoofKind;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RooflineError>;

/// Which input table an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// Per-loop survey export.
    Survey,
    /// Hardware roof (ceiling) export.
    Roofs,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Survey => f.write_str("survey"),
            Self::Roofs => f.write_str("roofs"),
        }
    }
}

/// Errors that abort diagram generation.
#[derive(Debug, Error)]
pub enum RooflineError {
    /// An input file could not be opened or read.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be read into the expected column shape.
    #[error("Malformed row in {table} table at line {line}: {message}")]
    MalformedRow {
        table: Table,
        line: u64,
        message: String,
    },

    /// A required header is not among the selected columns.
    #[error("Missing column '{column}' in {table} table")]
    MissingColumn { table: Table, column: String },

    /// A ceiling set lacks a memory or compute member after selection.
    #[error("The {cohort} ceiling set has no {kind} ceiling")]
    MissingCeilingKind { cohort: Cohort, kind: RoofKind },

    /// The memory-diagonal x-domain bound is not a finite positive number.
    #[error("Degenerate x-domain for the {cohort} ceiling set: upper bound {bound}")]
    DegenerateDomain { cohort: Cohort, bound: f64 },

    /// Configuration values failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file is not valid TOML for [`crate::RooflineConfig`].
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl RooflineError {
    pub(crate) fn malformed(table: Table, line: u64, message: impl Into<String>) -> Self {
        Self::MalformedRow {
            table,
            line,
            message: message.into(),
        }
    }
}
