//! Hardware roof definitions and their parser.

use crate::config::RoofLayout;
use crate::error::{Result, RooflineError, Table};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the single-threaded DRAM bandwidth roof. Memory bandwidth does not
/// depend on instruction width, so this roof belongs to both ceiling sets.
pub const SHARED_MEMORY_ROOF: &str = "DRAM Bandwidth (single-threaded)";

/// Divisor taking bytes/s and FLOP/s to the GB/s and GFLOP/s plot scale.
pub const GIGA: f64 = 1e9;

/// Whether a roof bounds memory traffic or arithmetic throughput.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoofKind {
    Memory,
    Compute,
}

impl RoofKind {
    /// Parse the export's type field ("memory" | "compute").
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("memory") {
            Some(Self::Memory)
        } else if raw.eq_ignore_ascii_case("compute") {
            Some(Self::Compute)
        } else {
            None
        }
    }
}

impl fmt::Display for RoofKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Compute => f.write_str("compute"),
        }
    }
}

/// One roof row as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRoofRow {
    pub name: String,
    pub kind: String,
    pub value: String,
    /// Line number in the source file, for error reporting.
    pub line: u64,
}

/// A named hardware limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofDefinition {
    pub name: String,
    pub kind: RoofKind,
    pub is_single_threaded: bool,
    pub is_scalar: bool,
    /// Bytes/s for memory roofs, FLOP/s for compute roofs.
    pub bandwidth_or_peak: f64,
}

impl RoofDefinition {
    /// The value on the GB/s or GFLOP/s scale.
    #[must_use]
    pub fn normalized(&self) -> f64 {
        self.bandwidth_or_peak / GIGA
    }

    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self.kind, RoofKind::Memory)
    }

    #[must_use]
    pub const fn is_compute(&self) -> bool {
        matches!(self.kind, RoofKind::Compute)
    }
}

/// Turns [`RawRoofRow`]s into [`RoofDefinition`]s.
///
/// Values are kept in native units; normalization happens where they are used.
#[derive(Debug, Clone)]
pub struct RoofParser {
    single_threaded_marker: String,
    scalar_marker: String,
}

impl Default for RoofParser {
    fn default() -> Self {
        Self::new(&RoofLayout::default())
    }
}

impl RoofParser {
    #[must_use]
    pub fn new(layout: &RoofLayout) -> Self {
        Self {
            single_threaded_marker: layout.single_threaded_marker.clone(),
            scalar_marker: layout.scalar_marker.clone(),
        }
    }

    pub fn parse(&self, raw: &RawRoofRow) -> Result<RoofDefinition> {
        let kind = RoofKind::parse(&raw.kind).ok_or_else(|| {
            RooflineError::malformed(
                Table::Roofs,
                raw.line,
                format!("unknown roof type '{}' for '{}'", raw.kind.trim(), raw.name),
            )
        })?;

        let value = raw.value.trim();
        let bandwidth_or_peak = value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| {
                RooflineError::malformed(
                    Table::Roofs,
                    raw.line,
                    format!("invalid bandwidth '{value}' for '{}'", raw.name),
                )
            })?;

        Ok(RoofDefinition {
            is_single_threaded: raw.name.contains(&self.single_threaded_marker),
            is_scalar: raw.name.contains(&self.scalar_marker),
            name: raw.name.clone(),
            kind,
            bandwidth_or_peak,
        })
    }

    /// Parse every row, failing on the first malformed one.
    pub fn parse_all<'a, I>(&self, rows: I) -> Result<Vec<RoofDefinition>>
    where
        I: IntoIterator<Item = &'a RawRoofRow>,
    {
        rows.into_iter().map(|raw| self.parse(raw)).collect()
    }
}
