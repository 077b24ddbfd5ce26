//! Input layout and builder configuration.
//!
//! Defaults reproduce the column layout of an Intel Advisor survey export and
//! its roofs export. Every section can be overridden from TOML:
//!
//! ```
//! use roofline_core::RooflineConfig;
//!
//! let config = RooflineConfig::from_toml_str(
//!     r#"
//!     [survey]
//!     skip_rows = 3
//!
//!     [builder]
//!     samples = 200
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.survey.skip_rows, 3);
//! assert_eq!(config.builder.samples, 200);
//! assert_eq!(config.roofs.scalar_marker, "Scalar");
//! ```

use crate::error::{Result, RooflineError};
use crate::roof::SHARED_MEMORY_ROOF;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RooflineConfig {
    /// Survey table layout and cleaning rules.
    pub survey: SurveyLayout,
    /// Roofs table layout and naming conventions.
    pub roofs: RoofLayout,
    /// Line sampling.
    pub builder: BuilderConfig,
}

impl RooflineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| RooflineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.survey.validate()?;
        self.roofs.validate()?;
        self.builder.validate()
    }
}

/// Column layout of the survey export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyLayout {
    /// Metadata lines preceding the header line.
    pub skip_rows: usize,
    /// Field delimiter (ASCII).
    pub delimiter: char,
    /// Zero-based positions of the columns to keep. The first is the location.
    pub columns: Vec<usize>,
    pub time_column: String,
    pub type_column: String,
    pub intensity_column: String,
    pub throughput_column: String,
    /// Substring of the type field marking a vectorized loop.
    pub vectorized_marker: String,
    /// Location prefix is removed up to and including this token.
    pub prefix_marker: String,
    /// Trailing source-file annotation removed from the location.
    pub file_annotation: String,
    /// Characters removed from the location.
    pub bracket_chars: String,
    /// Unit and comparison characters removed from the time field.
    pub time_strip_chars: String,
}

impl Default for SurveyLayout {
    fn default() -> Self {
        Self {
            skip_rows: 5,
            delimiter: ',',
            columns: vec![2, 7, 8, 11, 48, 50, 53, 55],
            time_column: "Self Time".to_string(),
            type_column: "Type".to_string(),
            intensity_column: "Self AI".to_string(),
            throughput_column: "Self GFLOPS".to_string(),
            vectorized_marker: "Vectorized".to_string(),
            prefix_marker: "in".to_string(),
            file_annotation: "at DLMUSN.f90".to_string(),
            bracket_chars: "]".to_string(),
            time_strip_chars: "s<>".to_string(),
        }
    }
}

impl SurveyLayout {
    fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(RooflineError::InvalidConfig(
                "survey.columns must select at least one column".to_string(),
            ));
        }
        if self.vectorized_marker.is_empty() {
            return Err(RooflineError::InvalidConfig(
                "survey.vectorized_marker must not be empty".to_string(),
            ));
        }
        delimiter_byte(self.delimiter).map(|_| ())
    }
}

/// Column layout and naming conventions of the roofs export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoofLayout {
    /// Metadata lines preceding the header line.
    pub skip_rows: usize,
    /// Field delimiter (ASCII).
    pub delimiter: char,
    pub name_column: String,
    pub type_column: String,
    pub value_column: String,
    /// Substring of a roof name marking a single-threaded limit.
    pub single_threaded_marker: String,
    /// Substring of a roof name marking a scalar-only limit.
    pub scalar_marker: String,
    /// Exact name of the memory roof shared by the vector and scalar diagrams.
    pub shared_memory_roof: String,
}

impl Default for RoofLayout {
    fn default() -> Self {
        Self {
            skip_rows: 0,
            delimiter: ',',
            name_column: "Name".to_string(),
            type_column: "Type".to_string(),
            value_column: "Bandwidth".to_string(),
            single_threaded_marker: "single-threaded".to_string(),
            scalar_marker: "Scalar".to_string(),
            shared_memory_roof: SHARED_MEMORY_ROOF.to_string(),
        }
    }
}

impl RoofLayout {
    fn validate(&self) -> Result<()> {
        if self.single_threaded_marker.is_empty() || self.scalar_marker.is_empty() {
            return Err(RooflineError::InvalidConfig(
                "roofs markers must not be empty".to_string(),
            ));
        }
        delimiter_byte(self.delimiter).map(|_| ())
    }
}

/// Sampling of the ceiling lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Points per line.
    pub samples: usize,
    /// Upper bound of the compute-horizontal x-domain.
    pub compute_domain_max: f64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            samples: 50,
            compute_domain_max: 100.0,
        }
    }
}

impl BuilderConfig {
    fn validate(&self) -> Result<()> {
        if self.samples < 2 {
            return Err(RooflineError::InvalidConfig(format!(
                "builder.samples must be at least 2, got {}",
                self.samples
            )));
        }
        if !self.compute_domain_max.is_finite() || self.compute_domain_max <= 0.0 {
            return Err(RooflineError::InvalidConfig(format!(
                "builder.compute_domain_max must be finite and positive, got {}",
                self.compute_domain_max
            )));
        }
        Ok(())
    }
}

pub(crate) fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            RooflineError::InvalidConfig(format!("delimiter {delimiter:?} is not ASCII"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RooflineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_survey_columns() {
        let layout = SurveyLayout::default();
        assert_eq!(layout.columns, vec![2, 7, 8, 11, 48, 50, 53, 55]);
        assert_eq!(layout.skip_rows, 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RooflineConfig::from_toml_str("[roofs]\nscalar_marker = \"Int\"\n").unwrap();
        assert_eq!(config.roofs.scalar_marker, "Int");
        assert_eq!(config.roofs.name_column, "Name");
        assert_eq!(config.survey, SurveyLayout::default());
    }

    #[test]
    fn test_rejects_too_few_samples() {
        let err = RooflineConfig::from_toml_str("[builder]\nsamples = 1\n").unwrap_err();
        assert!(matches!(err, RooflineError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_non_positive_domain() {
        let err =
            RooflineConfig::from_toml_str("[builder]\ncompute_domain_max = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("compute_domain_max"));
    }

    #[test]
    fn test_rejects_empty_columns() {
        let err = RooflineConfig::from_toml_str("[survey]\ncolumns = []\n").unwrap_err();
        assert!(err.to_string().contains("survey.columns"));
    }

    #[test]
    fn test_rejects_non_ascii_delimiter() {
        let err = RooflineConfig::from_toml_str("[roofs]\ndelimiter = \"§\"\n").unwrap_err();
        assert!(matches!(err, RooflineError::InvalidConfig(_)));
    }

    #[test]
    fn test_semicolon_delimiter() {
        assert_eq!(delimiter_byte(';').unwrap(), b';');
    }

    #[test]
    fn test_load_missing_file() {
        let err = RooflineConfig::load("/nonexistent/roofline.toml").unwrap_err();
        assert!(matches!(err, RooflineError::Io { .. }));
    }
}
