//! Per-diagram presentation settings.

use roofline_core::Cohort;
use serde::{Deserialize, Serialize};

/// A text label placed at data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

impl Annotation {
    #[must_use]
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}

/// Title, labels, log-axis bounds and annotations of one diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotStyle {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub colorbar_label: String,
    pub annotations: Vec<Annotation>,
}

const X_LABEL: &str = "Arithmetic Intensity (FLOPS/Byte)";
const Y_LABEL: &str = "Performance (GFLOPS)";

impl Default for PlotStyle {
    fn default() -> Self {
        Self::vector()
    }
}

impl PlotStyle {
    /// Layout for the vectorized loops.
    #[must_use]
    pub fn vector() -> Self {
        Self {
            title: "Roofline for Vectorized loops".to_string(),
            x_label: X_LABEL.to_string(),
            y_label: Y_LABEL.to_string(),
            x_bounds: [1e-3, 50.0],
            y_bounds: [0.015, 300.0],
            colorbar_label: "Self Time".to_string(),
            annotations: vec![
                Annotation::new("DRAM", 0.004, 0.03),
                Annotation::new("L1", 0.004, 0.08),
                Annotation::new("L2", 0.004, 0.6),
                Annotation::new("L3", 0.004, 1.4),
                Annotation::new("DP Vector Add", 0.004, 60.0),
                Annotation::new("DP Vector FMA", 0.004, 110.0),
                Annotation::new("SP Vector FMA", 0.004, 210.0),
            ],
        }
    }

    /// Layout for the scalar loops.
    #[must_use]
    pub fn scalar() -> Self {
        Self {
            title: "Roofline for Scalar loops".to_string(),
            x_label: X_LABEL.to_string(),
            y_label: Y_LABEL.to_string(),
            x_bounds: [1e-3, 1.0],
            y_bounds: [0.07, 10.0],
            colorbar_label: "Self Time".to_string(),
            annotations: vec![
                Annotation::new("DRAM", 0.009, 0.1),
                Annotation::new("L1", 0.010, 0.2),
                Annotation::new("L2", 0.008, 0.3),
                Annotation::new("L3", 0.009, 1.0),
                Annotation::new("Integer Scalar Add Peak", 0.004, 8.9),
                Annotation::new("Scalar Add Peak", 0.004, 7.3),
            ],
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_x_bounds(mut self, min: f64, max: f64) -> Self {
        self.x_bounds = [min, max];
        self
    }

    #[must_use]
    pub fn with_y_bounds(mut self, min: f64, max: f64) -> Self {
        self.y_bounds = [min, max];
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }
}

/// Partial [`PlotStyle`] as written in a configuration file; absent
/// fields fall back to the cohort's preset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StyleOverrides {
    title: Option<String>,
    x_label: Option<String>,
    y_label: Option<String>,
    x_bounds: Option<[f64; 2]>,
    y_bounds: Option<[f64; 2]>,
    colorbar_label: Option<String>,
    annotations: Option<Vec<Annotation>>,
}

impl StyleOverrides {
    fn apply(self, base: PlotStyle) -> PlotStyle {
        PlotStyle {
            title: self.title.unwrap_or(base.title),
            x_label: self.x_label.unwrap_or(base.x_label),
            y_label: self.y_label.unwrap_or(base.y_label),
            x_bounds: self.x_bounds.unwrap_or(base.x_bounds),
            y_bounds: self.y_bounds.unwrap_or(base.y_bounds),
            colorbar_label: self.colorbar_label.unwrap_or(base.colorbar_label),
            annotations: self.annotations.unwrap_or(base.annotations),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawPlotConfig {
    vector: StyleOverrides,
    scalar: StyleOverrides,
    theme: Option<String>,
}

/// Styles for both diagrams, the `[plot]` configuration table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPlotConfig")]
pub struct PlotConfig {
    pub vector: PlotStyle,
    pub scalar: PlotStyle,
    /// Theme name, see [`crate::Theme::by_name`].
    pub theme: String,
}

impl From<RawPlotConfig> for PlotConfig {
    fn from(raw: RawPlotConfig) -> Self {
        let defaults = Self::default();
        Self {
            vector: raw.vector.apply(PlotStyle::vector()),
            scalar: raw.scalar.apply(PlotStyle::scalar()),
            theme: raw.theme.unwrap_or(defaults.theme),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            vector: PlotStyle::vector(),
            scalar: PlotStyle::scalar(),
            theme: "tokyo_night".to_string(),
        }
    }
}

impl PlotConfig {
    #[must_use]
    pub const fn style(&self, cohort: Cohort) -> &PlotStyle {
        match cohort {
            Cohort::Vector => &self.vector,
            Cohort::Scalar => &self.scalar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_preset() {
        let style = PlotStyle::vector();
        assert_eq!(style.title, "Roofline for Vectorized loops");
        assert_eq!(style.x_bounds, [1e-3, 50.0]);
        assert_eq!(style.y_bounds, [0.015, 300.0]);
        assert_eq!(style.annotations.len(), 7);
        assert_eq!(style.annotations[6].text, "SP Vector FMA");
    }

    #[test]
    fn test_scalar_preset() {
        let style = PlotStyle::scalar();
        assert_eq!(style.title, "Roofline for Scalar loops");
        assert_eq!(style.x_bounds, [1e-3, 1.0]);
        assert_eq!(style.y_bounds, [0.07, 10.0]);
        assert_eq!(style.colorbar_label, "Self Time");
        assert!(style.annotations.iter().any(|a| a.text == "Integer Scalar Add Peak"));
    }

    #[test]
    fn test_builders() {
        let style = PlotStyle::scalar()
            .with_title("Mine")
            .with_x_bounds(0.01, 10.0)
            .with_y_bounds(0.1, 100.0)
            .with_annotations(vec![]);
        assert_eq!(style.title, "Mine");
        assert_eq!(style.x_bounds, [0.01, 10.0]);
        assert_eq!(style.y_bounds, [0.1, 100.0]);
        assert!(style.annotations.is_empty());
    }

    #[test]
    fn test_plot_config_from_toml() {
        let config: PlotConfig = toml::from_str(
            r#"
            theme = "paper"

            [scalar]
            title = "Scalar only"
            y_bounds = [0.1, 20.0]

            [[scalar.annotations]]
            text = "DRAM"
            x = 0.01
            y = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(config.theme, "paper");
        assert_eq!(config.style(Cohort::Scalar).title, "Scalar only");
        assert_eq!(config.scalar.y_bounds, [0.1, 20.0]);
        // Unset fields keep the preset values.
        assert_eq!(config.scalar.x_bounds, [1e-3, 1.0]);
        assert_eq!(config.scalar.x_label, PlotStyle::scalar().x_label);
        assert_eq!(config.scalar.annotations.len(), 1);
        assert_eq!(config.vector, PlotStyle::vector());
    }

    #[test]
    fn test_plot_config_empty_table() {
        let config: PlotConfig = toml::from_str("").unwrap();
        assert_eq!(config, PlotConfig::default());
    }

    #[test]
    fn test_plot_config_rejects_unknown_keys() {
        assert!(toml::from_str::<PlotConfig>("[vector]\nxbounds = [1.0, 2.0]").is_err());
    }
}
