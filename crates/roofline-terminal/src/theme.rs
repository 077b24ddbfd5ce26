//! Colour gradients and the plot theme.

use crate::color::Color;

/// Multi-stop colour gradient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gradient {
    stops: Vec<Color>,
}

impl Gradient {
    #[must_use]
    pub fn new(stops: Vec<Color>) -> Self {
        Self { stops }
    }

    /// Build from hex strings. Unparsable entries are skipped.
    #[must_use]
    pub fn from_hex(stops: &[&str]) -> Self {
        Self::new(stops.iter().filter_map(|s| Color::from_hex(s).ok()).collect())
    }

    /// Violet → blue → cyan → green → yellow → red, for the time weight.
    #[must_use]
    pub fn rainbow() -> Self {
        Self::from_hex(&[
            "#8000ff", "#2c7ef8", "#2adddd", "#80ffb4", "#d4dd80", "#ff7e41", "#ff0000",
        ])
    }

    #[must_use]
    pub fn stops(&self) -> &[Color] {
        &self.stops
    }

    /// Sample at `t` in [0, 1] (clamped).
    #[must_use]
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self.stops.as_slice() {
            [] => Color::WHITE,
            [only] => *only,
            stops => {
                let segments = stops.len() - 1;
                let scaled = t * segments as f64;
                let segment = (scaled as usize).min(segments - 1);
                stops[segment].lerp(stops[segment + 1], scaled - segment as f64)
            }
        }
    }

    /// Sample `value` after min-max normalisation over `[min, max]`.
    /// A degenerate range maps to the middle of the gradient.
    #[must_use]
    pub fn sample_range(&self, value: f64, min: f64, max: f64) -> Color {
        if max > min {
            self.sample((value - min) / (max - min))
        } else {
            self.sample(0.5)
        }
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::rainbow()
    }
}

/// Colours used for the non-data parts of a diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub foreground: Color,
    pub dim: Color,
    pub memory_line: Color,
    pub compute_line: Color,
    pub annotation: Color,
    pub weight: Gradient,
}

impl Default for Theme {
    fn default() -> Self {
        Self::tokyo_night()
    }
}

impl Theme {
    /// Dark background.
    #[must_use]
    pub fn tokyo_night() -> Self {
        Self {
            name: "tokyo_night".to_string(),
            foreground: parse("#c0caf5"),
            dim: parse("#565f89"),
            memory_line: parse("#c0caf5"),
            compute_line: parse("#a9b1d6"),
            annotation: parse("#e0af68"),
            weight: Gradient::rainbow(),
        }
    }

    /// Light background; lines are black as in a printed roofline chart.
    #[must_use]
    pub fn paper() -> Self {
        Self {
            name: "paper".to_string(),
            foreground: Color::BLACK,
            dim: parse("#707070"),
            memory_line: Color::BLACK,
            compute_line: parse("#303030"),
            annotation: parse("#1f4e9c"),
            weight: Gradient::rainbow(),
        }
    }

    /// Look a theme up by name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "tokyo_night" => Some(Self::tokyo_night()),
            "paper" => Some(Self::paper()),
            _ => None,
        }
    }
}

fn parse(hex: &str) -> Color {
    Color::from_hex(hex).unwrap_or(Color::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_endpoints() {
        let g = Gradient::new(vec![Color::BLACK, Color::WHITE]);
        assert_eq!(g.sample(0.0), Color::BLACK);
        assert_eq!(g.sample(1.0), Color::WHITE);
        assert_eq!(g.sample(-3.0), Color::BLACK);
        assert_eq!(g.sample(f64::NAN), Color::BLACK);
    }

    #[test]
    fn test_sample_segments() {
        let red = Color::rgb(255, 0, 0);
        let green = Color::rgb(0, 255, 0);
        let blue = Color::rgb(0, 0, 255);
        let g = Gradient::new(vec![red, green, blue]);
        assert_eq!(g.sample(0.5), green);
        assert_eq!(g.sample(0.25), Color::rgb(128, 128, 0));
    }

    #[test]
    fn test_empty_and_single_stop() {
        assert_eq!(Gradient::new(vec![]).sample(0.3), Color::WHITE);
        let only = Color::rgb(1, 2, 3);
        assert_eq!(Gradient::new(vec![only]).sample(0.9), only);
    }

    #[test]
    fn test_rainbow_runs_violet_to_red() {
        let g = Gradient::rainbow();
        assert_eq!(g.stops().len(), 7);
        assert_eq!(g.sample(0.0), Color::rgb(128, 0, 255));
        assert_eq!(g.sample(1.0), Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_sample_range_degenerate() {
        let g = Gradient::new(vec![Color::BLACK, Color::WHITE]);
        assert_eq!(g.sample_range(5.0, 5.0, 5.0), Color::rgb(128, 128, 128));
        assert_eq!(g.sample_range(10.0, 0.0, 10.0), Color::WHITE);
    }

    #[test]
    fn test_theme_by_name() {
        assert_eq!(Theme::by_name("paper").unwrap().memory_line, Color::BLACK);
        assert!(Theme::by_name("solarized").is_none());
        assert_eq!(Theme::default().name, "tokyo_night");
    }
}
