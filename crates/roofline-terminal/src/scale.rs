//! Logarithmic axis scale.

use crate::error::RenderError;

/// Maps `[min, max]` onto `[0, 1]` in log10 space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    min: f64,
    max: f64,
    log_min: f64,
    log_span: f64,
}

impl LogScale {
    /// Requires `0 < min < max`, both finite.
    pub fn new(axis: &'static str, min: f64, max: f64) -> Result<Self, RenderError> {
        if !(min.is_finite() && max.is_finite() && min > 0.0 && max > min) {
            return Err(RenderError::InvalidAxis { axis, min, max });
        }
        let log_min = min.log10();
        Ok(Self {
            min,
            max,
            log_min,
            log_span: max.log10() - log_min,
        })
    }

    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Position of `value` in [0, 1], or `None` if it cannot be shown
    /// (non-positive, non-finite, or outside the bounds).
    #[must_use]
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if !value.is_finite() || value < self.min || value > self.max {
            return None;
        }
        Some((value.log10() - self.log_min) / self.log_span)
    }

    /// Like [`Self::normalize`] but without the bounds check, for clipping
    /// line segments that leave the plot.
    #[must_use]
    pub fn normalize_unclamped(&self, value: f64) -> Option<f64> {
        (value.is_finite() && value > 0.0).then(|| (value.log10() - self.log_min) / self.log_span)
    }

    /// Integer powers of ten inside the bounds.
    #[must_use]
    pub fn ticks(&self) -> Vec<f64> {
        let first = (self.min.log10() - 1e-9).ceil() as i32;
        let last = (self.max.log10() + 1e-9).floor() as i32;
        (first..=last).map(|e| 10f64.powi(e)).collect()
    }
}

/// Compact tick label: `0.001`, `0.1`, `1`, `100`, `1e4`.
#[must_use]
pub fn format_tick(value: f64) -> String {
    let exponent = value.log10().round() as i32;
    match exponent {
        -3..=-1 => format!("{value:.*}", exponent.unsigned_abs() as usize),
        0..=3 => format!("{value:.0}"),
        _ => format!("1e{exponent}"),
    }
}
