//! Survey rows and their cleanup into typed loop records.

use crate::config::SurveyLayout;
use serde::{Deserialize, Serialize};

/// One survey row as text, after column selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSurveyRow {
    pub location: String,
    pub self_time: String,
    pub loop_type: String,
    pub intensity: String,
    pub throughput: String,
}

/// A measured loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopRecord {
    /// Source line identifier.
    pub location: String,
    pub is_vectorized: bool,
    pub self_time_seconds: f64,
    /// FLOPs per byte.
    pub arithmetic_intensity: f64,
    /// GFLOP/s.
    pub achieved_throughput: f64,
}

/// Normalizes raw survey rows into [`LoopRecord`]s.
///
/// Numeric fields that are missing or fail to parse become 0. Profiler
/// exports are noisy and a single bad cell must not abort the run.
#[derive(Debug, Clone)]
pub struct RecordCleaner {
    prefix_marker: String,
    file_annotation: String,
    bracket_chars: Vec<char>,
    time_strip_chars: Vec<char>,
    vectorized_marker: String,
}

impl Default for RecordCleaner {
    fn default() -> Self {
        Self::new(&SurveyLayout::default())
    }
}

impl RecordCleaner {
    #[must_use]
    pub fn new(layout: &SurveyLayout) -> Self {
        Self {
            prefix_marker: layout.prefix_marker.clone(),
            file_annotation: layout.file_annotation.clone(),
            bracket_chars: layout.bracket_chars.chars().collect(),
            time_strip_chars: layout.time_strip_chars.chars().collect(),
            vectorized_marker: layout.vectorized_marker.clone(),
        }
    }

    /// Clean one row.
    #[must_use]
    pub fn clean(&self, raw: &RawSurveyRow) -> LoopRecord {
        LoopRecord {
            location: self.clean_location(&raw.location),
            is_vectorized: raw.loop_type.contains(&self.vectorized_marker),
            self_time_seconds: self.clean_time(&raw.self_time),
            arithmetic_intensity: lenient_f64(&raw.intensity),
            achieved_throughput: lenient_f64(&raw.throughput),
        }
    }

    /// Strip the containing-function prefix, the file annotation and brackets.
    #[must_use]
    pub fn clean_location(&self, raw: &str) -> String {
        let mut location = strip_prefix_through(raw, &self.prefix_marker).to_string();
        if !self.file_annotation.is_empty() {
            location = location.replace(&self.file_annotation, "");
        }
        location.retain(|c| !self.bracket_chars.contains(&c));
        location.trim().to_string()
    }

    /// Strip unit and comparison markers, then parse. Failure yields 0.
    #[must_use]
    pub fn clean_time(&self, raw: &str) -> f64 {
        let stripped: String = raw
            .chars()
            .filter(|c| !self.time_strip_chars.contains(c))
            .collect();
        lenient_f64(&stripped)
    }
}

/// Remove the shortest prefix that ends with `marker` and has at least one
/// character before it. Returns `text` unchanged when there is no such prefix.
fn strip_prefix_through<'a>(text: &'a str, marker: &str) -> &'a str {
    if marker.is_empty() {
        return text;
    }
    let Some(first) = text.chars().next() else {
        return text;
    };
    let start = first.len_utf8();
    match text[start..].find(marker) {
        Some(offset) => &text[start + offset + marker.len()..],
        None => text,
    }
}

fn lenient_f64(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}
