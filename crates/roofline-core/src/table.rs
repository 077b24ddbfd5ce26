//! Delimited-file readers for the survey and roofs exports.
//!
//! Both readers skip a fixed number of leading metadata lines, read one
//! header line, and hand back text rows. Typing happens downstream in
//! [`crate::RecordCleaner`] and [`crate::RoofParser`].

use crate::config::{delimiter_byte, RoofLayout, SurveyLayout};
use crate::error::{Result, RooflineError, Table};
use crate::record::RawSurveyRow;
use crate::roof::RawRoofRow;
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

/// Reads survey rows, selecting columns by position.
#[derive(Debug, Clone)]
pub struct SurveyReader<'a> {
    layout: &'a SurveyLayout,
}

/// Positions of the fields a survey row needs, within the full row.
#[derive(Debug, Clone, Copy)]
struct SurveyColumns {
    location: usize,
    time: usize,
    loop_type: usize,
    intensity: usize,
    throughput: usize,
    required_len: usize,
}

impl<'a> SurveyReader<'a> {
    #[must_use]
    pub const fn new(layout: &'a SurveyLayout) -> Self {
        Self { layout }
    }

    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Vec<RawSurveyRow>> {
        self.read_str(&read_to_string(path.as_ref())?)
    }

    pub fn read_str(&self, text: &str) -> Result<Vec<RawSurveyRow>> {
        let (body, skipped) = skip_lines(text, self.layout.skip_rows);
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter_byte(self.layout.delimiter)?)
            .has_headers(true)
            .flexible(true)
            .from_reader(body.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| csv_error(Table::Survey, skipped, &e))?
            .clone();
        let columns = self.resolve_columns(&headers, skipped + 1)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| csv_error(Table::Survey, skipped, &e))?;
            let line = record_line(&record, skipped);
            if record.len() < columns.required_len {
                return Err(RooflineError::malformed(
                    Table::Survey,
                    line,
                    format!(
                        "expected at least {} fields, found {}",
                        columns.required_len,
                        record.len()
                    ),
                ));
            }
            let field = |i: usize| record.get(i).unwrap_or_default().to_string();
            rows.push(RawSurveyRow {
                location: field(columns.location),
                self_time: field(columns.time),
                loop_type: field(columns.loop_type),
                intensity: field(columns.intensity),
                throughput: field(columns.throughput),
            });
        }

        tracing::debug!(rows = rows.len(), skipped, "read survey table");
        Ok(rows)
    }

    fn resolve_columns(&self, headers: &StringRecord, header_line: u64) -> Result<SurveyColumns> {
        let selected = &self.layout.columns;
        let Some(&location) = selected.first() else {
            return Err(RooflineError::InvalidConfig(
                "survey.columns must select at least one column".to_string(),
            ));
        };
        let required_len = selected.iter().max().map_or(0, |&max| max + 1);
        if headers.len() < required_len {
            return Err(RooflineError::malformed(
                Table::Survey,
                header_line,
                format!(
                    "header has {} fields, column selection needs {required_len}",
                    headers.len()
                ),
            ));
        }

        // The first selected column is relabelled as the location, so names are
        // only looked up among the rest.
        let find = |name: &str| -> Result<usize> {
            selected[1..]
                .iter()
                .copied()
                .find(|&i| headers.get(i).is_some_and(|h| h.trim() == name))
                .ok_or_else(|| RooflineError::MissingColumn {
                    table: Table::Survey,
                    column: name.to_string(),
                })
        };

        Ok(SurveyColumns {
            location,
            time: find(&self.layout.time_column)?,
            loop_type: find(&self.layout.type_column)?,
            intensity: find(&self.layout.intensity_column)?,
            throughput: find(&self.layout.throughput_column)?,
            required_len,
        })
    }
}

/// Reads roof rows, locating columns by header name.
#[derive(Debug, Clone)]
pub struct RoofReader<'a> {
    layout: &'a RoofLayout,
}

impl<'a> RoofReader<'a> {
    #[must_use]
    pub const fn new(layout: &'a RoofLayout) -> Self {
        Self { layout }
    }

    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Vec<RawRoofRow>> {
        self.read_str(&read_to_string(path.as_ref())?)
    }

    pub fn read_str(&self, text: &str) -> Result<Vec<RawRoofRow>> {
        let (body, skipped) = skip_lines(text, self.layout.skip_rows);
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter_byte(self.layout.delimiter)?)
            .has_headers(true)
            .flexible(true)
            .from_reader(body.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| csv_error(Table::Roofs, skipped, &e))?
            .clone();
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| RooflineError::MissingColumn {
                    table: Table::Roofs,
                    column: name.to_string(),
                })
        };
        let name = find(&self.layout.name_column)?;
        let kind = find(&self.layout.type_column)?;
        let value = find(&self.layout.value_column)?;
        let required_len = name.max(kind).max(value) + 1;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| csv_error(Table::Roofs, skipped, &e))?;
            let line = record_line(&record, skipped);
            if record.len() < required_len {
                return Err(RooflineError::malformed(
                    Table::Roofs,
                    line,
                    format!(
                        "expected at least {required_len} fields, found {}",
                        record.len()
                    ),
                ));
            }
            let field = |i: usize| record.get(i).unwrap_or_default().to_string();
            rows.push(RawRoofRow {
                name: field(name),
                kind: field(kind),
                value: field(value),
                line,
            });
        }

        tracing::debug!(rows = rows.len(), skipped, "read roofs table");
        Ok(rows)
    }
}

fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| RooflineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Drop the first `count` lines. Returns the rest and how many were dropped.
fn skip_lines(text: &str, count: usize) -> (&str, u64) {
    let mut rest = text;
    let mut skipped = 0;
    while skipped < count as u64 {
        match rest.find('\n') {
            Some(end) => {
                rest = &rest[end + 1..];
                skipped += 1;
            }
            None => {
                rest = "";
                skipped += 1;
                break;
            }
        }
    }
    (rest, skipped)
}

fn record_line(record: &StringRecord, skipped: u64) -> u64 {
    record.position().map_or(0, |p| p.line() + skipped)
}

fn csv_error(table: Table, skipped: u64, err: &csv::Error) -> RooflineError {
    let line = err.position().map_or(0, |p| p.line() + skipped);
    RooflineError::malformed(table, line, err.to_string())
}
