use crate::prelude::{AnalysisError, AnalysisResult};
use chrono::{DateTime, NaiveDateTime};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const VALUE_COLUMN: &str = "Value";
pub const TIMESTAMP_COLUMN: &str = "Timestamp";

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

#[derive(Debug, Clone)]
struct RawColumn {
    name: String,
    cells: Vec<String>,
}

/// Header-addressed CSV capture, kept as raw cells until a column is asked for.
#[derive(Debug, Clone)]
pub struct SampleTable {
    source: String,
    columns: Vec<RawColumn>,
    rows: usize,
}

impl SampleTable {
    pub fn load<P: AsRef<Path>>(path: P) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| AnalysisError::io(path, err))?;
        Self::from_reader(file, path.display().to_string())
    }

    pub fn from_reader<R: Read>(reader: R, source: impl Into<String>) -> AnalysisResult<Self> {
        let source = source.into();
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| AnalysisError::parse(&source, err.to_string()))?
            .clone();
        if headers.is_empty() {
            return Err(AnalysisError::parse(&source, "no columns to parse"));
        }

        let mut columns: Vec<RawColumn> = headers
            .iter()
            .map(|name| RawColumn {
                name: name.to_string(),
                cells: Vec::new(),
            })
            .collect();

        let mut rows = 0;
        for record in csv_reader.records() {
            let record = record.map_err(|err| AnalysisError::parse(&source, err.to_string()))?;
            for (column, cell) in columns.iter_mut().zip(record.iter()) {
                column.cells.push(cell.to_string());
            }
            rows += 1;
        }

        Ok(Self {
            source,
            columns,
            rows,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.raw(name).is_some()
    }

    /// Numeric column with missing cells as NaN.
    pub fn numeric(&self, name: &str) -> AnalysisResult<Vec<f64>> {
        let column = self
            .raw(name)
            .ok_or_else(|| AnalysisError::parse(&self.source, format!("missing column '{name}'")))?;
        column
            .cells
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                parse_cell(cell).ok_or_else(|| {
                    AnalysisError::parse(
                        &self.source,
                        format!("column '{name}' row {}: '{cell}' is not numeric", row + 1),
                    )
                })
            })
            .collect()
    }

    /// The `Value` samples of the capture.
    pub fn values(&self) -> AnalysisResult<Vec<f64>> {
        self.numeric(VALUE_COLUMN)
    }

    /// Every fully numeric column other than the timestamp, in header order.
    pub fn numeric_columns(&self) -> Vec<(String, Vec<f64>)> {
        self.columns
            .iter()
            .filter(|column| column.name != TIMESTAMP_COLUMN)
            .filter_map(|column| {
                let values: Option<Vec<f64>> = column.cells.iter().map(|c| parse_cell(c)).collect();
                values.map(|values| (column.name.clone(), values))
            })
            .collect()
    }

    /// Seconds since the first timestamp, or `None` without a timestamp column.
    pub fn elapsed_seconds(&self) -> AnalysisResult<Option<Vec<f64>>> {
        let Some(column) = self.raw(TIMESTAMP_COLUMN) else {
            return Ok(None);
        };
        let stamps = column
            .cells
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                parse_timestamp(cell).ok_or_else(|| {
                    AnalysisError::parse(
                        &self.source,
                        format!("row {}: unrecognised timestamp '{cell}'", row + 1),
                    )
                })
            })
            .collect::<AnalysisResult<Vec<i64>>>()?;

        let origin = stamps.first().copied().unwrap_or(0);
        Ok(Some(
            stamps
                .into_iter()
                .map(|t| (t - origin) as f64 / 1e6)
                .collect(),
        ))
    }

    fn raw(&self, name: &str) -> Option<&RawColumn> {
        self.columns.iter().find(|column| column.name == name)
    }
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}

/// Microseconds since the Unix epoch.
fn parse_timestamp(cell: &str) -> Option<i64> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(cell) {
        return Some(stamp.timestamp_micros());
    }
    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(cell, format) {
            return Some(stamp.and_utc().timestamp_micros());
        }
    }
    cell.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|seconds| (seconds * 1e6).round() as i64)
}
