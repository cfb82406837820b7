//! Reference dataset loading
//!
//! Parses the seven-column heat transfer dataset CSV into an immutable
//! in-memory table. The header row must contain exactly these columns
//! (in any order):
//!
//! `ThermalCond,BlockSize,SourceTemp,AmbientTemp,AvgTemp,MaxTemp,CenterTemp`
//!
//! The dataset is the model: prediction is a nearest-neighbor lookup
//! against these rows, so load failures are fatal at startup.

use crate::types::ReferenceRow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::info;

/// Required CSV columns, in canonical order.
const REQUIRED_COLUMNS: [&str; 7] = [
    "ThermalCond",
    "BlockSize",
    "SourceTemp",
    "AmbientTemp",
    "AvgTemp",
    "MaxTemp",
    "CenterTemp",
];

/// Errors raised while loading the reference dataset.
///
/// All of these abort startup — a service without a dataset cannot
/// answer any prediction.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataset file {path} has no header row")]
    MissingHeader { path: PathBuf },
    #[error("dataset header is missing required column '{column}'")]
    MissingColumn { column: &'static str },
    #[error("line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}, column '{column}': '{value}' is not a finite number")]
    BadValue {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("dataset file {path} contains no data rows")]
    Empty { path: PathBuf },
}

/// Maps required column names to their positions in the header row.
struct ColumnMap {
    indices: [usize; 7],
    width: usize,
}

impl ColumnMap {
    fn from_header(header: &str) -> Result<Self, DatasetError> {
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let mut indices = [0usize; 7];
        for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
            let idx = columns
                .iter()
                .position(|c| c == name)
                .ok_or(DatasetError::MissingColumn { column: name })?;
            indices[slot] = idx;
        }
        Ok(Self {
            indices,
            width: columns.len(),
        })
    }

    fn parse_row(&self, fields: &[&str], line: usize) -> Result<ReferenceRow, DatasetError> {
        if fields.len() != self.width {
            return Err(DatasetError::MalformedRow {
                line,
                expected: self.width,
                found: fields.len(),
            });
        }

        let mut values = [0.0f64; 7];
        for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
            let raw = fields[self.indices[slot]].trim();
            let parsed: f64 = raw.parse().map_err(|_| DatasetError::BadValue {
                line,
                column: name,
                value: raw.to_string(),
            })?;
            if !parsed.is_finite() {
                return Err(DatasetError::BadValue {
                    line,
                    column: name,
                    value: raw.to_string(),
                });
            }
            values[slot] = parsed;
        }

        Ok(ReferenceRow {
            thermal_cond: values[0],
            block_size: values[1],
            source_temp: values[2],
            ambient_temp: values[3],
            avg_temp: values[4],
            max_temp: values[5],
            center_temp: values[6],
        })
    }
}

/// Immutable reference dataset, loaded once per process lifetime.
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    rows: Vec<ReferenceRow>,
}

impl ReferenceDataset {
    /// Load the dataset from a CSV file.
    ///
    /// Fails if the file is missing, has no data rows, is missing a
    /// required column, or contains a non-finite numeric cell.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = loop {
            match lines.next() {
                Some(line) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break line;
                    }
                }
                None => {
                    return Err(DatasetError::MissingHeader {
                        path: path.to_path_buf(),
                    })
                }
            }
        };
        let columns = ColumnMap::from_header(&header)?;

        let mut rows = Vec::new();
        // Header was line 1; data starts at line 2.
        let mut line_no = 1usize;
        for line in lines {
            let line = line?;
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').collect();
            rows.push(columns.parse_row(&fields, line_no)?);
        }

        if rows.is_empty() {
            return Err(DatasetError::Empty {
                path: path.to_path_buf(),
            });
        }

        info!(path = %path.display(), rows = rows.len(), "Loaded reference dataset");
        Ok(Self { rows })
    }

    /// Build a dataset directly from rows (tests, embedded fixtures).
    pub fn from_rows(rows: Vec<ReferenceRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
