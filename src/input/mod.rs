use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

pub mod cells;
pub mod clones;

pub use cells::{CellTable, load_cell_table};
pub use clones::{ClonePoint, CloneTable, load_clone_table};

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing table: {0}")]
    MissingTable(PathBuf),
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
    #[error("{path}: duplicate row index '{index}' (line {line})")]
    DuplicateIndex {
        path: PathBuf,
        index: String,
        line: u64,
    },
    #[error("{path}: cannot parse {column}='{value}' as a number (line {line})")]
    BadNumber {
        path: PathBuf,
        column: String,
        value: String,
        line: u64,
    },
}

/// Finds `name` under `data_dir`, falling back to a gzipped sibling.
pub fn locate_table(data_dir: &Path, name: &str) -> Result<PathBuf, TableError> {
    let plain = data_dir.join(name);
    if plain.is_file() {
        return Ok(plain);
    }
    let gz = data_dir.join(format!("{name}.gz"));
    if gz.is_file() {
        return Ok(gz);
    }
    Err(TableError::MissingTable(plain))
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>, TableError> {
    let file = File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(MultiGzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Column lookup over a CSV header whose first column is the row index.
pub(crate) struct Header {
    path: PathBuf,
    names: Vec<String>,
}

impl Header {
    pub(crate) fn read(
        path: &Path,
        reader: &mut csv::Reader<Box<dyn Read>>,
    ) -> Result<Self, TableError> {
        let names = reader
            .headers()
            .map_err(|source| TableError::Csv {
                path: path.to_path_buf(),
                source,
            })?
            .iter()
            .map(|s| s.trim().to_string())
            .collect::<Vec<_>>();
        Ok(Self {
            path: path.to_path_buf(),
            names,
        })
    }

    pub(crate) fn find(&self, column: &str) -> Option<usize> {
        // Column 0 is the index even if it happens to carry a name.
        self.names
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, name)| name.as_str() == column)
            .map(|(idx, _)| idx)
    }

    pub(crate) fn require(&self, column: &str) -> Result<usize, TableError> {
        self.find(column).ok_or_else(|| TableError::MissingColumn {
            path: self.path.clone(),
            column: column.to_string(),
        })
    }
}

pub(crate) fn csv_reader(path: &Path) -> Result<csv::Reader<Box<dyn Read>>, TableError> {
    let inner = open_maybe_gz(path)?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(inner))
}

pub(crate) fn record_line(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

pub(crate) fn parse_coord(
    path: &Path,
    record: &csv::StringRecord,
    idx: usize,
    column: &str,
) -> Result<f64, TableError> {
    let raw = record.get(idx).unwrap_or("").trim();
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TableError::BadNumber {
            path: path.to_path_buf(),
            column: column.to_string(),
            value: raw.to_string(),
            line: record_line(record),
        })
}

/// pandas writes missing categoricals as an empty field or a NaN spelling.
pub(crate) fn is_missing(value: &str) -> bool {
    matches!(value.trim(), "" | "nan" | "NaN" | "NA" | "None")
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
