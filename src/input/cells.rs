use std::path::{Path, PathBuf};

use crate::dataset::Cohort;
use crate::input::{Header, TableError, csv_reader, is_missing, parse_coord};

pub const MISSING_CATEGORY: &str = "NA";

#[derive(Debug, Clone, PartialEq)]
pub struct CellPoint {
    pub cell_id: String,
    pub x: f64,
    pub y: f64,
    /// `None` for cells that carry no lineage barcode.
    pub clone_id: Option<String>,
    pub cell_type_label: String,
    pub cell_type_domain: Option<String>,
    pub grna_label: Option<String>,
}

impl CellPoint {
    /// Category used to color the idle gene-expression plot.
    pub fn native_category(&self, cohort: Cohort) -> &str {
        let value = if cohort.is_perturbed() {
            self.grna_label.as_deref()
        } else {
            self.cell_type_domain.as_deref()
        };
        value.unwrap_or(MISSING_CATEGORY)
    }
}

#[derive(Debug, Clone)]
pub struct CellTable {
    pub source: PathBuf,
    pub cohort: Cohort,
    pub cells: Vec<CellPoint>,
}

impl CellTable {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

pub fn load_cell_table(path: &Path, cohort: Cohort) -> Result<CellTable, TableError> {
    let mut reader = csv_reader(path)?;
    let header = Header::read(path, &mut reader)?;

    let x_col = header.require("UMAP1")?;
    let y_col = header.require("UMAP2")?;
    let clone_col = header.require("clone")?;
    let label_col = header.require("celltype_l1")?;
    // Only the cohort's native coloring column is mandatory.
    let (domain_col, grna_col) = if cohort.is_perturbed() {
        (header.find("celltype_l0"), Some(header.require("gRNA")?))
    } else {
        (Some(header.require("celltype_l0")?), header.find("gRNA"))
    };

    let optional = |record: &csv::StringRecord, idx: Option<usize>| {
        idx.and_then(|i| record.get(i))
            .map(|s| s.trim())
            .filter(|s| !is_missing(s))
            .map(str::to_string)
    };

    let mut cells = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        cells.push(CellPoint {
            cell_id: record.get(0).unwrap_or("").trim().to_string(),
            x: parse_coord(path, &record, x_col, "UMAP1")?,
            y: parse_coord(path, &record, y_col, "UMAP2")?,
            clone_id: optional(&record, Some(clone_col)),
            cell_type_label: record.get(label_col).unwrap_or("").trim().to_string(),
            cell_type_domain: optional(&record, domain_col),
            grna_label: optional(&record, grna_col),
        });
    }

    let unassigned = cells.iter().filter(|c| c.clone_id.is_none()).count();
    tracing::debug!(
        path = %path.display(),
        rows = cells.len(),
        unassigned,
        "loaded cell table"
    );

    Ok(CellTable {
        source: path.to_path_buf(),
        cohort,
        cells,
    })
}
