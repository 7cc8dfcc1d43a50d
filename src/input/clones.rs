use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::dataset::{Cohort, Resolution};
use crate::input::{Header, TableError, csv_reader, is_missing, parse_coord, record_line};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Perturbation {
    None,
    Guide(String),
}

impl Perturbation {
    pub fn label(&self) -> &str {
        match self {
            Perturbation::None => "w/o",
            Perturbation::Guide(g) => g,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClonePoint {
    pub clone_id: String,
    pub x: f64,
    pub y: f64,
    /// Cluster label per resolution, indexed by `Resolution::slot`.
    pub clusters: [String; 3],
    pub perturbation: Perturbation,
}

impl ClonePoint {
    pub fn cluster(&self, resolution: Resolution) -> &str {
        &self.clusters[resolution.slot()]
    }
}

/// Clone-embedding table. Row order is the point order of the clone plot.
#[derive(Debug, Clone)]
pub struct CloneTable {
    pub source: PathBuf,
    pub cohort: Cohort,
    pub clones: Vec<ClonePoint>,
}

impl CloneTable {
    pub fn len(&self) -> usize {
        self.clones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clones.is_empty()
    }

    pub fn clone_id_at(&self, row: usize) -> Option<&str> {
        self.clones.get(row).map(|c| c.clone_id.as_str())
    }
}

pub fn load_clone_table(path: &Path, cohort: Cohort) -> Result<CloneTable, TableError> {
    let mut reader = csv_reader(path)?;
    let header = Header::read(path, &mut reader)?;

    let x_col = header.require("UMAP1")?;
    let y_col = header.require("UMAP2")?;
    let mut cluster_cols = [0usize; 3];
    for res in Resolution::ALL {
        cluster_cols[res.slot()] = header.require(res.column())?;
    }
    let perturbation_col = if cohort.is_perturbed() {
        Some(header.require("perturbation")?)
    } else {
        None
    };

    let mut clones = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for record in reader.records() {
        let record = record.map_err(|source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let clone_id = record.get(0).unwrap_or("").trim().to_string();
        if !seen.insert(clone_id.clone()) {
            return Err(TableError::DuplicateIndex {
                path: path.to_path_buf(),
                index: clone_id,
                line: record_line(&record),
            });
        }

        let x = parse_coord(path, &record, x_col, "UMAP1")?;
        let y = parse_coord(path, &record, y_col, "UMAP2")?;
        let clusters = cluster_cols.map(|idx| record.get(idx).unwrap_or("").trim().to_string());
        let perturbation = match perturbation_col.and_then(|idx| record.get(idx)) {
            Some(raw) if !is_missing(raw) => Perturbation::Guide(raw.trim().to_string()),
            _ => Perturbation::None,
        };

        clones.push(ClonePoint {
            clone_id,
            x,
            y,
            clusters,
            perturbation,
        });
    }

    tracing::debug!(
        path = %path.display(),
        rows = clones.len(),
        "loaded clone table"
    );

    Ok(CloneTable {
        source: path.to_path_buf(),
        cohort,
        clones,
    })
}
