use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    Control,
    #[value(name = "perturbed")]
    #[serde(rename = "perturbed")]
    PerturbedAndControl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Trunk,
    Head,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Subset {
    #[value(name = "all")]
    #[serde(rename = "all")]
    AllCells,
    Neurons,
    Mesenchyme,
    #[value(name = "other")]
    #[serde(rename = "other")]
    OtherCells,
    #[value(name = "nc")]
    #[serde(rename = "nc")]
    NcDerived,
}

/// Clustering granularity of the clone embedding; selects a `leiden_*` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Resolution {
    #[value(name = "0.5")]
    #[serde(rename = "0.5")]
    R0_5,
    #[value(name = "1")]
    #[serde(rename = "1")]
    R1,
    #[value(name = "2")]
    #[serde(rename = "2")]
    R2,
}

impl Cohort {
    pub fn label(self) -> &'static str {
        match self {
            Cohort::Control => "Control",
            Cohort::PerturbedAndControl => "Perturbed and control",
        }
    }

    fn file_tag(self) -> &'static str {
        match self {
            Cohort::Control => "control",
            Cohort::PerturbedAndControl => "perturbed",
        }
    }

    pub fn is_perturbed(self) -> bool {
        self == Cohort::PerturbedAndControl
    }
}

impl Region {
    pub fn label(self) -> &'static str {
        match self {
            Region::Trunk => "Trunk",
            Region::Head => "Head",
        }
    }

    fn file_tag(self) -> &'static str {
        match self {
            Region::Trunk => "trunk",
            Region::Head => "head",
        }
    }
}

impl Subset {
    pub fn label(self) -> &'static str {
        match self {
            Subset::AllCells => "All cells",
            Subset::Neurons => "Neurons",
            Subset::Mesenchyme => "Mesenchyme",
            Subset::OtherCells => "Other cells",
            Subset::NcDerived => "NC-derived cells",
        }
    }

    fn file_tag(self) -> &'static str {
        match self {
            Subset::AllCells => "all",
            Subset::Neurons => "neurons",
            Subset::Mesenchyme => "mesenchyme",
            Subset::OtherCells => "other",
            Subset::NcDerived => "NC",
        }
    }
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Resolution::R0_5, Resolution::R1, Resolution::R2];

    pub fn label(self) -> &'static str {
        match self {
            Resolution::R0_5 => "0.5",
            Resolution::R1 => "1",
            Resolution::R2 => "2",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Resolution::R0_5 => "leiden_0.5",
            Resolution::R1 => "leiden_1",
            Resolution::R2 => "leiden_2",
        }
    }

    pub fn slot(self) -> usize {
        match self {
            Resolution::R0_5 => 0,
            Resolution::R1 => 1,
            Resolution::R2 => 2,
        }
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {}",
            self.cohort.label(),
            self.region.label(),
            self.subset.label()
        )
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("invalid selection: {subset} is not available for the {region} region")]
    InvalidSelection {
        region: &'static str,
        subset: &'static str,
    },
}

/// Identity of a loaded pair of tables. Resolution is not part of it:
/// switching resolution re-colors the clone plot without reloading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetKey {
    pub cohort: Cohort,
    pub region: Region,
    pub subset: Subset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetRefs {
    pub clones: String,
    pub cells: String,
}

const HEAD_SUBSETS: &[Subset] = &[
    Subset::AllCells,
    Subset::Mesenchyme,
    Subset::Neurons,
    Subset::OtherCells,
];

const TRUNK_SUBSETS: &[Subset] = &[
    Subset::AllCells,
    Subset::Mesenchyme,
    Subset::Neurons,
    Subset::NcDerived,
    Subset::OtherCells,
];

/// Subset dropdown options, in display order.
pub fn subset_options(region: Region) -> &'static [Subset] {
    match region {
        Region::Head => HEAD_SUBSETS,
        Region::Trunk => TRUNK_SUBSETS,
    }
}

pub fn is_valid_subset(region: Region, subset: Subset) -> bool {
    subset_options(region).contains(&subset)
}

/// Re-filters a previously chosen subset after a region change.
pub fn refilter_subset(region: Region, previous: Subset) -> Subset {
    if is_valid_subset(region, previous) {
        previous
    } else {
        tracing::debug!(
            "subset {} not offered for {}; resetting to {}",
            previous.label(),
            region.label(),
            subset_options(region)[0].label()
        );
        subset_options(region)[0]
    }
}

impl DatasetKey {
    pub fn new(cohort: Cohort, region: Region, subset: Subset) -> Result<Self, DatasetError> {
        if !is_valid_subset(region, subset) {
            return Err(DatasetError::InvalidSelection {
                region: region.label(),
                subset: subset.label(),
            });
        }
        Ok(Self {
            cohort,
            region,
            subset,
        })
    }

    pub fn refs(&self) -> DatasetRefs {
        let cohort = self.cohort.file_tag();
        let region = self.region.file_tag();
        DatasetRefs {
            clones: format!("clone2vec_{cohort}_{region}.csv"),
            cells: format!("GEX_{cohort}_{region}_{}.csv", self.subset.file_tag()),
        }
    }
}

pub fn resolve(cohort: Cohort, region: Region, subset: Subset) -> Result<DatasetRefs, DatasetError> {
    Ok(DatasetKey::new(cohort, region, subset)?.refs())
}

#[cfg(test)]
#[path = "../../tests/src_inline/dataset/mod.rs"]
mod tests;
