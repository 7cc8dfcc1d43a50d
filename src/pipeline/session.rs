use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::dataset::{Cohort, DatasetKey, DatasetRefs, Region, Resolution, Subset};
use crate::error::ViewerError;
use crate::input::{CellTable, CloneTable, load_cell_table, load_clone_table, locate_table};
use crate::model::render::RenderSpec;
use crate::model::style::PlotStyle;
use crate::pipeline::clone_plot::render_clone_plot;
use crate::pipeline::link::link_event;
use crate::pipeline::selection::InteractionEvent;

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub data_dir: PathBuf,
    pub style: PlotStyle,
}

impl ViewerConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            style: PlotStyle::default_v1(),
        }
    }
}

/// Current dropdown values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub cohort: Cohort,
    pub region: Region,
    pub resolution: Resolution,
    pub subset: Subset,
}

impl Controls {
    pub fn key(&self) -> Result<DatasetKey, ViewerError> {
        Ok(DatasetKey::new(self.cohort, self.region, self.subset)?)
    }
}

/// Both tables for one dataset key. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub key: DatasetKey,
    pub refs: DatasetRefs,
    pub clones: CloneTable,
    pub cells: CellTable,
}

impl LoadedDataset {
    pub fn load(data_dir: &Path, key: DatasetKey) -> Result<Self, ViewerError> {
        let refs = key.refs();
        let clones = load_clone_table(&locate_table(data_dir, &refs.clones)?, key.cohort)?;
        let cells = load_cell_table(&locate_table(data_dir, &refs.cells)?, key.cohort)?;
        Ok(Self {
            key,
            refs,
            clones,
            cells,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSummary {
    pub clone_ids: Vec<String>,
    pub selected_cells: usize,
    pub other_cells: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub dataset: DatasetKey,
    pub resolution: Resolution,
    pub refs: DatasetRefs,
    pub clone_plot: RenderSpec,
    pub cell_plot: RenderSpec,
    pub selection: SelectionSummary,
}

/// Read-only view threaded through one render pass.
struct RenderContext<'a> {
    dataset: &'a LoadedDataset,
    resolution: Resolution,
    style: &'a PlotStyle,
}

impl RenderContext<'_> {
    fn render(&self, event: Option<&InteractionEvent>) -> Frame {
        let clone_plot = render_clone_plot(&self.dataset.clones, self.resolution, self.style);
        let (selection, cell_plot) = link_event(
            &self.dataset.clones,
            &self.dataset.cells,
            event,
            Some(&self.dataset.key),
            self.style,
        );
        let selected_cells = cell_plot.rows_in_class(&self.style.selected_label).len();
        let summary = SelectionSummary {
            clone_ids: selection.iter().map(str::to_string).collect(),
            selected_cells: if selection.is_empty() { 0 } else { selected_cells },
            other_cells: if selection.is_empty() {
                0
            } else {
                cell_plot.points.len() - selected_cells
            },
        };
        Frame {
            dataset: self.dataset.key,
            resolution: self.resolution,
            refs: self.dataset.refs.clone(),
            clone_plot,
            cell_plot,
            selection: summary,
        }
    }
}

/// Holds the tables for the last dataset key and recomputes frames from
/// (controls, tables, event). Tables are reloaded only when the key changes.
#[derive(Debug)]
pub struct Session {
    config: ViewerConfig,
    loaded: Option<LoadedDataset>,
    last_frame: Option<Frame>,
}

impl Session {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            loaded: None,
            last_frame: None,
        }
    }

    pub fn loaded_key(&self) -> Option<DatasetKey> {
        self.loaded.as_ref().map(|d| d.key)
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Returns the dataset for `key`, reusing `previous` when it matches.
    /// On a load failure the previous pair is handed back with the error.
    fn take_or_load(
        &self,
        previous: Option<LoadedDataset>,
        key: DatasetKey,
    ) -> Result<LoadedDataset, (Option<LoadedDataset>, ViewerError)> {
        match previous {
            Some(dataset) if dataset.key == key => {
                tracing::debug!("reusing tables for {key}");
                Ok(dataset)
            }
            previous => {
                tracing::info!("loading tables for {key}");
                match LoadedDataset::load(&self.config.data_dir, key) {
                    Ok(dataset) => {
                        tracing::info!(
                            clones = dataset.clones.len(),
                            cells = dataset.cells.len(),
                            "loaded {} and {}",
                            dataset.clones.source.display(),
                            dataset.cells.source.display()
                        );
                        if dataset.clones.is_empty() {
                            tracing::warn!("{} has no clones", dataset.clones.source.display());
                        }
                        if dataset.cells.is_empty() {
                            tracing::warn!("{} has no cells", dataset.cells.source.display());
                        }
                        Ok(dataset)
                    }
                    Err(err) => Err((previous, err)),
                }
            }
        }
    }

    /// One full recomputation pass for the current controls and event.
    ///
    /// A selection made on a previously loaded dataset is never applied to
    /// a newly loaded one.
    pub fn frame(
        &mut self,
        controls: &Controls,
        event: Option<&InteractionEvent>,
    ) -> Result<&Frame, ViewerError> {
        let key = controls.key()?;
        let key_changed = self.loaded_key().is_some_and(|loaded| loaded != key);

        let previous = self.loaded.take();
        let dataset = match self.take_or_load(previous, key) {
            Ok(dataset) => dataset,
            Err((previous, err)) => {
                self.loaded = previous;
                return Err(err);
            }
        };

        let event = match event {
            Some(ev) if key_changed && ev.dataset.is_none() && !ev.points.is_empty() => {
                tracing::warn!(
                    "ignoring selection of {} points made before switching to {key}",
                    ev.points.len()
                );
                None
            }
            other => other,
        };

        let frame = RenderContext {
            dataset: &dataset,
            resolution: controls.resolution,
            style: &self.config.style,
        }
        .render(event);
        self.loaded = Some(dataset);
        Ok(&*self.last_frame.insert(frame))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/session.rs"]
mod tests;
