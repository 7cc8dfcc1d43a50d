use std::collections::BTreeSet;

use serde::Deserialize;

use crate::dataset::DatasetKey;
use crate::input::CloneTable;

/// Points reported by the clone plot after a click or lasso.
///
/// Accepts either `{"points": [..], "dataset": {..}}` or the bare list the
/// plot widget emits, `[{"pointNumber": 3, ...}, ...]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawEvent")]
pub struct InteractionEvent {
    pub points: Vec<usize>,
    /// Dataset the clone plot was showing when the event fired.
    pub dataset: Option<DatasetKey>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEvent {
    Tagged {
        points: Vec<usize>,
        #[serde(default)]
        dataset: Option<DatasetKey>,
    },
    Plotly(Vec<PlotlyPoint>),
}

#[derive(Deserialize)]
struct PlotlyPoint {
    #[serde(rename = "pointNumber")]
    point_number: usize,
}

impl From<RawEvent> for InteractionEvent {
    fn from(raw: RawEvent) -> Self {
        match raw {
            RawEvent::Tagged { points, dataset } => Self { points, dataset },
            RawEvent::Plotly(list) => Self {
                points: list.into_iter().map(|p| p.point_number).collect(),
                dataset: None,
            },
        }
    }
}

impl InteractionEvent {
    pub fn from_points(points: Vec<usize>) -> Self {
        Self {
            points,
            dataset: None,
        }
    }

    pub fn for_dataset(mut self, key: DatasetKey) -> Self {
        self.dataset = Some(key);
        self
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Clone ids picked on the clone plot. Empty means no selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    clone_ids: BTreeSet<String>,
}

impl Selection {
    pub fn empty() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            clone_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clone_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clone_ids.len()
    }

    pub fn contains(&self, clone_id: &str) -> bool {
        self.clone_ids.contains(clone_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.clone_ids.iter().map(String::as_str)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StaleSelection {
    #[error("point {index} is out of range for a clone table of {rows} rows")]
    IndexOutOfRange { index: usize, rows: usize },
    #[error("event was raised on {event}, but {loaded} is loaded")]
    DatasetChanged { event: DatasetKey, loaded: DatasetKey },
}

/// Maps point numbers to clone ids by row position in `clones`.
///
/// The clone plot must have been drawn from this exact table in row order,
/// otherwise positions point at the wrong clones.
pub fn resolve_event(
    event: &InteractionEvent,
    clones: &CloneTable,
    loaded: Option<&DatasetKey>,
) -> Result<Selection, StaleSelection> {
    if let (Some(event_key), Some(loaded_key)) = (event.dataset.as_ref(), loaded) {
        if event_key != loaded_key {
            return Err(StaleSelection::DatasetChanged {
                event: *event_key,
                loaded: *loaded_key,
            });
        }
    }

    let mut ids = BTreeSet::new();
    for &index in &event.points {
        let id = clones
            .clone_id_at(index)
            .ok_or(StaleSelection::IndexOutOfRange {
                index,
                rows: clones.len(),
            })?;
        ids.insert(id.to_string());
    }
    Ok(Selection { clone_ids: ids })
}

/// Like [`resolve_event`], but a stale event degrades to no selection.
pub fn selection_from_event(
    event: Option<&InteractionEvent>,
    clones: &CloneTable,
    loaded: Option<&DatasetKey>,
) -> Selection {
    let Some(event) = event else {
        return Selection::empty();
    };
    match resolve_event(event, clones, loaded) {
        Ok(selection) => selection,
        Err(err) => {
            tracing::warn!("ignoring stale selection: {err}");
            Selection::empty()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/selection.rs"]
mod tests;
