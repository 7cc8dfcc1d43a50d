use thiserror::Error;

use crate::dataset::DatasetError;
use crate::input::TableError;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error(transparent)]
    InvalidSelection(#[from] DatasetError),
    #[error("failed to load data: {0}")]
    DataLoad(#[from] TableError),
    #[error("failed to read interaction event: {0}")]
    Event(#[source] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode frame: {0}")]
    Json(#[source] serde_json::Error),
}
