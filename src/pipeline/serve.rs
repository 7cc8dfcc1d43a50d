use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::dataset::{Cohort, Region, Resolution, Subset};
use crate::error::ViewerError;
use crate::pipeline::selection::InteractionEvent;
use crate::pipeline::session::{Controls, Frame, Session};

/// One line of input: the dropdown values plus the latest clone-plot event.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub cohort: Cohort,
    pub region: Region,
    #[serde(default = "default_resolution")]
    pub resolution: Resolution,
    #[serde(default = "default_subset")]
    pub subset: Subset,
    #[serde(default)]
    pub event: Option<InteractionEvent>,
}

fn default_resolution() -> Resolution {
    Resolution::R0_5
}

fn default_subset() -> Subset {
    Subset::AllCells
}

impl Request {
    pub fn controls(&self) -> Controls {
        Controls {
            cohort: self.cohort,
            region: self.region,
            resolution: self.resolution,
            subset: self.subset,
        }
    }
}

/// One line of output. A failed pass carries the frame still on screen.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Response<'a> {
    Frame {
        frame: &'a Frame,
    },
    Error {
        message: String,
        previous: Option<&'a Frame>,
    },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServeStats {
    pub requests: usize,
    pub frames: usize,
    pub errors: usize,
}

fn write_response<W: Write>(output: &mut W, response: &Response<'_>) -> Result<(), ViewerError> {
    serde_json::to_writer(&mut *output, response).map_err(ViewerError::Json)?;
    output.write_all(b"\n")?;
    output.flush()?;
    Ok(())
}

/// Drives `session` from newline-delimited JSON requests until `input` ends.
///
/// Request and load errors are answered inline and do not stop the loop;
/// only failures to read input or write output are returned.
pub fn serve<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut output: W,
) -> Result<ServeStats, ViewerError> {
    let mut stats = ServeStats::default();
    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.requests += 1;

        let outcome = match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                let controls = request.controls();
                session.frame(&controls, request.event.as_ref())
            }
            Err(err) => Err(ViewerError::Event(err)),
        };

        match outcome {
            Ok(frame) => {
                stats.frames += 1;
                tracing::debug!(
                    line = idx + 1,
                    cells = frame.cell_plot.points.len(),
                    "rendered {}",
                    frame.dataset
                );
                write_response(&mut output, &Response::Frame { frame })?;
            }
            Err(err) => {
                stats.errors += 1;
                tracing::warn!(line = idx + 1, "request failed: {err}");
                let response = Response::Error {
                    message: err.to_string(),
                    previous: session.last_frame(),
                };
                write_response(&mut output, &response)?;
            }
        }
    }
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/serve.rs"]
mod tests;
