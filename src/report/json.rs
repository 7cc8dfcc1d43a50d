use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ViewerError;
use crate::pipeline::session::Frame;

pub fn render_frame_json(frame: &Frame) -> Result<String, ViewerError> {
    serde_json::to_string_pretty(frame).map_err(ViewerError::Json)
}

/// Writes the frame to `out`, or to stdout when no path is given.
pub fn write_frame_json(frame: &Frame, out: Option<&Path>) -> Result<(), ViewerError> {
    let body = render_frame_json(frame)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut writer = BufWriter::new(File::create(path)?);
            writer.write_all(body.as_bytes())?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            tracing::info!("wrote frame to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(body.as_bytes())?;
            lock.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/json.rs"]
mod tests;
