use std::fmt::Write;

use crate::pipeline::session::Frame;

const MAX_LISTED_CLONES: usize = 10;

pub fn render_frame_summary(frame: &Frame) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "dataset: {} (resolution {})",
        frame.dataset,
        frame.resolution.label()
    );
    let _ = writeln!(
        out,
        "tables: {}, {}",
        frame.refs.clones, frame.refs.cells
    );
    let _ = writeln!(
        out,
        "clone plot: {} clones in {} clusters",
        frame.clone_plot.points.len(),
        frame.clone_plot.classes.len()
    );

    let selection = &frame.selection;
    if selection.clone_ids.is_empty() {
        let _ = write!(out, "cell plot: {} cells by", frame.cell_plot.points.len());
        let _ = writeln!(out, " {}", frame.cell_plot.legend_title.to_lowercase());
        for (name, count) in frame.cell_plot.class_counts() {
            let _ = writeln!(out, "  {name}\t{count}");
        }
    } else {
        let shown = selection
            .clone_ids
            .iter()
            .take(MAX_LISTED_CLONES)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let more = selection.clone_ids.len().saturating_sub(MAX_LISTED_CLONES);
        let _ = write!(out, "selected clones ({}): {shown}", selection.clone_ids.len());
        if more > 0 {
            let _ = write!(out, " and {more} more");
        }
        out.push('\n');
        let _ = writeln!(
            out,
            "cell plot: {} selected, {} other",
            selection.selected_cells, selection.other_cells
        );
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
