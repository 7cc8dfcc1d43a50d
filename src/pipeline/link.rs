use std::collections::HashMap;

use crate::dataset::DatasetKey;
use crate::input::{CellTable, CloneTable};
use crate::model::render::{DisplayClass, PointMark, RenderMode, RenderSpec};
use crate::model::style::PlotStyle;
use crate::pipeline::selection::{InteractionEvent, Selection, selection_from_event};

/// Visual encoding of the gene-expression plot for the current selection.
pub fn link(cells: &CellTable, selection: &Selection, style: &PlotStyle) -> RenderSpec {
    if selection.is_empty() {
        render_native(cells, style)
    } else {
        render_selection(cells, selection, style)
    }
}

/// Event-driven entry: point numbers on the clone plot to a cell-plot encoding.
pub fn link_event(
    clones: &CloneTable,
    cells: &CellTable,
    event: Option<&InteractionEvent>,
    loaded: Option<&DatasetKey>,
    style: &PlotStyle,
) -> (Selection, RenderSpec) {
    let selection = selection_from_event(event, clones, loaded);
    let spec = link(cells, &selection, style);
    tracing::debug!(
        clones = selection.len(),
        cells = cells.len(),
        "linked selection onto {}",
        cells.source.display()
    );
    (selection, spec)
}

fn render_native(cells: &CellTable, style: &PlotStyle) -> RenderSpec {
    let mut classes: Vec<DisplayClass> = Vec::new();
    let mut class_of: HashMap<&str, usize> = HashMap::new();
    let mut points = Vec::with_capacity(cells.len());

    for (row, cell) in cells.cells.iter().enumerate() {
        let category = cell.native_category(cells.cohort);
        let class = *class_of.entry(category).or_insert_with(|| {
            classes.push(DisplayClass {
                name: category.to_string(),
                color: None,
                size: style.cell_marker_size,
            });
            classes.len() - 1
        });
        points.push(PointMark {
            row,
            x: cell.x,
            y: cell.y,
            class,
            text: cell.cell_type_label.clone(),
        });
    }

    let legend_title = if cells.cohort.is_perturbed() {
        &style.grna_legend_title
    } else {
        &style.domain_legend_title
    };

    RenderSpec {
        title: style.cell_title.clone(),
        legend_title: legend_title.clone(),
        mode: RenderMode::Native,
        color_scale: None,
        size_max: None,
        classes,
        points,
    }
}

const OTHER: usize = 0;
const SELECTED: usize = 1;

fn render_selection(cells: &CellTable, selection: &Selection, style: &PlotStyle) -> RenderSpec {
    let is_selected = |clone_id: Option<&str>| clone_id.is_some_and(|id| selection.contains(id));

    let mut other = Vec::new();
    let mut selected = Vec::new();
    for (row, cell) in cells.cells.iter().enumerate() {
        let class = if is_selected(cell.clone_id.as_deref()) {
            SELECTED
        } else {
            OTHER
        };
        let mark = PointMark {
            row,
            x: cell.x,
            y: cell.y,
            class,
            text: cell.cell_type_label.clone(),
        };
        if class == SELECTED {
            selected.push(mark);
        } else {
            other.push(mark);
        }
    }

    // Selected marks go last so nothing dimmed is painted over them.
    let mut points = other;
    points.append(&mut selected);

    RenderSpec {
        title: style.cell_title.clone(),
        legend_title: style.selection_legend_title.clone(),
        mode: RenderMode::Selection,
        color_scale: None,
        size_max: Some(style.selection_size_max),
        classes: vec![
            DisplayClass {
                name: style.other_label.clone(),
                color: Some(style.other_color.clone()),
                size: style.other_size,
            },
            DisplayClass {
                name: style.selected_label.clone(),
                color: Some(style.selected_color.clone()),
                size: style.selected_size,
            },
        ],
        points,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/link.rs"]
mod tests;
