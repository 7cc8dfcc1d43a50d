use std::path::PathBuf;

use super::*;
use crate::dataset::{Cohort, DatasetKey, Region, Resolution, Subset};
use crate::input::CellTable;
use crate::input::cells::CellPoint;
use crate::model::render::{RenderMode, RenderSpec};
use crate::model::style::PlotStyle;
use crate::pipeline::link::link;
use crate::pipeline::selection::Selection;
use crate::pipeline::session::{Frame, SelectionSummary};

fn cells() -> CellTable {
    CellTable {
        source: PathBuf::from("cells.csv"),
        cohort: Cohort::Control,
        cells: ["A", "B", "A"]
            .iter()
            .enumerate()
            .map(|(i, clone)| CellPoint {
                cell_id: format!("c{i}"),
                x: 0.0,
                y: 0.0,
                clone_id: Some(clone.to_string()),
                cell_type_label: "Neuron".to_string(),
                cell_type_domain: Some("Neural crest".to_string()),
                grna_label: None,
            })
            .collect(),
    }
}

fn frame(selection: &Selection, clone_ids: Vec<String>) -> Frame {
    let style = PlotStyle::default_v1();
    let dataset = DatasetKey::new(Cohort::Control, Region::Head, Subset::Neurons).unwrap();
    let cell_plot = link(&cells(), selection, &style);
    let selected = cell_plot.rows_in_class("Selected").len();
    Frame {
        dataset,
        resolution: Resolution::R1,
        refs: dataset.refs(),
        clone_plot: RenderSpec {
            title: style.clone_title.clone(),
            legend_title: style.clone_legend_title.clone(),
            mode: RenderMode::Clusters,
            color_scale: None,
            size_max: None,
            classes: Vec::new(),
            points: Vec::new(),
        },
        selection: SelectionSummary {
            clone_ids,
            selected_cells: selected,
            other_cells: cell_plot.points.len() - selected,
        },
        cell_plot,
    }
}

#[test]
fn test_summary_without_selection_lists_categories() {
    let text = render_frame_summary(&frame(&Selection::empty(), Vec::new()));
    assert!(text.contains("dataset: Control / Head / Neurons (resolution 1)"));
    assert!(text.contains("cell plot: 3 cells by cell type domain"));
    assert!(text.contains("  Neural crest\t3"));
}

#[test]
fn test_summary_with_selection_reports_counts() {
    let selection = Selection::from_ids(["A"]);
    let text = render_frame_summary(&frame(&selection, vec!["A".to_string()]));
    assert!(text.contains("selected clones (1): A\n"));
    assert!(text.contains("cell plot: 2 selected, 1 other"));
}

#[test]
fn test_summary_truncates_long_clone_lists() {
    let ids = (0..12).map(|i| format!("clone{i}")).collect::<Vec<_>>();
    let selection = Selection::from_ids(ids.clone());
    let text = render_frame_summary(&frame(&selection, ids));
    assert!(text.contains("selected clones (12):"));
    assert!(text.contains("and 2 more"));
}
