use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::model::render::RenderMode;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("clones2cells_session_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const CLONES: &str = "\
,UMAP1,UMAP2,leiden_0.5,leiden_1,leiden_2
A,0.0,0.0,0,0,0
B,1.0,1.0,1,1,2
C,2.0,0.5,0,1,1
";

const ALL_CELLS: &str = "\
,UMAP1,UMAP2,clone,celltype_l0,celltype_l1
c0,0.0,0.0,A,Neural crest,Schwann
c1,0.1,0.1,A,Neural crest,Satellite glia
c2,0.2,0.2,B,Mesenchyme,Chondro
c3,0.3,0.3,C,Mesenchyme,Fibro
c4,0.4,0.4,C,Neural crest,Neuron
";

const NEURONS: &str = "\
,UMAP1,UMAP2,clone,celltype_l0,celltype_l1
n0,5.0,5.0,C,Neural crest,Neuron
";

fn data_dir() -> PathBuf {
    let dir = make_temp_dir();
    fs::write(dir.join("clone2vec_control_trunk.csv"), CLONES).unwrap();
    fs::write(dir.join("GEX_control_trunk_all.csv"), ALL_CELLS).unwrap();
    fs::write(dir.join("GEX_control_trunk_neurons.csv"), NEURONS).unwrap();
    dir
}

fn controls(subset: Subset) -> Controls {
    Controls {
        cohort: Cohort::Control,
        region: Region::Trunk,
        resolution: Resolution::R0_5,
        subset,
    }
}

#[test]
fn test_frame_without_event_is_native() {
    let mut session = Session::new(ViewerConfig::new(data_dir()));
    let frame = session.frame(&controls(Subset::AllCells), None).unwrap();
    assert_eq!(frame.clone_plot.points.len(), 3);
    assert_eq!(frame.cell_plot.mode, RenderMode::Native);
    assert!(frame.selection.clone_ids.is_empty());
    assert_eq!(frame.refs.cells, "GEX_control_trunk_all.csv");
}

#[test]
fn test_frame_with_event_links_selection() {
    let mut session = Session::new(ViewerConfig::new(data_dir()));
    let event = InteractionEvent::from_points(vec![0]);
    let frame = session
        .frame(&controls(Subset::AllCells), Some(&event))
        .unwrap();
    assert_eq!(frame.cell_plot.mode, RenderMode::Selection);
    assert_eq!(frame.selection.clone_ids, vec!["A".to_string()]);
    assert_eq!(frame.selection.selected_cells, 2);
    assert_eq!(frame.selection.other_cells, 3);
}

#[test]
fn test_tables_reused_for_same_key() {
    let dir = data_dir();
    let mut session = Session::new(ViewerConfig::new(&dir));
    session.frame(&controls(Subset::AllCells), None).unwrap();

    // Reuse must not touch the filesystem again.
    fs::remove_file(dir.join("GEX_control_trunk_all.csv")).unwrap();
    let mut changed_resolution = controls(Subset::AllCells);
    changed_resolution.resolution = Resolution::R2;
    let frame = session.frame(&changed_resolution, None).unwrap();
    assert_eq!(frame.resolution, Resolution::R2);
    assert_eq!(frame.clone_plot.classes.len(), 3);
}

#[test]
fn test_key_change_discards_previous_selection() {
    let mut session = Session::new(ViewerConfig::new(data_dir()));
    let event = InteractionEvent::from_points(vec![2]);
    session
        .frame(&controls(Subset::AllCells), Some(&event))
        .unwrap();

    let frame = session
        .frame(&controls(Subset::Neurons), Some(&event))
        .unwrap();
    assert_eq!(frame.dataset.subset, Subset::Neurons);
    assert_eq!(frame.cell_plot.mode, RenderMode::Native);
    assert!(frame.selection.clone_ids.is_empty());
}

#[test]
fn test_event_tagged_with_other_dataset_is_ignored() {
    let mut session = Session::new(ViewerConfig::new(data_dir()));
    let stale_key = DatasetKey::new(Cohort::Control, Region::Trunk, Subset::Neurons).unwrap();
    let event = InteractionEvent::from_points(vec![0]).for_dataset(stale_key);
    let frame = session
        .frame(&controls(Subset::AllCells), Some(&event))
        .unwrap();
    assert_eq!(frame.cell_plot.mode, RenderMode::Native);
}

#[test]
fn test_load_failure_keeps_previous_state() {
    let mut session = Session::new(ViewerConfig::new(data_dir()));
    session.frame(&controls(Subset::AllCells), None).unwrap();

    let err = session
        .frame(&controls(Subset::Mesenchyme), None)
        .unwrap_err();
    assert!(matches!(err, ViewerError::DataLoad(_)));

    let loaded = session.loaded_key().unwrap();
    assert_eq!(loaded.subset, Subset::AllCells);
    let last = session.last_frame().unwrap();
    assert_eq!(last.dataset.subset, Subset::AllCells);
}

#[test]
fn test_invalid_controls_rejected_before_loading() {
    let mut session = Session::new(ViewerConfig::new(data_dir()));
    let mut head = controls(Subset::NcDerived);
    head.region = Region::Head;
    let err = session.frame(&head, None).unwrap_err();
    assert!(matches!(err, ViewerError::InvalidSelection(_)));
    assert!(session.loaded_key().is_none());
}

#[test]
fn test_frame_serializes_to_json() {
    let mut session = Session::new(ViewerConfig::new(data_dir()));
    let event = InteractionEvent::from_points(vec![1]);
    let frame = session
        .frame(&controls(Subset::AllCells), Some(&event))
        .unwrap();
    let value = serde_json::to_value(frame).unwrap();
    assert_eq!(value["dataset"]["cohort"], "control");
    assert_eq!(value["dataset"]["subset"], "all");
    assert_eq!(value["resolution"], "0.5");
    assert_eq!(value["cell_plot"]["mode"], "selection");
    assert_eq!(value["cell_plot"]["classes"][1]["name"], "Selected");
    assert_eq!(value["clone_plot"]["color_scale"], "rainbow");
    let last = value["cell_plot"]["points"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["row"], 2);
}
