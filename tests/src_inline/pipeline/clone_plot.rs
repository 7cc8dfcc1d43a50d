use std::path::PathBuf;

use super::*;
use crate::dataset::Cohort;
use crate::input::clones::Perturbation;

fn clone(id: &str, clusters: [&str; 3], perturbation: Perturbation) -> ClonePoint {
    ClonePoint {
        clone_id: id.to_string(),
        x: 1.0,
        y: 2.0,
        clusters: clusters.map(str::to_string),
        perturbation,
    }
}

fn table(cohort: Cohort) -> CloneTable {
    CloneTable {
        source: PathBuf::from("clones.csv"),
        cohort,
        clones: vec![
            clone("A", ["10", "0", "1"], Perturbation::Guide("Sox10".to_string())),
            clone("B", ["2", "1", "1"], Perturbation::None),
            clone("C", ["10", "0", "0"], Perturbation::None),
        ],
    }
}

#[test]
fn test_control_annotation() {
    let t = table(Cohort::Control);
    assert_eq!(
        clone_annotation(&t.clones[0], Resolution::R0_5, false),
        "A (Cluster 10)"
    );
    assert_eq!(
        clone_annotation(&t.clones[1], Resolution::R1, false),
        "B (Cluster 1)"
    );
}

#[test]
fn test_perturbed_annotation() {
    let t = table(Cohort::PerturbedAndControl);
    assert_eq!(
        clone_annotation(&t.clones[0], Resolution::R1, true),
        "A (Sox10 gRNA)"
    );
    assert_eq!(
        clone_annotation(&t.clones[2], Resolution::R1, true),
        "C (w/o gRNA)"
    );
}

#[test]
fn test_clone_plot_keeps_table_order() {
    let style = PlotStyle::default_v1();
    let t = table(Cohort::Control);
    let spec = render_clone_plot(&t, Resolution::R0_5, &style);

    assert_eq!(spec.mode, RenderMode::Clusters);
    assert_eq!(spec.color_scale.as_deref(), Some("rainbow"));
    assert_eq!(spec.points.len(), 3);
    for (row, point) in spec.points.iter().enumerate() {
        assert_eq!(point.row, row);
        assert_eq!(spec.classes[point.class].name, t.clones[row].cluster(Resolution::R0_5));
    }
}

#[test]
fn test_clusters_sorted_numerically() {
    let style = PlotStyle::default_v1();
    let t = table(Cohort::Control);
    let spec = render_clone_plot(&t, Resolution::R0_5, &style);
    let names = spec.classes.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["2", "10"]);
    assert!(spec.classes.iter().all(|c| c.size == 7.0));

    let spec = render_clone_plot(&t, Resolution::R2, &style);
    assert_eq!(spec.classes.len(), 2);
    assert_eq!(spec.points[2].class, 0);
}
