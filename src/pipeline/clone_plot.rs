use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::dataset::Resolution;
use crate::input::{ClonePoint, CloneTable};
use crate::model::render::{DisplayClass, PointMark, RenderMode, RenderSpec};
use crate::model::style::PlotStyle;

/// Hover text for one clone: cluster for control, guide for perturbed.
pub fn clone_annotation(clone: &ClonePoint, resolution: Resolution, perturbed: bool) -> String {
    if perturbed {
        format!("{} ({} gRNA)", clone.clone_id, clone.perturbation.label())
    } else {
        format!(
            "{} (Cluster {})",
            clone.clone_id,
            clone.cluster(resolution)
        )
    }
}

/// Cluster labels are numeric in practice; sort them as numbers when possible.
fn cluster_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Clone plot encoding. Marks keep table row order, so a reported point
/// number is the row index of the clicked clone.
pub fn render_clone_plot(
    clones: &CloneTable,
    resolution: Resolution,
    style: &PlotStyle,
) -> RenderSpec {
    let labels = clones
        .clones
        .iter()
        .map(|c| c.cluster(resolution))
        .collect::<BTreeSet<_>>();
    let mut labels = labels.into_iter().collect::<Vec<_>>();
    labels.sort_by(|a, b| cluster_order(a, b));

    let classes = labels
        .iter()
        .map(|name| DisplayClass {
            name: name.to_string(),
            color: None,
            size: style.clone_marker_size,
        })
        .collect::<Vec<_>>();

    let perturbed = clones.cohort.is_perturbed();
    let points = clones
        .clones
        .iter()
        .enumerate()
        .map(|(row, clone)| PointMark {
            row,
            x: clone.x,
            y: clone.y,
            class: labels
                .iter()
                .position(|l| *l == clone.cluster(resolution))
                .unwrap_or(0),
            text: clone_annotation(clone, resolution, perturbed),
        })
        .collect();

    RenderSpec {
        title: style.clone_title.clone(),
        legend_title: style.clone_legend_title.clone(),
        mode: RenderMode::Clusters,
        color_scale: Some(style.clone_color_scale.clone()),
        size_max: None,
        classes,
        points,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/clone_plot.rs"]
mod tests;
