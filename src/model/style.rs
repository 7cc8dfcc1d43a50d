#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    pub clone_title: String,
    pub clone_legend_title: String,
    pub clone_marker_size: f32,
    pub clone_color_scale: String,

    pub cell_title: String,
    pub cell_marker_size: f32,
    pub domain_legend_title: String,
    pub grna_legend_title: String,

    pub selection_legend_title: String,
    pub selected_label: String,
    pub other_label: String,
    pub selected_color: String,
    pub other_color: String,
    pub selected_size: f32,
    pub other_size: f32,
    pub selection_size_max: f32,
}

impl PlotStyle {
    pub fn default_v1() -> Self {
        Self {
            clone_title: "clone2vec UMAP".to_string(),
            clone_legend_title: "Cluster".to_string(),
            clone_marker_size: 7.0,
            clone_color_scale: "rainbow".to_string(),

            cell_title: "Gene expression UMAP".to_string(),
            cell_marker_size: 3.0,
            domain_legend_title: "Cell type domain".to_string(),
            grna_legend_title: "gRNA".to_string(),

            selection_legend_title: "Selection".to_string(),
            selected_label: "Selected".to_string(),
            other_label: "Other".to_string(),
            selected_color: "black".to_string(),
            other_color: "lightgray".to_string(),
            selected_size: 3.0,
            other_size: 1.0,
            selection_size_max: 6.0,
        }
    }
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self::default_v1()
    }
}
