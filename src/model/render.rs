use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Clone plot colored by cluster label.
    Clusters,
    /// Cell plot colored by its cohort's native category.
    Native,
    /// Cell plot split into Other/Selected.
    Selection,
}

/// One legend entry. `color` is `None` when the renderer picks from its palette.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayClass {
    pub name: String,
    pub color: Option<String>,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointMark {
    /// Row of the source table this mark was drawn from.
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub class: usize,
    pub text: String,
}

/// Visual encoding for one scatter plot. `points` are in draw order:
/// later marks are painted over earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSpec {
    pub title: String,
    pub legend_title: String,
    pub mode: RenderMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_max: Option<f32>,
    pub classes: Vec<DisplayClass>,
    pub points: Vec<PointMark>,
}

impl RenderSpec {
    pub fn class_index(&self, name: &str) -> Option<usize> {
        self.classes.iter().position(|c| c.name == name)
    }

    /// Source rows drawn with the named class, in draw order.
    pub fn rows_in_class(&self, name: &str) -> Vec<usize> {
        match self.class_index(name) {
            Some(idx) => self
                .points
                .iter()
                .filter(|p| p.class == idx)
                .map(|p| p.row)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn class_counts(&self) -> Vec<(&str, usize)> {
        let mut counts = vec![0usize; self.classes.len()];
        for p in &self.points {
            counts[p.class] += 1;
        }
        self.classes
            .iter()
            .zip(counts)
            .map(|(c, n)| (c.name.as_str(), n))
            .collect()
    }
}
