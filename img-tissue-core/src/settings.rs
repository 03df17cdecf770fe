use crate::{mesh::grid::GridSize, Scalar};
use serde::{Deserialize, Serialize};

/// Settings of image tissue component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TissueSettings {
    /// Grid columns, clamped to 2..=20 when used.
    #[serde(default = "TissueSettings::default_columns")]
    pub columns: usize,
    /// Grid rows, clamped to 2..=20 when used.
    #[serde(default = "TissueSettings::default_rows")]
    pub rows: usize,
    /// Zoom duration in milliseconds.
    #[serde(default = "TissueSettings::default_duration")]
    pub duration: Scalar,
    /// Accessible label passed to rendering surface.
    #[serde(default)]
    pub title: String,
}

impl Default for TissueSettings {
    fn default() -> Self {
        Self {
            columns: Self::default_columns(),
            rows: Self::default_rows(),
            duration: Self::default_duration(),
            title: String::new(),
        }
    }
}

impl TissueSettings {
    /// Clamped grid size.
    pub fn grid(&self) -> GridSize {
        GridSize::new(self.columns, self.rows)
    }

    fn default_columns() -> usize {
        GridSize::DEFAULT
    }

    fn default_rows() -> usize {
        GridSize::DEFAULT
    }

    fn default_duration() -> Scalar {
        800.0
    }
}
