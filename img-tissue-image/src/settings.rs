use serde::{Deserialize, Serialize};

/// Texture sampling mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sampling {
    /// Nearest texel.
    Nearest,
    /// Bilinear interpolation of four texels.
    #[default]
    Bilinear,
}

/// Settings of raster surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterSettings {
    /// Canvas clear color (RGBA).
    #[serde(default = "RasterSettings::default_background")]
    pub background: [u8; 4],
    /// Texture sampling mode.
    #[serde(default)]
    pub sampling: Sampling,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            background: Self::default_background(),
            sampling: Sampling::default(),
        }
    }
}

impl RasterSettings {
    fn default_background() -> [u8; 4] {
        [0, 0, 0, 0]
    }
}
