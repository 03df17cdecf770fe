use crate::error::TissueError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Grid size with both dimensions clamped to [`GridSize::MIN`]..=[`GridSize::MAX`].
///
/// # Examples
/// ```
/// use img_tissue_core::prelude::*;
///
/// assert_eq!(GridSize::new(1, 50), GridSize::new(2, 20));
/// assert_eq!("7x3".parse::<GridSize>().unwrap(), GridSize::new(7, 3));
/// assert_eq!("6".parse::<GridSize>().unwrap(), GridSize::new(6, 6));
/// assert_eq!(GridSize::default().to_string(), "4x4");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawGridSize", into = "RawGridSize")]
pub struct GridSize {
    columns: usize,
    rows: usize,
}

impl GridSize {
    /// Smallest allowed number of columns or rows.
    pub const MIN: usize = 2;
    /// Largest allowed number of columns or rows.
    pub const MAX: usize = 20;
    /// Columns and rows used when nothing else is set.
    pub const DEFAULT: usize = 4;

    /// Create grid size, clamping both values.
    ///
    /// # Arguments
    /// * `columns` - Number of columns.
    /// * `rows` - Number of rows.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: Self::clamp(columns),
            rows: Self::clamp(rows),
        }
    }

    /// Clamp single dimension into allowed range.
    #[inline]
    pub fn clamp(value: usize) -> usize {
        value.clamp(Self::MIN, Self::MAX)
    }

    /// Returns number of columns.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Returns number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns copy with replaced columns.
    pub fn with_columns(self, columns: usize) -> Self {
        Self::new(columns, self.rows)
    }

    /// Returns copy with replaced rows.
    pub fn with_rows(self, rows: usize) -> Self {
        Self::new(self.columns, rows)
    }

    /// Number of grid vertices.
    #[inline]
    pub fn points_count(&self) -> usize {
        (self.columns + 1) * (self.rows + 1)
    }

    /// Number of grid triangles.
    #[inline]
    pub fn triangles_count(&self) -> usize {
        2 * self.columns * self.rows
    }

    /// Parse single dimension and clamp it.
    ///
    /// Accepts integers and decimals (rounded), so `"3.6"` becomes 4 and `"-1"` becomes 2.
    pub fn parse_dimension(s: &str) -> Result<usize, TissueError> {
        let s = s.trim();
        let value = s
            .parse::<f64>()
            .map_err(|_| TissueError::InvalidGridValue(s.to_owned()))?;
        if !value.is_finite() {
            return Err(TissueError::InvalidGridValue(s.to_owned()));
        }
        let value = value
            .round()
            .max(Self::MIN as f64)
            .min(Self::MAX as f64);
        Ok(value as usize)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(Self::DEFAULT, Self::DEFAULT)
    }
}

impl FromStr for GridSize {
    type Err = TissueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(found) = s.find(['x', 'X']) {
            let c = &s[..found];
            let r = &s[(found + 1)..];
            Ok(Self::new(
                Self::parse_dimension(c)?,
                Self::parse_dimension(r)?,
            ))
        } else {
            let v = Self::parse_dimension(s)?;
            Ok(Self::new(v, v))
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

#[derive(Serialize, Deserialize)]
struct RawGridSize {
    columns: usize,
    rows: usize,
}

impl From<RawGridSize> for GridSize {
    fn from(raw: RawGridSize) -> Self {
        Self::new(raw.columns, raw.rows)
    }
}

impl From<GridSize> for RawGridSize {
    fn from(size: GridSize) -> Self {
        Self {
            columns: size.columns,
            rows: size.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(GridSize::new(0, 0), GridSize::new(2, 2));
        assert_eq!(GridSize::new(21, 100), GridSize::new(20, 20));
        let g = GridSize::new(20, 2);
        assert_eq!((g.columns(), g.rows()), (20, 2));
        assert_eq!(g.with_rows(1).rows(), 2);
        assert_eq!(g.with_columns(30).columns(), 20);
    }

    #[test]
    fn test_parse() {
        assert_eq!("3.6".parse::<GridSize>().unwrap(), GridSize::new(4, 4));
        assert_eq!(" 5 X 25 ".parse::<GridSize>().unwrap(), GridSize::new(5, 20));
        assert_eq!(GridSize::parse_dimension("-1"), Ok(2));
        assert_eq!(
            "abc".parse::<GridSize>(),
            Err(TissueError::InvalidGridValue("abc".to_owned()))
        );
        assert!("4xNaN".parse::<GridSize>().is_err());
        assert!("inf".parse::<GridSize>().is_err());
    }

    #[test]
    fn test_deserialize_clamps() {
        let g: GridSize = serde_json::from_str(r#"{"columns": 1, "rows": 99}"#).unwrap();
        assert_eq!(g, GridSize::new(2, 20));
        assert_eq!(
            serde_json::to_string(&GridSize::new(3, 5)).unwrap(),
            r#"{"columns":3,"rows":5}"#
        );
    }

    #[test]
    fn test_counts() {
        let g = GridSize::new(3, 5);
        assert_eq!(g.points_count(), 24);
        assert_eq!(g.triangles_count(), 30);
    }
}
