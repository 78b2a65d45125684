//! Grid types: raw caller input and augmented renderer output.
//!
//! `RawGrid` and `AugmentedGrid` are separate types so augmentation is
//! structurally idempotent: a grid that already went through the renderer
//! cannot be numbered or colored twice. Callers that hand over rows they
//! numbered or colored themselves say so with [`RawGrid::mark_numbered`] and
//! [`RawGrid::mark_colored`].

use serde::{Deserialize, Serialize};

use crate::palette::Color;
use crate::policy::RenderPolicy;

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Text(String),
    /// Synthetic color indicator; drawn as a dot, never as text.
    Marker(Color),
}

impl Cell {
    pub fn empty() -> Self {
        Cell::Text(String::new())
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Cell::Marker(_))
    }

    /// Text content; markers have none.
    pub fn text(&self) -> &str {
        match self {
            Cell::Text(s) => s,
            Cell::Marker(_) => "",
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// Caller-supplied rows of text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGrid {
    rows: Vec<Vec<String>>,
    numbered: bool,
    colored: bool,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows,
            numbered: false,
            colored: false,
        }
    }

    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// The caller already prepended its own row-number column.
    pub fn mark_numbered(mut self) -> Self {
        self.numbered = true;
        self
    }

    /// The caller already placed its own color column.
    pub fn mark_colored(mut self) -> Self {
        self.colored = true;
        self
    }

    pub fn is_numbered(&self) -> bool {
        self.numbered
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row length; shorter rows are padded to it on augmentation.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Renderer output: equal-length rows with any derived columns in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentedGrid {
    pub(crate) rows: Vec<Vec<Cell>>,
    /// Column 0 holds renderer-assigned rank numbers.
    pub(crate) row_number_column: bool,
    /// Column holding renderer-assigned color markers.
    pub(crate) color_column: Option<usize>,
}

impl AugmentedGrid {
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn has_row_number_column(&self) -> bool {
        self.row_number_column
    }

    pub fn color_column(&self) -> Option<usize> {
        self.color_column
    }

    /// Text view of every row, markers shown as `#RRGGBB`.
    pub fn to_text_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Text(s) => s.clone(),
                        Cell::Marker(c) => c.to_hex(),
                    })
                    .collect()
            })
            .collect()
    }
}

/// Display-only stand-in for a table whose data has not arrived.
///
/// Never feed this into logic or tests that expect real data.
pub fn placeholder() -> (RawGrid, RenderPolicy) {
    let grid = RawGrid::from_rows([
        ["Checking accounts", "50 000 PLN", "85%"],
        ["Savings accounts", "5 000 PLN", "5%"],
        ["Treasury bonds", "10 000 PLN", "10%"],
        ["Shares & ETFs", "10 000 PLN", "10%"],
        ["Total", "54 000.45 PLN", ""],
    ]);
    let policy = RenderPolicy {
        bold_last_row: true,
        color_column_index: Some(2),
        ..RenderPolicy::default()
    };
    (grid, policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_grid_width_uses_widest_row() {
        let grid = RawGrid::from_rows(vec![vec!["a"], vec!["b", "c", "d"], vec![]]);
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.width(), 3);
    }

    #[test]
    fn test_marks() {
        let grid = RawGrid::default();
        assert!(!grid.is_numbered());
        let grid = grid.mark_numbered().mark_colored();
        assert!(grid.is_numbered());
        assert!(grid.is_colored());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(Cell::from("x").text(), "x");
        assert_eq!(Cell::Marker(Color::rgb(0, 0, 0)).text(), "");
        assert!(Cell::Marker(Color::rgb(0, 0, 0)).is_marker());
    }

    #[test]
    fn test_placeholder_shape() {
        let (grid, policy) = placeholder();
        assert_eq!(grid.len(), 5);
        assert!(policy.bold_last_row);
        assert_eq!(policy.color_column_index, Some(2));
    }
}
