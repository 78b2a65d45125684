//! Tabular renderer: derived columns, row roles and cell display values.
//!
//! Rendering happens in two steps:
//! 1. `augment` turns a [`RawGrid`] into an [`AugmentedGrid`], prepending a
//!    rank column and inserting a color-indicator column as the policy asks.
//! 2. `render_cell` / `render` turn augmented cells into [`DisplayValue`]s:
//!    colored dots, currency-formatted amounts or plain text.
//!
//! Nothing here fails. Ragged rows are padded, missing cells render empty,
//! unparsable amounts format as zero and unknown row ids resolve to `None`.

use serde::{Deserialize, Serialize};

use crate::format::Formatter;
use crate::grid::{AugmentedGrid, Cell, RawGrid};
use crate::palette::{Color, Palette};
use crate::policy::RenderPolicy;

/// Visual role of a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowRole {
    Header,
    Normal,
    Summary,
}

impl RowRole {
    /// Header and summary rows are drawn emphasized.
    pub fn is_emphasized(self) -> bool {
        !matches!(self, RowRole::Normal)
    }
}

/// What a cell shows once rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DisplayValue {
    Text(String),
    Dot(Color),
    Empty,
}

impl DisplayValue {
    /// Plain-text rendering; dots become `●`.
    pub fn as_plain(&self) -> &str {
        match self {
            DisplayValue::Text(s) => s,
            DisplayValue::Dot(_) => "●",
            DisplayValue::Empty => "",
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedRow {
    pub role: RowRole,
    pub cells: Vec<DisplayValue>,
    /// Entity id this row resolves to when activated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A fully rendered table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedTable {
    pub rows: Vec<RenderedRow>,
}

impl RenderedTable {
    pub fn width(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }
}

/// Classify `row_index` of a grid with `row_count` rows.
///
/// A summary row wins over a header row when a single row is both.
pub fn classify(row_count: usize, row_index: usize, policy: &RenderPolicy) -> RowRole {
    if row_index >= row_count {
        return RowRole::Normal;
    }
    if policy.bold_last_row && row_index + 1 == row_count {
        RowRole::Summary
    } else if policy.has_header_row && row_index == 0 {
        RowRole::Header
    } else {
        RowRole::Normal
    }
}

/// Two-digit minimum rank string: `1` → `01`, `100` → `100`.
pub fn rank_label(rank: usize) -> String {
    format!("{rank:02}")
}

/// Resolve an activated row to its entity id.
///
/// Header rows and rows past the end of `row_ids` resolve to `None`.
pub fn resolve_row_id<'a>(
    row_index: usize,
    row_ids: &'a [String],
    policy: &RenderPolicy,
) -> Option<&'a str> {
    if policy.has_header_row && row_index == 0 {
        return None;
    }
    let offset = policy.header_offset();
    row_ids.get(row_index.checked_sub(offset)?).map(String::as_str)
}

/// Grids the renderer can turn into an [`AugmentedGrid`].
pub trait Augment {
    fn augment(&self, renderer: &TabularRenderer) -> AugmentedGrid;
}

impl Augment for RawGrid {
    fn augment(&self, renderer: &TabularRenderer) -> AugmentedGrid {
        renderer.augment_raw(self)
    }
}

/// Already augmented: derived columns are never added twice.
impl Augment for AugmentedGrid {
    fn augment(&self, _renderer: &TabularRenderer) -> AugmentedGrid {
        self.clone()
    }
}

/// Renders grids under one policy with an injected palette.
#[derive(Debug, Clone, Default)]
pub struct TabularRenderer {
    policy: RenderPolicy,
    palette: Palette,
    formatter: Formatter,
}

impl TabularRenderer {
    pub fn new(policy: RenderPolicy, palette: Palette, formatter: Formatter) -> Self {
        Self {
            policy,
            palette,
            formatter,
        }
    }

    pub fn with_policy(policy: RenderPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &RenderPolicy {
        &self.policy
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Add the derived columns the policy asks for.
    pub fn augment<G: Augment + ?Sized>(&self, grid: &G) -> AugmentedGrid {
        grid.augment(self)
    }

    fn augment_raw(&self, grid: &RawGrid) -> AugmentedGrid {
        let policy = &self.policy;
        let width = grid.width();
        let row_count = grid.len();
        let mut rows: Vec<Vec<Cell>> = grid
            .rows()
            .iter()
            .map(|row| {
                let mut cells: Vec<Cell> = row.iter().map(|s| Cell::Text(s.clone())).collect();
                cells.resize(width, Cell::empty());
                cells
            })
            .collect();

        let roles: Vec<RowRole> = (0..row_count)
            .map(|i| classify(row_count, i, policy))
            .collect();

        let row_number_column =
            policy.row_number_column && !rows.is_empty() && !grid.is_numbered();
        if row_number_column {
            let mut rank = 0;
            for (row, role) in rows.iter_mut().zip(&roles) {
                let cell = if *role == RowRole::Normal {
                    rank += 1;
                    Cell::Text(rank_label(rank))
                } else {
                    Cell::empty()
                };
                row.insert(0, cell);
            }
        }

        let color_column = match policy.color_column_index {
            Some(index) if !rows.is_empty() && !grid.is_colored() => {
                let index = index.min(rows[0].len());
                let cycle = policy.palette_cycle(self.palette.len());
                let mut ordinal = 0;
                for (row, role) in rows.iter_mut().zip(&roles) {
                    let cell = if *role == RowRole::Normal {
                        let color = self.palette.color_at_bounded(ordinal, cycle);
                        ordinal += 1;
                        Cell::Marker(color)
                    } else {
                        Cell::empty()
                    };
                    row.insert(index, cell);
                }
                Some(index)
            }
            _ => None,
        };

        AugmentedGrid {
            rows,
            row_number_column,
            color_column,
        }
    }

    pub fn classify_row(&self, grid: &AugmentedGrid, row_index: usize) -> RowRole {
        classify(grid.len(), row_index, &self.policy)
    }

    /// Display value for `cell`, found at (`row_index`, `cell_index`).
    pub fn render_cell(
        &self,
        grid: &AugmentedGrid,
        row_index: usize,
        cell_index: usize,
        cell: &Cell,
    ) -> DisplayValue {
        let role = self.classify_row(grid, row_index);
        match cell {
            Cell::Marker(color) if role != RowRole::Summary => DisplayValue::Dot(*color),
            Cell::Marker(_) => DisplayValue::Empty,
            Cell::Text(text)
                if Some(cell_index) == self.policy.currency_column_index
                    && role != RowRole::Header =>
            {
                DisplayValue::Text(self.formatter.currency_str(text))
            }
            Cell::Text(text) if text.is_empty() => DisplayValue::Empty,
            Cell::Text(text) => DisplayValue::Text(text.clone()),
        }
    }

    /// Display value at a position; out-of-range positions render empty.
    pub fn render_cell_at(
        &self,
        grid: &AugmentedGrid,
        row_index: usize,
        cell_index: usize,
    ) -> DisplayValue {
        match grid.cell(row_index, cell_index) {
            Some(cell) => self.render_cell(grid, row_index, cell_index, cell),
            None => DisplayValue::Empty,
        }
    }

    /// Render every row of an augmented grid.
    pub fn render(&self, grid: &AugmentedGrid) -> RenderedTable {
        let rows = grid
            .rows()
            .iter()
            .enumerate()
            .map(|(row_index, row)| RenderedRow {
                role: self.classify_row(grid, row_index),
                cells: row
                    .iter()
                    .enumerate()
                    .map(|(cell_index, cell)| self.render_cell(grid, row_index, cell_index, cell))
                    .collect(),
                id: self.on_row_activated(row_index).map(str::to_string),
            })
            .collect();
        RenderedTable { rows }
    }

    /// Entity id for an activated row, using the policy's `row_ids`.
    pub fn on_row_activated(&self, row_index: usize) -> Option<&str> {
        resolve_row_id(row_index, &self.policy.row_ids, &self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_rows(grid: &AugmentedGrid) -> Vec<Vec<String>> {
        grid.to_text_rows()
    }

    #[test]
    fn test_rank_label() {
        assert_eq!(rank_label(1), "01");
        assert_eq!(rank_label(12), "12");
        assert_eq!(rank_label(100), "100");
    }

    #[test]
    fn test_plain_grid_is_numbered() {
        let renderer = TabularRenderer::default();
        let grid = RawGrid::from_rows([["a"], ["b"], ["c"]]);
        let out = renderer.augment(&grid);
        assert_eq!(
            text_rows(&out),
            vec![vec!["01", "a"], vec!["02", "b"], vec!["03", "c"]]
        );
        assert!(out.has_row_number_column());
    }

    #[test]
    fn test_header_and_summary_skip_numbering() {
        let renderer = TabularRenderer::with_policy(RenderPolicy {
            has_header_row: true,
            bold_last_row: true,
            ..RenderPolicy::default()
        });
        let grid = RawGrid::from_rows([["Name"], ["a"], ["b"], ["Total"]]);
        let out = renderer.augment(&grid);
        assert_eq!(
            text_rows(&out),
            vec![
                vec!["", "Name"],
                vec!["01", "a"],
                vec!["02", "b"],
                vec!["", "Total"],
            ]
        );
    }

    #[test]
    fn test_row_number_disabled() {
        let renderer = TabularRenderer::with_policy(RenderPolicy {
            row_number_column: false,
            ..RenderPolicy::default()
        });
        let out = renderer.augment(&RawGrid::from_rows([["a", "1"]]));
        assert_eq!(text_rows(&out), vec![vec!["a", "1"]]);
        assert!(!out.has_row_number_column());
    }

    #[test]
    fn test_pre_numbered_grid_is_left_alone() {
        let renderer = TabularRenderer::default();
        let grid = RawGrid::from_rows([["01", "a"], ["02", "b"]]).mark_numbered();
        let out = renderer.augment(&grid);
        assert_eq!(text_rows(&out), vec![vec!["01", "a"], vec!["02", "b"]]);
    }

    #[test]
    fn test_row_starting_with_01_is_still_numbered() {
        let renderer = TabularRenderer::default();
        let grid = RawGrid::from_rows([["01", "January"]]);
        let out = renderer.augment(&grid);
        assert_eq!(text_rows(&out), vec![vec!["01", "01", "January"]]);
    }

    #[test]
    fn test_color_column_inserted_after_rank() {
        let renderer = TabularRenderer::with_policy(RenderPolicy {
            bold_last_row: true,
            color_column_index: Some(1),
            ..RenderPolicy::default()
        });
        let grid = RawGrid::from_rows([["a", "1"], ["b", "2"], ["Total", "3"]]);
        let out = renderer.augment(&grid);
        let palette = Palette::default();
        assert_eq!(out.color_column(), Some(1));
        assert_eq!(out.cell(0, 1), Some(&Cell::Marker(palette.color_at(0))));
        assert_eq!(out.cell(1, 1), Some(&Cell::Marker(palette.color_at(1))));
        assert_eq!(out.cell(2, 1), Some(&Cell::empty()));
        assert_eq!(out.cell(2, 0), Some(&Cell::empty()));
        assert_eq!(out.cell(2, 2), Some(&Cell::from("Total")));
    }

    #[test]
    fn test_color_index_past_end_appends() {
        let renderer = TabularRenderer::with_policy(RenderPolicy {
            row_number_column: false,
            color_column_index: Some(10),
            ..RenderPolicy::default()
        });
        let out = renderer.augment(&RawGrid::from_rows([["a"]]));
        assert_eq!(out.color_column(), Some(1));
        assert!(out.cell(0, 1).is_some_and(Cell::is_marker));
    }

    #[test]
    fn test_pre_colored_grid_is_left_alone() {
        let renderer = TabularRenderer::with_policy(RenderPolicy {
            row_number_column: false,
            color_column_index: Some(0),
            ..RenderPolicy::default()
        });
        let out = renderer.augment(&RawGrid::from_rows([["a"]]).mark_colored());
        assert_eq!(out.width(), 1);
        assert_eq!(out.color_column(), None);
    }

    #[test]
    fn test_ragged_rows_padded() {
        let renderer = TabularRenderer::with_policy(RenderPolicy {
            row_number_column: false,
            ..RenderPolicy::default()
        });
        let grid = RawGrid::from_rows(vec![vec!["a", "b"], vec!["c"]]);
        let out = renderer.augment(&grid);
        assert_eq!(text_rows(&out), vec![vec!["a", "b"], vec!["c", ""]]);
    }

    #[test]
    fn test_empty_grid_stays_empty() {
        let renderer = TabularRenderer::with_policy(RenderPolicy {
            color_column_index: Some(0),
            ..RenderPolicy::default()
        });
        let out = renderer.augment(&RawGrid::default());
        assert!(out.is_empty());
        assert!(!out.has_row_number_column());
        assert_eq!(out.color_column(), None);
    }

    #[test]
    fn test_augment_is_idempotent() {
        let renderer = TabularRenderer::with_policy(RenderPolicy {
            color_column_index: Some(1),
            ..RenderPolicy::default()
        });
        let once = renderer.augment(&RawGrid::from_rows([["a"], ["b"]]));
        let twice = renderer.augment(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_classify_single_row_prefers_summary() {
        let policy = RenderPolicy {
            has_header_row: true,
            bold_last_row: true,
            ..RenderPolicy::default()
        };
        assert_eq!(classify(1, 0, &policy), RowRole::Summary);
        assert_eq!(classify(2, 0, &policy), RowRole::Header);
        assert_eq!(classify(2, 1, &policy), RowRole::Summary);
        assert_eq!(classify(2, 5, &policy), RowRole::Normal);
    }

    #[test]
    fn test_single_row_header_and_summary_gets_no_rank() {
        let renderer = TabularRenderer::with_policy(RenderPolicy {
            has_header_row: true,
            bold_last_row: true,
            color_column_index: Some(1),
            ..RenderPolicy::default()
        });
        let out = renderer.augment(&RawGrid::from_rows([["Only"]]));
        assert_eq!(text_rows(&out), vec![vec!["", "", "Only"]]);
    }

    #[test]
    fn test_render_cell_marker_and_currency() {
        let renderer = TabularRenderer::with_policy(RenderPolicy {
            bold_last_row: true,
            currency_column_index: Some(3),
            color_column_index: Some(1),
            ..RenderPolicy::default()
        });
        let out = renderer.augment(&RawGrid::from_rows([["a", "10"], ["Total", "10"]]));
        // columns: rank, dot, name, amount
        let red = Palette::default().color_at(0);
        assert_eq!(renderer.render_cell_at(&out, 0, 1), DisplayValue::Dot(red));
        assert_eq!(renderer.render_cell_at(&out, 1, 1), DisplayValue::Empty);
        assert_eq!(
            renderer.render_cell_at(&out, 0, 2),
            DisplayValue::Text("a".into())
        );
        assert_eq!(
            renderer.render_cell_at(&out, 1, 3),
            DisplayValue::Text("10,00\u{a0}zł".into())
        );
        assert_eq!(renderer.render_cell_at(&out, 0, 9), DisplayValue::Empty);
    }

    #[test]
    fn test_marker_on_summary_row_renders_empty() {
        let renderer = TabularRenderer::with_policy(RenderPolicy {
            bold_last_row: true,
            ..RenderPolicy::default()
        });
        let grid = renderer.augment(&RawGrid::from_rows([["a"], ["b"]]));
        let marker = Cell::Marker(Color::rgb(1, 2, 3));
        assert_eq!(renderer.render_cell(&grid, 1, 0, &marker), DisplayValue::Empty);
        assert_eq!(
            renderer.render_cell(&grid, 0, 0, &marker),
            DisplayValue::Dot(Color::rgb(1, 2, 3))
        );
    }

    #[test]
    fn test_marker_never_currency_formatted() {
        let renderer = TabularRenderer::with_policy(RenderPolicy {
            currency_column_index: Some(0),
            ..RenderPolicy::default()
        });
        let grid = renderer.augment(&RawGrid::from_rows([["a"]]));
        let marker = Cell::Marker(Color::rgb(9, 9, 9));
        assert_eq!(
            renderer.render_cell(&grid, 0, 0, &marker),
            DisplayValue::Dot(Color::rgb(9, 9, 9))
        );
    }

    #[test]
    fn test_header_label_not_currency_formatted() {
        let renderer = TabularRenderer::with_policy(RenderPolicy {
            has_header_row: true,
            currency_column_index: Some(1),
            ..RenderPolicy::default()
        });
        let grid = renderer.augment(&RawGrid::from_rows([["Amount"], ["5"]]));
        assert_eq!(
            renderer.render_cell_at(&grid, 0, 1),
            DisplayValue::Text("Amount".into())
        );
        assert_eq!(
            renderer.render_cell_at(&grid, 1, 1),
            DisplayValue::Text("5,00\u{a0}zł".into())
        );
    }

    #[test]
    fn test_on_row_activated() {
        let policy = RenderPolicy {
            has_header_row: true,
            ..RenderPolicy::default()
        }
        .with_row_ids(["x", "y"]);
        let renderer = TabularRenderer::with_policy(policy);
        assert_eq!(renderer.on_row_activated(0), None);
        assert_eq!(renderer.on_row_activated(1), Some("x"));
        assert_eq!(renderer.on_row_activated(2), Some("y"));
        assert_eq!(renderer.on_row_activated(3), None);
    }

    #[test]
    fn test_render_attaches_roles_and_ids() {
        let renderer = TabularRenderer::with_policy(
            RenderPolicy {
                bold_last_row: true,
                ..RenderPolicy::default()
            }
            .with_row_ids(["acc-1"]),
        );
        let table = renderer.render(&renderer.augment(&RawGrid::from_rows([["a"], ["Total"]])));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].role, RowRole::Normal);
        assert_eq!(table.rows[0].id.as_deref(), Some("acc-1"));
        assert_eq!(table.rows[1].role, RowRole::Summary);
        assert_eq!(table.rows[1].id, None);
        assert_eq!(table.width(), 2);
    }
}
