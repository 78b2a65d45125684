//! Table widget - draws a rendered table with its row cursor
//!
//! Displays:
//! - Rank column and cell text as rendered
//! - Color dots as `●` in the marker color
//! - Header and summary rows in bold
//! - The selected row highlighted

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, Widget},
};

use finboard_core::DisplayValue;

use crate::app::TableTab;
use crate::theme::Theme;

/// Table widget over one tab.
pub struct TableView<'a> {
    tab: &'a TableTab,
    theme: &'a Theme,
}

impl<'a> TableView<'a> {
    pub fn new(tab: &'a TableTab, theme: &'a Theme) -> Self {
        Self { tab, theme }
    }

    /// Column widths from the widest rendered cell in each column.
    fn column_widths(&self) -> Vec<Constraint> {
        let mut widths = vec![0u16; self.tab.rendered.width()];
        for row in &self.tab.rendered.rows {
            for (i, cell) in row.cells.iter().enumerate() {
                let len = u16::try_from(cell.as_plain().chars().count()).unwrap_or(u16::MAX);
                widths[i] = widths[i].max(len);
            }
        }
        widths.into_iter().map(Constraint::Length).collect()
    }

    fn cell(&self, value: &'a DisplayValue) -> Cell<'a> {
        match value {
            DisplayValue::Dot(color) => {
                Cell::from(Span::styled("●", Style::default().fg(self.theme.marker(*color))))
            }
            other => Cell::from(other.as_plain()),
        }
    }
}

impl<'a> Widget for TableView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.tab.is_placeholder {
            format!(" {} [sample data] ", self.tab.title)
        } else {
            format!(" {} ", self.tab.title)
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));

        let rows = self.tab.rendered.rows.iter().enumerate().map(|(i, row)| {
            let style = self.theme.row_style(row.role, i == self.tab.cursor);
            Row::new(row.cells.iter().map(|value| self.cell(value)))
                .style(style)
                .height(1)
        });

        let table = Table::new(rows, self.column_widths())
            .block(block)
            .column_spacing(2);

        table.render(area, buf);

        // Help text at bottom
        let help_y = area.y + area.height.saturating_sub(2);
        let help_area = Rect {
            x: area.x + 2,
            y: help_y,
            width: area.width.saturating_sub(4),
            height: 1,
        };

        let help_text = Line::from(vec![
            Span::styled("↑/↓: ", self.theme.hint()),
            Span::styled("Select", Style::default().fg(self.theme.text_secondary)),
            Span::styled(" │ ", self.theme.hint()),
            Span::styled("Enter: ", self.theme.hint()),
            Span::styled("Open", Style::default().fg(self.theme.text_secondary)),
            Span::styled(" │ ", self.theme.hint()),
            Span::styled("Tab: ", self.theme.hint()),
            Span::styled("Next table", Style::default().fg(self.theme.text_secondary)),
            Span::styled(" │ ", self.theme.hint()),
            Span::styled("q: ", self.theme.hint()),
            Span::styled("Quit", Style::default().fg(self.theme.text_secondary)),
        ]);

        buf.set_line(help_area.x, help_area.y, &help_text, help_area.width);
    }
}
