//! Top-level UI layout — tab bar, active table, status bar.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs};
use ratatui::Frame;

use crate::app::App;
use crate::table_view::TableView;
use crate::theme::Theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &App, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_tabs(f, chunks[0], app, theme);
    f.render_widget(TableView::new(app.active(), theme), chunks[1]);
    draw_status(f, chunks[2], app, theme);
}

fn draw_tabs(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let titles = app
        .tabs
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.title));
    let tabs = Tabs::new(titles)
        .select(app.active_tab)
        .style(Style::default().fg(theme.text_secondary))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled("│", theme.hint()));
    f.render_widget(tabs, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let tab = app.active();
    let mut spans = vec![Span::styled(
        format!(" row {}/{}", (tab.cursor + 1).min(tab.len()), tab.len()),
        theme.hint(),
    )];

    if let Some((msg, level)) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            msg.as_str(),
            Style::default().fg(theme.status_color(*level)),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use finboard_core::config::DashboardConfig;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_draw_shows_tabs_and_status() {
        let mut app = App::new(Vec::new(), &DashboardConfig::default()).unwrap();
        app.set_warning("Row 1 has no id");
        let theme = Theme::default();

        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal.draw(|f| draw(f, &app, &theme)).unwrap();

        let buffer = terminal.backend().buffer();
        let line = |y: u16| -> String {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(line(0).contains("1 Overview"));
        assert!(line(11).contains("row 1/5"));
        assert!(line(11).contains("Row 1 has no id"));
    }
}
