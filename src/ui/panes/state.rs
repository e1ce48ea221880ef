//! State pane: the step's grid with highlighted entities

use crate::trace::{Grid, Highlight};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Build the styled lines for a grid; labels are right-aligned to a common width
pub fn grid_lines<'a>(grid: &'a Grid, highlight: &Highlight) -> Vec<Line<'a>> {
    let width = grid
        .rows
        .iter()
        .map(|row| row.label.chars().count())
        .max()
        .unwrap_or(0);

    grid.rows
        .iter()
        .map(|row| {
            let row_hit = row.id.is_some_and(|id| highlight.contains(&id));
            let label_style = if row_hit {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut spans = vec![
                Span::styled(format!("{:>width$}", row.label, width = width), label_style),
                Span::styled(" │ ", Style::default().fg(DEFAULT_THEME.border)),
            ];
            for cell in &row.cells {
                let hit = row_hit || cell.id.is_some_and(|id| highlight.contains(&id));
                let style = if hit {
                    Style::default()
                        .bg(DEFAULT_THEME.highlight_bg)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(DEFAULT_THEME.fg)
                };
                spans.push(Span::styled(format!(" {} ", cell.text), style));
            }
            Line::from(spans)
        })
        .collect()
}

/// Render the current state grid
pub fn render_state_pane(
    frame: &mut Frame,
    area: Rect,
    algorithm: &str,
    grid: &Grid,
    highlight: &Highlight,
) {
    let block = Block::default()
        .title(format!(" State: {} ", algorithm))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border));

    let paragraph = Paragraph::new(grid_lines(grid, highlight))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
