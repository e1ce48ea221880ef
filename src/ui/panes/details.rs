//! Details pane: step message, annotations and rejection notice

use crate::trace::Step;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render_details_pane<S>(frame: &mut Frame, area: Rect, step: &Step<S>, rejected: bool) {
    let block = Block::default()
        .title(" Step ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border));

    let message_style = if rejected {
        Style::default()
            .fg(DEFAULT_THEME.error)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(DEFAULT_THEME.fg)
            .add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![Line::from(Span::styled(step.message.as_str(), message_style))];
    if !step.annotations.is_empty() {
        lines.push(Line::default());
    }
    for annotation in &step.annotations {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", annotation.label),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
            Span::styled(
                annotation.value.as_str(),
                Style::default().fg(DEFAULT_THEME.annotation),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
