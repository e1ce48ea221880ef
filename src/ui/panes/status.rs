//! Status bar with step position, playback mode and keybindings

use crate::playback::Mode;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// What the status bar shows for one frame
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub cursor: usize,
    pub total_steps: usize,
    pub mode: Mode,
    pub speed_ms: u64,
    pub rejected: bool,
}

/// Badge text and colour for the playback mode
fn mode_badge(mode: Mode, cursor: usize) -> (&'static str, Color) {
    match mode {
        Mode::Playing => (" ▶ PLAYING ", DEFAULT_THEME.secondary),
        Mode::Finished => (" END ", DEFAULT_THEME.error),
        Mode::Idle => (" RESET ", DEFAULT_THEME.comment),
        Mode::Paused if cursor == 0 => (" START ", DEFAULT_THEME.success),
        Mode::Paused => (" PAUSED ", DEFAULT_THEME.primary),
    }
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, data: &StatusRenderData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let bar = Style::default().bg(DEFAULT_THEME.current_line_bg);
    let step_bg = if data.rejected {
        DEFAULT_THEME.error
    } else {
        DEFAULT_THEME.primary
    };

    let left_spans = vec![
        Span::styled(
            format!(" Step {}/{} ", data.cursor + 1, data.total_steps),
            Style::default()
                .bg(step_bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", bar.fg(DEFAULT_THEME.comment)),
        Span::styled(format!(" {} ", data.message), bar.fg(DEFAULT_THEME.fg)),
    ];
    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(bar)
            .alignment(Alignment::Left),
        layout[0],
    );

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar.fg(DEFAULT_THEME.fg);
    let sep_style = bar.fg(DEFAULT_THEME.comment);

    let mut right_spans = Vec::new();
    for (key, description) in [
        ("←/→", "step"),
        ("⎵", "play"),
        ("+/-", "speed"),
        ("↵/⌫", "end/start"),
        ("r", "rerun"),
        ("q", "quit"),
    ] {
        right_spans.push(Span::styled(format!(" {} ", key), key_style));
        right_spans.push(Span::styled(format!(" {} ", description), desc_style));
        right_spans.push(Span::styled("│", sep_style));
    }
    right_spans.push(Span::styled(format!(" {}ms ", data.speed_ms), desc_style));

    let (badge, colour) = mode_badge(data.mode, data.cursor);
    right_spans.push(Span::styled(
        badge,
        Style::default()
            .bg(colour)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    ));

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(bar)
            .alignment(Alignment::Right),
        layout[1],
    );
}
