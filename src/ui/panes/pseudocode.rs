//! Pseudocode pane with the current line marked
//!
//! Lines get light keyword highlighting. The pane scrolls so the current line
//! stays at a fixed visual row while stepping.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Split a pseudocode line into styled words and delimiters
fn highlight_pseudocode(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut word = String::new();
    for c in line.chars() {
        if c.is_alphanumeric() || c == '_' {
            word.push(c);
            continue;
        }
        if !word.is_empty() {
            spans.push(Span::styled(word.clone(), word_style(&word, c == '(')));
            word.clear();
        }
        let style = match c {
            '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
    }
    if !word.is_empty() {
        let style = word_style(&word, false);
        spans.push(Span::styled(word, style));
    }

    Line::from(spans)
}

fn word_style(word: &str, is_call: bool) -> Style {
    match word {
        "if" | "else" | "for" | "each" | "in" | "while" | "return" | "and" | "or" | "not"
        | "continue" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "true" | "false" | "null" => Style::default().fg(DEFAULT_THEME.number),
        _ if word.chars().all(|c| c.is_ascii_digit()) => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        _ if is_call => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Scroll state for the pseudocode pane
#[derive(Debug, Default)]
pub struct PseudocodeScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Render the listing, marking `current_line` (zero-based) if there is one
pub fn render_pseudocode_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    pseudocode: &[&str],
    current_line: Option<usize>,
    scroll_state: &mut PseudocodeScrollState,
) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border));

    let total_lines = pseudocode.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    if let Some(line) = current_line.filter(|&l| l < total_lines) {
        scroll_state.offset = line.saturating_sub(target_row);
        if total_lines > visible_height {
            scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
        } else {
            scroll_state.offset = 0;
        }
    }

    let visible_lines: Vec<Line> = pseudocode
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, text)| {
            let is_current = current_line == Some(idx);
            let marker = if is_current { "▶" } else { " " };
            let number_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content = highlight_pseudocode(text);
            if is_current {
                let background = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content.spans {
                    span.style = span.style.patch(background);
                }
            }

            let mut spans = vec![Span::styled(format!("{}{:3} ", marker, idx), number_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(visible_lines).block(block), area);
}
