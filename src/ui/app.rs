//! Main TUI application state and event loop

use crate::constants::{EVENT_POLL_MS, SPEED_STEP_MS};
use crate::playback::{Mode, Playback};
use crate::trace::{Grid, Trace};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

use super::panes::{self, PseudocodeScrollState, StatusRenderData};

/// Produces a fresh trace each time the session is re-run
pub type Loader = Box<dyn Fn() -> Trace<Grid>>;

/// The main application state
pub struct App {
    /// Current playback session
    pub playback: Playback<Grid>,

    /// Listing the trace's cursor lines index into
    pub pseudocode: &'static [&'static str],

    loader: Loader,

    pub pseudocode_scroll: PseudocodeScrollState,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Run the loader once and start a paused session on its trace
    pub fn new(pseudocode: &'static [&'static str], speed_ms: u64, loader: Loader) -> Self {
        let trace = loader();
        let status_message = match trace.rejection() {
            Some(error) => format!("Input rejected: {}", error),
            None => String::from("Ready!"),
        };
        App {
            playback: Playback::with_speed(trace, speed_ms),
            pseudocode,
            loader,
            pseudocode_scroll: PseudocodeScrollState::default(),
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.playback.poll() && self.playback.mode() == Mode::Finished {
                self.status_message = "Playback complete".to_string();
            }

            // Short poll so the playback deadline is checked often
            if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(main_chunks[0]);

        // Right column: state grid (top) | step details (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[1]);

        let trace = self.playback.trace();
        let step = self.playback.current();

        panes::render_pseudocode_pane(
            frame,
            columns[0],
            "Pseudocode",
            self.pseudocode,
            step.cursor_line,
            &mut self.pseudocode_scroll,
        );
        panes::render_state_pane(
            frame,
            right_rows[0],
            trace.algorithm(),
            &step.state,
            &step.highlight,
        );
        panes::render_details_pane(frame, right_rows[1], step, trace.is_rejected());
        panes::render_status_bar(
            frame,
            main_chunks[1],
            &StatusRenderData {
                message: &self.status_message,
                cursor: self.playback.cursor(),
                total_steps: trace.len(),
                mode: self.playback.mode(),
                speed_ms: self.playback.speed_ms(),
                rejected: trace.is_rejected(),
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.playback.pause();
                self.status_message = if self.playback.step_back() {
                    "Stepped backward".to_string()
                } else {
                    "Already at the first step".to_string()
                };
            }
            KeyCode::Right => {
                self.playback.pause();
                self.status_message = if self.playback.step() {
                    "Stepped forward".to_string()
                } else {
                    "Already at the last step".to_string()
                };
            }
            KeyCode::Char(' ') => self.toggle_play(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let speed = self
                    .playback
                    .set_speed(self.playback.speed_ms().saturating_sub(SPEED_STEP_MS));
                self.status_message = format!("Delay {}ms", speed);
            }
            KeyCode::Char('-') => {
                let speed = self
                    .playback
                    .set_speed(self.playback.speed_ms().saturating_add(SPEED_STEP_MS));
                self.status_message = format!("Delay {}ms", speed);
            }
            KeyCode::Enter => {
                self.playback.jump_to_end();
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.playback.jump_to_start();
                self.status_message = "Jumped to start".to_string();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.rerun(),
            _ => {}
        }
    }

    fn toggle_play(&mut self) {
        match self.playback.mode() {
            Mode::Playing => {
                self.playback.pause();
                self.status_message = "Paused".to_string();
            }
            Mode::Finished => {
                self.status_message = "At the last step; press ⌫ to rewind".to_string();
            }
            Mode::Paused | Mode::Idle => {
                if self.playback.mode() == Mode::Idle {
                    self.playback.restart();
                }
                if self.playback.play() {
                    self.status_message = "Playing...".to_string();
                }
            }
        }
    }

    /// Drop the current session and replay a fresh producer run
    fn rerun(&mut self) {
        self.playback.reset();
        let trace = (self.loader)();
        self.playback.load(trace);
        self.pseudocode_scroll = PseudocodeScrollState::default();
        self.status_message = "Re-ran from the start".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::heap;
    use crate::trace::StateView;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        App::new(
            heap::PSEUDOCODE,
            10,
            Box::new(|| heap::build(&[4, 10, 3, 5, 1]).map_states(StateView::grid)),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn arrows_move_the_cursor() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.playback.cursor(), 2);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.playback.cursor(), 1);
    }

    #[test]
    fn space_toggles_playback() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.playback.mode(), Mode::Playing);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.playback.mode(), Mode::Paused);
        assert_eq!(app.playback.pending_deadline(), None);
    }

    #[test]
    fn speed_keys_clamp() {
        let mut app = app();
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.playback.speed_ms(), 1);
        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.playback.speed_ms(), 101);
    }

    #[test]
    fn rerun_starts_over() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.playback.mode(), Mode::Finished);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.playback.cursor(), 0);
        assert_eq!(app.playback.mode(), Mode::Paused);
    }
}
