//! Playback controller: a cursor over a finished trace plus auto-play
//!
//! The controller owns exactly one optional deadline. Scheduling an advance
//! overwrites it, cancelling clears it, and dropping or replacing the session
//! drops it with everything else, so a stale advance can never fire against a
//! new trace. The UI loop drives time by calling [`Playback::poll`].
//!
//! Every operation that is not valid in the current mode leaves the session
//! untouched and returns `false`.

use crate::constants::{DEFAULT_SPEED_MS, MAX_SPEED_MS, MIN_SPEED_MS};
use crate::trace::{Step, Trace};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Reset; waiting for a trace to be (re)loaded
    Idle,
    Playing,
    Paused,
    /// The cursor sits on the last step
    Finished,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Idle => "idle",
            Mode::Playing => "playing",
            Mode::Paused => "paused",
            Mode::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// One playback session over one trace
#[derive(Debug)]
pub struct Playback<S> {
    trace: Trace<S>,
    cursor: usize,
    speed: Duration,
    mode: Mode,
    pending: Option<Instant>, // The single scheduled advance
}

impl<S> Playback<S> {
    /// Start a session at the first step with the default speed
    pub fn new(trace: Trace<S>) -> Self {
        Self::with_speed(trace, DEFAULT_SPEED_MS)
    }

    pub fn with_speed(trace: Trace<S>, speed_ms: u64) -> Self {
        let mode = Self::resting_mode(&trace, 0);
        debug!(algorithm = trace.algorithm(), steps = trace.len(), %mode, "playback loaded");
        Playback {
            trace,
            cursor: 0,
            speed: clamp_speed(speed_ms),
            mode,
            pending: None,
        }
    }

    /// Replace the trace wholesale, cancelling anything scheduled. Keeps the speed.
    pub fn load(&mut self, trace: Trace<S>) {
        self.pending = None;
        self.cursor = 0;
        self.trace = trace;
        let mode = Self::resting_mode(&self.trace, 0);
        debug!(algorithm = self.trace.algorithm(), steps = self.trace.len(), "playback reloaded");
        self.set_mode(mode);
    }

    /// Start auto-play using the current time
    pub fn play(&mut self) -> bool {
        self.play_at(Instant::now())
    }

    /// Start auto-play; the first advance is due at `now + speed`
    pub fn play_at(&mut self, now: Instant) -> bool {
        if self.mode != Mode::Paused {
            return false;
        }
        self.pending = Some(now + self.speed);
        self.set_mode(Mode::Playing);
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.mode != Mode::Playing {
            return false;
        }
        self.pending = None;
        self.set_mode(Mode::Paused);
        true
    }

    /// Advance one step by hand
    pub fn step(&mut self) -> bool {
        if self.mode != Mode::Paused {
            return false;
        }
        self.advance();
        true
    }

    /// Move back one step by hand
    pub fn step_back(&mut self) -> bool {
        if !matches!(self.mode, Mode::Paused | Mode::Finished) || self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        trace!(cursor = self.cursor, "stepped back");
        self.set_mode(Mode::Paused);
        true
    }

    pub fn jump_to_start(&mut self) -> bool {
        self.jump(0)
    }

    pub fn jump_to_end(&mut self) -> bool {
        self.jump(self.trace.len().saturating_sub(1))
    }

    /// Cancel playback and return to the first step in the `Idle` mode
    pub fn reset(&mut self) {
        self.pending = None;
        self.cursor = 0;
        self.set_mode(Mode::Idle);
    }

    /// Leave `Idle` (or any mode) and start over from the first step
    pub fn restart(&mut self) {
        self.pending = None;
        self.cursor = 0;
        let mode = Self::resting_mode(&self.trace, 0);
        self.set_mode(mode);
    }

    /// Change the auto-play delay. An advance that is already scheduled keeps
    /// its deadline; the new delay applies from the next scheduling on.
    pub fn set_speed(&mut self, speed_ms: u64) -> u64 {
        self.speed = clamp_speed(speed_ms);
        debug!(speed_ms = self.speed_ms(), "speed changed");
        self.speed_ms()
    }

    /// Fire the pending advance if it is due by now
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// Fire every advance that is due by `now`. Missed ticks are caught up by
    /// scheduling each one from the previous deadline, not from `now`.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        let mut advanced = false;
        while let Some(deadline) = self.pending {
            if now < deadline {
                break;
            }
            self.advance();
            advanced = true;
            if self.mode == Mode::Playing {
                self.pending = Some(deadline + self.speed);
            }
        }
        advanced
    }

    /// The step under the cursor
    pub fn current(&self) -> &Step<S> {
        self.trace.get(self.cursor).unwrap_or_else(|| self.trace.last())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn speed(&self) -> Duration {
        self.speed
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed.as_millis() as u64
    }

    /// When the scheduled advance is due, if one is pending
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending
    }

    pub fn trace(&self) -> &Trace<S> {
        &self.trace
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor + 1 >= self.trace.len()
    }

    fn resting_mode(trace: &Trace<S>, cursor: usize) -> Mode {
        if cursor + 1 >= trace.len() {
            Mode::Finished
        } else {
            Mode::Paused
        }
    }

    /// Move forward one step, finishing (and cancelling) on the last one
    fn advance(&mut self) {
        if self.is_at_end() {
            self.pending = None;
            self.set_mode(Mode::Finished);
            return;
        }
        self.cursor += 1;
        trace!(cursor = self.cursor, "advanced");
        if self.is_at_end() {
            self.pending = None;
            self.set_mode(Mode::Finished);
        }
    }

    fn jump(&mut self, target: usize) -> bool {
        if self.mode == Mode::Idle {
            return false;
        }
        self.pending = None;
        self.cursor = target;
        let mode = Self::resting_mode(&self.trace, target);
        self.set_mode(mode);
        true
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!(from = %self.mode, to = %mode, cursor = self.cursor, "playback transition");
        }
        self.mode = mode;
    }
}

fn clamp_speed(speed_ms: u64) -> Duration {
    Duration::from_millis(speed_ms.clamp(MIN_SPEED_MS, MAX_SPEED_MS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::produce;

    fn counting(len: usize) -> Trace<usize> {
        produce("count", Ok(len), |len, rec| {
            for i in 0..len {
                rec.record(&i, Some(i), format!("step {}", i), [i]);
            }
        })
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn new_session_rests_on_first_step() {
        let playback = Playback::new(counting(3));
        assert_eq!(playback.cursor(), 0);
        assert_eq!(playback.mode(), Mode::Paused);
        assert_eq!(playback.pending_deadline(), None);
        assert_eq!(playback.speed(), ms(DEFAULT_SPEED_MS));
    }

    #[test]
    fn single_step_trace_is_finished_and_cannot_play() {
        let mut playback = Playback::new(counting(1));
        assert_eq!(playback.mode(), Mode::Finished);
        assert!(!playback.play());
        assert!(!playback.step());
        assert_eq!(playback.pending_deadline(), None);
    }

    #[test]
    fn five_steps_finish_after_fifty_ms() {
        let t0 = Instant::now();
        let mut playback = Playback::with_speed(counting(5), 10);
        assert!(playback.play_at(t0));
        assert_eq!(playback.pending_deadline(), Some(t0 + ms(10)));

        assert!(!playback.poll_at(t0 + ms(5)));
        assert_eq!(playback.cursor(), 0);

        assert!(playback.poll_at(t0 + ms(50)));
        assert_eq!(playback.cursor(), 4);
        assert_eq!(playback.mode(), Mode::Finished);
        assert_eq!(playback.pending_deadline(), None);
    }

    #[test]
    fn ticks_are_scheduled_from_the_previous_deadline() {
        let t0 = Instant::now();
        let mut playback = Playback::with_speed(counting(10), 10);
        playback.play_at(t0);
        playback.poll_at(t0 + ms(13));
        assert_eq!(playback.cursor(), 1);
        assert_eq!(playback.pending_deadline(), Some(t0 + ms(20)));
    }

    #[test]
    fn speed_change_keeps_scheduled_deadline() {
        let t0 = Instant::now();
        let mut playback = Playback::with_speed(counting(5), 100);
        playback.play_at(t0);
        playback.set_speed(10);
        assert_eq!(playback.pending_deadline(), Some(t0 + ms(100)));

        playback.poll_at(t0 + ms(100));
        assert_eq!(playback.cursor(), 1);
        assert_eq!(playback.pending_deadline(), Some(t0 + ms(110)));
    }

    #[test]
    fn speed_is_clamped() {
        let mut playback = Playback::new(counting(2));
        assert_eq!(playback.set_speed(0), MIN_SPEED_MS);
        assert_eq!(playback.set_speed(u64::MAX), MAX_SPEED_MS);
    }

    #[test]
    fn manual_step_only_while_paused() {
        let mut playback = Playback::new(counting(3));
        assert!(playback.play());
        assert!(!playback.step());
        assert!(playback.pause());
        assert_eq!(playback.pending_deadline(), None);
        assert!(playback.step());
        assert!(playback.step());
        assert_eq!(playback.mode(), Mode::Finished);
        assert!(!playback.step());
        assert_eq!(playback.cursor(), 2);
    }

    #[test]
    fn play_when_finished_is_a_no_op() {
        let mut playback = Playback::new(counting(2));
        playback.jump_to_end();
        assert_eq!(playback.mode(), Mode::Finished);
        assert!(!playback.play());
        assert_eq!(playback.pending_deadline(), None);
    }

    #[test]
    fn step_back_leaves_finished() {
        let mut playback = Playback::new(counting(3));
        playback.jump_to_end();
        assert!(playback.step_back());
        assert_eq!(playback.cursor(), 1);
        assert_eq!(playback.mode(), Mode::Paused);
        playback.jump_to_start();
        assert!(!playback.step_back());
    }

    #[test]
    fn reset_cancels_and_idles() {
        let mut playback = Playback::new(counting(4));
        playback.step();
        playback.play();
        playback.reset();
        assert_eq!(playback.mode(), Mode::Idle);
        assert_eq!(playback.cursor(), 0);
        assert_eq!(playback.pending_deadline(), None);
        assert_eq!(playback.current().state, 0);

        assert!(!playback.play());
        assert!(!playback.step());
        assert!(!playback.jump_to_end());
        playback.restart();
        assert_eq!(playback.mode(), Mode::Paused);
    }

    #[test]
    fn load_replaces_trace_and_cancels() {
        let t0 = Instant::now();
        let mut playback = Playback::with_speed(counting(4), 10);
        playback.play_at(t0);
        playback.load(counting(2));
        assert_eq!(playback.pending_deadline(), None);
        assert_eq!(playback.mode(), Mode::Paused);
        assert!(!playback.poll_at(t0 + ms(1000)));
        assert_eq!(playback.cursor(), 0);
        assert_eq!(playback.speed_ms(), 10);
    }
}
