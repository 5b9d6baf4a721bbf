//! Focus/break timer collaborator
//!
//! A plain pomodoro state machine driven by the shell: one `tick()` per
//! second while running. Completing a focus session switches to break and
//! counts it; completing a break switches back to focus. Completion always
//! stops the clock.

use serde::{Deserialize, Serialize};

/// Allowed focus duration range, minutes
const FOCUS_MINUTES_RANGE: std::ops::RangeInclusive<u32> = 1..=120;
/// Allowed break duration range, minutes
const BREAK_MINUTES_RANGE: std::ops::RangeInclusive<u32> = 1..=60;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Focus,
    Break,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusTimer {
    session: SessionKind,
    focus_minutes: u32,
    break_minutes: u32,
    seconds_left: u32,
    running: bool,
    sessions_completed: u32,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new(25, 5)
    }
}

impl FocusTimer {
    pub fn new(focus_minutes: u32, break_minutes: u32) -> Self {
        let focus_minutes = focus_minutes.clamp(*FOCUS_MINUTES_RANGE.start(), *FOCUS_MINUTES_RANGE.end());
        let break_minutes = break_minutes.clamp(*BREAK_MINUTES_RANGE.start(), *BREAK_MINUTES_RANGE.end());
        Self {
            session: SessionKind::Focus,
            focus_minutes,
            break_minutes,
            seconds_left: focus_minutes * 60,
            running: false,
            sessions_completed: 0,
        }
    }

    pub fn session(&self) -> SessionKind {
        self.session
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    fn session_seconds(&self) -> u32 {
        match self.session {
            SessionKind::Focus => self.focus_minutes * 60,
            SessionKind::Break => self.break_minutes * 60,
        }
    }

    /// Elapsed share of the current session, 0-100
    pub fn progress_percent(&self) -> u32 {
        let total = self.session_seconds();
        if total == 0 {
            return 0;
        }
        (total - self.seconds_left) * 100 / total
    }

    /// Advance the clock by one second. No-op while paused.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        if self.seconds_left > 1 {
            self.seconds_left -= 1;
            return;
        }

        // Session complete
        self.running = false;
        match self.session {
            SessionKind::Focus => {
                self.sessions_completed += 1;
                self.session = SessionKind::Break;
                self.seconds_left = self.break_minutes * 60;
                tracing::info!(
                    "[Timer] Focus session complete ({} total), switching to break",
                    self.sessions_completed
                );
            }
            SessionKind::Break => {
                self.session = SessionKind::Focus;
                self.seconds_left = self.focus_minutes * 60;
                tracing::info!("[Timer] Break complete, switching to focus");
            }
        }
    }

    /// Toggle running. A finished session restarts from its full duration.
    pub fn start_pause(&mut self) {
        if self.seconds_left == 0 {
            self.seconds_left = self.session_seconds();
        }
        self.running = !self.running;
    }

    /// Stop and reload the current session's duration
    pub fn reset(&mut self) {
        self.running = false;
        self.seconds_left = self.session_seconds();
    }

    /// Stop and switch to a focus session
    pub fn set_focus(&mut self) {
        self.running = false;
        self.session = SessionKind::Focus;
        self.seconds_left = self.focus_minutes * 60;
    }

    /// Stop and switch to a break session
    pub fn set_break(&mut self) {
        self.running = false;
        self.session = SessionKind::Break;
        self.seconds_left = self.break_minutes * 60;
    }

    /// Change the focus duration. Ignored while running; reloads the clock
    /// when a focus session is waiting to start.
    pub fn set_focus_minutes(&mut self, minutes: u32) {
        if self.running {
            return;
        }
        self.focus_minutes = minutes.clamp(*FOCUS_MINUTES_RANGE.start(), *FOCUS_MINUTES_RANGE.end());
        if self.session == SessionKind::Focus {
            self.seconds_left = self.focus_minutes * 60;
        }
    }

    /// Change the break duration. Ignored while running.
    pub fn set_break_minutes(&mut self, minutes: u32) {
        if self.running {
            return;
        }
        self.break_minutes = minutes.clamp(*BREAK_MINUTES_RANGE.start(), *BREAK_MINUTES_RANGE.end());
        if self.session == SessionKind::Break {
            self.seconds_left = self.break_minutes * 60;
        }
    }

    /// mm:ss display string
    pub fn format_time(&self) -> String {
        format!("{:02}:{:02}", self.seconds_left / 60, self.seconds_left % 60)
    }
}
