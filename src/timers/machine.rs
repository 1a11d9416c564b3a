use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Not started; remaining time equals the full duration.
    Idle,
    /// Decrementing once per elapsed second.
    Running,
    /// Frozen at the current remaining time.
    Paused,
    /// Remaining reached zero; the completion signal has fired.
    Expired,
}

/// Result of advancing the countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Advanced,
    /// The run just completed. Emitted exactly once per run; later ticks
    /// against the expired machine report `Ignored`.
    Expired,
    /// The machine was not running; nothing changed.
    Ignored,
}

/// Per-ingredient countdown. Pure state: the 1 Hz wake-up lives in the
/// registry so transitions stay testable without a clock.
#[derive(Debug)]
pub struct TimerMachine {
    duration_secs: u64,
    remaining_secs: u64,
    state: TimerState,
}

impl TimerMachine {
    pub fn new(duration_secs: u64) -> Self {
        Self { duration_secs, remaining_secs: duration_secs, state: TimerState::Idle }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// Idle and Paused resume from the current remaining time; Expired
    /// restarts from the full duration.
    pub fn start(&mut self) {
        if self.state == TimerState::Expired || self.remaining_secs == 0 {
            self.remaining_secs = self.duration_secs;
        }
        self.state = TimerState::Running;
    }

    /// Freeze a running countdown. No effect in any other state.
    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    /// Back to Idle at the full duration, from any state.
    pub fn reset(&mut self) {
        self.remaining_secs = self.duration_secs;
        self.state = TimerState::Idle;
    }

    /// Advance by one second of elapsed time.
    pub fn tick(&mut self) -> Tick {
        if self.state != TimerState::Running {
            return Tick::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = TimerState::Expired;
            Tick::Expired
        } else {
            Tick::Advanced
        }
    }
}
