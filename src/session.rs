use std::time::Instant;

use crate::metrics::{self, CharState, Metrics};
use crate::time_series::WpmSample;

/// Countdown length of a default test, in clock seconds.
pub const DEFAULT_DURATION_SECS: u32 = 60;

/// Lifecycle stage of one test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Finished,
}

#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    pub duration_secs: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}

/// Everything the presentation layer may render for one state change.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub phase: Phase,
    pub metrics: Metrics,
    pub clock_remaining: u32,
    pub classes: Vec<CharState>,
}

/// One typing test: reference text, the user's current input, clock
/// bookkeeping, and counters derived from the current snapshot.
///
/// Owns its whole state for its lifetime; restart and new-text requests
/// drop the session and construct a fresh one, never reusing parts.
#[derive(Debug)]
pub struct Session {
    reference: String,
    config: SessionConfig,
    typed: String,
    phase: Phase,
    clock_remaining: u32,
    started_at: Option<Instant>,
    counters: Metrics,
    wpm_samples: Vec<WpmSample>,
}

impl Session {
    pub fn new(reference: String, config: SessionConfig) -> Self {
        assert!(!reference.is_empty(), "reference text must be non-empty");
        Self {
            reference,
            typed: String::new(),
            phase: Phase::NotStarted,
            clock_remaining: config.duration_secs,
            started_at: None,
            counters: Metrics {
                accuracy: 100,
                ..Metrics::default()
            },
            wpm_samples: Vec::new(),
            config,
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn clock_remaining(&self) -> u32 {
        self.clock_remaining
    }

    pub fn counters(&self) -> Metrics {
        self.counters
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn wpm_samples(&self) -> &[WpmSample] {
        &self.wpm_samples
    }

    /// Whole clock seconds the session has been running.
    pub fn elapsed_secs(&self) -> f64 {
        (self.config.duration_secs - self.clock_remaining) as f64
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Replace the typed prefix with a new snapshot of the input field.
    ///
    /// The first non-empty input starts the test. Input after the test
    /// finished is a deliberate no-op, not an error. Counters are always
    /// recomputed from scratch so they agree with the snapshot.
    pub fn on_input(&mut self, new_typed: &str) {
        if self.phase == Phase::Finished {
            return;
        }

        if self.phase == Phase::NotStarted && !new_typed.is_empty() {
            self.phase = Phase::Running;
            self.started_at = Some(Instant::now());
        }

        self.typed.clear();
        self.typed.push_str(new_typed);
        self.counters = metrics::compute(&self.typed, &self.reference, self.elapsed_secs());

        if self.typed == self.reference {
            self.finish();
        }
    }

    /// Advance the countdown by one clock second.
    ///
    /// Only a running session ticks; once Finished (or before the first
    /// keystroke) the clock and counters cannot move, regardless of how
    /// many stray ticks the event plumbing still delivers.
    pub fn on_tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }

        self.clock_remaining -= 1;
        let elapsed = self.elapsed_secs();
        self.wpm_samples.push(WpmSample::new(
            elapsed,
            metrics::words_per_minute(self.counters.correct_keystrokes, elapsed) as f64,
        ));

        if self.clock_remaining == 0 {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.phase = Phase::Finished;
        // Final recompute so the frozen counters carry the finish-time WPM.
        self.counters = metrics::compute(&self.typed, &self.reference, self.elapsed_secs());
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            metrics: self.counters,
            clock_remaining: self.clock_remaining,
            classes: metrics::classify(&self.typed, &self.reference),
        }
    }
}
