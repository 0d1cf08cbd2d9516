//! Countdown engine.
//!
//! A whole-second state machine with no internal clock. The caller owns the
//! periodic source and calls [`CountdownEngine::tick`] once per elapsed
//! second while the engine is running.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped --start--> Running --tick at 1s--> Stopped (Timeout)
//!                    Running --stop--------> Stopped
//! ```
//!
//! The last second is special: a tick with one second left yields
//! [`CountdownSignal::Timeout`] and never a trailing `Tick(0)`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Stopped,
    Running,
}

/// Signal produced by a single [`CountdownEngine::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", content = "remaining_secs", rename_all = "lowercase")]
pub enum CountdownSignal {
    /// One second elapsed; carries the new remaining value.
    Tick(u64),
    /// The final second elapsed.
    Timeout,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountdownEngine {
    running: bool,
    remaining_secs: u64,
    /// Value passed to the last `start`.
    total_secs: u64,
}

impl CountdownEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        if self.running {
            CountdownState::Running
        } else {
            CountdownState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Restart the countdown from `from_secs`. Returns false for `0`.
    pub fn start(&mut self, from_secs: u64) -> bool {
        if from_secs == 0 {
            return false;
        }
        self.remaining_secs = from_secs;
        self.total_secs = from_secs;
        self.running = true;
        true
    }

    /// Stop ticking, keeping the remaining time.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Continue a stopped countdown that has time left.
    pub fn resume(&mut self) -> bool {
        if self.running || self.remaining_secs == 0 {
            return false;
        }
        self.running = true;
        true
    }

    /// Drop back to the not-started state.
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_secs = 0;
        self.total_secs = 0;
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> Option<CountdownSignal> {
        if !self.running {
            return None;
        }
        match self.remaining_secs {
            0 => {
                self.running = false;
                None
            }
            1 => {
                self.remaining_secs = 0;
                self.running = false;
                Some(CountdownSignal::Timeout)
            }
            n => {
                self.remaining_secs = n - 1;
                Some(CountdownSignal::Tick(self.remaining_secs))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_stopped_and_empty() {
        let engine = CountdownEngine::new();
        assert_eq!(engine.state(), CountdownState::Stopped);
        assert_eq!(engine.remaining_secs(), 0);
    }

    #[test]
    fn start_zero_is_noop() {
        let mut engine = CountdownEngine::new();
        assert!(!engine.start(0));
        assert!(!engine.is_running());
        assert_eq!(engine.tick(), None);
    }

    #[test]
    fn five_second_countdown_signal_sequence() {
        let mut engine = CountdownEngine::new();
        engine.start(5);
        let signals: Vec<_> = (0..5).filter_map(|_| engine.tick()).collect();
        assert_eq!(
            signals,
            vec![
                CountdownSignal::Tick(4),
                CountdownSignal::Tick(3),
                CountdownSignal::Tick(2),
                CountdownSignal::Tick(1),
                CountdownSignal::Timeout,
            ]
        );
        assert_eq!(engine.remaining_secs(), 0);
        assert!(!engine.is_running());
    }

    #[test]
    fn tick_after_timeout_is_silent() {
        let mut engine = CountdownEngine::new();
        engine.start(1);
        assert_eq!(engine.tick(), Some(CountdownSignal::Timeout));
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.tick(), None);
    }

    #[test]
    fn stop_preserves_remaining_and_resume_continues() {
        let mut engine = CountdownEngine::new();
        engine.start(10);
        engine.tick();
        engine.tick();
        assert!(engine.stop());
        assert_eq!(engine.remaining_secs(), 8);
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.remaining_secs(), 8);

        assert!(engine.resume());
        assert_eq!(engine.tick(), Some(CountdownSignal::Tick(7)));
    }

    #[test]
    fn resume_needs_remaining_time() {
        let mut engine = CountdownEngine::new();
        assert!(!engine.resume());
        engine.start(1);
        engine.tick();
        assert!(!engine.resume());
    }

    #[test]
    fn start_restarts_from_fresh_value() {
        let mut engine = CountdownEngine::new();
        engine.start(3);
        engine.tick();
        engine.start(60);
        assert_eq!(engine.remaining_secs(), 60);
        assert_eq!(engine.total_secs(), 60);
    }

    #[test]
    fn signal_serializes_tagged() {
        let json = serde_json::to_value(CountdownSignal::Tick(3)).unwrap();
        assert_eq!(json["signal"], "tick");
        assert_eq!(json["remaining_secs"], 3);
    }
}
