use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::ModeId;

/// Every state change of the timer produces an Event.
/// Front ends render them; observers are told about the same changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: ModeId,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Tick {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The final second of the active mode elapsed.
    Timeout {
        mode: ModeId,
        round: u32,
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: ModeId,
        to: ModeId,
        round: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: ModeId,
        label: String,
        round: u32,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        clock: String,
        message: String,
        at: DateTime<Utc>,
    },
}
