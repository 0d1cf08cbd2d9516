//! Mode registry and round counter.
//!
//! The registry is an ordered set of modes keyed by [`ModeId`]. It tracks
//! which mode is active and how many rounds have started. Rounds only
//! advance on the focus → short break transition.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};

/// Longest duration that still renders as `mm:ss`.
pub const MAX_DURATION_MIN: u64 = 59;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeId {
    #[serde(rename = "pomodoro")]
    Focus,
    ShortBreak,
    LongBreak,
}

impl ModeId {
    pub const ALL: [ModeId; 3] = [ModeId::Focus, ModeId::ShortBreak, ModeId::LongBreak];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModeId::Focus => "pomodoro",
            ModeId::ShortBreak => "short_break",
            ModeId::LongBreak => "long_break",
        }
    }

    /// Indicator colour for the mode (favicon, title, prompt).
    pub fn accent(&self) -> &'static str {
        match self {
            ModeId::Focus => "red",
            ModeId::ShortBreak => "green",
            ModeId::LongBreak => "blue",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ModeId::Focus => "Time to focus!",
            _ => "Time for a break!",
        }
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeId {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pomodoro" | "focus" => Ok(ModeId::Focus),
            "short_break" | "short" => Ok(ModeId::ShortBreak),
            "long_break" | "long" => Ok(ModeId::LongBreak),
            other => Err(ValidationError::UnknownModeId(other.to_string())),
        }
    }
}

/// A named timer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub id: ModeId,
    pub label: String,
    /// Duration in minutes.
    pub duration_min: u64,
}

impl Mode {
    pub fn new(id: ModeId, label: impl Into<String>, duration_min: u64) -> Self {
        Self {
            id,
            label: label.into(),
            duration_min,
        }
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_min.saturating_mul(60)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModeRegistry {
    modes: IndexMap<ModeId, Mode>,
    active: ModeId,
    round: u32,
}

impl ModeRegistry {
    /// Build a registry from modes in display order.
    ///
    /// Focus and short break must both be present since [`skip`](Self::skip)
    /// moves between them. Every duration must fit on an `mm:ss` clock.
    pub fn new(modes: impl IntoIterator<Item = Mode>) -> Result<Self> {
        let mut map = IndexMap::new();
        for mode in modes {
            if mode.duration_min == 0 || mode.duration_min > MAX_DURATION_MIN {
                return Err(ValidationError::DurationOutOfRange {
                    mode: mode.id,
                    minutes: mode.duration_min,
                }
                .into());
            }
            if map.contains_key(&mode.id) {
                return Err(ValidationError::DuplicateMode(mode.id).into());
            }
            map.insert(mode.id, mode);
        }
        for required in [ModeId::Focus, ModeId::ShortBreak] {
            if !map.contains_key(&required) {
                return Err(ValidationError::MissingMode(required).into());
            }
        }
        Ok(Self {
            modes: map,
            active: ModeId::Focus,
            round: 1,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn active_mode(&self) -> ModeId {
        self.active
    }

    pub fn active(&self) -> &Mode {
        // Only registered ids ever become active.
        &self.modes[&self.active]
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn get(&self, id: ModeId) -> Option<&Mode> {
        self.modes.get(&id)
    }

    pub fn is_registered(&self, id: ModeId) -> bool {
        self.modes.contains_key(&id)
    }

    /// Modes in registration order.
    pub fn modes(&self) -> impl Iterator<Item = &Mode> {
        self.modes.values()
    }

    pub fn duration_secs(&self, id: ModeId) -> Result<u64> {
        self.get(id)
            .map(Mode::duration_secs)
            .ok_or(CoreError::UnregisteredMode(id))
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_mode(&mut self, id: ModeId) -> Result<()> {
        if !self.is_registered(id) {
            return Err(CoreError::UnregisteredMode(id));
        }
        self.active = id;
        Ok(())
    }

    pub fn next_round(&mut self) {
        self.round = self.round.saturating_add(1);
    }

    /// Advance along the focus/break cycle and return the new active mode.
    pub fn skip(&mut self) -> ModeId {
        // Both ids are guaranteed registered by `new`.
        if self.active == ModeId::Focus {
            self.active = ModeId::ShortBreak;
            self.next_round();
        } else {
            self.active = ModeId::Focus;
        }
        self.active
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self {
            modes: [
                Mode::new(ModeId::Focus, "Pomodoro", 25),
                Mode::new(ModeId::ShortBreak, "Short Break", 5),
                Mode::new(ModeId::LongBreak, "Long Break", 15),
            ]
            .into_iter()
            .map(|m| (m.id, m))
            .collect(),
            active: ModeId::Focus,
            round: 1,
        }
    }
}
