//! # pomotick Core Library
//!
//! Countdown logic for a Pomodoro timer. Front ends (the `pomotick` CLI)
//! own a [`TimerController`] and render the [`Event`]s it returns.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: a whole-second state machine; the caller invokes
//!   `tick()` once per elapsed second
//! - **Mode Registry**: ordered focus/short break/long break modes, the
//!   active mode and the round counter
//! - **Timer Controller**: wires both together with a cooperative tick
//!   source and an observer for mode indicators
//! - **Storage**: TOML configuration for durations, labels and behaviour
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: start/stop/tick state machine
//! - [`ModeRegistry`]: mode lookup and round tracking
//! - [`TimerController`]: orchestration used by front ends
//! - [`Config`]: application configuration management

pub mod display;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use display::{format_clock, progress_bar, progress_percent};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use events::Event;
pub use storage::Config;
pub use timer::{
    CountdownEngine, CountdownSignal, CountdownState, Mode, ModeId, ModeRegistry, NoopObserver,
    TimerController, TimerObserver,
};
