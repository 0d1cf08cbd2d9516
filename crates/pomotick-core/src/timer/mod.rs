mod controller;
mod countdown;
mod modes;
mod ticker;

pub use controller::{NoopObserver, TimerController, TimerObserver, DEFAULT_TICK_PERIOD};
pub use countdown::{CountdownEngine, CountdownSignal, CountdownState};
pub use modes::{Mode, ModeId, ModeRegistry, MAX_DURATION_MIN};
pub use ticker::Ticker;
