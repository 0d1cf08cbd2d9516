//! Timer controller.
//!
//! Owns one [`ModeRegistry`], one [`CountdownEngine`] and the tick source
//! that drives it. Front ends hold the controller, forward user commands to
//! it and render the events it returns. The observer receives the same
//! changes as callbacks (mode indicators, notifications).
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = TimerController::new(ModeRegistry::default(), NoopObserver);
//! timer.toggle();
//! loop {
//!     for event in timer.wait_tick().await { /* render */ }
//! }
//! ```

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use super::countdown::{CountdownEngine, CountdownSignal};
use super::modes::{ModeId, ModeRegistry};
use super::ticker::Ticker;
use crate::display::{format_clock, progress_percent};
use crate::error::{CoreError, Result};
use crate::events::Event;

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Callbacks for timer changes. Every method defaults to a no-op.
pub trait TimerObserver {
    fn on_tick(&mut self, _remaining_secs: u64) {}
    fn on_timeout(&mut self) {}
    fn on_mode_changed(&mut self, _mode: ModeId) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TimerObserver for NoopObserver {}

impl<T: TimerObserver + ?Sized> TimerObserver for Box<T> {
    fn on_tick(&mut self, remaining_secs: u64) {
        (**self).on_tick(remaining_secs)
    }
    fn on_timeout(&mut self) {
        (**self).on_timeout()
    }
    fn on_mode_changed(&mut self, mode: ModeId) {
        (**self).on_mode_changed(mode)
    }
}

#[derive(Debug)]
pub struct TimerController<O: TimerObserver = NoopObserver> {
    registry: ModeRegistry,
    countdown: CountdownEngine,
    observer: O,
    /// Armed lazily by `wait_tick` while the countdown runs.
    ticker: Option<Ticker>,
    tick_period: Duration,
    auto_advance: bool,
    auto_start: bool,
}

impl<O: TimerObserver> TimerController<O> {
    pub fn new(registry: ModeRegistry, observer: O) -> Self {
        Self {
            registry,
            countdown: CountdownEngine::new(),
            observer,
            ticker: None,
            tick_period: DEFAULT_TICK_PERIOD,
            auto_advance: true,
            auto_start: false,
        }
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Whether a timeout moves on to the next mode.
    pub fn with_auto_advance(mut self, enabled: bool) -> Self {
        self.auto_advance = enabled;
        self
    }

    /// Whether an auto-advanced mode starts counting immediately.
    pub fn with_auto_start(mut self, enabled: bool) -> Self {
        self.auto_start = enabled;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn registry(&self) -> &ModeRegistry {
        &self.registry
    }

    pub fn countdown(&self) -> &CountdownEngine {
        &self.countdown
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    /// Elapsed share of the current countdown, 0.0 before it starts.
    pub fn progress_pct(&self) -> f64 {
        progress_percent(self.countdown.total_secs(), self.countdown.remaining_secs())
    }

    pub fn snapshot(&self) -> Event {
        let mode = self.registry.active();
        let remaining = self.countdown.remaining_secs();
        // A countdown that never started shows the full duration.
        let shown = if self.countdown.total_secs() == 0 {
            mode.duration_secs()
        } else {
            remaining
        };
        Event::StateSnapshot {
            mode: mode.id,
            label: mode.label.clone(),
            round: self.registry.round(),
            running: self.countdown.is_running(),
            remaining_secs: remaining,
            total_secs: self.countdown.total_secs(),
            progress_pct: self.progress_pct(),
            clock: format_clock(shown).unwrap_or_else(|_| "--:--".into()),
            message: mode.id.message().into(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the active mode from its full duration, or continue a paused one.
    pub fn start(&mut self) -> Option<Event> {
        if self.countdown.is_running() {
            return None;
        }
        if self.countdown.resume() {
            debug!("Resumed {} at {}s", self.registry.active_mode(), self.countdown.remaining_secs());
            return Some(Event::TimerResumed {
                remaining_secs: self.countdown.remaining_secs(),
                at: Utc::now(),
            });
        }
        let mode = self.registry.active();
        let duration_secs = mode.duration_secs();
        if !self.countdown.start(duration_secs) {
            return None;
        }
        debug!("Started {} for {}s", mode.id, duration_secs);
        Some(Event::TimerStarted {
            mode: mode.id,
            duration_secs,
            at: Utc::now(),
        })
    }

    pub fn stop(&mut self) -> Option<Event> {
        self.disarm();
        if !self.countdown.stop() {
            return None;
        }
        debug!("Stopped with {}s left", self.countdown.remaining_secs());
        Some(Event::TimerStopped {
            remaining_secs: self.countdown.remaining_secs(),
            at: Utc::now(),
        })
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.countdown.is_running() {
            self.stop()
        } else {
            self.start()
        }
    }

    /// Move along the focus/break cycle.
    pub fn skip(&mut self) -> Vec<Event> {
        let mut events: Vec<Event> = self.stop().into_iter().collect();
        let from = self.registry.active_mode();
        let to = self.registry.skip();
        events.push(self.enter_mode(from, to));
        events
    }

    /// Switch to a specific mode. Unregistered ids are rejected before
    /// anything changes.
    pub fn jump_to(&mut self, id: ModeId) -> Result<Vec<Event>> {
        if !self.registry.is_registered(id) {
            return Err(CoreError::UnregisteredMode(id));
        }
        let mut events: Vec<Event> = self.stop().into_iter().collect();
        let from = self.registry.active_mode();
        self.registry.set_mode(id)?;
        events.push(self.enter_mode(from, id));
        Ok(events)
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        match self.countdown.tick() {
            None => {}
            Some(CountdownSignal::Tick(remaining_secs)) => {
                self.observer.on_tick(remaining_secs);
                events.push(Event::Tick {
                    remaining_secs,
                    at: Utc::now(),
                });
            }
            Some(CountdownSignal::Timeout) => {
                self.disarm();
                let mode = self.registry.active_mode();
                let round = self.registry.round();
                info!("{} round {} timed out", mode, round);
                self.observer.on_timeout();
                events.push(Event::Timeout {
                    mode,
                    round,
                    at: Utc::now(),
                });
                if self.auto_advance {
                    events.extend(self.skip());
                    if self.auto_start {
                        events.extend(self.start());
                    }
                }
            }
        }
        events
    }

    /// Wait for the tick source and apply the tick.
    ///
    /// Never resolves while the countdown is stopped, so it can sit in a
    /// `select!` next to user input.
    pub async fn wait_tick(&mut self) -> Vec<Event> {
        if !self.countdown.is_running() {
            self.disarm();
            return std::future::pending().await;
        }
        let period = self.tick_period;
        let ticker = self.ticker.get_or_insert_with(|| Ticker::spawn(period));
        let delivered = ticker.next().await;
        match delivered {
            Some(()) => self.tick(),
            None => {
                self.ticker = None;
                Vec::new()
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn disarm(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    fn enter_mode(&mut self, from: ModeId, to: ModeId) -> Event {
        self.countdown.reset();
        let round = self.registry.round();
        info!("Mode {} -> {} (round {})", from, to, round);
        self.observer.on_mode_changed(to);
        Event::ModeChanged {
            from,
            to,
            round,
            at: Utc::now(),
        }
    }
}
