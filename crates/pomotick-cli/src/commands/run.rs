use std::io::{IsTerminal, Write};
use std::time::Duration;

use clap::Args;
use pomotick_core::{
    progress_bar, Config, Event, ModeId, TimerController, TimerObserver,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const BAR_WIDTH: usize = 24;

#[derive(Args)]
pub struct RunArgs {
    /// Mode to begin in (pomodoro, short_break, long_break)
    #[arg(long)]
    mode: Option<ModeId>,
    /// Start counting immediately, and after every automatic mode change
    #[arg(long)]
    auto_start: bool,
    /// Stay on the finished mode instead of moving to the next one
    #[arg(long)]
    no_auto_advance: bool,
    /// Tick interval in milliseconds (overrides timer.tick_interval_ms)
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Exit after this many focus intervals have run out
    #[arg(long)]
    rounds: Option<u32>,
    /// Print one JSON event per line instead of the status line
    #[arg(long)]
    json: bool,
}

/// Commands read from stdin while the countdown runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Toggle,
    Start,
    Stop,
    Skip,
    Jump(ModeId),
    Status,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Command::Toggle);
        };
        match head.to_ascii_lowercase().as_str() {
            "s" | "toggle" => Ok(Command::Toggle),
            "start" => Ok(Command::Start),
            "stop" | "pause" => Ok(Command::Stop),
            "n" | "skip" | "next" => Ok(Command::Skip),
            "j" | "jump" => {
                let id = words.next().ok_or("jump needs a mode id")?;
                id.parse().map(Command::Jump).map_err(|e| e.to_string())
            }
            "status" | "?" => Ok(Command::Status),
            "h" | "help" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => other
                .parse()
                .map(Command::Jump)
                .map_err(|_| format!("unknown command '{other}' (type 'help')")),
        }
    }
}

const HELP: &str = "\
commands:
  <enter>, s, toggle   start or pause
  start | stop         explicit start / pause
  n, skip              move to the next mode
  j <mode>, <mode>     jump to pomodoro, short_break or long_break
  status               print the current state
  q, quit              exit";

/// Mode indicator for the terminal: window title plus a log line.
struct TerminalIndicator {
    set_title: bool,
}

impl TimerObserver for TerminalIndicator {
    fn on_timeout(&mut self) {
        tracing::debug!("Countdown reached zero");
    }

    fn on_mode_changed(&mut self, mode: ModeId) {
        tracing::info!("Mode indicator -> {} ({})", mode, mode.accent());
        if self.set_title {
            print!("\x1b]0;pomotick - {}\x07", mode.message());
        }
    }
}

enum Input {
    Line(Option<String>),
    Events(Vec<Event>),
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_loop(args, config))
}

async fn run_loop(args: RunArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let period = match args.tick_ms {
        Some(0) => return Err("--tick-ms must be greater than zero".into()),
        Some(ms) => Duration::from_millis(ms),
        None => config.tick_interval()?,
    };
    let indicator = TerminalIndicator {
        set_title: !args.json && std::io::stdout().is_terminal(),
    };
    let mut timer = TimerController::new(config.registry()?, indicator)
        .with_tick_period(period)
        .with_auto_advance(config.auto_advance && !args.no_auto_advance)
        .with_auto_start(config.timer.auto_start || args.auto_start);
    let mut out = Renderer::new(args.json);

    if let Some(mode) = args.mode {
        let events = timer.jump_to(mode)?;
        out.render(&timer, &events)?;
    }
    if args.auto_start {
        let started: Vec<_> = timer.start().into_iter().collect();
        out.render(&timer, &started)?;
    } else {
        out.render(&timer, &[timer.snapshot()])?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut completed_rounds = 0u32;

    loop {
        if !stdin_open && !timer.is_running() {
            break;
        }

        let input = tokio::select! {
            line = lines.next_line(), if stdin_open => Input::Line(line?),
            events = timer.wait_tick() => Input::Events(events),
        };

        let events = match input {
            Input::Line(None) => {
                stdin_open = false;
                continue;
            }
            Input::Line(Some(line)) => match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => match apply(&mut timer, command) {
                    Ok(events) => events,
                    Err(e) => {
                        eprintln!("error: {e}");
                        continue;
                    }
                },
                Err(message) => {
                    eprintln!("{message}");
                    continue;
                }
            },
            Input::Events(events) => events,
        };

        out.render(&timer, &events)?;

        completed_rounds += events
            .iter()
            .filter(|e| matches!(e, Event::Timeout { mode: ModeId::Focus, .. }))
            .count() as u32;
        if args.rounds.is_some_and(|n| completed_rounds >= n) {
            break;
        }
    }

    out.finish()?;
    Ok(())
}

fn apply<O: TimerObserver>(
    timer: &mut TimerController<O>,
    command: Command,
) -> pomotick_core::Result<Vec<Event>> {
    let events = match command {
        Command::Toggle => timer.toggle().into_iter().collect(),
        Command::Start => timer.start().into_iter().collect(),
        Command::Stop => timer.stop().into_iter().collect(),
        Command::Skip => timer.skip(),
        Command::Jump(id) => timer.jump_to(id)?,
        Command::Status => vec![timer.snapshot()],
        Command::Help => {
            println!("{HELP}");
            Vec::new()
        }
        Command::Quit => Vec::new(),
    };
    Ok(events)
}

/// Writes events to stdout. On a terminal the status line is redrawn in
/// place; otherwise every event gets its own plain line.
struct Renderer {
    json: bool,
    terminal: bool,
}

impl Renderer {
    fn new(json: bool) -> Self {
        Self {
            json,
            terminal: !json && std::io::stdout().is_terminal(),
        }
    }

    fn render<O: TimerObserver>(
        &mut self,
        timer: &TimerController<O>,
        events: &[Event],
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = std::io::stdout().lock();
        self.write_events(&mut stdout, timer, events)?;
        stdout.flush()?;
        Ok(())
    }

    fn write_events<W: Write, O: TimerObserver>(
        &self,
        out: &mut W,
        timer: &TimerController<O>,
        events: &[Event],
    ) -> Result<(), Box<dyn std::error::Error>> {
        for event in events {
            if self.json {
                writeln!(out, "{}", serde_json::to_string(event)?)?;
                continue;
            }
            match event {
                Event::Tick { .. } | Event::TimerStarted { .. } | Event::TimerResumed { .. } => {
                    self.line(out, &status_line(timer), true)?
                }
                Event::TimerStopped { .. } => {
                    self.line(out, &format!("{}  (paused)", status_line(timer)), false)?
                }
                Event::Timeout { mode, round, .. } => {
                    let label = timer.registry().get(*mode).map(|m| m.label.as_str()).unwrap_or_default();
                    self.line(out, &format!("{label} #{round} finished"), false)?;
                    if self.terminal {
                        write!(out, "\x07")?;
                    }
                }
                Event::ModeChanged { to, round, .. } => {
                    self.line(out, &format!("{} #{round}", to.message()), false)?;
                    self.line(out, &status_line(timer), true)?
                }
                Event::StateSnapshot {
                    label,
                    round,
                    running,
                    clock,
                    progress_pct,
                    message,
                    ..
                } => {
                    let state = if *running { "running" } else { "stopped" };
                    let text = format!(
                        "#{round} {label}  {clock}  [{}] {progress_pct:5.1}%  {state}  {message}",
                        progress_bar(*progress_pct, BAR_WIDTH)
                    );
                    self.line(out, &text, false)?
                }
            }
        }
        Ok(())
    }

    /// `redraw` lines stay open on a terminal so the next one overwrites them.
    fn line<W: Write>(&self, out: &mut W, text: &str, redraw: bool) -> std::io::Result<()> {
        match (self.terminal, redraw) {
            (false, _) => writeln!(out, "{text}"),
            (true, true) => write!(out, "\r{text}\x1b[K"),
            (true, false) => writeln!(out, "\r{text}\x1b[K"),
        }
    }

    fn finish(&mut self) -> std::io::Result<()> {
        if self.terminal {
            println!();
        }
        Ok(())
    }
}

fn status_line<O: TimerObserver>(timer: &TimerController<O>) -> String {
    match timer.snapshot() {
        Event::StateSnapshot {
            label,
            round,
            clock,
            progress_pct,
            ..
        } => format!(
            "#{round} {label:<12} {clock}  [{}] {progress_pct:5.1}%",
            progress_bar(progress_pct, BAR_WIDTH)
        ),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomotick_core::{ModeRegistry, NoopObserver};

    fn rendered(renderer: &Renderer, timer: &TimerController, events: &[Event]) -> String {
        let mut out = Vec::new();
        renderer.write_events(&mut out, timer, events).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn session_events(timer: &mut TimerController) -> Vec<Event> {
        let mut events: Vec<_> = timer.start().into_iter().collect();
        events.extend(timer.tick());
        events.extend(timer.stop());
        events.extend(timer.skip());
        events.push(timer.snapshot());
        events
    }

    #[test]
    fn piped_output_is_plain_lines() {
        let mut timer = TimerController::new(ModeRegistry::default(), NoopObserver);
        let events = session_events(&mut timer);
        let renderer = Renderer { json: false, terminal: false };
        let text = rendered(&renderer, &timer, &events);
        assert!(!text.contains(['\r', '\x1b', '\x07']));
        assert!(text.ends_with('\n'));
        // mode change prints its message and a fresh status line
        assert_eq!(text.lines().count(), events.len() + 1);
        assert!(text.contains("(paused)"));
        assert!(text.contains("Time for a break! #2"));
    }

    #[test]
    fn terminal_output_redraws_status_in_place() {
        let mut timer = TimerController::new(ModeRegistry::default(), NoopObserver);
        let events: Vec<_> = timer.start().into_iter().chain(timer.tick()).collect();
        let renderer = Renderer { json: false, terminal: true };
        let text = rendered(&renderer, &timer, &events);
        assert!(text.starts_with('\r'));
        assert!(text.contains("\x1b[K"));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn json_output_is_one_event_per_line() {
        let mut timer = TimerController::new(ModeRegistry::default(), NoopObserver);
        let events = session_events(&mut timer);
        let renderer = Renderer { json: true, terminal: false };
        let text = rendered(&renderer, &timer, &events);
        assert_eq!(text.lines().count(), events.len());
        for line in text.lines() {
            serde_json::from_str::<serde_json::Value>(line).unwrap();
        }
    }

    #[test]
    fn empty_line_toggles() {
        assert_eq!(Command::parse(""), Ok(Command::Toggle));
        assert_eq!(Command::parse("   "), Ok(Command::Toggle));
    }

    #[test]
    fn parses_named_commands() {
        assert_eq!(Command::parse("skip"), Ok(Command::Skip));
        assert_eq!(Command::parse("N"), Ok(Command::Skip));
        assert_eq!(Command::parse("stop"), Ok(Command::Stop));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn parses_jumps() {
        assert_eq!(Command::parse("j long"), Ok(Command::Jump(ModeId::LongBreak)));
        assert_eq!(Command::parse("short_break"), Ok(Command::Jump(ModeId::ShortBreak)));
        assert!(Command::parse("jump").is_err());
        assert!(Command::parse("j nap").is_err());
        assert!(Command::parse("dance").is_err());
    }
}
