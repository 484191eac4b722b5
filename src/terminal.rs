//! Interactive terminal front end.
//!
//! A reader thread turns crossterm key events into calculator events. Those
//! and the recovery timer's events share one flume channel, drained by a
//! single loop, so calculator operations never run concurrently.

use std::io::{self, Stdout, Write, stdout};
use std::thread;

use anyhow::{Context, Result};
use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{execute, queue};

use zcalc::config::Config;
use zcalc::session::{
    Calculator, DisplaySink, Event, Key, KeyInput, Modifiers, TokioRecoveryTimer,
};

/// Consecutive input failures after which the reader gives up.
const MAX_INPUT_FAILURES: usize = 3;

/// Raw mode for the lifetime of the session.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut out = stdout();
        let _ = execute!(out, ResetColor, Print("\r\n"));
    }
}

/// Single-line display on the terminal.
pub struct TerminalDisplay<W: Write> {
    out: W,
    text: String,
    error_styling: bool,
    color: bool,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            text: String::new(),
            error_styling: false,
            color,
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        if self.error_styling && self.color {
            queue!(self.out, SetForegroundColor(Color::Red))?;
        }
        queue!(self.out, Print("> "), Print(&self.text), ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> DisplaySink for TerminalDisplay<W> {
    fn show(&mut self, text: &str) -> io::Result<()> {
        self.text.clear();
        self.text.push_str(text);
        self.draw()
    }

    fn set_error_styling(&mut self, enabled: bool) -> io::Result<()> {
        self.error_styling = enabled;
        self.draw()
    }
}

/// Convert a crossterm key event.
fn key_input(event: &KeyEvent) -> KeyInput {
    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        _ => Key::Other,
    };

    let modifiers = Modifiers {
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
        meta: event
            .modifiers
            .intersects(KeyModifiers::META | KeyModifiers::SUPER),
    };

    KeyInput::with_modifiers(key, modifiers)
}

/// Ctrl+C and Ctrl+D end the session. The calculator never consumes them.
fn is_quit_key(input: &KeyInput) -> bool {
    input.modifiers.ctrl && matches!(input.key, Key::Char('c' | 'd'))
}

/// Read keys on a dedicated thread until the channel closes.
fn spawn_key_reader(events: flume::Sender<Event>) {
    thread::spawn(move || {
        let mut failures = 0;
        loop {
            let sent = match event::read() {
                Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    failures = 0;
                    events.send(Event::Key(key_input(&key)))
                }
                Ok(_) => continue,
                Err(err) => {
                    failures += 1;
                    if failures > MAX_INPUT_FAILURES {
                        tracing::error!("giving up on terminal input");
                        return;
                    }
                    events.send(Event::InputFailed(err.to_string()))
                }
            };

            if sent.is_err() {
                return;
            }
        }
    });
}

/// Run the interactive calculator until the user quits.
pub async fn run(config: &Config) -> Result<()> {
    let _raw_mode = RawModeGuard::enable()?;

    let (tx, rx) = flume::unbounded();
    spawn_key_reader(tx.clone());

    let display: TerminalDisplay<Stdout> = TerminalDisplay::new(stdout(), config.display.color);
    let timer = TokioRecoveryTimer::new(tx);
    let mut calculator = Calculator::with_settings(display, timer, config.settings());
    calculator.refresh();

    tracing::info!("interactive session started");

    while let Ok(event) = rx.recv_async().await {
        if let Event::Key(input) = &event
            && is_quit_key(input)
        {
            break;
        }
        calculator.handle_event(event);
    }

    tracing::info!("interactive session ended");
    Ok(())
}
