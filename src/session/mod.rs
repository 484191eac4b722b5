//! Calculator session: the shared state machine.
//!
//! A [`Calculator`] owns the buffer/error/result triple and drives a
//! [`DisplaySink`] and a [`RecoveryTimer`]. It has two modes:
//!
//! - `Idle`: the display shows the buffer.
//! - `Error`: the display shows `Error: <message>` with error styling, and a
//!   recovery timer is armed. When it fires while the same error is still
//!   active, the calculator performs a full clear. Any user edit made in
//!   this mode clears first.
//!
//! Every entry point is infallible to its caller. Failures, including
//! display failures, are routed to [`Calculator::report_error`].

mod display;
mod input;
mod recovery;

pub use display::{DisplaySink, MemoryDisplay};
pub use input::{
    Button, Command, InputParseError, Key, KeyInput, Modifiers, command_for_key,
    parse_key_script,
};
pub use recovery::{ErrorGeneration, ManualRecoveryTimer, RecoveryTimer, TokioRecoveryTimer};

use std::time::Duration;

use crate::calculator::{DEFAULT_MAX_LENGTH, Edit, ExpressionBuffer, evaluate_expression};
use crate::error::CalcError;

/// Delay before an error clears itself.
pub const DEFAULT_ERROR_TIMEOUT: Duration = Duration::from_secs(3);

/// Something that happened to the calculator.
#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyInput),
    Button(Button),
    /// The input source failed to deliver a key.
    InputFailed(String),
    /// A recovery timer fired.
    ErrorTimeout(ErrorGeneration),
}

/// Current mode of the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Error,
}

/// The error currently shown on the display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveError {
    pub error: CalcError,
    pub generation: ErrorGeneration,
}

/// Tunables for a calculator session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalculatorSettings {
    /// Length cap for new input.
    pub max_length: usize,
    /// Delay before an error clears itself.
    pub error_timeout: Duration,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            error_timeout: DEFAULT_ERROR_TIMEOUT,
        }
    }
}

/// Buffer, error and last result of one calculator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CalculatorState {
    buffer: ExpressionBuffer,
    error: Option<ActiveError>,
    last_result: Option<f64>,
    generation: ErrorGeneration,
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &ExpressionBuffer {
        &self.buffer
    }

    pub fn error(&self) -> Option<&ActiveError> {
        self.error.as_ref()
    }

    pub fn last_result(&self) -> Option<f64> {
        self.last_result
    }

    pub fn mode(&self) -> Mode {
        if self.error.is_some() {
            Mode::Error
        } else {
            Mode::Idle
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Empty the buffer, drop the error and forget the last result.
    ///
    /// The error generation keeps counting so that timers armed before the
    /// reset stay stale.
    pub fn reset(&mut self) {
        self.clear_entry();
        self.last_result = None;
    }

    /// Empty the buffer and drop the error, keeping the last result.
    pub fn clear_entry(&mut self) {
        self.buffer.clear();
        self.error = None;
    }

    /// Enter the error state with a fresh generation.
    fn enter_error(&mut self, error: CalcError) -> ErrorGeneration {
        self.generation = self.generation.next();
        self.error = Some(ActiveError {
            error,
            generation: self.generation,
        });
        self.generation
    }

    /// Text the display should currently show.
    pub fn display_text(&self) -> String {
        match &self.error {
            Some(active) => active.error.display_text(),
            None => self.buffer.as_str().to_string(),
        }
    }
}

/// Interactive calculator bound to a display and a recovery timer.
pub struct Calculator<D, T> {
    state: CalculatorState,
    display: D,
    timer: T,
    settings: CalculatorSettings,
}

impl<D: DisplaySink, T: RecoveryTimer> Calculator<D, T> {
    pub fn new(display: D, timer: T) -> Self {
        Self::with_settings(display, timer, CalculatorSettings::default())
    }

    pub fn with_settings(display: D, timer: T, settings: CalculatorSettings) -> Self {
        Self {
            state: CalculatorState::new(),
            display,
            timer,
            settings,
        }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Current buffer text.
    pub fn buffer(&self) -> &str {
        self.state.buffer.as_str()
    }

    pub fn last_result(&self) -> Option<f64> {
        self.state.last_result
    }

    /// The active error, if the calculator is in error mode.
    pub fn error(&self) -> Option<&CalcError> {
        self.state.error.as_ref().map(|active| &active.error)
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn settings(&self) -> CalculatorSettings {
        self.settings
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Append a character to the expression.
    pub fn append_character(&mut self, c: char) {
        if self.state.is_error() && !self.clear_for_edit() {
            return;
        }

        let snapshot = self.state.clone();
        match self.state.buffer.append(c, self.settings.max_length) {
            Ok(Edit::Ignored) => {
                tracing::debug!(input = %c, buffer = self.buffer(), "input ignored");
            }
            Ok(edit) => {
                tracing::debug!(input = %c, ?edit, buffer = self.buffer(), "buffer edited");
                self.commit(snapshot, CalcError::AppendFailed);
            }
            Err(error) => self.report_error(error),
        }
    }

    /// Empty the buffer, leave error mode and forget the last result.
    pub fn clear(&mut self) {
        let snapshot = self.state.clone();
        self.state.reset();
        self.commit(snapshot, CalcError::ClearFailed);
    }

    /// Empty the buffer and leave error mode, keeping the last result.
    pub fn clear_entry(&mut self) {
        let snapshot = self.state.clone();
        self.state.clear_entry();
        self.commit(snapshot, CalcError::ClearEntryFailed);
    }

    /// Remove the last character. In error mode this only clears.
    pub fn backspace(&mut self) {
        if self.state.is_error() {
            self.clear();
            return;
        }

        let snapshot = self.state.clone();
        if self.state.buffer.backspace().is_some() {
            self.commit(snapshot, CalcError::BackspaceFailed);
        }
    }

    /// Negate the whole expression. In error mode this only clears.
    pub fn toggle_sign(&mut self) {
        if self.state.is_error() {
            self.clear();
            return;
        }

        let snapshot = self.state.clone();
        if self.state.buffer.toggle_sign() {
            self.commit(snapshot, CalcError::SignToggleFailed);
        }
    }

    /// Evaluate the buffer, replacing it with the formatted result.
    ///
    /// In error mode this clears first and then evaluates the now empty
    /// buffer, which reports [`CalcError::EmptyExpression`].
    pub fn calculate(&mut self) {
        if self.state.is_error() && !self.clear_for_edit() {
            return;
        }

        match evaluate_expression(self.buffer()) {
            Ok(evaluation) => {
                tracing::debug!(
                    expression = %evaluation.expression,
                    result = %evaluation.display,
                    "expression evaluated"
                );
                let snapshot = self.state.clone();
                self.state.buffer.replace(evaluation.display);
                self.state.last_result = Some(evaluation.value);
                self.commit(snapshot, CalcError::CalculateFailed);
            }
            Err(error) => self.report_error(error),
        }
    }

    /// Show an error and arm its recovery timer.
    pub fn report_error(&mut self, error: CalcError) {
        tracing::warn!(%error, buffer = self.buffer(), "calculator error");

        let generation = self.state.enter_error(error);
        if let Err(err) = self.render() {
            tracing::error!(error = %err, "failed to show error on display");
        }
        self.timer.arm(generation, self.settings.error_timeout);
    }

    /// Handle a fired recovery timer.
    ///
    /// Clears only if the error that armed it is still the active one.
    pub fn on_recovery_timeout(&mut self, generation: ErrorGeneration) {
        let active = self.state.error.as_ref().map(|active| active.generation);
        if active == Some(generation) {
            tracing::debug!(generation = generation.get(), "error expired");
            self.clear();
        } else {
            tracing::debug!(generation = generation.get(), "stale recovery timer");
        }
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Append(c) => self.append_character(c),
            Command::Evaluate => self.calculate(),
            Command::Clear => self.clear(),
            Command::ClearEntry => self.clear_entry(),
            Command::Backspace => self.backspace(),
            Command::ToggleSign => self.toggle_sign(),
        }
    }

    /// Handle a key press. Returns `false` if the key was not consumed.
    pub fn handle_key(&mut self, input: &KeyInput) -> bool {
        match command_for_key(input) {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    pub fn press_button(&mut self, button: Button) {
        self.execute(button.command());
    }

    /// Dispatch an event. Returns `false` for key presses that were not consumed.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(input) => return self.handle_key(&input),
            Event::Button(button) => self.press_button(button),
            Event::InputFailed(reason) => {
                tracing::error!(%reason, "input source failed");
                self.report_error(CalcError::KeyboardInputError);
            }
            Event::ErrorTimeout(generation) => self.on_recovery_timeout(generation),
        }
        true
    }

    /// Redraw the display from the current state.
    pub fn refresh(&mut self) {
        if let Err(err) = self.render() {
            tracing::error!(error = %err, "failed to refresh display");
        }
    }

    /// Clear before applying an edit in error mode. Returns `false` if the
    /// clear itself failed and the edit must be dropped.
    fn clear_for_edit(&mut self) -> bool {
        self.clear();
        !self.state.is_error()
    }

    /// Push the new state to the display, rolling it back if the display
    /// rejects the update.
    fn commit(&mut self, snapshot: CalculatorState, failure: CalcError) {
        if let Err(err) = self.render() {
            tracing::error!(error = %err, %failure, "display update failed");
            self.state = snapshot;
            self.report_error(failure);
        }
    }

    fn render(&mut self) -> std::io::Result<()> {
        self.display.show(&self.state.display_text())?;
        self.display.set_error_styling(self.state.is_error())
    }
}
