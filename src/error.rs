//! Calculator error taxonomy.
//!
//! Every variant's `Display` text is the message shown on the display after
//! the `Error: ` prefix.

use thiserror::Error;

/// Failure of a single calculator operation.
///
/// All variants are non-fatal: the attempted edit is discarded and the
/// calculator enters its error state until the user edits or the recovery
/// timer fires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// A character outside the expression alphabet was appended.
    #[error("Invalid character")]
    InvalidCharacter(char),
    #[error("Maximum input length reached")]
    MaxLengthReached,
    #[error("No expression to calculate")]
    EmptyExpression,
    #[error("Division by zero")]
    DivisionByZero,
    /// Sanitized text does not match the arithmetic alphabet.
    #[error("Invalid expression format")]
    InvalidFormat,
    /// Expression ends with an operator or a decimal point.
    #[error("Incomplete expression")]
    IncompleteExpression,
    /// The parser rejected the expression.
    #[error("Invalid expression")]
    InvalidExpression,
    /// Evaluation produced NaN.
    #[error("Invalid calculation")]
    InvalidCalculation,
    #[error("Result is infinite")]
    ResultInfinite,

    // Catch-all failures of an operation's internal steps.
    #[error("Input failed")]
    AppendFailed,
    #[error("Calculation failed")]
    CalculateFailed,
    #[error("Clear operation failed")]
    ClearFailed,
    #[error("Clear entry failed")]
    ClearEntryFailed,
    #[error("Backspace failed")]
    BackspaceFailed,
    #[error("Sign toggle failed")]
    SignToggleFailed,
    #[error("Keyboard input error")]
    KeyboardInputError,
}

impl CalcError {
    /// Text written to the display while this error is active.
    pub fn display_text(&self) -> String {
        format!("Error: {}", self)
    }
}
