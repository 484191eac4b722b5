//! Pre-evaluation checks for calculator expressions.
//!
//! These run on the raw buffer text before it reaches the parser, in order:
//! emptiness, sanitization, the division-by-zero heuristic, the format check
//! and the incomplete-expression check.

use lazy_static::lazy_static;
use regex::Regex;

use super::buffer::is_operator;
use crate::error::CalcError;

lazy_static! {
    /// Matches any character outside the arithmetic alphabet.
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^0-9+\-*/.() ]").unwrap();

    /// Matches strings made only of arithmetic characters.
    static ref ARITHMETIC_ONLY: Regex = Regex::new(r"^[0-9+\-*/.() ]+$").unwrap();
}

/// Strip every character outside the arithmetic alphabet.
pub fn sanitize_expression(expression: &str) -> String {
    UNSAFE_CHARS.replace_all(expression, "").into_owned()
}

/// Check if the text divides by a literal zero.
///
/// This is a whole-text heuristic: any `/0.` anywhere disables it, so
/// `1/0+2/0.5` passes. `/(0)` and `/ 0` slip through as well. All of these
/// are caught later as an infinite or NaN result.
pub fn has_division_by_zero(expression: &str) -> bool {
    expression.contains("/0") && !expression.contains("/0.")
}

/// Check if the text consists only of arithmetic characters (and is non-empty).
pub fn is_valid_format(expression: &str) -> bool {
    ARITHMETIC_ONLY.is_match(expression)
}

/// Check if the last non-space character is an operator or a decimal point.
pub fn is_incomplete(expression: &str) -> bool {
    expression
        .trim_end()
        .chars()
        .next_back()
        .is_some_and(|c| is_operator(c) || c == '.')
}

/// Run every pre-check and return the sanitized expression ready for parsing.
pub fn validate_expression(expression: &str) -> Result<String, CalcError> {
    if expression.trim().is_empty() {
        return Err(CalcError::EmptyExpression);
    }

    let sanitized = sanitize_expression(expression);

    if has_division_by_zero(&sanitized) {
        return Err(CalcError::DivisionByZero);
    }

    if !is_valid_format(&sanitized) {
        return Err(CalcError::InvalidFormat);
    }

    if is_incomplete(&sanitized) {
        return Err(CalcError::IncompleteExpression);
    }

    Ok(sanitized)
}
