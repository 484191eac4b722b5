//! Expression evaluation and result formatting.
//!
//! Runs the validation checks, evaluates with the arithmetic parser and
//! formats the result for the display.

use serde::Serialize;

use super::parser;
use super::validation::validate_expression;
use crate::error::CalcError;

/// Formatted results longer than this switch to exponential notation.
const MAX_DISPLAY_LENGTH: usize = 15;

/// Decimal places kept for non-integer results.
const DECIMAL_PLACES: usize = 10;

/// Fractional digits in exponential notation.
const EXPONENT_DIGITS: usize = 6;

/// A successful calculation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Evaluation {
    /// The expression as evaluated, after sanitization.
    pub expression: String,
    /// The numeric value.
    pub value: f64,
    /// Formatted for display.
    pub display: String,
}

/// Evaluate a calculator expression.
///
/// Fails with the first check that rejects the input, or with
/// [`CalcError::InvalidCalculation`] / [`CalcError::ResultInfinite`] when
/// the arithmetic produces NaN or an infinity.
pub fn evaluate_expression(input: &str) -> Result<Evaluation, CalcError> {
    let expression = validate_expression(input)?;
    let value = parser::evaluate(&expression)?;

    if value.is_nan() {
        return Err(CalcError::InvalidCalculation);
    }
    if value.is_infinite() {
        return Err(CalcError::ResultInfinite);
    }

    Ok(Evaluation {
        display: format_result(value),
        expression: expression.trim().to_string(),
        value,
    })
}

/// Format a finite number for display.
///
/// Integers are printed without a decimal part. Other values are rounded to
/// ten decimal places with trailing zeros removed. Anything longer than the
/// display falls back to exponential notation (`1.234568e+21`).
pub fn format_result(value: f64) -> String {
    let formatted = if value.fract() == 0.0 {
        format_plain(value)
    } else {
        let fixed = format!("{:.*}", DECIMAL_PLACES, value);
        format_plain(fixed.parse().unwrap_or(value))
    };

    if formatted.len() > MAX_DISPLAY_LENGTH {
        format_exponential(value)
    } else {
        formatted
    }
}

fn format_plain(value: f64) -> String {
    // Collapses negative zero.
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

fn format_exponential(value: f64) -> String {
    let formatted = format!("{:.*e}", EXPONENT_DIGITS, value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_evaluation() {
        let result = evaluate_expression("2 + 2").unwrap();
        assert_eq!(result.value, 4.0);
        assert_eq!(result.display, "4");
        assert_eq!(result.expression, "2 + 2");
    }

    #[test]
    fn test_decimal_result() {
        let result = evaluate_expression("10/3").unwrap();
        assert_eq!(result.display, "3.3333333333");

        let result = evaluate_expression("0.1+0.2").unwrap();
        assert_eq!(result.display, "0.3");

        let result = evaluate_expression("7/4").unwrap();
        assert_eq!(result.display, "1.75");
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate_expression("8/0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate_expression("8/0.5").unwrap().display, "16");
        // Not caught by the textual check, caught as an infinite result.
        assert_eq!(evaluate_expression("8/(0)"), Err(CalcError::ResultInfinite));
        // Any `/0.` in the text disables the textual check.
        assert_eq!(
            evaluate_expression("1/0+2/0.5"),
            Err(CalcError::ResultInfinite)
        );
        assert_eq!(
            evaluate_expression("0/(0)"),
            Err(CalcError::InvalidCalculation)
        );
    }

    #[test]
    fn test_rejections() {
        assert_eq!(evaluate_expression(""), Err(CalcError::EmptyExpression));
        assert_eq!(
            evaluate_expression("4+"),
            Err(CalcError::IncompleteExpression)
        );
        assert_eq!(
            evaluate_expression("(1+2"),
            Err(CalcError::InvalidExpression)
        );
    }

    #[test]
    fn test_format_integers() {
        assert_eq!(format_result(16.0), "16");
        assert_eq!(format_result(-42.0), "-42");
        assert_eq!(format_result(-0.0), "0");
        assert_eq!(format_result(123456789012345.0), "123456789012345");
    }

    #[test]
    fn test_format_rounding() {
        assert_eq!(format_result(2.5), "2.5");
        assert_eq!(format_result(-0.125), "-0.125");
        assert_eq!(format_result(1.000000000001), "1");
        assert_eq!(format_result(0.00000000001), "0");
    }

    #[test]
    fn test_format_exponential() {
        assert_eq!(format_result(1234567890123456.0), "1.234568e+15");
        assert_eq!(format_result(1e21), "1.000000e+21");
        assert_eq!(format_result(-98765432109876543.0), "-9.876543e+16");
        assert_eq!(format_result(123456.0123456789), "1.234560e+5");
    }

    #[test]
    fn test_result_serializes() {
        let result = evaluate_expression("6*7").unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["display"], "42");
        assert_eq!(json["value"], 42.0);
    }
}
