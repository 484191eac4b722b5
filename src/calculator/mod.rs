//! Calculator core: the expression buffer and the evaluator.
//!
//! This module provides functionality to:
//! - Edit the expression buffer under the operator, decimal and length rules
//! - Validate and sanitize a finished expression
//! - Evaluate it with a recursive-descent parser and format the result

mod buffer;
mod evaluation;
mod parser;
mod validation;

pub use buffer::{
    DEFAULT_MAX_LENGTH, Edit, ExpressionBuffer, OPERATORS, is_operator, is_valid_input,
};
pub use evaluation::{Evaluation, evaluate_expression, format_result};
pub use parser::{BinaryOperator, Expr, evaluate, parse};
pub use validation::{
    has_division_by_zero, is_incomplete, is_valid_format, sanitize_expression,
    validate_expression,
};
