//! The expression buffer and its editing rules.
//!
//! The buffer only ever holds characters from the calculator alphabet
//! (`0-9 + - * / . ( )` and space). Editing rules keep it free of adjacent
//! operators and of repeated decimal points within one number.

use crate::error::CalcError;

/// Length cap for new input.
pub const DEFAULT_MAX_LENGTH: usize = 15;

/// Binary operators accepted by the buffer.
pub const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

/// Check if the character is one of the four arithmetic operators.
pub fn is_operator(c: char) -> bool {
    OPERATORS.contains(&c)
}

/// Check if the character may be appended to the buffer.
pub fn is_valid_input(c: char) -> bool {
    c.is_ascii_digit() || is_operator(c) || matches!(c, '.' | '(' | ')' | ' ')
}

/// Outcome of a successful append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edit {
    /// Text was appended to the end of the buffer.
    Appended,
    /// The trailing operator was swapped for the new one.
    OperatorReplaced,
    /// The character was rejected silently (leading operator, second decimal point).
    Ignored,
}

/// The in-progress expression text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpressionBuffer {
    text: String,
}

impl ExpressionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Last character of the buffer, if any.
    pub fn last_char(&self) -> Option<char> {
        self.text.chars().next_back()
    }

    /// The number currently being typed: everything after the last operator.
    pub fn current_token(&self) -> &str {
        self.text.rsplit(is_operator).next().unwrap_or("")
    }

    /// Append a character, applying the operator, decimal and length rules.
    ///
    /// - An operator following an operator replaces it, including a lone
    ///   leading `-`.
    /// - A leading operator other than `-` is ignored.
    /// - A second `.` in the current number is ignored; a `.` with no
    ///   preceding digit is inserted as `0.`.
    /// - Input that would grow the buffer past `max_length` fails with
    ///   [`CalcError::MaxLengthReached`] and leaves the buffer unchanged.
    pub fn append(&mut self, c: char, max_length: usize) -> Result<Edit, CalcError> {
        if !is_valid_input(c) {
            return Err(CalcError::InvalidCharacter(c));
        }

        let last = self.last_char();

        if is_operator(c) {
            if let Some(last) = last
                && is_operator(last)
            {
                self.text.pop();
                self.text.push(c);
                return Ok(Edit::OperatorReplaced);
            }

            if self.text.is_empty() && c != '-' {
                return Ok(Edit::Ignored);
            }
        }

        let mut insertion = String::from(c);
        if c == '.' {
            if self.current_token().contains('.') {
                return Ok(Edit::Ignored);
            }
            if last.is_none_or(is_operator) {
                insertion = "0.".to_string();
            }
        }

        if self.len() + insertion.len() > max_length {
            return Err(CalcError::MaxLengthReached);
        }

        self.text.push_str(&insertion);
        Ok(Edit::Appended)
    }

    /// Remove the last character. Returns `None` on an empty buffer.
    pub fn backspace(&mut self) -> Option<char> {
        self.text.pop()
    }

    /// Negate the whole buffer by adding or stripping a leading `-`.
    ///
    /// Returns `false` when the buffer is empty or exactly `"0"`.
    pub fn toggle_sign(&mut self) -> bool {
        if self.text.is_empty() || self.text == "0" {
            return false;
        }

        if self.text.starts_with('-') {
            self.text.remove(0);
        } else {
            self.text.insert(0, '-');
        }
        true
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Replace the contents wholesale, e.g. with a formatted result.
    ///
    /// The length cap does not apply here.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl From<&str> for ExpressionBuffer {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append_all(buffer: &mut ExpressionBuffer, input: &str) {
        for c in input.chars() {
            buffer.append(c, DEFAULT_MAX_LENGTH).unwrap();
        }
    }

    #[test]
    fn test_append_then_backspace_restores_empty() {
        for c in "0123456789-.() ".chars() {
            let mut buffer = ExpressionBuffer::new();
            buffer.append(c, DEFAULT_MAX_LENGTH).unwrap();
            assert!(!buffer.is_empty(), "{c:?} should have been appended");
            while buffer.backspace().is_some() {}
            assert!(buffer.is_empty());
        }

        let mut buffer = ExpressionBuffer::new();
        buffer.append('7', DEFAULT_MAX_LENGTH).unwrap();
        assert_eq!(buffer.backspace(), Some('7'));
        assert_eq!(buffer.as_str(), "");
    }

    #[test]
    fn test_invalid_character_rejected() {
        let mut buffer = ExpressionBuffer::from("12");
        assert_eq!(
            buffer.append('x', DEFAULT_MAX_LENGTH),
            Err(CalcError::InvalidCharacter('x'))
        );
        assert_eq!(
            buffer.append('=', DEFAULT_MAX_LENGTH),
            Err(CalcError::InvalidCharacter('='))
        );
        assert_eq!(buffer.as_str(), "12");
    }

    #[test]
    fn test_operator_replaces_operator() {
        let mut buffer = ExpressionBuffer::from("5+");
        assert_eq!(
            buffer.append('*', DEFAULT_MAX_LENGTH),
            Ok(Edit::OperatorReplaced)
        );
        assert_eq!(buffer.as_str(), "5*");

        buffer.append('-', DEFAULT_MAX_LENGTH).unwrap();
        assert_eq!(buffer.as_str(), "5-");
    }

    #[test]
    fn test_leading_operators() {
        let mut buffer = ExpressionBuffer::new();
        for op in ['+', '*', '/'] {
            assert_eq!(buffer.append(op, DEFAULT_MAX_LENGTH), Ok(Edit::Ignored));
            assert!(buffer.is_empty());
        }

        assert_eq!(buffer.append('-', DEFAULT_MAX_LENGTH), Ok(Edit::Appended));
        assert_eq!(buffer.as_str(), "-");

        // Last operator wins, even over a lone leading minus.
        assert_eq!(
            buffer.append('*', DEFAULT_MAX_LENGTH),
            Ok(Edit::OperatorReplaced)
        );
        assert_eq!(buffer.as_str(), "*");
    }

    #[test]
    fn test_decimal_rules() {
        let mut buffer = ExpressionBuffer::from("3.5");
        assert_eq!(buffer.append('.', DEFAULT_MAX_LENGTH), Ok(Edit::Ignored));
        assert_eq!(buffer.as_str(), "3.5");

        let mut buffer = ExpressionBuffer::from("3+");
        buffer.append('.', DEFAULT_MAX_LENGTH).unwrap();
        assert_eq!(buffer.as_str(), "3+0.");

        let mut buffer = ExpressionBuffer::new();
        buffer.append('.', DEFAULT_MAX_LENGTH).unwrap();
        assert_eq!(buffer.as_str(), "0.");

        let mut buffer = ExpressionBuffer::new();
        append_all(&mut buffer, "1.5+2");
        buffer.append('.', DEFAULT_MAX_LENGTH).unwrap();
        assert_eq!(buffer.as_str(), "1.5+2.");
    }

    #[test]
    fn test_current_token() {
        assert_eq!(ExpressionBuffer::from("12+3.4").current_token(), "3.4");
        assert_eq!(ExpressionBuffer::from("12*").current_token(), "");
        assert_eq!(ExpressionBuffer::from("").current_token(), "");
        assert_eq!(ExpressionBuffer::from("42").current_token(), "42");
    }

    #[test]
    fn test_length_cap() {
        let mut buffer = ExpressionBuffer::from("123456789012345");
        assert_eq!(buffer.len(), 15);
        assert_eq!(
            buffer.append('6', DEFAULT_MAX_LENGTH),
            Err(CalcError::MaxLengthReached)
        );
        assert_eq!(buffer.as_str(), "123456789012345");

        // Operator replacement does not grow the buffer.
        let mut buffer = ExpressionBuffer::from("12345678901234+");
        assert_eq!(
            buffer.append('-', DEFAULT_MAX_LENGTH),
            Ok(Edit::OperatorReplaced)
        );

        // The `0.` prefix counts as two characters.
        let mut buffer = ExpressionBuffer::from("1234567890123+");
        assert_eq!(
            buffer.append('.', DEFAULT_MAX_LENGTH),
            Err(CalcError::MaxLengthReached)
        );
    }

    #[test]
    fn test_toggle_sign() {
        let mut buffer = ExpressionBuffer::from("42");
        assert!(buffer.toggle_sign());
        assert_eq!(buffer.as_str(), "-42");
        assert!(buffer.toggle_sign());
        assert_eq!(buffer.as_str(), "42");

        // Whole buffer, not the last operand.
        let mut buffer = ExpressionBuffer::from("5+3");
        buffer.toggle_sign();
        assert_eq!(buffer.as_str(), "-5+3");

        assert!(!ExpressionBuffer::new().toggle_sign());
        assert!(!ExpressionBuffer::from("0").toggle_sign());
    }

    #[test]
    fn test_replace_ignores_cap() {
        let mut buffer = ExpressionBuffer::new();
        buffer.replace("12345678901234567890");
        assert_eq!(buffer.len(), 20);
    }
}
