//! Input source mapping.
//!
//! Keyboard keys and on-screen buttons both resolve to a [`Command`], which
//! the calculator executes through the same buffer operations.

use std::str::FromStr;

use thiserror::Error;

use super::Event;

/// A key, independent of the terminal backend that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    /// Any key the calculator has no use for.
    Other,
}

/// Modifier keys held during a key press. Shift is not tracked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is held.
    pub fn any(self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// A key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

/// An operation on the calculator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Append(char),
    Evaluate,
    Clear,
    ClearEntry,
    Backspace,
    ToggleSign,
}

/// Map a key press to a command.
///
/// Returns `None` for keys that are not consumed: anything pressed with
/// Ctrl, Alt or Meta held, and keys without a binding.
pub fn command_for_key(input: &KeyInput) -> Option<Command> {
    if input.modifiers.any() {
        return None;
    }

    match input.key {
        Key::Char(c @ ('0'..='9' | '+' | '-' | '*' | '/' | '.')) => Some(Command::Append(c)),
        Key::Char('=') | Key::Enter => Some(Command::Evaluate),
        Key::Char('c' | 'C') | Key::Escape => Some(Command::Clear),
        Key::Backspace => Some(Command::Backspace),
        _ => None,
    }
}

/// An on-screen keypad button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    /// Digits, operators, `.`, `(` and `)`: appended as-is.
    Literal(char),
    Equals,
    Clear,
    ClearEntry,
    Backspace,
    ToggleSign,
}

impl Button {
    pub fn command(self) -> Command {
        match self {
            Self::Literal(c) => Command::Append(c),
            Self::Equals => Command::Evaluate,
            Self::Clear => Command::Clear,
            Self::ClearEntry => Command::ClearEntry,
            Self::Backspace => Command::Backspace,
            Self::ToggleSign => Command::ToggleSign,
        }
    }

    /// Label printed on the button.
    pub fn label(self) -> String {
        match self {
            Self::Literal(c) => c.to_string(),
            Self::Equals => "=".to_string(),
            Self::Clear => "C".to_string(),
            Self::ClearEntry => "CE".to_string(),
            Self::Backspace => "⌫".to_string(),
            Self::ToggleSign => "±".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputParseError {
    #[error("empty button label")]
    EmptyLabel,
    #[error("unknown button label: {0}")]
    UnknownButton(String),
    #[error("unknown key name: {{{0}}}")]
    UnknownKey(String),
    #[error("unterminated key name starting at offset {0}")]
    Unterminated(usize),
}

impl FromStr for Button {
    type Err = InputParseError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "" => Err(InputParseError::EmptyLabel),
            "=" => Ok(Self::Equals),
            "C" => Ok(Self::Clear),
            "CE" => Ok(Self::ClearEntry),
            "⌫" | "backspace" => Ok(Self::Backspace),
            "±" | "+/-" => Ok(Self::ToggleSign),
            _ => {
                let mut chars = label.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Self::Literal(c)),
                    _ => Err(InputParseError::UnknownButton(label.to_string())),
                }
            }
        }
    }
}

/// Parse a key script into input events.
///
/// Every character is a key press; `{Name}` names a special key or button:
/// `{Enter}`, `{Escape}`/`{Esc}`, `{Backspace}`, `{CE}`, `{Negate}`/`{±}`.
pub fn parse_key_script(script: &str) -> Result<Vec<Event>, InputParseError> {
    let mut events = Vec::new();
    let mut chars = script.char_indices();

    while let Some((offset, c)) = chars.next() {
        if c != '{' {
            events.push(Event::Key(KeyInput::new(Key::Char(c))));
            continue;
        }

        let mut name = String::new();
        let mut terminated = false;
        for (_, c) in chars.by_ref() {
            if c == '}' {
                terminated = true;
                break;
            }
            name.push(c);
        }
        if !terminated {
            return Err(InputParseError::Unterminated(offset));
        }

        let event = match name.as_str() {
            "Enter" => Event::Key(KeyInput::new(Key::Enter)),
            "Escape" | "Esc" => Event::Key(KeyInput::new(Key::Escape)),
            "Backspace" => Event::Key(KeyInput::new(Key::Backspace)),
            "CE" => Event::Button(Button::ClearEntry),
            "Negate" | "±" => Event::Button(Button::ToggleSign),
            _ => return Err(InputParseError::UnknownKey(name)),
        };
        events.push(event);
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> KeyInput {
        KeyInput::new(Key::Char(c))
    }

    #[test]
    fn test_character_keys() {
        for c in "0123456789+-*/.".chars() {
            assert_eq!(command_for_key(&key(c)), Some(Command::Append(c)));
        }
        assert_eq!(command_for_key(&key('x')), None);
        assert_eq!(command_for_key(&key('(')), None);
    }

    #[test]
    fn test_command_keys() {
        assert_eq!(command_for_key(&key('=')), Some(Command::Evaluate));
        assert_eq!(
            command_for_key(&KeyInput::new(Key::Enter)),
            Some(Command::Evaluate)
        );
        assert_eq!(command_for_key(&key('c')), Some(Command::Clear));
        assert_eq!(command_for_key(&key('C')), Some(Command::Clear));
        assert_eq!(
            command_for_key(&KeyInput::new(Key::Escape)),
            Some(Command::Clear)
        );
        assert_eq!(
            command_for_key(&KeyInput::new(Key::Backspace)),
            Some(Command::Backspace)
        );
        assert_eq!(command_for_key(&KeyInput::new(Key::Other)), None);
    }

    #[test]
    fn test_modifiers_pass_through() {
        let ctrl_c = KeyInput::with_modifiers(Key::Char('c'), Modifiers::CTRL);
        assert_eq!(command_for_key(&ctrl_c), None);

        let alt_digit = KeyInput::with_modifiers(
            Key::Char('1'),
            Modifiers {
                alt: true,
                ..Default::default()
            },
        );
        assert_eq!(command_for_key(&alt_digit), None);

        let meta_enter = KeyInput::with_modifiers(
            Key::Enter,
            Modifiers {
                meta: true,
                ..Default::default()
            },
        );
        assert_eq!(command_for_key(&meta_enter), None);
    }

    #[test]
    fn test_button_labels() {
        assert_eq!("7".parse::<Button>(), Ok(Button::Literal('7')));
        assert_eq!("(".parse::<Button>(), Ok(Button::Literal('(')));
        assert_eq!("CE".parse::<Button>(), Ok(Button::ClearEntry));
        assert_eq!("±".parse::<Button>(), Ok(Button::ToggleSign));
        assert_eq!("+/-".parse::<Button>(), Ok(Button::ToggleSign));
        assert_eq!(
            "sqrt".parse::<Button>(),
            Err(InputParseError::UnknownButton("sqrt".to_string()))
        );

        for button in [Button::Equals, Button::Clear, Button::Backspace, Button::Literal('/')] {
            assert_eq!(button.label().parse::<Button>(), Ok(button));
        }
    }

    #[test]
    fn test_button_commands() {
        assert_eq!(Button::Literal(')').command(), Command::Append(')'));
        assert_eq!(Button::ToggleSign.command(), Command::ToggleSign);
        assert_eq!(Button::ClearEntry.command(), Command::ClearEntry);
    }

    #[test]
    fn test_parse_key_script() {
        let events = parse_key_script("1+{Backspace}{CE}{Enter}").unwrap();
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], Event::Key(k) if k.key == Key::Char('1')));
        assert!(matches!(events[2], Event::Key(k) if k.key == Key::Backspace));
        assert!(matches!(events[3], Event::Button(Button::ClearEntry)));
        assert!(matches!(events[4], Event::Key(k) if k.key == Key::Enter));
    }

    #[test]
    fn test_parse_key_script_errors() {
        assert_eq!(
            parse_key_script("1{Tab}").unwrap_err(),
            InputParseError::UnknownKey("Tab".to_string())
        );
        assert_eq!(
            parse_key_script("12{Enter").unwrap_err(),
            InputParseError::Unterminated(2)
        );
    }
}
