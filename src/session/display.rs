//! Display sink abstraction.

use std::io;

/// A single text surface plus an error-styling flag.
///
/// The calculator writes either the current buffer or an `Error: <message>`
/// string, and toggles the styling flag in lockstep with its error state.
pub trait DisplaySink {
    /// Replace the displayed text.
    fn show(&mut self, text: &str) -> io::Result<()>;

    /// Turn error styling on or off.
    fn set_error_styling(&mut self, enabled: bool) -> io::Result<()>;
}

/// In-memory display, used for headless replays and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryDisplay {
    text: String,
    error_styling: bool,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error_styling(&self) -> bool {
        self.error_styling
    }
}

impl DisplaySink for MemoryDisplay {
    fn show(&mut self, text: &str) -> io::Result<()> {
        self.text.clear();
        self.text.push_str(text);
        Ok(())
    }

    fn set_error_styling(&mut self, enabled: bool) -> io::Result<()> {
        self.error_styling = enabled;
        Ok(())
    }
}
