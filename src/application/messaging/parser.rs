//! Message parser - Parses raw chat input into events

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::domain::entities::{command, Event};

/// `name[@bot] [args...]` once the prefix is stripped
static COMMAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^([A-Za-z0-9_]+)(?:@[A-Za-z0-9_]+)?(?:\s+(.*))?$")
        .expect("command pattern is valid")
});

/// Console marker for a simulated button press
pub const CONSOLE_CALLBACK_PREFIX: &str = "cb:";

/// Parses incoming text and callback data into events
#[derive(Debug, Clone)]
pub struct MessageParser {
    command_prefix: String,
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new("/")
    }
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse a text message. Unknown commands stay free text.
    pub fn parse(&self, text: &str) -> Event {
        self.parse_command(text)
            .unwrap_or_else(|| Event::Text(text.to_string()))
    }

    fn parse_command(&self, text: &str) -> Option<Event> {
        let body = match text.strip_prefix('/') {
            Some(rest) => rest,
            None if !self.command_prefix.is_empty() => {
                text.strip_prefix(self.command_prefix.as_str())?
            }
            None => return None,
        };

        let caps = COMMAND_RE.captures(body)?;
        let spec = command::find(caps.get(1)?.as_str())?;
        let args = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

        Some(Event::command(spec.name, args))
    }

    /// Parse a callback query (inline button press)
    pub fn parse_callback(&self, data: &str) -> Event {
        Event::action(data)
    }

    /// Parse a console line: `cb:<payload>` simulates a button press
    pub fn parse_console(&self, line: &str) -> Event {
        match line.strip_prefix(CONSOLE_CALLBACK_PREFIX) {
            Some(payload) => self.parse_callback(payload.trim()),
            None => self.parse(line),
        }
    }
}
