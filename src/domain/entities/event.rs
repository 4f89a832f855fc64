use chrono::{DateTime, Duration, Utc};

/// A single inbound user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Known command; `args` is the raw remainder of the line
    Command { name: String, args: String },
    /// Free text message
    Text(String),
    /// Inline button press carrying its opaque payload
    Action(String),
}

impl Event {
    pub fn command(name: impl Into<String>, args: impl Into<String>) -> Self {
        Event::Command { name: name.into(), args: args.into() }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Event::Text(body.into())
    }

    pub fn action(payload: impl Into<String>) -> Self {
        Event::Action(payload.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::Command { .. } => "command",
            Event::Text(_) => "text",
            Event::Action(_) => "action",
        }
    }
}

/// An event together with the transport context needed to answer it
#[derive(Debug, Clone)]
pub struct Incoming {
    pub chat_id: String,
    /// Set for button presses; toasts are answered against it
    pub callback_id: Option<String>,
    pub event: Event,
    pub received_at: DateTime<Utc>,
}

impl Incoming {
    pub fn new(chat_id: impl Into<String>, event: Event) -> Self {
        Self {
            chat_id: chat_id.into(),
            callback_id: None,
            event,
            received_at: Utc::now(),
        }
    }

    pub fn with_callback(mut self, callback_id: impl Into<String>) -> Self {
        self.callback_id = Some(callback_id.into());
        self
    }

    /// Time since the event was received
    pub fn age(&self) -> Duration {
        Utc::now() - self.received_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_counts_from_receipt() {
        let mut incoming = Incoming::new("42", Event::text("hello"));
        incoming.received_at = Utc::now() - Duration::seconds(5);
        assert!(incoming.age() >= Duration::seconds(5));
        assert!(incoming.age() < Duration::seconds(60));
    }
}
