/// Prefix of the payload carried by "buy" buttons
pub const BUY_PREFIX: &str = "buy_";

/// Largest payload a button can carry (Telegram's `callback_data` limit)
pub const MAX_PAYLOAD_BYTES: usize = 64;

/// How a reply reaches the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// A new chat message
    Message,
    /// Ephemeral acknowledgment of a button press
    Toast,
}

/// Text markup of a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    Html,
    Plain,
}

/// Inline action button attached to a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyAction {
    pub label: String,
    pub payload: String,
}

impl ReplyAction {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }

    /// "Buy" button carrying the record name
    pub fn buy(label: impl Into<String>, name: &str) -> Self {
        Self::new(label, format!("{}{}", BUY_PREFIX, name))
    }

    /// Whether the payload fits in a button
    pub fn fits(&self) -> bool {
        self.payload.len() <= MAX_PAYLOAD_BYTES
    }

    /// Extract the record name from a buy payload.
    ///
    /// Only the first separator is consumed, so names that contain `_`
    /// come back intact.
    pub fn parse_buy(payload: &str) -> Option<&str> {
        payload
            .strip_prefix(BUY_PREFIX)
            .filter(|name| !name.is_empty())
    }
}

/// One outbound structured message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub action: Option<ReplyAction>,
    pub delivery: Delivery,
    pub markup: Markup,
}

impl Reply {
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: None,
            delivery: Delivery::Message,
            markup: Markup::Html,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            markup: Markup::Plain,
            ..Self::html(text)
        }
    }

    pub fn toast(text: impl Into<String>) -> Self {
        Self {
            delivery: Delivery::Toast,
            ..Self::plain(text)
        }
    }

    pub fn with_action(mut self, action: ReplyAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn is_toast(&self) -> bool {
        self.delivery == Delivery::Toast
    }
}
