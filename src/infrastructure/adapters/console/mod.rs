//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::application::errors::BotError;
use crate::application::messaging::parser::CONSOLE_CALLBACK_PREFIX;
use crate::domain::traits::{Bot, BotInfo, KeyboardButton};

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
    input: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "domain-store-bot".to_string(),
                username: "console".to_string(),
            },
            input: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Next non-empty input line, or `None` at end of input
    pub async fn read_line(&self) -> Option<String> {
        let mut input = self.input.lock().await;
        loop {
            match input.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => return Some(line),
                Ok(None) => return None,
                Err(e) => {
                    tracing::error!("Failed to read stdin: {}", e);
                    return None;
                }
            }
        }
    }

    /// Fresh id for a simulated callback query
    pub fn callback_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a button row the way a user can press it back
fn render_buttons(buttons: &[Vec<KeyboardButton>]) -> Vec<String> {
    buttons
        .iter()
        .map(|row| {
            let row_text: Vec<String> = row
                .iter()
                .map(|b| match &b.callback_data {
                    Some(data) => format!("{} ({}{})", b.text, CONSOLE_CALLBACK_PREFIX, data),
                    None => b.text.clone(),
                })
                .collect();
            format!("  [Buttons] {}", row_text.join(" | "))
        })
        .collect()
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        println!("Type a command (/start, /search word, /buy, /help), free text, or cb:<payload>");
        Ok(())
    }

    async fn send_message(&self, _chat_id: &str, text: &str, _html: bool) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    async fn send_with_keyboard(
        &self,
        _chat_id: &str,
        text: &str,
        _html: bool,
        buttons: Vec<Vec<KeyboardButton>>,
    ) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        for line in render_buttons(&buttons) {
            println!("{}", line);
        }
        Ok("console_msg".to_string())
    }

    async fn answer_callback(&self, _callback_id: &str, text: Option<&str>) -> Result<(), BotError> {
        if let Some(text) = text {
            println!("[TOAST] {}", text);
        }
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
