//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::domain::entities::COMMANDS;
use crate::domain::traits::{Bot, BotInfo, KeyboardButton};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

impl CallbackQuery {
    /// Chat the pressed button belongs to, falling back to the presser
    pub fn chat_id(&self) -> String {
        self.message
            .as_ref()
            .map(|m| m.chat.id)
            .unwrap_or(self.from.id)
            .to_string()
    }
}

#[derive(Debug, Serialize)]
struct InlineKeyboardButton {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_data: Option<String>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest {
    chat_id: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup>,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "domain-store-bot".to_string(),
                username: "domain_store_bot".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// POST a JSON request and decode the `result` field
    async fn call<Req, Res>(&self, method: &str, request: &Req) -> Result<Res, BotError>
    where
        Req: Serialize + ?Sized,
        Res: for<'de> Deserialize<'de>,
    {
        #[derive(Deserialize)]
        struct Response<T> {
            result: T,
        }

        let response = self.client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Network(format!("Telegram API error {} on {}: {}", status, method, body)));
        }

        let data: Response<Res> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.result)
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let data: BotInfoResponse = self.call("getMe", &serde_json::json!({})).await?;

        self.info = BotInfo {
            id: data.id.to_string(),
            name: data.first_name,
            username: data.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string(), "callback_query".to_string()],
        };

        self.call("getUpdates", &request).await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update], current: i64) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(current)
    }

    async fn send(&self, request: SendMessageRequest) -> Result<String, BotError> {
        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let data: MessageResult = self.call("sendMessage", &request).await?;
        Ok(data.message_id.to_string())
    }

    /// Register the command menu with Telegram
    pub async fn register_commands(&self) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command {
            command: &'static str,
            description: &'static str,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest {
            commands: Vec<Command>,
        }

        let commands = COMMANDS
            .iter()
            .map(|c| Command { command: c.name, description: c.description })
            .collect();

        let _: bool = self.call("setMyCommands", &SetMyCommandsRequest { commands }).await?;

        tracing::info!("Registered bot commands with Telegram");
        Ok(())
    }

    /// Send chat action (typing, upload_photo, etc.)
    pub async fn send_chat_action(&self, chat_id: &str, action: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SendChatActionRequest<'a> {
            chat_id: &'a str,
            action: &'a str,
        }

        let _: bool = self
            .call("sendChatAction", &SendChatActionRequest { chat_id, action })
            .await?;
        Ok(())
    }
}

fn parse_mode(html: bool) -> Option<String> {
    html.then(|| "HTML".to_string())
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot (token: {}...)", &self.token[..8.min(self.token.len())]);
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str, html: bool) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, text);

        self.send(SendMessageRequest {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            parse_mode: parse_mode(html),
            reply_markup: None,
        })
        .await
    }

    async fn send_with_keyboard(
        &self,
        chat_id: &str,
        text: &str,
        html: bool,
        buttons: Vec<Vec<KeyboardButton>>,
    ) -> Result<String, BotError> {
        tracing::debug!("Sending with keyboard to {}: {}", chat_id, text);

        let inline_keyboard = buttons
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|btn| InlineKeyboardButton {
                        text: btn.text,
                        callback_data: btn.callback_data,
                    })
                    .collect()
            })
            .collect();

        self.send(SendMessageRequest {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            parse_mode: parse_mode(html),
            reply_markup: Some(InlineKeyboardMarkup { inline_keyboard }),
        })
        .await
    }

    async fn show_typing(&self, chat_id: &str) -> Result<(), BotError> {
        self.send_chat_action(chat_id, "typing").await
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct AnswerRequest<'a> {
            callback_query_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            text: Option<&'a str>,
        }

        let _: bool = self
            .call("answerCallbackQuery", &AnswerRequest { callback_query_id: callback_id, text })
            .await?;
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_updates() {
        let raw = r#"[
            {"update_id": 10, "message": {"message_id": 1, "chat": {"id": 42}, "text": "/start"}},
            {"update_id": 11, "callback_query": {
                "id": "cb", "from": {"id": 7}, "data": "buy_a.ru",
                "message": {"message_id": 2, "chat": {"id": 42}}
            }}
        ]"#;
        let updates: Vec<Update> = serde_json::from_str(raw).unwrap();
        assert_eq!(updates[0].message.as_ref().unwrap().text.as_deref(), Some("/start"));

        let cb = updates[1].callback_query.as_ref().unwrap();
        assert_eq!(cb.chat_id(), "42");
        assert_eq!(cb.data.as_deref(), Some("buy_a.ru"));

        assert_eq!(TelegramAdapter::get_next_offset(&updates, 0), 12);
        assert_eq!(TelegramAdapter::get_next_offset(&[], 12), 12);
    }

    #[test]
    fn test_keyboard_request_shape() {
        let request = SendMessageRequest {
            chat_id: "42".to_string(),
            text: "hi".to_string(),
            parse_mode: parse_mode(true),
            reply_markup: Some(InlineKeyboardMarkup {
                inline_keyboard: vec![vec![InlineKeyboardButton {
                    text: "Купить".to_string(),
                    callback_data: Some("buy_a.ru".to_string()),
                }]],
            }),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["parse_mode"], "HTML");
        assert_eq!(json["reply_markup"]["inline_keyboard"][0][0]["callback_data"], "buy_a.ru");

        let plain = serde_json::to_value(SendMessageRequest {
            chat_id: "42".to_string(),
            text: "hi".to_string(),
            parse_mode: parse_mode(false),
            reply_markup: None,
        })
        .unwrap();
        assert!(plain.get("parse_mode").is_none());
        assert!(plain.get("reply_markup").is_none());
    }
}
