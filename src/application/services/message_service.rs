use crate::application::errors::BotError;
use crate::application::messaging::{CommandRouter, MessageParser};
use crate::domain::entities::{Event, Incoming, Markup, Reply, MAX_PAYLOAD_BYTES};
use crate::domain::traits::{Bot, CatalogStore, KeyboardButton};

/// Outcome of delivering the replies for one event
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
}

/// Service for processing messages: parse, route, deliver
pub struct MessageService<B: Bot, S: CatalogStore> {
    bot: B,
    router: CommandRouter<S>,
    parser: MessageParser,
}

impl<B: Bot, S: CatalogStore> MessageService<B, S> {
    pub fn new(bot: B, router: CommandRouter<S>, parser: MessageParser) -> Self {
        Self { bot, router, parser }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    pub fn parser(&self) -> &MessageParser {
        &self.parser
    }

    /// Process a raw text message from a chat
    pub async fn process_text(&self, chat_id: &str, text: &str) -> DeliveryReport {
        let event = self.parser.parse(text);
        self.process(Incoming::new(chat_id, event)).await
    }

    /// Process an inline button press
    pub async fn process_callback(&self, chat_id: &str, callback_id: &str, data: &str) -> DeliveryReport {
        let event = self.parser.parse_callback(data);
        self.process(Incoming::new(chat_id, event).with_callback(callback_id)).await
    }

    /// Route an event and deliver every reply independently.
    ///
    /// A failed delivery is logged and does not stop the remaining replies.
    pub async fn process(&self, incoming: Incoming) -> DeliveryReport {
        tracing::info!("Processing {} event from chat {}", incoming.event.kind(), incoming.chat_id);
        tracing::debug!("Event: {:?}", incoming.event);

        let replies = self.router.route(&incoming.event).await;
        let mut report = DeliveryReport::default();
        let mut answered = false;

        if replies.iter().any(|r| !r.is_toast()) {
            if let Err(e) = self.bot.show_typing(&incoming.chat_id).await {
                tracing::debug!("Failed to show typing in {}: {}", incoming.chat_id, e);
            }
        }

        for reply in &replies {
            if reply.is_toast() && incoming.callback_id.is_some() {
                answered = true;
            }
            match self.deliver(&incoming, reply).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    tracing::error!("Failed to deliver reply to {}: {}", incoming.chat_id, e);
                    report.failed += 1;
                }
            }
        }

        // Button presses must always be answered or the client keeps spinning
        if let (Event::Action(_), Some(callback_id), false) =
            (&incoming.event, incoming.callback_id.as_deref(), answered)
        {
            if let Err(e) = self.bot.answer_callback(callback_id, None).await {
                tracing::warn!("Failed to answer callback {}: {}", callback_id, e);
            }
        }

        tracing::debug!(
            "Handled {} event from chat {} in {} ms",
            incoming.event.kind(),
            incoming.chat_id,
            incoming.age().num_milliseconds()
        );
        report
    }

    async fn deliver(&self, incoming: &Incoming, reply: &Reply) -> Result<(), BotError> {
        if reply.is_toast() {
            if let Some(callback_id) = &incoming.callback_id {
                return self.bot.answer_callback(callback_id, Some(&reply.text)).await;
            }
        }

        let html = reply.markup == Markup::Html;
        match &reply.action {
            Some(action) if !action.fits() => {
                tracing::warn!(
                    "Payload {:?} exceeds {} bytes, sending without button",
                    action.payload,
                    MAX_PAYLOAD_BYTES
                );
                self.bot.send_message(&incoming.chat_id, &reply.text, html).await?;
            }
            Some(action) => {
                let button = KeyboardButton::new(&action.label).with_callback(&action.payload);
                self.bot
                    .send_with_keyboard(&incoming.chat_id, &reply.text, html, vec![vec![button]])
                    .await?;
            }
            None => {
                self.bot.send_message(&incoming.chat_id, &reply.text, html).await?;
            }
        }
        Ok(())
    }
}
