//! Command router - maps one inbound event to the replies it produces

use crate::application::errors::{BotError, CommandError};
use crate::application::formatter::{EmptyContext, ReplyFormatter};
use crate::application::services::CatalogService;
use crate::domain::entities::{command, CatalogRecord, CommandKind, Event, Reply, ReplyAction};
use crate::domain::traits::CatalogStore;

/// Result of handling a single event
pub type RouteResult = Result<Vec<Reply>, BotError>;

/// Listing and search limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterSettings {
    /// Records shown by /start
    pub page_size: usize,
    /// Records shown for a free-text query
    pub free_text_limit: usize,
    /// Shorter free text is ignored
    pub min_query_length: usize,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            free_text_limit: 5,
            min_query_length: 3,
        }
    }
}

/// Routes events to handlers through the command table
pub struct CommandRouter<S: CatalogStore> {
    catalog: CatalogService<S>,
    formatter: ReplyFormatter,
    settings: RouterSettings,
}

impl<S: CatalogStore> CommandRouter<S> {
    pub fn new(store: S, formatter: ReplyFormatter) -> Self {
        Self {
            catalog: CatalogService::new(store),
            formatter,
            settings: RouterSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RouterSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn catalog(&self) -> &CatalogService<S> {
        &self.catalog
    }

    /// Handle one event. Never fails: errors become replies or are dropped.
    pub async fn route(&self, event: &Event) -> Vec<Reply> {
        match self.dispatch(event).await {
            Ok(replies) => replies,
            Err(BotError::Command(CommandError::Malformed { command })) => {
                tracing::debug!("Malformed /{} invocation", command);
                vec![self.formatter.format_usage(&command)]
            }
            Err(BotError::Command(CommandError::MalformedActionPayload(payload))) => {
                tracing::debug!("Ignoring action payload {:?}", payload);
                Vec::new()
            }
            Err(e) => {
                tracing::error!("Failed to handle {} event: {}", event.kind(), e);
                vec![self.formatter.format_failure()]
            }
        }
    }

    /// Handle one event, surfacing errors to the caller
    pub async fn dispatch(&self, event: &Event) -> RouteResult {
        match event {
            Event::Command { name, args } => match command::find(name) {
                Some(spec) => self.handle_command(spec.kind, args).await,
                None => {
                    tracing::debug!("Ignoring unknown command {:?}", name);
                    Ok(Vec::new())
                }
            },
            Event::Text(body) => self.handle_text(body).await,
            Event::Action(payload) => self.handle_action(payload),
        }
    }

    async fn handle_command(&self, kind: CommandKind, args: &str) -> RouteResult {
        match kind {
            CommandKind::Start => self.handle_start().await,
            CommandKind::Help => Ok(vec![self.formatter.format_help()]),
            CommandKind::Search => self.handle_search(args).await,
            CommandKind::Buy => Ok(vec![self.formatter.format_buy_instructions()]),
        }
    }

    async fn handle_start(&self) -> RouteResult {
        let records = self.catalog.list_all().await?;
        if records.is_empty() {
            return Ok(vec![self.formatter.format_empty(EmptyContext::Catalog)]);
        }

        let total = records.len();
        let shown = total.min(self.settings.page_size);
        let mut replies: Vec<Reply> = records
            .iter()
            .take(shown)
            .map(|r| self.formatter.format_record(r, true))
            .collect();

        if total > shown {
            replies.push(self.formatter.format_overflow_notice(total, shown));
        }
        Ok(replies)
    }

    async fn handle_search(&self, args: &str) -> RouteResult {
        let keyword = args.trim();
        if keyword.is_empty() {
            return Err(CommandError::Malformed { command: "search".to_string() }.into());
        }

        let records = self.catalog.search(keyword).await?;
        Ok(self.search_replies(keyword, &records, None))
    }

    async fn handle_text(&self, body: &str) -> RouteResult {
        let query = body.trim().to_lowercase();
        if query.chars().count() < self.settings.min_query_length {
            return Ok(Vec::new());
        }

        let records = self.catalog.search(&query).await?;
        Ok(self.search_replies(&query, &records, Some(self.settings.free_text_limit)))
    }

    fn handle_action(&self, payload: &str) -> RouteResult {
        let name = ReplyAction::parse_buy(payload)
            .ok_or_else(|| CommandError::MalformedActionPayload(payload.to_string()))?;
        Ok(vec![self.formatter.format_buy_ack(name)])
    }

    /// Count header plus one reduced card per record, optionally capped
    fn search_replies(
        &self,
        keyword: &str,
        records: &[CatalogRecord],
        limit: Option<usize>,
    ) -> Vec<Reply> {
        if records.is_empty() {
            return vec![self.formatter.format_empty(EmptyContext::Search(keyword))];
        }

        let limit = limit.unwrap_or(records.len());
        std::iter::once(self.formatter.format_search_header(records.len(), keyword))
            .chain(records.iter().take(limit).map(|r| self.formatter.format_record(r, false)))
            .collect()
    }
}
