use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::task::JoinSet;

use domain_store_bot::application::errors::BotError;
use domain_store_bot::application::messaging::{CommandRouter, MessageParser};
use domain_store_bot::application::services::MessageService;
use domain_store_bot::domain::entities::{Event, Incoming};
use domain_store_bot::domain::traits::{Bot, CatalogStore};
use domain_store_bot::infrastructure::adapters::{ConsoleAdapter, TelegramAdapter};
use domain_store_bot::infrastructure::config::Config;
use domain_store_bot::infrastructure::database::SqliteCatalog;
use domain_store_bot::infrastructure::storage::{self, MemoryCatalog};

#[derive(Parser)]
#[command(name = "domain-store-bot")]
#[command(about = "Chat storefront for a catalog of domains", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,

    /// Catalog database path (overrides config)
    #[arg(short, long)]
    database: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Print default config
    InitConfig,
    /// Create the catalog table
    InitDb,
    /// Import records from a YAML or JSON file into the catalog database
    Import {
        /// Records file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Version => {
            println!("domain-store-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
        ref command => match load_config(&cli.config, cli.token.clone(), cli.database.clone()) {
            Ok(config) => match command {
                Commands::Run => run_bot(config),
                Commands::InitDb => init_db(&config),
                Commands::Import { file } => import_records(&config, file),
                Commands::Version | Commands::InitConfig => Ok(()),
            },
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(
    path: &str,
    token: Option<String>,
    database: Option<PathBuf>,
) -> Result<Config, BotError> {
    let mut config = Config::load_or_default(path)?;
    config.apply_env();

    if let Some(token) = token {
        config.set_token(token);
    }
    if let Some(database) = database {
        config.catalog.database = database;
    }
    Ok(config)
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}

fn init_db(config: &Config) -> Result<(), BotError> {
    let db = SqliteCatalog::open(&config.catalog.database)?;
    tracing::info!(
        "Catalog table ready in {} ({} records)",
        config.catalog.database.display(),
        db.count()?
    );
    Ok(())
}

fn import_records(config: &Config, file: &Path) -> Result<(), BotError> {
    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;
    let records = rt.block_on(storage::load_records(file))?;

    let db = SqliteCatalog::open(&config.catalog.database)?;
    let imported = db.import(&records)?;
    tracing::info!(
        "Imported {} records from {} into {}",
        imported,
        file.display(),
        config.catalog.database.display()
    );
    Ok(())
}

fn run_bot(config: Config) -> Result<(), BotError> {
    tracing::info!("Starting {}", config.bot.name);

    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;
    rt.block_on(open_catalog_and_serve(&config))
}

async fn open_catalog_and_serve(config: &Config) -> Result<(), BotError> {
    match &config.catalog.seed_file {
        Some(path) => {
            let store = MemoryCatalog::load(path).await?;
            tracing::info!("Serving {} records from {}", store.len().await, path.display());
            serve(config, store).await
        }
        None => {
            let store = SqliteCatalog::open(&config.catalog.database)?;
            tracing::info!("Database initialized ({} records)", store.count()?);
            serve(config, store).await
        }
    }
}

async fn serve<S: CatalogStore + 'static>(config: &Config, store: S) -> Result<(), BotError> {
    let router = CommandRouter::new(store, config.formatter())
        .with_settings(config.router_settings());
    let parser = MessageParser::new(&config.bot.prefix);

    if let Some(token) = config.telegram_token() {
        let mut bot = TelegramAdapter::new(token);
        bot.fetch_bot_info().await?;
        tracing::info!("Bot started: @{}", bot.bot_info().username);

        if let Err(e) = bot.register_commands().await {
            tracing::warn!("Failed to register commands: {}", e);
        }

        let service = Arc::new(MessageService::new(bot, router, parser));
        run_telegram_bot(service, config.adapters.telegram.poll_timeout).await
    } else {
        // Run console bot (dev mode)
        let service = MessageService::new(ConsoleAdapter::new(), router, parser);
        run_console_bot(&service).await
    }
}

async fn run_telegram_bot<S: CatalogStore + 'static>(
    service: Arc<MessageService<TelegramAdapter, S>>,
    timeout_seconds: i64,
) -> Result<(), BotError> {
    service.bot().start().await?;

    let mut offset: i64 = 0;
    let mut tasks = JoinSet::new();
    tracing::info!("Starting message loop...");

    loop {
        reap_finished(&mut tasks);

        let updates = tokio::select! {
            updates = service.bot().get_updates(offset, timeout_seconds) => updates,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down ({} events in flight)", tasks.len());
                tasks.shutdown().await;
                return Ok(());
            }
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
                continue;
            }
        };

        if !updates.is_empty() {
            tracing::info!("Received {} updates", updates.len());
        }

        // Events are independent; a slow one must not hold up the next poll
        for update in &updates {
            let service = Arc::clone(&service);

            if let Some(msg) = &update.message {
                let Some(text) = msg.text.clone() else { continue };
                let chat_id = msg.chat.id.to_string();
                tasks.spawn(async move {
                    service.process_text(&chat_id, &text).await;
                });
            } else if let Some(cb) = &update.callback_query {
                let chat_id = cb.chat_id();
                let callback_id = cb.id.clone();
                let data = cb.data.clone().unwrap_or_default();
                tasks.spawn(async move {
                    service.process_callback(&chat_id, &callback_id, &data).await;
                });
            }
        }

        offset = TelegramAdapter::get_next_offset(&updates, offset);
    }
}

/// Collect handlers that have already finished without waiting on the rest
fn reap_finished(tasks: &mut JoinSet<()>) -> usize {
    let mut reaped = 0;
    while let Some(joined) = tasks.try_join_next() {
        if let Err(e) = joined {
            tracing::error!("Event handler panicked: {}", e);
        }
        reaped += 1;
    }
    reaped
}

async fn run_console_bot<S: CatalogStore>(
    service: &MessageService<ConsoleAdapter, S>,
) -> Result<(), BotError> {
    service.bot().start().await?;

    while let Some(line) = service.bot().read_line().await {
        let incoming = match service.parser().parse_console(&line) {
            event @ Event::Action(_) => {
                Incoming::new("console", event).with_callback(ConsoleAdapter::callback_id())
            }
            event => Incoming::new("console", event),
        };
        service.process(incoming).await;
    }

    tracing::info!("Console input closed");
    Ok(())
}
