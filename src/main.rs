use std::process::ExitCode;
use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};
use tracing_subscriber::prelude::*;

use herocards::cards::{Catalog, Event, LoggingMiddleware, Navigator, Pipeline, TelegramClient, Transport};
use herocards::config::Config;
use herocards::{keep_alive, ops_log};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
enum Command {
    #[command(description = "show the list of people")]
    Start,
}

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "herocards.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let bot = Bot::new(&config.telegram_bot_token);
    let transport: Arc<dyn Transport> = Arc::new(TelegramClient::new(bot.clone()));

    // Setup logging
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("herocards.log"))
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file in {}: {e}", log_dir.display());
            return ExitCode::FAILURE;
        }
    };
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(config.log_chat_id.map(|chat_id| ops_log::ChatLogLayer::new(transport.clone(), chat_id)))
        .init();

    info!("🚀 Starting herocards...");
    info!("Loaded config from {config_path}");

    let catalog = match Catalog::load(&config.people_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to load people: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("Loaded {} people from {}", catalog.len(), config.people_path.display());

    if let Some(addr) = config.keep_alive_addr {
        keep_alive::spawn(addr);
    }

    match bot.get_me().await {
        Ok(me) => info!("Bot user ID: {}, username: @{}", me.id, me.username()),
        Err(e) => {
            error!("Failed to reach Telegram: {e}");
            return ExitCode::FAILURE;
        }
    }
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {e}");
    }

    let navigator = Navigator::new(Arc::new(catalog), transport).with_menu_title(config.menu_title);
    let pipeline = Arc::new(Pipeline::new(Arc::new(navigator)).with(LoggingMiddleware));

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![pipeline])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped, bye");
    ExitCode::SUCCESS
}

async fn handle_command(msg: Message, cmd: Command, pipeline: Arc<Pipeline>) -> ResponseResult<()> {
    let event = match cmd {
        Command::Start => Event::Start {
            chat_id: msg.chat.id.0,
            user_id: msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(0),
        },
    };

    // Failures are already logged by the middleware.
    let _ = pipeline.dispatch(&event).await;
    Ok(())
}

async fn handle_callback(bot: Bot, q: CallbackQuery, pipeline: Arc<Pipeline>) -> ResponseResult<()> {
    let data = q.data.as_deref().unwrap_or_default();

    let event = q.message.as_ref().and_then(|message| {
        Event::from_callback(q.id.0.clone(), message.chat().id.0, message.id().0 as i64, data)
    });

    match event {
        Some(event) => {
            let _ = pipeline.dispatch(&event).await;
        }
        None => {
            debug!("Ignoring callback {:?} from user {}", data, q.from.id);
            bot.answer_callback_query(q.id.clone()).await.ok();
        }
    }
    Ok(())
}
