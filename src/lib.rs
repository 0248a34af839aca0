pub mod config;
pub mod converter;
mod error;
pub mod models;
pub mod routes;
pub mod storage;
pub mod tg_bot;

use std::sync::Arc;

pub use error::{AppError, Result};

use config::Config;
use models::AppState;
use storage::Storage;
use tg_bot::{ChatClient, Dispatcher, TGBot};

/// Собирает общее состояние обработчиков поверх одного хранилища
pub fn app_state(
    storage: Arc<Storage>,
    chat: Arc<dyn ChatClient>,
    config: &Config,
    bot_name: &str,
) -> AppState {
    let dispatcher = Dispatcher::new(
        storage.clone(),
        storage.clone(),
        storage.clone(),
        storage.clone(),
        chat.clone(),
        config.pending_ttl,
    )
    .with_bot_name(bot_name);
    AppState {
        rate_storage: storage.clone(),
        transaction_storage: storage.clone(),
        user_storage: storage,
        dispatcher: Arc::new(dispatcher),
        chat,
        webhook_url: config.webhook_url.clone(),
    }
}

pub struct LocalService {
    config: Config,
}

impl LocalService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
    pub async fn run(&self) -> anyhow::Result<()> {
        tracing::info!("Инициализирую базу данных");
        let storage = Storage::connect(&self.config.database_url).await?;
        tracing::info!("База данных готова к использованию");
        let bot = TGBot::new(&self.config.bot_token)?;
        let bot_name = bot.username().await?;
        let chat: Arc<dyn ChatClient> = Arc::new(bot);
        let state = app_state(storage, chat, &self.config, &bot_name);
        let router = routes::init(state);
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!("Слушаю {}", self.config.bind_addr);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("{e:?}");
    }
    tracing::info!("Получен сигнал остановки");
}
