mod keyboard;
pub mod parser;
mod schema;
mod update;

pub use keyboard::{Button, Keyboard};
pub use schema::{Command, Dispatcher};
pub use update::{Inbound, IncomingCallback, IncomingMessage};

use std::time::Duration;

use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId, ReplyParameters};
use tracing::instrument;

use crate::{AppError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Исходящее сообщение в чат
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<Keyboard>,
    pub reply_to: Option<i32>,
}

impl Reply {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: None,
            reply_to: None,
        }
    }
    pub fn keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
    pub fn reply_to(mut self, message_id: i32) -> Self {
        self.reply_to = Some(message_id);
        self
    }
}

/// Исходящая сторона мессенджера
#[async_trait::async_trait]
pub trait ChatClient: Send + Sync {
    async fn send(&self, reply: Reply) -> Result<()>;
    async fn set_webhook(&self, url: &str) -> Result<()>;
}

pub struct TGBot {
    bot: Bot,
}

impl TGBot {
    #[instrument(name = "initializing bot", skip(token))]
    pub fn new(token: &str) -> Result<Self> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(REQUEST_TIMEOUT)
            .gzip(true)
            .build()
            .map_err(|e| AppError::Config(format!("http client: {e}")))?;
        let bot = Bot::with_client(token, client);
        Ok(Self { bot })
    }

    /// Имя бота из getMe, без `@`
    pub async fn username(&self) -> Result<String> {
        let me = self.bot.get_me().await?;
        let username = me.user.username.clone().unwrap_or_default();
        tracing::info!("Бот зарегистрирован как @{username}");
        Ok(username)
    }
}

#[async_trait::async_trait]
impl ChatClient for TGBot {
    async fn send(&self, reply: Reply) -> Result<()> {
        let mut request = self.bot.send_message(ChatId(reply.chat_id), reply.text);
        if let Some(kb) = reply.keyboard {
            request = request.reply_markup(InlineKeyboardMarkup::from(kb));
        }
        if let Some(id) = reply.reply_to {
            request = request.reply_parameters(ReplyParameters::new(MessageId(id)));
        }
        request.await?;
        Ok(())
    }
    async fn set_webhook(&self, url: &str) -> Result<()> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| AppError::Config(format!("invalid webhook url '{url}': {e}")))?;
        self.bot.set_webhook(url).await?;
        tracing::info!("Webhook зарегистрирован");
        Ok(())
    }
}
