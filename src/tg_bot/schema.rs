use std::sync::Arc;

use chrono::Utc;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, instrument, warn};

use crate::converter::{convert, format_amount, format_input};
use crate::models::{transaction_id_for_update, ChatType, NewTransaction, PendingConversion};
use crate::storage::{PendingStorage, RateStorage, TransactionStorage, UserStorage};
use crate::{AppError, Result};

use super::parser::{parse, parse_amount, parse_callback, CallbackAction, ConversionRequest};
use super::update::{Inbound, IncomingCallback, IncomingMessage};
use super::{ChatClient, Keyboard, Reply};

const WELCOME: &str = "Merhaba! TRY ve kripto para birimleri arasında dönüşüm yapmak için aşağıdaki butonları kullanabilirsiniz.";
const USAGE: &str = "Örnek: 100 TRY to BTC";
const CHOOSE_PAIR: &str = "Lütfen bir dönüşüm seçin:";
const PICK_PAIR_FIRST: &str = "Lütfen önce dönüşüm tipini seçin.";
const CANCELLED: &str = "İşlem iptal edildi.";
const UNKNOWN_OPTION: &str = "Bilinmeyen seçenek.";
const INVALID_CURRENCY: &str = "Dönüşüm yapılamadı. Lütfen geçerli para birimleri kullanın.";
const INVALID_AMOUNT: &str = "Miktar sıfırdan büyük bir sayı olmalıdır.";
const FAILURE: &str = "Dönüşüm sırasında bir hata oluştu. Lütfen daha sonra tekrar deneyin.";
const NOT_UNDERSTOOD: &str = "Mesajınızı anlayamadım.";

/// Поддерживаются следующие команды
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// Yardım metnini göster
    Help,
    /// Dönüşüm menüsünü aç
    Start,
    /// Bekleyen dönüşümü iptal et
    Cancel,
}

/// Разбирает входящие события и отвечает в чат
pub struct Dispatcher {
    rates: Arc<dyn RateStorage>,
    transactions: Arc<dyn TransactionStorage>,
    users: Arc<dyn UserStorage>,
    pending: Arc<dyn PendingStorage>,
    chat: Arc<dyn ChatClient>,
    pending_ttl: chrono::Duration,
    bot_name: String,
}

impl Dispatcher {
    pub fn new(
        rates: Arc<dyn RateStorage>,
        transactions: Arc<dyn TransactionStorage>,
        users: Arc<dyn UserStorage>,
        pending: Arc<dyn PendingStorage>,
        chat: Arc<dyn ChatClient>,
        pending_ttl: chrono::Duration,
    ) -> Self {
        Self {
            rates,
            transactions,
            users,
            pending,
            chat,
            pending_ttl,
            bot_name: String::new(),
        }
    }

    /// Имя бота нужно, чтобы понимать команды вида `/help@KurBot` из групп
    pub fn with_bot_name(mut self, bot_name: impl Into<String>) -> Self {
        self.bot_name = bot_name.into();
        self
    }

    /// Ошибки хранилища и мессенджера возвращаются вызывающему,
    /// всё остальное превращается в ответ пользователю
    pub async fn handle(&self, update: Inbound) -> Result<()> {
        match update {
            Inbound::Message(msg) => self.on_message(msg).await,
            Inbound::Callback(cb) => self.on_callback(cb).await,
            Inbound::Unsupported => {
                info!("Пропускаю неподдерживаемое событие");
                Ok(())
            }
        }
    }

    #[instrument(name = "text handler", skip_all, fields(id = msg.sender.id, chat = msg.chat_id))]
    async fn on_message(&self, msg: IncomingMessage) -> Result<()> {
        self.users.upsert(&msg.sender).await?;
        let text = msg.text.trim();
        info!("Получен текст '{text}'");
        if let Ok(command) = Command::parse(text, &self.bot_name) {
            return self.on_command(&msg, command).await;
        }
        match parse(text) {
            Ok(request) => return self.convert_and_reply(&msg, request).await,
            Err(AppError::InvalidAmount) => {
                return self.send(self.reply_to(&msg, INVALID_AMOUNT)).await;
            }
            Err(_) => {}
        }
        match parse_amount(text) {
            Ok(amount) => self.complete_pending(&msg, amount).await,
            Err(AppError::InvalidAmount) => self.send(self.reply_to(&msg, INVALID_AMOUNT)).await,
            Err(_) if msg.chat_type.is_private() => {
                let text = format!("{NOT_UNDERSTOOD}\n{USAGE}");
                self.send(Reply::new(msg.chat_id, text).keyboard(Keyboard::pairs()))
                    .await
            }
            Err(_) => Ok(()),
        }
    }

    async fn on_command(&self, msg: &IncomingMessage, command: Command) -> Result<()> {
        let reply = match command {
            Command::Start => {
                self.pending.clear(msg.sender.id).await?;
                self.reply_to(msg, WELCOME).keyboard(Keyboard::pairs())
            }
            Command::Help => {
                let text = format!(
                    "Bu bot TRY ve kripto para birimlerini dönüştürmenize yardımcı olur.\n\n{commands}\n\n{USAGE}",
                    commands = Command::descriptions()
                );
                self.reply_to(msg, text)
            }
            Command::Cancel => {
                self.pending.clear(msg.sender.id).await?;
                self.reply_to(msg, CANCELLED).keyboard(Keyboard::pairs())
            }
        };
        self.send(reply).await
    }

    async fn complete_pending(&self, msg: &IncomingMessage, amount: f64) -> Result<()> {
        let pending = self.pending.get(msg.sender.id).await?;
        let pending = match pending {
            Some(p) if p.is_expired(Utc::now(), self.pending_ttl) => {
                info!("Выбор пары {}->{} устарел", p.from_currency, p.to_currency);
                self.pending.clear(msg.sender.id).await?;
                None
            }
            other => other,
        };
        let Some(pending) = pending else {
            if msg.chat_type.is_private() {
                let reply = Reply::new(msg.chat_id, PICK_PAIR_FIRST).keyboard(Keyboard::pairs());
                return self.send(reply).await;
            }
            return Ok(());
        };
        let request = ConversionRequest {
            amount,
            from: pending.from_currency,
            to: pending.to_currency,
        };
        self.convert_and_reply(msg, request).await?;
        self.pending.clear(msg.sender.id).await
    }

    async fn convert_and_reply(&self, msg: &IncomingMessage, request: ConversionRequest) -> Result<()> {
        let rates = match self.rates.table().await {
            Ok(r) => r,
            Err(e) => return self.fail(msg, e).await,
        };
        let result = match convert(&request.from, &request.to, request.amount, &rates) {
            Ok(r) => r,
            Err(AppError::UnknownCurrency(c)) => {
                info!("Неизвестная валюта {c}");
                return self.send(self.reply_to(msg, INVALID_CURRENCY)).await;
            }
            Err(AppError::InvalidAmount) => {
                return self.send(self.reply_to(msg, INVALID_AMOUNT)).await;
            }
            Err(e) => return self.fail(msg, e).await,
        };
        let transaction = NewTransaction::builder()
            .id(transaction_id_for_update(msg.update_id))
            .user_id(msg.sender.id)
            .from_currency(request.from.as_str())
            .to_currency(request.to.as_str())
            .from_amount(request.amount)
            .to_amount(result)
            .chat_type(msg.chat_type)
            .build();
        let transaction = match transaction {
            Ok(t) => t,
            Err(e) => {
                // результат вышел нулевым или бесконечным
                warn!("Конвертация не записана: {e}");
                return self.send(self.reply_to(msg, INVALID_AMOUNT)).await;
            }
        };
        let recorded = match self.transactions.record(transaction).await {
            Ok(t) => t,
            Err(e) => return self.fail(msg, e).await,
        };
        info!("Записана транзакция {}", recorded.id);
        let text = conversion_text(&request, result);
        let mut reply = self.reply_to(msg, text);
        if msg.chat_type.is_private() {
            reply = reply.keyboard(Keyboard::pairs());
        }
        self.send(reply).await
    }

    #[instrument(name = "callback handler", skip_all, fields(id = cb.sender.id, chat = cb.chat_id))]
    async fn on_callback(&self, cb: IncomingCallback) -> Result<()> {
        self.users.upsert(&cb.sender).await?;
        info!("Получено: {}", cb.data);
        let reply = match parse_callback(&cb.data) {
            Ok(CallbackAction::MainMenu) => {
                self.pending.clear(cb.sender.id).await?;
                Reply::new(cb.chat_id, CHOOSE_PAIR).keyboard(Keyboard::pairs())
            }
            Ok(CallbackAction::SelectPair { from, to }) => {
                self.pending
                    .set(PendingConversion::new(cb.sender.id, &from, &to))
                    .await?;
                let text = format!(
                    "Lütfen dönüştürmek istediğiniz {from} miktarını girin. Örnek: 100 {from} to {to}"
                );
                Reply::new(cb.chat_id, text).keyboard(Keyboard::back())
            }
            Err(_) => Reply::new(cb.chat_id, UNKNOWN_OPTION).keyboard(Keyboard::pairs()),
        };
        self.send(reply).await
    }

    /// В группах отвечаем цитатой на исходное сообщение
    fn reply_to(&self, msg: &IncomingMessage, text: impl Into<String>) -> Reply {
        let reply = Reply::new(msg.chat_id, text);
        if msg.chat_type == ChatType::Private {
            reply
        } else {
            reply.reply_to(msg.message_id)
        }
    }

    async fn fail(&self, msg: &IncomingMessage, err: AppError) -> Result<()> {
        error!("Ошибка конвертации: {err}");
        if let Err(e) = self.send(self.reply_to(msg, FAILURE)).await {
            error!("Не удалось сообщить об ошибке: {e}");
        }
        Err(err)
    }

    async fn send(&self, reply: Reply) -> Result<()> {
        info!("Отправляю: {}", reply.text);
        self.chat.send(reply).await
    }
}

fn conversion_text(request: &ConversionRequest, result: f64) -> String {
    format!(
        "{from} = {to}",
        from = format_input(request.amount, &request.from),
        to = format_amount(result, &request.to)
    )
}
