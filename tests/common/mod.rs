#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use kur_api::models::{
    AppState, ChatType, NewTransaction, PendingConversion, Rate, RateTable, Stats, Transaction,
    TransactionFilter, TransactionView, User, UserProfile,
};
use kur_api::storage::{PendingStorage, RateStorage, TransactionStorage, UserStorage};
use kur_api::tg_bot::{
    ChatClient, Dispatcher, Inbound, IncomingCallback, IncomingMessage, Reply,
};
use kur_api::{AppError, Result};

/// Хранилище в памяти с переключателем «база недоступна»
#[derive(Default)]
pub struct MemoryStorage {
    pub rates: Mutex<Vec<Rate>>,
    pub transactions: Mutex<Vec<Transaction>>,
    pub users: Mutex<Vec<User>>,
    pub pending: Mutex<Vec<PendingConversion>>,
    pub rates_down: AtomicBool,
    pub transactions_down: AtomicBool,
}

impl MemoryStorage {
    pub fn with_rates(rates: &[(&str, f64)]) -> Arc<Self> {
        let storage = Self::default();
        *storage.rates.lock().unwrap() = rates
            .iter()
            .enumerate()
            .map(|(i, (currency, try_rate))| Rate {
                id: i as i32 + 1,
                currency: currency.to_string(),
                try_rate: *try_rate,
                last_updated: Utc::now(),
            })
            .collect();
        Arc::new(storage)
    }
    pub fn recorded(&self) -> Vec<Transaction> {
        self.transactions.lock().unwrap().clone()
    }
    pub fn pending_for(&self, user_id: i64) -> Option<PendingConversion> {
        self.pending
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned()
    }
}

#[async_trait::async_trait]
impl RateStorage for MemoryStorage {
    async fn get_all(&self) -> Result<Vec<Rate>> {
        if self.rates_down.load(Ordering::SeqCst) {
            return Err(AppError::RateLookupFailed(String::from("database is down")));
        }
        let mut rates = self.rates.lock().unwrap().clone();
        rates.sort_by(|a, b| a.currency.cmp(&b.currency));
        Ok(rates)
    }
    async fn table(&self) -> Result<RateTable> {
        let rates = RateStorage::get_all(self).await?;
        Ok(RateTable::from(rates.as_slice()))
    }
    async fn update(&self, id: i32, try_rate: f64) -> Result<Option<Rate>> {
        let mut rates = self.rates.lock().unwrap();
        Ok(rates.iter_mut().find(|r| r.id == id).map(|r| {
            r.try_rate = try_rate;
            r.last_updated = Utc::now();
            r.clone()
        }))
    }
}

#[async_trait::async_trait]
impl TransactionStorage for MemoryStorage {
    async fn record(&self, transaction: NewTransaction) -> Result<Transaction> {
        if self.transactions_down.load(Ordering::SeqCst) {
            return Err(AppError::PersistenceFailed(String::from("database is down")));
        }
        let id = transaction.id_or_generate();
        let mut transactions = self.transactions.lock().unwrap();
        if let Some(existing) = transactions.iter().find(|t| t.id == id) {
            return Ok(existing.clone());
        }
        let recorded = Transaction {
            id,
            user_id: transaction.user_id,
            from_currency: transaction.from_currency,
            to_currency: transaction.to_currency,
            from_amount: transaction.from_amount,
            to_amount: transaction.to_amount,
            chat_type: transaction.chat_type,
            created_at: Utc::now(),
        };
        transactions.push(recorded.clone());
        Ok(recorded)
    }
    async fn list(&self, filter: TransactionFilter) -> Result<Vec<TransactionView>> {
        if self.transactions_down.load(Ordering::SeqCst) {
            return Err(AppError::PersistenceFailed(String::from("database is down")));
        }
        let users = self.users.lock().unwrap().clone();
        let mut result = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| filter.matches(t))
            .map(|t| {
                let user = users.iter().find(|u| u.id == t.user_id);
                TransactionView {
                    transaction: t.clone(),
                    username: user.and_then(|u| u.username.clone()),
                    first_name: user.and_then(|u| u.first_name.clone()),
                    last_name: user.and_then(|u| u.last_name.clone()),
                }
            })
            .collect::<Vec<_>>();
        result.reverse();
        Ok(result)
    }
    async fn stats(&self) -> Result<Stats> {
        let total = self.transactions.lock().unwrap().len() as i64;
        Ok(Stats {
            total_users: self.users.lock().unwrap().len() as i64,
            total_transactions: total,
            daily_transactions: total,
        })
    }
}

#[async_trait::async_trait]
impl UserStorage for MemoryStorage {
    async fn upsert(&self, profile: &UserProfile) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == profile.id) {
            user.username = profile.username.clone();
            user.first_name = profile.first_name.clone();
            user.last_name = profile.last_name.clone();
            return Ok(user.clone());
        }
        let user = User {
            id: profile.id,
            username: profile.username.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            join_date: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }
    async fn get_all(&self) -> Result<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }
}

#[async_trait::async_trait]
impl PendingStorage for MemoryStorage {
    async fn set(&self, pending: PendingConversion) -> Result<()> {
        let mut all = self.pending.lock().unwrap();
        all.retain(|p| p.user_id != pending.user_id);
        all.push(pending);
        Ok(())
    }
    async fn get(&self, user_id: i64) -> Result<Option<PendingConversion>> {
        Ok(self.pending_for(user_id))
    }
    async fn clear(&self, user_id: i64) -> Result<()> {
        self.pending.lock().unwrap().retain(|p| p.user_id != user_id);
        Ok(())
    }
}

/// Запоминает все отправленные ответы
#[derive(Default)]
pub struct RecordingChat {
    pub sent: Mutex<Vec<Reply>>,
    pub webhooks: Mutex<Vec<String>>,
    pub down: AtomicBool,
}

impl RecordingChat {
    pub fn texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|r| r.text.clone()).collect()
    }
    pub fn last(&self) -> Option<Reply> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl ChatClient for RecordingChat {
    async fn send(&self, reply: Reply) -> Result<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(AppError::UpstreamReplyFailed(String::from("telegram is down")));
        }
        self.sent.lock().unwrap().push(reply);
        Ok(())
    }
    async fn set_webhook(&self, url: &str) -> Result<()> {
        self.webhooks.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub storage: Arc<MemoryStorage>,
    pub chat: Arc<RecordingChat>,
    pub dispatcher: Arc<Dispatcher>,
}

impl Harness {
    pub fn new(rates: &[(&str, f64)]) -> Self {
        Self::with_ttl(rates, chrono::Duration::minutes(10))
    }
    pub fn with_ttl(rates: &[(&str, f64)], ttl: chrono::Duration) -> Self {
        let storage = MemoryStorage::with_rates(rates);
        let chat = Arc::new(RecordingChat::default());
        let dispatcher = Arc::new(Dispatcher::new(
            storage.clone(),
            storage.clone(),
            storage.clone(),
            storage.clone(),
            chat.clone(),
            ttl,
        )
        .with_bot_name(BOT_NAME));
        Self {
            storage,
            chat,
            dispatcher,
        }
    }
    pub fn state(&self, webhook_url: Option<&str>) -> AppState {
        AppState {
            rate_storage: self.storage.clone(),
            transaction_storage: self.storage.clone(),
            user_storage: self.storage.clone(),
            dispatcher: self.dispatcher.clone(),
            chat: self.chat.clone(),
            webhook_url: webhook_url.map(String::from),
        }
    }
}

pub const USER_ID: i64 = 42;
pub const BOT_NAME: &str = "KurBot";

static NEXT_UPDATE_ID: AtomicU32 = AtomicU32::new(1);

/// Каждое сообщение приходит отдельным событием Telegram
pub fn next_update_id() -> u32 {
    NEXT_UPDATE_ID.fetch_add(1, Ordering::SeqCst)
}

pub fn sender() -> UserProfile {
    UserProfile {
        id: USER_ID,
        username: Some(String::from("ayse")),
        first_name: Some(String::from("Ayşe")),
        last_name: None,
    }
}

pub fn private_text(text: &str) -> Inbound {
    Inbound::Message(IncomingMessage {
        update_id: next_update_id(),
        chat_id: USER_ID,
        message_id: 10,
        chat_type: ChatType::Private,
        sender: sender(),
        text: text.to_string(),
    })
}

pub fn group_text(text: &str) -> Inbound {
    Inbound::Message(IncomingMessage {
        update_id: next_update_id(),
        chat_id: -1001,
        message_id: 77,
        chat_type: ChatType::Supergroup,
        sender: sender(),
        text: text.to_string(),
    })
}

pub fn button(data: &str) -> Inbound {
    Inbound::Callback(IncomingCallback {
        chat_id: USER_ID,
        sender: sender(),
        data: data.to_string(),
    })
}

pub const RATES: [(&str, f64); 2] = [("BTC", 1_000_000.0), ("USDT", 31.5)];
