mod pending;
mod rate;
mod transaction;
mod user;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::{
    models::{
        NewTransaction, PendingConversion, Rate, RateTable, Stats, Transaction, TransactionFilter,
        TransactionView, User, UserProfile,
    },
    Result,
};

const MAX_CONNECTIONS: u32 = 5;

#[async_trait::async_trait]
pub trait RateStorage: Send + Sync {
    /// Все курсы, отсортированные по символу
    async fn get_all(&self) -> Result<Vec<Rate>>;
    /// Свежий снимок курсов для конвертации
    async fn table(&self) -> Result<RateTable>;
    /// Меняет курс и время обновления, `None` если строки с таким id нет
    async fn update(&self, id: i32, try_rate: f64) -> Result<Option<Rate>>;
}

#[async_trait::async_trait]
pub trait TransactionStorage: Send + Sync {
    /// Повторная запись с тем же id возвращает уже сохранённую строку
    async fn record(&self, transaction: NewTransaction) -> Result<Transaction>;
    /// Новые сверху, вместе с профилем пользователя
    async fn list(&self, filter: TransactionFilter) -> Result<Vec<TransactionView>>;
    async fn stats(&self) -> Result<Stats>;
}

#[async_trait::async_trait]
pub trait UserStorage: Send + Sync {
    async fn upsert(&self, profile: &UserProfile) -> Result<User>;
    async fn get_all(&self) -> Result<Vec<User>>;
}

#[async_trait::async_trait]
pub trait PendingStorage: Send + Sync {
    async fn set(&self, pending: PendingConversion) -> Result<()>;
    async fn get(&self, user_id: i64) -> Result<Option<PendingConversion>>;
    async fn clear(&self, user_id: i64) -> Result<()>;
}

#[derive(Clone)]
pub struct Storage {
    pool: sqlx::PgPool,
}

impl Storage {
    pub fn new(pool: sqlx::PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
    /// Подключается к базе и применяет миграции
    pub async fn connect(database_url: &str) -> Result<Arc<Self>> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;
        info!("Подключилась к базе данных");
        migrate(&pool).await?;
        Ok(Self::new(pool))
    }
}

pub async fn migrate(pool: &sqlx::PgPool) -> Result<()> {
    sqlx::migrate!().run(pool).await?;
    info!("Миграции применены");
    Ok(())
}
