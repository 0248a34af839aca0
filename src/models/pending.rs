use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Пара валют, выбранная кнопкой, ждёт суммы от пользователя
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct PendingConversion {
    pub user_id: i64,
    pub from_currency: String,
    pub to_currency: String,
    pub created_at: DateTime<Utc>,
}

impl PendingConversion {
    pub fn new(user_id: i64, from_currency: &str, to_currency: &str) -> Self {
        Self {
            user_id,
            from_currency: from_currency.to_uppercase(),
            to_currency: to_currency.to_uppercase(),
            created_at: Utc::now(),
        }
    }
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        self.created_at + ttl < now
    }
}
