use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::converter::{format_amount, format_input};
use crate::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "chat_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
}

impl ChatType {
    pub fn from_chat(chat: &teloxide::types::Chat) -> Option<Self> {
        if chat.is_private() {
            Some(Self::Private)
        } else if chat.is_supergroup() {
            Some(Self::Supergroup)
        } else if chat.is_group() {
            Some(Self::Group)
        } else {
            None
        }
    }
    pub fn is_private(&self) -> bool {
        *self == Self::Private
    }
}

impl std::str::FromStr for ChatType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "private" => Ok(Self::Private),
            "group" => Ok(Self::Group),
            "supergroup" => Ok(Self::Supergroup),
            other => Err(AppError::NotFound(format!("chat type '{other}'"))),
        }
    }
}

/// Записанная конвертация, после вставки не меняется
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: uuid::Uuid,
    pub user_id: i64,
    pub from_currency: String,
    pub to_currency: String,
    pub from_amount: f64,
    pub to_amount: f64,
    pub chat_type: ChatType,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// `1000 TRY`
    pub fn amount_label(&self) -> String {
        format_input(self.from_amount, &self.from_currency)
    }
    /// `0.00100000 BTC`
    pub fn result_label(&self) -> String {
        format_amount(self.to_amount, &self.to_currency)
    }
}

/// Строка для дашборда: транзакция и профиль её автора
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub transaction: Transaction,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransactionFilter {
    pub user_id: Option<i64>,
    pub chat_type: Option<ChatType>,
}

impl TransactionFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.user_id.map_or(true, |id| transaction.user_id == id)
            && self.chat_type.map_or(true, |t| transaction.chat_type == t)
    }
}

/// Повторная доставка одного update от Telegram даёт тот же id
pub fn transaction_id_for_update(update_id: u32) -> uuid::Uuid {
    let name = format!("telegram-update:{update_id}");
    uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, name.as_bytes())
}

#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct NewTransaction {
    #[builder(setter(strip_option), default)]
    pub id: Option<uuid::Uuid>,
    pub user_id: i64,
    #[builder(setter(into))]
    pub from_currency: String,
    #[builder(setter(into))]
    pub to_currency: String,
    pub from_amount: f64,
    pub to_amount: f64,
    pub chat_type: ChatType,
}

impl NewTransaction {
    pub fn builder() -> NewTransactionBuilder {
        NewTransactionBuilder::default()
    }
    /// Переданный id или новый UUID v4
    pub fn id_or_generate(&self) -> uuid::Uuid {
        self.id.unwrap_or_else(uuid::Uuid::new_v4)
    }
}

impl NewTransactionBuilder {
    fn validate(&self) -> Result<(), String> {
        for amount in [self.from_amount, self.to_amount].into_iter().flatten() {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(format!("amount must be positive, got {amount}"));
            }
        }
        if self.from_currency.as_ref().is_some_and(|c| c.trim().is_empty())
            || self.to_currency.as_ref().is_some_and(|c| c.trim().is_empty())
        {
            return Err(String::from("currency must not be empty"));
        }
        Ok(())
    }
}

/// Ответ на API запрос /api/stats
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_users: i64,
    pub total_transactions: i64,
    pub daily_transactions: i64,
}
