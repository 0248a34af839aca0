use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub join_date: DateTime<Utc>,
}

/// Профиль отправителя из Telegram, перезаписывается при каждом обращении
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<&teloxide::types::User> for UserProfile {
    fn from(value: &teloxide::types::User) -> Self {
        Self {
            id: value.id.0 as i64,
            username: value.username.clone(),
            first_name: Some(value.first_name.clone()).filter(|n| !n.is_empty()),
            last_name: value.last_name.clone(),
        }
    }
}
