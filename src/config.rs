use std::net::SocketAddr;

use crate::{AppError, Result};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_PENDING_TTL_SECS: i64 = 600;

/// Настройки процесса, читаются из переменных окружения
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub database_url: String,
    pub webhook_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub pending_ttl: chrono::Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{key} not set")))
        };
        let bot_token = required("TELEGRAM_BOT_TOKEN")?;
        let database_url = required("DATABASE_URL")?;
        let webhook_url = lookup("WEBHOOK_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or(String::from(DEFAULT_BIND_ADDR))
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR: {e}")))?;
        let ttl_secs = match lookup("PENDING_TTL_SECS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    AppError::Config(format!("PENDING_TTL_SECS must be a positive integer, got '{raw}'"))
                })?,
            None => DEFAULT_PENDING_TTL_SECS,
        };
        Ok(Self {
            bot_token,
            database_url,
            webhook_url,
            bind_addr,
            pending_ttl: chrono::Duration::seconds(ttl_secs),
        })
    }
}
