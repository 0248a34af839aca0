use serde::Serialize;

#[derive(Debug, Serialize, thiserror::Error)]
pub enum AppError {
    #[error("text does not match '<amount> <FROM> to <TO>'")]
    NoMatch,
    #[error("amount must be a positive number")]
    InvalidAmount,
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
    #[error("rate lookup failed: {0}")]
    RateLookupFailed(String),
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),
    #[error("reply to chat platform failed: {0}")]
    UpstreamReplyFailed(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("{0} not found")]
    NotFound(String),
}

pub type Result<T> = core::result::Result<T, AppError>;

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        Self::PersistenceFailed(value.to_string())
    }
}
impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(value: sqlx::migrate::MigrateError) -> Self {
        Self::PersistenceFailed(value.to_string())
    }
}
impl From<teloxide::RequestError> for AppError {
    fn from(value: teloxide::RequestError) -> Self {
        Self::UpstreamReplyFailed(value.to_string())
    }
}
