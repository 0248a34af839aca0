mod pending;
mod rate;
mod transaction;
mod user;
pub use pending::*;
pub use rate::*;
pub use transaction::*;
pub use user::*;

use std::sync::Arc;

use crate::storage::{RateStorage, TransactionStorage, UserStorage};
use crate::tg_bot::{ChatClient, Dispatcher};

/// Общие данные для обработчиков
#[derive(Clone)]
pub struct AppState {
    pub rate_storage: Arc<dyn RateStorage>,
    pub transaction_storage: Arc<dyn TransactionStorage>,
    pub user_storage: Arc<dyn UserStorage>,
    pub dispatcher: Arc<Dispatcher>,
    pub chat: Arc<dyn ChatClient>,
    pub webhook_url: Option<String>,
}
