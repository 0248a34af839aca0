use teloxide::types::{CallbackQuery, Message, Update, UpdateKind};

use crate::models::{ChatType, UserProfile};

/// Входящее событие от Telegram, сведённое к тому, что умеет обрабатывать бот
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Message(IncomingMessage),
    Callback(IncomingCallback),
    Unsupported,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomingMessage {
    /// id события Telegram, одинаковый при повторной доставке
    pub update_id: u32,
    pub chat_id: i64,
    pub message_id: i32,
    pub chat_type: ChatType,
    pub sender: UserProfile,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomingCallback {
    pub chat_id: i64,
    pub sender: UserProfile,
    pub data: String,
}

impl From<Update> for Inbound {
    fn from(update: Update) -> Self {
        let update_id = update.id.0;
        match update.kind {
            UpdateKind::Message(msg) => from_message(update_id, &msg),
            UpdateKind::CallbackQuery(q) => from_callback(&q),
            _ => Inbound::Unsupported,
        }
    }
}

fn from_message(update_id: u32, msg: &Message) -> Inbound {
    let (Some(chat_type), Some(sender), Some(text)) = (
        ChatType::from_chat(&msg.chat),
        msg.from.as_ref(),
        msg.text(),
    ) else {
        return Inbound::Unsupported;
    };
    Inbound::Message(IncomingMessage {
        update_id,
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
        chat_type,
        sender: UserProfile::from(sender),
        text: text.to_string(),
    })
}

fn from_callback(q: &CallbackQuery) -> Inbound {
    let Some(data) = q.data.clone() else {
        return Inbound::Unsupported;
    };
    let sender = UserProfile::from(&q.from);
    // без исходного сообщения отвечаем в личку
    let chat_id = match q.regular_message() {
        Some(msg) if ChatType::from_chat(&msg.chat).is_none() => return Inbound::Unsupported,
        Some(msg) => msg.chat.id.0,
        None => sender.id,
    };
    Inbound::Callback(IncomingCallback {
        chat_id,
        sender,
        data,
    })
}
