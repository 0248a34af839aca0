use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::converter::HOME;

use super::parser::{callback_data, MAIN_MENU};

const PAIR_SYMBOLS: [&str; 4] = ["TRX", "USDT", "DOGE", "BTC"];
const BACK: &str = "« Ana Menü";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub data: String,
}

/// Inline-клавиатура без привязки к типам teloxide
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// Кнопки «X TO TRY» и «TRY TO X» для каждой поддерживаемой валюты
    pub fn pairs() -> Self {
        let rows = PAIR_SYMBOLS
            .iter()
            .map(|symbol| {
                vec![
                    Button::pair(symbol, HOME),
                    Button::pair(HOME, symbol),
                ]
            })
            .collect();
        Self { rows }
    }
    pub fn back() -> Self {
        Self {
            rows: vec![vec![Button {
                text: String::from(BACK),
                data: String::from(MAIN_MENU),
            }]],
        }
    }
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

impl Button {
    fn pair(from: &str, to: &str) -> Self {
        Self {
            text: format!("{from} TO {to}"),
            data: callback_data(from, to),
        }
    }
}

impl From<Keyboard> for InlineKeyboardMarkup {
    fn from(value: Keyboard) -> Self {
        let rows = value
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|b| InlineKeyboardButton::callback(b.text, b.data))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        InlineKeyboardMarkup::new(rows)
    }
}
