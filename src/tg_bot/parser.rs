use std::sync::LazyLock;

use regex::Regex;

use crate::{AppError, Result};

static CONVERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+(?:[.,]\d+)?)\s+(\w+)\s+to\s+(\w+)$").expect("valid conversion regex")
});
static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:[.,]\d+)?$").expect("valid amount regex"));

pub const MAIN_MENU: &str = "main_menu";
const CONVERT_PREFIX: &str = "convert_";

/// Запрос вида `100 TRY to BTC`
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

/// Нажатая inline-кнопка
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    MainMenu,
    SelectPair { from: String, to: String },
}

pub fn parse(text: &str) -> Result<ConversionRequest> {
    let captures = CONVERSION.captures(text.trim()).ok_or(AppError::NoMatch)?;
    let amount = parse_number(&captures[1])?;
    Ok(ConversionRequest {
        amount,
        from: captures[2].to_uppercase(),
        to: captures[3].to_uppercase(),
    })
}

/// Голое число, которым пользователь отвечает после выбора пары
pub fn parse_amount(text: &str) -> Result<f64> {
    let text = text.trim();
    if !AMOUNT.is_match(text) {
        return Err(AppError::NoMatch);
    }
    parse_number(text)
}

pub fn parse_callback(data: &str) -> Result<CallbackAction> {
    if data == MAIN_MENU {
        return Ok(CallbackAction::MainMenu);
    }
    let pair = data.strip_prefix(CONVERT_PREFIX).ok_or(AppError::NoMatch)?;
    match pair.split('_').collect::<Vec<_>>().as_slice() {
        [from, to] if !from.is_empty() && !to.is_empty() => Ok(CallbackAction::SelectPair {
            from: from.to_uppercase(),
            to: to.to_uppercase(),
        }),
        _ => Err(AppError::NoMatch),
    }
}

pub fn callback_data(from: &str, to: &str) -> String {
    format!("{CONVERT_PREFIX}{from}_{to}")
}

fn parse_number(raw: &str) -> Result<f64> {
    let amount = raw
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| AppError::InvalidAmount)?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::InvalidAmount);
    }
    Ok(amount)
}
