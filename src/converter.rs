use crate::{models::RateTable, AppError, Result};

/// Базовая валюта, к которой привязаны все курсы
pub const HOME: &str = "TRY";

/// Пересчитывает сумму через лиру.
///
/// TRY -> X делит на курс X, X -> TRY умножает на курс X,
/// X -> Y сначала переводит X в лиры, затем лиры в Y.
pub fn convert(from: &str, to: &str, amount: f64, rates: &RateTable) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::InvalidAmount);
    }
    let from = from.to_uppercase();
    let to = to.to_uppercase();
    match (from == HOME, to == HOME) {
        (true, true) => Ok(amount),
        (true, false) => Ok(amount / rate(&to, rates)?),
        (false, true) => Ok(amount * rate(&from, rates)?),
        (false, false) => {
            let home_amount = amount * rate(&from, rates)?;
            Ok(home_amount / rate(&to, rates)?)
        }
    }
}

fn rate(currency: &str, rates: &RateTable) -> Result<f64> {
    rates
        .get(currency)
        .filter(|r| r.is_finite() && *r > 0.0)
        .ok_or_else(|| AppError::UnknownCurrency(currency.to_string()))
}

/// Сумма в лирах выводится с 2 знаками, во всех остальных валютах с 8
pub fn format_amount(amount: f64, currency: &str) -> String {
    if currency.eq_ignore_ascii_case(HOME) {
        format!("{amount:.2} {currency}")
    } else {
        format!("{amount:.8} {currency}")
    }
}

/// Исходная сумма выводится так, как её ввели: `1000`, `12.5`
pub fn format_input(amount: f64, currency: &str) -> String {
    format!("{amount} {currency}")
}
