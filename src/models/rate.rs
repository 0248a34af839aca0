use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Курс одной валюты к лире
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
    pub id: i32,
    pub currency: String,
    pub try_rate: f64,
    pub last_updated: DateTime<Utc>,
}

/// Тело запроса на изменение курса
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateUpdate {
    pub try_rate: f64,
}

impl RateUpdate {
    pub fn is_valid(&self) -> bool {
        self.try_rate.is_finite() && self.try_rate > 0.0
    }
}

/// Снимок таблицы курсов: символ -> стоимость одной единицы в TRY
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable(HashMap<String, f64>);

impl RateTable {
    pub fn get(&self, currency: &str) -> Option<f64> {
        self.0.get(&currency.to_uppercase()).copied()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for RateTable {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(c, r)| (c.into().to_uppercase(), r))
                .collect(),
        )
    }
}

impl From<&[Rate]> for RateTable {
    fn from(rates: &[Rate]) -> Self {
        rates
            .iter()
            .map(|r| (r.currency.clone(), r.try_rate))
            .collect()
    }
}
