use crate::{
    models::{Rate, RateTable},
    AppError, Result,
};

use super::{RateStorage, Storage};

#[async_trait::async_trait]
impl RateStorage for Storage {
    async fn get_all(&self) -> Result<Vec<Rate>> {
        let query = "SELECT * FROM rates ORDER BY currency";
        let rates = sqlx::query_as::<_, Rate>(query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rates)
    }
    async fn table(&self) -> Result<RateTable> {
        let query = "SELECT currency, try_rate FROM rates";
        let rows = sqlx::query_as::<_, (String, f64)>(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::RateLookupFailed(e.to_string()))?;
        Ok(rows.into_iter().collect())
    }
    async fn update(&self, id: i32, try_rate: f64) -> Result<Option<Rate>> {
        let query =
            "UPDATE rates SET try_rate = $1, last_updated = now() WHERE id = $2 RETURNING *";
        let rate = sqlx::query_as::<_, Rate>(query)
            .bind(try_rate)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        if let Some(r) = &rate {
            tracing::info!("Курс {} обновлён: {}", r.currency, r.try_rate);
        }
        Ok(rate)
    }
}
