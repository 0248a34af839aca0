use crate::{models::PendingConversion, Result};

use super::{PendingStorage, Storage};

#[async_trait::async_trait]
impl PendingStorage for Storage {
    async fn set(&self, pending: PendingConversion) -> Result<()> {
        let query = "INSERT INTO pending_conversions(user_id, from_currency, to_currency, created_at) \
                     VALUES ($1, $2, $3, $4) \
                     ON CONFLICT (user_id) DO UPDATE SET from_currency = EXCLUDED.from_currency, \
                     to_currency = EXCLUDED.to_currency, created_at = EXCLUDED.created_at";
        sqlx::query(query)
            .bind(pending.user_id)
            .bind(&pending.from_currency)
            .bind(&pending.to_currency)
            .bind(pending.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
    async fn get(&self, user_id: i64) -> Result<Option<PendingConversion>> {
        let query = "SELECT * FROM pending_conversions WHERE user_id = $1";
        let pending = sqlx::query_as::<_, PendingConversion>(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pending)
    }
    async fn clear(&self, user_id: i64) -> Result<()> {
        let query = "DELETE FROM pending_conversions WHERE user_id = $1";
        sqlx::query(query).bind(user_id).execute(&self.pool).await?;
        Ok(())
    }
}
