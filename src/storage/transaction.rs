use tracing::info;

use crate::{
    models::{NewTransaction, Stats, Transaction, TransactionFilter, TransactionView},
    Result,
};

use super::{Storage, TransactionStorage};

#[async_trait::async_trait]
impl TransactionStorage for Storage {
    async fn record(&self, transaction: NewTransaction) -> Result<Transaction> {
        let id = transaction.id_or_generate();
        let query = "INSERT INTO transactions(id, user_id, from_currency, to_currency, from_amount, to_amount, chat_type) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) ON CONFLICT (id) DO NOTHING RETURNING *";
        let inserted = sqlx::query_as::<_, Transaction>(query)
            .bind(id)
            .bind(transaction.user_id)
            .bind(&transaction.from_currency)
            .bind(&transaction.to_currency)
            .bind(transaction.from_amount)
            .bind(transaction.to_amount)
            .bind(transaction.chat_type)
            .fetch_optional(&self.pool)
            .await?;
        if let Some(recorded) = inserted {
            return Ok(recorded);
        }
        info!("Транзакция {id} уже записана");
        let existing = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(existing)
    }
    async fn list(&self, filter: TransactionFilter) -> Result<Vec<TransactionView>> {
        let query = "SELECT t.*, u.username, u.first_name, u.last_name \
                     FROM transactions t LEFT JOIN users u ON u.id = t.user_id \
                     WHERE ($1::BIGINT IS NULL OR t.user_id = $1) \
                     AND ($2::chat_type IS NULL OR t.chat_type = $2) \
                     ORDER BY t.created_at DESC";
        let transactions = sqlx::query_as::<_, TransactionView>(query)
            .bind(filter.user_id)
            .bind(filter.chat_type)
            .fetch_all(&self.pool)
            .await?;
        Ok(transactions)
    }
    async fn stats(&self) -> Result<Stats> {
        let total_users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        let total_transactions = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;
        let query = "SELECT COUNT(*) FROM transactions \
                     WHERE created_at >= date_trunc('day', now() AT TIME ZONE 'UTC') AT TIME ZONE 'UTC'";
        let daily_transactions = sqlx::query_scalar::<_, i64>(query)
            .fetch_one(&self.pool)
            .await?;
        Ok(Stats {
            total_users,
            total_transactions,
            daily_transactions,
        })
    }
}
