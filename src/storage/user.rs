use crate::{
    models::{User, UserProfile},
    Result,
};

use super::{Storage, UserStorage};

#[async_trait::async_trait]
impl UserStorage for Storage {
    async fn upsert(&self, profile: &UserProfile) -> Result<User> {
        let query = "INSERT INTO users(id, username, first_name, last_name) VALUES ($1, $2, $3, $4) \
                     ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username, \
                     first_name = EXCLUDED.first_name, last_name = EXCLUDED.last_name \
                     RETURNING *";
        let user = sqlx::query_as::<_, User>(query)
            .bind(profile.id)
            .bind(&profile.username)
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }
    async fn get_all(&self) -> Result<Vec<User>> {
        let query = "SELECT * FROM users ORDER BY join_date DESC";
        let users = sqlx::query_as::<_, User>(query)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}
