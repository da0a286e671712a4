use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::models::{Account, PreferenceRow, PreferenceUpdate};

use super::Store;

impl Store {
    pub async fn find_account_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, username, email, password_hash, created_at
             FROM accounts WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    pub async fn username_or_email_taken(&self, username: &str, email: &str) -> AppResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE username = ? OR email = ?)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    /// Insert a new account. A uniqueness race lost to a concurrent
    /// registration surfaces as `Conflict`, same as the pre-check.
    pub async fn insert_account(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> AppResult<Account> {
        let account = sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (username, email, password_hash, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING id, username, email, password_hash, created_at",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Username or email already registered".to_string())
            }
            _ => AppError::from(e),
        })?;

        Ok(account)
    }

    pub async fn get_preferences(&self, account_id: i64) -> AppResult<Option<PreferenceRow>> {
        let row = sqlx::query_as::<_, PreferenceRow>(
            "SELECT id, account_id, movie_name, book_name, place_name, age, gender, created_at
             FROM preferences WHERE account_id = ?",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Replace the account's preference row. Absent fields overwrite
    /// stored values with NULL rather than merging.
    pub async fn upsert_preferences(
        &self,
        account_id: i64,
        update: &PreferenceUpdate,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO preferences
                 (account_id, movie_name, book_name, place_name, age, gender, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(account_id) DO UPDATE SET
                 movie_name = excluded.movie_name,
                 book_name = excluded.book_name,
                 place_name = excluded.place_name,
                 age = excluded.age,
                 gender = excluded.gender",
        )
        .bind(account_id)
        .bind(update.movie_name.as_deref())
        .bind(update.book_name.as_deref())
        .bind(update.place_name.as_deref())
        .bind(update.age.as_deref())
        .bind(update.gender.as_deref())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
