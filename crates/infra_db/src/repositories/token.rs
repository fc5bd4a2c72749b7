//! Session token repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::str::FromStr;

use core_kernel::{TokenId, UserId};
use domain_account::{NewToken, StoredToken, TokenType};

use crate::error::DatabaseError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TokenRow {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub token_type: String,
    pub revoked: bool,
    pub expires_at: DateTime<Utc>,
}

impl TokenRow {
    pub fn into_token(self) -> Result<StoredToken, DatabaseError> {
        let token_type = TokenType::from_str(&self.token_type)
            .map_err(|e| DatabaseError::InvalidData(e.to_string()))?;
        Ok(StoredToken {
            id: TokenId::new(self.id),
            user_id: UserId::new(self.user_id),
            token: self.token,
            token_type,
            revoked: self.revoked,
            expires_at: self.expires_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, token: &NewToken) -> Result<TokenRow, DatabaseError> {
        let row = sqlx::query_as::<_, TokenRow>(
            r#"
            INSERT INTO tokens (user_id, token, token_type, revoked, expires_at)
            VALUES ($1, $2, $3, FALSE, $4)
            RETURNING id, user_id, token, token_type, revoked, expires_at
            "#,
        )
        .bind(token.user_id.value())
        .bind(&token.token)
        .bind(token.token_type.as_str())
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn find(&self, token: &str) -> Result<Option<TokenRow>, DatabaseError> {
        let row = sqlx::query_as::<_, TokenRow>(
            r#"
            SELECT id, user_id, token, token_type, revoked, expires_at
            FROM tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn active_for_user(&self, user_id: i64, now: DateTime<Utc>) -> Result<Vec<TokenRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, TokenRow>(
            r#"
            SELECT id, user_id, token, token_type, revoked, expires_at
            FROM tokens
            WHERE user_id = $1 AND NOT revoked AND expires_at > $2
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Revokes every live token of the user, returning how many changed
    pub async fn revoke_all_for_user(&self, user_id: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("UPDATE tokens SET revoked = TRUE WHERE user_id = $1 AND NOT revoked")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes the user's revoked or expired tokens
    pub async fn delete_inactive_for_user(&self, user_id: i64, now: DateTime<Utc>) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM tokens WHERE user_id = $1 AND (revoked OR expires_at <= $2)")
            .bind(user_id)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
