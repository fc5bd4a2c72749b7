//! User repository
//!
//! Trainee and trainer registration insert their user row through
//! [`insert_user`] on the caller's transaction.

use sqlx::{PgConnection, PgPool};
use std::str::FromStr;

use core_kernel::UserId;
use domain_account::{NewUser, Role, User};

use crate::error::DatabaseError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub role: String,
}

impl UserRow {
    pub fn into_user(self) -> Result<User, DatabaseError> {
        let role = Role::from_str(&self.role).map_err(|e| DatabaseError::InvalidData(e.to_string()))?;
        Ok(User {
            id: UserId::new(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            password_hash: self.password_hash,
            is_active: self.is_active,
            role,
        })
    }
}

/// Escapes LIKE wildcards so a username prefix matches literally
pub(crate) fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Inserts a user row on an open connection or transaction
pub(crate) async fn insert_user(conn: &mut PgConnection, user: &NewUser) -> Result<UserRow, DatabaseError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (first_name, last_name, username, password_hash, is_active, role)
        VALUES ($1, $2, $3, $4, TRUE, $5)
        RETURNING id, first_name, last_name, username, password_hash, is_active, role
        "#,
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .fetch_one(conn)
    .await?;

    Ok(row)
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRow>, DatabaseError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, username, password_hash, is_active, role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn usernames_starting_with(&self, prefix: &str) -> Result<Vec<String>, DatabaseError> {
        let names = sqlx::query_scalar::<_, String>(
            r#"SELECT username FROM users WHERE username LIKE $1 ESCAPE '\'"#,
        )
        .bind(like_prefix(prefix))
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    pub async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("User", user_id));
        }
        Ok(())
    }
}
