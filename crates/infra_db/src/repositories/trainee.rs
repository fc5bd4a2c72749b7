//! Trainee repository
//!
//! Deleting a trainee deletes its user row; the schema cascades that to the
//! trainee row, trainer links, trainings and tokens.

use chrono::NaiveDate;
use sqlx::PgPool;
use std::str::FromStr;

use core_kernel::{TraineeId, UserId};
use domain_account::{Role, User};
use domain_gym::{NewTraineeRecord, Trainee, TraineeUpdate};

use crate::error::DatabaseError;
use crate::repositories::trainer::TrainerRow;
use crate::repositories::user::insert_user;

/// Trainee joined with its user
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TraineeRow {
    pub trainee_id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub role: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl TraineeRow {
    pub fn into_trainee(self) -> Result<Trainee, DatabaseError> {
        let role = Role::from_str(&self.role).map_err(|e| DatabaseError::InvalidData(e.to_string()))?;
        Ok(Trainee {
            id: TraineeId::new(self.trainee_id),
            user: User {
                id: UserId::new(self.user_id),
                first_name: self.first_name,
                last_name: self.last_name,
                username: self.username,
                password_hash: self.password_hash,
                is_active: self.is_active,
                role,
            },
            date_of_birth: self.date_of_birth,
            address: self.address,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TraineeRepository {
    pool: PgPool,
}

impl TraineeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the user and trainee rows in one transaction
    pub async fn create(&self, record: &NewTraineeRecord) -> Result<i64, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let user = insert_user(&mut tx, &record.user).await?;
        let trainee_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO trainees (user_id, date_of_birth, address) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(user.id)
        .bind(record.date_of_birth)
        .bind(&record.address)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(trainee_id)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<TraineeRow>, DatabaseError> {
        let row = sqlx::query_as::<_, TraineeRow>(
            r#"
            SELECT t.id AS trainee_id, u.id AS user_id, u.first_name, u.last_name, u.username,
                   u.password_hash, u.is_active, u.role, t.date_of_birth, t.address
            FROM trainees t
            JOIN users u ON u.id = t.user_id
            WHERE u.username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Updates user and trainee columns together
    pub async fn update(&self, update: &TraineeUpdate) -> Result<Option<TraineeRow>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let user_id = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE users u
            SET first_name = $2, last_name = $3, is_active = $4
            FROM trainees t
            WHERE t.user_id = u.id AND u.username = $1
            RETURNING u.id
            "#,
        )
        .bind(&update.username)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(update.is_active)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user_id) = user_id else {
            return Ok(None);
        };

        sqlx::query("UPDATE trainees SET date_of_birth = $2, address = $3 WHERE user_id = $1")
            .bind(user_id)
            .bind(update.date_of_birth)
            .bind(&update.address)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.find_by_username(&update.username).await
    }

    pub async fn set_active(&self, username: &str, is_active: bool) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE users u SET is_active = $2
            FROM trainees t
            WHERE t.user_id = u.id AND u.username = $1
            "#,
        )
        .bind(username)
        .bind(is_active)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, username: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users u
            USING trainees t
            WHERE t.user_id = u.id AND u.username = $1
            "#,
        )
        .bind(username)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn trainers_of(&self, trainee_id: i64) -> Result<Vec<TrainerRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, TrainerRow>(
            r#"
            SELECT r.id AS trainer_id, u.id AS user_id, u.first_name, u.last_name, u.username,
                   u.password_hash, u.is_active, u.role,
                   tt.id AS specialization_id, tt.name AS specialization_name
            FROM trainee_trainer link
            JOIN trainers r ON r.id = link.trainer_id
            JOIN users u ON u.id = r.user_id
            JOIN training_types tt ON tt.id = r.specialization_id
            WHERE link.trainee_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(trainee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Replaces every trainer link of the trainee
    pub async fn replace_trainers(&self, trainee_id: i64, trainer_ids: &[i64]) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM trainees WHERE id = $1 FOR UPDATE")
            .bind(trainee_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(DatabaseError::not_found("Trainee", trainee_id));
        }

        sqlx::query("DELETE FROM trainee_trainer WHERE trainee_id = $1")
            .bind(trainee_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            r#"
            INSERT INTO trainee_trainer (trainee_id, trainer_id)
            SELECT $1, trainer_id FROM UNNEST($2::BIGINT[]) AS trainer_id
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(trainee_id)
        .bind(trainer_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
