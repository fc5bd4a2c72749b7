//! Trainer repository

use sqlx::PgPool;
use std::str::FromStr;

use core_kernel::{TrainerId, UserId};
use domain_account::{Role, User};
use domain_gym::{NewTrainerRecord, Trainer, TrainerUpdate, TrainingType};

use crate::error::DatabaseError;
use crate::repositories::trainee::TraineeRow;
use crate::repositories::user::insert_user;

/// Trainer joined with its user and specialization
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrainerRow {
    pub trainer_id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub role: String,
    pub specialization_id: i64,
    pub specialization_name: String,
}

impl TrainerRow {
    pub fn into_trainer(self) -> Result<Trainer, DatabaseError> {
        let role = Role::from_str(&self.role).map_err(|e| DatabaseError::InvalidData(e.to_string()))?;
        Ok(Trainer {
            id: TrainerId::new(self.trainer_id),
            user: User {
                id: UserId::new(self.user_id),
                first_name: self.first_name,
                last_name: self.last_name,
                username: self.username,
                password_hash: self.password_hash,
                is_active: self.is_active,
                role,
            },
            specialization: TrainingType::new(self.specialization_id, self.specialization_name),
        })
    }
}

const TRAINER_SELECT: &str = r#"
    SELECT r.id AS trainer_id, u.id AS user_id, u.first_name, u.last_name, u.username,
           u.password_hash, u.is_active, u.role,
           tt.id AS specialization_id, tt.name AS specialization_name
    FROM trainers r
    JOIN users u ON u.id = r.user_id
    JOIN training_types tt ON tt.id = r.specialization_id
"#;

#[derive(Debug, Clone)]
pub struct TrainerRepository {
    pool: PgPool,
}

impl TrainerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the user and trainer rows in one transaction
    pub async fn create(&self, record: &NewTrainerRecord) -> Result<i64, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let user = insert_user(&mut tx, &record.user).await?;
        let trainer_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO trainers (user_id, specialization_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(user.id)
        .bind(record.specialization_id.value())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(trainer_id)
    }

    pub async fn find_by_id(&self, trainer_id: i64) -> Result<Option<TrainerRow>, DatabaseError> {
        let sql = format!("{} WHERE r.id = $1", TRAINER_SELECT);
        let row = sqlx::query_as::<_, TrainerRow>(&sql)
            .bind(trainer_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<TrainerRow>, DatabaseError> {
        let sql = format!("{} WHERE u.username = $1", TRAINER_SELECT);
        let row = sqlx::query_as::<_, TrainerRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_by_usernames(&self, usernames: &[String]) -> Result<Vec<TrainerRow>, DatabaseError> {
        let sql = format!("{} WHERE u.username = ANY($1) ORDER BY r.id", TRAINER_SELECT);
        let rows = sqlx::query_as::<_, TrainerRow>(&sql)
            .bind(usernames)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Updates names and activation; returns `None` when no trainer has the username
    pub async fn update(&self, update: &TrainerUpdate) -> Result<Option<TrainerRow>, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE users u
            SET first_name = $2, last_name = $3, is_active = $4
            FROM trainers r
            WHERE r.user_id = u.id AND u.username = $1
            "#,
        )
        .bind(&update.username)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(update.is_active)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_username(&update.username).await
    }

    pub async fn set_active(&self, username: &str, is_active: bool) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE users u SET is_active = $2
            FROM trainers r
            WHERE r.user_id = u.id AND u.username = $1
            "#,
        )
        .bind(username)
        .bind(is_active)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn trainees_of(&self, trainer_id: i64) -> Result<Vec<TraineeRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, TraineeRow>(
            r#"
            SELECT t.id AS trainee_id, u.id AS user_id, u.first_name, u.last_name, u.username,
                   u.password_hash, u.is_active, u.role, t.date_of_birth, t.address
            FROM trainee_trainer tt
            JOIN trainees t ON t.id = tt.trainee_id
            JOIN users u ON u.id = t.user_id
            WHERE tt.trainer_id = $1
            ORDER BY t.id
            "#,
        )
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Active trainers with no link to the trainee
    pub async fn unassigned_active(&self, trainee_id: i64) -> Result<Vec<TrainerRow>, DatabaseError> {
        let sql = format!(
            r#"{} WHERE u.is_active
                 AND NOT EXISTS (
                     SELECT 1 FROM trainee_trainer link
                     WHERE link.trainer_id = r.id AND link.trainee_id = $1
                 )
               ORDER BY r.id"#,
            TRAINER_SELECT
        );
        let rows = sqlx::query_as::<_, TrainerRow>(&sql)
            .bind(trainee_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
