//! Training repository
//!
//! Queries filter in SQL; absent optional filters are bound as NULL and
//! short-circuit their predicate.

use chrono::NaiveDate;
use sqlx::PgPool;

use core_kernel::TrainingId;
use domain_gym::{
    NewTrainingRecord, Participant, TraineeTrainingQuery, Training, TrainerTrainingQuery,
    TrainingType,
};

use crate::error::DatabaseError;

/// Training joined with both participants and its type
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrainingRow {
    pub id: i64,
    pub trainee_username: String,
    pub trainee_first_name: String,
    pub trainee_last_name: String,
    pub trainer_username: String,
    pub trainer_first_name: String,
    pub trainer_last_name: String,
    pub training_name: String,
    pub training_type_id: i64,
    pub training_type_name: String,
    pub training_date: NaiveDate,
    pub training_duration: i32,
}

impl From<TrainingRow> for Training {
    fn from(row: TrainingRow) -> Self {
        Training {
            id: TrainingId::new(row.id),
            trainee: Participant {
                username: row.trainee_username,
                first_name: row.trainee_first_name,
                last_name: row.trainee_last_name,
            },
            trainer: Participant {
                username: row.trainer_username,
                first_name: row.trainer_first_name,
                last_name: row.trainer_last_name,
            },
            name: row.training_name,
            training_type: TrainingType::new(row.training_type_id, row.training_type_name),
            date: row.training_date,
            duration: row.training_duration,
        }
    }
}

const TRAINING_SELECT: &str = r#"
    SELECT tr.id,
           eu.username AS trainee_username, eu.first_name AS trainee_first_name,
           eu.last_name AS trainee_last_name,
           ru.username AS trainer_username, ru.first_name AS trainer_first_name,
           ru.last_name AS trainer_last_name,
           tr.training_name, tt.id AS training_type_id, tt.name AS training_type_name,
           tr.training_date, tr.training_duration
    FROM trainings tr
    JOIN trainees e ON e.id = tr.trainee_id
    JOIN users eu ON eu.id = e.user_id
    JOIN trainers r ON r.id = tr.trainer_id
    JOIN users ru ON ru.id = r.user_id
    JOIN training_types tt ON tt.id = tr.training_type_id
"#;

#[derive(Debug, Clone)]
pub struct TrainingRepository {
    pool: PgPool,
}

impl TrainingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, record: &NewTrainingRecord) -> Result<i64, DatabaseError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO trainings
                (trainee_id, trainer_id, training_name, training_type_id, training_date, training_duration)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(record.trainee_id.value())
        .bind(record.trainer_id.value())
        .bind(&record.name)
        .bind(record.training_type_id.value())
        .bind(record.date)
        .bind(record.duration)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn find(&self, id: i64) -> Result<Option<TrainingRow>, DatabaseError> {
        let sql = format!("{} WHERE tr.id = $1", TRAINING_SELECT);
        let row = sqlx::query_as::<_, TrainingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM trainings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn for_trainee(&self, query: &TraineeTrainingQuery) -> Result<Vec<TrainingRow>, DatabaseError> {
        let sql = format!(
            r#"{} WHERE eu.username = $1
                 AND ($2::DATE IS NULL OR tr.training_date >= $2)
                 AND ($3::DATE IS NULL OR tr.training_date <= $3)
                 AND ($4::TEXT IS NULL OR ru.username = $4)
                 AND ($5::TEXT IS NULL OR LOWER(tt.name) = LOWER($5))
               ORDER BY tr.training_date, tr.id"#,
            TRAINING_SELECT
        );
        let rows = sqlx::query_as::<_, TrainingRow>(&sql)
            .bind(&query.trainee_username)
            .bind(query.period.from())
            .bind(query.period.to())
            .bind(query.trainer_username.as_deref())
            .bind(query.training_type.as_deref().map(str::trim))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn for_trainer(&self, query: &TrainerTrainingQuery) -> Result<Vec<TrainingRow>, DatabaseError> {
        let sql = format!(
            r#"{} WHERE ru.username = $1
                 AND ($2::DATE IS NULL OR tr.training_date >= $2)
                 AND ($3::DATE IS NULL OR tr.training_date <= $3)
                 AND ($4::TEXT IS NULL OR eu.username = $4)
               ORDER BY tr.training_date, tr.id"#,
            TRAINING_SELECT
        );
        let rows = sqlx::query_as::<_, TrainingRow>(&sql)
            .bind(&query.trainer_username)
            .bind(query.period.from())
            .bind(query.period.to())
            .bind(query.trainee_username.as_deref())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
