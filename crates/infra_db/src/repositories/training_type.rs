//! Training type catalogue (read-only)

use sqlx::PgPool;

use domain_gym::TrainingType;

use crate::error::DatabaseError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrainingTypeRow {
    pub id: i64,
    pub name: String,
}

impl From<TrainingTypeRow> for TrainingType {
    fn from(row: TrainingTypeRow) -> Self {
        TrainingType::new(row.id, row.name)
    }
}

#[derive(Debug, Clone)]
pub struct TrainingTypeRepository {
    pool: PgPool,
}

impl TrainingTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<TrainingTypeRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, TrainingTypeRow>("SELECT id, name FROM training_types ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find(&self, id: i64) -> Result<Option<TrainingTypeRow>, DatabaseError> {
        let row = sqlx::query_as::<_, TrainingTypeRow>("SELECT id, name FROM training_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
