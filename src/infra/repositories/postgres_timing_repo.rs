use crate::domain::{models::timing::VenueTiming, ports::VenueTimingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

const INSERT_SQL: &str =
    "INSERT INTO venue_timings (id, venue_id, day_of_week, start_time, end_time, is_morning, created_at, updated_at)
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)";

const INSERT_OR_SKIP_SQL: &str =
    "INSERT INTO venue_timings (id, venue_id, day_of_week, start_time, end_time, is_morning, created_at, updated_at)
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
     ON CONFLICT (venue_id, day_of_week, start_time) DO NOTHING";

pub struct PostgresTimingRepo {
    pool: PgPool,
}

impl PostgresTimingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// With `skip_existing`, rows clashing on (venue, day, start) are dropped instead of failing the batch.
    async fn insert_all(tx: &mut Transaction<'_, Postgres>, timings: &[VenueTiming], skip_existing: bool) -> Result<(), AppError> {
        let sql = if skip_existing { INSERT_OR_SKIP_SQL } else { INSERT_SQL };
        for timing in timings {
            sqlx::query(sql)
                .bind(&timing.id)
                .bind(&timing.venue_id)
                .bind(&timing.day_of_week)
                .bind(timing.start_time)
                .bind(timing.end_time)
                .bind(timing.is_morning)
                .bind(timing.created_at)
                .bind(timing.updated_at)
                .execute(&mut **tx)
                .await
                .map_err(AppError::Database)?;
        }
        Ok(())
    }
}

#[async_trait]
impl VenueTimingRepository for PostgresTimingRepo {
    async fn list_by_venue(&self, venue_id: &str) -> Result<Vec<VenueTiming>, AppError> {
        sqlx::query_as::<_, VenueTiming>(
            "SELECT * FROM venue_timings WHERE venue_id = $1 ORDER BY day_of_week ASC, start_time ASC"
        )
            .bind(venue_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_day(&self, venue_id: &str, day_of_week: &str) -> Result<Vec<VenueTiming>, AppError> {
        sqlx::query_as::<_, VenueTiming>(
            "SELECT * FROM venue_timings WHERE venue_id = $1 AND day_of_week = $2 ORDER BY start_time ASC"
        )
            .bind(venue_id)
            .bind(day_of_week)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn create_many(&self, timings: &[VenueTiming]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        Self::insert_all(&mut tx, timings, true).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn replace_for_venue(&self, venue_id: &str, timings: &[VenueTiming]) -> Result<Vec<VenueTiming>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM venue_timings WHERE venue_id = $1")
            .bind(venue_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        Self::insert_all(&mut tx, timings, false).await?;
        tx.commit().await.map_err(AppError::Database)?;

        self.list_by_venue(venue_id).await
    }
}
