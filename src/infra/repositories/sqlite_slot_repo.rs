use crate::domain::{models::slot::Slot, ports::SlotRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

pub struct SqliteSlotRepo {
    pool: SqlitePool,
}

impl SqliteSlotRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotRepository for SqliteSlotRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Slot>, AppError> {
        sqlx::query_as::<_, Slot>("SELECT * FROM slots WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_day(&self, venue_id: &str, sport_id: &str, date: NaiveDate) -> Result<Vec<Slot>, AppError> {
        sqlx::query_as::<_, Slot>(
            "SELECT * FROM slots WHERE venue_id = ? AND sport_id = ? AND date = ? ORDER BY start_time ASC"
        )
            .bind(venue_id)
            .bind(sport_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn insert_batch(&self, slots: &[Slot]) -> Result<Vec<Slot>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut inserted = Vec::with_capacity(slots.len());

        for slot in slots {
            let row = sqlx::query_as::<_, Slot>(
                "INSERT INTO slots (id, venue_id, sport_id, date, start_time, end_time, price, available, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT (venue_id, sport_id, date, start_time) DO NOTHING
                 RETURNING *"
            )
                .bind(&slot.id)
                .bind(&slot.venue_id)
                .bind(&slot.sport_id)
                .bind(slot.date)
                .bind(slot.start_time)
                .bind(slot.end_time)
                .bind(slot.price)
                .bind(slot.available)
                .bind(slot.created_at)
                .bind(slot.updated_at)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            inserted.extend(row);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(inserted)
    }

    async fn set_available(&self, id: &str, available: bool) -> Result<Option<Slot>, AppError> {
        sqlx::query_as::<_, Slot>("UPDATE slots SET available = ?, updated_at = ? WHERE id = ? RETURNING *")
            .bind(available)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn claim(&self, id: &str) -> Result<Option<Slot>, AppError> {
        sqlx::query_as::<_, Slot>(
            "UPDATE slots SET available = ?, updated_at = ? WHERE id = ? AND available = ? RETURNING *"
        )
            .bind(false)
            .bind(Utc::now())
            .bind(id)
            .bind(true)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
