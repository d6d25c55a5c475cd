use crate::domain::{models::pricing::VenuePricing, ports::VenuePricingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePricingRepo {
    pool: SqlitePool,
}

impl SqlitePricingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VenuePricingRepository for SqlitePricingRepo {
    async fn list_by_venue(&self, venue_id: &str) -> Result<Vec<VenuePricing>, AppError> {
        sqlx::query_as::<_, VenuePricing>("SELECT * FROM venue_pricing WHERE venue_id = ? ORDER BY created_at ASC")
            .bind(venue_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn create_many(&self, rules: &[VenuePricing]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        for rule in rules {
            sqlx::query(
                "INSERT INTO venue_pricing (id, venue_id, day_group, is_morning, time_range, price, per_duration, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT (venue_id, day_group, is_morning, time_range) DO NOTHING"
            )
                .bind(&rule.id)
                .bind(&rule.venue_id)
                .bind(&rule.day_group)
                .bind(rule.is_morning)
                .bind(&rule.time_range)
                .bind(rule.price)
                .bind(&rule.per_duration)
                .bind(rule.created_at)
                .bind(rule.updated_at)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
