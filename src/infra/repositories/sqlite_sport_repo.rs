use crate::domain::{models::venue::{Sport, VenueSport}, ports::SportRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteSportRepo {
    pool: SqlitePool,
}

impl SqliteSportRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SportRepository for SqliteSportRepo {
    async fn create(&self, sport: &Sport) -> Result<Sport, AppError> {
        sqlx::query_as::<_, Sport>(
            "INSERT INTO sports (id, name, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&sport.id)
            .bind(&sport.name)
            .bind(&sport.description)
            .bind(sport.created_at)
            .bind(sport.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Sport>, AppError> {
        sqlx::query_as::<_, Sport>("SELECT * FROM sports WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Sport>, AppError> {
        sqlx::query_as::<_, Sport>("SELECT * FROM sports ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, sport: &Sport) -> Result<Sport, AppError> {
        sqlx::query_as::<_, Sport>(
            "UPDATE sports SET name = ?, description = ?, updated_at = ? WHERE id = ? RETURNING *"
        )
            .bind(&sport.name)
            .bind(&sport.description)
            .bind(Utc::now())
            .bind(&sport.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Sport not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM sports WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Sport not found".into()));
        }
        Ok(())
    }

    async fn list_by_venue(&self, venue_id: &str) -> Result<Vec<Sport>, AppError> {
        sqlx::query_as::<_, Sport>(
            "SELECT s.* FROM sports s JOIN venue_sports vs ON vs.sport_id = s.id WHERE vs.venue_id = ? ORDER BY s.name ASC"
        )
            .bind(venue_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn link(&self, link: &VenueSport) -> Result<VenueSport, AppError> {
        // Re-linking returns the existing row untouched.
        sqlx::query_as::<_, VenueSport>(
            "INSERT INTO venue_sports (id, venue_id, sport_id, created_at) VALUES (?, ?, ?, ?)
             ON CONFLICT (venue_id, sport_id) DO UPDATE SET created_at = venue_sports.created_at
             RETURNING *"
        )
            .bind(&link.id)
            .bind(&link.venue_id)
            .bind(&link.sport_id)
            .bind(link.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn unlink(&self, venue_id: &str, sport_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM venue_sports WHERE venue_id = ? AND sport_id = ?")
            .bind(venue_id)
            .bind(sport_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Sport is not offered at this venue".into()));
        }
        Ok(())
    }
    async fn is_offered(&self, venue_id: &str, sport_id: &str) -> Result<bool, AppError> {
        let row: Option<String> = sqlx::query_scalar(
            "SELECT id FROM venue_sports WHERE venue_id = ? AND sport_id = ?"
        )
            .bind(venue_id)
            .bind(sport_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.is_some())
    }
}
