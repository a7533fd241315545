//! Equipment repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::EquipmentStore;
use crate::{
    error::{AppError, AppResult},
    models::equipment::{Equipment, EquipmentFilter},
};

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquipmentStore for EquipmentRepository {
    async fn list(&self, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, Equipment>(
            r#"
            SELECT * FROM equipment
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::boolean IS NULL OR is_available = $2)
            ORDER BY name
            "#,
        )
        .bind(filter.category.map(|c| c.as_str()))
        .bind(filter.available)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    async fn exists(&self, id: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM equipment WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn insert(&self, equipment: &Equipment) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment
                (id, name, category, description, total_quantity, available_quantity,
                 condition, is_available, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&equipment.id)
        .bind(&equipment.name)
        .bind(equipment.category)
        .bind(&equipment.description)
        .bind(equipment.total_quantity)
        .bind(equipment.available_quantity)
        .bind(equipment.condition)
        .bind(equipment.is_available)
        .bind(&equipment.image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn replace(&self, equipment: &Equipment) -> AppResult<Equipment> {
        // Explicit field-by-field write; the update contract stays auditable.
        sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment
            SET name = $2, category = $3, description = $4, total_quantity = $5,
                available_quantity = $6, condition = $7, is_available = $8, image_url = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(&equipment.id)
        .bind(&equipment.name)
        .bind(equipment.category)
        .bind(&equipment.description)
        .bind(equipment.total_quantity)
        .bind(equipment.available_quantity)
        .bind(equipment.condition)
        .bind(equipment.is_available)
        .bind(&equipment.image_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", equipment.id)))
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    async fn apply_delta(&self, id: &str, delta: i32) -> AppResult<i32> {
        // Single conditional update so two racing reservations can never both
        // take the last unit. Restoration is capped at total_quantity.
        let row = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE equipment
            SET available_quantity = LEAST(available_quantity + $2, total_quantity),
                is_available = LEAST(available_quantity + $2, total_quantity) > 0
            WHERE id = $1 AND available_quantity + $2 >= 0
            RETURNING available_quantity
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(available) => Ok(available),
            None => {
                if self.exists(id).await? {
                    Err(AppError::InsufficientStock(format!(
                        "Not enough available stock for equipment {}",
                        id
                    )))
                } else {
                    Err(AppError::NotFound(format!("Equipment {} not found", id)))
                }
            }
        }
    }
}
