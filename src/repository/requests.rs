//! Loan request repository for database operations
//!
//! Line items are embedded in the request row as JSONB; a request owns its
//! items outright and they are read and written as one document.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, Pool, Postgres};

use super::RequestStore;
use crate::{
    error::{AppError, AppResult},
    models::request::{LoanRequest, LoanRequestItem, RequestStatus},
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

#[derive(FromRow)]
struct LoanRequestRow {
    id: String,
    username: String,
    status: RequestStatus,
    purpose: String,
    requested_at: DateTime<Utc>,
    return_date: Option<String>,
    items: Json<Vec<LoanRequestItem>>,
}

impl From<LoanRequestRow> for LoanRequest {
    fn from(row: LoanRequestRow) -> Self {
        LoanRequest {
            id: row.id,
            username: row.username,
            status: row.status,
            purpose: row.purpose,
            requested_at: row.requested_at,
            return_date: row.return_date,
            items: row.items.0,
        }
    }
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RequestStore for RequestsRepository {
    async fn save(&self, request: &LoanRequest) -> AppResult<LoanRequest> {
        let row = sqlx::query_as::<_, LoanRequestRow>(
            r#"
            INSERT INTO loan_requests
                (id, username, status, purpose, requested_at, return_date, items)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET username = EXCLUDED.username,
                status = EXCLUDED.status,
                purpose = EXCLUDED.purpose,
                requested_at = EXCLUDED.requested_at,
                return_date = EXCLUDED.return_date,
                items = EXCLUDED.items
            RETURNING *
            "#,
        )
        .bind(&request.id)
        .bind(&request.username)
        .bind(request.status)
        .bind(&request.purpose)
        .bind(request.requested_at)
        .bind(&request.return_date)
        .bind(Json(&request.items))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<LoanRequest> {
        sqlx::query_as::<_, LoanRequestRow>("SELECT * FROM loan_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("Loan request {} not found", id)))
    }

    async fn find_by_user(&self, username: &str) -> AppResult<Vec<LoanRequest>> {
        let rows = sqlx::query_as::<_, LoanRequestRow>(
            "SELECT * FROM loan_requests WHERE username = $1 ORDER BY requested_at DESC",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_all(&self) -> AppResult<Vec<LoanRequest>> {
        let rows = sqlx::query_as::<_, LoanRequestRow>(
            "SELECT * FROM loan_requests ORDER BY requested_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn exists(&self, id: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM loan_requests WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn delete_by_id(&self, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM loan_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Loan request {} not found", id)));
        }
        Ok(())
    }
}
