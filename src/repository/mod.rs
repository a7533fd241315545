//! Persistence layer.
//!
//! The services talk to storage through the [`EquipmentStore`] and
//! [`RequestStore`] traits; [`Repository`] wires up the Postgres
//! implementations. Business rules never live here.

pub mod equipment;
#[cfg(test)]
pub mod memory;
pub mod requests;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        equipment::{Equipment, EquipmentFilter},
        request::LoanRequest,
    },
};

/// Equipment catalog storage contract.
///
/// `apply_delta` is the sole mutation path for `available_quantity` and must
/// be a single atomic read-modify-write against the backing store. Callers
/// never read-then-write the counter themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentStore: Send + Sync {
    async fn list(&self, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>>;

    async fn get_by_id(&self, id: &str) -> AppResult<Equipment>;

    async fn exists(&self, id: &str) -> AppResult<bool>;

    async fn insert(&self, equipment: &Equipment) -> AppResult<Equipment>;

    async fn replace(&self, equipment: &Equipment) -> AppResult<Equipment>;

    async fn delete(&self, id: &str) -> AppResult<()>;

    /// Atomically add `delta` to the available quantity of `id` and return
    /// the new value.
    ///
    /// A negative delta (reservation) fails with `InsufficientStock` rather
    /// than ever leaving the count below zero. A positive delta
    /// (restoration) is capped at `total_quantity` so a double restoration
    /// cannot overflow the pool. `is_available` is rederived in the same
    /// write.
    async fn apply_delta(&self, id: &str, delta: i32) -> AppResult<i32>;
}

/// Loan request storage contract. Pure persistence, no rule enforcement.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Insert if the id is new, otherwise replace the whole document
    async fn save(&self, request: &LoanRequest) -> AppResult<LoanRequest>;

    async fn find_by_id(&self, id: &str) -> AppResult<LoanRequest>;

    async fn find_by_user(&self, username: &str) -> AppResult<Vec<LoanRequest>>;

    async fn find_all(&self) -> AppResult<Vec<LoanRequest>>;

    async fn exists(&self, id: &str) -> AppResult<bool>;

    async fn delete_by_id(&self, id: &str) -> AppResult<()>;
}

/// Postgres-backed repository bundle
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub equipment: equipment::EquipmentRepository,
    pub requests: requests::RequestsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            requests: requests::RequestsRepository::new(pool.clone()),
            pool,
        }
    }
}
