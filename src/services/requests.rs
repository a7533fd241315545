//! Loan request lifecycle engine.
//!
//! Drives the PENDING / APPROVED / DENIED / RETURN_REQUESTED / RETURNED
//! state machine and keeps equipment availability consistent with the set of
//! in-flight requests. Stock is reserved when a request is created
//! (optimistic hold) and handed back when it is denied, returned, or deleted
//! while still pending.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::request::{CreateLoanRequest, LoanRequest, LoanRequestItem, RequestStatus},
    repository::{EquipmentStore, RequestStore},
};

/// How many fresh ids we try before giving up on a collision streak
const MAX_ID_ATTEMPTS: u32 = 4;

#[derive(Clone)]
pub struct RequestsService {
    equipment: Arc<dyn EquipmentStore>,
    requests: Arc<dyn RequestStore>,
}

impl RequestsService {
    pub fn new(equipment: Arc<dyn EquipmentStore>, requests: Arc<dyn RequestStore>) -> Self {
        Self { equipment, requests }
    }

    /// Create a new loan request for `username`, reserving stock for every
    /// line item.
    ///
    /// Reservations across several equipment ids are not atomic as a set; if
    /// one fails, the ones already taken are rolled back before the error is
    /// surfaced.
    pub async fn create(&self, username: &str, data: CreateLoanRequest) -> AppResult<LoanRequest> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        for item in &data.items {
            if item.requested_quantity <= 0 {
                return Err(AppError::Validation(format!(
                    "Requested quantity for equipment {} must be positive",
                    item.equipment_id
                )));
            }
        }

        tracing::info!(username = %username, items = data.items.len(), "Creating loan request");

        // Pre-check so the common failure carries the equipment name; the
        // reservation below remains the authoritative stock check.
        for item in &data.items {
            let equipment = self.equipment.get_by_id(&item.equipment_id).await?;
            if item.requested_quantity > equipment.available_quantity {
                return Err(AppError::InsufficientStock(format!(
                    "Requested quantity exceeds available stock for {}",
                    equipment.name
                )));
            }
        }

        self.reserve_items(&data.items).await?;

        let id = match self.fresh_id().await {
            Ok(id) => id,
            Err(err) => {
                self.restore_items(&data.items).await;
                return Err(err);
            }
        };

        let request = LoanRequest {
            id,
            username: username.to_string(),
            status: RequestStatus::Pending,
            purpose: data.purpose,
            requested_at: Utc::now(),
            return_date: data.return_date,
            items: data.items,
        };

        match self.requests.save(&request).await {
            Ok(saved) => Ok(saved),
            Err(err) => {
                // The hold was taken but the request never came into
                // existence; hand the stock back before failing.
                self.restore_items(&request.items).await;
                Err(err)
            }
        }
    }

    /// Move a request to `target`, enforcing the transition graph.
    ///
    /// Entering DENIED or RETURNED restores the reserved quantities
    /// best-effort: an item whose equipment was deleted in the interim is
    /// skipped with a warning rather than failing the transition.
    pub async fn transition(&self, id: &str, target: RequestStatus) -> AppResult<LoanRequest> {
        let mut request = self.requests.find_by_id(id).await?;

        if !request.status.can_transition(target) {
            return Err(AppError::InvalidTransition {
                from: request.status,
                target,
            });
        }

        tracing::info!(request_id = %id, from = %request.status, to = %target, "Transitioning loan request");

        // Persist the status first: if the save fails the hold stays fully
        // intact, and a retried deny/return cannot restore twice.
        request.status = target;
        let saved = self.requests.save(&request).await?;

        if target.releases_stock() {
            self.restore_items(&request.items).await;
        }

        Ok(saved)
    }

    /// Delete a request. Only PENDING requests may be deleted; their
    /// reservation is released so an abandoned request cannot leak stock.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let request = self.requests.find_by_id(id).await?;

        if request.status != RequestStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Only PENDING requests can be deleted. Current status: {}",
                request.status
            )));
        }

        tracing::info!(request_id = %id, "Deleting loan request");
        self.restore_items(&request.items).await;
        self.requests.delete_by_id(id).await
    }

    pub async fn get(&self, id: &str) -> AppResult<LoanRequest> {
        self.requests.find_by_id(id).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<LoanRequest>> {
        self.requests.find_all().await
    }

    pub async fn list_for_user(&self, username: &str) -> AppResult<Vec<LoanRequest>> {
        self.requests.find_by_user(username).await
    }

    /// Reserve stock for every item, rolling back the already-applied
    /// reservations if a later one fails.
    async fn reserve_items(&self, items: &[LoanRequestItem]) -> AppResult<()> {
        let mut reserved: Vec<&LoanRequestItem> = Vec::with_capacity(items.len());
        for item in items {
            match self
                .equipment
                .apply_delta(&item.equipment_id, -item.requested_quantity)
                .await
            {
                Ok(_) => reserved.push(item),
                Err(err) => {
                    for taken in reserved {
                        if let Err(rollback_err) = self
                            .equipment
                            .apply_delta(&taken.equipment_id, taken.requested_quantity)
                            .await
                        {
                            tracing::error!(
                                equipment_id = %taken.equipment_id,
                                error = %rollback_err,
                                "Failed to roll back reservation"
                            );
                        }
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Hand reserved stock back to the pool, best-effort per item.
    async fn restore_items(&self, items: &[LoanRequestItem]) {
        for item in items {
            match self
                .equipment
                .apply_delta(&item.equipment_id, item.requested_quantity)
                .await
            {
                Ok(_) => {}
                Err(AppError::NotFound(_)) => {
                    tracing::warn!(
                        equipment_id = %item.equipment_id,
                        "Equipment deleted before restoration, skipping"
                    );
                }
                Err(err) => {
                    tracing::error!(
                        equipment_id = %item.equipment_id,
                        error = %err,
                        "Failed to restore reserved quantity"
                    );
                }
            }
        }
    }

    /// Generate a unique request id, verifying uniqueness before use
    async fn fresh_id(&self) -> AppResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = Uuid::new_v4().to_string();
            if !self.requests.exists(&id).await? {
                return Ok(id);
            }
        }
        Err(AppError::Conflict(
            "Could not allocate a unique request id".to_string(),
        ))
    }
}
