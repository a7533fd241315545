//! Equipment catalog service

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, EquipmentFilter},
    repository::EquipmentStore,
};

/// How many fresh ids we try before giving up on a collision streak
const MAX_ID_ATTEMPTS: u32 = 4;

#[derive(Clone)]
pub struct EquipmentService {
    store: Arc<dyn EquipmentStore>,
}

impl EquipmentService {
    pub fn new(store: Arc<dyn EquipmentStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>> {
        self.store.list(filter).await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Equipment> {
        self.store.get_by_id(id).await
    }

    /// Register a new piece of equipment under a fresh unique id
    pub async fn create(&self, data: CreateEquipment) -> AppResult<Equipment> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let id = self.fresh_id().await?;
        let mut equipment = Equipment {
            id,
            name: data.name,
            category: data.category,
            description: data.description,
            total_quantity: data.total_quantity,
            available_quantity: data.available_quantity.unwrap_or(data.total_quantity),
            condition: data.condition,
            is_available: false,
            image_url: data.image_url,
        };
        equipment.normalize();

        tracing::info!(equipment_id = %equipment.id, name = %equipment.name, "Adding equipment");
        self.store.insert(&equipment).await
    }

    /// Replace an equipment record wholesale, keeping the count invariants
    pub async fn replace(&self, id: &str, data: CreateEquipment) -> AppResult<Equipment> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // The replace contract is an explicit field-by-field write of the
        // full record; apply_delta remains the only incremental counter path.
        let mut equipment = Equipment {
            id: id.to_string(),
            name: data.name,
            category: data.category,
            description: data.description,
            total_quantity: data.total_quantity,
            available_quantity: data.available_quantity.unwrap_or(data.total_quantity),
            condition: data.condition,
            is_available: false,
            image_url: data.image_url,
        };
        equipment.normalize();

        self.store.replace(&equipment).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        tracing::info!(equipment_id = %id, "Deleting equipment");
        self.store.delete(id).await
    }

    /// Generate a unique equipment id, verifying uniqueness before use
    async fn fresh_id(&self) -> AppResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = Uuid::new_v4().to_string();
            if !self.store.exists(&id).await? {
                return Ok(id);
            }
        }
        Err(AppError::Conflict(
            "Could not allocate a unique equipment id".to_string(),
        ))
    }
}
