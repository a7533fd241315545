//! Business logic services

pub mod equipment;
pub mod requests;

use std::sync::Arc;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub equipment: equipment::EquipmentService,
    pub requests: requests::RequestsService,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Repository) -> Self {
        let equipment_store = Arc::new(repository.equipment.clone());
        let request_store = Arc::new(repository.requests.clone());
        Self {
            equipment: equipment::EquipmentService::new(equipment_store.clone()),
            requests: requests::RequestsService::new(equipment_store, request_store),
        }
    }
}
