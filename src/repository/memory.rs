//! In-memory store implementations for unit tests.
//!
//! These honor the same contracts as the Postgres repositories, in
//! particular the atomic check-and-set semantics of `apply_delta`: the whole
//! read-modify-write happens under one lock acquisition.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{EquipmentStore, RequestStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{Equipment, EquipmentFilter},
        request::LoanRequest,
    },
};

#[derive(Default)]
pub struct InMemoryEquipmentStore {
    items: Mutex<HashMap<String, Equipment>>,
}

impl InMemoryEquipmentStore {
    pub fn with_equipment(equipment: Vec<Equipment>) -> Self {
        let store = Self::default();
        {
            let mut items = store.items.lock().unwrap();
            for e in equipment {
                items.insert(e.id.clone(), e);
            }
        }
        store
    }
}

#[async_trait]
impl EquipmentStore for InMemoryEquipmentStore {
    async fn list(&self, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>> {
        let items = self.items.lock().unwrap();
        let mut result: Vec<Equipment> = items
            .values()
            .filter(|e| filter.category.map_or(true, |c| e.category == c))
            .filter(|e| filter.available.map_or(true, |a| e.is_available == a))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Equipment> {
        self.items
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    async fn exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.items.lock().unwrap().contains_key(id))
    }

    async fn insert(&self, equipment: &Equipment) -> AppResult<Equipment> {
        self.items
            .lock()
            .unwrap()
            .insert(equipment.id.clone(), equipment.clone());
        Ok(equipment.clone())
    }

    async fn replace(&self, equipment: &Equipment) -> AppResult<Equipment> {
        let mut items = self.items.lock().unwrap();
        if !items.contains_key(&equipment.id) {
            return Err(AppError::NotFound(format!(
                "Equipment {} not found",
                equipment.id
            )));
        }
        items.insert(equipment.id.clone(), equipment.clone());
        Ok(equipment.clone())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.items
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    async fn apply_delta(&self, id: &str, delta: i32) -> AppResult<i32> {
        let mut items = self.items.lock().unwrap();
        let equipment = items
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;
        let next = equipment.available_quantity + delta;
        if next < 0 {
            return Err(AppError::InsufficientStock(format!(
                "Not enough available stock for equipment {}",
                id
            )));
        }
        equipment.available_quantity = next.min(equipment.total_quantity);
        equipment.is_available = equipment.available_quantity > 0;
        Ok(equipment.available_quantity)
    }
}

#[derive(Default)]
pub struct InMemoryRequestStore {
    requests: Mutex<HashMap<String, LoanRequest>>,
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn save(&self, request: &LoanRequest) -> AppResult<LoanRequest> {
        self.requests
            .lock()
            .unwrap()
            .insert(request.id.clone(), request.clone());
        Ok(request.clone())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<LoanRequest> {
        self.requests
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Loan request {} not found", id)))
    }

    async fn find_by_user(&self, username: &str) -> AppResult<Vec<LoanRequest>> {
        let requests = self.requests.lock().unwrap();
        let mut result: Vec<LoanRequest> = requests
            .values()
            .filter(|r| r.username == username)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(result)
    }

    async fn find_all(&self) -> AppResult<Vec<LoanRequest>> {
        let requests = self.requests.lock().unwrap();
        let mut result: Vec<LoanRequest> = requests.values().cloned().collect();
        result.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(result)
    }

    async fn exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.requests.lock().unwrap().contains_key(id))
    }

    async fn delete_by_id(&self, id: &str) -> AppResult<()> {
        self.requests
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Loan request {} not found", id)))
    }
}
