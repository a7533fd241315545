//! Equipment model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Equipment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentCategory {
    Laptop,
    Camera,
    Projector,
    Tablet,
    AudioEquipment,
    Other,
}

impl EquipmentCategory {
    /// All known categories, in display order
    pub const ALL: [EquipmentCategory; 6] = [
        EquipmentCategory::Laptop,
        EquipmentCategory::Camera,
        EquipmentCategory::Projector,
        EquipmentCategory::Tablet,
        EquipmentCategory::AudioEquipment,
        EquipmentCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentCategory::Laptop => "LAPTOP",
            EquipmentCategory::Camera => "CAMERA",
            EquipmentCategory::Projector => "PROJECTOR",
            EquipmentCategory::Tablet => "TABLET",
            EquipmentCategory::AudioEquipment => "AUDIO_EQUIPMENT",
            EquipmentCategory::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Physical condition of a piece of equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentCondition {
    New,
    Good,
    NeedsRepair,
}

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub category: EquipmentCategory,
    pub description: String,
    /// Number of units owned
    pub total_quantity: i32,
    /// Number of units not currently held by an active request
    pub available_quantity: i32,
    pub condition: EquipmentCondition,
    /// Always derived as `available_quantity > 0`
    pub is_available: bool,
    pub image_url: Option<String>,
}

impl Equipment {
    /// Clamp the available count into `[0, total_quantity]` and rederive
    /// `is_available`. Applied on every mutation path.
    pub fn normalize(&mut self) {
        self.available_quantity = self.available_quantity.clamp(0, self.total_quantity);
        self.is_available = self.available_quantity > 0;
    }
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub category: EquipmentCategory,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0, message = "total_quantity must not be negative"))]
    pub total_quantity: i32,
    /// Defaults to `total_quantity` when absent
    pub available_quantity: Option<i32>,
    pub condition: EquipmentCondition,
    pub image_url: Option<String>,
}

/// Filter for equipment listing
#[derive(Debug, Default, Clone, Deserialize, utoipa::IntoParams)]
pub struct EquipmentFilter {
    pub category: Option<EquipmentCategory>,
    pub available: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_caps_available_at_total() {
        let mut equipment = Equipment {
            id: "e1".to_string(),
            name: "Projector".to_string(),
            category: EquipmentCategory::Projector,
            description: String::new(),
            total_quantity: 3,
            available_quantity: 7,
            condition: EquipmentCondition::Good,
            is_available: false,
            image_url: None,
        };
        equipment.normalize();
        assert_eq!(equipment.available_quantity, 3);
        assert!(equipment.is_available);
    }

    #[test]
    fn normalize_floors_available_at_zero() {
        let mut equipment = Equipment {
            id: "e1".to_string(),
            name: "Projector".to_string(),
            category: EquipmentCategory::Projector,
            description: String::new(),
            total_quantity: 3,
            available_quantity: -2,
            condition: EquipmentCondition::Good,
            is_available: true,
            image_url: None,
        };
        equipment.normalize();
        assert_eq!(equipment.available_quantity, 0);
        assert!(!equipment.is_available);
    }
}
