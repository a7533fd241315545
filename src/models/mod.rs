//! Data models for Lendstock

pub mod equipment;
pub mod request;
pub mod user;

// Re-export commonly used types
pub use equipment::{Equipment, EquipmentCategory, EquipmentCondition};
pub use request::{LoanRequest, LoanRequestItem, RequestStatus};
pub use user::{Role, UserClaims};
