//! Equipment catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::equipment::{CreateEquipment, Equipment, EquipmentCategory, EquipmentFilter},
};

use super::AuthenticatedUser;

/// List equipment, optionally filtered by category and availability
#[utoipa::path(
    get,
    path = "/equipments",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentFilter),
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(filter): Query<EquipmentFilter>,
) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.list(&filter).await?;
    Ok(Json(equipment))
}

/// List the known equipment categories
#[utoipa::path(
    get,
    path = "/equipments/categories",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category names", body = Vec<String>)
    )
)]
pub async fn list_categories(
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> Json<Vec<&'static str>> {
    Json(EquipmentCategory::ALL.iter().map(|c| c.as_str()).collect())
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipments/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.get_by_id(&id).await?;
    Ok(Json(equipment))
}

/// Create equipment (admin)
#[utoipa::path(
    post,
    path = "/equipments",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    claims.require_admin()?;
    let equipment = state.services.equipment.create(data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Replace equipment (admin)
#[utoipa::path(
    put,
    path = "/equipments/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment ID")),
    request_body = CreateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(data): Json<CreateEquipment>,
) -> AppResult<Json<Equipment>> {
    claims.require_admin()?;
    let equipment = state.services.equipment.replace(&id, data).await?;
    Ok(Json(equipment))
}

/// Delete equipment (admin)
#[utoipa::path(
    delete,
    path = "/equipments/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.equipment.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
