//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{equipment, health, requests};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lendstock API",
        version = "0.3.0",
        description = "Equipment Lending Portal REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Equipment
        equipment::list_equipment,
        equipment::list_categories,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Requests
        requests::create_request,
        requests::list_requests,
        requests::list_user_requests,
        requests::get_request,
        requests::delete_request,
        requests::approve_request,
        requests::deny_request,
        requests::request_return,
        requests::return_request,
    ),
    components(
        schemas(
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentCategory,
            crate::models::equipment::EquipmentCondition,
            crate::models::equipment::CreateEquipment,
            // Requests
            crate::models::request::LoanRequest,
            crate::models::request::LoanRequestItem,
            crate::models::request::RequestStatus,
            crate::models::request::CreateLoanRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "equipment", description = "Equipment catalog management"),
        (name = "requests", description = "Loan request lifecycle")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
