//! Loan request endpoints.
//!
//! Role gating happens here, before the lifecycle engine is invoked: users
//! create requests and ask for returns on their own requests, administrators
//! approve, deny and process returns.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::request::{CreateLoanRequest, LoanRequest, RequestStatus},
};

use super::AuthenticatedUser;

/// Create a loan request for the authenticated user
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = CreateLoanRequest,
    responses(
        (status = 201, description = "Request created", body = LoanRequest),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Unknown equipment"),
        (status = 409, description = "Insufficient stock")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateLoanRequest>,
) -> AppResult<(StatusCode, Json<LoanRequest>)> {
    let request = state.services.requests.create(&claims.sub, data).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// List all loan requests (admin)
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All loan requests", body = Vec<LoanRequest>)
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanRequest>>> {
    claims.require_admin()?;
    let requests = state.services.requests.list_all().await?;
    Ok(Json(requests))
}

/// List loan requests for a user
#[utoipa::path(
    get,
    path = "/requests/user/{username}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "The user's loan requests", body = Vec<LoanRequest>)
    )
)]
pub async fn list_user_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(username): Path<String>,
) -> AppResult<Json<Vec<LoanRequest>>> {
    claims.require_self_or_admin(&username)?;
    let requests = state.services.requests.list_for_user(&username).await?;
    Ok(Json(requests))
}

/// Get a loan request by ID
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request details", body = LoanRequest),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<LoanRequest>> {
    let request = state.services.requests.get(&id).await?;
    claims.require_self_or_admin(&request.username)?;
    Ok(Json(request))
}

/// Delete a loan request (only while PENDING)
#[utoipa::path(
    delete,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Request ID")),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is not PENDING")
    )
)]
pub async fn delete_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let request = state.services.requests.get(&id).await?;
    claims.require_self_or_admin(&request.username)?;
    state.services.requests.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Approve a pending request (admin)
#[utoipa::path(
    put,
    path = "/requests/{id}/approve",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request approved", body = LoanRequest),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Illegal transition")
    )
)]
pub async fn approve_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<LoanRequest>> {
    claims.require_admin()?;
    let request = state
        .services
        .requests
        .transition(&id, RequestStatus::Approved)
        .await?;
    Ok(Json(request))
}

/// Deny a pending request, restoring its reserved stock (admin)
#[utoipa::path(
    put,
    path = "/requests/{id}/deny",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request denied", body = LoanRequest),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Illegal transition")
    )
)]
pub async fn deny_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<LoanRequest>> {
    claims.require_admin()?;
    let request = state
        .services
        .requests
        .transition(&id, RequestStatus::Denied)
        .await?;
    Ok(Json(request))
}

/// Ask to return an approved loan (owner or admin)
#[utoipa::path(
    put,
    path = "/requests/{id}/request-return",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Return requested", body = LoanRequest),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Illegal transition")
    )
)]
pub async fn request_return(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<LoanRequest>> {
    let request = state.services.requests.get(&id).await?;
    claims.require_self_or_admin(&request.username)?;
    let request = state
        .services
        .requests
        .transition(&id, RequestStatus::ReturnRequested)
        .await?;
    Ok(Json(request))
}

/// Process a return, restoring the reserved stock (admin)
#[utoipa::path(
    put,
    path = "/requests/{id}/return",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request returned", body = LoanRequest),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Illegal transition")
    )
)]
pub async fn return_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<LoanRequest>> {
    claims.require_admin()?;
    let request = state
        .services
        .requests
        .transition(&id, RequestStatus::Returned)
        .await?;
    Ok(Json(request))
}
