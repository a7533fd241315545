//! Loan request model and status state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Lifecycle status of a loan request.
///
/// Legal transitions:
///
/// ```text
/// (create) -> PENDING -> APPROVED -> RETURN_REQUESTED -> RETURNED
///                     \-> DENIED
/// ```
///
/// DENIED and RETURNED are terminal and release the stock reserved at
/// creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Denied,
    ReturnRequested,
    Returned,
}

impl RequestStatus {
    /// Whether the state machine permits moving from `self` to `target`.
    pub fn can_transition(&self, target: RequestStatus) -> bool {
        use RequestStatus::*;
        matches!(
            (self, target),
            (Pending, Approved) | (Pending, Denied) | (Approved, ReturnRequested) | (ReturnRequested, Returned)
        )
    }

    /// Whether entering this status hands reserved stock back to the pool.
    pub fn releases_stock(&self) -> bool {
        matches!(self, RequestStatus::Denied | RequestStatus::Returned)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Denied => "DENIED",
            RequestStatus::ReturnRequested => "RETURN_REQUESTED",
            RequestStatus::Returned => "RETURNED",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of a loan request. Owned by exactly one request and immutable
/// once the request leaves PENDING.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanRequestItem {
    pub equipment_id: String,
    pub requested_quantity: i32,
}

/// Loan request record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanRequest {
    pub id: String,
    pub username: String,
    pub status: RequestStatus,
    pub purpose: String,
    pub requested_at: DateTime<Utc>,
    pub return_date: Option<String>,
    pub items: Vec<LoanRequestItem>,
}

/// Create loan request payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLoanRequest {
    #[serde(default)]
    pub purpose: String,
    pub return_date: Option<String>,
    #[validate(length(min = 1, message = "a request needs at least one item"))]
    pub items: Vec<LoanRequestItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Denied,
        RequestStatus::ReturnRequested,
        RequestStatus::Returned,
    ];

    #[test]
    fn only_graph_edges_are_legal() {
        let legal = [
            (RequestStatus::Pending, RequestStatus::Approved),
            (RequestStatus::Pending, RequestStatus::Denied),
            (RequestStatus::Approved, RequestStatus::ReturnRequested),
            (RequestStatus::ReturnRequested, RequestStatus::Returned),
        ];
        for from in ALL {
            for target in ALL {
                assert_eq!(
                    from.can_transition(target),
                    legal.contains(&(from, target)),
                    "transition {} -> {}",
                    from,
                    target
                );
            }
        }
    }

    #[test]
    fn terminal_statuses_release_stock() {
        assert!(RequestStatus::Denied.releases_stock());
        assert!(RequestStatus::Returned.releases_stock());
        assert!(!RequestStatus::Pending.releases_stock());
        assert!(!RequestStatus::Approved.releases_stock());
        assert!(!RequestStatus::ReturnRequested.releases_stock());
    }
}
