//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use planner_lib::{scenario::StoreError, ErrorResponse};
use thiserror::Error;
use tracing::error;

/// Every failure a handler can report
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input")]
    InvalidInput(Vec<String>),

    #[error("Invalid scenario payload")]
    InvalidScenario(Vec<String>),

    #[error("Invalid scenario id")]
    InvalidScenarioId,

    #[error("Scenario not found")]
    ScenarioNotFound,

    #[error("Not Found")]
    RouteNotFound { method: String, path: String },

    #[error("Internal Server Error")]
    Store(#[from] StoreError),

    #[error("Internal Server Error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::InvalidScenario(_) | ApiError::InvalidScenarioId => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ScenarioNotFound | ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<Vec<String>> {
        match self {
            ApiError::InvalidInput(details) | ApiError::InvalidScenario(details) => {
                Some(details.clone())
            }
            ApiError::RouteNotFound { method, path } => {
                Some(vec![format!("Route {} {} does not exist", method, path)])
            }
            ApiError::Store(e) => Some(vec![e.to_string()]),
            ApiError::Internal(message) => Some(vec![message.clone()]),
            ApiError::InvalidScenarioId | ApiError::ScenarioNotFound => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = self.details();

        if status.is_server_error() {
            error!(
                event = "request_failed",
                details = ?details,
                "Request failed with an internal error"
            );
        }

        let body = ErrorResponse {
            error: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidInput(vec![]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::InvalidScenarioId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::ScenarioNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_route_not_found_details() {
        let err = ApiError::RouteNotFound {
            method: "GET".to_string(),
            path: "/api/unknown".to_string(),
        };
        assert_eq!(err.to_string(), "Not Found");
        assert_eq!(
            err.details(),
            Some(vec!["Route GET /api/unknown does not exist".to_string()])
        );
    }

    #[test]
    fn test_client_errors_without_details() {
        assert_eq!(ApiError::ScenarioNotFound.details(), None);
        assert_eq!(ApiError::InvalidScenarioId.to_string(), "Invalid scenario id");
    }
}
