use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::ticket::TicketValidationError;
use services::services::ticket::{PaginationError, TicketServiceError};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ticket(#[from] TicketServiceError),
    #[error(transparent)]
    Validation(#[from] TicketValidationError),
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Unprocessable(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Ticket(TicketServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Ticket(TicketServiceError::Database(_)) | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Validation(_) | ApiError::Pagination(_) | ApiError::Unprocessable(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_message = if status_code.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "An internal error occurred. Please try again.".to_string()
        } else {
            self.to_string()
        };

        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}
