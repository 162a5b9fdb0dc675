//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fulfillment::FulfillmentError;
use order_store::StoreError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Malformed request from the client.
    #[error("{0}")]
    BadRequest(String),

    /// Unexpected server-side failure.
    #[error("{0}")]
    Internal(String),

    /// Failure reported by the sell workflow or its reads.
    #[error(transparent)]
    Fulfillment(#[from] FulfillmentError),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Fulfillment(err) => fulfillment_status(err),
        }
    }
}

fn fulfillment_status(err: &FulfillmentError) -> StatusCode {
    match err {
        FulfillmentError::Validation(_) => StatusCode::BAD_REQUEST,
        FulfillmentError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
        FulfillmentError::Notification(_) => StatusCode::BAD_GATEWAY,
        FulfillmentError::Persistence(StoreError::OrderNotFound(_)) => StatusCode::NOT_FOUND,
        FulfillmentError::Persistence(StoreError::InvalidTransition { .. }) => {
            StatusCode::CONFLICT
        }
        FulfillmentError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = %message, %status, "request failed");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{OrderError, OrderStatus};
    use fulfillment::{NotificationError, PaymentError};
    use order_store::OrderId;

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (
                ApiError::from(FulfillmentError::Validation(OrderError::NoItems)),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(FulfillmentError::Payment(PaymentError::Unavailable(
                    "down".to_string(),
                ))),
                StatusCode::PAYMENT_REQUIRED,
            ),
            (
                ApiError::from(FulfillmentError::Notification(
                    NotificationError::DeliveryFailed {
                        recipient: domain::CustomerId::new(1),
                        reason: "smtp".to_string(),
                    },
                )),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ApiError::from(FulfillmentError::Persistence(StoreError::OrderNotFound(
                    OrderId::new(7),
                ))),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(FulfillmentError::Persistence(
                    StoreError::InvalidTransition {
                        order_id: OrderId::new(7),
                        status: OrderStatus::Confirmed,
                    },
                )),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::from(FulfillmentError::Persistence(StoreError::Unavailable(
                    "down".to_string(),
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::BadRequest("bad id".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status(), expected, "{err}");
        }
    }

    #[test]
    fn test_message_is_passed_through() {
        let err = ApiError::from(FulfillmentError::Validation(OrderError::NoPayments));
        assert_eq!(err.to_string(), "Validation error: Order has no payments");
    }
}
