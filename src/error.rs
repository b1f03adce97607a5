use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

// Failures of the enrichment producer
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid upstream url: {0}")]
    Url(String),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("upstream body could not be decoded: {0}")]
    Decode(String),

    #[error("producer timed out after {0:?}")]
    Timeout(std::time::Duration),
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Rate limit exceeded for {key}. Try again later.")]
    RateLimitExceeded { key: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Enrichment failed: {0}")]
    Producer(#[from] EnrichError),
}

// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl WorkerError {
    // Only these count towards the producer failure metric
    pub fn is_producer_failure(&self) -> bool {
        matches!(self, WorkerError::Producer(_))
    }

    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            WorkerError::RateLimitExceeded { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
            }
            WorkerError::InvalidArgument(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_ARGUMENT")
            }
            WorkerError::Producer(EnrichError::Timeout(_)) => {
                (StatusCode::GATEWAY_TIMEOUT, "PRODUCER_TIMEOUT")
            }
            WorkerError::Producer(_) => (StatusCode::BAD_GATEWAY, "PRODUCER_FAILURE"),
        }
    }
}

impl IntoResponse for WorkerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn rate_limit_maps_to_429() {
        let err = WorkerError::RateLimitExceeded {
            key: "fotmob:1".into(),
        };
        assert_eq!(
            err.status_and_code(),
            (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
        );
    }

    #[test]
    fn only_producer_errors_are_producer_failures() {
        assert!(WorkerError::from(EnrichError::Status(500)).is_producer_failure());
        assert!(WorkerError::from(EnrichError::Timeout(Duration::from_secs(1))).is_producer_failure());

        assert!(!WorkerError::InvalidArgument("cache ttl".into()).is_producer_failure());
        assert!(!WorkerError::RateLimitExceeded { key: "fotmob".into() }.is_producer_failure());
    }

    #[test]
    fn producer_timeout_is_distinct_from_other_failures() {
        let timeout = WorkerError::from(EnrichError::Timeout(Duration::from_secs(8)));
        assert_eq!(timeout.status_and_code().1, "PRODUCER_TIMEOUT");

        let status = WorkerError::from(EnrichError::Status(503));
        assert_eq!(
            status.status_and_code(),
            (StatusCode::BAD_GATEWAY, "PRODUCER_FAILURE")
        );
    }
}
