//! HTTP error responses for the tool server.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::domain::error::StockscopeError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

pub fn status_from_error(err: &StockscopeError) -> StatusCode {
    match err {
        StockscopeError::NoData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        e if e.is_caller_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<StockscopeError> for WebError {
    fn from(err: StockscopeError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = self.status.as_u16(), error = %self.message, "request failed");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn caller_errors_are_bad_request() {
        let err = StockscopeError::DuplicateRecord {
            symbol: "TCS".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        };
        assert_eq!(status_from_error(&err), StatusCode::BAD_REQUEST);

        let err = StockscopeError::ConfigInvalid {
            section: "indicators".into(),
            key: "rsi_period".into(),
            reason: "must be positive".into(),
        };
        assert_eq!(WebError::from(err).status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn no_data_is_unprocessable() {
        let err = StockscopeError::NoData {
            symbols: "XYZ".into(),
        };
        assert_eq!(status_from_error(&err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn source_errors_are_internal() {
        let err = StockscopeError::DataSource {
            reason: "disk on fire".into(),
        };
        let web = WebError::from(err);
        assert_eq!(web.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(web.message.contains("disk on fire"));
    }
}
