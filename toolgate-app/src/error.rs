use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use toolgate_core::GatewayError;
use toolgate_tools::FieldError;

/// Error body returned by every route: `{code, message, errors?}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                code: code.into(),
                message: message.into(),
                errors: Vec::new(),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Please authenticate")
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", "Forbidden")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ApiErrorBody {
        &self.body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let mut api = Self::new(err.status(), err.code(), err.to_string());
        if let Some(validation) = err.validation() {
            api.body.errors = validation.errors.clone();
        }
        api
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgate_tools::ValidationError;

    #[test]
    fn test_gateway_errors_keep_status_and_fields() {
        let err = ApiError::from(GatewayError::InvalidInput(ValidationError::field(
            "userId",
            "User ID must be a valid number",
        )));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body().code, "INVALID_INPUT");
        assert_eq!(err.body().errors.len(), 1);

        let err = ApiError::from(GatewayError::InternalFailure);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().message, "Tool execution failed");
        assert!(err.body().errors.is_empty());
    }
}
