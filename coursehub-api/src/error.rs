/// Error handling for the API server
///
/// All handlers return `ApiResult<T>`; `ApiError` converts into the HTTP
/// response, so every failure path ends in exactly one response.
///
/// # Response bodies
///
/// - 400: `{"errors": ["A title is required", ...]}`
/// - 401 / 403 / 404 / 500: `{"error": "<code>", "message": "..."}`
///
/// # Example
///
/// ```
/// use coursehub_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::{json, Value};
///
/// async fn handler(id: i64) -> ApiResult<Json<Value>> {
///     if id < 1 {
///         return Err(ApiError::NotFound(format!("Course {} does not exist", id)));
///     }
///     Ok(Json(json!({ "id": id })))
/// }
/// ```

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use coursehub_shared::auth::{
    authorization::AuthzError, middleware::AuthError, password::PasswordError,
};
use coursehub_shared::store::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Message sent for every authentication failure
pub const ACCESS_DENIED: &str = "Access denied";

/// Challenge sent with 401 responses
pub const BASIC_CHALLENGE: &str = r#"Basic realm="coursehub""#;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) carrying one message per violated constraint
    Validation(Vec<String>),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Internal server error (500); the detail is logged, never sent
    InternalError(String),
}

/// Error response format for non-validation failures
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "unauthorized", "not_found")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

/// Error response format for validation failures
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub errors: Vec<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(ValidationResponse { errors }))
                    .into_response();
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BASIC_CHALLENGE),
            );
        }
        response
    }
}

/// Convert store errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err.violations() {
            Some(violations) => {
                ApiError::Validation(violations.iter().map(|v| v.message.clone()).collect())
            }
            None => ApiError::InternalError(err.to_string()),
        }
    }
}

/// Convert authentication errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials
            | AuthError::InvalidFormat(_)
            | AuthError::InvalidCredentials => ApiError::Unauthorized(ACCESS_DENIED.to_string()),
            AuthError::Internal(msg) => {
                ApiError::InternalError(format!("Authentication failed: {}", msg))
            }
        }
    }
}

/// Convert authorization errors to API errors
impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::NotOwner { course_id, .. } => ApiError::Forbidden(format!(
                "Not authorized to change course {}",
                course_id
            )),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JSON body rejections to API errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(vec![rejection.body_text()])
    }
}
