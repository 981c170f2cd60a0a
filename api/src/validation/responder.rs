//! Uniform 400 response for rejected bodies
//!
//! Wire format, relied on by existing clients:
//!
//! ```json
//! {
//!   "success": false,
//!   "message": "Validation failed",
//!   "errors": { "<field>": "<message>" }
//! }
//! ```

use axum::{
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use guard_shared::{ValidationError, INVALID_BODY_MESSAGE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const VALIDATION_FAILED: &str = "Validation failed";

const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Validation error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub success: bool,
    pub message: String,
    /// Keys keep the order in which each field first failed
    pub errors: Map<String, Value>,
}

impl ValidationErrorResponse {
    /// Fold errors into a field map. A later error for the same field
    /// replaces an earlier one's message but keeps its position.
    pub fn new(errors: &[ValidationError]) -> Self {
        let errors = errors.iter().fold(Map::new(), |mut map, error| {
            map.insert(error.field.clone(), Value::from(error.message.as_str()));
            map
        });

        Self {
            success: false,
            message: VALIDATION_FAILED.to_string(),
            errors,
        }
    }
}

/// Rejection that converts to the validation error response
#[derive(Debug)]
pub struct ValidationRejection {
    pub errors: Vec<ValidationError>,
}

impl ValidationRejection {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn malformed() -> Self {
        Self::new(vec![ValidationError::general(INVALID_BODY_MESSAGE)])
    }
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        create_validation_error_response(&self.errors)
    }
}

/// Build the 400 response for a list of validation errors
pub fn create_validation_error_response(errors: &[ValidationError]) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let payload = ValidationErrorResponse::new(errors);

    let mut response = (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(CORRELATION_ID_HEADER), value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_last_error_per_field_wins() {
        let body = ValidationErrorResponse::new(&[
            ValidationError::new("name", "Required"),
            ValidationError::new("name", "Too short"),
        ]);
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors["name"], "Too short");
    }

    #[test]
    fn test_repeated_field_keeps_first_position() {
        let body = ValidationErrorResponse::new(&[
            ValidationError::new("name", "Required"),
            ValidationError::new("price", "Must be positive"),
            ValidationError::new("name", "Too short"),
        ]);
        let keys: Vec<&str> = body.errors.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "price"]);
        assert_eq!(body.errors["name"], "Too short");
    }

    #[tokio::test]
    async fn test_response_shape() {
        let response = create_validation_error_response(&[
            ValidationError::new("name", "Required"),
            ValidationError::new("name", "Too short"),
            ValidationError::new("price", "Must be positive"),
        ]);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().contains_key("x-correlation-id"));
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
        assert_eq!(
            body_json(response).await,
            json!({
                "success": false,
                "message": "Validation failed",
                "errors": {"name": "Too short", "price": "Must be positive"}
            })
        );
    }

    #[tokio::test]
    async fn test_exact_bytes() {
        let response =
            create_validation_error_response(&[ValidationError::general("Invalid request body")]);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            &bytes[..],
            concat!(
                r#"{"success":false,"message":"Validation failed","#,
                r#""errors":{"_general":"Invalid request body"}}"#
            )
            .as_bytes()
        );
    }

    #[tokio::test]
    async fn test_exact_bytes_keep_failure_order() {
        let response = create_validation_error_response(&[
            ValidationError::new("price", "Must be positive"),
            ValidationError::new("name", "Required"),
        ]);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            &bytes[..],
            concat!(
                r#"{"success":false,"message":"Validation failed","#,
                r#""errors":{"price":"Must be positive","name":"Required"}}"#
            )
            .as_bytes()
        );
    }

    #[tokio::test]
    async fn test_empty_errors() {
        let response = create_validation_error_response(&[]);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"success": false, "message": "Validation failed", "errors": {}})
        );
    }

    #[tokio::test]
    async fn test_rejection_into_response() {
        let response = ValidationRejection::malformed().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["errors"],
            json!({"_general": "Invalid request body"})
        );
    }
}
