#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::Request,
    response::Response,
};
use guard_api::{GuardState, ValidationConfig};
use guard_shared::{
    BulkActionChecker, BulkActionVerdict, CollaboratorError, FieldChecker, FieldFailures,
    FieldSchema, RequestValidator, SchemaLookup,
};
use serde_json::{json, Value};

/// Small stand-in for the storefront schema registry
pub struct CatalogRegistry;

impl SchemaLookup for CatalogRegistry {
    fn get_validation_schema(
        &self,
        resource_type: &str,
    ) -> Result<Option<Vec<FieldSchema>>, CollaboratorError> {
        match resource_type {
            "product" => Ok(Some(vec![
                json!({"name": "name", "type": "string"}),
                json!({"name": "price", "type": "number"}),
            ])),
            "user" => Ok(Some(vec![json!({"name": "email", "type": "string"})])),
            "draft" => Ok(Some(vec![])),
            "broken" => Err(CollaboratorError::SchemaLookup("registry offline".into())),
            _ => Ok(None),
        }
    }
}

impl FieldChecker for CatalogRegistry {
    fn validate_form_data(
        &self,
        body: &Value,
        schema: &[FieldSchema],
    ) -> Result<FieldFailures, CollaboratorError> {
        let mut failures = Vec::new();
        for rule in schema {
            let Some(name) = rule["name"].as_str() else {
                continue;
            };
            match (rule["type"].as_str(), body.get(name)) {
                (_, None) | (_, Some(Value::Null)) => {
                    failures.push((name.to_string(), "Required".to_string()))
                }
                (Some("number"), Some(value)) if value.as_f64().map_or(true, |n| n <= 0.0) => {
                    failures.push((name.to_string(), "Must be positive".to_string()))
                }
                (Some("string"), Some(value)) if value.as_str().map_or(true, str::is_empty) => {
                    failures.push((name.to_string(), "Required".to_string()))
                }
                _ => {}
            }
        }
        Ok(failures)
    }
}

impl BulkActionChecker for CatalogRegistry {
    fn validate_bulk_action(
        &self,
        action: &str,
        resource_type: &str,
        _data: Option<&Value>,
    ) -> Result<BulkActionVerdict, CollaboratorError> {
        Ok(match (resource_type, action) {
            ("product", "delete" | "activate" | "deactivate") => BulkActionVerdict::accept(),
            ("order", "delete") => BulkActionVerdict::reject("Cannot delete shipped orders"),
            _ => BulkActionVerdict::reject_silently(),
        })
    }
}

pub fn validator() -> RequestValidator {
    RequestValidator::from_registry(Arc::new(CatalogRegistry))
}

pub fn guard() -> GuardState {
    guard_with(ValidationConfig {
        max_body_bytes: 4 * 1024,
        ..ValidationConfig::default()
    })
}

pub fn guard_with(config: ValidationConfig) -> GuardState {
    GuardState::new(validator(), config)
}

pub fn json_request(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("guard_api=debug,guard_shared=debug")
        .with_test_writer()
        .try_init();
}
