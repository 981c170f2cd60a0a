//! Handler adapters that run validation before a resource handler.
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/api/products", post(with_validation(guard.clone(), "product", create_product)))
//!     .route("/api/products/bulk", post(with_bulk_validation(guard, "product", bulk_products)));
//!
//! async fn create_product(parts: Parts, data: Value) -> Response {
//!     // data has passed the product schema
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::{extract::Request, http::request::Parts, response::Response};
use guard_shared::ValidationResult;
use serde_json::Value;

use super::pipeline::ValidationKind;
use super::responder::create_validation_error_response;
use crate::state::GuardState;

pub type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Run single-resource validation; `handler` receives the parsed body.
pub fn with_validation<H, Fut>(
    state: GuardState,
    resource_type: impl Into<String>,
    handler: H,
) -> impl Fn(Request) -> ResponseFuture + Clone + Send + Sync + 'static
where
    H: Fn(Parts, Value) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    adapt(state, ValidationKind::Single, resource_type.into(), handler)
}

/// Run bulk action validation; `handler` receives the full bulk body.
pub fn with_bulk_validation<H, Fut>(
    state: GuardState,
    resource_type: impl Into<String>,
    handler: H,
) -> impl Fn(Request) -> ResponseFuture + Clone + Send + Sync + 'static
where
    H: Fn(Parts, Value) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    adapt(state, ValidationKind::Bulk, resource_type.into(), handler)
}

/// Like [`with_validation`], but `handler` receives the sanitized body.
pub fn with_sanitized_validation<H, Fut>(
    state: GuardState,
    resource_type: impl Into<String>,
    handler: H,
) -> impl Fn(Request) -> ResponseFuture + Clone + Send + Sync + 'static
where
    H: Fn(Parts, Value) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    adapt(state, ValidationKind::Sanitized, resource_type.into(), handler)
}

fn adapt<H, Fut>(
    state: GuardState,
    kind: ValidationKind,
    resource_type: String,
    handler: H,
) -> impl Fn(Request) -> ResponseFuture + Clone + Send + Sync + 'static
where
    H: Fn(Parts, Value) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    let resource_type: Arc<str> = Arc::from(resource_type);

    move |request: Request| -> ResponseFuture {
        let state = state.clone();
        let handler = handler.clone();
        let resource_type = resource_type.clone();

        Box::pin(async move {
            let (parts, body) = request.into_parts();
            match state.validate(kind, body, &resource_type).await {
                // The handler's response goes out as-is.
                ValidationResult::Valid { data } => handler(parts, data).await,
                ValidationResult::Invalid { errors } => create_validation_error_response(&errors),
            }
        })
    }
}
