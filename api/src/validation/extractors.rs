//! Custom Axum extractors for validated input
//!
//! `ValidatedJson<R>` validates the body against the schema of resource
//! `R`, sanitizes it when the configuration asks for it, and deserializes
//! the result into `R::Body`. `ValidatedBulk<R>` does the same for bulk
//! action bodies.

use axum::{
    async_trait,
    extract::{FromRef, FromRequest, Request},
};
use guard_shared::BulkRequestBody;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::pipeline::ValidationKind;
use super::responder::ValidationRejection;
use crate::state::GuardState;

/// A resource type known to the schema registry
///
/// ```ignore
/// struct Product;
///
/// impl Resource for Product {
///     const NAME: &'static str = "product";
///     type Body = NewProduct;
/// }
///
/// async fn create_product(ValidatedJson(product): ValidatedJson<Product>) -> impl IntoResponse {
///     // product is validated, sanitized and typed
/// }
/// ```
pub trait Resource: Send + 'static {
    const NAME: &'static str;

    /// Concrete type the validated body is narrowed to
    type Body: DeserializeOwned + Send;
}

/// Validated single-resource body
pub struct ValidatedJson<R: Resource>(pub R::Body);

/// Validated bulk action body
pub struct ValidatedBulk<R: Resource>(pub BulkRequestBody, std::marker::PhantomData<R>);

impl<R: Resource> ValidatedBulk<R> {
    pub fn into_inner(self) -> BulkRequestBody {
        self.0
    }
}

fn narrow<T: DeserializeOwned>(
    data: Value,
    resource_type: &str,
) -> Result<T, ValidationRejection> {
    serde_json::from_value(data).map_err(|err| {
        tracing::debug!(
            resource_type,
            error = %err,
            "validated body does not fit its handler type"
        );
        ValidationRejection::malformed()
    })
}

#[async_trait]
impl<S, R> FromRequest<S> for ValidatedJson<R>
where
    R: Resource,
    GuardState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let guard = GuardState::from_ref(state);
        let kind = if guard.config.sanitize {
            ValidationKind::Sanitized
        } else {
            ValidationKind::Single
        };

        let data = guard
            .validate(kind, req.into_body(), R::NAME)
            .await
            .into_result()
            .map_err(ValidationRejection::new)?;

        Ok(ValidatedJson(narrow(data, R::NAME)?))
    }
}

#[async_trait]
impl<S, R> FromRequest<S> for ValidatedBulk<R>
where
    R: Resource,
    GuardState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let guard = GuardState::from_ref(state);
        let data = guard
            .validate(ValidationKind::Bulk, req.into_body(), R::NAME)
            .await
            .into_result()
            .map_err(ValidationRejection::new)?;

        Ok(ValidatedBulk(narrow(data, R::NAME)?, std::marker::PhantomData))
    }
}

impl<R: Resource> std::ops::Deref for ValidatedJson<R> {
    type Target = R::Body;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<R: Resource> std::ops::Deref for ValidatedBulk<R> {
    type Target = BulkRequestBody;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
