use axum::body::{to_bytes, Body, Bytes};
use guard_shared::ValidationResult;

use crate::error::BodyError;
use crate::metrics;
use crate::state::GuardState;

/// Which validator runs for a request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationKind {
    /// Single-resource create/update
    Single,
    /// `{action, ids, data?}` bulk actions
    Bulk,
    /// Single-resource validation followed by sanitization
    Sanitized,
}

impl ValidationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationKind::Single => "single",
            ValidationKind::Bulk => "bulk",
            ValidationKind::Sanitized => "sanitized",
        }
    }
}

/// Read a whole request body, failing past `limit` bytes
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes, BodyError> {
    Ok(to_bytes(body, limit).await?)
}

impl GuardState {
    /// Read `body` and run the validator selected by `kind`.
    ///
    /// An unreadable body is reported exactly like an unparseable one.
    pub async fn validate(
        &self,
        kind: ValidationKind,
        body: Body,
        resource_type: &str,
    ) -> ValidationResult {
        let result = match read_body(body, self.config.max_body_bytes).await {
            Ok(raw) => match kind {
                ValidationKind::Single => self.validator.validate_request(&raw, resource_type),
                ValidationKind::Bulk => self.validator.validate_bulk_request(&raw, resource_type),
                ValidationKind::Sanitized => {
                    self.validator.validate_and_sanitize(&raw, resource_type)
                }
            },
            Err(err) => {
                tracing::debug!(
                    kind = kind.as_str(),
                    resource_type,
                    error = %err,
                    "request body could not be read"
                );
                ValidationResult::malformed()
            }
        };

        if self.config.metrics_enabled {
            metrics::record(kind, &result);
        }
        result
    }

    pub async fn validate_request_body(&self, body: Body, resource_type: &str) -> ValidationResult {
        self.validate(ValidationKind::Single, body, resource_type).await
    }

    pub async fn validate_bulk_request_body(
        &self,
        body: Body,
        resource_type: &str,
    ) -> ValidationResult {
        self.validate(ValidationKind::Bulk, body, resource_type).await
    }

    pub async fn validate_and_sanitize_body(
        &self,
        body: Body,
        resource_type: &str,
    ) -> ValidationResult {
        self.validate(ValidationKind::Sanitized, body, resource_type).await
    }
}
