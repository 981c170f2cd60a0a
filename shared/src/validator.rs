//! Single-resource request validation
//!
//! `RequestValidator` is the boundary between untrusted request bodies and
//! resource handlers. Every entry point returns a [`ValidationResult`]:
//! collaborator errors and collaborator panics are logged and reported as
//! the generic `_general` error, never propagated.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use crate::error::CollaboratorError;
use crate::models::{ValidationError, ValidationResult};
use crate::sanitizer::sanitize;
use crate::schema::{BulkActionChecker, FieldChecker, SchemaLookup};

/// Why a check sequence stopped
#[derive(Debug)]
pub(crate) enum Rejection {
    /// Unreadable body or failing collaborator
    Malformed,
    Invalid(Vec<ValidationError>),
}

impl Rejection {
    pub(crate) fn single(field: &str, message: impl Into<String>) -> Self {
        Rejection::Invalid(vec![ValidationError::new(field, message)])
    }
}

impl From<CollaboratorError> for Rejection {
    fn from(err: CollaboratorError) -> Self {
        tracing::warn!(error = %err, "validation collaborator failed");
        Rejection::Malformed
    }
}

pub(crate) fn parse_body(raw: &[u8]) -> Result<Value, Rejection> {
    serde_json::from_slice(raw).map_err(|err| {
        tracing::debug!(error = %err, "request body is not valid JSON");
        Rejection::Malformed
    })
}

/// Run a check sequence, turning every failure mode into a result.
pub(crate) fn guarded<F>(kind: &'static str, resource_type: &str, check: F) -> ValidationResult
where
    F: FnOnce() -> Result<Value, Rejection>,
{
    match panic::catch_unwind(AssertUnwindSafe(check)) {
        Ok(Ok(data)) => ValidationResult::valid(data),
        Ok(Err(Rejection::Malformed)) => {
            tracing::debug!(kind, resource_type, "request body rejected");
            ValidationResult::malformed()
        }
        Ok(Err(Rejection::Invalid(errors))) => {
            tracing::debug!(
                kind,
                resource_type,
                errors = errors.len(),
                "request failed validation"
            );
            ValidationResult::invalid(errors)
        }
        Err(_) => {
            tracing::warn!(kind, resource_type, "validation collaborator panicked");
            ValidationResult::malformed()
        }
    }
}

/// Validates request bodies against the external schema registry
#[derive(Clone)]
pub struct RequestValidator {
    pub(crate) schemas: Arc<dyn SchemaLookup>,
    pub(crate) fields: Arc<dyn FieldChecker>,
    pub(crate) bulk_actions: Arc<dyn BulkActionChecker>,
}

impl RequestValidator {
    pub fn new(
        schemas: Arc<dyn SchemaLookup>,
        fields: Arc<dyn FieldChecker>,
        bulk_actions: Arc<dyn BulkActionChecker>,
    ) -> Self {
        Self {
            schemas,
            fields,
            bulk_actions,
        }
    }

    /// Build from one registry object that provides all three contracts
    pub fn from_registry<R>(registry: Arc<R>) -> Self
    where
        R: SchemaLookup + FieldChecker + BulkActionChecker + 'static,
    {
        Self {
            schemas: registry.clone(),
            fields: registry.clone(),
            bulk_actions: registry,
        }
    }

    /// Parse `raw` and check it against the schema of `resource_type`.
    ///
    /// A valid result carries the parsed body as received (not sanitized).
    pub fn validate_request(&self, raw: &[u8], resource_type: &str) -> ValidationResult {
        guarded("single", resource_type, || {
            self.check_request(raw, resource_type)
        })
    }

    /// [`validate_request`](Self::validate_request), then sanitize the
    /// accepted body. Invalid results are returned untouched.
    pub fn validate_and_sanitize(&self, raw: &[u8], resource_type: &str) -> ValidationResult {
        self.validate_request(raw, resource_type).map_data(sanitize)
    }

    fn check_request(&self, raw: &[u8], resource_type: &str) -> Result<Value, Rejection> {
        let body = parse_body(raw)?;

        let schema = match self.schemas.get_validation_schema(resource_type)? {
            Some(schema) if !schema.is_empty() => schema,
            _ => {
                return Err(Rejection::Invalid(vec![ValidationError::general(format!(
                    "No validation schema found for {}",
                    resource_type
                ))]))
            }
        };

        let failures = self.fields.validate_form_data(&body, &schema)?;
        if !failures.is_empty() {
            let errors = failures
                .into_iter()
                .map(|(field, message)| ValidationError::new(field, message))
                .collect();
            return Err(Rejection::Invalid(errors));
        }

        Ok(body)
    }
}

impl fmt::Debug for RequestValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestValidator").finish_non_exhaustive()
    }
}
