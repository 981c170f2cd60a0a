//! Contracts for the external schema registry.
//!
//! The registry itself (rule definitions, per-resource bulk action rules)
//! lives elsewhere. The validators only depend on these traits, so any
//! registry, or a test double, can be plugged in.

use serde_json::Value;

#[cfg(test)]
use mockall::automock;

use crate::error::CollaboratorError;
use crate::models::{BulkActionVerdict, FieldFailures, FieldSchema};

/// Resolves the field rules registered for a resource type
#[cfg_attr(test, automock)]
pub trait SchemaLookup: Send + Sync {
    /// `Ok(None)` and `Ok(Some(vec![]))` both mean "no schema registered".
    fn get_validation_schema(
        &self,
        resource_type: &str,
    ) -> Result<Option<Vec<FieldSchema>>, CollaboratorError>;
}

/// Applies field rules to a parsed body
pub trait FieldChecker: Send + Sync {
    /// Returns only the failing fields, as `(field, message)` pairs.
    fn validate_form_data(
        &self,
        body: &Value,
        schema: &[FieldSchema],
    ) -> Result<FieldFailures, CollaboratorError>;
}

/// Decides whether a bulk action is legal for a resource type
pub trait BulkActionChecker: Send + Sync {
    fn validate_bulk_action(
        &self,
        action: &str,
        resource_type: &str,
        data: Option<&Value>,
    ) -> Result<BulkActionVerdict, CollaboratorError>;
}

impl<F> SchemaLookup for F
where
    F: Fn(&str) -> Result<Option<Vec<FieldSchema>>, CollaboratorError> + Send + Sync,
{
    fn get_validation_schema(
        &self,
        resource_type: &str,
    ) -> Result<Option<Vec<FieldSchema>>, CollaboratorError> {
        self(resource_type)
    }
}

impl<F> FieldChecker for F
where
    F: Fn(&Value, &[FieldSchema]) -> Result<FieldFailures, CollaboratorError> + Send + Sync,
{
    fn validate_form_data(
        &self,
        body: &Value,
        schema: &[FieldSchema],
    ) -> Result<FieldFailures, CollaboratorError> {
        self(body, schema)
    }
}

impl<F> BulkActionChecker for F
where
    F: Fn(&str, &str, Option<&Value>) -> Result<BulkActionVerdict, CollaboratorError>
        + Send
        + Sync,
{
    fn validate_bulk_action(
        &self,
        action: &str,
        resource_type: &str,
        data: Option<&Value>,
    ) -> Result<BulkActionVerdict, CollaboratorError> {
        self(action, resource_type, data)
    }
}
