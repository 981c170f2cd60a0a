//! Request-scoped validation types.
//!
//! Everything here lives for exactly one request: it is built while the
//! body is checked and dropped once the response has been produced.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name used for failures that do not belong to a single input field
/// (malformed body, unknown resource type, collaborator failure).
pub const GENERAL_FIELD: &str = "_general";

/// Message reported for any body that could not be read or parsed, and for
/// any collaborator failure.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// A single field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Error attached to the `_general` sentinel field
    pub fn general(message: impl Into<String>) -> Self {
        Self::new(GENERAL_FIELD, message)
    }

    pub fn is_general(&self) -> bool {
        self.field == GENERAL_FIELD
    }
}

/// Outcome of validating one request body.
///
/// A valid result carries the parsed body, an invalid one carries the
/// errors. Sanitized data only ever appears in a `Valid` result produced
/// after every check has passed.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid { data: Value },
    Invalid { errors: Vec<ValidationError> },
}

impl ValidationResult {
    pub fn valid(data: Value) -> Self {
        ValidationResult::Valid { data }
    }

    pub fn invalid(errors: Vec<ValidationError>) -> Self {
        ValidationResult::Invalid { errors }
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::invalid(vec![ValidationError::new(field, message)])
    }

    /// The result for an unreadable body or a failing collaborator
    pub fn malformed() -> Self {
        Self::invalid(vec![ValidationError::general(INVALID_BODY_MESSAGE)])
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            ValidationResult::Valid { data } => Some(data),
            ValidationResult::Invalid { .. } => None,
        }
    }

    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ValidationResult::Valid { .. } => &[],
            ValidationResult::Invalid { errors } => errors,
        }
    }

    pub fn into_result(self) -> Result<Value, Vec<ValidationError>> {
        match self {
            ValidationResult::Valid { data } => Ok(data),
            ValidationResult::Invalid { errors } => Err(errors),
        }
    }

    /// Apply `f` to the data of a valid result; invalid results pass through.
    pub fn map_data<F>(self, f: F) -> Self
    where
        F: FnOnce(Value) -> Value,
    {
        match self {
            ValidationResult::Valid { data } => ValidationResult::Valid { data: f(data) },
            invalid => invalid,
        }
    }
}

impl From<Result<Value, Vec<ValidationError>>> for ValidationResult {
    fn from(result: Result<Value, Vec<ValidationError>>) -> Self {
        match result {
            Ok(data) => ValidationResult::Valid { data },
            Err(errors) => ValidationResult::Invalid { errors },
        }
    }
}

/// Typed view of a bulk action body: `{action, ids, data?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkRequestBody {
    pub action: String,
    pub ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl BulkRequestBody {
    /// Narrow the data of a valid bulk result into its typed form.
    ///
    /// The bulk validator only checks that `ids` is a non-empty array, so
    /// this fails when an id is not a string.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Opaque rule document handed from the schema lookup to the field checker
pub type FieldSchema = Value;

/// Failing fields reported by the field checker, in check order
pub type FieldFailures = Vec<(String, String)>;

/// Answer from the bulk action checker
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BulkActionVerdict {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BulkActionVerdict {
    pub fn accept() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn reject(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }

    /// Rejection without a reason; reported as "Invalid action"
    pub fn reject_silently() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_result() {
        let result = ValidationResult::malformed();
        assert!(!result.is_valid());
        assert!(result.data().is_none());
        assert_eq!(result.errors().len(), 1);
        assert!(result.errors()[0].is_general());
        assert_eq!(result.errors()[0].message, "Invalid request body");
    }

    #[test]
    fn test_valid_result_has_no_errors() {
        let result = ValidationResult::valid(json!({"name": "Mug"}));
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
        assert_eq!(result.data(), Some(&json!({"name": "Mug"})));
    }

    #[test]
    fn test_map_data_skips_invalid() {
        let result = ValidationResult::single("name", "Required").map_data(|_| json!("changed"));
        assert_eq!(result.errors()[0].field, "name");
        assert!(result.data().is_none());
    }

    #[test]
    fn test_bulk_body_from_value() {
        let body = BulkRequestBody::from_value(json!({
            "action": "delete",
            "ids": ["id1", "id2"]
        }))
        .unwrap();
        assert_eq!(body.action, "delete");
        assert_eq!(body.ids, vec!["id1", "id2"]);
        assert!(body.data.is_none());

        assert!(BulkRequestBody::from_value(json!({"action": "delete", "ids": [1]})).is_err());
    }

    #[test]
    fn test_verdict_serialization() {
        let verdict: BulkActionVerdict = serde_json::from_value(json!({"valid": true})).unwrap();
        assert_eq!(verdict, BulkActionVerdict::accept());
        assert_eq!(
            serde_json::to_value(BulkActionVerdict::reject("locked")).unwrap(),
            json!({"valid": false, "error": "locked"})
        );
    }
}
