//! Bulk action request validation
//!
//! Bulk bodies have the shape `{action, ids, data?}`. Checks run in a fixed
//! order and stop at the first failure: action shape, then ids shape, then
//! the registry's verdict on the action itself.

use serde_json::Value;

use crate::models::ValidationResult;
use crate::validator::{guarded, parse_body, Rejection, RequestValidator};

pub const ACTION_FIELD: &str = "action";
pub const IDS_FIELD: &str = "ids";

const ACTION_REQUIRED: &str = "Action is required and must be a string";
const ACTION_EMPTY: &str = "Action is required and must not be empty";
const IDS_REQUIRED: &str = "IDs must be a non-empty array";
const INVALID_ACTION: &str = "Invalid action";

impl RequestValidator {
    /// Parse `raw` as a bulk action body and check it for `resource_type`.
    ///
    /// A valid result carries the full body, `data` included.
    pub fn validate_bulk_request(&self, raw: &[u8], resource_type: &str) -> ValidationResult {
        guarded("bulk", resource_type, || {
            self.check_bulk_request(raw, resource_type)
        })
    }

    fn check_bulk_request(&self, raw: &[u8], resource_type: &str) -> Result<Value, Rejection> {
        let body = parse_body(raw)?;

        let verdict = {
            // `null` cannot be destructured at all; any other non-object
            // simply has no action.
            let fields = match &body {
                Value::Null => return Err(Rejection::Malformed),
                Value::Object(map) => Some(map),
                _ => None,
            };

            let action = match fields.and_then(|map| map.get(ACTION_FIELD)) {
                Some(Value::String(action)) if !action.is_empty() => action.as_str(),
                Some(Value::String(_)) => return Err(Rejection::single(ACTION_FIELD, ACTION_EMPTY)),
                _ => return Err(Rejection::single(ACTION_FIELD, ACTION_REQUIRED)),
            };

            match fields.and_then(|map| map.get(IDS_FIELD)) {
                Some(Value::Array(ids)) if !ids.is_empty() => {}
                _ => return Err(Rejection::single(IDS_FIELD, IDS_REQUIRED)),
            }

            let data = fields.and_then(|map| map.get("data"));
            self.bulk_actions
                .validate_bulk_action(action, resource_type, data)?
        };

        if !verdict.valid {
            let message = verdict.error.unwrap_or_else(|| INVALID_ACTION.to_string());
            return Err(Rejection::single(ACTION_FIELD, message));
        }

        Ok(body)
    }
}
