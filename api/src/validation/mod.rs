//! Request validation for resource handlers
//!
//! Bodies are checked before any resource handler runs. Two integration
//! styles are provided:
//!
//! 1. **Adapters** - `with_validation`, `with_bulk_validation` and
//!    `with_sanitized_validation` wrap a `(Parts, Value)` handler
//! 2. **Extractors** - `ValidatedJson<R>` and `ValidatedBulk<R>` for
//!    handlers written against typed bodies
//!
//! # Usage
//!
//! ```ignore
//! use crate::validation::{with_validation, ValidatedJson, Resource};
//!
//! let guard = GuardState::from_env(validator);
//! let app = Router::new()
//!     .route("/api/products", post(with_validation(guard.clone(), "product", create_product)))
//!     .route("/api/users", post(create_user))
//!     .with_state(guard);
//! ```
//!
//! ## Validation Error Response
//!
//! Every rejection is a 400 Bad Request:
//!
//! ```json
//! {
//!   "success": false,
//!   "message": "Validation failed",
//!   "errors": {
//!     "name": "Required",
//!     "price": "Must be positive"
//!   }
//! }
//! ```
//!
//! Malformed bodies, unknown resource types and registry failures are
//! reported under the `_general` field.

pub mod extractors;
pub mod middleware;
pub mod pipeline;
pub mod responder;

pub use extractors::{Resource, ValidatedBulk, ValidatedJson};
pub use middleware::{
    with_bulk_validation, with_sanitized_validation, with_validation, ResponseFuture,
};
pub use pipeline::{read_body, ValidationKind};
pub use responder::{
    create_validation_error_response, ValidationErrorResponse, ValidationRejection,
    VALIDATION_FAILED,
};
