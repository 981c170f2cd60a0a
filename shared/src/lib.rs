pub mod bulk;
pub mod document;
pub mod error;
pub mod models;
pub mod sanitizer;
pub mod schema;
pub mod validator;

pub use document::*;
pub use error::*;
pub use models::*;
pub use sanitizer::{sanitize, sanitize_document, sanitize_json_value, sanitize_str};
pub use schema::*;
pub use validator::RequestValidator;
