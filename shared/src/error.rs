use thiserror::Error;

/// Failure reported by one of the external collaborators.
///
/// The validators never surface these to clients; they are logged and
/// downgraded to the generic `_general` error.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("schema lookup failed: {0}")]
    SchemaLookup(String),

    #[error("field check failed: {0}")]
    FieldCheck(String),

    #[error("bulk action check failed: {0}")]
    BulkAction(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("document contains a cycle and cannot be converted to JSON")]
    Cycle,

    #[error("document is not an array")]
    NotAnArray,

    #[error("document is not an object")]
    NotAnObject,
}
