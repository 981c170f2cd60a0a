use std::sync::Arc;

use guard_shared::RequestValidator;

use crate::config::ValidationConfig;

/// Validation state shared across handlers
///
/// Routers that carry their own state expose this through
/// `axum::extract::FromRef`.
#[derive(Clone, Debug)]
pub struct GuardState {
    pub validator: RequestValidator,
    pub config: Arc<ValidationConfig>,
}

impl GuardState {
    pub fn new(validator: RequestValidator, config: ValidationConfig) -> Self {
        Self {
            validator,
            config: Arc::new(config),
        }
    }

    pub fn from_env(validator: RequestValidator) -> Self {
        Self::new(validator, ValidationConfig::from_env())
    }
}
