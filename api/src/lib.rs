pub mod config;
pub mod error;
pub mod metrics;
pub mod state;
pub mod validation;

pub use config::ValidationConfig;
pub use error::BodyError;
pub use state::GuardState;
pub use validation::*;

pub use guard_shared as shared;
