use guard_shared::ValidationResult;
use once_cell::sync::Lazy;
use prometheus::{opts, Encoder, IntCounterVec, Registry, TextEncoder};

use crate::validation::ValidationKind;

macro_rules! counter_vec {
    ($name:expr, $help:expr, $labels:expr) => {
        Lazy::new(|| IntCounterVec::new(opts!($name, $help), $labels).unwrap())
    };
}

pub static VALIDATION_REQUESTS_TOTAL: Lazy<IntCounterVec> = counter_vec!(
    "validation_requests_total",
    "Validated request bodies by validator kind and outcome",
    &["kind", "outcome"]
);
pub static VALIDATION_ERRORS_TOTAL: Lazy<IntCounterVec> = counter_vec!(
    "validation_errors_total",
    "Field errors reported to clients",
    &["kind"]
);

pub fn register_all(registry: &Registry) -> prometheus::Result<()> {
    registry.register(Box::new(VALIDATION_REQUESTS_TOTAL.clone()))?;
    registry.register(Box::new(VALIDATION_ERRORS_TOTAL.clone()))?;
    Ok(())
}

pub fn record(kind: ValidationKind, result: &ValidationResult) {
    let outcome = if result.is_valid() { "valid" } else { "invalid" };
    VALIDATION_REQUESTS_TOTAL
        .with_label_values(&[kind.as_str(), outcome])
        .inc();
    if !result.is_valid() {
        VALIDATION_ERRORS_TOTAL
            .with_label_values(&[kind.as_str()])
            .inc_by(result.errors().len() as u64);
    }
}

/// Render a registry in the Prometheus text format
pub fn render(registry: &Registry) -> String {
    let mut buffer = Vec::new();
    if let Err(err) = TextEncoder::new().encode(&registry.gather(), &mut buffer) {
        tracing::warn!(error = %err, "failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
