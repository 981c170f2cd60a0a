/// Default body read limit (2 MiB)
const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Runtime switches for the validation layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Bodies larger than this are treated as unreadable
    pub max_body_bytes: usize,
    /// Whether `ValidatedJson` sanitizes accepted bodies
    pub sanitize: bool,
    pub metrics_enabled: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            sanitize: true,
            metrics_enabled: true,
        }
    }
}

impl ValidationConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(limit_str) = lookup("VALIDATION_MAX_BODY_BYTES") {
            if let Ok(limit) = limit_str.trim().parse::<usize>() {
                config.max_body_bytes = limit;
            }
        }

        if let Some(flag) = lookup("VALIDATION_SANITIZE") {
            if let Some(enabled) = parse_flag(&flag) {
                config.sanitize = enabled;
            }
        }

        if let Some(flag) = lookup("VALIDATION_METRICS_ENABLED") {
            if let Some(enabled) = parse_flag(&flag) {
                config.metrics_enabled = enabled;
            }
        }

        tracing::info!(
            "Validation config loaded: max_body_bytes={}, sanitize={}, metrics_enabled={}",
            config.max_body_bytes,
            config.sanitize,
            config.metrics_enabled
        );

        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
