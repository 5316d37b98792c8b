//! Pipeline configuration

/// Default base namespace for generated identifiers
pub const DEFAULT_BASE_NAMESPACE: &str = "https://mica.example.org/kb";

/// Environment variable overriding the base namespace
pub const BASE_NAMESPACE_ENV: &str = "MICA_BASE_NAMESPACE";

/// Configuration for identifier generation during processing
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Base namespace every document identifier is scoped under
    pub base_namespace: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            base_namespace: DEFAULT_BASE_NAMESPACE.to_string(),
        }
    }
}

impl ProcessorConfig {
    /// Create a config with an explicit base namespace
    pub fn new(base_namespace: impl Into<String>) -> Self {
        Self {
            base_namespace: base_namespace.into(),
        }
    }

    /// Default config with the `MICA_BASE_NAMESPACE` environment override
    /// applied when present
    pub fn from_env() -> Self {
        match std::env::var(BASE_NAMESPACE_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::new(value.trim()),
            _ => Self::default(),
        }
    }
}
