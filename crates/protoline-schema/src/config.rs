/// Controls how the registry normalizes errors into throwable messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, `source()` chains are carried as nested causes.
    pub capture_cause_chain: bool,
    /// Maximum number of nested causes kept below the root error.
    pub max_cause_depth: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capture_cause_chain: true,
            max_cause_depth: 16,
        }
    }
}
