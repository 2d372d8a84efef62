use serde::{Deserialize, Serialize};

/// Resolver limits.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Maximum number of fetch rounds before giving up.
    pub max_rounds: usize,
    /// Fail with `RecordNotFound` when the store does not return a
    /// requested record, instead of leaving it out of the result.
    pub fail_on_missing: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_rounds: 64,
            fail_on_missing: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.max_rounds, 64);
        assert!(!config.fail_on_missing);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ResolverConfig = toml::from_str("fail_on_missing = true").unwrap();
        assert!(config.fail_on_missing);
        assert_eq!(config.max_rounds, 64);
    }
}
