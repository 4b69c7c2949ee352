//! Load generation configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};

/// Upper bound for the worker pool
const MAX_CONCURRENCY: usize = 1024;

/// Load generator settings shared by every scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Maximum number of requests in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

impl Validatable for LoadConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.concurrency, "concurrency", self.domain_name())?;

        if self.concurrency > MAX_CONCURRENCY {
            return Err(self.validation_error(format!(
                "concurrency cannot exceed {}, got {}",
                MAX_CONCURRENCY, self.concurrency
            )));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "load"
    }
}

fn default_concurrency() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_validation() {
        let mut config = LoadConfig::default();
        assert_eq!(config.concurrency, 10);
        assert!(config.validate().is_ok());

        config.concurrency = 0;
        assert!(config.validate().is_err());

        config.concurrency = MAX_CONCURRENCY + 1;
        assert!(config.validate().is_err());
    }
}
