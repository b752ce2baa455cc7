use serde::{Deserialize, Serialize};
use std::fmt;

/// Environment variable consulted when no API key is stored in settings
pub const API_KEY_ENV_VAR: &str = "DEEPID_API_KEY";

/// Default number of status queries before giving up on a job
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Default pause between status queries, in seconds
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 5;

/// Default directory for JSON artifacts and the CSV ledger
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// File name of the batch ledger inside the results directory
pub const LEDGER_FILE_NAME: &str = "results.csv";

/// DeepID deployment to talk to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Most reliable models
    #[default]
    Production,
    /// Pre-release models, for testing integrations
    Staging,
}

impl Environment {
    /// Get the string identifier for this environment
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
        }
    }

    /// Base URL of the REST API for this environment
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://api.deepidentify.ai",
            Environment::Staging => "https://staging-api.deepidentify.ai",
        }
    }

    /// List all available environments
    pub fn all() -> &'static [Environment] {
        &[Environment::Production, Environment::Staging]
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "staging" | "stage" => Ok(Environment::Staging),
            _ => Err(format!(
                "Unknown environment: {}. Available: production, staging",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse_aliases() {
        assert_eq!("PROD".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("staging".parse::<Environment>(), Ok(Environment::Staging));
        assert!("dev".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_serde_lowercase() {
        let json = serde_json::to_string(&Environment::Staging).unwrap();
        assert_eq!(json, "\"staging\"");
    }
}
