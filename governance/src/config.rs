//! Governance configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::GovernanceError;

/// Voting window used when none is configured: five minutes.
pub const DEFAULT_VOTING_WINDOW_SECS: u64 = 5 * 60;

/// Configuration for a governance engine.
///
/// Can be loaded from a TOML file via [`GovernanceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Seconds between a proposal's creation and its deadline.
    #[serde(default = "default_voting_window_secs")]
    pub voting_window_secs: u64,
}

fn default_voting_window_secs() -> u64 {
    DEFAULT_VOTING_WINDOW_SECS
}

impl GovernanceConfig {
    pub fn with_voting_window(secs: u64) -> Self {
        Self {
            voting_window_secs: secs,
        }
    }

    pub fn voting_window(&self) -> Duration {
        Duration::from_secs(self.voting_window_secs)
    }

    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.voting_window_secs == 0 {
            return Err(GovernanceError::Config(
                "voting_window_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, GovernanceError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GovernanceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        let config: Self = toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("GovernanceConfig is always serializable to TOML")
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            voting_window_secs: default_voting_window_secs(),
        }
    }
}
