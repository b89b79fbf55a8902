//! Configuration for the query subsystem.

use serde::{Deserialize, Serialize};
use shared_bus::InMemoryEventBus;
use thiserror::Error;

/// Invalid configuration, caught at startup rather than per request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Hard caps on bulk lookup endpoints.
///
/// These protect the node from pathological queries; callers that need
/// more results page with the `lower_bound` parameters instead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupLimits {
    /// Maximum results one `lookup_accounts` call may request.
    pub max_account_lookup: u32,
    /// Maximum results one `list_assets` call may request.
    pub max_asset_lookup: u32,
}

impl Default for LookupLimits {
    fn default() -> Self {
        Self {
            max_account_lookup: 1000,
            max_asset_lookup: 100,
        }
    }
}

/// Settings for the commit-event channel the subsystem listens on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Capacity of the broadcast channel between the validation pipeline
    /// and this subsystem. Commits beyond this backlog lag the listener.
    pub channel_capacity: usize,
}

impl BusConfig {
    /// Build a commit-event bus sized for this configuration.
    #[must_use]
    pub fn build_bus(&self) -> InMemoryEventBus {
        InMemoryEventBus::with_capacity(self.channel_capacity)
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Top-level configuration for the query API service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryApiConfig {
    pub limits: LookupLimits,
    pub bus: BusConfig,
}

impl QueryApiConfig {
    /// Validate the configuration, returning an error describing the
    /// first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_account_lookup == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.max_account_lookup".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.limits.max_asset_lookup == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.max_asset_lookup".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.bus.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "bus.channel_capacity".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
