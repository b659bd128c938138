//! Provider-level configuration: where the Data Minded API runs.

use dataminded_core::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagnostics::Diagnostics;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid provider configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The `provider "dataminded" { host = ..., port = ... }` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Host address, optionally with scheme, e.g. `http://localhost`.
    pub host: String,
    pub port: i64,
}

impl ProviderConfig {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        Ok(Self::deserialize(value)?)
    }

    /// Record every problem as an attribute error. Returns `true` when the
    /// configuration is usable.
    pub fn validate(&self, diags: &mut Diagnostics) -> bool {
        let mut ok = true;
        if self.host.trim().is_empty() {
            diags.add_attribute_error("host", "Invalid host", "host must not be empty");
            ok = false;
        }
        if u16::try_from(self.port).map_or(true, |p| p == 0) {
            diags.add_attribute_error(
                "port",
                "Invalid port",
                format!("port must be between 1 and 65535, got {}", self.port),
            );
            ok = false;
        }
        ok
    }

    /// The connection described by this configuration, if it validates.
    pub fn connection(&self, diags: &mut Diagnostics) -> Option<Connection> {
        if !self.validate(diags) {
            return None;
        }
        let port = u16::try_from(self.port).ok()?;
        Some(Connection::new(self.host.trim(), port))
    }
}
