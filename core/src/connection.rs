use serde::{Deserialize, Serialize};

/// Where the Data Minded API lives. Built once per provider configuration
/// and shared read-only by every entity client call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub host: String,
    pub port: u16,
}

impl Connection {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `scheme://host:port` with no trailing slash. Hosts given without a
    /// scheme are assumed to be plain HTTP.
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.contains("://") {
            format!("{host}:{}", self.port)
        } else {
            format!("http://{host}:{}", self.port)
        }
    }
}
