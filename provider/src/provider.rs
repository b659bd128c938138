//! The `dataminded` provider: configuration and its resource set.

use std::sync::Arc;

use dataminded_core::{Client, Transport, UreqTransport};
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::diagnostics::Diagnostics;
use crate::resource::{
    ChapterMemberResource, ChapterResource, ProviderData, Reconciler, UserResource,
};
use crate::schema::{Attribute, AttributeKind, Schema};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    /// `dev` for local builds, a release number otherwise.
    pub version: String,
}

impl Provider {
    pub const TYPE_NAME: &'static str = "dataminded";

    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    pub fn schema(&self) -> Schema {
        Schema::new("Interact with the Data Minded API")
            .with_attribute(Attribute::required(
                "host",
                AttributeKind::String,
                "Host of the Data Minded API, e.g. http://localhost",
            ))
            .with_attribute(Attribute::required(
                "port",
                AttributeKind::Int64,
                "Port the Data Minded API listens on",
            ))
    }

    /// Build the shared client from the provider block. Returns `None` with
    /// error diagnostics when the configuration is unusable.
    pub fn configure(&self, config: &Value, diags: &mut Diagnostics) -> Option<ProviderData> {
        self.configure_with_transport(config, Arc::new(UreqTransport::new()), diags)
    }

    pub fn configure_with_transport(
        &self,
        config: &Value,
        transport: Arc<dyn Transport>,
        diags: &mut Diagnostics,
    ) -> Option<ProviderData> {
        let config = match ProviderConfig::from_value(config) {
            Ok(config) => config,
            Err(err) => {
                diags.add_error("Invalid provider configuration", err.to_string());
                return None;
            }
        };
        let connection = config.connection(diags)?;

        tracing::info!(
            version = %self.version,
            base_url = %connection.base_url(),
            "configured dataminded provider"
        );
        let client = Client::with_transport(connection, transport);
        Some(Arc::new(client))
    }

    pub fn resources(&self) -> Resources {
        Resources::default()
    }
}

/// One reconciler per resource type the provider offers.
#[derive(Debug, Default)]
pub struct Resources {
    pub user: UserResource,
    pub chapter: ChapterResource,
    pub chapter_member: ChapterMemberResource,
}

impl Resources {
    pub fn configure_all(&mut self, provider_data: Option<&ProviderData>, diags: &mut Diagnostics) {
        self.user.configure(provider_data, diags);
        self.chapter.configure(provider_data, diags);
        self.chapter_member.configure(provider_data, diags);
    }

    pub fn type_names(&self) -> [&'static str; 3] {
        [
            self.user.type_name(),
            self.chapter.type_name(),
            self.chapter_member.type_name(),
        ]
    }
}
