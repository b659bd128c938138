//! Reconcilers: one per entity kind, each driving create/read/update/delete.
//!
//! A reconciler holds nothing between calls except the shared `Client` bound
//! by `configure`. Every lifecycle call receives the host's `Diagnostics`
//! and always returns; failures are recorded there, never raised.

use std::any::Any;
use std::sync::Arc;

use dataminded_core::Client;

use crate::diagnostics::Diagnostics;
use crate::schema::Schema;

pub mod chapter;
pub mod chapter_member;
pub mod user;

pub use chapter::{ChapterModel, ChapterResource};
pub use chapter_member::{ChapterMemberModel, ChapterMemberResource};
pub use user::{UserModel, UserResource};

/// Whatever the provider hands to its resources after configuration. The
/// Data Minded provider always hands over a `Client`.
pub type ProviderData = Arc<dyn Any + Send + Sync>;

/// What the host should do with a resource after `read`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadState<M> {
    /// Keep the resource with these attributes.
    Present(M),
    /// The remote entity is gone; drop the resource from state entirely.
    Removed,
}

impl<M> ReadState<M> {
    pub fn is_removed(&self) -> bool {
        matches!(self, ReadState::Removed)
    }

    pub fn present(self) -> Option<M> {
        match self {
            ReadState::Present(model) => Some(model),
            ReadState::Removed => None,
        }
    }
}

pub trait Reconciler: Send + Sync {
    /// Attribute set exchanged with the host as plan and state.
    type Model;

    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Bind the provider's client. `None` means the provider is not
    /// configured yet and is ignored.
    fn configure(&mut self, provider_data: Option<&ProviderData>, diags: &mut Diagnostics);

    /// Returns the new state, or `None` when nothing may be written.
    fn create(&self, plan: Self::Model, diags: &mut Diagnostics) -> Option<Self::Model>;

    /// On failure the prior state comes back unchanged next to an error.
    fn read(&self, state: Self::Model, diags: &mut Diagnostics) -> ReadState<Self::Model>;

    /// Identity comes from `state`, everything else from `plan`.
    fn update(
        &self,
        state: Self::Model,
        plan: Self::Model,
        diags: &mut Diagnostics,
    ) -> Option<Self::Model>;

    fn delete(&self, state: Self::Model, diags: &mut Diagnostics);
}

/// The client a reconciler was configured with.
#[derive(Debug, Clone, Default)]
pub(crate) struct Binding {
    client: Option<Arc<Client>>,
}

impl Binding {
    pub(crate) fn configure(&mut self, provider_data: Option<&ProviderData>, diags: &mut Diagnostics) {
        let Some(data) = provider_data else {
            return;
        };
        match Arc::clone(data).downcast::<Client>() {
            Ok(client) => self.client = Some(client),
            Err(_) => diags.add_error(
                "Unexpected Configure Type",
                "Expected provider data of type dataminded_core::Client. \
                 Please report this issue to the provider developers.",
            ),
        }
    }

    /// The bound client, or an error diagnostic when `configure` never ran.
    pub(crate) fn client(&self, type_name: &str, diags: &mut Diagnostics) -> Option<&Client> {
        if self.client.is_none() {
            diags.add_error(
                "Unconfigured resource",
                format!("{type_name} was used before the provider was configured"),
            );
        }
        self.client.as_deref()
    }
}

pub(crate) fn missing_identity(type_name: &str, diags: &mut Diagnostics) {
    diags.add_error(
        "Missing resource identity",
        format!("{type_name} state has no id; it was never created or its state is corrupt"),
    );
}
