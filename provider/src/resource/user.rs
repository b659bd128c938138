//! `dataminded_user`: a user of the Data Minded API.

use dataminded_core::{UserAttributes, UserKind};
use serde::{Deserialize, Serialize};

use super::{missing_identity, Binding, ProviderData, ReadState, Reconciler};
use crate::diagnostics::Diagnostics;
use crate::schema::{Attribute, AttributeKind, Schema};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModel {
    /// Assigned by the service on create.
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct UserResource {
    binding: Binding,
}

impl UserResource {
    pub const TYPE_NAME: &'static str = "dataminded_user";

    pub fn new() -> Self {
        Self::default()
    }
}

impl Reconciler for UserResource {
    type Model = UserModel;

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Manage Data Minded users")
            .with_attribute(Attribute::computed(
                "id",
                AttributeKind::Int64,
                "Id of the user in the Data Minded API",
            ))
            .with_attribute(Attribute::required(
                "name",
                AttributeKind::String,
                "Name of the user",
            ))
    }

    fn configure(&mut self, provider_data: Option<&ProviderData>, diags: &mut Diagnostics) {
        self.binding.configure(provider_data, diags);
    }

    fn create(&self, plan: UserModel, diags: &mut Diagnostics) -> Option<UserModel> {
        let client = self.binding.client(Self::TYPE_NAME, diags)?;
        let draft = UserAttributes {
            name: plan.name.clone(),
        };

        let user = match client.create::<UserKind>(&draft) {
            Ok(user) => user,
            Err(err) => {
                diags.add_api_error("User creation failed", &err);
                return None;
            }
        };

        tracing::info!(id = user.id, "created user");
        Some(UserModel {
            id: Some(user.id),
            ..plan
        })
    }

    fn read(&self, state: UserModel, diags: &mut Diagnostics) -> ReadState<UserModel> {
        let Some(client) = self.binding.client(Self::TYPE_NAME, diags) else {
            return ReadState::Present(state);
        };
        let Some(id) = state.id else {
            missing_identity(Self::TYPE_NAME, diags);
            return ReadState::Present(state);
        };

        let outcome = match client.read::<UserKind>(&id) {
            Ok(outcome) => outcome,
            Err(err) => {
                diags.add_api_error("Reading user failed", &err);
                return ReadState::Present(state);
            }
        };

        match outcome.into_option() {
            Some(user) => ReadState::Present(UserModel {
                id: state.id,
                name: user.name,
            }),
            None => {
                tracing::info!(id, "user no longer exists, removing from state");
                ReadState::Removed
            }
        }
    }

    fn update(&self, state: UserModel, plan: UserModel, diags: &mut Diagnostics) -> Option<UserModel> {
        let client = self.binding.client(Self::TYPE_NAME, diags)?;
        let Some(id) = state.id else {
            missing_identity(Self::TYPE_NAME, diags);
            return None;
        };
        let patch = UserAttributes { name: plan.name };

        match client.update::<UserKind>(&id, &patch) {
            Ok(user) => Some(UserModel {
                id: Some(id),
                name: user.name,
            }),
            Err(err) => {
                diags.add_api_error("Updating user failed", &err);
                None
            }
        }
    }

    fn delete(&self, state: UserModel, diags: &mut Diagnostics) {
        let Some(client) = self.binding.client(Self::TYPE_NAME, diags) else {
            return;
        };
        let Some(id) = state.id else {
            missing_identity(Self::TYPE_NAME, diags);
            return;
        };

        if let Err(err) = client.delete::<UserKind>(&id) {
            diags.add_api_error("Dropping user failed", &err);
        }
    }
}
