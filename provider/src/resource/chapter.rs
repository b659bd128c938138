//! `dataminded_chapter`: a chapter users can be members of.

use dataminded_core::{ChapterAttributes, ChapterKind};
use serde::{Deserialize, Serialize};

use super::{missing_identity, Binding, ProviderData, ReadState, Reconciler};
use crate::diagnostics::Diagnostics;
use crate::schema::{Attribute, AttributeKind, Schema};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterModel {
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct ChapterResource {
    binding: Binding,
}

impl ChapterResource {
    pub const TYPE_NAME: &'static str = "dataminded_chapter";

    pub fn new() -> Self {
        Self::default()
    }
}

impl Reconciler for ChapterResource {
    type Model = ChapterModel;

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Manage Data Minded chapters")
            .with_attribute(Attribute::computed(
                "id",
                AttributeKind::Int64,
                "Id of the chapter in the Data Minded API",
            ))
            .with_attribute(Attribute::required(
                "name",
                AttributeKind::String,
                "Name of the chapter",
            ))
    }

    fn configure(&mut self, provider_data: Option<&ProviderData>, diags: &mut Diagnostics) {
        self.binding.configure(provider_data, diags);
    }

    fn create(&self, plan: ChapterModel, diags: &mut Diagnostics) -> Option<ChapterModel> {
        let client = self.binding.client(Self::TYPE_NAME, diags)?;
        let draft = ChapterAttributes {
            name: plan.name.clone(),
        };

        let chapter = match client.create::<ChapterKind>(&draft) {
            Ok(chapter) => chapter,
            Err(err) => {
                diags.add_api_error("Chapter creation failed", &err);
                return None;
            }
        };

        tracing::info!(id = chapter.id, "created chapter");
        Some(ChapterModel {
            id: Some(chapter.id),
            ..plan
        })
    }

    fn read(&self, state: ChapterModel, diags: &mut Diagnostics) -> ReadState<ChapterModel> {
        let Some(client) = self.binding.client(Self::TYPE_NAME, diags) else {
            return ReadState::Present(state);
        };
        let Some(id) = state.id else {
            missing_identity(Self::TYPE_NAME, diags);
            return ReadState::Present(state);
        };

        let outcome = match client.read::<ChapterKind>(&id) {
            Ok(outcome) => outcome,
            Err(err) => {
                diags.add_api_error("Reading chapter failed", &err);
                return ReadState::Present(state);
            }
        };

        match outcome.into_option() {
            Some(chapter) => ReadState::Present(ChapterModel {
                id: state.id,
                name: chapter.name,
            }),
            None => {
                tracing::info!(id, "chapter no longer exists, removing from state");
                ReadState::Removed
            }
        }
    }

    fn update(
        &self,
        state: ChapterModel,
        plan: ChapterModel,
        diags: &mut Diagnostics,
    ) -> Option<ChapterModel> {
        let client = self.binding.client(Self::TYPE_NAME, diags)?;
        let Some(id) = state.id else {
            missing_identity(Self::TYPE_NAME, diags);
            return None;
        };
        let patch = ChapterAttributes { name: plan.name };

        match client.update::<ChapterKind>(&id, &patch) {
            Ok(chapter) => Some(ChapterModel {
                id: Some(id),
                name: chapter.name,
            }),
            Err(err) => {
                diags.add_api_error("Updating chapter failed", &err);
                None
            }
        }
    }

    fn delete(&self, state: ChapterModel, diags: &mut Diagnostics) {
        let Some(client) = self.binding.client(Self::TYPE_NAME, diags) else {
            return;
        };
        let Some(id) = state.id else {
            missing_identity(Self::TYPE_NAME, diags);
            return;
        };

        if let Err(err) = client.delete::<ChapterKind>(&id) {
            diags.add_api_error("Dropping chapter failed", &err);
        }
    }
}
