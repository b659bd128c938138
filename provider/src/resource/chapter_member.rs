//! `dataminded_chapter_member`: a user's membership of a chapter.
//!
//! Identity is the `(chapter, member)` pair; only `role` changes in place.

use dataminded_core::{ChapterMemberKind, ChapterRole, MemberKey, MemberRole, NewChapterMember};
use serde::{Deserialize, Serialize};

use super::{missing_identity, Binding, ProviderData, ReadState, Reconciler};
use crate::diagnostics::Diagnostics;
use crate::schema::{Attribute, AttributeKind, Schema};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterMemberModel {
    /// `chapter/{chapter}/member/{member}`, computed on create.
    pub id: Option<String>,
    /// Chapter id.
    pub chapter: i64,
    /// User id.
    pub member: i64,
    pub role: Option<ChapterRole>,
}

impl ChapterMemberModel {
    pub fn key(&self) -> MemberKey {
        MemberKey::new(self.chapter, self.member)
    }
}

fn member_id(key: MemberKey) -> String {
    format!("chapter/{}/member/{}", key.chapter_id, key.user_id)
}

#[derive(Debug, Default)]
pub struct ChapterMemberResource {
    binding: Binding,
}

impl ChapterMemberResource {
    pub const TYPE_NAME: &'static str = "dataminded_chapter_member";

    pub fn new() -> Self {
        Self::default()
    }
}

impl Reconciler for ChapterMemberResource {
    type Model = ChapterMemberModel;

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Manage Data Minded chapter members")
            .with_attribute(Attribute::computed(
                "id",
                AttributeKind::String,
                "Internal id used to track this membership",
            ))
            .with_attribute(Attribute::required(
                "chapter",
                AttributeKind::Int64,
                "Id of the chapter",
            ))
            .with_attribute(Attribute::required(
                "member",
                AttributeKind::Int64,
                "Id of the user",
            ))
            .with_attribute(
                Attribute::optional_computed("role", AttributeKind::String, "Role of the chapter member")
                    .with_default(ChapterRole::default().as_str())
                    .with_one_of(ChapterRole::ALL.map(|r| r.as_str())),
            )
    }

    fn configure(&mut self, provider_data: Option<&ProviderData>, diags: &mut Diagnostics) {
        self.binding.configure(provider_data, diags);
    }

    fn create(&self, plan: ChapterMemberModel, diags: &mut Diagnostics) -> Option<ChapterMemberModel> {
        let client = self.binding.client(Self::TYPE_NAME, diags)?;
        let key = plan.key();
        let draft = NewChapterMember {
            key,
            role: plan.role.unwrap_or_default(),
        };

        let member = match client.create::<ChapterMemberKind>(&draft) {
            Ok(member) => member,
            Err(err) => {
                diags.add_api_error("Creation of chapter member failed", &err);
                return None;
            }
        };

        tracing::info!(%key, role = %member.role(), "created chapter member");
        Some(ChapterMemberModel {
            id: Some(member_id(key)),
            chapter: key.chapter_id,
            member: key.user_id,
            role: Some(member.role()),
        })
    }

    fn read(&self, state: ChapterMemberModel, diags: &mut Diagnostics) -> ReadState<ChapterMemberModel> {
        let Some(client) = self.binding.client(Self::TYPE_NAME, diags) else {
            return ReadState::Present(state);
        };
        let key = state.key();

        let outcome = match client.read::<ChapterMemberKind>(&key) {
            Ok(outcome) => outcome,
            Err(err) => {
                diags.add_api_error("Reading chapter_member failed", &err);
                return ReadState::Present(state);
            }
        };

        match outcome.into_option() {
            Some(member) => ReadState::Present(ChapterMemberModel {
                id: state.id.or_else(|| Some(member_id(key))),
                role: Some(member.role()),
                ..state
            }),
            None => {
                tracing::info!(%key, "chapter member no longer exists, removing from state");
                ReadState::Removed
            }
        }
    }

    fn update(
        &self,
        state: ChapterMemberModel,
        plan: ChapterMemberModel,
        diags: &mut Diagnostics,
    ) -> Option<ChapterMemberModel> {
        let client = self.binding.client(Self::TYPE_NAME, diags)?;
        if state.id.is_none() {
            missing_identity(Self::TYPE_NAME, diags);
            return None;
        }
        let key = state.key();
        let patch = MemberRole {
            role: plan.role.unwrap_or_default(),
        };

        match client.update::<ChapterMemberKind>(&key, &patch) {
            Ok(member) => Some(ChapterMemberModel {
                role: Some(member.role()),
                ..state
            }),
            Err(err) => {
                diags.add_api_error("Updating chapter member failed", &err);
                None
            }
        }
    }

    fn delete(&self, state: ChapterMemberModel, diags: &mut Diagnostics) {
        let Some(client) = self.binding.client(Self::TYPE_NAME, diags) else {
            return;
        };

        if let Err(err) = client.delete::<ChapterMemberKind>(&state.key()) {
            diags.add_api_error("Dropping chapter_member failed", &err);
        }
    }
}
