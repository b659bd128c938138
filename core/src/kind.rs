//! Per-kind configuration for the generic entity client.
//!
//! Users, chapters and memberships share one lifecycle shape. Each kind
//! supplies its endpoints, its not-found body and its payload types here;
//! `EntityClient<K>` does the rest.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{
    Chapter, ChapterAttributes, ChapterMember, MemberKey, MemberRole, NewChapterMember, User,
    UserAttributes,
};

pub const USER_NOT_FOUND: &str = "ERROR_USER_NOT_FOUND";
pub const CHAPTER_NOT_FOUND: &str = "ERROR_CHAPTER_NOT_FOUND";
pub const CHAPTER_MEMBER_NOT_FOUND: &str = "ERROR_CHAPTER_MEMBER_NOT_FOUND";

/// An entity kind managed through the REST API.
pub trait EntityKind {
    /// Identity of a single entity.
    type Key: fmt::Display + fmt::Debug + Copy + Send + Sync;
    /// The entity as returned by the service.
    type Entity: DeserializeOwned + fmt::Debug + Clone;
    /// Body sent on create.
    type Draft: Serialize;
    /// Body sent on update.
    type Patch: Serialize;

    /// Human-readable kind name used in error messages.
    const NAME: &'static str;
    /// Literal body the service answers with when the entity does not exist.
    const NOT_FOUND_BODY: &'static str;

    fn collection_path() -> String;

    fn entity_path(key: &Self::Key) -> String;

    /// Where a draft is POSTed. Kinds whose identity is chosen by the
    /// caller put it in the URL.
    fn create_path(_draft: &Self::Draft) -> String {
        Self::collection_path()
    }

    /// Identity known before the create call, used only for error messages.
    fn draft_key(_draft: &Self::Draft) -> Option<Self::Key> {
        None
    }

    fn key_of(entity: &Self::Entity) -> Self::Key;
}

#[derive(Debug, Clone, Copy)]
pub struct UserKind;

impl EntityKind for UserKind {
    type Key = i64;
    type Entity = User;
    type Draft = UserAttributes;
    type Patch = UserAttributes;

    const NAME: &'static str = "user";
    const NOT_FOUND_BODY: &'static str = USER_NOT_FOUND;

    fn collection_path() -> String {
        "/user".to_string()
    }

    fn entity_path(id: &i64) -> String {
        format!("/user/{id}")
    }

    fn key_of(user: &User) -> i64 {
        user.id
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChapterKind;

impl EntityKind for ChapterKind {
    type Key = i64;
    type Entity = Chapter;
    type Draft = ChapterAttributes;
    type Patch = ChapterAttributes;

    const NAME: &'static str = "chapter";
    const NOT_FOUND_BODY: &'static str = CHAPTER_NOT_FOUND;

    fn collection_path() -> String {
        "/chapter".to_string()
    }

    fn entity_path(id: &i64) -> String {
        format!("/chapter/{id}")
    }

    fn key_of(chapter: &Chapter) -> i64 {
        chapter.id
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChapterMemberKind;

impl ChapterMemberKind {
    /// Memberships of a single chapter.
    pub fn chapter_path(chapter_id: i64) -> String {
        format!("/chapter/{chapter_id}/member")
    }
}

impl EntityKind for ChapterMemberKind {
    type Key = MemberKey;
    type Entity = ChapterMember;
    type Draft = NewChapterMember;
    type Patch = MemberRole;

    const NAME: &'static str = "chapter member";
    const NOT_FOUND_BODY: &'static str = CHAPTER_MEMBER_NOT_FOUND;

    fn collection_path() -> String {
        "/chapter/member".to_string()
    }

    fn entity_path(key: &MemberKey) -> String {
        format!("{}/{}", Self::chapter_path(key.chapter_id), key.user_id)
    }

    fn create_path(draft: &NewChapterMember) -> String {
        Self::entity_path(&draft.key)
    }

    fn draft_key(draft: &NewChapterMember) -> Option<MemberKey> {
        Some(draft.key)
    }

    fn key_of(member: &ChapterMember) -> MemberKey {
        member.key()
    }
}
