//! Domain DTOs for the Data Minded API.
//!
//! # Design
//! These types mirror the service's JSON schema but are defined
//! independently of the mock-server crate; integration tests catch drift.
//! Create and update payloads are separate types so the JSON encoder, not
//! string formatting, decides how attribute values are escaped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A user as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
}

/// A chapter as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    pub id: i64,
    pub name: String,
}

/// Role of a user inside a chapter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ChapterRole {
    #[default]
    Contributor,
    Lead,
}

impl ChapterRole {
    pub const ALL: [ChapterRole; 2] = [ChapterRole::Contributor, ChapterRole::Lead];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterRole::Contributor => "Contributor",
            ChapterRole::Lead => "Lead",
        }
    }
}

impl fmt::Display for ChapterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known `ChapterRole`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chapter role {0:?}, expected one of: Contributor, Lead")]
pub struct UnknownRole(pub String);

impl FromStr for ChapterRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChapterRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Membership of a user in a chapter. Identity is `(chapter_id, user_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChapterMember {
    pub chapter_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub role: Option<ChapterRole>,
}

impl ChapterMember {
    pub fn key(&self) -> MemberKey {
        MemberKey::new(self.chapter_id, self.user_id)
    }

    /// The stored role, falling back to the service default.
    pub fn role(&self) -> ChapterRole {
        self.role.unwrap_or_default()
    }
}

/// Composite identity of a chapter membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberKey {
    pub chapter_id: i64,
    pub user_id: i64,
}

impl MemberKey {
    pub fn new(chapter_id: i64, user_id: i64) -> Self {
        Self {
            chapter_id,
            user_id,
        }
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.chapter_id, self.user_id)
    }
}

/// Request payload for creating or renaming a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAttributes {
    pub name: String,
}

/// Request payload for creating or renaming a chapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterAttributes {
    pub name: String,
}

/// Request payload for creating a membership. The key travels in the URL,
/// only the role is sent as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct NewChapterMember {
    #[serde(skip)]
    pub key: MemberKey,
    pub role: ChapterRole,
}

/// Request payload for changing a member's role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRole {
    pub role: ChapterRole,
}
