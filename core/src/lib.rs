//! Synchronous client core for the Data Minded API.
//!
//! # Overview
//! Manages users, chapters and chapter memberships over REST. Request
//! building and response parsing are pure (`EntityClient`); `Client` adds
//! the blocking round trip through a pluggable `Transport`.
//!
//! # Design
//! - One generic `EntityClient<K>` covers all three kinds; each `EntityKind`
//!   contributes its endpoints, its not-found body and its payload types.
//! - A missing entity is `ReadOutcome::NotFound`, never an error and never
//!   a sentinel id.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod connection;
pub mod error;
pub mod http;
pub mod kind;
pub mod types;

pub use client::{Client, EntityClient, ReadOutcome};
pub use connection::Connection;
pub use error::{ApiError, Operation};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use kind::{ChapterKind, ChapterMemberKind, EntityKind, UserKind};
pub use types::{
    Chapter, ChapterAttributes, ChapterMember, ChapterRole, MemberKey, MemberRole,
    NewChapterMember, User, UserAttributes,
};
