//! Reconciliation layer of the Data Minded provider.
//!
//! # Overview
//! A host hands the provider its configuration block, receives the shared
//! client as provider data, and passes that on to each resource. Resources
//! then drive their remote entity through create, read, update and delete,
//! reporting problems as `Diagnostics` instead of returning errors.
//!
//! # Design
//! - `Reconciler` is the seam the host talks to; the three resources
//!   implement it over `dataminded_core::Client`.
//! - A remote entity that disappeared is `ReadState::Removed`, so the host
//!   can plan a recreate rather than fail.

pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod provider;
pub mod resource;
pub mod schema;

pub use config::{ConfigError, ProviderConfig};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use logging::{init_logging, try_init_logging, LOG_ENV};
pub use provider::{Provider, Resources};
pub use resource::{
    ChapterMemberModel, ChapterMemberResource, ChapterModel, ChapterResource, ProviderData,
    ReadState, Reconciler, UserModel, UserResource,
};
pub use schema::{Attribute, AttributeKind, AttributeMode, Schema};
