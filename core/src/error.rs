//! Error types for the Data Minded API client.
//!
//! # Design
//! "Not found" on Read is deliberately absent from this enum: the service
//! signals absence with a fixed response body, and the client reports it as
//! `ReadOutcome::NotFound` rather than as a failure. Everything here is a
//! genuine failure the caller must surface.

use std::fmt;

use thiserror::Error;

/// The lifecycle step an API call belongs to, used to build error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Operation::List => "listing",
            Operation::Create => "creating",
            Operation::Read => "reading",
            Operation::Update => "updating",
            Operation::Delete => "deleting",
        };
        f.write_str(verb)
    }
}

/// Errors returned by entity client calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP request could not be issued or its body could not be read.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The request payload could not be serialized to JSON.
    #[error("could not encode {kind} request body: {message}")]
    Encode { kind: &'static str, message: String },

    /// The response body did not parse into the expected shape.
    #[error("could not decode {kind} response: {message}")]
    Decode { kind: &'static str, message: String },

    /// The service answered with a status the operation does not accept.
    #[error("{}", rejection_message(.operation, .kind, .key, .status, .body))]
    Rejected {
        operation: Operation,
        kind: &'static str,
        key: String,
        status: u16,
        body: String,
    },

    /// An update targeted an entity the service no longer knows about.
    #[error("{kind} {key} no longer exists")]
    Vanished { kind: &'static str, key: String },
}

fn rejection_message(operation: &Operation, kind: &str, key: &str, status: &u16, body: &str) -> String {
    let target = if key.is_empty() {
        kind.to_string()
    } else {
        format!("{kind} {key}")
    };
    match operation {
        Operation::Delete => format!("non-200 status {status} when {operation} {target}"),
        _ if body.is_empty() => format!("status {status} when {operation} {target}"),
        _ => format!("status {status} when {operation} {target}: {body}"),
    }
}

impl ApiError {
    /// The HTTP status behind a rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
