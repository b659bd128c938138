//! Stateless request builder / response parser, plus the executing client.
//!
//! # Design
//! `EntityClient<K>` holds only a `base_url` and carries no mutable state
//! between calls. Each CRUD operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`, so every status and body rule is testable without a
//! network. `Client` pairs a `Connection` with a `Transport` and runs one
//! blocking round trip per call.
//!
//! The service reports a missing entity with a fixed body rather than a
//! status code. `parse_read` checks for that body before anything else and
//! returns `ReadOutcome::NotFound`, which is a normal result, not an error.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::connection::Connection;
use crate::error::{ApiError, Operation};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::kind::{ChapterMemberKind, EntityKind};
use crate::types::ChapterMember;

/// Result of reading a single entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<T> {
    Found(T),
    NotFound,
}

impl<T> ReadOutcome<T> {
    /// `true` iff the service returned the entity.
    pub fn exists(&self) -> bool {
        matches!(self, ReadOutcome::Found(_))
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            ReadOutcome::Found(entity) => Some(entity),
            ReadOutcome::NotFound => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            ReadOutcome::Found(entity) => Some(entity),
            ReadOutcome::NotFound => None,
        }
    }
}

/// Builds requests and parses responses for one entity kind.
pub struct EntityClient<K> {
    base_url: String,
    _kind: PhantomData<fn() -> K>,
}

impl<K> fmt::Debug for EntityClient<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl<K> Clone for EntityClient<K> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: EntityKind> EntityClient<K> {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            _kind: PhantomData,
        }
    }

    pub fn build_list(&self) -> HttpRequest {
        self.get(K::collection_path())
    }

    pub fn build_read(&self, key: &K::Key) -> HttpRequest {
        self.get(K::entity_path(key))
    }

    pub fn build_create(&self, draft: &K::Draft) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, K::create_path(draft), draft)
    }

    pub fn build_update(&self, key: &K::Key, patch: &K::Patch) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Put, K::entity_path(key), patch)
    }

    pub fn build_delete(&self, key: &K::Key) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}{}", self.base_url, K::entity_path(key)),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<K::Entity>, ApiError> {
        reject_errors::<K>(Operation::List, String::new(), &response)?;
        decode::<K, _>(&response.body)
    }

    /// `draft_key` is only used to describe a rejection.
    pub fn parse_create(
        &self,
        draft_key: Option<K::Key>,
        response: HttpResponse,
    ) -> Result<K::Entity, ApiError> {
        let key = draft_key.map(|k| k.to_string()).unwrap_or_default();
        reject_errors::<K>(Operation::Create, key, &response)?;
        decode::<K, _>(&response.body)
    }

    pub fn parse_read(
        &self,
        key: &K::Key,
        response: HttpResponse,
    ) -> Result<ReadOutcome<K::Entity>, ApiError> {
        if response.body == K::NOT_FOUND_BODY {
            return Ok(ReadOutcome::NotFound);
        }
        reject_errors::<K>(Operation::Read, key.to_string(), &response)?;
        decode::<K, _>(&response.body).map(ReadOutcome::Found)
    }

    pub fn parse_update(&self, key: &K::Key, response: HttpResponse) -> Result<K::Entity, ApiError> {
        if response.body == K::NOT_FOUND_BODY {
            return Err(ApiError::Vanished {
                kind: K::NAME,
                key: key.to_string(),
            });
        }
        reject_errors::<K>(Operation::Update, key.to_string(), &response)?;
        decode::<K, _>(&response.body)
    }

    pub fn parse_delete(&self, key: &K::Key, response: HttpResponse) -> Result<(), ApiError> {
        if response.status == 200 {
            return Ok(());
        }
        Err(ApiError::Rejected {
            operation: Operation::Delete,
            kind: K::NAME,
            key: key.to_string(),
            status: response.status,
            body: response.body,
        })
    }

    fn get(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json<B: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Encode {
            kind: K::NAME,
            message: e.to_string(),
        })?;
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

impl EntityClient<ChapterMemberKind> {
    pub fn build_list_in_chapter(&self, chapter_id: i64) -> HttpRequest {
        self.get(ChapterMemberKind::chapter_path(chapter_id))
    }
}

/// Map a 4xx/5xx status to `ApiError::Rejected`.
fn reject_errors<K: EntityKind>(
    operation: Operation,
    key: String,
    response: &HttpResponse,
) -> Result<(), ApiError> {
    if response.status < 400 {
        return Ok(());
    }
    Err(ApiError::Rejected {
        operation,
        kind: K::NAME,
        key,
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<K: EntityKind, T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode {
        kind: K::NAME,
        message: e.to_string(),
    })
}

/// Executes entity calls against one Data Minded API endpoint.
///
/// Cheap to share behind an `Arc`: it holds the immutable connection and a
/// thread-safe transport, nothing else.
#[derive(Clone)]
pub struct Client {
    connection: Connection,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("connection", &self.connection)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(connection: Connection) -> Self {
        Self::with_transport(connection, Arc::new(UreqTransport::new()))
    }

    pub fn with_transport(connection: Connection, transport: Arc<dyn Transport>) -> Self {
        let base_url = connection.base_url();
        Self {
            connection,
            base_url,
            transport,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn entity<K: EntityKind>(&self) -> EntityClient<K> {
        EntityClient::new(&self.base_url)
    }

    pub fn list<K: EntityKind>(&self) -> Result<Vec<K::Entity>, ApiError> {
        let api = self.entity::<K>();
        let response = self.send(api.build_list())?;
        api.parse_list(response)
    }

    pub fn create<K: EntityKind>(&self, draft: &K::Draft) -> Result<K::Entity, ApiError> {
        let api = self.entity::<K>();
        let response = self.send(api.build_create(draft)?)?;
        let entity = api.parse_create(K::draft_key(draft), response)?;
        let key = K::key_of(&entity);
        tracing::debug!(kind = K::NAME, key = %key, "created entity");
        Ok(entity)
    }

    pub fn read<K: EntityKind>(&self, key: &K::Key) -> Result<ReadOutcome<K::Entity>, ApiError> {
        let api = self.entity::<K>();
        let response = self.send(api.build_read(key))?;
        let outcome = api.parse_read(key, response)?;
        if !outcome.exists() {
            tracing::debug!(kind = K::NAME, key = %key, "service reported entity as not found");
        }
        Ok(outcome)
    }

    pub fn update<K: EntityKind>(
        &self,
        key: &K::Key,
        patch: &K::Patch,
    ) -> Result<K::Entity, ApiError> {
        let api = self.entity::<K>();
        let response = self.send(api.build_update(key, patch)?)?;
        api.parse_update(key, response)
    }

    pub fn delete<K: EntityKind>(&self, key: &K::Key) -> Result<(), ApiError> {
        let api = self.entity::<K>();
        let response = self.send(api.build_delete(key))?;
        api.parse_delete(key, response)
    }

    /// Memberships of one chapter.
    pub fn list_chapter_members(&self, chapter_id: i64) -> Result<Vec<ChapterMember>, ApiError> {
        let api = self.entity::<ChapterMemberKind>();
        let response = self.send(api.build_list_in_chapter(chapter_id))?;
        api.parse_list(response)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = request.method.as_str(), url = %request.path, "sending request");
        let response = self.transport.execute(request)?;
        tracing::debug!(status = response.status, "received response");
        Ok(response)
    }
}
