//! Generic document persistence contract.
//!
//! Use cases depend only on the [`Repository`] trait; the concrete
//! adapter (in-memory or Postgres JSONB) is chosen at startup. Filters
//! are per-field equality plus an optional case-insensitive substring
//! match; an empty result set is never an error and deletes are
//! idempotent.
//!
//! `update` is a partial document merge: fields absent from the patch
//! are left untouched. Fetch-modify-persist sequences built on top of
//! it are NOT atomic; concurrent writers to the same document can lose
//! updates. Callers must not rely on read-modify-write isolation.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

/// An entity persisted as a JSON document in a named collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;

    fn set_id(&mut self, id: Uuid);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// Read query: equality filters, optional substring filter, optional
/// sort and skip/limit.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub id: Option<Uuid>,
    pub fields: Vec<(&'static str, Value)>,
    pub contains: Option<(&'static str, String)>,
    pub sort: Vec<(&'static str, SortDir)>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on the native document id.
    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Equality filter on a top-level field.
    pub fn eq(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push((field, value.into()));
        self
    }

    /// Case-insensitive substring filter on a top-level string field.
    pub fn contains(mut self, field: &'static str, needle: impl Into<String>) -> Self {
        self.contains = Some((field, needle.into()));
        self
    }

    pub fn sort(mut self, field: &'static str, dir: SortDir) -> Self {
        self.sort.push((field, dir));
        self
    }

    pub fn skip(mut self, skip: i64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// CRUD contract per entity kind. Adapters translate the `id` filter
/// into their native identifier type; application code never sees it.
#[async_trait]
pub trait Repository<T: Document>: Send + Sync {
    /// Retrieve all documents matching the query. No match is an empty
    /// list, never an error.
    async fn read(&self, query: Query) -> anyhow::Result<Vec<T>>;

    /// Persist a new document and return it with its assigned id.
    async fn create(&self, entity: T) -> anyhow::Result<T>;

    /// Merge `patch` (a JSON object) into the stored document.
    async fn update(&self, id: Uuid, patch: Value) -> anyhow::Result<()>;

    /// Remove a document. Deleting an absent id is not an error.
    async fn delete(&self, id: Uuid) -> anyhow::Result<()>;
}

pub type DynRepo<T> = Arc<dyn Repository<T>>;
