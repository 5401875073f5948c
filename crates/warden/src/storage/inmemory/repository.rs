//! In-memory record store implementation.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use warden_core::repository::parse_record_id;
use warden_core::storage::{
    Fields, Order, Page, PageRequest, Query, Record, RecordStore, RepositoryError, Result, Scope,
};

/// Page size used when neither the store nor the request sets one.
pub const DEFAULT_PER_PAGE: usize = 15;

/// Field marking a document as soft-deleted when non-null.
const DELETED_AT: &str = "deleted_at";

/// Computes a relation's value from the document it is loaded for.
pub type RelationResolver = Arc<dyn Fn(&Fields) -> Value + Send + Sync>;

/// In-memory storage backend.
///
/// Keeps JSON documents in insertion order inside an `Arc<RwLock<_>>`.
/// Data is not persisted and will be lost when the store is dropped.
///
/// Default scoping hides soft-deleted documents (non-null `deleted_at`).
/// Relations are registered up front and only loaded when a query
/// includes them; loaded relation values are never written back.
pub struct InMemoryStore<T> {
    documents: Arc<RwLock<Vec<Fields>>>,
    relations: HashMap<String, RelationResolver>,
    unique: Vec<String>,
    per_page: usize,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for InMemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
            relations: self.relations.clone(),
            unique: self.unique.clone(),
            per_page: self.per_page,
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for InMemoryStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut relations: Vec<&String> = self.relations.keys().collect();
        relations.sort();
        f.debug_struct("InMemoryStore")
            .field("relations", &relations)
            .field("unique", &self.unique)
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

impl<T: Record> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> InMemoryStore<T> {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(Vec::new())),
            relations: HashMap::new(),
            unique: Vec::new(),
            per_page: DEFAULT_PER_PAGE,
            _record: PhantomData,
        }
    }

    /// Sets the default page size. A size of 0 is raised to 1.
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Registers a relation that queries may include by `name`.
    pub fn with_relation<F>(mut self, name: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&Fields) -> Value + Send + Sync + 'static,
    {
        self.relations.insert(name.into(), Arc::new(resolver));
        self
    }

    /// Rejects writes that would give two documents the same non-null `field`.
    pub fn with_unique(mut self, field: impl Into<String>) -> Self {
        self.unique.push(field.into());
        self
    }

    /// Marks a document as soft-deleted so default scoping hides it.
    pub async fn soft_delete(&self, id: Uuid) -> Result<()> {
        let mut documents = self.documents.write().await;
        let document = documents
            .iter_mut()
            .find(|doc| has_id(doc, id))
            .ok_or_else(|| RepositoryError::not_found(T::ENTITY_TYPE, id.to_string()))?;

        document.insert(DELETED_AT.to_string(), timestamp(Utc::now())?);
        tracing::debug!(entity_type = T::ENTITY_TYPE, %id, "Record soft-deleted");
        Ok(())
    }

    /// Number of stored documents, soft-deleted ones included.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    fn check_includes(&self, includes: &[String]) -> Result<()> {
        match includes.iter().find(|name| !self.relations.contains_key(*name)) {
            Some(name) => Err(RepositoryError::QueryFailed(format!(
                "Call to undefined relationship [{name}] on {}",
                T::ENTITY_TYPE
            ))),
            None => Ok(()),
        }
    }

    fn check_unique(&self, documents: &[Fields], candidate: &Fields, skip: Option<usize>) -> Result<()> {
        for field in &self.unique {
            let Some(value) = candidate.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            let taken = documents
                .iter()
                .enumerate()
                .any(|(i, doc)| Some(i) != skip && doc.get(field) == Some(value));
            if taken {
                return Err(RepositoryError::Persistence(format!(
                    "duplicate value for unique field `{field}` on {}",
                    T::ENTITY_TYPE
                )));
            }
        }
        Ok(())
    }

    fn strip_relations(&self, document: &mut Fields) {
        for name in self.relations.keys() {
            document.remove(name);
        }
    }

    fn hydrate(&self, document: &Fields, includes: &[String]) -> Result<T> {
        let mut document = document.clone();
        for name in includes {
            if let Some(resolver) = self.relations.get(name) {
                let value = resolver(&document);
                document.insert(name.clone(), value);
            }
        }
        to_record(document)
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for InMemoryStore<T> {
    async fn create(&self, mut fields: Fields) -> Result<T> {
        let id = match fields.get("id") {
            None | Some(Value::Null) => Uuid::new_v4(),
            Some(Value::String(raw)) => parse_record_id(raw).ok_or_else(|| {
                RepositoryError::Persistence(format!("invalid {} id: {raw}", T::ENTITY_TYPE))
            })?,
            Some(other) => {
                return Err(RepositoryError::Persistence(format!(
                    "invalid {} id: {other}",
                    T::ENTITY_TYPE
                )))
            }
        };
        fields.insert("id".to_string(), Value::String(id.to_string()));
        if fields.get("created_at").is_none_or(Value::is_null) {
            fields.insert("created_at".to_string(), timestamp(Utc::now())?);
        }
        self.strip_relations(&mut fields);

        let record = to_record(fields.clone())?;

        let mut documents = self.documents.write().await;
        if documents.iter().any(|doc| has_id(doc, id)) {
            return Err(RepositoryError::Persistence(format!(
                "duplicate primary key {id} on {}",
                T::ENTITY_TYPE
            )));
        }
        self.check_unique(&documents, &fields, None)?;
        documents.push(fields);

        Ok(record)
    }

    async fn update(&self, record: &mut T, fields: Fields) -> Result<()> {
        let id = record.id();
        if let Some(new_id) = fields.get("id") {
            if *new_id != Value::String(id.to_string()) {
                return Err(RepositoryError::Persistence(format!(
                    "primary key of {} {id} cannot be changed",
                    T::ENTITY_TYPE
                )));
            }
        }

        let current = to_document(record)?;

        let mut documents = self.documents.write().await;
        let position = documents
            .iter()
            .position(|doc| has_id(doc, id))
            .ok_or_else(|| RepositoryError::not_found(T::ENTITY_TYPE, id.to_string()))?;

        // Unknown columns already on the stored document (e.g. `deleted_at`)
        // survive; the record's own attributes and then `fields` win.
        let mut merged = documents[position].clone();
        merged.extend(current.clone());
        merged.extend(fields);
        self.strip_relations(&mut merged);

        self.check_unique(&documents, &merged, Some(position))?;

        let mut loaded = merged.clone();
        for name in self.relations.keys() {
            if let Some(value) = current.get(name) {
                loaded.insert(name.clone(), value.clone());
            }
        }
        let updated = to_record(loaded)?;

        documents[position] = merged;
        *record = updated;
        Ok(())
    }

    async fn query(&self, query: &Query) -> Result<Vec<T>> {
        self.check_includes(&query.includes)?;

        let documents = self.documents.read().await;
        let mut matched: Vec<&Fields> = documents
            .iter()
            .filter(|doc| query.scope == Scope::WithoutGlobalScopes || !is_trashed(doc))
            .filter(|doc| query.criteria.matches(doc))
            .collect();

        if query.order == Order::LatestFirst {
            matched.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
        }
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        matched
            .into_iter()
            .map(|doc| self.hydrate(doc, &query.includes))
            .collect()
    }

    async fn paginate(&self, includes: &[String], request: PageRequest) -> Result<Page<T>> {
        self.check_includes(includes)?;

        let per_page = request.per_page.unwrap_or(self.per_page).max(1);
        let page = request.page_number();

        let documents = self.documents.read().await;
        let visible: Vec<&Fields> = documents.iter().filter(|doc| !is_trashed(doc)).collect();
        let total = visible.len();

        let items = visible
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .map(|doc| self.hydrate(doc, includes))
            .collect::<Result<Vec<T>>>()?;

        Ok(Page {
            items,
            page,
            per_page,
            total,
        })
    }
}

fn has_id(document: &Fields, id: Uuid) -> bool {
    document
        .get("id")
        .and_then(Value::as_str)
        .and_then(parse_record_id)
        == Some(id)
}

fn is_trashed(document: &Fields) -> bool {
    document.get(DELETED_AT).is_some_and(|v| !v.is_null())
}

fn created_at(document: &Fields) -> Option<DateTime<Utc>> {
    document
        .get("created_at")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

fn timestamp(at: DateTime<Utc>) -> Result<Value> {
    serde_json::to_value(at).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn to_document<T: Record>(record: &T) -> Result<Fields> {
    match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(RepositoryError::Serialization(format!(
            "{} did not serialize to an object: {other}",
            T::ENTITY_TYPE
        ))),
        Err(e) => Err(RepositoryError::Serialization(e.to_string())),
    }
}

fn to_record<T: Record>(document: Fields) -> Result<T> {
    serde_json::from_value(Value::Object(document))
        .map_err(|e| RepositoryError::Serialization(e.to_string()))
}
