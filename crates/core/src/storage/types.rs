use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Field name to value mapping used to create and update records.
pub type Fields = Map<String, Value>;

/// A persisted entity managed by a repository.
///
/// Records round-trip through JSON documents, so every field the store
/// should know about must be visible to serde. Relation fields are expected
/// to be `#[serde(default, skip_serializing_if = "Option::is_none")]` so an
/// unloaded relation neither fails deserialization nor gets persisted.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name used in error messages and logs.
    const ENTITY_TYPE: &'static str;

    fn id(&self) -> Uuid;

    /// The owning principal, if the record is owned.
    fn user_id(&self) -> Option<Uuid>;

    fn created_at(&self) -> DateTime<Utc>;
}

/// Exact-match filter over record fields, AND-combined.
///
/// A `null` criterion matches both an explicit `null` and a missing field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria(BTreeMap<String, Value>);

impl Criteria {
    /// Creates empty criteria, which match every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Criteria matching a single record identifier.
    pub fn id(id: Uuid) -> Self {
        Self::new().with("id", id.to_string())
    }

    /// Adds (or replaces) a required field value.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns true if `document` satisfies every criterion.
    pub fn matches(&self, document: &Fields) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| document.get(field).unwrap_or(&Value::Null) == expected)
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, value) in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            match value {
                Value::String(s) => write!(f, "{field}={s}")?,
                other => write!(f, "{field}={other}")?,
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Whether the store's default scoping rules (soft deletes, tenancy) apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Default,
    WithoutGlobalScopes,
}

/// Result ordering for a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    /// Store order (insertion order for the in-memory store).
    #[default]
    Unordered,
    /// `created_at` descending.
    LatestFirst,
}

/// A fully described read against a record store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub criteria: Criteria,
    pub includes: Vec<String>,
    pub scope: Scope,
    pub order: Order,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(criteria: Criteria) -> Self {
        Self {
            criteria,
            ..Self::default()
        }
    }

    pub fn includes(mut self, includes: &[String]) -> Self {
        self.includes = includes.to_vec();
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Which page of a listing to return.
///
/// Pages are 1-based; page `0` is read as the first page. When `per_page`
/// is `None` the store's default page size is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: Option<usize>,
}

impl PageRequest {
    pub fn new(page: usize) -> Self {
        Self {
            page,
            per_page: None,
        }
    }

    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// The 1-based page number, with `0` clamped to `1`.
    pub fn page_number(&self) -> usize {
        self.page.max(1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
}

impl<T> Page<T> {
    /// Number of the last page; an empty listing still has one page.
    pub fn last_page(&self) -> usize {
        if self.per_page == 0 {
            return 1;
        }
        self.total.div_ceil(self.per_page).max(1)
    }

    pub fn has_more_pages(&self) -> bool {
        self.page < self.last_page()
    }
}
