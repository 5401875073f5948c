//! Generic entity repository.
//!
//! Wraps a `RecordStore` with criteria lookups, a short-lived identifier
//! cache, pagination and an ownership check on single-record reads.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use warden_core::auth::AuthContext;
use warden_core::cache::{record_key, Cache};
use warden_core::repository::{
    is_ownership_violation, parse_record_id, uses_identifier_cache, RepositoryConfig,
};
use warden_core::storage::{
    Criteria, Fields, Order, Page, PageRequest, Query, Record, RecordStore, RepositoryError,
    Result, Scope,
};

use crate::cache::remember;

/// How long an identifier lookup stays cached by default.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Repository over records of type `T`.
///
/// # Type Parameters
///
/// * `T` - The record type
/// * `S` - The underlying record store
/// * `C` - The cache backing identifier lookups
///
/// Configuration is fixed per instance; use [`EntityRepository::configured`]
/// to derive a differently configured repository over the same store and
/// cache.
pub struct EntityRepository<T, S, C>
where
    T: Record,
    S: RecordStore<T>,
    C: Cache,
{
    store: Arc<S>,
    cache: Arc<C>,
    config: RepositoryConfig,
    cache_ttl: Duration,
    _record: PhantomData<fn() -> T>,
}

impl<T, S, C> Clone for EntityRepository<T, S, C>
where
    T: Record,
    S: RecordStore<T>,
    C: Cache,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            config: self.config.clone(),
            cache_ttl: self.cache_ttl,
            _record: PhantomData,
        }
    }
}

impl<T, S, C> EntityRepository<T, S, C>
where
    T: Record,
    S: RecordStore<T>,
    C: Cache,
{
    /// Creates a repository with the default configuration.
    pub fn new(store: Arc<S>, cache: Arc<C>) -> Self {
        Self {
            store,
            cache,
            config: RepositoryConfig::default(),
            cache_ttl: DEFAULT_CACHE_TTL,
            _record: PhantomData,
        }
    }

    /// Sets how long identifier lookups stay cached.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Returns a repository sharing this one's store and cache with `config`.
    pub fn configured(&self, config: RepositoryConfig) -> Self {
        Self {
            config,
            ..self.clone()
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Creates a record. Configured includes play no part in a create.
    pub async fn store(&self, fields: Fields) -> Result<T> {
        let record = self.store.create(fields).await?;
        tracing::debug!(entity_type = T::ENTITY_TYPE, id = %record.id(), "Record created");
        Ok(record)
    }

    /// Merges `fields` into `record` and persists it.
    ///
    /// The caller's record is updated in place and stays the value to use
    /// afterwards; nothing new is returned on success.
    ///
    /// The record's identifier cache entry is dropped so later cached
    /// lookups see the new state.
    pub async fn update(&self, record: &mut T, fields: Fields) -> Result<()> {
        self.store.update(record, fields).await?;

        let id = record.id();
        if let Err(err) = self.cache.delete(&record_key(id)).await {
            tracing::warn!(
                entity_type = T::ENTITY_TYPE,
                %id,
                error = %err,
                "Failed to invalidate record cache"
            );
        }

        tracing::debug!(entity_type = T::ENTITY_TYPE, %id, "Record updated");
        Ok(())
    }

    /// All records matching `criteria`, newest first.
    pub async fn find_by_criteria(&self, criteria: &Criteria) -> Result<Vec<T>> {
        let scope = if self.config.bypasses_scoping() {
            Scope::WithoutGlobalScopes
        } else {
            Scope::Default
        };
        let query = Query::new(criteria.clone())
            .includes(self.config.includes())
            .scope(scope)
            .order(Order::LatestFirst);

        self.store.query(&query).await
    }

    /// One page of records with default scoping applied.
    pub async fn find_by_filters(&self, request: PageRequest) -> Result<Page<T>> {
        self.store.paginate(self.config.includes(), request).await
    }

    /// Finds a record by its identifier.
    ///
    /// Identifiers that are not UUIDs are reported as not found without
    /// touching the store. Anonymous lookups without includes are served
    /// through the identifier cache; everything else goes to
    /// [`EntityRepository::find_one_by`] directly.
    pub async fn find_one_by_id(&self, id: &str, auth: &AuthContext) -> Result<T> {
        let Some(uuid) = parse_record_id(id) else {
            return Err(RepositoryError::not_found(T::ENTITY_TYPE, id));
        };
        let criteria = Criteria::id(uuid);

        if !uses_identifier_cache(&self.config, auth) {
            return self.find_one_by(&criteria, auth).await;
        }

        remember(
            self.cache.as_ref(),
            &record_key(uuid),
            self.cache_ttl,
            || self.find_one_by(&criteria, auth),
        )
        .await
    }

    /// Finds the first record matching `criteria`.
    ///
    /// Default scoping is never applied here. In scoped mode the newest
    /// match is returned, and an authenticated caller reading a record owned
    /// by someone else gets [`RepositoryError::Forbidden`]. With scoping
    /// bypassed the first match in store order is returned unchecked.
    pub async fn find_one_by(&self, criteria: &Criteria, auth: &AuthContext) -> Result<T> {
        let query = Query::new(criteria.clone())
            .includes(self.config.includes())
            .scope(Scope::WithoutGlobalScopes)
            .limit(1);

        if self.config.bypasses_scoping() {
            return self
                .store
                .query(&query)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| RepositoryError::not_found(T::ENTITY_TYPE, criteria.to_string()));
        }

        let Some(record) = self
            .store
            .query(&query.order(Order::LatestFirst))
            .await?
            .into_iter()
            .next()
        else {
            return Err(RepositoryError::not_found(T::ENTITY_TYPE, criteria.to_string()));
        };

        if is_ownership_violation(record.user_id(), auth) {
            tracing::warn!(
                entity_type = T::ENTITY_TYPE,
                id = %record.id(),
                principal_id = ?auth.principal_id(),
                "Authorization denied: record owned by another user"
            );
            return Err(RepositoryError::forbidden(
                T::ENTITY_TYPE,
                record.id().to_string(),
            ));
        }

        Ok(record)
    }
}
