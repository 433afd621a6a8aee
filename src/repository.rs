//! Repository Module
//!
//! The façade that composes mapper, store, index maintainer, and query
//! executor into the typed CRUD-plus-query surface applications consume.
//!
//! ## Write path
//! `create`/`update` serialize and store the raw record first, then hand the
//! new state (and the prior snapshot, for diffing) to the maintainer. Index
//! maintenance only runs if the record write succeeded; the window between
//! the two steps is the documented eventual-consistency gap.
//!
//! ## Concurrency
//! A repository is stateless apart from the cached store handle and the
//! optional acting user, so one instance can be shared across threads as
//! long as the store handle is concurrency-safe (the connector's problem).

use std::marker::PhantomData;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{PrismError, Result};
use crate::index::{keys, IndexMaintainer};
use crate::mapper::{BincodeMapper, Mapper};
use crate::query::{ListResult, QueryExecutor, ScoreRange};
use crate::schema::{Entity, ORDER_BY_CREATED_ON};
use crate::store::{Connector, Store};
use crate::value::Value;

static LAST_MICROS: AtomicI64 = AtomicI64::new(0);

/// Current time in microseconds since the Unix epoch, strictly monotonic
/// within the process so creation timestamps never collide as scores
pub(crate) fn now_micros() -> i64 {
    let now = chrono::Utc::now().timestamp_micros();
    let prev = LAST_MICROS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(if now > last { now } else { last + 1 })
        })
        .unwrap_or(now);
    if now > prev {
        now
    } else {
        prev + 1
    }
}

/// Typed repository over one entity type
pub struct Repository<E: Entity, M: Mapper = BincodeMapper> {
    store: Arc<dyn Store>,
    mapper: M,
    maintainer: IndexMaintainer,
    config: Config,
    user: Option<String>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Repository<E, BincodeMapper> {
    /// Open a repository with the default bincode mapper
    pub fn open(connector: &dyn Connector, config: Config) -> Result<Self> {
        Self::open_with_mapper(connector, BincodeMapper, config)
    }
}

impl<E: Entity, M: Mapper> Repository<E, M> {
    /// Open a repository with an explicit mapper.
    ///
    /// Validates the type's schema declarations and acquires a store handle
    /// from the connector; the handle is cached for the repository's
    /// lifetime.
    pub fn open_with_mapper(connector: &dyn Connector, mapper: M, config: Config) -> Result<Self> {
        E::SCHEMA
            .validate(E::TYPE_NAME)
            .map_err(PrismError::Schema)?;
        let store = connector.acquire()?;
        let maintainer = IndexMaintainer::new(Arc::clone(&store), config.clone());
        Ok(Self {
            store,
            mapper,
            maintainer,
            config,
            user: None,
            _entity: PhantomData,
        })
    }

    /// Set the acting identity recorded in `created_by`/`updated_by`
    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    fn executor(&self) -> QueryExecutor<'_, M> {
        QueryExecutor {
            store: self.store.as_ref(),
            mapper: &self.mapper,
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Store a new entity.
    ///
    /// Assigns a fresh id and creation timestamp, then runs the regular
    /// update path (serialize, store, index).
    pub fn create(&self, mut entity: E) -> Result<E> {
        let meta = entity.meta_mut();
        meta.id = Uuid::new_v4().to_string();
        meta.created_on = now_micros();
        meta.created_by = self.user.clone();
        self.update(entity)
    }

    /// Store the new state of an entity and bring every index in line.
    ///
    /// Loads the prior snapshot by id for diffing, stamps `updated_on`/
    /// `updated_by`, writes the record, then maintains indexes. On a
    /// `UniqueViolation` the record write has already happened; the indexes
    /// for the violated key are untouched.
    pub fn update(&self, mut entity: E) -> Result<E> {
        {
            let meta = entity.meta_mut();
            meta.updated_on = now_micros();
            meta.updated_by = self.user.clone();
        }
        let id = entity.meta().id.clone();
        debug!(entity_type = E::TYPE_NAME, id = %id, "update");

        let prior = self.get_by_id(&id)?;
        let blob = self.mapper.serialize(&entity)?;
        self.store.set(&keys::record_key(E::TYPE_NAME, &id), blob)?;
        self.maintainer.on_update(&entity, prior.as_ref())?;
        Ok(entity)
    }

    /// Retract every index entry, then remove the raw record
    pub fn delete(&self, entity: &E) -> Result<()> {
        let id = &entity.meta().id;
        debug!(entity_type = E::TYPE_NAME, id = %id, "delete");
        self.maintainer.on_delete(entity)?;
        self.store.delete(&keys::record_key(E::TYPE_NAME, id))
    }

    /// Load the entity by id and delete it; `NotFound` when absent
    pub fn delete_by_id(&self, id: &str) -> Result<()> {
        let entity = self
            .get_by_id(id)?
            .ok_or_else(|| PrismError::NotFound(keys::record_key(E::TYPE_NAME, id)))?;
        self.delete(&entity)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn get_by_id(&self, id: &str) -> Result<Option<E>> {
        match self.store.get(&keys::record_key(E::TYPE_NAME, id))? {
            Some(bytes) => Ok(Some(self.mapper.deserialize::<E>(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Bulk-load by id; absent records yield `None` in their slot
    pub fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Option<E>>> {
        self.executor().fetch::<E>(ids)
    }

    /// Page through a timeline or position ordering.
    ///
    /// `ordering` is [`ORDER_BY_CREATED_ON`] or a declared position name. An
    /// optional score range restricts the listing; the returned total then
    /// reflects the filtered count.
    pub fn get_list(
        &self,
        page: usize,
        size: usize,
        ordering: &str,
        ascending: bool,
        range: Option<ScoreRange>,
    ) -> Result<ListResult<E>> {
        let set_key = keys::ordering_key(E::TYPE_NAME, ordering);
        self.executor().list::<E>(&set_key, page, size, ascending, range)
    }

    /// Page through entities matching every given attribute value.
    ///
    /// Filters are applied in the given order and must match the property
    /// order of a declared index for the composite key to exist.
    pub fn get_by_keys(
        &self,
        filters: &[(&str, Value)],
        page: usize,
        size: usize,
        ascending: bool,
        ordering: &str,
    ) -> Result<ListResult<E>> {
        let set_key = keys::filter_key_from_values(E::TYPE_NAME, filters, ordering);
        self.executor().list::<E>(&set_key, page, size, ascending, None)
    }

    /// Look up the single entity registered under a unique index value tuple
    pub fn get_unique(&self, filters: &[(&str, Value)]) -> Result<Option<E>> {
        let key = keys::unique_key_from_values(E::TYPE_NAME, filters);
        let Some(id) = self.store.get(&key)? else {
            return Ok(None);
        };
        let id = String::from_utf8(id.to_vec())
            .map_err(|e| PrismError::Serialization(format!("unique key {key} holds non-utf8 id: {e}")))?;
        self.get_by_id(&id)
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Re-derive and re-add index entries for every stored record.
    ///
    /// Nothing is retracted first, so the rebuild is idempotent and safe to
    /// run while readers are active. Intended for backfilling indexes that
    /// were declared after data already existed, and as the repair operation
    /// for interrupted writes.
    pub fn create_indexes(&self) -> Result<()> {
        let batch = self.config.rebuild_batch.max(1);
        let mut page = 1;
        loop {
            let result = self.get_list(page, batch, ORDER_BY_CREATED_ON, true, None)?;
            let fetched = result.items.len();
            for entity in result.items.into_iter().flatten() {
                self.maintainer.rebuild(&entity)?;
            }
            if fetched < batch {
                break;
            }
            page += 1;
        }
        debug!(entity_type = E::TYPE_NAME, "index rebuild complete");
        Ok(())
    }
}
