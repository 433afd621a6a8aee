//! Index maintainer
//!
//! Owns the index-entry lifecycle: on every create/update/delete it computes
//! which entries must exist for the entity's current attribute values, which
//! existed for the prior values, and applies the difference against the
//! backing ordered sets and the unique-key registry.
//!
//! ## Write ordering
//!
//! Every operation runs in three phases:
//!
//! 1. **Compute** -- all scores and keys are derived up front with no store
//!    calls, so `Encoding`/`FanoutExceeded` failures abort with zero writes.
//! 2. **Claim** -- unique keys are taken via the store's atomic
//!    set-if-absent. A violation aborts before any ordered-set mutation;
//!    claims made earlier in the same call are unwound best-effort.
//! 3. **Apply** -- ordered-set retractions for prior values, then additions
//!    for current values, across the timeline and every position suffix.
//!
//! ## Consistency window
//!
//! The phases span several independent store operations and are NOT one
//! atomic transaction. A crash or concurrent writer between steps can leave
//! an index entry stale or missing, and readers can observe a record before
//! its entries exist. `Repository::create_indexes` is the idempotent repair
//! operation for such gaps.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{PrismError, Result};
use crate::index::{encoder, keys};
use crate::schema::{Entity, ORDER_BY_CREATED_ON};
use crate::store::Store;

/// Maintains every declared index for one backing store
pub struct IndexMaintainer {
    store: Arc<dyn Store>,
    config: Config,
}

impl IndexMaintainer {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self { store, config }
    }

    /// Register all index entries for a freshly created entity
    pub fn on_create<E: Entity>(&self, entity: &E) -> Result<()> {
        debug!(entity_type = E::TYPE_NAME, id = %entity.meta().id, "index create");
        self.apply(entity, None)
    }

    /// Re-register index entries after an update.
    ///
    /// `prior` is the snapshot the currently stored entries were derived
    /// from. Entries keyed by prior values are retracted and entries keyed
    /// by current values added, even when nothing changed -- retracting an
    /// absent entry is a no-op and the rewrite keeps the operation
    /// idempotent.
    pub fn on_update<E: Entity>(&self, entity: &E, prior: Option<&E>) -> Result<()> {
        debug!(entity_type = E::TYPE_NAME, id = %entity.meta().id, "index update");
        self.apply(entity, prior)
    }

    /// Retract every index entry held by `entity`.
    ///
    /// Keys are re-derived from the entity's attribute values, so the caller
    /// must pass the state as stored, before physically deleting the record.
    pub fn on_delete<E: Entity>(&self, entity: &E) -> Result<()> {
        let schema = E::SCHEMA;
        let id = entity.meta().id.clone();
        debug!(entity_type = E::TYPE_NAME, id = %id, "index delete");

        self.store
            .ordered_remove(&keys::ordering_key(E::TYPE_NAME, ORDER_BY_CREATED_ON), &id)?;
        for position in schema.positions {
            self.store
                .ordered_remove(&keys::ordering_key(E::TYPE_NAME, position.name), &id)?;
        }

        for index in schema.indexes {
            if index.unique {
                let (key, _) = keys::unique_key(entity, index);
                self.store.delete(&key)?;
            } else {
                for base in keys::filter_keys(entity, index, &self.config)? {
                    self.store
                        .ordered_remove(&format!("{base}:{ORDER_BY_CREATED_ON}"), &id)?;
                    for position in schema.positions {
                        self.store
                            .ordered_remove(&format!("{base}:{}", position.name), &id)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Re-add all entries for an existing record without retracting anything.
    ///
    /// Used by the bulk rebuild to backfill indexes declared after data
    /// already exists; adding an entry that is already present is a no-op.
    pub fn rebuild<E: Entity>(&self, entity: &E) -> Result<()> {
        self.apply(entity, None)
    }

    fn apply<E: Entity>(&self, entity: &E, prior: Option<&E>) -> Result<()> {
        let schema = E::SCHEMA;
        let meta = entity.meta();
        let id = meta.id.clone();

        let timeline_score = if meta.created_on > 0 {
            meta.created_on as f64
        } else {
            // legacy records rebuilt without a creation timestamp
            warn!(entity_type = E::TYPE_NAME, id = %id, "missing created_on, scoring with current time");
            crate::repository::now_micros() as f64
        };

        // ---- compute phase: no store calls below may precede this ----

        let mut position_scores = Vec::with_capacity(schema.positions.len());
        for position in schema.positions {
            let score = encoder::encode(entity, position.properties, &self.config)?;
            position_scores.push((position.name, score));
        }

        // (new key, had any non-null value, prior key)
        let mut unique_claims: Vec<(String, bool, Option<String>)> = Vec::new();
        // (new base keys, prior base keys)
        let mut filter_ops: Vec<(Vec<String>, Option<Vec<String>>)> = Vec::new();
        for index in schema.indexes {
            if index.unique {
                let (key, has_value) = keys::unique_key(entity, index);
                let old_key = prior.map(|p| keys::unique_key(p, index).0);
                unique_claims.push((key, has_value, old_key));
            } else {
                let bases = keys::filter_keys(entity, index, &self.config)?;
                let old_bases = prior
                    .map(|p| keys::filter_keys(p, index, &self.config))
                    .transpose()?;
                filter_ops.push((bases, old_bases));
            }
        }

        // ---- claim phase: unique constraints before any ordered-set write ----

        let mut claimed: Vec<&str> = Vec::new();
        for (key, has_value, _) in &unique_claims {
            if !*has_value {
                continue;
            }
            if self.store.set_nx(key, Bytes::from(id.clone().into_bytes()))? {
                claimed.push(key.as_str());
                continue;
            }
            let holder = self.store.get(key)?;
            if holder.is_some_and(|h| h.as_ref() != id.as_bytes()) {
                for stale in claimed.drain(..) {
                    let _ = self.store.delete(stale);
                }
                return Err(PrismError::UniqueViolation(key.clone()));
            }
        }
        for (key, _, old_key) in &unique_claims {
            if let Some(old) = old_key {
                if old != key {
                    self.store.delete(old)?;
                }
            }
        }

        // ---- apply phase ----

        self.store.ordered_add(
            &keys::ordering_key(E::TYPE_NAME, ORDER_BY_CREATED_ON),
            timeline_score,
            &id,
        )?;
        for (name, score) in &position_scores {
            self.store
                .ordered_add(&keys::ordering_key(E::TYPE_NAME, name), *score, &id)?;
        }

        for (bases, old_bases) in &filter_ops {
            if let Some(old_bases) = old_bases {
                for base in old_bases {
                    self.store
                        .ordered_remove(&format!("{base}:{ORDER_BY_CREATED_ON}"), &id)?;
                    for (name, _) in &position_scores {
                        self.store.ordered_remove(&format!("{base}:{name}"), &id)?;
                    }
                }
            }
            for base in bases {
                self.store.ordered_add(
                    &format!("{base}:{ORDER_BY_CREATED_ON}"),
                    timeline_score,
                    &id,
                )?;
                for (name, score) in &position_scores {
                    self.store.ordered_add(&format!("{base}:{name}"), *score, &id)?;
                }
            }
        }

        Ok(())
    }
}
