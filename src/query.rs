//! Query executor
//!
//! Resolves timeline, position, and equality queries into ordered-set reads,
//! then bulk-loads the matched records. All queries paginate with a 1-based
//! `page` and a `size`; `size == 0` returns only the count.

use tracing::debug;

use crate::error::Result;
use crate::index::keys;
use crate::mapper::Mapper;
use crate::schema::Entity;
use crate::store::Store;

/// Inclusive score bounds restricting a timeline/position listing
#[derive(Debug, Clone, Copy)]
pub struct ScoreRange {
    pub start: f64,
    pub end: f64,
}

impl ScoreRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// One page of matched records plus the total match count.
///
/// A slot is `None` when the id was indexed but the record itself is missing
/// (deleted mid-query or never written) -- the batch is not aborted.
#[derive(Debug)]
pub struct ListResult<E> {
    pub items: Vec<Option<E>>,
    pub total: u64,
}

impl<E> ListResult<E> {
    /// Items that actually resolved to a record
    pub fn into_found(self) -> Vec<E> {
        self.items.into_iter().flatten().collect()
    }
}

/// Executes paginated reads against one ordered set at a time
pub(crate) struct QueryExecutor<'a, M: Mapper> {
    pub store: &'a dyn Store,
    pub mapper: &'a M,
}

impl<M: Mapper> QueryExecutor<'_, M> {
    /// Page through the ordered set at `set_key`.
    ///
    /// Without a score range: rank-range read, total = full cardinality.
    /// With one: score-range read with offset/limit, total = filtered count.
    pub fn list<E: Entity>(
        &self,
        set_key: &str,
        page: usize,
        size: usize,
        ascending: bool,
        range: Option<ScoreRange>,
    ) -> Result<ListResult<E>> {
        let page = page.max(1);
        let offset = (page - 1) * size;
        debug!(set_key, page, size, ascending, "list query");

        let ids = if size == 0 {
            Vec::new()
        } else {
            match range {
                Some(r) => self.store.range_by_score(
                    set_key,
                    r.start,
                    r.end,
                    offset,
                    size,
                    !ascending,
                )?,
                None => self
                    .store
                    .range_by_rank(set_key, offset, offset + size - 1, !ascending)?,
            }
        };

        let total = match range {
            Some(r) => self.store.count_by_score(set_key, r.start, r.end)?,
            None => self.store.cardinality(set_key)?,
        };

        let items = self.fetch::<E>(&ids)?;
        Ok(ListResult { items, total })
    }

    /// Bulk-load records by id with a single multi-get
    pub fn fetch<E: Entity>(&self, ids: &[String]) -> Result<Vec<Option<E>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let record_keys: Vec<String> = ids
            .iter()
            .map(|id| keys::record_key(E::TYPE_NAME, id))
            .collect();
        let blobs = self.store.multi_get(&record_keys)?;

        let mut items = Vec::with_capacity(blobs.len());
        for blob in blobs {
            items.push(match blob {
                Some(bytes) => Some(self.mapper.deserialize::<E>(&bytes)?),
                None => None,
            });
        }
        Ok(items)
    }
}
