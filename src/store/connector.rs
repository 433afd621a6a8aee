//! Store connectors
//!
//! A connector owns the lifecycle of a store and hands out ready-to-use
//! handles. Pooling, retries, and endpoint selection live behind this trait;
//! the repository only ever sees the acquired handle. Connectors are
//! constructed explicitly and injected -- there is no process-wide cache.

use std::sync::Arc;

use crate::error::Result;
use crate::store::{MemoryStore, Store};

/// Supplies ready-to-use store handles
pub trait Connector {
    fn acquire(&self) -> Result<Arc<dyn Store>>;
}

/// Connector over an owned in-process [`MemoryStore`].
///
/// Every `acquire` returns a handle to the same store, so repositories built
/// from one connector share data.
#[derive(Default)]
pub struct MemoryConnector {
    store: Arc<MemoryStore>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct handle to the underlying store (testing and inspection)
    pub fn store(&self) -> Arc<MemoryStore> {
        Arc::clone(&self.store)
    }
}

impl Connector for MemoryConnector {
    fn acquire(&self) -> Result<Arc<dyn Store>> {
        Ok(Arc::clone(&self.store) as Arc<dyn Store>)
    }
}
