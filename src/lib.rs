//! # PrismDB
//!
//! A typed repository engine with automatic secondary indexes over a sorted
//! key-value store:
//! - Records reachable by creation order, custom orderings, and equality
//!   filters, with pagination in both directions
//! - Unique constraints enforced via atomic key claims
//! - Cartesian fan-out for indexes over list-valued attributes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Repository (façade)                        │
//! │          Create / Update / Delete / GetList / ...            │
//! └───────┬─────────────────────┬───────────────────────────────┘
//!         │ writes              │ reads
//! ┌───────▼────────┐    ┌───────▼────────┐
//! │ IndexMaintainer│    │ QueryExecutor  │
//! │ (add/retract)  │    │ (rank/score)   │
//! └───────┬────────┘    └───────┬────────┘
//!         │   encoder + keys    │
//! ┌───────▼─────────────────────▼────────┐
//! │        Store (kv + ordered sets)     │
//! └──────────────────────────────────────┘
//! ```
//!
//! The store handle comes from a [`Connector`]; record payloads go through a
//! [`Mapper`]. Both are swappable collaborators.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod value;
pub mod schema;
pub mod store;
pub mod mapper;
pub mod index;
pub mod query;
pub mod repository;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PrismError, Result};
pub use config::Config;
pub use value::Value;
pub use schema::{Entity, FieldDef, FieldKind, IndexDef, Meta, PositionDef, Schema, ORDER_BY_CREATED_ON};
pub use store::{Connector, MemoryConnector, MemoryStore, Store};
pub use mapper::{BincodeMapper, Mapper};
pub use index::IndexMaintainer;
pub use query::{ListResult, ScoreRange};
pub use repository::Repository;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of PrismDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
