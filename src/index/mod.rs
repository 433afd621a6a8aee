//! Index Module
//!
//! Everything derived: sort scores, composite keys, and the maintenance of
//! both across entity writes.
//!
//! ## Responsibilities
//! - Fold position properties into one numeric sort score (encoder)
//! - Derive composite filter/unique keys, fanning out over list values (keys)
//! - Add and retract index entries on create/update/delete (maintainer)
//!
//! The maintainer is the only component that writes index structures; the
//! repository and query executor only read them.

pub mod encoder;
pub mod keys;
pub mod maintainer;

pub use maintainer::IndexMaintainer;
