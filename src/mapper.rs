//! Object mapper collaborator
//!
//! Turns typed records into bytes and back. The engine never inspects the
//! payload; everything index-related goes through `Entity::attribute`
//! instead, so the wire codec is swappable per repository.

use bytes::Bytes;

use crate::error::{PrismError, Result};
use crate::schema::Entity;

/// Serialize/deserialize contract consumed by the repository
pub trait Mapper {
    fn serialize<E: Entity>(&self, entity: &E) -> Result<Bytes>;

    fn deserialize<E: Entity>(&self, bytes: &[u8]) -> Result<E>;
}

/// Default mapper: compact binary encoding via bincode over serde
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeMapper;

impl Mapper for BincodeMapper {
    fn serialize<E: Entity>(&self, entity: &E) -> Result<Bytes> {
        bincode::serialize(entity)
            .map(Bytes::from)
            .map_err(|e| PrismError::Serialization(e.to_string()))
    }

    fn deserialize<E: Entity>(&self, bytes: &[u8]) -> Result<E> {
        bincode::deserialize(bytes).map_err(|e| PrismError::Serialization(e.to_string()))
    }
}
