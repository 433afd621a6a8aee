//! Entity schema declarations
//!
//! Every stored type declares, statically, which attributes exist and which
//! orderings (positions) and equality lookups (indexes) the engine maintains
//! for it. The declarations are an explicit registry consulted at runtime --
//! there is no reflection. Index and position definitions never change while
//! the process runs; changing them requires a rebuild via
//! `Repository::create_indexes`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Name of the always-present ordering by creation time
pub const ORDER_BY_CREATED_ON: &str = "CreatedOn";

// =============================================================================
// System Metadata
// =============================================================================

/// System fields carried by every entity.
///
/// `id` is immutable once assigned and `created_on` (microseconds since the
/// Unix epoch) is set exactly once, at creation. Both are assigned by
/// `Repository::create`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub id: String,

    /// Creation time, microseconds since epoch; doubles as the timeline score
    pub created_on: i64,
    pub created_by: Option<String>,

    pub updated_on: i64,
    pub updated_by: Option<String>,
}

// =============================================================================
// Schema Declarations
// =============================================================================

/// Kind of a declared attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    Str,
    List,
}

/// One declared attribute: name plus kind
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// A named custom ordering: the listed properties are folded into one
/// numeric sort score
#[derive(Debug, Clone, Copy)]
pub struct PositionDef {
    pub name: &'static str,
    pub properties: &'static [&'static str],
}

/// A named equality lookup over one or more properties
#[derive(Debug, Clone, Copy)]
pub struct IndexDef {
    pub name: &'static str,
    /// At most one entity per distinct value tuple when set
    pub unique: bool,
    pub properties: &'static [&'static str],
}

/// Static schema of one entity type
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub fields: &'static [FieldDef],
    pub positions: &'static [PositionDef],
    pub indexes: &'static [IndexDef],
}

impl Schema {
    /// Empty schema: timeline ordering only, no filters
    pub const EMPTY: Schema = Schema {
        fields: &[],
        positions: &[],
        indexes: &[],
    };

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check that every property referenced by a position or index is a
    /// declared field. Run once at repository construction.
    pub fn validate(&self, type_name: &str) -> Result<(), String> {
        for position in self.positions {
            for property in position.properties {
                if self.field(property).is_none() {
                    return Err(format!(
                        "position {} on {} references undeclared field {}",
                        position.name, type_name, property
                    ));
                }
            }
        }
        for index in self.indexes {
            for property in index.properties {
                if self.field(property).is_none() {
                    return Err(format!(
                        "index {} on {} references undeclared field {}",
                        index.name, type_name, property
                    ));
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Entity Trait
// =============================================================================

/// A storable, indexable record.
///
/// Implementations embed a [`Meta`] for the system fields and answer
/// attribute lookups by name; unknown names yield [`Value::Null`].
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Type tag used in every persisted key (`<type>:<id>`, `IX:<type>-...`)
    const TYPE_NAME: &'static str;

    /// Static index/position declarations for this type
    const SCHEMA: Schema;

    fn meta(&self) -> &Meta;

    fn meta_mut(&mut self) -> &mut Meta;

    /// Look up a declared attribute by name
    fn attribute(&self, name: &str) -> Value;
}
