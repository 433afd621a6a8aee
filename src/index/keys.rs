//! Composite key derivation
//!
//! Builds every persisted key the engine uses:
//!
//! ```text
//! <type>:<id>                                      raw record
//! Keys:<type>:<ordering>                           timeline / position set
//! IX:<type>-<attr>:<value>[...]:<ordering>         non-unique filter set
//! UIX:<type>-<attr>:<value>[...]                   unique key registry
//! ```
//!
//! Key construction is deterministic: the same attribute values always
//! produce the same keys in the same order, on both the add and the retract
//! path. List-valued attributes expand the key set by the cartesian product
//! of their elements, bounded by `Config::max_fanout`.

use crate::config::Config;
use crate::error::{PrismError, Result};
use crate::schema::{Entity, IndexDef};
use crate::value::Value;

/// Key of the raw serialized record
pub fn record_key(type_name: &str, id: &str) -> String {
    format!("{type_name}:{id}")
}

/// Key of the ordered set backing a timeline or position ordering
pub fn ordering_key(type_name: &str, ordering: &str) -> String {
    format!("Keys:{type_name}:{ordering}")
}

/// Derive the composite base keys of a non-unique index for `entity`.
///
/// Scalar values append `-<attr>:<value>` to every key built so far; list
/// values multiply the key set (one copy per element). An empty list yields
/// no combinations, leaving the entity unreachable through this index. The
/// base keys still need an `:<ordering>` suffix before hitting the store.
pub fn filter_keys<E: Entity>(entity: &E, index: &IndexDef, config: &Config) -> Result<Vec<String>> {
    let mut keys = vec![format!("IX:{}", E::TYPE_NAME)];

    for property in index.properties {
        match entity.attribute(property) {
            Value::List(items) => {
                let combinations = keys.len() * items.len();
                if combinations > config.max_fanout {
                    return Err(PrismError::FanoutExceeded(format!(
                        "index {} on {} expands to {} keys (limit {})",
                        index.name,
                        E::TYPE_NAME,
                        combinations,
                        config.max_fanout
                    )));
                }
                let mut expanded = Vec::with_capacity(combinations);
                for item in &items {
                    let fragment = item.key_fragment();
                    for key in &keys {
                        expanded.push(format!("{key}-{property}:{fragment}"));
                    }
                }
                keys = expanded;
            }
            value => {
                let fragment = value.key_fragment();
                for key in &mut keys {
                    key.push('-');
                    key.push_str(property);
                    key.push(':');
                    key.push_str(&fragment);
                }
            }
        }
    }

    Ok(keys)
}

/// Composite filter key for caller-supplied attribute/value pairs, applied
/// in the given order, with the ordering suffix attached
pub fn filter_key_from_values(
    type_name: &str,
    filters: &[(&str, Value)],
    ordering: &str,
) -> String {
    let mut key = format!("IX:{type_name}");
    for (name, value) in filters {
        key.push('-');
        key.push_str(name);
        key.push(':');
        key.push_str(&value.key_fragment());
    }
    key.push(':');
    key.push_str(ordering);
    key
}

/// Derive the unique-registry key of a unique index for `entity`.
///
/// Also reports whether any contributing attribute was non-null; an
/// all-null tuple is never registered.
pub fn unique_key<E: Entity>(entity: &E, index: &IndexDef) -> (String, bool) {
    let mut key = format!("UIX:{}", E::TYPE_NAME);
    let mut has_value = false;
    for property in index.properties {
        let value = entity.attribute(property);
        if !value.is_null() {
            has_value = true;
        }
        key.push('-');
        key.push_str(property);
        key.push(':');
        key.push_str(&value.key_fragment());
    }
    (key, has_value)
}

/// Unique-registry key for caller-supplied attribute/value pairs
pub fn unique_key_from_values(type_name: &str, filters: &[(&str, Value)]) -> String {
    let mut key = format!("UIX:{type_name}");
    for (name, value) in filters {
        key.push('-');
        key.push_str(name);
        key.push(':');
        key.push_str(&value.key_fragment());
    }
    key
}
