//! Sort-key encoder
//!
//! Collapses a position's properties, in declaration order, into a single
//! `f64` usable as an ordered-set score. Numeric values are summed; strings
//! are folded character-by-character (`score = score * scale + codepoint`)
//! up to a shared character cap.
//!
//! The result is a best-effort single-dimension collation: strings longer
//! than the cap and foldings beyond `f64` integer precision lose
//! information. That lossiness is an accepted trade-off -- callers needing
//! exact multi-key order should compose one synthetic field themselves.

use crate::config::Config;
use crate::error::{PrismError, Result};
use crate::schema::Entity;
use crate::value::Value;

/// Encode the named properties of `entity` into one sort score
pub fn encode<E: Entity>(entity: &E, properties: &[&str], config: &Config) -> Result<f64> {
    let mut score = 0.0_f64;
    // the fold cap is shared across all properties of the position
    let mut folded = 0usize;

    for property in properties {
        match entity.attribute(property) {
            Value::Null => {}
            Value::Str(s) => {
                for ch in s.chars() {
                    if folded >= config.string_fold_cap {
                        break;
                    }
                    score = score * config.string_fold_scale + f64::from(ch as u32);
                    folded += 1;
                }
            }
            other => match other.as_number() {
                Some(n) => score += n,
                None => {
                    return Err(PrismError::Encoding(format!(
                        "property {} has kind {}, which has no numeric representation",
                        property,
                        other.kind()
                    )));
                }
            },
        }
    }

    Ok(score)
}
