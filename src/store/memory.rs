//! In-memory store implementation
//!
//! A single `RwLock` guards both maps; every contract method is atomic under
//! it. Ordered sets keep a `BTreeSet` over `(score, member)` with a
//! member-to-score side map so re-scoring a member stays cheap.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::Result;
use crate::store::Store;

/// One `(score, member)` entry; total order via `f64::total_cmp`, then member
#[derive(Debug, Clone, PartialEq)]
struct ScoredMember {
    score: f64,
    member: String,
}

impl Eq for ScoredMember {}

impl PartialOrd for ScoredMember {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredMember {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.member.cmp(&other.member))
    }
}

#[derive(Debug, Default)]
struct ScoredSet {
    ordered: BTreeSet<ScoredMember>,
    scores: HashMap<String, f64>,
}

impl ScoredSet {
    fn add(&mut self, score: f64, member: &str) {
        if let Some(previous) = self.scores.insert(member.to_string(), score) {
            self.ordered.remove(&ScoredMember {
                score: previous,
                member: member.to_string(),
            });
        }
        self.ordered.insert(ScoredMember {
            score,
            member: member.to_string(),
        });
    }

    fn remove(&mut self, member: &str) {
        if let Some(score) = self.scores.remove(member) {
            self.ordered.remove(&ScoredMember {
                score,
                member: member.to_string(),
            });
        }
    }
}

#[derive(Default)]
struct Inner {
    strings: HashMap<String, Bytes>,
    sets: HashMap<String, ScoredSet>,
}

/// Thread-safe in-process store backend
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of raw string keys currently stored
    pub fn string_count(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Number of non-empty ordered sets currently stored
    pub fn set_count(&self) -> usize {
        self.inner.read().sets.len()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Bytes>> {
        Ok(self.inner.read().strings.get(key).cloned())
    }

    fn set(&self, key: &str, value: Bytes) -> Result<()> {
        self.inner.write().strings.insert(key.to_string(), value);
        Ok(())
    }

    fn set_nx(&self, key: &str, value: Bytes) -> Result<bool> {
        let mut inner = self.inner.write();
        if inner.strings.contains_key(key) {
            return Ok(false);
        }
        inner.strings.insert(key.to_string(), value);
        Ok(true)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.inner.write().strings.remove(key);
        Ok(())
    }

    fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<Bytes>>> {
        let inner = self.inner.read();
        Ok(keys.iter().map(|k| inner.strings.get(k).cloned()).collect())
    }

    fn ordered_add(&self, set: &str, score: f64, member: &str) -> Result<()> {
        self.inner
            .write()
            .sets
            .entry(set.to_string())
            .or_default()
            .add(score, member);
        Ok(())
    }

    fn ordered_remove(&self, set: &str, member: &str) -> Result<()> {
        let mut inner = self.inner.write();
        let now_empty = match inner.sets.get_mut(set) {
            Some(scored) => {
                scored.remove(member);
                scored.ordered.is_empty()
            }
            None => false,
        };
        // drop empty sets so absence and emptiness stay equivalent
        if now_empty {
            inner.sets.remove(set);
        }
        Ok(())
    }

    fn cardinality(&self, set: &str) -> Result<u64> {
        Ok(self
            .inner
            .read()
            .sets
            .get(set)
            .map_or(0, |s| s.ordered.len() as u64))
    }

    fn range_by_rank(
        &self,
        set: &str,
        start: usize,
        end: usize,
        reverse: bool,
    ) -> Result<Vec<String>> {
        let inner = self.inner.read();
        let Some(scored) = inner.sets.get(set) else {
            return Ok(Vec::new());
        };
        if end < start {
            return Ok(Vec::new());
        }
        let take = end - start + 1;
        let members = if reverse {
            scored
                .ordered
                .iter()
                .rev()
                .skip(start)
                .take(take)
                .map(|e| e.member.clone())
                .collect()
        } else {
            scored
                .ordered
                .iter()
                .skip(start)
                .take(take)
                .map(|e| e.member.clone())
                .collect()
        };
        Ok(members)
    }

    fn range_by_score(
        &self,
        set: &str,
        min: f64,
        max: f64,
        offset: usize,
        limit: usize,
        reverse: bool,
    ) -> Result<Vec<String>> {
        let inner = self.inner.read();
        let Some(scored) = inner.sets.get(set) else {
            return Ok(Vec::new());
        };
        let in_range = |e: &&ScoredMember| e.score >= min && e.score <= max;
        let members = if reverse {
            scored
                .ordered
                .iter()
                .rev()
                .filter(in_range)
                .skip(offset)
                .take(limit)
                .map(|e| e.member.clone())
                .collect()
        } else {
            scored
                .ordered
                .iter()
                .filter(in_range)
                .skip(offset)
                .take(limit)
                .map(|e| e.member.clone())
                .collect()
        };
        Ok(members)
    }

    fn count_by_score(&self, set: &str, min: f64, max: f64) -> Result<u64> {
        let inner = self.inner.read();
        Ok(inner.sets.get(set).map_or(0, |scored| {
            scored
                .ordered
                .iter()
                .filter(|e| e.score >= min && e.score <= max)
                .count() as u64
        }))
    }
}
