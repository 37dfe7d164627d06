//! The interning cache: a bounded, recency-ordered map from canonical
//! name to [`Term`].
//!
//! The factory talks to the cache only through [`TermCache`], so any
//! store with least-recently-used eviction can be plugged in. The default
//! [`LruTermCache`] stamps every entry with a logical clock on each use
//! and appends `(stamp, key)` to a recency queue. Entries never move in
//! the map; the queue front is the eviction candidate once stale records
//! (whose stamp no longer matches the entry) are skipped. Lookups, inserts
//! and evictions are O(1) amortized.

use crate::Term;
use indexmap::IndexMap;
use serde::Serialize;
use smartstring::alias::String;
use std::collections::VecDeque;

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub evictions: u64,
}

/// A recency-ordered, bounded key → [`Term`] store.
pub trait TermCache: Send {
    /// Returns the entry and marks it most recently used.
    fn get(&mut self, key: &str) -> Option<Term>;

    /// Inserts or replaces an entry, evicting silently if over capacity.
    fn set(&mut self, key: &str, term: Term) {
        let _ = self.set_with_eviction(key, term);
    }

    /// Inserts or replaces an entry and returns the key evicted to make
    /// room for it, if any.
    fn set_with_eviction(&mut self, key: &str, term: Term) -> Option<String>;

    /// Returns `true` if the key is present. Does not touch recency.
    fn has(&self, key: &str) -> bool;

    /// Removes an entry. Returns `true` if it was present.
    fn delete(&mut self, key: &str) -> bool;

    /// Removes all entries.
    fn clear(&mut self);

    /// Changes the capacity and returns the keys evicted by shrinking,
    /// least recently used first.
    fn set_max_size(&mut self, max_size: usize) -> Vec<String>;

    /// Returns the number of entries.
    fn size(&self) -> usize;

    /// Returns occupancy statistics.
    fn stats(&self) -> CacheStats;
}

/// Least-recently-used cache backed by an [`IndexMap`] and a lazily
/// pruned recency queue.
#[derive(Debug, Clone)]
pub struct LruTermCache {
    entries: IndexMap<String, Slot>,
    /// `(stamp, key)` in use order, oldest first. May hold stale records.
    recency: VecDeque<(u64, String)>,
    clock: u64,
    max_size: usize,
    evictions: u64,
}

#[derive(Debug, Clone)]
struct Slot {
    term: Term,
    /// Clock value of the last use.
    stamp: u64,
}

/// Stale records tolerated beyond twice the live entry count.
const RECENCY_SLACK: usize = 64;

impl LruTermCache {
    /// Create an empty cache holding at most `max_size` terms. A capacity
    /// of zero is raised to one.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            recency: VecDeque::new(),
            clock: 0,
            max_size: max_size.max(1),
            evictions: 0,
        }
    }

    /// Pops the least recently used entry, skipping stale records.
    fn evict_oldest(&mut self) -> Option<String> {
        while let Some((stamp, key)) = self.recency.pop_front() {
            if self.entries.get(&key).is_some_and(|slot| slot.stamp == stamp) {
                self.entries.swap_remove(&key);
                self.evictions += 1;
                return Some(key);
            }
        }
        None
    }

    /// Drops stale records once they outnumber live entries twice over.
    fn compact(&mut self) {
        if self.recency.len() <= 2 * self.entries.len() + RECENCY_SLACK {
            return;
        }
        let entries = &self.entries;
        self.recency
            .retain(|(stamp, key)| entries.get(key).is_some_and(|slot| slot.stamp == *stamp));
    }

    #[inline]
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

impl TermCache for LruTermCache {
    fn get(&mut self, key: &str) -> Option<Term> {
        let index = self.entries.get_index_of(key)?;
        let stamp = self.tick();
        let (key, slot) = self.entries.get_index_mut(index)?;
        slot.stamp = stamp;
        let term = slot.term.clone();
        self.recency.push_back((stamp, key.clone()));
        self.compact();
        Some(term)
    }

    fn set_with_eviction(&mut self, key: &str, term: Term) -> Option<String> {
        let stamp = self.tick();
        if let Some(slot) = self.entries.get_mut(key) {
            slot.term = term;
            slot.stamp = stamp;
            self.recency.push_back((stamp, String::from(key)));
            self.compact();
            return None;
        }
        let evicted = if self.entries.len() >= self.max_size {
            self.evict_oldest()
        } else {
            None
        };
        self.entries.insert(String::from(key), Slot { term, stamp });
        self.recency.push_back((stamp, String::from(key)));
        self.compact();
        evicted
    }

    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn delete(&mut self, key: &str) -> bool {
        self.entries.swap_remove(key).is_some()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    fn set_max_size(&mut self, max_size: usize) -> Vec<String> {
        self.max_size = max_size.max(1);
        let mut evicted = Vec::new();
        while self.entries.len() > self.max_size {
            match self.evict_oldest() {
                Some(key) => evicted.push(key),
                None => break,
            }
        }
        evicted
    }

    fn size(&self) -> usize {
        self.entries.len()
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            max_size: self.max_size,
            evictions: self.evictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str) -> Term {
        Term::new_atom(name)
    }

    #[test]
    fn evicts_least_recently_inserted() {
        let mut cache = LruTermCache::new(2);
        assert_eq!(cache.set_with_eviction("a", atom("a")), None);
        assert_eq!(cache.set_with_eviction("b", atom("b")), None);
        assert_eq!(cache.set_with_eviction("c", atom("c")).as_deref(), Some("a"));
        assert!(!cache.has("a"));
        assert!(cache.has("b"));
        assert!(cache.has("c"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn get_refreshes_recency() {
        let mut cache = LruTermCache::new(2);
        cache.set("a", atom("a"));
        cache.set("b", atom("b"));
        assert!(cache.get("a").is_some());
        assert_eq!(cache.set_with_eviction("c", atom("c")).as_deref(), Some("b"));
        assert!(cache.has("a"));
    }

    #[test]
    fn get_returns_same_instance() {
        let mut cache = LruTermCache::new(4);
        let a = atom("a");
        cache.set("a", a.clone());
        assert!(cache.get("a").unwrap().ptr_eq(&a));
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn replacing_does_not_evict() {
        let mut cache = LruTermCache::new(2);
        cache.set("a", atom("a"));
        cache.set("b", atom("b"));
        let a2 = atom("a");
        assert_eq!(cache.set_with_eviction("a", a2.clone()), None);
        assert_eq!(cache.size(), 2);
        assert!(cache.get("a").unwrap().ptr_eq(&a2));
    }

    #[test]
    fn shrinking_evicts_oldest_first() {
        let mut cache = LruTermCache::new(4);
        for k in ["a", "b", "c", "d"] {
            cache.set(k, atom(k));
        }
        let evicted = cache.set_max_size(2);
        assert_eq!(evicted, vec![String::from("a"), String::from("b")]);
        assert_eq!(cache.size(), 2);
        assert_eq!(cache.stats().max_size, 2);
    }

    #[test]
    fn delete_and_clear() {
        let mut cache = LruTermCache::new(4);
        cache.set("a", atom("a"));
        cache.set("b", atom("b"));
        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));
        cache.clear();
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn hits_leave_entries_in_place() {
        let mut cache = LruTermCache::new(3);
        for k in ["a", "b", "c"] {
            cache.set(k, atom(k));
        }
        for _ in 0..1000 {
            assert!(cache.get("a").is_some());
        }
        assert_eq!(cache.entries.get_index_of("a"), Some(0));
        assert!(cache.recency.len() <= 2 * cache.size() + RECENCY_SLACK);
        assert_eq!(cache.set_with_eviction("d", atom("d")).as_deref(), Some("b"));
        assert_eq!(cache.set_with_eviction("e", atom("e")).as_deref(), Some("c"));
        assert_eq!(cache.set_with_eviction("f", atom("f")).as_deref(), Some("a"));
    }

    #[test]
    fn deleted_keys_leave_no_stale_eviction() {
        let mut cache = LruTermCache::new(2);
        cache.set("a", atom("a"));
        cache.set("b", atom("b"));
        assert!(cache.delete("a"));
        cache.set("a", atom("a"));
        assert_eq!(cache.set_with_eviction("c", atom("c")).as_deref(), Some("b"));
        assert!(cache.has("a"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut cache = LruTermCache::new(0);
        cache.set("a", atom("a"));
        assert_eq!(cache.size(), 1);
        assert_eq!(cache.set_with_eviction("b", atom("b")).as_deref(), Some("a"));
    }
}
