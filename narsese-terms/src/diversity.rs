//! Diversity tracking hooks.
//!
//! The factory notifies a [`DiversityTracker`] whenever a term is interned
//! or evicted. From the factory's point of view the tracker is purely
//! side-effecting; it is only consulted again when statistics are read.

use crate::Term;
use indexmap::IndexMap;
use serde::Serialize;
use smartstring::alias::String;

/// Aggregate diversity figures reported through factory statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DiversityMetrics {
    /// Number of terms currently registered.
    pub registered: usize,
    /// Number of distinct connectives (atoms count as one) among them.
    pub distinct_operators: usize,
    /// Shannon entropy of the connective distribution normalized to
    /// `[0, 1]`.
    pub entropy: f64,
}

/// Observer of term registration and eviction.
pub trait DiversityTracker: Send {
    fn register_term(&mut self, term: &Term);
    fn unregister_term(&mut self, name: &str);
    /// Scores how distinct `term` is relative to the registered terms,
    /// in `[0, 1]`.
    fn evaluate_diversity(&self, term: &Term) -> f64;
    fn metrics(&self) -> DiversityMetrics;
    fn clear(&mut self);
}

/// A tracker that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiversity;

impl DiversityTracker for NoDiversity {
    fn register_term(&mut self, _term: &Term) {}
    fn unregister_term(&mut self, _name: &str) {}
    fn evaluate_diversity(&self, _term: &Term) -> f64 {
        0.0
    }
    fn metrics(&self) -> DiversityMetrics {
        DiversityMetrics::default()
    }
    fn clear(&mut self) {}
}

const ATOM_KEY: &str = "atom";

/// Tracks the distribution of connectives among registered terms.
///
/// A term is as diverse as its connective is rare: a term whose connective
/// nobody else uses scores `1.0`.
#[derive(Debug, Clone, Default)]
pub struct OperatorDiversity {
    /// Registered term name → connective key.
    terms: IndexMap<String, String>,
    /// Connective key → number of registered terms using it.
    histogram: IndexMap<String, usize>,
}

impl OperatorDiversity {
    pub fn new() -> Self {
        Self::default()
    }

    fn oper_key(term: &Term) -> String {
        match term.oper() {
            Some(op) => String::from(op),
            None => String::from(ATOM_KEY),
        }
    }

    /// Number of registered terms with connective key `key`.
    pub fn count(&self, key: &str) -> usize {
        self.histogram.get(key).copied().unwrap_or(0)
    }
}

impl DiversityTracker for OperatorDiversity {
    fn register_term(&mut self, term: &Term) {
        if self.terms.contains_key(term.name()) {
            return;
        }
        let key = Self::oper_key(term);
        *self.histogram.entry(key.clone()).or_insert(0) += 1;
        self.terms.insert(String::from(term.name()), key);
    }

    fn unregister_term(&mut self, name: &str) {
        let Some(key) = self.terms.swap_remove(name) else {
            return;
        };
        if let Some(n) = self.histogram.get_mut(&key) {
            *n -= 1;
            if *n == 0 {
                self.histogram.swap_remove(&key);
            }
        }
    }

    fn evaluate_diversity(&self, term: &Term) -> f64 {
        let total = self.terms.len();
        if total == 0 {
            return 1.0;
        }
        let mut same = self.count(&Self::oper_key(term));
        if self.terms.contains_key(term.name()) {
            same -= 1;
        }
        1.0 - same as f64 / total as f64
    }

    fn metrics(&self) -> DiversityMetrics {
        let total = self.terms.len();
        let k = self.histogram.len();
        let entropy = if total == 0 || k < 2 {
            0.0
        } else {
            let h: f64 = self
                .histogram
                .values()
                .map(|&n| {
                    let p = n as f64 / total as f64;
                    -p * p.ln()
                })
                .sum();
            h / (k as f64).ln()
        };
        DiversityMetrics {
            registered: total,
            distinct_operators: k,
            entropy,
        }
    }

    fn clear(&mut self) {
        self.terms.clear();
        self.histogram.clear();
    }
}
